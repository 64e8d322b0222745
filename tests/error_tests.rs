// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use ecocommute::error::{AppError, ErrorResponse};

mod common;

async fn render(err: AppError) -> (StatusCode, ErrorResponse) {
    let response = err.into_response();
    let status = response.status();
    (status, common::body_json(response).await)
}

#[tokio::test]
async fn test_auth_errors_are_401() {
    for err in [
        AppError::Unauthorized,
        AppError::InvalidToken,
        AppError::UnknownUser,
        AppError::InvalidCredentials,
    ] {
        let (status, _) = render(err).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_detail_is_user_message() {
    let (status, body) = render(AppError::BadRequest("Trip is no longer searching".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.error, "bad_request");
    assert_eq!(body.detail.as_deref(), Some("Trip is no longer searching"));

    let (status, body) = render(AppError::Forbidden("Trip belongs to another user".into())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body.detail.as_deref(), Some("Trip belongs to another user"));
}

#[tokio::test]
async fn test_internal_error_hides_detail() {
    let (status, body) = render(AppError::Internal(anyhow::anyhow!("hash backend exploded"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.error, "internal_error");
    assert_eq!(body.detail, None);
}
