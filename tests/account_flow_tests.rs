// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration, login and profile updates through the router.

use axum::http::StatusCode;
use ecocommute::error::ErrorResponse;
use ecocommute::models::{Impact, UserProfile};
use ecocommute::routes::auth::TokenResponse;
use serde_json::json;
use tower::ServiceExt;

mod common;

fn registration(email: &str) -> serde_json::Value {
    json!({
        "full_name": "Ada Lovelace",
        "email": email,
        "password": "analytical",
        "university": "State University",
        "phone": "555-0100"
    })
}

#[tokio::test]
async fn test_register_then_login() {
    let (app, state) = common::create_test_app();

    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/auth/register",
            None,
            &registration("ada@uni.edu"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let registered: TokenResponse = common::body_json(response).await;
    assert_eq!(registered.token_type, "bearer");
    assert_eq!(registered.user.email, "ada@uni.edu");
    assert!(!registered.user.is_driver);

    // Registration starts an empty impact record
    let impact = state.db.get_or_create_impact(registered.user.id);
    assert_eq!(impact.total_trips, 0);

    // Email lookup is case-insensitive
    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({ "email": "ADA@uni.edu", "password": "analytical" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let logged_in: TokenResponse = common::body_json(response).await;
    assert_eq!(logged_in.user.id, registered.user.id);

    // The issued token works on protected routes
    let response = app
        .oneshot(common::get_request("/api/impact", &logged_in.access_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let impact: Impact = common::body_json(response).await;
    assert_eq!(impact.user_id, registered.user.id);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let (app, _) = common::create_test_app();

    let first = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/auth/register",
            None,
            &registration("dup@uni.edu"),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(common::json_request(
            "POST",
            "/api/auth/register",
            None,
            &registration("dup@uni.edu"),
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = common::body_json(second).await;
    assert_eq!(body.detail.as_deref(), Some("Email already registered"));
}

#[tokio::test]
async fn test_login_wrong_password() {
    let (app, _) = common::create_test_app();

    app.clone()
        .oneshot(common::json_request(
            "POST",
            "/api/auth/register",
            None,
            &registration("grace@uni.edu"),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({ "email": "grace@uni.edu", "password": "wrong-password" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: ErrorResponse = common::body_json(response).await;
    assert_eq!(body.detail.as_deref(), Some("Invalid email or password"));
}

#[tokio::test]
async fn test_login_unknown_email_matches_wrong_password() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({ "email": "nobody@uni.edu", "password": "whatever" }),
        ))
        .await
        .unwrap();

    // Same response as a wrong password
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: ErrorResponse = common::body_json(response).await;
    assert_eq!(body.detail.as_deref(), Some("Invalid email or password"));
}

#[tokio::test]
async fn test_profile_update_enables_driving() {
    let (app, state) = common::create_test_app();
    let (user_id, token) = common::seed_user(&state, "driver@uni.edu", false);

    let response = app
        .clone()
        .oneshot(common::json_request(
            "PUT",
            "/api/profile",
            Some(&token),
            &json!({
                "department": "Physics",
                "is_driver": true,
                "driver_info": {
                    "vehicle_type": "hatchback",
                    "capacity": 3,
                    "license_plate": "7ABC123"
                }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(common::get_request("/api/auth/me", &token))
        .await
        .unwrap();
    let profile: UserProfile = common::body_json(response).await;
    assert_eq!(profile.id, user_id);
    assert!(profile.is_driver);
    assert_eq!(profile.department, "Physics");
    let info = profile.driver_info.unwrap();
    assert_eq!(info.vehicle_type, "hatchback");
    assert_eq!(info.capacity, 3);
}
