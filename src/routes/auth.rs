// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account registration and password login.

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, AuthUser};
use crate::models::{Impact, User, UserProfile};
use crate::services::{hash_password, verify_dummy_password, verify_password};
use crate::AppState;

use super::JsonBody;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
}

/// Routes under `/api/auth` that need a session.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/auth/me", get(me))
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub university: String,
    #[serde(default)]
    #[validate(length(max = 32))]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Session token plus the public user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "bearer")]
    pub token_type: String,
    pub user: User,
}

fn bearer() -> String {
    "bearer".to_string()
}

fn issue_token(state: &AppState, user: &UserProfile) -> Result<TokenResponse> {
    let access_token = create_jwt(
        user.id,
        &state.config.jwt_signing_key,
        state.config.token_ttl_days,
    )?;
    Ok(TokenResponse {
        access_token,
        token_type: bearer(),
        user: user.public(),
    })
}

/// Create an account and its (empty) impact record, then log the user in.
async fn register(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Result<Json<TokenResponse>> {
    payload.validate()?;

    let password_hash =
        hash_password(&payload.password).map_err(|e| AppError::Internal(e.into()))?;
    let profile = UserProfile::new(
        payload.email.trim().to_string(),
        password_hash,
        payload.full_name.trim().to_string(),
        payload.university.trim().to_string(),
        payload.phone,
    );

    state.db.create_user(profile.clone())?;
    state
        .db
        .update_impact(profile.id, |impact| *impact = Impact::new(profile.id));

    tracing::info!(user_id = %profile.id, university = %profile.university, "User registered");

    Ok(Json(issue_token(&state, &profile)?))
}

async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    payload.validate()?;

    let Some(user) = state.db.find_user_by_email(&payload.email) else {
        verify_dummy_password(&payload.password);
        tracing::info!("Login rejected: unknown email");
        return Err(AppError::InvalidCredentials);
    };

    let valid = verify_password(&payload.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.into()))?;
    if !valid {
        tracing::info!(user_id = %user.id, "Login rejected: wrong password");
        return Err(AppError::InvalidCredentials);
    }

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(Json(issue_token(&state, &user)?))
}

/// Current user's full profile (never includes the password hash).
async fn me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserProfile>> {
    let profile = state
        .db
        .get_user(user.user_id)
        .ok_or(AppError::UnknownUser)?;
    Ok(Json(profile))
}
