// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile editing.

use axum::{extract::State, routing::put, Extension, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::ProfileUpdate;
use crate::AppState;

use super::JsonBody;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/profile", put(update_profile))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Update the editable subset of the caller's profile.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    JsonBody(update): JsonBody<ProfileUpdate>,
) -> Result<Json<MessageResponse>> {
    update.validate()?;

    let changed = state
        .db
        .update_user(user.user_id, |profile| profile.apply_update(update))?;

    tracing::info!(user_id = %user.user_id, changed, "Profile update");

    Ok(Json(MessageResponse {
        message: "Profile updated successfully".to_string(),
    }))
}
