// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Carbon impact tracking.

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::achievement::{self, AchievementStatus};
use crate::models::{Impact, TravelMode};
use crate::services::CarbonSavings;
use crate::AppState;

use super::JsonBody;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/impact", get(get_impact))
        .route("/api/impact/record-trip", post(record_trip))
        .route("/api/impact/achievements", get(get_achievements))
}

/// Caller's impact aggregate, created on first access.
async fn get_impact(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<Impact> {
    Json(state.db.get_or_create_impact(user.user_id))
}

fn default_distance_km() -> f64 {
    10.0
}
fn default_passengers() -> u32 {
    2
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordTripRequest {
    #[serde(default)]
    pub mode: TravelMode,
    #[serde(default = "default_distance_km")]
    #[validate(range(min = 0.0, max = 1000.0))]
    pub distance_km: f64,
    #[serde(default = "default_passengers")]
    #[validate(range(min = 1, max = 16))]
    pub passengers: u32,
}

impl Default for RecordTripRequest {
    fn default() -> Self {
        Self {
            mode: TravelMode::default(),
            distance_km: default_distance_km(),
            passengers: default_passengers(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordTripResponse {
    pub carbon_saved: CarbonSavings,
    pub money_saved: f64,
    pub credits_earned: u32,
    /// Achievements unlocked by this trip
    #[serde(default)]
    pub new_badges: Vec<String>,
    pub message: String,
}

/// Compute a completed trip's savings and fold them into the caller's impact.
async fn record_trip(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    JsonBody(payload): JsonBody<RecordTripRequest>,
) -> Result<Json<RecordTripResponse>> {
    payload.validate()?;

    let (savings, outcome) =
        state
            .carbon
            .evaluate(payload.mode, payload.distance_km, payload.passengers);

    let now = Utc::now();
    let new_badges = state
        .db
        .update_impact(user.user_id, |impact| impact.record_trip(&outcome, now));

    tracing::info!(
        user_id = %user.user_id,
        mode = payload.mode.as_str(),
        distance_km = payload.distance_km,
        carbon_saved_kg = savings.carbon_saved_kg,
        credits = outcome.credits,
        new_badges = ?new_badges,
        "Trip impact recorded"
    );

    Ok(Json(RecordTripResponse {
        carbon_saved: savings,
        money_saved: outcome.money_saved,
        credits_earned: outcome.credits,
        new_badges,
        message: "Trip impact recorded successfully".to_string(),
    }))
}

/// Every achievement with the caller's earned flag.
async fn get_achievements(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<Vec<AchievementStatus>> {
    let impact = state.db.get_or_create_impact(user.user_id);
    Json(achievement::statuses(&impact))
}
