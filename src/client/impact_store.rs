// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Impact dashboard state.

use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ApiClient, AuthStore};
use crate::models::achievement::{self, AchievementStatus, DISPLAYED};
use crate::models::Impact;
use crate::routes::impact::{RecordTripRequest, RecordTripResponse};
use crate::services::carbon::round_to;
use crate::services::CarbonCalculator;

/// Headline numbers shown at the top of the impact screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpactSummary {
    pub carbon_saved_kg: f64,
    pub money_saved: f64,
    pub sustainable_miles: f64,
    pub total_trips: u32,
    pub current_streak: u32,
    pub eco_credits: u32,
    /// One decimal place
    pub trees_equivalent: f64,
}

impl ImpactSummary {
    pub fn from_impact(impact: &Impact) -> Self {
        Self {
            carbon_saved_kg: impact.total_carbon_saved,
            money_saved: impact.money_saved,
            sustainable_miles: impact.sustainable_miles,
            total_trips: impact.total_trips,
            current_streak: impact.current_streak,
            eco_credits: impact.eco_credits,
            trees_equivalent: round_to(
                CarbonCalculator.trees_equivalent(impact.total_carbon_saved),
                1,
            ),
        }
    }
}

pub struct ImpactStore {
    api: ApiClient,
    auth: Arc<AuthStore>,
    impact: RwLock<Option<Impact>>,
    is_loading: RwLock<bool>,
}

impl ImpactStore {
    pub fn new(api: ApiClient, auth: Arc<AuthStore>) -> Self {
        Self {
            api,
            auth,
            impact: RwLock::new(None),
            is_loading: RwLock::new(false),
        }
    }

    pub async fn impact(&self) -> Option<Impact> {
        self.impact.read().await.clone()
    }

    pub async fn is_loading(&self) -> bool {
        *self.is_loading.read().await
    }

    /// Replace the cached impact with the server's. On failure the previous
    /// value stays.
    pub async fn fetch_impact(&self) {
        *self.is_loading.write().await = true;

        match self.auth.token().await {
            Some(token) => match self.api.fetch_impact(&token).await {
                Ok(impact) => *self.impact.write().await = Some(impact),
                Err(e) => tracing::warn!(error = %e, "Failed to fetch impact"),
            },
            None => tracing::warn!("Failed to fetch impact: not authenticated"),
        }

        *self.is_loading.write().await = false;
    }

    /// Record a completed trip, then refresh the impact once.
    ///
    /// Failures are logged and nothing is refreshed.
    pub async fn record_trip(&self, data: &RecordTripRequest) -> Option<RecordTripResponse> {
        let Some(token) = self.auth.token().await else {
            tracing::warn!("Failed to record trip: not authenticated");
            return None;
        };

        match self.api.record_trip(&token, data).await {
            Ok(response) => {
                tracing::debug!(
                    credits = response.credits_earned,
                    new_badges = ?response.new_badges,
                    "Trip recorded"
                );
                self.fetch_impact().await;
                Some(response)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to record trip");
                None
            }
        }
    }

    /// The achievements the impact screen shows, with earned flags computed
    /// from the cached impact (nothing earned before the first fetch).
    pub async fn achievements(&self) -> Vec<AchievementStatus> {
        let guard = self.impact.read().await;
        let empty;
        let impact = match guard.as_ref() {
            Some(impact) => impact,
            None => {
                empty = Impact::new(Uuid::nil());
                &empty
            }
        };

        DISPLAYED
            .iter()
            .filter_map(|id| achievement::find(id))
            .map(|a| AchievementStatus::new(a, impact))
            .collect()
    }

    pub async fn impact_summary(&self) -> Option<ImpactSummary> {
        self.impact.read().await.as_ref().map(ImpactSummary::from_impact)
    }
}
