// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trip search state.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ApiClient, AuthStore, ClientError};
use crate::models::{Location, NewTripRequest, RideOffer};
use crate::routes::trips::TripRequestResponse;
use crate::services::RideMatch;

/// Fixed point placeholder coordinates are scattered around.
const PLACEHOLDER_CENTER: (f64, f64) = (37.7749, -122.4194);
const PLACEHOLDER_SPREAD_DEG: f64 = 0.1;

/// The trip being searched, as submitted plus what the server returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentTrip {
    pub id: Option<Uuid>,
    #[serde(flatten)]
    pub request: NewTripRequest,
    #[serde(default)]
    pub matches: Vec<RideMatch>,
}

pub struct TripStore {
    api: ApiClient,
    auth: Arc<AuthStore>,
    current_trip: RwLock<Option<CurrentTrip>>,
    available_rides: RwLock<Vec<RideOffer>>,
    is_searching: RwLock<bool>,
}

impl TripStore {
    pub fn new(api: ApiClient, auth: Arc<AuthStore>) -> Self {
        Self {
            api,
            auth,
            current_trip: RwLock::new(None),
            available_rides: RwLock::new(Vec::new()),
            is_searching: RwLock::new(false),
        }
    }

    pub async fn current_trip(&self) -> Option<CurrentTrip> {
        self.current_trip.read().await.clone()
    }

    pub async fn available_rides(&self) -> Vec<RideOffer> {
        self.available_rides.read().await.clone()
    }

    pub async fn is_searching(&self) -> bool {
        *self.is_searching.read().await
    }

    /// Submit a trip request and keep it, with its id and matches, as the
    /// current trip.
    pub async fn search_trip(&self, trip: NewTripRequest) -> Result<CurrentTrip, ClientError> {
        *self.is_searching.write().await = true;
        let result = self.submit(&trip).await;
        *self.is_searching.write().await = false;

        let response = result?;
        tracing::info!(
            trip_id = %response.trip_id,
            matches = response.matches.len(),
            "Trip search complete"
        );

        let current = CurrentTrip {
            id: Some(response.trip_id),
            request: trip,
            matches: response.matches,
        };
        *self.current_trip.write().await = Some(current.clone());
        Ok(current)
    }

    async fn submit(&self, trip: &NewTripRequest) -> Result<TripRequestResponse, ClientError> {
        let token = self.auth.token().await.ok_or(ClientError::NotAuthenticated)?;
        self.api.request_trip(&token, trip).await
    }

    /// Refresh the open ride list. Failures are logged and the previous list
    /// is kept.
    pub async fn get_available_rides(&self) {
        let Some(token) = self.auth.token().await else {
            tracing::warn!("Failed to fetch rides: not authenticated");
            return;
        };

        match self.api.available_rides(&token).await {
            Ok(rides) => *self.available_rides.write().await = rides,
            Err(e) => tracing::warn!(error = %e, "Failed to fetch rides"),
        }
    }

    pub async fn clear_trip(&self) {
        *self.current_trip.write().await = None;
    }
}

/// Stand-in coordinates for a typed address.
///
/// The app has no geocoder, so it scatters points up to 0.1 degrees north and
/// east of a fixed center.
pub fn placeholder_location(address: impl Into<String>) -> Location {
    let mut rng = rand::thread_rng();
    let (lat, lon) = PLACEHOLDER_CENTER;
    Location::new(
        lat + rng.gen_range(0.0..PLACEHOLDER_SPREAD_DEG),
        lon + rng.gen_range(0.0..PLACEHOLDER_SPREAD_DEG),
        address,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_location_bounds() {
        for _ in 0..100 {
            let loc = placeholder_location("Main Library");
            assert_eq!(loc.address, "Main Library");
            assert!(loc.latitude >= 37.7749 && loc.latitude <= 37.8749);
            assert!(loc.longitude >= -122.4194 && loc.longitude <= -122.3194);
        }
    }

    #[test]
    fn test_current_trip_flattens_request() {
        let trip = CurrentTrip {
            id: None,
            request: NewTripRequest {
                origin: Location::new(37.78, -122.41, "Home"),
                destination: Location::new(37.87, -122.26, "Campus"),
                departure_time: chrono::Utc::now(),
                flexibility_minutes: 15,
                mode: Default::default(),
                seats_needed: 1,
                is_recurring: false,
                recurring_days: vec![],
            },
            matches: vec![],
        };

        let json = serde_json::to_value(&trip).unwrap();
        assert_eq!(json["origin"]["address"], "Home");
        assert_eq!(json["mode"], "carpool");
        assert!(json["id"].is_null());
    }
}
