// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trip requests and ride offers.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Location, NewRideOffer, NewTripRequest, RideOffer, TripStatus};
use crate::services::matching::{route_distance_km, RideMatch, Waypoint};
use crate::AppState;

use super::JsonBody;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/trips/request", post(request_trip))
        .route("/api/rides/offer", post(offer_ride))
        .route("/api/rides/available", get(available_rides))
        .route("/api/rides/{ride_id}/join", post(join_ride))
        .route("/api/rides/{ride_id}/route", get(route_plan))
}

// ─── Trip Requests ───────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequestResponse {
    pub trip_id: Uuid,
    pub matches: Vec<RideMatch>,
    pub message: String,
}

/// Store a trip request and return the best current ride matches.
async fn request_trip(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    JsonBody(payload): JsonBody<NewTripRequest>,
) -> Result<Json<TripRequestResponse>> {
    payload.validate()?;

    let trip = payload.into_trip(user.user_id);
    let trip_id = trip.id;
    state.db.insert_trip(trip.clone());

    // A driver's own offers are never candidates for their trip.
    let rides: Vec<RideOffer> = state
        .db
        .available_rides()
        .into_iter()
        .filter(|r| r.driver_id != user.user_id)
        .collect();
    let matches = state.matcher.find_matches(&trip, &rides);

    tracing::info!(
        user_id = %user.user_id,
        trip_id = %trip_id,
        mode = trip.mode.as_str(),
        matches = matches.len(),
        "Trip requested"
    );

    Ok(Json(TripRequestResponse {
        trip_id,
        message: format!("Found {} matching rides", matches.len()),
        matches,
    }))
}

// ─── Ride Offers ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RideOfferResponse {
    pub ride_id: Uuid,
    pub message: String,
}

async fn offer_ride(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    JsonBody(payload): JsonBody<NewRideOffer>,
) -> Result<Json<RideOfferResponse>> {
    if !user.is_driver {
        return Err(AppError::BadRequest(
            "User must be registered as driver".to_string(),
        ));
    }
    payload.validate()?;

    let ride = payload.into_offer(user.user_id);
    let ride_id = ride.id;
    state.db.insert_ride(ride);

    tracing::info!(user_id = %user.user_id, ride_id = %ride_id, "Ride offered");

    Ok(Json(RideOfferResponse {
        ride_id,
        message: "Ride offer created successfully".to_string(),
    }))
}

/// Rides still accepting passengers.
async fn available_rides(State(state): State<Arc<AppState>>) -> Json<Vec<RideOffer>> {
    Json(state.db.available_rides())
}

// ─── Joining & Route Planning ────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRideRequest {
    pub trip_id: Uuid,
}

/// Place one of the caller's searching trips on a ride.
async fn join_ride(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(ride_id): Path<Uuid>,
    JsonBody(payload): JsonBody<JoinRideRequest>,
) -> Result<Json<RideOffer>> {
    // Claim the trip first so a trip can only ever be placed on one ride.
    let seats_needed = state.db.update_trip(payload.trip_id, |trip| {
        if trip.user_id != user.user_id {
            return Err(AppError::Forbidden("Trip belongs to another user".to_string()));
        }
        if trip.status != TripStatus::Searching {
            return Err(AppError::BadRequest("Trip is no longer searching".to_string()));
        }
        trip.status = TripStatus::Matched;
        trip.matched_ride = Some(ride_id);
        Ok(trip.seats_needed)
    })??;

    let reserved = state
        .db
        .update_ride(ride_id, |ride| {
            ride.reserve_seats(user.user_id, seats_needed)
                .map(|()| ride.clone())
        })
        .and_then(|r| r.map_err(|e| AppError::BadRequest(e.to_string())));

    match reserved {
        Ok(ride) => {
            tracing::info!(
                user_id = %user.user_id,
                ride_id = %ride_id,
                trip_id = %payload.trip_id,
                seats_left = ride.available_seats,
                "Passenger joined ride"
            );
            Ok(Json(ride))
        }
        Err(err) => {
            // Release the trip so it can be placed elsewhere.
            state.db.update_trip(payload.trip_id, |trip| {
                trip.status = TripStatus::Searching;
                trip.matched_ride = None;
            })?;
            Err(err)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutePlan {
    pub ride_id: Uuid,
    pub waypoints: Vec<Waypoint>,
    pub total_distance_km: f64,
}

/// Pickup/dropoff order for the driver of a ride.
async fn route_plan(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(ride_id): Path<Uuid>,
) -> Result<Json<RoutePlan>> {
    let ride = state
        .db
        .get_ride(ride_id)
        .ok_or_else(|| AppError::NotFound(format!("Ride {} not found", ride_id)))?;
    if ride.driver_id != user.user_id {
        return Err(AppError::Forbidden(
            "Only the driver can view the route plan".to_string(),
        ));
    }

    let passengers = state.db.trips_for_ride(ride_id);
    let waypoints = state
        .matcher
        .optimize_route(&ride.origin, &ride.destination, &passengers);

    let stops: Vec<Location> = waypoints
        .iter()
        .map(|w| Location::new(w.latitude, w.longitude, ""))
        .collect();

    Ok(Json(RoutePlan {
        ride_id,
        total_distance_km: route_distance_km(&stops),
        waypoints,
    }))
}
