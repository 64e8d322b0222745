// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ride matching and pickup ordering.
//!
//! A trip request is scored against each available ride offer on four
//! criteria (route overlap, departure time, free seats, pickup/dropoff
//! proximity). Route and time act as hard gates: a request whose ends lie
//! off the driver's route, or whose departure falls outside its flexibility
//! window, scores zero and is never offered.

use chrono::{DateTime, Utc};
use geo::{Distance, Geodesic, Point};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Location, RideOffer, RideStatus, TripRequest};

const ROUTE_WEIGHT: f64 = 40.0;
const TIME_WEIGHT: f64 = 30.0;
const CAPACITY_WEIGHT: f64 = 20.0;
const CONVENIENCE_WEIGHT: f64 = 10.0;

/// Combined pickup + dropoff walk at which convenience drops to zero.
const CONVENIENCE_RANGE_KM: f64 = 10.0;

/// Below this, two points are considered the same place.
const SAME_PLACE_KM: f64 = 1e-6;

/// A candidate ride for a trip request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideMatch {
    pub ride: RideOffer,
    /// 0..=100
    pub score: f64,
    pub estimated_pickup_time: DateTime<Utc>,
    pub estimated_detour_minutes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaypointKind {
    Pickup,
    Dropoff,
    Destination,
}

/// One stop in a driver's optimized route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    #[serde(rename = "type")]
    pub kind: WaypointKind,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// User picked up or dropped off here
    pub passenger: Option<Uuid>,
    pub order: u32,
}

impl Waypoint {
    fn at(kind: WaypointKind, location: &Location, passenger: Option<Uuid>, order: u32) -> Self {
        Self {
            kind,
            latitude: location.latitude,
            longitude: location.longitude,
            address: passenger.map(|_| location.address.clone()),
            passenger,
            order,
        }
    }
}

/// Tunable limits for matching.
#[derive(Debug, Clone)]
pub struct RideMatcher {
    /// Maximum extra distance as a fraction of the driver's direct route
    pub max_detour_ratio: f64,
    /// Departure difference at which the time score reaches zero
    pub time_window_minutes: f64,
    /// Number of matches returned per request
    pub top_n: usize,
    /// Reported to riders until real routing is available
    pub estimated_detour_minutes: u32,
}

impl Default for RideMatcher {
    fn default() -> Self {
        Self {
            max_detour_ratio: 0.15,
            time_window_minutes: 30.0,
            top_n: 3,
            estimated_detour_minutes: 5,
        }
    }
}

/// Geodesic (WGS84) distance in kilometres.
pub fn distance_km(a: &Location, b: &Location) -> f64 {
    point_distance_km(a.point(), b.point())
}

fn point_distance_km(a: Point<f64>, b: Point<f64>) -> f64 {
    Geodesic.distance(a, b) / 1000.0
}

/// Where a passenger boards or leaves the ride.
fn stop_for(trip: &TripRequest, kind: WaypointKind) -> &Location {
    match kind {
        WaypointKind::Pickup => &trip.origin,
        _ => &trip.destination,
    }
}

/// Total length of a path through the given stops.
pub fn route_distance_km(stops: &[Location]) -> f64 {
    stops.windows(2).map(|w| distance_km(&w[0], &w[1])).sum()
}

impl RideMatcher {
    /// Extra distance (as a fraction of the direct route) needed to pass
    /// through `point` on the way from `origin` to `destination`.
    pub fn detour_ratio(
        &self,
        point: &Location,
        origin: &Location,
        destination: &Location,
    ) -> f64 {
        let direct = distance_km(origin, destination);
        let via = distance_km(origin, point) + distance_km(point, destination);

        if direct < SAME_PLACE_KM {
            // A route that goes nowhere only passes through its own endpoint.
            return if via < SAME_PLACE_KM { 0.0 } else { f64::INFINITY };
        }
        (via - direct) / direct
    }

    /// Whether `point` lies on the route, and its detour ratio.
    pub fn is_on_route(
        &self,
        point: &Location,
        origin: &Location,
        destination: &Location,
    ) -> (bool, f64) {
        let detour = self.detour_ratio(point, origin, destination);
        (detour <= self.max_detour_ratio, detour)
    }

    /// Whether two departures fall within `flexibility_minutes`, and a
    /// closeness score in 0..=1.
    pub fn time_window(
        &self,
        a: DateTime<Utc>,
        b: DateTime<Utc>,
        flexibility_minutes: u32,
    ) -> (bool, f64) {
        let diff_minutes = (a - b).num_seconds().abs() as f64 / 60.0;
        let within = diff_minutes <= flexibility_minutes as f64;
        let score = (1.0 - diff_minutes / self.time_window_minutes).max(0.0);
        (within, score)
    }

    /// Compatibility score between a request and an offer, 0 if incompatible.
    pub fn score(&self, request: &TripRequest, ride: &RideOffer) -> f64 {
        let (origin_on_route, origin_detour) =
            self.is_on_route(&request.origin, &ride.origin, &ride.destination);
        let (dest_on_route, dest_detour) =
            self.is_on_route(&request.destination, &ride.origin, &ride.destination);
        if !(origin_on_route && dest_on_route) {
            return 0.0;
        }
        let mut score = ROUTE_WEIGHT * (1.0 - (origin_detour + dest_detour) / 2.0);

        let (in_window, time_score) = self.time_window(
            request.departure_time,
            ride.departure_time,
            request.flexibility_minutes,
        );
        if !in_window {
            return 0.0;
        }
        score += TIME_WEIGHT * time_score;

        if ride.available_seats < request.seats_needed {
            return 0.0;
        }
        score += CAPACITY_WEIGHT;

        let walk_km = distance_km(&request.origin, &ride.origin)
            + distance_km(&request.destination, &ride.destination);
        score += CONVENIENCE_WEIGHT * (1.0 - (walk_km / CONVENIENCE_RANGE_KM).min(1.0));

        score
    }

    /// Best-scoring available rides for a request, highest first.
    pub fn find_matches(&self, request: &TripRequest, rides: &[RideOffer]) -> Vec<RideMatch> {
        let mut matches: Vec<RideMatch> = rides
            .iter()
            .filter(|ride| ride.status == RideStatus::Available)
            .filter_map(|ride| {
                let score = self.score(request, ride);
                (score > 0.0).then(|| RideMatch {
                    ride: ride.clone(),
                    score,
                    estimated_pickup_time: ride.departure_time,
                    estimated_detour_minutes: self.estimated_detour_minutes,
                })
            })
            .collect();

        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(self.top_n);

        tracing::debug!(
            trip_id = %request.id,
            candidates = rides.len(),
            matched = matches.len(),
            "Ride matching complete"
        );
        matches
    }

    /// Order pickups and dropoffs by greedy nearest neighbour.
    ///
    /// All pickups come before any dropoff, so every passenger is on board
    /// before the first one leaves.
    pub fn optimize_route(
        &self,
        driver_location: &Location,
        destination: &Location,
        passengers: &[TripRequest],
    ) -> Vec<Waypoint> {
        let mut waypoints = Vec::with_capacity(passengers.len() * 2 + 2);
        waypoints.push(Waypoint::at(WaypointKind::Pickup, driver_location, None, 0));

        let mut current = driver_location.clone();
        let mut order = 1;

        for kind in [WaypointKind::Pickup, WaypointKind::Dropoff] {
            let mut remaining: Vec<&TripRequest> = passengers.iter().collect();
            while let Some((idx, _)) = remaining
                .iter()
                .enumerate()
                .map(|(i, trip)| (i, distance_km(&current, stop_for(trip, kind))))
                .min_by(|a, b| a.1.total_cmp(&b.1))
            {
                let nearest = remaining.remove(idx);
                let stop = stop_for(nearest, kind);

                waypoints.push(Waypoint::at(kind, stop, Some(nearest.user_id), order));
                current = stop.clone();
                order += 1;
            }
        }

        waypoints.push(Waypoint::at(WaypointKind::Destination, destination, None, order));
        waypoints
    }
}
