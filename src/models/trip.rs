// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trip requests, ride offers and the locations they connect.

use chrono::{DateTime, Utc};
use geo::Point;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

/// A geographic point with a human-readable address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/types/generated/")
)]
pub struct Location {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[validate(length(max = 200))]
    pub address: String,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64, address: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            address: address.into(),
        }
    }

    /// As a geo point (x = longitude, y = latitude).
    pub fn point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

/// How a trip is travelled.
///
/// Unknown strings deserialize to `Other` so older clients keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/types/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    #[default]
    Carpool,
    Transit,
    Bike,
    Walk,
    Electric,
    Hybrid,
    SoloCar,
    #[serde(other)]
    Other,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Carpool => "carpool",
            TravelMode::Transit => "transit",
            TravelMode::Bike => "bike",
            TravelMode::Walk => "walk",
            TravelMode::Electric => "electric",
            TravelMode::Hybrid => "hybrid",
            TravelMode::SoloCar => "solo_car",
            TravelMode::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    #[default]
    Searching,
    Matched,
    Active,
    Completed,
    Cancelled,
}

/// A stored request for a ride.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub origin: Location,
    pub destination: Location,
    pub departure_time: DateTime<Utc>,
    /// Accepted departure offset in either direction
    pub flexibility_minutes: u32,
    pub mode: TravelMode,
    pub seats_needed: u32,
    pub is_recurring: bool,
    /// e.g. ["monday", "wednesday"]
    pub recurring_days: Vec<String>,
    pub status: TripStatus,
    /// Ride this trip was placed on, once joined
    pub matched_ride: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

fn default_flexibility() -> u32 {
    15
}
fn default_seats() -> u32 {
    1
}

/// Body of `POST /api/trips/request`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewTripRequest {
    #[validate(nested)]
    pub origin: Location,
    #[validate(nested)]
    pub destination: Location,
    pub departure_time: DateTime<Utc>,
    #[serde(default = "default_flexibility")]
    #[validate(range(max = 180))]
    pub flexibility_minutes: u32,
    #[serde(default)]
    pub mode: TravelMode,
    #[serde(default = "default_seats")]
    #[validate(range(min = 1, max = 8))]
    pub seats_needed: u32,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurring_days: Vec<String>,
}

impl NewTripRequest {
    pub fn into_trip(self, user_id: Uuid) -> TripRequest {
        TripRequest {
            id: Uuid::new_v4(),
            user_id,
            origin: self.origin,
            destination: self.destination,
            departure_time: self.departure_time,
            flexibility_minutes: self.flexibility_minutes,
            mode: self.mode,
            seats_needed: self.seats_needed,
            is_recurring: self.is_recurring,
            recurring_days: self.recurring_days,
            status: TripStatus::Searching,
            matched_ride: None,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideStatus {
    #[default]
    Available,
    Full,
    Active,
    Completed,
}

/// A driver's offer to share a ride.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideOffer {
    pub id: Uuid,
    pub driver_id: Uuid,
    pub origin: Location,
    pub destination: Location,
    pub departure_time: DateTime<Utc>,
    pub available_seats: u32,
    #[serde(default)]
    pub route_waypoints: Vec<Location>,
    /// Passenger user IDs
    #[serde(default)]
    pub passengers: Vec<Uuid>,
    #[serde(default)]
    pub price_per_seat: f64,
    #[serde(default)]
    pub status: RideStatus,
    pub created_at: DateTime<Utc>,
}

/// Reasons a seat reservation is refused.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SeatError {
    #[error("Ride is not accepting passengers")]
    NotAvailable,

    #[error("Not enough seats available")]
    InsufficientSeats,

    #[error("Already a passenger on this ride")]
    AlreadyJoined,

    #[error("Drivers cannot join their own ride")]
    OwnRide,
}

impl RideOffer {
    /// Reserve seats for a passenger. The ride becomes `Full` at zero seats.
    pub fn reserve_seats(&mut self, passenger: Uuid, seats: u32) -> Result<(), SeatError> {
        if passenger == self.driver_id {
            return Err(SeatError::OwnRide);
        }
        if self.status != RideStatus::Available {
            return Err(SeatError::NotAvailable);
        }
        if self.passengers.contains(&passenger) {
            return Err(SeatError::AlreadyJoined);
        }
        if self.available_seats < seats {
            return Err(SeatError::InsufficientSeats);
        }

        self.available_seats -= seats;
        self.passengers.push(passenger);
        if self.available_seats == 0 {
            self.status = RideStatus::Full;
        }
        Ok(())
    }
}

/// Body of `POST /api/rides/offer`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewRideOffer {
    #[validate(nested)]
    pub origin: Location,
    #[validate(nested)]
    pub destination: Location,
    pub departure_time: DateTime<Utc>,
    #[validate(range(min = 1, max = 8))]
    pub available_seats: u32,
    #[serde(default)]
    #[validate(nested)]
    pub route_waypoints: Vec<Location>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 500.0))]
    pub price_per_seat: f64,
}

impl NewRideOffer {
    pub fn into_offer(self, driver_id: Uuid) -> RideOffer {
        RideOffer {
            id: Uuid::new_v4(),
            driver_id,
            origin: self.origin,
            destination: self.destination,
            departure_time: self.departure_time,
            available_seats: self.available_seats,
            route_waypoints: self.route_waypoints,
            passengers: Vec::new(),
            price_per_seat: self.price_per_seat,
            status: RideStatus::Available,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_offer(seats: u32) -> RideOffer {
        NewRideOffer {
            origin: Location::new(37.77, -122.42, "Mission St"),
            destination: Location::new(37.87, -122.26, "Campus"),
            departure_time: Utc::now(),
            available_seats: seats,
            route_waypoints: vec![],
            price_per_seat: 0.0,
        }
        .into_offer(Uuid::new_v4())
    }

    #[test]
    fn test_unknown_mode_deserializes_to_other() {
        let mode: TravelMode = serde_json::from_str("\"scooter\"").unwrap();
        assert_eq!(mode, TravelMode::Other);
        let mode: TravelMode = serde_json::from_str("\"solo_car\"").unwrap();
        assert_eq!(mode, TravelMode::SoloCar);
    }

    #[test]
    fn test_reserve_last_seat_marks_full() {
        let mut offer = make_offer(2);
        let rider = Uuid::new_v4();

        offer.reserve_seats(rider, 2).unwrap();

        assert_eq!(offer.available_seats, 0);
        assert_eq!(offer.status, RideStatus::Full);
        assert_eq!(offer.passengers, vec![rider]);
        assert_eq!(
            offer.reserve_seats(Uuid::new_v4(), 1),
            Err(SeatError::NotAvailable)
        );
    }

    #[test]
    fn test_reserve_rejects_driver_duplicates_and_overbooking() {
        let mut offer = make_offer(2);
        let rider = Uuid::new_v4();

        assert_eq!(
            offer.reserve_seats(offer.driver_id, 1),
            Err(SeatError::OwnRide)
        );
        assert_eq!(
            offer.reserve_seats(rider, 3),
            Err(SeatError::InsufficientSeats)
        );
        offer.reserve_seats(rider, 1).unwrap();
        assert_eq!(offer.reserve_seats(rider, 1), Err(SeatError::AlreadyJoined));
        assert_eq!(offer.status, RideStatus::Available);
    }

    #[test]
    fn test_new_trip_request_defaults() {
        let req: NewTripRequest = serde_json::from_value(serde_json::json!({
            "origin": { "latitude": 37.8, "longitude": -122.4, "address": "Home" },
            "destination": { "latitude": 37.87, "longitude": -122.26, "address": "Campus" },
            "departure_time": "2026-03-02T08:30:00Z"
        }))
        .unwrap();

        assert_eq!(req.flexibility_minutes, 15);
        assert_eq!(req.seats_needed, 1);
        assert_eq!(req.mode, TravelMode::Carpool);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_latitude_rejected() {
        let req = NewTripRequest {
            origin: Location::new(123.0, 0.0, "Nowhere"),
            destination: Location::new(0.0, 0.0, "Null Island"),
            departure_time: Utc::now(),
            flexibility_minutes: 15,
            mode: TravelMode::Bike,
            seats_needed: 1,
            is_recurring: false,
            recurring_days: vec![],
        };
        assert!(req.validate().is_err());
    }
}
