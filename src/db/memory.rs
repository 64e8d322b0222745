// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process store with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profiles, unique by case-insensitive email)
//! - Impacts (one aggregate per user)
//! - Trip requests
//! - Ride offers
//!
//! Each collection is a `DashMap`; read-modify-write operations hold the
//! entry's shard lock for the duration of the closure, so concurrent
//! updates to the same record never lose writes.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Impact, RideOffer, RideStatus, TripRequest, TripStatus, UserProfile};

/// Upper bound on rides returned by a single listing.
pub const MAX_RIDES_LISTED: usize = 100;

#[derive(Default)]
struct Collections {
    users: DashMap<Uuid, UserProfile>,
    /// Normalized email -> user ID
    emails: DashMap<String, Uuid>,
    impacts: DashMap<Uuid, Impact>,
    trips: DashMap<Uuid, TripRequest>,
    rides: DashMap<Uuid, RideOffer>,
}

/// Shared handle to the store. Cloning is cheap.
#[derive(Clone, Default)]
pub struct Db {
    inner: Arc<Collections>,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Db {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Insert a new user. Fails if the email is already registered.
    pub fn create_user(&self, user: UserProfile) -> Result<(), AppError> {
        match self.inner.emails.entry(normalize_email(&user.email)) {
            Entry::Occupied(_) => Err(AppError::BadRequest(
                "Email already registered".to_string(),
            )),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
                self.inner.users.insert(user.id, user);
                Ok(())
            }
        }
    }

    pub fn get_user(&self, user_id: Uuid) -> Option<UserProfile> {
        self.inner.users.get(&user_id).map(|u| u.clone())
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<UserProfile> {
        let user_id = *self.inner.emails.get(&normalize_email(email))?;
        self.get_user(user_id)
    }

    /// Modify a user in place.
    pub fn update_user<R>(
        &self,
        user_id: Uuid,
        f: impl FnOnce(&mut UserProfile) -> R,
    ) -> Result<R, AppError> {
        let mut user = self
            .inner
            .users
            .get_mut(&user_id)
            .ok_or(AppError::UnknownUser)?;
        Ok(f(&mut *user))
    }

    // ─── Impact Operations ───────────────────────────────────────

    /// Get a user's impact, creating a zeroed record if none exists yet.
    pub fn get_or_create_impact(&self, user_id: Uuid) -> Impact {
        self.inner
            .impacts
            .entry(user_id)
            .or_insert_with(|| Impact::new(user_id))
            .clone()
    }

    /// Atomically modify a user's impact (created if missing).
    pub fn update_impact<R>(&self, user_id: Uuid, f: impl FnOnce(&mut Impact) -> R) -> R {
        let mut impact = self
            .inner
            .impacts
            .entry(user_id)
            .or_insert_with(|| Impact::new(user_id));
        f(&mut *impact)
    }

    // ─── Trip Operations ─────────────────────────────────────────

    pub fn insert_trip(&self, trip: TripRequest) {
        self.inner.trips.insert(trip.id, trip);
    }

    pub fn get_trip(&self, trip_id: Uuid) -> Option<TripRequest> {
        self.inner.trips.get(&trip_id).map(|t| t.clone())
    }

    /// Modify a trip in place.
    pub fn update_trip<R>(
        &self,
        trip_id: Uuid,
        f: impl FnOnce(&mut TripRequest) -> R,
    ) -> Result<R, AppError> {
        let mut trip = self
            .inner
            .trips
            .get_mut(&trip_id)
            .ok_or_else(|| AppError::NotFound(format!("Trip {} not found", trip_id)))?;
        Ok(f(&mut *trip))
    }

    /// Trips placed on a ride, in request order.
    pub fn trips_for_ride(&self, ride_id: Uuid) -> Vec<TripRequest> {
        let mut trips: Vec<TripRequest> = self
            .inner
            .trips
            .iter()
            .filter(|t| t.matched_ride == Some(ride_id) && t.status == TripStatus::Matched)
            .map(|t| t.clone())
            .collect();
        trips.sort_by_key(|t| t.created_at);
        trips
    }

    // ─── Ride Operations ─────────────────────────────────────────

    pub fn insert_ride(&self, ride: RideOffer) {
        self.inner.rides.insert(ride.id, ride);
    }

    pub fn get_ride(&self, ride_id: Uuid) -> Option<RideOffer> {
        self.inner.rides.get(&ride_id).map(|r| r.clone())
    }

    /// Modify a ride in place.
    pub fn update_ride<R>(
        &self,
        ride_id: Uuid,
        f: impl FnOnce(&mut RideOffer) -> R,
    ) -> Result<R, AppError> {
        let mut ride = self
            .inner
            .rides
            .get_mut(&ride_id)
            .ok_or_else(|| AppError::NotFound(format!("Ride {} not found", ride_id)))?;
        Ok(f(&mut *ride))
    }

    /// Rides still accepting passengers, soonest departure first.
    pub fn available_rides(&self) -> Vec<RideOffer> {
        let mut rides: Vec<RideOffer> = self
            .inner
            .rides
            .iter()
            .filter(|r| r.status == RideStatus::Available)
            .map(|r| r.clone())
            .collect();
        rides.sort_by_key(|r| r.departure_time);
        rides.truncate(MAX_RIDES_LISTED);
        rides
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, NewRideOffer};
    use chrono::{Duration, Utc};

    fn make_user(email: &str) -> UserProfile {
        UserProfile::new(
            email.to_string(),
            "hash".to_string(),
            "Test User".to_string(),
            "Uni".to_string(),
            String::new(),
        )
    }

    fn make_ride(offset_minutes: i64) -> RideOffer {
        NewRideOffer {
            origin: Location::new(37.70, -122.40, "A"),
            destination: Location::new(37.80, -122.40, "B"),
            departure_time: Utc::now() + Duration::minutes(offset_minutes),
            available_seats: 2,
            route_waypoints: vec![],
            price_per_seat: 0.0,
        }
        .into_offer(Uuid::new_v4())
    }

    #[test]
    fn test_email_uniqueness_is_case_insensitive() {
        let db = Db::new();
        db.create_user(make_user("Ada@Uni.edu")).unwrap();

        let dup = db.create_user(make_user(" ada@uni.edu"));
        assert!(matches!(dup, Err(AppError::BadRequest(_))));
        assert!(db.find_user_by_email("ADA@UNI.EDU").is_some());
    }

    #[test]
    fn test_get_or_create_impact_is_idempotent() {
        let db = Db::new();
        let user_id = Uuid::new_v4();

        db.update_impact(user_id, |i| i.total_trips = 3);
        let impact = db.get_or_create_impact(user_id);

        assert_eq!(impact.total_trips, 3);
    }

    #[test]
    fn test_available_rides_sorted_and_filtered() {
        let db = Db::new();
        let later = make_ride(60);
        let sooner = make_ride(10);
        let mut full = make_ride(5);
        full.status = RideStatus::Full;

        db.insert_ride(later.clone());
        db.insert_ride(sooner.clone());
        db.insert_ride(full);

        let rides = db.available_rides();
        assert_eq!(
            rides.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![sooner.id, later.id]
        );
    }

    #[test]
    fn test_available_rides_capped() {
        let db = Db::new();
        for i in 0..(MAX_RIDES_LISTED as i64 + 20) {
            db.insert_ride(make_ride(i));
        }

        let rides = db.available_rides();
        assert_eq!(rides.len(), MAX_RIDES_LISTED);
        // The soonest departures are the ones kept
        assert!(rides
            .windows(2)
            .all(|w| w[0].departure_time <= w[1].departure_time));
        let last_kept = rides[MAX_RIDES_LISTED - 1].departure_time;
        assert!(last_kept < Utc::now() + Duration::minutes(MAX_RIDES_LISTED as i64));
    }

    #[test]
    fn test_update_missing_ride_is_not_found() {
        let db = Db::new();
        let result = db.update_ride(Uuid::new_v4(), |_| ());
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_concurrent_impact_updates_are_not_lost() {
        let db = Db::new();
        let user_id = Uuid::new_v4();

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let db = db.clone();
                tokio::spawn(async move { db.update_impact(user_id, |i| i.total_trips += 1) })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(db.get_or_create_impact(user_id).total_trips, 50);
    }
}
