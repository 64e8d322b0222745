// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod achievement;
pub mod impact;
pub mod trip;
pub mod user;

pub use achievement::{Achievement, AchievementStatus};
pub use impact::{Impact, TripOutcome};
pub use trip::{
    Location, NewRideOffer, NewTripRequest, RideOffer, RideStatus, SeatError, TravelMode,
    TripRequest, TripStatus,
};
pub use user::{ProfileUpdate, User, UserProfile};
