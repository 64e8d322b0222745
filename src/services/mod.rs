// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod carbon;
pub mod matching;
pub mod password;

pub use carbon::{CarbonCalculator, CarbonSavings};
pub use matching::{RideMatch, RideMatcher, Waypoint, WaypointKind};
pub use password::{hash_password, verify_dummy_password, verify_password, PasswordError};
