// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! EcoCommute: sustainable commuting for university campuses
//!
//! This crate provides the backend API (ride matching, carbon accounting,
//! accounts) and a typed client with the state stores the mobile app is
//! built on.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Db;
use services::{CarbonCalculator, RideMatcher};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub matcher: RideMatcher,
    pub carbon: CarbonCalculator,
}

impl AppState {
    /// State with an empty store and default matching limits.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            db: Db::new(),
            matcher: RideMatcher::default(),
            carbon: CarbonCalculator,
        }
    }
}
