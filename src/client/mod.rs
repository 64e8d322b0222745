// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed client for the EcoCommute API.
//!
//! Mirrors what the mobile app does: an HTTP client for each API call, a
//! small key/value store for the session, and three state containers
//! (auth, trip search, impact) that keep the latest server response.

pub mod api;
pub mod auth_store;
pub mod impact_store;
pub mod storage;
pub mod trip_store;

pub use api::ApiClient;
pub use auth_store::{AuthState, AuthStore};
pub use impact_store::{ImpactStore, ImpactSummary};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, TOKEN_KEY, USER_KEY};
pub use trip_store::{placeholder_location, CurrentTrip, TripStore};

/// Client-side errors
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response. `code` and `detail` are only set when the body was
    /// an API error; `detail` is the message meant for the user.
    #[error("HTTP {status}: {}", .detail.as_deref().or(.code.as_deref()).unwrap_or("no detail"))]
    Api {
        status: u16,
        code: Option<String>,
        detail: Option<String>,
    },

    /// Login or registration rejected, with the message to show the user.
    #[error("{0}")]
    AuthFailed(String),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}
