// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client for the EcoCommute API.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::ClientError;
use crate::config::Config;
use crate::error::ErrorResponse;
use crate::models::achievement::AchievementStatus;
use crate::models::{Impact, NewTripRequest, RideOffer};
use crate::routes::auth::{LoginRequest, RegisterRequest, TokenResponse};
use crate::routes::impact::{RecordTripRequest, RecordTripResponse};
use crate::routes::trips::TripRequestResponse;

/// EcoCommute API client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Client pointed at the configured `API_URL`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ClientError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.post_json("/api/auth/login", None, &body).await
    }

    pub async fn register(&self, data: &RegisterRequest) -> Result<TokenResponse, ClientError> {
        self.post_json("/api/auth/register", None, data).await
    }

    pub async fn fetch_impact(&self, token: &str) -> Result<Impact, ClientError> {
        self.get_json("/api/impact", token).await
    }

    pub async fn record_trip(
        &self,
        token: &str,
        data: &RecordTripRequest,
    ) -> Result<RecordTripResponse, ClientError> {
        self.post_json("/api/impact/record-trip", Some(token), data)
            .await
    }

    pub async fn achievements(&self, token: &str) -> Result<Vec<AchievementStatus>, ClientError> {
        self.get_json("/api/impact/achievements", token).await
    }

    pub async fn request_trip(
        &self,
        token: &str,
        trip: &NewTripRequest,
    ) -> Result<TripRequestResponse, ClientError> {
        self.post_json("/api/trips/request", Some(token), trip).await
    }

    pub async fn available_rides(&self, token: &str) -> Result<Vec<RideOffer>, ClientError> {
        self.get_json("/api/rides/available", token).await
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T, ClientError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .send()
            .await?;

        check_response_json(response).await
    }

    /// Generic POST of a JSON body with JSON response.
    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<T, ClientError> {
        let mut request = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        check_response_json(request.send().await?).await
    }
}

/// Check response status and parse the JSON body.
///
/// Error bodies are `{error, detail}`. Anything else (a proxy page, an
/// empty body) yields an error with neither code nor detail.
async fn check_response_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let (code, detail) = match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(err) => (Some(err.error), err.detail),
        Err(_) => {
            tracing::debug!(status = status.as_u16(), body = %body, "Non-API error response");
            (None, None)
        }
    };

    if status.as_u16() == 401 {
        tracing::debug!(detail = ?detail, "API rejected credentials");
    }

    Err(ClientError::Api {
        status: status.as_u16(),
        code,
        detail,
    })
}
