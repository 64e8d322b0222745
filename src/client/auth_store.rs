// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session state: who is logged in and with which token.

use std::sync::Arc;
use tokio::sync::RwLock;

use super::storage::{KeyValueStorage, TOKEN_KEY, USER_KEY};
use super::{ApiClient, ClientError};
use crate::models::User;
use crate::routes::auth::{RegisterRequest, TokenResponse};

#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    /// True until the persisted session has been checked once.
    pub is_loading: bool,
    pub is_authenticated: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            token: None,
            is_loading: true,
            is_authenticated: false,
        }
    }
}

pub struct AuthStore {
    api: ApiClient,
    storage: Arc<dyn KeyValueStorage>,
    state: RwLock<AuthState>,
}

impl AuthStore {
    pub fn new(api: ApiClient, storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            api,
            storage,
            state: RwLock::new(AuthState::default()),
        }
    }

    pub async fn snapshot(&self) -> AuthState {
        self.state.read().await.clone()
    }

    pub async fn token(&self) -> Option<String> {
        self.state.read().await.token.clone()
    }

    pub async fn user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated
    }

    /// Log in and persist the session.
    ///
    /// Errors carry the server's message, or "Login failed" when there is none.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ClientError> {
        let response = self
            .api
            .login(email, password)
            .await
            .map_err(|e| auth_failure(e, "Login failed"))?;
        self.establish(response).await
    }

    /// Create an account and persist the resulting session.
    pub async fn register(&self, data: &RegisterRequest) -> Result<User, ClientError> {
        let response = self
            .api
            .register(data)
            .await
            .map_err(|e| auth_failure(e, "Registration failed"))?;
        self.establish(response).await
    }

    /// Forget the session, on disk and in memory.
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(USER_KEY)?;

        let mut state = self.state.write().await;
        state.user = None;
        state.token = None;
        state.is_authenticated = false;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Restore a persisted session, if both entries are present and readable.
    pub async fn load_user(&self) {
        let restored = self.read_persisted();

        let mut state = self.state.write().await;
        match restored {
            Ok(Some((token, user))) => {
                tracing::debug!(user_id = %user.id, "Restored session");
                state.user = Some(user);
                state.token = Some(token);
                state.is_authenticated = true;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Ignoring unreadable stored session"),
        }
        state.is_loading = false;
    }

    fn read_persisted(&self) -> Result<Option<(String, User)>, ClientError> {
        let token = self.storage.get(TOKEN_KEY)?;
        let user = self.storage.get(USER_KEY)?;
        match (token, user) {
            (Some(token), Some(user)) => Ok(Some((token, serde_json::from_str(&user)?))),
            _ => Ok(None),
        }
    }

    async fn establish(&self, response: TokenResponse) -> Result<User, ClientError> {
        let TokenResponse {
            access_token, user, ..
        } = response;

        self.storage.set(TOKEN_KEY, &access_token)?;
        self.storage.set(USER_KEY, &serde_json::to_string(&user)?)?;

        let mut state = self.state.write().await;
        state.user = Some(user.clone());
        state.token = Some(access_token);
        state.is_authenticated = true;
        tracing::info!(user_id = %user.id, "Session established");
        Ok(user)
    }
}

fn auth_failure(err: ClientError, fallback: &str) -> ClientError {
    match err {
        ClientError::Api {
            detail: Some(detail),
            ..
        } if !detail.is_empty() => ClientError::AuthFailed(detail),
        other => {
            tracing::warn!(error = %other, "{}", fallback);
            ClientError::AuthFailed(fallback.to_string())
        }
    }
}
