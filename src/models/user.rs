// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

/// Full user profile as stored.
///
/// The password hash is never serialized, so the profile can be returned
/// directly from `/api/auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub full_name: String,
    pub phone: String,
    pub university: String,
    pub student_id: String,
    pub department: String,
    pub is_driver: bool,
    pub driver_info: Option<DriverInfo>,
    pub preferences: UserPreferences,
    pub emergency_contacts: Vec<EmergencyContact>,
    pub safety_rating: f64,
    pub total_ratings: u32,
    pub verified_badges: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Create a fresh profile for a newly registered user.
    pub fn new(
        email: String,
        password_hash: String,
        full_name: String,
        university: String,
        phone: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            full_name,
            phone,
            university,
            student_id: String::new(),
            department: String::new(),
            is_driver: false,
            driver_info: None,
            preferences: UserPreferences::default(),
            emergency_contacts: Vec::new(),
            safety_rating: 5.0,
            total_ratings: 0,
            verified_badges: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// The subset of the profile handed to clients after login.
    pub fn public(&self) -> User {
        User {
            id: self.id,
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            university: self.university.clone(),
            is_driver: self.is_driver,
        }
    }

    /// Apply a partial profile update. Fields left as `None` are untouched.
    ///
    /// Returns `true` if anything was changed.
    pub fn apply_update(&mut self, update: ProfileUpdate) -> bool {
        let mut changed = false;

        macro_rules! set {
            ($field:ident) => {
                if let Some(value) = update.$field {
                    self.$field = value;
                    changed = true;
                }
            };
        }

        set!(full_name);
        set!(phone);
        set!(department);
        set!(student_id);
        set!(is_driver);
        set!(preferences);
        set!(emergency_contacts);

        if let Some(info) = update.driver_info {
            self.driver_info = Some(info);
            changed = true;
        }

        changed
    }
}

/// Public user record stored by the mobile client under the `user` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/types/generated/")
)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub university: String,
    #[serde(default)]
    pub is_driver: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationLevel {
    Quiet,
    #[default]
    Moderate,
    Chatty,
}

/// Ride comfort preferences shown to potential co-riders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub music: String,
    pub conversation_level: ConversationLevel,
    pub temperature: String,
    pub smoking_allowed: bool,
    pub pets_allowed: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            music: "any".to_string(),
            conversation_level: ConversationLevel::Moderate,
            temperature: "comfortable".to_string(),
            smoking_allowed: false,
            pets_allowed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DriverInfo {
    /// sedan, suv, hatchback, ...
    #[validate(length(max = 50))]
    pub vehicle_type: String,
    #[validate(range(min = 1, max = 8))]
    pub capacity: u32,
    #[validate(length(max = 20))]
    pub license_plate: String,
    pub is_verified: bool,
}

impl Default for DriverInfo {
    fn default() -> Self {
        Self {
            vehicle_type: String::new(),
            capacity: 4,
            license_plate: String::new(),
            is_verified: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct EmergencyContact {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 32))]
    pub phone: String,
    #[validate(length(max = 50))]
    pub relationship: String,
}

/// Partial profile update accepted by `PUT /api/profile`.
///
/// Only these fields are client-editable; anything else in the body is ignored.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 100))]
    pub full_name: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(length(max = 100))]
    pub department: Option<String>,
    #[validate(length(max = 50))]
    pub student_id: Option<String>,
    pub is_driver: Option<bool>,
    #[validate(nested)]
    pub driver_info: Option<DriverInfo>,
    pub preferences: Option<UserPreferences>,
    #[validate(nested)]
    pub emergency_contacts: Option<Vec<EmergencyContact>>,
}
