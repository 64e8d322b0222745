// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Achievement catalogue.
//!
//! Every achievement is a threshold on a counter that never decreases
//! (trip count, carbon saved, streak, distinct modes), so once earned it
//! stays earned for as long as the counter holds.

use serde::{Deserialize, Serialize};

use crate::models::Impact;

/// Condition an achievement is earned under.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Requirement {
    TripCount(u32),
    CarbonSavedKg(f64),
    Streak(u32),
    ModesUsed(usize),
}

impl Requirement {
    pub fn is_met(&self, impact: &Impact) -> bool {
        match *self {
            Requirement::TripCount(n) => impact.total_trips >= n,
            Requirement::CarbonSavedKg(kg) => impact.total_carbon_saved >= kg,
            Requirement::Streak(days) => impact.current_streak >= days,
            Requirement::ModesUsed(n) => impact.modes_used() >= n,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: &'static str,
    pub requirement: Requirement,
    pub credits_reward: u32,
}

impl Achievement {
    pub fn is_earned(&self, impact: &Impact) -> bool {
        self.requirement.is_met(impact)
    }
}

pub const CATALOGUE: &[Achievement] = &[
    Achievement {
        id: "first_trip",
        name: "First Trip",
        description: "Record your first sustainable trip",
        icon: "rocket",
        category: "trips",
        requirement: Requirement::TripCount(1),
        credits_reward: 10,
    },
    Achievement {
        id: "eco_starter",
        name: "Eco Starter",
        description: "Record 10 sustainable trips",
        icon: "leaf",
        category: "trips",
        requirement: Requirement::TripCount(10),
        credits_reward: 25,
    },
    Achievement {
        id: "eco_enthusiast",
        name: "Eco Enthusiast",
        description: "Record 50 sustainable trips",
        icon: "leaf",
        category: "trips",
        requirement: Requirement::TripCount(50),
        credits_reward: 50,
    },
    Achievement {
        id: "century_club",
        name: "Century Club",
        description: "Record 100 sustainable trips",
        icon: "medal",
        category: "trips",
        requirement: Requirement::TripCount(100),
        credits_reward: 100,
    },
    Achievement {
        id: "50kg_saver",
        name: "50kg Saver",
        description: "Save 50 kg of CO2",
        icon: "checkmark-circle",
        category: "carbon",
        requirement: Requirement::CarbonSavedKg(50.0),
        credits_reward: 25,
    },
    Achievement {
        id: "100kg_saver",
        name: "100kg Saver",
        description: "Save 100 kg of CO2",
        icon: "trophy",
        category: "carbon",
        requirement: Requirement::CarbonSavedKg(100.0),
        credits_reward: 50,
    },
    Achievement {
        id: "500kg_saver",
        name: "500kg Saver",
        description: "Save 500 kg of CO2",
        icon: "earth",
        category: "carbon",
        requirement: Requirement::CarbonSavedKg(500.0),
        credits_reward: 150,
    },
    Achievement {
        id: "eco_warrior",
        name: "Eco Warrior",
        description: "Save a tonne of CO2",
        icon: "shield",
        category: "carbon",
        requirement: Requirement::CarbonSavedKg(1000.0),
        credits_reward: 300,
    },
    Achievement {
        id: "week_warrior",
        name: "Week Warrior",
        description: "Travel sustainably 7 days in a row",
        icon: "flame",
        category: "streak",
        requirement: Requirement::Streak(7),
        credits_reward: 35,
    },
    Achievement {
        id: "perfect_month",
        name: "Perfect Month",
        description: "Travel sustainably 30 days in a row",
        icon: "calendar",
        category: "streak",
        requirement: Requirement::Streak(30),
        credits_reward: 150,
    },
    Achievement {
        id: "mode_master",
        name: "Mode Master",
        description: "Use four different ways of getting around",
        icon: "apps",
        category: "community",
        requirement: Requirement::ModesUsed(4),
        credits_reward: 40,
    },
];

/// Achievements shown on the mobile impact screen, in display order.
pub const DISPLAYED: [&str; 6] = [
    "first_trip",
    "eco_starter",
    "50kg_saver",
    "100kg_saver",
    "week_warrior",
    "mode_master",
];

pub fn find(id: &str) -> Option<&'static Achievement> {
    CATALOGUE.iter().find(|a| a.id == id)
}

/// IDs of every achievement the impact currently satisfies, in catalogue order.
pub fn earned(impact: &Impact) -> Vec<&'static str> {
    CATALOGUE
        .iter()
        .filter(|a| a.is_earned(impact))
        .map(|a| a.id)
        .collect()
}

/// An achievement with its earned flag, as rendered by clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementStatus {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: String,
    pub credits_reward: u32,
    pub earned: bool,
}

impl AchievementStatus {
    pub fn new(achievement: &Achievement, impact: &Impact) -> Self {
        Self {
            id: achievement.id.to_string(),
            name: achievement.name.to_string(),
            description: achievement.description.to_string(),
            icon: achievement.icon.to_string(),
            category: achievement.category.to_string(),
            credits_reward: achievement.credits_reward,
            earned: achievement.is_earned(impact),
        }
    }
}

/// Status of every catalogue entry.
pub fn statuses(impact: &Impact) -> Vec<AchievementStatus> {
    CATALOGUE
        .iter()
        .map(|a| AchievementStatus::new(a, impact))
        .collect()
}
