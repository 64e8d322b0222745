// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user sustainability aggregates.
//!
//! One `Impact` record exists per user. It is created with zeroed counters
//! at registration (or lazily on first read) and only ever moves forward
//! through [`Impact::record_trip`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

use crate::models::achievement;
use crate::models::TravelMode;

/// Modes that always appear in `trips_by_mode`, even at zero.
const SEEDED_MODES: [TravelMode; 4] = [
    TravelMode::Carpool,
    TravelMode::Transit,
    TravelMode::Bike,
    TravelMode::Walk,
];

/// Aggregate sustainability statistics for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/types/generated/")
)]
pub struct Impact {
    pub user_id: Uuid,
    /// kg CO2 avoided versus driving alone
    #[serde(default)]
    pub total_carbon_saved: f64,
    #[serde(default)]
    pub money_saved: f64,
    #[serde(default)]
    pub sustainable_miles: f64,
    #[serde(default)]
    pub total_trips: u32,
    #[serde(default)]
    pub trips_by_mode: BTreeMap<String, u32>,
    /// Consecutive days with at least one recorded trip
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default)]
    pub last_trip_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub eco_credits: u32,
    /// Earned achievement IDs, in the order they were earned
    #[serde(default)]
    pub badges: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

/// What a single trip contributes, as computed by the carbon calculator.
#[derive(Debug, Clone, PartialEq)]
pub struct TripOutcome {
    pub mode: TravelMode,
    pub distance_km: f64,
    pub carbon_saved_kg: f64,
    pub money_saved: f64,
    pub sustainable_miles: f64,
    pub credits: u32,
}

impl Impact {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            total_carbon_saved: 0.0,
            money_saved: 0.0,
            sustainable_miles: 0.0,
            total_trips: 0,
            trips_by_mode: SEEDED_MODES
                .iter()
                .map(|m| (m.as_str().to_string(), 0))
                .collect(),
            current_streak: 0,
            longest_streak: 0,
            last_trip_date: None,
            eco_credits: 0,
            badges: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// Fold a trip into the aggregates.
    ///
    /// Returns the achievement IDs newly earned by this trip.
    pub fn record_trip(&mut self, outcome: &TripOutcome, now: DateTime<Utc>) -> Vec<String> {
        self.total_carbon_saved += outcome.carbon_saved_kg;
        self.money_saved += outcome.money_saved;
        self.sustainable_miles += outcome.sustainable_miles;
        self.total_trips += 1;
        self.eco_credits += outcome.credits;
        *self
            .trips_by_mode
            .entry(outcome.mode.as_str().to_string())
            .or_insert(0) += 1;

        self.current_streak = self.next_streak(now);
        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.last_trip_date = Some(now);
        self.updated_at = now;

        let new_badges: Vec<String> = achievement::earned(self)
            .into_iter()
            .filter(|id| !self.badges.iter().any(|b| b == id))
            .map(String::from)
            .collect();
        self.badges.extend(new_badges.iter().cloned());
        new_badges
    }

    /// Streak after a trip at `now`, compared by UTC calendar day.
    fn next_streak(&self, now: DateTime<Utc>) -> u32 {
        let today = now.date_naive();
        match self.last_trip_date.map(|d| d.date_naive()) {
            Some(last) if last == today => self.current_streak.max(1),
            Some(last) if last.succ_opt() == Some(today) => self.current_streak + 1,
            _ => 1,
        }
    }

    /// Number of distinct modes with at least one trip.
    pub fn modes_used(&self) -> usize {
        self.trips_by_mode.values().filter(|&&n| n > 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn outcome(mode: TravelMode, carbon: f64) -> TripOutcome {
        TripOutcome {
            mode,
            distance_km: 10.0,
            carbon_saved_kg: carbon,
            money_saved: 4.5,
            sustainable_miles: 6.21371,
            credits: 25,
        }
    }

    fn day(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_new_impact_seeds_modes() {
        let impact = Impact::new(Uuid::new_v4());
        assert_eq!(impact.trips_by_mode.len(), 4);
        assert_eq!(impact.trips_by_mode.get("walk"), Some(&0));
        assert_eq!(impact.modes_used(), 0);
    }

    #[test]
    fn test_record_trip_accumulates() {
        let mut impact = Impact::new(Uuid::new_v4());

        let new_badges = impact.record_trip(&outcome(TravelMode::Carpool, 1.44), day(2, 8));
        impact.record_trip(&outcome(TravelMode::Electric, 1.39), day(2, 17));

        assert_eq!(impact.total_trips, 2);
        assert!((impact.total_carbon_saved - 2.83).abs() < 1e-9);
        assert_eq!(impact.eco_credits, 50);
        assert_eq!(impact.trips_by_mode.get("carpool"), Some(&1));
        assert_eq!(impact.trips_by_mode.get("electric"), Some(&1));
        assert_eq!(new_badges, vec!["first_trip".to_string()]);
        assert_eq!(impact.badges, vec!["first_trip".to_string()]);
        assert_eq!(impact.last_trip_date, Some(day(2, 17)));
    }

    #[test]
    fn test_streak_same_day_next_day_and_gap() {
        let mut impact = Impact::new(Uuid::new_v4());
        let trip = outcome(TravelMode::Bike, 1.92);

        impact.record_trip(&trip, day(2, 8));
        assert_eq!(impact.current_streak, 1);

        impact.record_trip(&trip, day(2, 18));
        assert_eq!(impact.current_streak, 1);

        impact.record_trip(&trip, day(3, 8));
        impact.record_trip(&trip, day(4, 8));
        assert_eq!(impact.current_streak, 3);

        impact.record_trip(&trip, day(7, 8));
        assert_eq!(impact.current_streak, 1);
        assert_eq!(impact.longest_streak, 3);
    }

    #[test]
    fn test_badges_are_not_duplicated() {
        let mut impact = Impact::new(Uuid::new_v4());
        let trip = outcome(TravelMode::Walk, 60.0);

        let first = impact.record_trip(&trip, day(2, 8));
        let second = impact.record_trip(&trip, day(2, 9));

        assert_eq!(first, vec!["first_trip".to_string(), "50kg_saver".to_string()]);
        assert_eq!(second, vec!["100kg_saver".to_string()]);
        assert_eq!(impact.badges.len(), 3);
    }
}
