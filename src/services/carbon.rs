// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Carbon, cost and eco-credit calculations.
//!
//! Every figure is relative to the same trip driven alone in an average car.

use serde::{Deserialize, Serialize};

use crate::models::{TravelMode, TripOutcome};

/// kg CO2 per km for a solo average car.
const SOLO_CAR_KG_PER_KM: f64 = 0.192;
const CARPOOL_2_KG_PER_KM: f64 = 0.096;
const CARPOOL_3_KG_PER_KM: f64 = 0.064;
const CARPOOL_4_KG_PER_KM: f64 = 0.048;
const TRANSIT_KG_PER_KM: f64 = 0.041;
const ELECTRIC_KG_PER_KM: f64 = 0.053;

/// Fuel + maintenance per km for a solo car.
const SOLO_CAR_COST_PER_KM: f64 = 0.60;
const CARPOOL_COST_PER_KM: f64 = 0.15;
const TRANSIT_COST_PER_KM: f64 = 0.20;
const BIKE_COST_PER_KM: f64 = 0.02;

/// A tree absorbs roughly this many kg of CO2 per year.
const TREE_ABSORPTION_KG_PER_YEAR: f64 = 20.0;

const KM_TO_MILES: f64 = 0.621371;

const CARPOOL_DRIVER_CREDITS: u32 = 15;
const CARPOOL_PASSENGER_CREDITS: u32 = 10;
const TRANSIT_CREDITS: u32 = 5;
const ACTIVE_TRAVEL_CREDITS: u32 = 3;

/// Emissions comparison for one trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonSavings {
    pub carbon_saved_kg: f64,
    pub baseline_emissions: f64,
    pub actual_emissions: f64,
    pub trees_equivalent: f64,
    pub percentage_saved: f64,
}

/// Stateless calculator; all factors are compile-time constants.
#[derive(Debug, Default, Clone, Copy)]
pub struct CarbonCalculator;

impl CarbonCalculator {
    fn emissions_per_km(mode: TravelMode, passengers: u32) -> f64 {
        match mode {
            TravelMode::Carpool => match passengers {
                2 => CARPOOL_2_KG_PER_KM,
                3 => CARPOOL_3_KG_PER_KM,
                _ => CARPOOL_4_KG_PER_KM,
            },
            TravelMode::Transit => TRANSIT_KG_PER_KM,
            TravelMode::Bike | TravelMode::Walk => 0.0,
            TravelMode::Electric => ELECTRIC_KG_PER_KM,
            TravelMode::SoloCar | TravelMode::Hybrid | TravelMode::Other => SOLO_CAR_KG_PER_KM,
        }
    }

    fn cost_per_km(mode: TravelMode) -> f64 {
        match mode {
            TravelMode::Carpool => CARPOOL_COST_PER_KM,
            TravelMode::Transit => TRANSIT_COST_PER_KM,
            TravelMode::Bike => BIKE_COST_PER_KM,
            TravelMode::Walk => 0.0,
            _ => SOLO_CAR_COST_PER_KM,
        }
    }

    /// Carbon saved compared to solo driving.
    pub fn carbon_saved(
        &self,
        mode: TravelMode,
        distance_km: f64,
        passengers: u32,
    ) -> CarbonSavings {
        let baseline = distance_km * SOLO_CAR_KG_PER_KM;
        let actual = distance_km * Self::emissions_per_km(mode, passengers);
        let saved = baseline - actual;

        let percentage_saved = if baseline > 0.0 {
            round_to(saved / baseline * 100.0, 1)
        } else {
            0.0
        };

        CarbonSavings {
            carbon_saved_kg: round_to(saved, 2),
            baseline_emissions: round_to(baseline, 2),
            actual_emissions: round_to(actual, 2),
            trees_equivalent: round_to(self.trees_equivalent(saved), 2),
            percentage_saved,
        }
    }

    /// Tree-days of absorption matching `carbon_kg` of CO2.
    pub fn trees_equivalent(&self, carbon_kg: f64) -> f64 {
        carbon_kg / TREE_ABSORPTION_KG_PER_YEAR * 365.0
    }

    /// Money saved compared to solo driving.
    pub fn money_saved(&self, mode: TravelMode, distance_km: f64) -> f64 {
        let baseline = distance_km * SOLO_CAR_COST_PER_KM;
        let actual = distance_km * Self::cost_per_km(mode);
        round_to(baseline - actual, 2)
    }

    /// Eco credits for a trip: a per-mode base plus one credit per whole km.
    pub fn eco_credits(&self, mode: TravelMode, distance_km: f64, passengers: u32) -> u32 {
        let base = match mode {
            TravelMode::Carpool if passengers > 1 => CARPOOL_DRIVER_CREDITS,
            TravelMode::Carpool => CARPOOL_PASSENGER_CREDITS,
            TravelMode::Transit => TRANSIT_CREDITS,
            TravelMode::Bike | TravelMode::Walk => ACTIVE_TRAVEL_CREDITS,
            _ => 0,
        };
        base + distance_km.max(0.0).floor() as u32
    }

    /// Everything a recorded trip adds to a user's impact.
    pub fn evaluate(
        &self,
        mode: TravelMode,
        distance_km: f64,
        passengers: u32,
    ) -> (CarbonSavings, TripOutcome) {
        let savings = self.carbon_saved(mode, distance_km, passengers);
        let outcome = TripOutcome {
            mode,
            distance_km,
            carbon_saved_kg: savings.carbon_saved_kg,
            money_saved: self.money_saved(mode, distance_km),
            sustainable_miles: distance_km * KM_TO_MILES,
            credits: self.eco_credits(mode, distance_km, passengers),
        };
        (savings, outcome)
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
