// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use serde::{Deserialize, Serialize};

/// Default depth of discharge (fraction of nameplate capacity that may be used)
pub const DEFAULT_DOD: f64 = 0.80;

/// Default round-trip / inverter efficiency
pub const DEFAULT_EFFICIENCY: f64 = 0.90;

/// Default safety margin added on top of the autonomy load
pub const DEFAULT_RESERVE_BUFFER: f64 = 0.15;

fn default_days_of_autonomy() -> u32 {
    1
}

fn default_dod() -> f64 {
    DEFAULT_DOD
}

fn default_efficiency() -> f64 {
    DEFAULT_EFFICIENCY
}

fn default_reserve_buffer() -> f64 {
    DEFAULT_RESERVE_BUFFER
}

// ============= Request =============

/// User inputs for the sizing calculator
///
/// Only `daily_load_kwh` is required when deserializing; every other field
/// falls back to the same defaults as [`SizingInputs::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizingInputs {
    /// Average household consumption per day (kWh), must be positive
    pub daily_load_kwh: f64,

    /// Number of days the battery should carry the load without recharge
    #[serde(default = "default_days_of_autonomy")]
    pub days_of_autonomy: u32,

    /// Depth of discharge in (0, 1]
    #[serde(default = "default_dod")]
    pub dod: f64,

    /// Round-trip / inverter efficiency in (0, 1]
    #[serde(default = "default_efficiency")]
    pub efficiency: f64,

    /// Adds a 20% load uplift for short, cloudy winter days
    #[serde(default)]
    pub winter_mode: bool,

    /// Safety margin fraction in [0, 1)
    #[serde(default = "default_reserve_buffer")]
    pub reserve_buffer: f64,
}

impl SizingInputs {
    /// Create inputs with default DoD, efficiency, reserve buffer and winter mode off
    pub fn new(daily_load_kwh: f64, days_of_autonomy: u32) -> Self {
        Self {
            daily_load_kwh,
            days_of_autonomy,
            dod: DEFAULT_DOD,
            efficiency: DEFAULT_EFFICIENCY,
            winter_mode: false,
            reserve_buffer: DEFAULT_RESERVE_BUFFER,
        }
    }

    #[must_use]
    pub fn with_dod(mut self, dod: f64) -> Self {
        self.dod = dod;
        self
    }

    #[must_use]
    pub fn with_efficiency(mut self, efficiency: f64) -> Self {
        self.efficiency = efficiency;
        self
    }

    #[must_use]
    pub fn with_winter_mode(mut self, winter_mode: bool) -> Self {
        self.winter_mode = winter_mode;
        self
    }

    #[must_use]
    pub fn with_reserve_buffer(mut self, reserve_buffer: f64) -> Self {
        self.reserve_buffer = reserve_buffer;
        self
    }
}

// ============= Response =============

/// Every multiplier and intermediate used by the calculator, in evaluation order
///
/// The `*_exact_kwh` fields hold full-precision values; the rounded values
/// live on [`SizingResult`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizingBreakdown {
    pub daily_load_kwh: f64,
    pub days_of_autonomy: u32,
    /// daily load × days of autonomy
    pub base_load_kwh: f64,
    pub winter_mode: bool,
    /// 1.2 in winter mode, 1.0 otherwise
    pub winter_multiplier: f64,
    pub reserve_buffer: f64,
    /// 1 + reserve buffer
    pub reserve_multiplier: f64,
    pub efficiency: f64,
    pub dod: f64,
    /// AC-side energy target before rounding
    pub load_target_exact_kwh: f64,
    /// DC-side usable capacity before rounding
    pub battery_usable_exact_kwh: f64,
    /// Nameplate capacity before rounding up
    pub battery_nameplate_exact_kwh: f64,
}

/// Output of the sizing calculator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizingResult {
    /// AC-side energy target, rounded to 0.1 kWh
    pub load_target_kwh: f64,
    /// DC-side usable capacity needed, rounded to 0.1 kWh
    pub battery_usable_needed_kwh: f64,
    /// Nameplate capacity needed, rounded up to the next 0.5 kWh
    pub battery_nameplate_needed_kwh: f64,
    pub breakdown: SizingBreakdown,
}
