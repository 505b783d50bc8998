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

//! Boundary validation for calculator and recommender inputs
//!
//! The core functions assume well-formed inputs. Presentation layers run these
//! checks first and surface the collected issues to the user.

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::sizing::calculate;
use battsize_types::{RecommendationInputs, SizingInputs};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Autonomy beyond a week is unusual for a home system
const MAX_TYPICAL_DAYS: u32 = 7;
const MIN_TYPICAL_DOD: f64 = 0.5;
const MIN_TYPICAL_EFFICIENCY: f64 = 0.75;
/// kWh per day; well above a typical household
const MAX_TYPICAL_DAILY_LOAD: f64 = 200.0;

/// Validation result with field-level errors and warnings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the inputs can be used
    pub valid: bool,
    /// Issues that prevent the calculation
    pub errors: Vec<ValidationIssue>,
    /// Issues worth showing to the user; the calculation still runs
    pub warnings: Vec<ValidationIssue>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::success()
    }
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationIssue {
            field: field.into(),
            message: message.into(),
            severity: ValidationSeverity::Error,
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationIssue {
            field: field.into(),
            message: message.into(),
            severity: ValidationSeverity::Warning,
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn merge(&mut self, other: ValidationResult) {
        self.valid = self.valid && other.valid;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// One-line description of all errors, e.g. for log lines and error messages
    pub fn summary(&self) -> String {
        if self.errors.is_empty() {
            return "no errors".to_owned();
        }
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// `Ok(self)` when there are no errors (warnings are kept), else [`Error::Validation`]
    pub fn into_result(self) -> Result<Self> {
        if self.has_errors() {
            Err(Error::Validation(self))
        } else {
            Ok(self)
        }
    }

    /// Warning messages formatted for display
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }
}

/// A validation issue (error or warning)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Input field name, e.g. "dod"
    pub field: String,
    pub message: String,
    pub severity: ValidationSeverity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    Error,
    Warning,
}

/// Check calculator inputs; the calculator must not be called when this has errors
pub fn validate_sizing_inputs(inputs: &SizingInputs) -> ValidationResult {
    let mut result = ValidationResult::success();

    if !inputs.daily_load_kwh.is_finite() || inputs.daily_load_kwh <= 0.0 {
        result.add_error("daily_load_kwh", "must be a positive number of kWh");
    } else if inputs.daily_load_kwh > MAX_TYPICAL_DAILY_LOAD {
        result.add_warning(
            "daily_load_kwh",
            format!(
                "{} kWh/day is unusually high for a home system",
                inputs.daily_load_kwh
            ),
        );
    }

    if inputs.days_of_autonomy == 0 {
        result.add_error("days_of_autonomy", "must be at least 1");
    } else if inputs.days_of_autonomy > MAX_TYPICAL_DAYS {
        result.add_warning(
            "days_of_autonomy",
            format!(
                "{} days of autonomy will need a very large bank",
                inputs.days_of_autonomy
            ),
        );
    }

    if !is_unit_fraction(inputs.dod) {
        result.add_error("dod", "must be greater than 0 and at most 1");
    } else if inputs.dod < MIN_TYPICAL_DOD {
        result.add_warning(
            "dod",
            "depth of discharge below 0.5 is typical only for lead-acid",
        );
    }

    if !is_unit_fraction(inputs.efficiency) {
        result.add_error("efficiency", "must be greater than 0 and at most 1");
    } else if inputs.efficiency < MIN_TYPICAL_EFFICIENCY {
        result.add_warning("efficiency", "round-trip efficiency below 0.75 is unusual");
    }

    let reserve = inputs.reserve_buffer;
    if !reserve.is_finite() || !(0.0..1.0).contains(&reserve) {
        result.add_error("reserve_buffer", "must be at least 0 and below 1");
    }

    if !result.has_errors() && calculate(inputs).battery_usable_needed_kwh <= 0.0 {
        result.add_error(
            "daily_load_kwh",
            "load is too small, the usable capacity rounds to 0.0 kWh",
        );
    }

    log_warnings(&result);
    result
}

/// Check recommender inputs against the loaded catalog
pub fn validate_recommendation_inputs(
    inputs: &RecommendationInputs,
    catalog: &Catalog,
) -> ValidationResult {
    let mut result = ValidationResult::success();

    let target = inputs.battery_usable_needed_kwh;
    if !target.is_finite() || target <= 0.0 {
        result.add_error(
            "battery_usable_needed_kwh",
            "must be a positive number of kWh",
        );
    }

    if let Some(tag) = inputs.location_tag.as_deref()
        && !tag.trim().is_empty()
        && !catalog.knows_region(tag)
    {
        result.add_warning(
            "location_tag",
            format!("no catalog item lists region '{tag}', only globally available batteries will match"),
        );
    }

    log_warnings(&result);
    result
}

fn is_unit_fraction(value: f64) -> bool {
    value.is_finite() && value > 0.0 && value <= 1.0
}

fn log_warnings(result: &ValidationResult) {
    for issue in &result.warnings {
        warn!("Input warning: {}", issue);
    }
}
