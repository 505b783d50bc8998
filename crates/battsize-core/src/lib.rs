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

//! BattSize sizing and recommendation engine
//!
//! Two pure, synchronous components composed in sequence:
//!
//! - **Sizing calculator** ([`sizing::calculate`]): daily load, autonomy days,
//!   depth of discharge, efficiency, winter uplift and reserve buffer in,
//!   load target / usable capacity / nameplate capacity out.
//! - **Battery recommender** ([`recommender::recommend`]): sizes every catalog
//!   item against the usable capacity target and returns the closest adequate
//!   matches per tier.
//!
//! The catalog is loaded once ([`Catalog::builtin`] or [`Catalog::load`]) and
//! never mutated afterwards. Input validation for callers at the boundary
//! lives in [`validation`].
//!
//! ```ignore
//! use battsize_core::{Catalog, RecommendationInputs, SizingInputs, sizing};
//!
//! let catalog = Catalog::builtin()?;
//! let sizing = sizing::calculate(&SizingInputs::new(10.0, 1));
//! let result = catalog.recommend(&RecommendationInputs::new(sizing.battery_usable_needed_kwh));
//! ```

pub mod catalog;
pub mod error;
pub mod recommender;
pub mod sizing;
pub mod validation;

pub use catalog::Catalog;
pub use error::{Error, Result};
pub use recommender::{
    COVERAGE_EPSILON, LIMITED_CATALOG_THRESHOLD, MAX_RESULTS_PER_TIER, recommend,
};
pub use sizing::calculate;
pub use validation::{
    ValidationIssue, ValidationResult, ValidationSeverity, validate_recommendation_inputs,
    validate_sizing_inputs,
};

// Re-export the data model so callers only need one crate
pub use battsize_types::*;
