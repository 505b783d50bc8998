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

pub mod catalog;
pub mod recommendation;
pub mod sizing;

// Re-export common types for convenience
pub use catalog::{BatteryCatalogItem, Chemistry, GLOBAL_REGION, PriceRange, RegionAvailability, Tier};
pub use recommendation::{
    CatalogMetadata, ChemistryFilter, RecommendationInputs, RecommendationResult,
    RecommendedBattery, TierFilter,
};
pub use sizing::{
    DEFAULT_DOD, DEFAULT_EFFICIENCY, DEFAULT_RESERVE_BUFFER, SizingBreakdown, SizingInputs,
    SizingResult,
};
