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

use crate::catalog::{BatteryCatalogItem, Chemistry, PriceRange, Tier};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============= Filters =============

/// Tier restriction for a recommendation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierFilter {
    #[default]
    All,
    Premium,
    Mid,
    Diy,
}

impl TierFilter {
    pub fn matches(&self, tier: Tier) -> bool {
        match self {
            Self::All => true,
            Self::Premium => tier == Tier::Premium,
            Self::Mid => tier == Tier::Mid,
            Self::Diy => tier == Tier::Diy,
        }
    }

    pub fn to_config_value(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Premium => "premium",
            Self::Mid => "mid",
            Self::Diy => "diy",
        }
    }
}

impl From<Tier> for TierFilter {
    fn from(tier: Tier) -> Self {
        match tier {
            Tier::Premium => Self::Premium,
            Tier::Mid => Self::Mid,
            Tier::Diy => Self::Diy,
        }
    }
}

impl fmt::Display for TierFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_config_value())
    }
}

impl FromStr for TierFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<Tier>().map(Self::from)
    }
}

/// Chemistry restriction for a recommendation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChemistryFilter {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "LFP", alias = "lfp")]
    Lfp,
    #[serde(rename = "NMC", alias = "nmc")]
    Nmc,
    #[serde(rename = "Other", alias = "other")]
    Other,
}

impl ChemistryFilter {
    pub fn matches(&self, chemistry: Chemistry) -> bool {
        match self {
            Self::All => true,
            Self::Lfp => chemistry == Chemistry::Lfp,
            Self::Nmc => chemistry == Chemistry::Nmc,
            Self::Other => chemistry == Chemistry::Other,
        }
    }

    pub fn to_config_value(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Lfp => "LFP",
            Self::Nmc => "NMC",
            Self::Other => "Other",
        }
    }
}

impl From<Chemistry> for ChemistryFilter {
    fn from(chemistry: Chemistry) -> Self {
        match chemistry {
            Chemistry::Lfp => Self::Lfp,
            Chemistry::Nmc => Self::Nmc,
            Chemistry::Other => Self::Other,
        }
    }
}

impl fmt::Display for ChemistryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_config_value())
    }
}

impl FromStr for ChemistryFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<Chemistry>().map(Self::from)
    }
}

// ============= Request =============

/// Inputs for the battery recommender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationInputs {
    /// DC-side usable capacity target, normally `SizingResult::battery_usable_needed_kwh`
    pub battery_usable_needed_kwh: f64,

    /// Region code (e.g. "US", "AU") or "GLOBAL"; `None` disables region filtering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_tag: Option<String>,

    #[serde(default)]
    pub tier_filter: TierFilter,

    #[serde(default)]
    pub chemistry_filter: ChemistryFilter,
}

impl RecommendationInputs {
    /// Unfiltered request for the given usable capacity target
    pub fn new(battery_usable_needed_kwh: f64) -> Self {
        Self {
            battery_usable_needed_kwh,
            location_tag: None,
            tier_filter: TierFilter::All,
            chemistry_filter: ChemistryFilter::All,
        }
    }

    #[must_use]
    pub fn with_location(mut self, tag: impl Into<String>) -> Self {
        self.location_tag = Some(tag.into());
        self
    }

    #[must_use]
    pub fn with_tier(mut self, tier_filter: TierFilter) -> Self {
        self.tier_filter = tier_filter;
        self
    }

    #[must_use]
    pub fn with_chemistry(mut self, chemistry_filter: ChemistryFilter) -> Self {
        self.chemistry_filter = chemistry_filter;
        self
    }
}

// ============= Response =============

/// A catalog item sized against a capacity target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedBattery {
    pub battery: BatteryCatalogItem,
    /// Number of units needed to meet the target
    pub count: u32,
    pub total_usable_kwh: f64,
    pub total_nameplate_kwh: f64,
    /// Percent of the target covered by `total_usable_kwh`
    pub coverage: f64,
    pub is_undersized: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_continuous_kw: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_price: Option<PriceRange>,
}

/// Catalog completeness information for the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogMetadata {
    /// Size of the full, unfiltered catalog
    pub catalog_size: usize,
    /// Items left after region, tier and chemistry filtering
    pub filtered_size: usize,
    /// Fewer items survived filtering than the disclaimer threshold
    pub is_limited_catalog: bool,
}

/// Ranked recommendations grouped by tier
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub premium: Vec<RecommendedBattery>,
    pub mid_range: Vec<RecommendedBattery>,
    pub diy: Vec<RecommendedBattery>,
    pub metadata: CatalogMetadata,
}

impl RecommendationResult {
    /// Ranked list for one tier
    pub fn tier(&self, tier: Tier) -> &[RecommendedBattery] {
        match tier {
            Tier::Premium => &self.premium,
            Tier::Mid => &self.mid_range,
            Tier::Diy => &self.diy,
        }
    }

    /// Total number of recommendations across all tiers
    pub fn len(&self) -> usize {
        self.premium.len() + self.mid_range.len() + self.diy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate all recommendations, premium first
    pub fn iter(&self) -> impl Iterator<Item = &RecommendedBattery> {
        self.premium
            .iter()
            .chain(self.mid_range.iter())
            .chain(self.diy.iter())
    }
}
