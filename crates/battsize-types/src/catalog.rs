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

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Region code meaning "available everywhere"
pub const GLOBAL_REGION: &str = "GLOBAL";

// ============= Tier =============

/// Coarse product segment used to group recommendations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Whole-home systems from established brands, installer channel
    Premium,
    /// Mainstream hybrid-inverter batteries
    Mid,
    /// Rack and wall-mount packs for self-install
    Diy,
}

impl Tier {
    /// Get human-readable name for the tier
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Premium => "Premium",
            Self::Mid => "Mid-range",
            Self::Diy => "DIY",
        }
    }

    /// Get config string value
    pub fn to_config_value(&self) -> &'static str {
        match self {
            Self::Premium => "premium",
            Self::Mid => "mid",
            Self::Diy => "diy",
        }
    }

    /// List all tiers in presentation order
    pub fn all() -> &'static [Tier] {
        &[Self::Premium, Self::Mid, Self::Diy]
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Tier {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "premium" => Ok(Self::Premium),
            "mid" | "mid-range" | "midrange" | "mid_range" => Ok(Self::Mid),
            "diy" => Ok(Self::Diy),
            _ => Err(anyhow::anyhow!(
                "Unknown tier: '{}'. Supported tiers: {}",
                s,
                Self::all()
                    .iter()
                    .map(|t| t.to_config_value())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

// ============= Chemistry =============

/// Cell chemistry of a battery product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chemistry {
    /// Lithium iron phosphate
    #[serde(rename = "LFP", alias = "lfp")]
    Lfp,
    /// Lithium nickel manganese cobalt oxide
    #[serde(rename = "NMC", alias = "nmc")]
    Nmc,
    #[serde(rename = "Other", alias = "other")]
    Other,
}

impl Chemistry {
    pub fn to_config_value(&self) -> &'static str {
        match self {
            Self::Lfp => "LFP",
            Self::Nmc => "NMC",
            Self::Other => "Other",
        }
    }

    pub fn all() -> &'static [Chemistry] {
        &[Self::Lfp, Self::Nmc, Self::Other]
    }
}

impl fmt::Display for Chemistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_config_value())
    }
}

impl FromStr for Chemistry {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "lfp" | "lifepo4" => Ok(Self::Lfp),
            "nmc" => Ok(Self::Nmc),
            "other" => Ok(Self::Other),
            _ => Err(anyhow::anyhow!(
                "Unknown chemistry: '{}'. Supported chemistries: {}",
                s,
                Self::all()
                    .iter()
                    .map(|c| c.to_config_value())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

// ============= Region availability =============

/// Per-region availability flags plus the `GLOBAL` flag
///
/// Serialized flat, e.g. `{ "GLOBAL": false, "US": true, "AU": true }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionAvailability {
    #[serde(rename = "GLOBAL", default)]
    pub global: bool,

    #[serde(flatten)]
    pub regions: BTreeMap<String, bool>,
}

impl RegionAvailability {
    pub fn global() -> Self {
        Self {
            global: true,
            regions: BTreeMap::new(),
        }
    }

    /// Availability limited to the given region codes
    pub fn only<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            global: false,
            regions: codes.into_iter().map(|c| (c.into(), true)).collect(),
        }
    }

    /// Explicit flag for `code`; absent codes are `false`
    pub fn flag(&self, code: &str) -> bool {
        if code == GLOBAL_REGION {
            return self.global;
        }
        self.regions.get(code).copied().unwrap_or(false)
    }

    /// Whether a product with these flags can be bought in `code`
    pub fn is_available_in(&self, code: &str) -> bool {
        self.global || self.flag(code)
    }

    /// Region codes explicitly flagged as available
    pub fn available_regions(&self) -> impl Iterator<Item = &str> {
        self.regions
            .iter()
            .filter(|(_, available)| **available)
            .map(|(code, _)| code.as_str())
    }
}

// ============= Catalog item =============

/// Indicative per-unit price range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
    pub currency: String,
}

impl PriceRange {
    /// Range for `count` units
    #[must_use]
    pub fn scaled(&self, count: u32) -> Self {
        Self {
            min: self.min * f64::from(count),
            max: self.max * f64::from(count),
            currency: self.currency.clone(),
        }
    }
}

/// One hand-curated battery product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryCatalogItem {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub tier: Tier,
    pub chemistry: Chemistry,

    /// Usable energy per unit (kWh)
    pub usable_kwh_per_unit: f64,

    /// Manufacturer-rated capacity per unit; usable capacity is assumed when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nameplate_kwh_per_unit: Option<f64>,

    /// Continuous output power per unit (kW)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuous_kw_per_unit: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty_years: Option<u32>,

    #[serde(default)]
    pub region_availability: RegionAvailability,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_note: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
}

impl BatteryCatalogItem {
    /// Nameplate capacity per unit, falling back to usable capacity
    pub fn effective_nameplate_kwh(&self) -> f64 {
        self.nameplate_kwh_per_unit
            .unwrap_or(self.usable_kwh_per_unit)
    }

    /// "Brand Model" label
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_from_str() {
        assert_eq!("premium".parse::<Tier>().unwrap(), Tier::Premium);
        assert_eq!("Mid-Range".parse::<Tier>().unwrap(), Tier::Mid);
        assert_eq!(" DIY ".parse::<Tier>().unwrap(), Tier::Diy);

        let err = "budget".parse::<Tier>().unwrap_err().to_string();
        assert!(err.contains("premium, mid, diy"));
    }

    #[test]
    fn test_chemistry_serde_spellings() {
        assert_eq!(serde_json::to_string(&Chemistry::Lfp).unwrap(), r#""LFP""#);
        assert_eq!(serde_json::to_string(&Chemistry::Other).unwrap(), r#""Other""#);
        assert_eq!(
            serde_json::from_str::<Chemistry>(r#""nmc""#).unwrap(),
            Chemistry::Nmc
        );
        assert_eq!("LiFePO4".parse::<Chemistry>().unwrap(), Chemistry::Lfp);
    }

    #[test]
    fn test_region_availability_flat_json() {
        let regions: RegionAvailability =
            serde_json::from_str(r#"{"GLOBAL": false, "US": true, "AU": false}"#).unwrap();
        assert!(!regions.global);
        assert!(regions.flag("US"));
        assert!(!regions.flag("AU"));
        assert!(!regions.flag("IN"));
        assert!(regions.is_available_in("US"));
        assert!(!regions.is_available_in("AU"));
        assert_eq!(regions.available_regions().collect::<Vec<_>>(), vec!["US"]);
    }

    #[test]
    fn test_region_availability_global_flag_wins() {
        let regions = RegionAvailability::global();
        assert!(regions.is_available_in("IN"));
        assert!(regions.flag(GLOBAL_REGION));
        assert!(!regions.flag("IN"));
    }

    #[test]
    fn test_region_availability_in_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            region_availability: RegionAvailability,
        }

        let parsed: Wrapper =
            toml::from_str("region_availability = { GLOBAL = true, DE = true }").unwrap();
        assert!(parsed.region_availability.global);
        assert!(parsed.region_availability.flag("DE"));
    }

    #[test]
    fn test_effective_nameplate_falls_back_to_usable() {
        let mut item = BatteryCatalogItem {
            id: "test".to_owned(),
            brand: "Acme".to_owned(),
            model: "Cell 5".to_owned(),
            tier: Tier::Diy,
            chemistry: Chemistry::Lfp,
            usable_kwh_per_unit: 5.0,
            nameplate_kwh_per_unit: None,
            continuous_kw_per_unit: None,
            warranty_years: None,
            region_availability: RegionAvailability::default(),
            source_url: None,
            source_note: None,
            price_range: None,
        };
        assert!((item.effective_nameplate_kwh() - 5.0).abs() < f64::EPSILON);

        item.nameplate_kwh_per_unit = Some(5.12);
        assert!((item.effective_nameplate_kwh() - 5.12).abs() < f64::EPSILON);
        assert_eq!(item.display_name(), "Acme Cell 5");
    }

    #[test]
    fn test_price_range_scaled() {
        let price = PriceRange {
            min: 1000.0,
            max: 1500.0,
            currency: "USD".to_owned(),
        };
        let scaled = price.scaled(3);
        assert!((scaled.min - 3000.0).abs() < f64::EPSILON);
        assert!((scaled.max - 4500.0).abs() < f64::EPSILON);
        assert_eq!(scaled.currency, "USD");
    }
}
