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

//! Battery catalog loading and lookup
//!
//! The catalog is read once at startup, validated, and treated as immutable
//! afterwards. The built-in catalog ships inside the binary; an alternative
//! catalog can be loaded from a TOML or JSON file.

use crate::error::{Error, Result};
use crate::recommender;
use battsize_types::{
    BatteryCatalogItem, ChemistryFilter, GLOBAL_REGION, RecommendationInputs,
    RecommendationResult, TierFilter,
};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;
use tracing::{debug, info};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.toml");

/// File layout shared by the TOML and JSON formats
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    battery: Vec<BatteryCatalogItem>,
}

/// JSON catalogs may also be a bare array of items
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonCatalog {
    Items(Vec<BatteryCatalogItem>),
    File(CatalogFile),
}

/// Validated, read-only battery catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<BatteryCatalogItem>,
}

impl Catalog {
    /// Validate `items` and build a catalog from them
    ///
    /// Region codes are upper-cased on the way in so lookups stay case-insensitive.
    pub fn new(items: Vec<BatteryCatalogItem>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(items.len());

        for mut item in items {
            validate_item(&item)?;
            if !seen.insert(item.id.clone()) {
                return Err(Error::DuplicateCatalogId(item.id));
            }
            normalize_regions(&mut item);
            normalized.push(item);
        }

        Ok(Self { items: normalized })
    }

    /// Catalog compiled into the binary
    pub fn builtin() -> Result<Self> {
        let catalog = Self::from_toml_str(BUILTIN_CATALOG)?;
        debug!(items = catalog.len(), "Loaded built-in battery catalog");
        Ok(catalog)
    }

    /// Parse a `[[battery]]` TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        Self::new(file.battery)
    }

    /// Parse a JSON array of items or a `{"battery": [...]}` object
    pub fn from_json_str(content: &str) -> Result<Self> {
        let items = match serde_json::from_str::<JsonCatalog>(content)? {
            JsonCatalog::Items(items) => items,
            JsonCatalog::File(file) => file.battery,
        };
        Self::new(items)
    }

    /// Load a catalog file, choosing the format from its extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let catalog = match extension.as_str() {
            "toml" => Self::from_toml_str(&std::fs::read_to_string(path)?)?,
            "json" => Self::from_json_str(&std::fs::read_to_string(path)?)?,
            _ => return Err(Error::UnsupportedCatalogFormat(path.display().to_string())),
        };

        info!(
            "Loaded battery catalog from {} ({} items)",
            path.display(),
            catalog.len()
        );
        Ok(catalog)
    }

    pub fn items(&self) -> &[BatteryCatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&BatteryCatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Every region code that at least one item is explicitly available in
    pub fn regions(&self) -> Vec<String> {
        self.items
            .iter()
            .flat_map(|item| item.region_availability.available_regions())
            .map(str::to_owned)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Whether `code` is `GLOBAL` or appears in [`Catalog::regions`]
    pub fn knows_region(&self, code: &str) -> bool {
        let code = code.trim().to_uppercase();
        code == GLOBAL_REGION
            || self
                .items
                .iter()
                .any(|item| item.region_availability.flag(&code))
    }

    /// Items passing the region, tier and chemistry filters, in catalog order
    pub fn filtered(
        &self,
        location_tag: Option<&str>,
        tier_filter: TierFilter,
        chemistry_filter: ChemistryFilter,
    ) -> Vec<&BatteryCatalogItem> {
        recommender::filter_items(&self.items, location_tag, tier_filter, chemistry_filter)
    }

    pub fn recommend(&self, inputs: &RecommendationInputs) -> RecommendationResult {
        recommender::recommend(&self.items, inputs)
    }
}

fn validate_item(item: &BatteryCatalogItem) -> Result<()> {
    let invalid = |reason: &str| {
        Err(Error::InvalidCatalogItem {
            id: item.id.clone(),
            reason: reason.to_owned(),
        })
    };

    if item.id.trim().is_empty() {
        return invalid("id must not be empty");
    }
    if item.brand.trim().is_empty() {
        return invalid("brand must not be empty");
    }
    if item.model.trim().is_empty() {
        return invalid("model must not be empty");
    }
    if !item.usable_kwh_per_unit.is_finite() || item.usable_kwh_per_unit <= 0.0 {
        return invalid("usable_kwh_per_unit must be a positive number");
    }
    if let Some(nameplate) = item.nameplate_kwh_per_unit
        && (!nameplate.is_finite() || nameplate < item.usable_kwh_per_unit)
    {
        return invalid("nameplate_kwh_per_unit must not be below usable_kwh_per_unit");
    }
    if let Some(power) = item.continuous_kw_per_unit
        && (!power.is_finite() || power <= 0.0)
    {
        return invalid("continuous_kw_per_unit must be a positive number");
    }
    if let Some(price) = &item.price_range {
        if !price.min.is_finite() || !price.max.is_finite() || price.min < 0.0 {
            return invalid("price_range bounds must be non-negative numbers");
        }
        if price.min > price.max {
            return invalid("price_range.min must not exceed price_range.max");
        }
        if price.currency.trim().is_empty() {
            return invalid("price_range.currency must not be empty");
        }
    }

    Ok(())
}

fn normalize_regions(item: &mut BatteryCatalogItem) {
    let availability = &mut item.region_availability;
    let mut regions = BTreeMap::new();
    for (code, available) in std::mem::take(&mut availability.regions) {
        let code = code.trim().to_uppercase();
        if code == GLOBAL_REGION {
            availability.global |= available;
            continue;
        }
        // Keep a `true` flag when two spellings of the same code collide
        *regions.entry(code).or_insert(false) |= available;
    }
    availability.regions = regions;
}

#[cfg(test)]
mod tests {
    use super::*;
    use battsize_types::{Chemistry, PriceRange, RegionAvailability, Tier};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn item(id: &str) -> BatteryCatalogItem {
        BatteryCatalogItem {
            id: id.to_owned(),
            brand: "Acme".to_owned(),
            model: id.to_uppercase(),
            tier: Tier::Mid,
            chemistry: Chemistry::Lfp,
            usable_kwh_per_unit: 5.0,
            nameplate_kwh_per_unit: Some(5.5),
            continuous_kw_per_unit: Some(2.5),
            warranty_years: Some(10),
            region_availability: RegionAvailability::only(["US"]),
            source_url: None,
            source_note: None,
            price_range: Some(PriceRange {
                min: 2000.0,
                max: 2500.0,
                currency: "USD".to_owned(),
            }),
        }
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.len() >= 15);

        for tier in Tier::all() {
            assert!(
                catalog.items().iter().any(|i| i.tier == *tier),
                "no items in tier {tier}"
            );
        }
        assert!(catalog.get("tesla-powerwall-3").is_some());
        assert!(catalog.get("does-not-exist").is_none());
    }

    #[test]
    fn test_builtin_catalog_regions() {
        let catalog = Catalog::builtin().unwrap();
        let regions = catalog.regions();

        assert!(regions.contains(&"US".to_owned()));
        assert!(regions.contains(&"IN".to_owned()));
        assert!(!regions.contains(&GLOBAL_REGION.to_owned()));

        let mut sorted = regions.clone();
        sorted.sort();
        assert_eq!(regions, sorted);
    }

    #[test]
    fn test_knows_region() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.knows_region("us"));
        assert!(catalog.knows_region("GLOBAL"));
        assert!(!catalog.knows_region("ZZ"));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = Catalog::new(vec![item("a"), item("a")]).unwrap_err();
        assert!(matches!(err, Error::DuplicateCatalogId(id) if id == "a"));
    }

    #[test]
    fn test_invalid_items_rejected() {
        let mut zero_usable = item("zero");
        zero_usable.usable_kwh_per_unit = 0.0;

        let mut small_nameplate = item("small");
        small_nameplate.nameplate_kwh_per_unit = Some(4.0);

        let mut blank_brand = item("blank");
        blank_brand.brand = "  ".to_owned();

        let mut inverted_price = item("price");
        if let Some(price) = inverted_price.price_range.as_mut() {
            price.min = 3000.0;
        }

        let mut nan_usable = item("nan");
        nan_usable.usable_kwh_per_unit = f64::NAN;

        for bad in [zero_usable, small_nameplate, blank_brand, inverted_price, nan_usable] {
            let id = bad.id.clone();
            let err = Catalog::new(vec![bad]).unwrap_err();
            assert!(
                matches!(&err, Error::InvalidCatalogItem { id: got, .. } if *got == id),
                "unexpected error for {id}: {err}"
            );
        }
    }

    #[test]
    fn test_region_codes_are_upper_cased() {
        let mut lower = item("lower");
        lower.region_availability = RegionAvailability {
            global: false,
            regions: [("us".to_owned(), true), ("global".to_owned(), true)]
                .into_iter()
                .collect(),
        };

        let catalog = Catalog::new(vec![lower]).unwrap();
        let availability = &catalog.items()[0].region_availability;
        assert!(availability.flag("US"));
        assert!(availability.global);
        assert_eq!(catalog.regions(), vec!["US".to_owned()]);
    }

    #[test]
    fn test_from_toml_str() {
        let toml = r#"
            [[battery]]
            id = "one"
            brand = "Acme"
            model = "One"
            tier = "diy"
            chemistry = "lfp"
            usable_kwh_per_unit = 2.5
            region_availability = { GLOBAL = true }
        "#;
        let catalog = Catalog::from_toml_str(toml).unwrap();
        assert_eq!(catalog.len(), 1);
        let one = catalog.get("one").unwrap();
        assert_eq!(one.chemistry, Chemistry::Lfp);
        assert!((one.effective_nameplate_kwh() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_toml_str_parse_error() {
        let err = Catalog::from_toml_str("[[battery]]\nid = ").unwrap_err();
        assert!(matches!(err, Error::CatalogParse(_)));
    }

    #[test]
    fn test_from_json_accepts_array_and_object() {
        let array = r#"[{"id":"x","brand":"Acme","model":"X","tier":"premium",
            "chemistry":"NMC","usable_kwh_per_unit":10.0}]"#;
        let object = format!(r#"{{"battery": {array}}}"#);

        assert_eq!(Catalog::from_json_str(array).unwrap().len(), 1);
        assert_eq!(Catalog::from_json_str(&object).unwrap().len(), 1);
    }

    #[test]
    fn test_from_json_rejects_object_without_battery_list() {
        let misspelled = r#"{"batteries": [{"id":"x","brand":"Acme","model":"X",
            "tier":"premium","chemistry":"NMC","usable_kwh_per_unit":10.0}]}"#;
        for content in [misspelled, "{}"] {
            let err = Catalog::from_json_str(content).unwrap_err();
            assert!(matches!(err, Error::CatalogJson(_)), "{content} accepted");
        }
    }

    #[test]
    fn test_from_toml_rejects_unknown_top_level_key() {
        let err = Catalog::from_toml_str("[[batteries]]\nid = \"x\"\n").unwrap_err();
        assert!(matches!(err, Error::CatalogParse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        let json = serde_json::to_string(&vec![item("a"), item("b")]).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("b").unwrap().model, "B");
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let file = NamedTempFile::with_suffix(".yaml").unwrap();
        let err = Catalog::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedCatalogFormat(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Catalog::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_filtered_uses_recommender_filters() {
        let catalog = Catalog::builtin().unwrap();
        let india = catalog.filtered(Some("in"), TierFilter::All, ChemistryFilter::All);
        assert!(!india.is_empty());
        assert!(
            india
                .iter()
                .all(|i| i.region_availability.is_available_in("IN"))
        );

        let nmc = catalog.filtered(None, TierFilter::All, ChemistryFilter::Nmc);
        assert!(nmc.iter().all(|i| i.chemistry == Chemistry::Nmc));
    }
}
