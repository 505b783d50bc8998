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

//! Battery recommender
//!
//! Filters the catalog by region, tier and chemistry, sizes every surviving
//! product against the usable capacity target and ranks each tier by
//! "closest adequate match":
//!
//! 1. configurations meeting the target before undersized ones
//! 2. coverage closest to 100% (least oversizing)
//! 3. fewer physical units
//! 4. brand, then model, alphabetically

use battsize_types::{
    BatteryCatalogItem, CatalogMetadata, ChemistryFilter, GLOBAL_REGION, RecommendationInputs,
    RecommendationResult, RecommendedBattery, Tier, TierFilter,
};
use std::cmp::Ordering;
use tracing::{debug, trace, warn};

/// Maximum number of recommendations returned per tier
pub const MAX_RESULTS_PER_TIER: usize = 6;

/// Below this many filtered items the UI should show a limited-catalog disclaimer
pub const LIMITED_CATALOG_THRESHOLD: usize = 8;

/// Coverage within this many percentage points below 100 still meets the target
pub const COVERAGE_EPSILON: f64 = 1e-6;

/// Recommend batteries from `catalog` for the requested usable capacity.
///
/// Never fails. An empty filtered catalog yields three empty tier lists with
/// `filtered_size == 0`.
pub fn recommend(
    catalog: &[BatteryCatalogItem],
    inputs: &RecommendationInputs,
) -> RecommendationResult {
    let region = normalize_region(inputs.location_tag.as_deref());
    let filtered = filter_items(
        catalog,
        region.as_deref(),
        inputs.tier_filter,
        inputs.chemistry_filter,
    );

    let metadata = CatalogMetadata {
        catalog_size: catalog.len(),
        filtered_size: filtered.len(),
        is_limited_catalog: filtered.len() < LIMITED_CATALOG_THRESHOLD,
    };

    debug!(
        target_kwh = inputs.battery_usable_needed_kwh,
        region = region.as_deref().unwrap_or(GLOBAL_REGION),
        tier = %inputs.tier_filter,
        chemistry = %inputs.chemistry_filter,
        catalog_size = metadata.catalog_size,
        filtered_size = metadata.filtered_size,
        "Filtered battery catalog"
    );

    let target = inputs.battery_usable_needed_kwh;
    if !is_valid_target(target) {
        warn!(
            "Usable capacity target {} is not a positive number, sizing every battery to a single unit",
            target
        );
    }

    let mut result = RecommendationResult {
        metadata,
        ..Default::default()
    };

    for item in filtered {
        let candidate = size_item(item, target);
        match item.tier {
            Tier::Premium => result.premium.push(candidate),
            Tier::Mid => result.mid_range.push(candidate),
            Tier::Diy => result.diy.push(candidate),
        }
    }

    for list in [&mut result.premium, &mut result.mid_range, &mut result.diy] {
        list.sort_by(compare_candidates);
        list.truncate(MAX_RESULTS_PER_TIER);
    }

    for candidate in result.iter() {
        trace!(
            id = %candidate.battery.id,
            count = candidate.count,
            coverage = candidate.coverage,
            "Ranked candidate"
        );
    }

    result
}

/// Apply the region, tier and chemistry filters, preserving catalog order
///
/// `location_tag` follows the same rules as [`RecommendationInputs::location_tag`]:
/// `None`, blank or `GLOBAL` disables region filtering.
pub fn filter_items<'a>(
    catalog: &'a [BatteryCatalogItem],
    location_tag: Option<&str>,
    tier_filter: TierFilter,
    chemistry_filter: ChemistryFilter,
) -> Vec<&'a BatteryCatalogItem> {
    let region = normalize_region(location_tag);
    catalog
        .iter()
        .filter(|item| {
            region
                .as_deref()
                .is_none_or(|code| item.region_availability.is_available_in(code))
        })
        .filter(|item| tier_filter.matches(item.tier))
        .filter(|item| chemistry_filter.matches(item.chemistry))
        .collect()
}

/// Size a single catalog item against `target_kwh`
pub fn size_item(item: &BatteryCatalogItem, target_kwh: f64) -> RecommendedBattery {
    let (count, coverage) = if is_valid_target(target_kwh) {
        let count = ((target_kwh / item.usable_kwh_per_unit).ceil() as u32).max(1);
        let total_usable = item.usable_kwh_per_unit * f64::from(count);
        (count, total_usable / target_kwh * 100.0)
    } else {
        (1, 100.0)
    };

    let units = f64::from(count);
    RecommendedBattery {
        battery: item.clone(),
        count,
        total_usable_kwh: item.usable_kwh_per_unit * units,
        total_nameplate_kwh: item.effective_nameplate_kwh() * units,
        coverage,
        is_undersized: coverage < 100.0 - COVERAGE_EPSILON,
        total_continuous_kw: item.continuous_kw_per_unit.map(|kw| kw * units),
        estimated_price: item.price_range.as_ref().map(|price| price.scaled(count)),
    }
}

/// Total order used to rank candidates within a tier, best match first
pub fn compare_candidates(a: &RecommendedBattery, b: &RecommendedBattery) -> Ordering {
    a.is_undersized
        .cmp(&b.is_undersized)
        .then_with(|| {
            if a.is_undersized {
                // Closest to target first
                b.coverage.total_cmp(&a.coverage)
            } else {
                // Least waste first
                a.coverage.total_cmp(&b.coverage)
            }
        })
        .then_with(|| a.count.cmp(&b.count))
        .then_with(|| compare_alphabetically(&a.battery.brand, &b.battery.brand))
        .then_with(|| compare_alphabetically(&a.battery.model, &b.battery.model))
        .then_with(|| a.battery.id.cmp(&b.battery.id))
}

fn compare_alphabetically(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Upper-cased region code, or `None` when no region filtering applies
pub fn normalize_region(tag: Option<&str>) -> Option<String> {
    let code = tag?.trim().to_uppercase();
    if code.is_empty() || code == GLOBAL_REGION {
        None
    } else {
        Some(code)
    }
}

fn is_valid_target(target_kwh: f64) -> bool {
    target_kwh.is_finite() && target_kwh > 0.0
}
