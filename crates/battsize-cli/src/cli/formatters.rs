// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! Table output for sizing and recommendation results.

use battsize_core::{
    BatteryCatalogItem, LIMITED_CATALOG_THRESHOLD, PriceRange, RecommendationResult,
    RecommendedBattery, SizingResult, Tier, ValidationIssue,
};
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, presets::UTF8_FULL};

/// Formatter for pretty terminal tables
#[derive(Debug)]
pub struct TableFormatter;

impl TableFormatter {
    /// Format a sizing result with its step-by-step breakdown
    pub fn format_sizing(result: &SizingResult) -> String {
        let b = &result.breakdown;
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![
            Cell::new("Step").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        let rows = [
            ("Daily load", format!("{:.2} kWh", b.daily_load_kwh)),
            ("Days of autonomy", b.days_of_autonomy.to_string()),
            ("Base load", format!("{:.2} kWh", b.base_load_kwh)),
            (
                "Winter uplift",
                if b.winter_mode {
                    format!("×{:.2}", b.winter_multiplier)
                } else {
                    "off".to_owned()
                },
            ),
            (
                "Reserve buffer",
                format!("{:.0}% (×{:.2})", b.reserve_buffer * 100.0, b.reserve_multiplier),
            ),
            ("Efficiency", format!("{:.0}%", b.efficiency * 100.0)),
            ("Depth of discharge", format!("{:.0}%", b.dod * 100.0)),
        ];
        for (label, value) in rows {
            table.add_row(vec![Cell::new(label), Cell::new(value)]);
        }

        let totals = [
            ("Load target (AC)", result.load_target_kwh),
            ("Usable capacity needed (DC)", result.battery_usable_needed_kwh),
            ("Nameplate capacity needed", result.battery_nameplate_needed_kwh),
        ];
        for (label, kwh) in totals {
            table.add_row(vec![
                Cell::new(label).add_attribute(Attribute::Bold),
                Cell::new(format!("{kwh:.1} kWh"))
                    .fg(Color::Green)
                    .add_attribute(Attribute::Bold),
            ]);
        }

        let mut output = table.to_string();
        output.push('\n');
        output
    }

    /// Format recommendations as one table per tier
    pub fn format_recommendations(result: &RecommendationResult, target_kwh: f64) -> String {
        let mut output = format!("Recommendations for {target_kwh:.1} kWh usable capacity\n");

        for tier in Tier::all() {
            let candidates = result.tier(*tier);
            output.push_str(&format!("\n{} ({})\n", tier.display_name(), candidates.len()));
            if candidates.is_empty() {
                output.push_str("  No matching batteries\n");
                continue;
            }
            output.push_str(&Self::candidate_table(candidates).to_string());
            output.push('\n');
        }

        let meta = &result.metadata;
        output.push_str(&format!(
            "\n{} of {} catalog batteries matched the filters\n",
            meta.filtered_size, meta.catalog_size
        ));
        if meta.is_limited_catalog {
            output.push_str(&format!(
                "Note: fewer than {LIMITED_CATALOG_THRESHOLD} batteries match, local availability may be broader than this catalog\n"
            ));
        }
        output
    }

    fn candidate_table(candidates: &[RecommendedBattery]) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Battery").add_attribute(Attribute::Bold),
            Cell::new("Chem.").add_attribute(Attribute::Bold),
            Cell::new("Units").add_attribute(Attribute::Bold),
            Cell::new("Usable\n(kWh)").add_attribute(Attribute::Bold),
            Cell::new("Nameplate\n(kWh)").add_attribute(Attribute::Bold),
            Cell::new("Coverage").add_attribute(Attribute::Bold),
            Cell::new("Power\n(kW)").add_attribute(Attribute::Bold),
            Cell::new("Est. price").add_attribute(Attribute::Bold),
        ]);

        for (rank, candidate) in candidates.iter().enumerate() {
            let coverage = Cell::new(format!("{:.1}%", candidate.coverage));
            let coverage = if candidate.is_undersized {
                coverage.fg(Color::Red)
            } else if rank == 0 {
                coverage.fg(Color::Green)
            } else {
                coverage
            };

            table.add_row(vec![
                Cell::new(rank + 1),
                Cell::new(candidate.battery.display_name()),
                Cell::new(candidate.battery.chemistry),
                Cell::new(candidate.count).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.2}", candidate.total_usable_kwh)),
                Cell::new(format!("{:.2}", candidate.total_nameplate_kwh)),
                coverage,
                Cell::new(
                    candidate
                        .total_continuous_kw
                        .map_or_else(|| "-".to_owned(), |kw| format!("{kw:.1}")),
                ),
                Cell::new(format_price(candidate.estimated_price.as_ref())),
            ]);
        }
        table
    }

    /// Format catalog items as a single table
    pub fn format_catalog(items: &[&BatteryCatalogItem]) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Battery").add_attribute(Attribute::Bold),
            Cell::new("Tier").add_attribute(Attribute::Bold),
            Cell::new("Chem.").add_attribute(Attribute::Bold),
            Cell::new("Usable\n(kWh)").add_attribute(Attribute::Bold),
            Cell::new("Nameplate\n(kWh)").add_attribute(Attribute::Bold),
            Cell::new("Power\n(kW)").add_attribute(Attribute::Bold),
            Cell::new("Warranty").add_attribute(Attribute::Bold),
            Cell::new("Regions").add_attribute(Attribute::Bold),
        ]);

        for item in items {
            let regions = if item.region_availability.global {
                "GLOBAL".to_owned()
            } else {
                item.region_availability
                    .available_regions()
                    .collect::<Vec<_>>()
                    .join(", ")
            };

            table.add_row(vec![
                Cell::new(&item.id),
                Cell::new(item.display_name()),
                Cell::new(item.tier.display_name()),
                Cell::new(item.chemistry),
                Cell::new(format!("{:.2}", item.usable_kwh_per_unit)),
                Cell::new(format!("{:.2}", item.effective_nameplate_kwh())),
                Cell::new(
                    item.continuous_kw_per_unit
                        .map_or_else(|| "-".to_owned(), |kw| format!("{kw:.1}")),
                ),
                Cell::new(
                    item.warranty_years
                        .map_or_else(|| "-".to_owned(), |years| format!("{years} y")),
                ),
                Cell::new(regions),
            ]);
        }

        let mut output = table.to_string();
        output.push_str(&format!("\n{} batteries\n", items.len()));
        output
    }

    /// Format validation warnings, one per line
    pub fn format_warnings(warnings: &[ValidationIssue]) -> String {
        warnings
            .iter()
            .map(|issue| format!("⚠️  {issue}\n"))
            .collect()
    }
}

fn format_price(price: Option<&PriceRange>) -> String {
    match price {
        Some(p) => format!("{} {:.0}-{:.0}", p.currency, p.min, p.max),
        None => "-".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battsize_core::{Catalog, RecommendationInputs, SizingInputs, calculate};

    #[test]
    fn test_format_sizing_shows_totals() {
        let result = calculate(&SizingInputs::new(10.0, 1));
        let output = TableFormatter::format_sizing(&result);

        assert!(output.contains("Load target (AC)"));
        assert!(output.contains("11.5 kWh"));
        assert!(output.contains("12.8 kWh"));
        assert!(output.contains("16.0 kWh"));
        assert!(output.contains("off"));
    }

    #[test]
    fn test_format_recommendations_lists_every_tier() {
        let catalog = Catalog::builtin().unwrap();
        let result = catalog.recommend(&RecommendationInputs::new(10.0).with_location("IN"));
        let output = TableFormatter::format_recommendations(&result, 10.0);

        assert!(output.contains("Premium (0)"));
        assert!(output.contains("No matching batteries"));
        assert!(output.contains("Mid-range"));
        assert!(output.contains("Note: fewer than 8"));
    }

    #[test]
    fn test_format_catalog() {
        let catalog = Catalog::builtin().unwrap();
        let items: Vec<_> = catalog.items().iter().collect();
        let output = TableFormatter::format_catalog(&items);

        assert!(output.contains("tesla-powerwall-3"));
        assert!(output.contains("GLOBAL"));
        assert!(output.contains(&format!("{} batteries", items.len())));
    }

    #[test]
    fn test_format_price() {
        let price = PriceRange {
            min: 2000.0,
            max: 2500.0,
            currency: "USD".to_owned(),
        };
        assert_eq!(format_price(Some(&price)), "USD 2000-2500");
        assert_eq!(format_price(None), "-");
    }
}
