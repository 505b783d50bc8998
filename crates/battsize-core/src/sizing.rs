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

//! Battery sizing calculator

use battsize_types::{SizingBreakdown, SizingInputs, SizingResult};
use tracing::trace;

/// Load uplift applied in winter mode
pub const WINTER_MULTIPLIER: f64 = 1.2;

/// Convert sizing inputs into load target, usable and nameplate capacity.
///
/// Intermediates are carried at full precision; each output field is rounded
/// only once, at the end. The nameplate figure is always rounded *up* to the
/// next 0.5 kWh so the sticker capacity is never under-reported.
///
/// Zero `efficiency` or `dod` is a caller contract violation and yields
/// non-finite values. Validate with
/// [`validate_sizing_inputs`](crate::validation::validate_sizing_inputs) first.
pub fn calculate(inputs: &SizingInputs) -> SizingResult {
    let base_load = inputs.daily_load_kwh * f64::from(inputs.days_of_autonomy);
    let winter_multiplier = if inputs.winter_mode {
        WINTER_MULTIPLIER
    } else {
        1.0
    };
    let reserve_multiplier = 1.0 + inputs.reserve_buffer;

    // AC side
    let load_target = base_load * winter_multiplier * reserve_multiplier;
    // DC side
    let battery_usable = load_target / inputs.efficiency;
    let battery_nameplate = battery_usable / inputs.dod;

    trace!(
        base_load,
        load_target,
        battery_usable,
        battery_nameplate,
        "sizing intermediates"
    );

    SizingResult {
        load_target_kwh: round_to_tenth(load_target),
        battery_usable_needed_kwh: round_to_tenth(battery_usable),
        battery_nameplate_needed_kwh: round_up_to_half(battery_nameplate),
        breakdown: SizingBreakdown {
            daily_load_kwh: inputs.daily_load_kwh,
            days_of_autonomy: inputs.days_of_autonomy,
            base_load_kwh: base_load,
            winter_mode: inputs.winter_mode,
            winter_multiplier,
            reserve_buffer: inputs.reserve_buffer,
            reserve_multiplier,
            efficiency: inputs.efficiency,
            dod: inputs.dod,
            load_target_exact_kwh: load_target,
            battery_usable_exact_kwh: battery_usable,
            battery_nameplate_exact_kwh: battery_nameplate,
        },
    }
}

/// Round to one decimal place (half away from zero)
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round up to the next multiple of 0.5
pub fn round_up_to_half(value: f64) -> f64 {
    (value * 2.0).ceil() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_default_household_scenario() {
        let inputs = SizingInputs {
            daily_load_kwh: 10.0,
            days_of_autonomy: 1,
            dod: 0.8,
            efficiency: 0.9,
            winter_mode: false,
            reserve_buffer: 0.15,
        };
        let result = calculate(&inputs);

        assert!(approx_eq(result.load_target_kwh, 11.5));
        assert!(approx_eq(result.battery_usable_needed_kwh, 12.8));
        assert!(approx_eq(result.battery_nameplate_needed_kwh, 16.0));
    }

    #[test]
    fn test_winter_mode_without_reserve() {
        let inputs = SizingInputs::new(10.0, 1)
            .with_winter_mode(true)
            .with_reserve_buffer(0.0);
        let result = calculate(&inputs);

        assert!(approx_eq(result.load_target_kwh, 12.0));
        assert!(approx_eq(result.battery_usable_needed_kwh, 13.3));
        assert!(approx_eq(result.battery_nameplate_needed_kwh, 17.0));
    }

    #[test]
    fn test_breakdown_records_every_step() {
        let inputs = SizingInputs::new(8.0, 3).with_winter_mode(true);
        let result = calculate(&inputs);
        let b = result.breakdown;

        assert!(approx_eq(b.base_load_kwh, 24.0));
        assert!(approx_eq(b.winter_multiplier, 1.2));
        assert!(approx_eq(b.reserve_multiplier, 1.15));
        assert!(approx_eq(b.load_target_exact_kwh, 24.0 * 1.2 * 1.15));
        assert!(approx_eq(
            b.battery_usable_exact_kwh,
            b.load_target_exact_kwh / 0.9
        ));
        assert!(approx_eq(
            b.battery_nameplate_exact_kwh,
            b.battery_usable_exact_kwh / 0.8
        ));
        assert_eq!(b.days_of_autonomy, 3);
        assert!(b.winter_mode);
    }

    #[test]
    fn test_usable_is_derived_from_unrounded_load_target() {
        // Load target 3.611 displays as 3.6; 3.6 / 0.1 would give 36.0 instead of 36.1
        let inputs = SizingInputs::new(3.14, 1)
            .with_efficiency(0.1)
            .with_dod(1.0);
        let result = calculate(&inputs);

        assert!(approx_eq(result.load_target_kwh, 3.6));
        assert!(approx_eq(result.battery_usable_needed_kwh, 36.1));
        assert!(approx_eq(result.battery_nameplate_needed_kwh, 36.5));
    }

    #[test]
    fn test_nameplate_is_rounded_up_never_down() {
        // 10 * 1.15 / 0.9 / 0.8 = 15.97
        let result = calculate(&SizingInputs::new(10.0, 1));
        assert!(result.battery_nameplate_needed_kwh >= result.breakdown.battery_nameplate_exact_kwh);

        assert!(approx_eq(round_up_to_half(16.01), 16.5));
        assert!(approx_eq(round_up_to_half(16.0), 16.0));
        assert!(approx_eq(round_up_to_half(0.1), 0.5));
    }

    #[test]
    fn test_monotonic_and_half_multiple_over_input_grid() {
        let loads = [0.5, 1.0, 4.2, 7.7, 10.0, 18.3, 33.0, 64.9];
        let dods = [0.5, 0.8, 0.9, 1.0];
        let efficiencies = [0.75, 0.9, 0.96, 1.0];
        let reserves = [0.0, 0.1, 0.15, 0.3];

        for &load in &loads {
            for days in 1..=7 {
                for &dod in &dods {
                    for &efficiency in &efficiencies {
                        for &reserve in &reserves {
                            for winter in [false, true] {
                                let inputs = SizingInputs {
                                    daily_load_kwh: load,
                                    days_of_autonomy: days,
                                    dod,
                                    efficiency,
                                    winter_mode: winter,
                                    reserve_buffer: reserve,
                                };
                                let r = calculate(&inputs);

                                assert!(
                                    r.battery_nameplate_needed_kwh >= r.battery_usable_needed_kwh,
                                    "nameplate < usable for {inputs:?}"
                                );
                                assert!(
                                    r.battery_usable_needed_kwh >= r.load_target_kwh,
                                    "usable < load target for {inputs:?}"
                                );
                                let doubled = r.battery_nameplate_needed_kwh * 2.0;
                                assert!(approx_eq(doubled, doubled.round()));
                                assert!(
                                    r.battery_nameplate_needed_kwh
                                        >= r.breakdown.battery_nameplate_exact_kwh
                                );
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_calculate_is_idempotent() {
        let inputs = SizingInputs::new(14.7, 2).with_winter_mode(true);
        assert_eq!(calculate(&inputs), calculate(&inputs));
    }

    #[test]
    fn test_round_to_tenth() {
        assert!(approx_eq(round_to_tenth(12.777_777), 12.8));
        assert!(approx_eq(round_to_tenth(13.333_333), 13.3));
        assert!(approx_eq(round_to_tenth(11.5), 11.5));
    }
}
