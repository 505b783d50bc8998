// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! CLI argument definitions using clap.

use crate::config::SizingDefaults;
use battsize_core::{ChemistryFilter, RecommendationInputs, SizingInputs, TierFilter};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "battsize")]
#[command(author, version, about = "Home battery sizing calculator and product recommender")]
#[command(
    long_about = "Size a home battery bank from daily consumption and recommend catalog products.\n\
    \nSizing turns daily load, days of autonomy and efficiency losses into the usable\n\
    and nameplate capacity to buy. Recommendations size every catalog product against\n\
    the usable target and list the closest adequate matches per tier.\n\
    \nExamples:\n  \
    battsize size --daily-load 10                  # 1 day, default losses\n  \
    battsize size --daily-load 12 --days 2 --winter\n  \
    battsize recommend --usable 12.8 --region US\n  \
    battsize plan --daily-load 10 --region AU --tier diy\n  \
    battsize serve --port 8099"
)]
pub struct Cli {
    /// Configuration file (TOML or JSON)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Calculate load target, usable and nameplate capacity
    Size(SizeArgs),

    /// Recommend catalog products for a usable capacity target
    Recommend(RecommendArgs),

    /// Size the battery, then recommend products for the result
    #[command(
        long_about = "Run the sizing calculator and feed its usable capacity straight into\n\
        the recommender.\n\
        \nExamples:\n  \
        battsize plan --daily-load 10\n  \
        battsize plan --daily-load 18 --days 2 --region US --chemistry lfp"
    )]
    Plan(PlanArgs),

    /// List the battery catalog
    Catalog(FilterArgs),

    /// Serve the HTTP API
    Serve(ServeArgs),
}

#[derive(Debug, Args)]
pub struct SizeArgs {
    /// Average daily consumption in kWh
    #[arg(long, value_name = "KWH")]
    pub daily_load: f64,

    /// Days the battery must carry the load without recharge
    #[arg(long, default_value_t = 1)]
    pub days: u32,

    /// Depth of discharge in (0, 1]
    #[arg(long, help = "Depth of discharge (default from config, 0.8)")]
    pub dod: Option<f64>,

    /// Round-trip efficiency in (0, 1]
    #[arg(long, help = "Round-trip efficiency (default from config, 0.9)")]
    pub efficiency: Option<f64>,

    /// Add a 20% uplift for winter conditions
    #[arg(long, default_value_t = false)]
    pub winter: bool,

    /// Safety margin in [0, 1)
    #[arg(long, help = "Reserve buffer fraction (default from config, 0.15)")]
    pub reserve: Option<f64>,
}

impl SizeArgs {
    /// Build calculator inputs, taking omitted values from `defaults`
    pub fn to_inputs(&self, defaults: &SizingDefaults) -> SizingInputs {
        SizingInputs::new(self.daily_load, self.days)
            .with_dod(self.dod.unwrap_or(defaults.dod))
            .with_efficiency(self.efficiency.unwrap_or(defaults.efficiency))
            .with_winter_mode(self.winter || defaults.winter_mode)
            .with_reserve_buffer(self.reserve.unwrap_or(defaults.reserve_buffer))
    }
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Region code, e.g. US, AU, DE; GLOBAL or omitted disables the filter
    #[arg(long)]
    pub region: Option<String>,

    /// Product tier (all, premium, mid, diy)
    #[arg(long, default_value = "all")]
    pub tier: TierFilter,

    /// Cell chemistry (all, lfp, nmc, other)
    #[arg(long, default_value = "all")]
    pub chemistry: ChemistryFilter,
}

impl FilterArgs {
    /// Recommender inputs for `target_kwh` with these filters
    pub fn to_inputs(&self, target_kwh: f64) -> RecommendationInputs {
        let mut inputs = RecommendationInputs::new(target_kwh)
            .with_tier(self.tier)
            .with_chemistry(self.chemistry);
        inputs.location_tag.clone_from(&self.region);
        inputs
    }
}

#[derive(Debug, Args)]
pub struct RecommendArgs {
    /// Usable capacity target in kWh
    #[arg(long, value_name = "KWH")]
    pub usable: f64,

    #[command(flatten)]
    pub filters: FilterArgs,
}

#[derive(Debug, Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub sizing: SizeArgs,

    #[command(flatten)]
    pub filters: FilterArgs,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Interface to bind (default from config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (default from config)
    #[arg(long)]
    pub port: Option<u16>,
}
