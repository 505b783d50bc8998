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

//! CLI entry point for BattSize

use anyhow::{Context, Result};
use battsize_cli::{
    AppConfig,
    cli::{Cli, Commands, FilterArgs, PlanArgs, RecommendArgs, ServeArgs, SizeArgs, TableFormatter},
};
use battsize_core::{
    Catalog, ValidationIssue, calculate, validate_recommendation_inputs, validate_sizing_inputs,
};
use battsize_web::{PlanResponse, start_web_server};
use clap::Parser;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    init_tracing(&config.logging.level)?;
    config.log_summary();

    let catalog = config.load_catalog()?;
    debug!("Catalog ready: {} batteries", catalog.len());

    match cli.command {
        Commands::Size(args) => size_command(&args, &config, cli.json),
        Commands::Recommend(args) => recommend_command(&args, &catalog, cli.json),
        Commands::Plan(args) => plan_command(&args, &config, &catalog, cli.json),
        Commands::Catalog(args) => catalog_command(&args, &catalog, cli.json),
        Commands::Serve(args) => serve_command(args, &config, catalog),
    }
}

/// Install the global subscriber; `RUST_LOG` takes precedence over the configured level.
/// Logs go to stderr so `--json` output on stdout stays machine-readable.
fn init_tracing(level: &str) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")
}

fn size_command(args: &SizeArgs, config: &AppConfig, json: bool) -> Result<()> {
    let inputs = args.to_inputs(&config.defaults);
    let validation = validate_sizing_inputs(&inputs).into_result()?;
    let result = calculate(&inputs);

    if json {
        return print_json(&result);
    }
    print!("{}", TableFormatter::format_sizing(&result));
    print_warnings(&validation.warnings);
    Ok(())
}

fn recommend_command(args: &RecommendArgs, catalog: &Catalog, json: bool) -> Result<()> {
    let inputs = args.filters.to_inputs(args.usable);
    let validation = validate_recommendation_inputs(&inputs, catalog).into_result()?;
    let result = catalog.recommend(&inputs);

    if json {
        return print_json(&result);
    }
    print!(
        "{}",
        TableFormatter::format_recommendations(&result, inputs.battery_usable_needed_kwh)
    );
    print_warnings(&validation.warnings);
    Ok(())
}

fn plan_command(args: &PlanArgs, config: &AppConfig, catalog: &Catalog, json: bool) -> Result<()> {
    let sizing_inputs = args.sizing.to_inputs(&config.defaults);
    let mut validation = validate_sizing_inputs(&sizing_inputs).into_result()?;
    let sizing = calculate(&sizing_inputs);

    let inputs = args.filters.to_inputs(sizing.battery_usable_needed_kwh);
    validation.merge(validate_recommendation_inputs(&inputs, catalog));
    let validation = validation.into_result()?;

    let plan = PlanResponse {
        sizing,
        recommendations: catalog.recommend(&inputs),
        warnings: validation.warnings,
    };

    if json {
        return print_json(&plan);
    }
    print!("{}", TableFormatter::format_sizing(&plan.sizing));
    println!();
    print!(
        "{}",
        TableFormatter::format_recommendations(
            &plan.recommendations,
            plan.sizing.battery_usable_needed_kwh
        )
    );
    print_warnings(&plan.warnings);
    Ok(())
}

fn catalog_command(args: &FilterArgs, catalog: &Catalog, json: bool) -> Result<()> {
    let items = catalog.filtered(args.region.as_deref(), args.tier, args.chemistry);
    if json {
        return print_json(&items);
    }
    print!("{}", TableFormatter::format_catalog(&items));
    Ok(())
}

fn serve_command(args: ServeArgs, config: &AppConfig, catalog: Catalog) -> Result<()> {
    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    anyhow::ensure!(port != 0, "Port must be between 1 and 65535");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    info!("🚀 Starting BattSize API");
    runtime
        .block_on(start_web_server(Arc::new(catalog), &host, port))
        .map_err(|e| anyhow::anyhow!("Web server failed: {e}"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

fn print_warnings(warnings: &[ValidationIssue]) {
    if !warnings.is_empty() {
        print!("\n{}", TableFormatter::format_warnings(warnings));
    }
}
