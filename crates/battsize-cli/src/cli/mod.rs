// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! Command-line interface for the sizing calculator and recommender.

pub mod args;
pub mod formatters;

pub use args::{Cli, Commands, FilterArgs, PlanArgs, RecommendArgs, ServeArgs, SizeArgs};
pub use formatters::TableFormatter;
