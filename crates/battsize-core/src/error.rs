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

//! Error types for the core crate

use crate::validation::ValidationResult;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {}", .0.summary())]
    Validation(ValidationResult),

    #[error("catalog parse error: {0}")]
    CatalogParse(#[from] toml::de::Error),

    #[error("catalog parse error: {0}")]
    CatalogJson(#[from] serde_json::Error),

    #[error("catalog read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid catalog item '{id}': {reason}")]
    InvalidCatalogItem { id: String, reason: String },

    #[error("duplicate catalog id: {0}")]
    DuplicateCatalogId(String),

    #[error("unsupported catalog format: {0} (expected .toml or .json)")]
    UnsupportedCatalogFormat(String),
}

pub type Result<T> = std::result::Result<T, Error>;
