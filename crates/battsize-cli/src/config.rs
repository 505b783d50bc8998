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

use anyhow::{Context, Result};
use battsize_core::{
    Catalog, DEFAULT_DOD, DEFAULT_EFFICIENCY, DEFAULT_RESERVE_BUFFER, ValidationResult,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const TOML_CONFIG_FILE: &str = "battsize.toml";
const JSON_CONFIG_FILE: &str = "battsize.json";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Defaults for sizing flags omitted on the command line
    #[serde(default)]
    pub defaults: SizingDefaults,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// File the configuration was read from, `None` when running on defaults
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// TOML or JSON catalog file; the built-in catalog is used when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizingDefaults {
    /// Depth of discharge in (0, 1]
    #[serde(default = "default_dod")]
    pub dod: f64,

    /// Round-trip efficiency in (0, 1]
    #[serde(default = "default_efficiency")]
    pub efficiency: f64,

    /// Safety margin in [0, 1)
    #[serde(default = "default_reserve_buffer")]
    pub reserve_buffer: f64,

    #[serde(default)]
    pub winter_mode: bool,
}

impl Default for SizingDefaults {
    fn default() -> Self {
        Self {
            dod: DEFAULT_DOD,
            efficiency: DEFAULT_EFFICIENCY,
            reserve_buffer: DEFAULT_RESERVE_BUFFER,
            winter_mode: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive (debug, info, warn, error); `RUST_LOG` wins
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_dod() -> f64 {
    DEFAULT_DOD
}

fn default_efficiency() -> f64 {
    DEFAULT_EFFICIENCY
}

fn default_reserve_buffer() -> f64 {
    DEFAULT_RESERVE_BUFFER
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

fn default_port() -> u16 {
    8099
}

fn default_log_level() -> String {
    "info".to_owned()
}

impl AppConfig {
    /// Load configuration from `explicit`, or `battsize.toml` / `battsize.json`
    /// in the working directory, falling back to defaults.
    ///
    /// Environment overrides are applied on top and the result is validated.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::resolve(explicit, Path::new("."), |key| std::env::var(key).ok())
    }

    fn resolve(
        explicit: Option<&Path>,
        search_dir: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config = if let Some(path) = explicit {
            Self::from_file(path)?
        } else {
            let toml_path = search_dir.join(TOML_CONFIG_FILE);
            let json_path = search_dir.join(JSON_CONFIG_FILE);
            if toml_path.is_file() {
                Self::from_file(&toml_path)?
            } else if json_path.is_file() {
                Self::from_file(&json_path)?
            } else {
                Self::default()
            }
        };

        config.apply_env_overrides(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML or JSON config file, chosen by extension
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let mut config: Self = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?,
            Some("toml") => toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?,
            _ => anyhow::bail!(
                "Unsupported config file '{}' (expected .toml or .json)",
                path.display()
            ),
        };

        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Apply `BATTSIZE_*` overrides, reading variables through `env`
    fn apply_env_overrides(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(path) = env("BATTSIZE_CATALOG") {
            self.catalog.path = Some(PathBuf::from(path));
        }
        if let Some(host) = env("BATTSIZE_HOST") {
            self.server.host = host;
        }
        if let Some(port) = env("BATTSIZE_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("BATTSIZE_PORT is not a valid port: '{port}'"))?;
        }
        if let Some(level) = env("BATTSIZE_LOG") {
            self.logging.level = level;
        }
        Ok(())
    }

    /// Validate configuration with field-level error reporting
    pub fn validate_detailed(&self) -> ValidationResult {
        let mut result = ValidationResult::success();

        let defaults = &self.defaults;
        if !(defaults.dod > 0.0 && defaults.dod <= 1.0) {
            result.add_error("defaults.dod", "Depth of discharge must be in (0, 1]");
        }
        if !(defaults.efficiency > 0.0 && defaults.efficiency <= 1.0) {
            result.add_error("defaults.efficiency", "Efficiency must be in (0, 1]");
        }
        if !(0.0..1.0).contains(&defaults.reserve_buffer) {
            result.add_error("defaults.reserve_buffer", "Reserve buffer must be in [0, 1)");
        }

        if self.server.host.trim().is_empty() {
            result.add_error("server.host", "Host cannot be empty");
        }
        if self.server.port == 0 {
            result.add_error("server.port", "Port must be between 1 and 65535");
        }
        if self.server.port < 1024 && self.server.port != 0 {
            result.add_warning(
                "server.port",
                "Ports below 1024 usually require elevated privileges",
            );
        }

        if let Some(path) = &self.catalog.path
            && !path.is_file()
        {
            result.add_warning(
                "catalog.path",
                format!("Catalog file {} does not exist", path.display()),
            );
        }

        if self.logging.level.trim().is_empty() {
            result.add_error("logging.level", "Log level cannot be empty");
        }

        result
    }

    /// Validate configuration, failing on the first error
    pub fn validate(&self) -> Result<()> {
        let result = self.validate_detailed();
        if let Some(issue) = result.errors.first() {
            anyhow::bail!("Invalid configuration: {issue}");
        }
        Ok(())
    }

    /// Catalog selected by this configuration
    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog.path {
            Some(path) => Catalog::load(path)
                .with_context(|| format!("Failed to load battery catalog {}", path.display())),
            None => Catalog::builtin().context("Failed to load built-in battery catalog"),
        }
    }

    /// Log a startup summary; call after tracing is installed
    pub fn log_summary(&self) {
        match &self.source {
            Some(path) => info!("✅ Loaded configuration from {}", path.display()),
            None => info!("No configuration file found, using defaults"),
        }
        info!(
            "   Sizing defaults: DoD {:.2}, efficiency {:.2}, reserve {:.2}, winter {}",
            self.defaults.dod,
            self.defaults.efficiency,
            self.defaults.reserve_buffer,
            self.defaults.winter_mode
        );
        match &self.catalog.path {
            Some(path) => info!("   Catalog: {}", path.display()),
            None => info!("   Catalog: built-in"),
        }
        for warning in &self.validate_detailed().warnings {
            warn!("Configuration warning: {}", warning);
        }
    }
}
