/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Engine configuration loading and management.
//!
//! The jitter windows used by the reminder engine are load-bearing: property
//! tests, the engine and the simulator must all agree on them.  They live here
//! as public constants and as fields of [`EngineConfig`].
//!
//! The expected YAML structure is:
//! ```yaml
//! reminders:
//!   overdue_window_secs: 86400
//!   random_jitter_factor: 1.2
//!   random_yields_to_deadline: true
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Duration;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Upper bound of the OVERDUE nag offset after `now` (1 day).
pub const DEFAULT_OVERDUE_WINDOW_SECS: i64 = 86_400;

/// RANDOM alarms land anywhere in `(now, now + factor × period)`.
///
/// `1.2` = up to 20 % past the nominal period, so many tasks sharing a period
/// do not ring at the same instant.
pub const RANDOM_JITTER_FACTOR: f64 = 1.2;

/// A RANDOM candidate is dropped when the deadline arrives no later than
/// one nominal period from now.
pub const DEFAULT_RANDOM_YIELDS_TO_DEADLINE: bool = true;

// ── Errors ────────────────────────────────────────────────────────────────────

/// A configuration value outside the range the engine can work with.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The overdue window must be strictly positive, otherwise no OVERDUE
    /// alarm could ever land strictly after `now`.
    #[error("overdue_window_secs must be > 0 (got {0})")]
    NonPositiveOverdueWindow(i64),

    /// The jitter factor must be finite and at least `1.0`.
    #[error("random_jitter_factor must be a finite value >= 1.0 (got {0})")]
    InvalidJitterFactor(f64),

    /// The value does not fit in a `chrono::Duration`.
    #[error("{field} = {secs}s is out of range")]
    OutOfRange { field: &'static str, secs: i64 },
}

// ── Private YAML deserialization types ────────────────────────────────────────

/// Top-level wrapper that maps directly onto the YAML file layout.
#[derive(Debug, Deserialize)]
struct EngineConfigFile {
    #[serde(default)]
    reminders: Option<ReminderSection>,
}

/// `reminders:` section.  Every key is optional; missing values fall back to
/// the defaults above.
#[derive(Debug, Deserialize)]
struct ReminderSection {
    #[serde(default = "default_overdue_window_secs")]
    overdue_window_secs: i64,
    #[serde(default = "default_random_jitter_factor")]
    random_jitter_factor: f64,
    #[serde(default = "default_random_yields_to_deadline")]
    random_yields_to_deadline: bool,
}

fn default_overdue_window_secs() -> i64 {
    DEFAULT_OVERDUE_WINDOW_SECS
}

fn default_random_jitter_factor() -> f64 {
    RANDOM_JITTER_FACTOR
}

fn default_random_yields_to_deadline() -> bool {
    DEFAULT_RANDOM_YIELDS_TO_DEADLINE
}

// ── Public data structures ────────────────────────────────────────────────────

/// Tunables of the reminder engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// OVERDUE alarms land in `(now, now + overdue_window]`.
    pub overdue_window: Duration,

    /// RANDOM alarms land in `(now, now + random_jitter_factor × period)`.
    pub random_jitter_factor: f64,

    /// Drop the RANDOM candidate when a pending DUE alarm falls within
    /// `(now, now + period]`.  `false` gives plain earliest-wins.
    pub random_yields_to_deadline: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            overdue_window: Duration::seconds(DEFAULT_OVERDUE_WINDOW_SECS),
            random_jitter_factor: RANDOM_JITTER_FACTOR,
            random_yields_to_deadline: DEFAULT_RANDOM_YIELDS_TO_DEADLINE,
        }
    }
}

impl EngineConfig {
    /// Build a validated config from raw values.
    pub fn from_parts(
        overdue_window_secs: i64,
        random_jitter_factor: f64,
        random_yields_to_deadline: bool,
    ) -> Result<Self, ConfigError> {
        if overdue_window_secs <= 0 {
            return Err(ConfigError::NonPositiveOverdueWindow(overdue_window_secs));
        }
        if !random_jitter_factor.is_finite() || random_jitter_factor < 1.0 {
            return Err(ConfigError::InvalidJitterFactor(random_jitter_factor));
        }

        Ok(Self {
            overdue_window: seconds("overdue_window_secs", overdue_window_secs)?,
            random_jitter_factor,
            random_yields_to_deadline,
        })
    }
}

fn seconds(field: &'static str, secs: i64) -> Result<Duration, ConfigError> {
    Duration::try_seconds(secs).ok_or(ConfigError::OutOfRange { field, secs })
}

// ── EngineConfigManager ───────────────────────────────────────────────────────

/// Loads and holds the engine configuration from a YAML file.
///
/// Until a file is loaded, [`config`](Self::config) returns the built-in
/// defaults.
#[derive(Debug, Default)]
pub struct EngineConfigManager {
    config: EngineConfig,

    /// Set to `true` after a successful [`load_from_file`](Self::load_from_file).
    loaded: bool,
}

impl EngineConfigManager {
    /// Creates a manager holding the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `path` and replaces the current configuration.
    ///
    /// * A file without a `reminders:` section yields the defaults.
    /// * Calling this method a second time replaces the previous values.
    /// * On error the manager falls back to the defaults and reports
    ///   `is_loaded() == false`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, the YAML is structurally
    /// invalid, or a value fails [`EngineConfig::from_parts`] validation.
    pub fn load_from_file(&mut self, path: &Path) -> Result<()> {
        info!("Loading engine configuration from: {}", path.display());

        // Reset state before (re-)loading
        self.config = EngineConfig::default();
        self.loaded = false;

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        let file: EngineConfigFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?;

        let config = match file.reminders {
            Some(section) => {
                debug!(
                    overdue_window_secs = section.overdue_window_secs,
                    random_jitter_factor = section.random_jitter_factor,
                    random_yields_to_deadline = section.random_yields_to_deadline,
                    "  reminders section"
                );
                EngineConfig::from_parts(
                    section.overdue_window_secs,
                    section.random_jitter_factor,
                    section.random_yields_to_deadline,
                )
                .with_context(|| format!("Invalid reminder settings in {}", path.display()))?
            }
            None => {
                warn!("No reminders section found in configuration file, using defaults");
                EngineConfig::default()
            }
        };

        info!(
            overdue_window_secs = config.overdue_window.num_seconds(),
            random_jitter_factor = config.random_jitter_factor,
            random_yields_to_deadline = config.random_yields_to_deadline,
            "Engine configuration loaded"
        );

        self.config = config;
        self.loaded = true;
        Ok(())
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns `true` after a successful call to [`load_from_file`](Self::load_from_file).
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
