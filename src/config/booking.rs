//! Booking configuration structures.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::{AppResult, BookingRules, NoticeTemplate};

/// Session store backend selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreBackendConfig {
    /// In-memory store for development/testing.
    InMemory,
    /// JSON snapshot on local disk.
    File {
        /// Directory holding the snapshot.
        path: PathBuf,
        /// Snapshot file stem.
        #[serde(default = "default_stream")]
        stream: String,
    },
}

fn default_stream() -> String {
    "bookings".into()
}

/// Proactive expiry sweep settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Run the sweeper. Off by default: expiry is otherwise evaluated lazily on accept.
    #[serde(default)]
    pub enabled: bool,
    /// Seconds between sweeps.
    #[serde(default = "default_sweep_interval")]
    pub interval_secs: u64,
}

const fn default_sweep_interval() -> u64 {
    30
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: default_sweep_interval(),
        }
    }
}

/// Root booking configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Seconds before class start after which enroll/cancel are refused.
    #[serde(default = "default_cutoff")]
    pub enrollment_cutoff_secs: u64,
    /// Seconds a notified waiter has to accept.
    #[serde(default = "default_acceptance")]
    pub acceptance_window_secs: u64,
    /// Store backend.
    #[serde(default = "default_store")]
    pub store: StoreBackendConfig,
    /// Expiry sweep.
    #[serde(default)]
    pub sweep: SweepConfig,
    /// Seat-released notice text.
    #[serde(default)]
    pub notice: NoticeTemplate,
    /// Events kept by the in-memory audit sink; 0 disables auditing.
    #[serde(default = "default_audit_capacity")]
    pub audit_capacity: usize,
}

const fn default_cutoff() -> u64 {
    30 * 60
}

const fn default_acceptance() -> u64 {
    5 * 60
}

const fn default_store() -> StoreBackendConfig {
    StoreBackendConfig::InMemory
}

const fn default_audit_capacity() -> usize {
    1024
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            enrollment_cutoff_secs: default_cutoff(),
            acceptance_window_secs: default_acceptance(),
            store: default_store(),
            sweep: SweepConfig::default(),
            notice: NoticeTemplate::default(),
            audit_capacity: default_audit_capacity(),
        }
    }
}

impl BookingConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.acceptance_window_secs == 0 {
            return Err("acceptance_window_secs must be greater than 0".into());
        }
        if self.sweep.enabled && self.sweep.interval_secs == 0 {
            return Err("sweep.interval_secs must be greater than 0 when the sweep is enabled".into());
        }
        if let StoreBackendConfig::File { path, stream } = &self.store {
            if path.as_os_str().is_empty() {
                return Err("store.path must not be empty".into());
            }
            if stream.is_empty() {
                return Err("store.stream must not be empty".into());
            }
        }
        if self.notice.title.trim().is_empty() {
            return Err("notice.title must not be empty".into());
        }
        Ok(())
    }

    /// Time-window rules derived from this configuration.
    pub const fn rules(&self) -> BookingRules {
        BookingRules {
            enrollment_cutoff: Duration::from_secs(self.enrollment_cutoff_secs),
            acceptance_window: Duration::from_secs(self.acceptance_window_secs),
        }
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from the environment (a `.env` file is honored).
    ///
    /// `BOOKING_CONFIG` points at a JSON file; without it, defaults are
    /// overridden by `BOOKING_CUTOFF_SECS`, `BOOKING_ACCEPT_WINDOW_SECS`,
    /// `BOOKING_STORE_PATH` and `BOOKING_SWEEP_INTERVAL_SECS` (which also
    /// enables the sweep).
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`BookingConfig::from_env`] with an injectable variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        if let Some(path) = lookup("BOOKING_CONFIG") {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading BOOKING_CONFIG at {path}"))?;
            return Self::from_json_str(&raw).map_err(anyhow::Error::msg);
        }

        let mut cfg = Self::default();
        if let Some(v) = lookup("BOOKING_CUTOFF_SECS") {
            cfg.enrollment_cutoff_secs = v.parse().context("BOOKING_CUTOFF_SECS")?;
        }
        if let Some(v) = lookup("BOOKING_ACCEPT_WINDOW_SECS") {
            cfg.acceptance_window_secs = v.parse().context("BOOKING_ACCEPT_WINDOW_SECS")?;
        }
        if let Some(path) = lookup("BOOKING_STORE_PATH") {
            cfg.store = StoreBackendConfig::File {
                path: PathBuf::from(path),
                stream: default_stream(),
            };
        }
        if let Some(v) = lookup("BOOKING_SWEEP_INTERVAL_SECS") {
            cfg.sweep = SweepConfig {
                enabled: true,
                interval_secs: v.parse().context("BOOKING_SWEEP_INTERVAL_SECS")?,
            };
        }
        cfg.validate().map_err(anyhow::Error::msg)?;
        Ok(cfg)
    }
}
