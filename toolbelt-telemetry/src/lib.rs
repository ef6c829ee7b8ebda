//! Tracing subscriber setup for hosts embedding a toolbelt.
//!
//! The registry only emits `tracing` events; installing a subscriber is left
//! to the host. These helpers install the same `fmt` subscriber for every
//! host, filtered by `RUST_LOG` or the configured directive.

#![warn(missing_docs, clippy::pedantic)]

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use toolbelt_config::ToolbeltConfig;
use tracing_subscriber::EnvFilter;

/// Environment variable that takes precedence over the configured filter.
pub const RUST_LOG_ENV: &str = "RUST_LOG";

/// Subscriber settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Filter directive used when `RUST_LOG` is unset, e.g. `"info,toolbelt_tools=debug"`.
    pub filter: String,
    /// Print the event target (module path).
    pub with_target: bool,
    /// Print the event level.
    pub with_level: bool,
    /// Emit ANSI colour codes.
    pub ansi: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
            with_target: false,
            with_level: true,
            ansi: true,
        }
    }
}

impl TelemetryConfig {
    /// Sets the fallback filter directive.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Enables or disables ANSI colour output.
    #[must_use]
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    /// Picks the directive to use: `rust_log` when set and non-blank,
    /// otherwise the configured filter.
    #[must_use]
    pub fn directive(&self, rust_log: Option<&str>) -> String {
        rust_log
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(&self.filter)
            .to_owned()
    }

    /// Builds the [`EnvFilter`] for `rust_log` (normally the value of
    /// `RUST_LOG`).
    ///
    /// # Errors
    ///
    /// Returns an error if the selected directive does not parse.
    pub fn env_filter(&self, rust_log: Option<&str>) -> anyhow::Result<EnvFilter> {
        let directive = self.directive(rust_log);
        EnvFilter::try_new(&directive)
            .with_context(|| format!("invalid tracing filter `{directive}`"))
    }
}

impl From<&ToolbeltConfig> for TelemetryConfig {
    fn from(config: &ToolbeltConfig) -> Self {
        Self::default().with_filter(config.log_filter.clone())
    }
}

/// Installs the global `fmt` subscriber.
///
/// # Errors
///
/// Returns an error if the filter directive is invalid or a global
/// subscriber is already installed.
pub fn try_init_tracing(config: &TelemetryConfig) -> anyhow::Result<()> {
    let rust_log = std::env::var(RUST_LOG_ENV).ok();
    let filter = config.env_filter(rust_log.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .with_level(config.with_level)
        .with_ansi(config.ansi)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))?;

    tracing::debug!(filter = %config.filter, "tracing initialised");
    Ok(())
}

/// Installs the global `fmt` subscriber, ignoring failures.
///
/// Returns `true` when this call installed the subscriber, `false` when the
/// filter was invalid or another subscriber was already in place.
pub fn init_tracing(config: &TelemetryConfig) -> bool {
    match try_init_tracing(config) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "tracing not initialised");
            false
        }
    }
}
