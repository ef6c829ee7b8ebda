//! Configuration loaders.

use std::fs;
use std::path::Path;

use anyhow::Context;
use tracing::debug;

use crate::schema::ToolbeltConfig;

/// Overrides [`ToolbeltConfig::default_group`].
pub const ENV_DEFAULT_GROUP: &str = "TOOLBELT_DEFAULT_GROUP";
/// Overrides [`ToolbeltConfig::strict_schemas`] (`true`/`false`/`1`/`0`).
pub const ENV_STRICT_SCHEMAS: &str = "TOOLBELT_STRICT_SCHEMAS";
/// Overrides [`ToolbeltConfig::log_filter`].
pub const ENV_LOG: &str = "TOOLBELT_LOG";

impl ToolbeltConfig {
    /// Parses and validates a JSON document. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed, names unknown fields,
    /// or fails [`ToolbeltConfig::validate`].
    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        let config: Self =
            serde_json::from_str(raw).context("failed to parse toolbelt configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents are invalid.
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration from {}", path.display()))?;
        let config = Self::from_json_str(&raw)
            .with_context(|| format!("invalid configuration in {}", path.display()))?;
        debug!(path = %path.display(), "loaded toolbelt configuration");
        Ok(config)
    }

    /// Applies `TOOLBELT_*` environment variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an override holds an unparsable value or the
    /// resulting configuration fails validation.
    pub fn apply_env_overrides(self) -> anyhow::Result<Self> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides using the supplied variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ToolbeltConfig::apply_env_overrides`].
    pub fn apply_overrides_from<F>(mut self, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(group) = lookup(ENV_DEFAULT_GROUP) {
            self.default_group = group;
        }

        if let Some(strict) = lookup(ENV_STRICT_SCHEMAS) {
            self.strict_schemas = parse_flag(&strict)
                .with_context(|| format!("{ENV_STRICT_SCHEMAS} must be a boolean"))?;
        }

        if let Some(filter) = lookup(ENV_LOG) {
            self.log_filter = filter;
        }

        self.validate()?;
        Ok(self)
    }
}

fn parse_flag(raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("unrecognised flag value `{other}`"),
    }
}
