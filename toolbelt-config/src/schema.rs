//! Strongly typed configuration schema.

use serde::{Deserialize, Serialize};
use toolbelt_primitives::{DEFAULT_GROUP, validate_group};

/// Settings shared by a toolbelt registry and its host application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolbeltConfig {
    /// Group assigned to tools registered without one.
    pub default_group: String,
    /// Default `strict` flag used when formatting schemas for providers.
    pub strict_schemas: bool,
    /// `tracing` filter directive used when the host initialises logging.
    pub log_filter: String,
}

impl Default for ToolbeltConfig {
    fn default() -> Self {
        Self {
            default_group: DEFAULT_GROUP.to_owned(),
            strict_schemas: false,
            log_filter: "info".to_owned(),
        }
    }
}

impl ToolbeltConfig {
    /// Sets the default group.
    #[must_use]
    pub fn with_default_group(mut self, group: impl Into<String>) -> Self {
        self.default_group = group.into();
        self
    }

    /// Sets the default strict flag.
    #[must_use]
    pub fn with_strict_schemas(mut self, strict: bool) -> Self {
        self.strict_schemas = strict;
        self
    }

    /// Sets the log filter directive.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Checks the configuration for values the registry cannot use.
    ///
    /// # Errors
    ///
    /// Returns an error if the default group is blank or contains the group
    /// separator, or if the log filter is blank.
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_group(&self.default_group)?;
        if self.log_filter.trim().is_empty() {
            anyhow::bail!("log_filter cannot be empty");
        }
        Ok(())
    }
}
