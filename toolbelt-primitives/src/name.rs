//! Group-qualified tool names.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Group used for tools registered without an explicit group.
pub const DEFAULT_GROUP: &str = "default";

/// Separator between the group and the tool name in a qualified name.
pub const GROUP_SEPARATOR: char = '.';

/// A tool name as supplied by a caller, optionally qualified by its group.
///
/// Parsing splits on the *first* separator only, so `"a.b.c"` names the
/// tool `"b.c"` in group `"a"`.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct ToolName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group: Option<String>,
    name: String,
}

impl ToolName {
    /// Parses a qualified (`"group.name"`) or bare (`"name"`) tool name.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(GROUP_SEPARATOR) {
            Some((group, name)) => Self {
                group: Some(group.to_owned()),
                name: name.to_owned(),
            },
            None => Self {
                group: None,
                name: raw.to_owned(),
            },
        }
    }

    /// Creates a fully qualified name from its parts.
    #[must_use]
    pub fn qualified(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: Some(group.into()),
            name: name.into(),
        }
    }

    /// Returns the group, if the name was qualified.
    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Returns the bare tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` when a group was supplied.
    #[must_use]
    pub fn is_qualified(&self) -> bool {
        self.group.is_some()
    }
}

impl Display for ToolName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.group {
            Some(group) => write!(f, "{group}{GROUP_SEPARATOR}{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Validates a group identifier.
///
/// # Errors
///
/// Returns [`Error::InvalidGroup`] if the group is blank or contains the
/// group separator, which would make its qualified names ambiguous.
pub fn validate_group(group: &str) -> Result<()> {
    if group.trim().is_empty() {
        return Err(Error::InvalidGroup {
            group: group.into(),
            reason: "group cannot be empty".into(),
        });
    }

    if group.contains(GROUP_SEPARATOR) {
        return Err(Error::InvalidGroup {
            group: group.into(),
            reason: format!("group cannot contain `{GROUP_SEPARATOR}`"),
        });
    }

    Ok(())
}

/// Validates a bare tool name.
///
/// # Errors
///
/// Returns [`Error::InvalidToolName`] if the name is blank.
pub fn validate_tool_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidToolName {
            name: name.into(),
            reason: "tool name cannot be empty".into(),
        });
    }
    Ok(())
}
