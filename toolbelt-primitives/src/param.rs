//! Primitive type tags used in tool parameter schemas.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// JSON schema type tag for a single tool parameter.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// Text. Also the fallback for unrecognised types.
    #[default]
    String,
    /// Whole numbers.
    Integer,
    /// Floating point numbers.
    Number,
    /// `true` / `false`.
    Boolean,
    /// Ordered sequences.
    Array,
    /// Key/value mappings.
    Object,
}

impl ParamType {
    /// Returns the JSON schema `type` string for this tag.
    #[must_use]
    pub const fn json_type(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    /// Maps a primitive type descriptor to its schema tag.
    ///
    /// Accepts both the schema spellings (`"number"`), the short primitive
    /// names (`"float"`, `"dict"`) and Rust type paths (`"f64"`,
    /// `"Vec<String>"`, `"std::collections::HashMap<K, V>"`, `"&str"`).
    /// Anything else maps to [`ParamType::String`].
    #[must_use]
    pub fn from_type_name(descriptor: &str) -> Self {
        let trimmed = descriptor.trim().trim_start_matches('&').trim();
        let base = trimmed.split('<').next().unwrap_or(trimmed).trim();
        let last = base.rsplit("::").next().unwrap_or(base).trim();

        match last {
            "str" | "string" | "String" | "char" => Self::String,
            "int" | "integer" | "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8"
            | "u16" | "u32" | "u64" | "u128" | "usize" => Self::Integer,
            "float" | "number" | "f32" | "f64" => Self::Number,
            "bool" | "boolean" => Self::Boolean,
            "list" | "array" | "Vec" | "VecDeque" => Self::Array,
            "dict" | "object" | "HashMap" | "BTreeMap" | "Map" => Self::Object,
            _ => Self::String,
        }
    }
}

impl Display for ParamType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.json_type())
    }
}
