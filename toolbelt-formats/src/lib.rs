//! Provider tool-schema formats.
//!
//! Each module renders a raw tool listing in the shape one provider's API
//! expects for its `tools` field. [`ProviderFormatter`] plugs all of them
//! into a [`Toolbelt`](toolbelt_tools::Toolbelt) as its
//! [`SchemaFormatter`](toolbelt_tools::SchemaFormatter).

#![warn(missing_docs, clippy::pedantic)]

pub mod anthropic;
pub mod gemini;
pub mod ollama;
pub mod openai;
pub mod provider;

pub use provider::ProviderFormatter;
