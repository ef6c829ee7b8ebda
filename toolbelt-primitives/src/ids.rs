//! Invocation identifier types.

use std::fmt::{self, Display, Formatter};

use uuid::Uuid;

/// Identifies one tool invocation in logs and traces.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct InvocationId(Uuid);

impl InvocationId {
    /// Generates a random invocation identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for InvocationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}
