//! Membership edge entries.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A `(id, name)` pair recorded in a realm's membership arrays.
///
/// The name is the lookup key; the id allows resolving members by
/// identifier without fetching every record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtendedIdentifier {
    /// Member identifier.
    pub id: Uuid,
    /// Member name.
    pub name: String,
}

impl ExtendedIdentifier {
    /// Creates a new identifier pair.
    #[must_use]
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
