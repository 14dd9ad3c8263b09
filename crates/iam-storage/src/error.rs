//! Storage error types.

use iam_model::ModelError;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Entity not found by name.
    #[error("Entity not found: {entity_type} with name '{name}'")]
    NotFound {
        /// Type of entity (e.g., "User", "Realm").
        entity_type: &'static str,
        /// Entity name.
        name: String,
    },

    /// Entity not found by id.
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFoundById {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity ID.
        id: Uuid,
    },

    /// Entity exists but is not a member of the realm.
    #[error("{entity_type} '{name}' is not a member of realm '{realm}'")]
    NotMember {
        /// Type of entity.
        entity_type: &'static str,
        /// Realm name.
        realm: String,
        /// Entity name.
        name: String,
    },

    /// Duplicate entity.
    #[error("Duplicate {entity_type}: {field} '{value}' already exists")]
    Duplicate {
        /// Type of entity.
        entity_type: &'static str,
        /// Field that caused the conflict.
        field: &'static str,
        /// Conflicting value.
        value: String,
    },

    /// Payload failed to decode or validate.
    #[error("Malformed {entity_type}: {reason}")]
    Malformed {
        /// Type of entity.
        entity_type: &'static str,
        /// Decode failure.
        reason: String,
    },

    /// An update tried to change the natural key of an entity.
    #[error("Cannot rename {entity_type} '{from}' to '{to}'")]
    RenameRejected {
        /// Type of entity.
        entity_type: &'static str,
        /// Stored name or id.
        from: String,
        /// Name or id in the payload.
        to: String,
    },

    /// Membership references entities the store does not have.
    #[error("Realm '{realm}' lists missing {entity_type} records: {missing:?}")]
    Inconsistent {
        /// Realm name.
        realm: String,
        /// Type of the missing entities.
        entity_type: &'static str,
        /// Names listed in the membership but absent from the store.
        missing: Vec<String>,
    },

    /// Underlying store unreachable or timed out.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Internal error.
    #[error("Internal storage error: {0}")]
    Internal(String),
}

impl StorageError {
    /// Creates a not found error for a named entity.
    #[must_use]
    pub fn not_found(entity_type: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            name: name.into(),
        }
    }

    /// Creates a not found by id error.
    #[must_use]
    pub const fn not_found_by_id(entity_type: &'static str, id: Uuid) -> Self {
        Self::NotFoundById { entity_type, id }
    }

    /// Creates a not member error.
    #[must_use]
    pub fn not_member(
        entity_type: &'static str,
        realm: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self::NotMember {
            entity_type,
            realm: realm.into(),
            name: name.into(),
        }
    }

    /// Creates a duplicate error.
    #[must_use]
    pub fn duplicate(
        entity_type: &'static str,
        field: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self::Duplicate {
            entity_type,
            field,
            value: value.into(),
        }
    }

    /// Creates a malformed payload error.
    #[must_use]
    pub fn malformed(entity_type: &'static str, reason: impl ToString) -> Self {
        Self::Malformed {
            entity_type,
            reason: reason.to_string(),
        }
    }

    /// Creates a rename rejected error.
    #[must_use]
    pub fn rename_rejected(
        entity_type: &'static str,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self::RenameRejected {
            entity_type,
            from: from.into(),
            to: to.into(),
        }
    }

    /// Wraps a model decoding failure.
    #[must_use]
    pub fn from_model_error(entity_type: &'static str, err: &ModelError) -> Self {
        Self::malformed(entity_type, err)
    }

    /// Checks if this is a not found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::NotFoundById { .. } | Self::NotMember { .. }
        )
    }

    /// Checks if this is a duplicate error.
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    /// Checks if the payload was rejected.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. } | Self::RenameRejected { .. })
    }

    /// Checks if the store was unreachable.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// Checks if the operation may succeed when retried.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.is_unavailable()
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
