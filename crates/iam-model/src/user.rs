//! User domain model.
//!
//! A user is an arbitrary JSON document. Only the identity core is
//! validated: the id lives at `info.sub` and the login name at
//! `info.preferred_username`. Everything else is carried through untouched
//! and re-serialized verbatim.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{ModelError, ModelResult};

/// A user account with its raw attribute document.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: Uuid,
    username: String,
    raw: Value,
}

impl User {
    /// Decodes and validates a user payload.
    pub fn from_slice(bytes: &[u8]) -> ModelResult<Self> {
        let raw: Value = serde_json::from_slice(bytes)?;
        Self::try_from(raw)
    }

    /// Returns the user's unique identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the username, the storage key of the record.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the full raw document.
    #[must_use]
    pub const fn raw(&self) -> &Value {
        &self.raw
    }

    /// Returns the `info` object.
    #[must_use]
    pub fn info(&self) -> Option<&serde_json::Map<String, Value>> {
        self.raw.get("info").and_then(Value::as_object)
    }

    /// Looks up a single claim under `info`.
    #[must_use]
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.info().and_then(|info| info.get(name))
    }

    /// Consumes the user, yielding the raw document.
    #[must_use]
    pub fn into_raw(self) -> Value {
        self.raw
    }
}

impl TryFrom<Value> for User {
    type Error = ModelError;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        let info = raw
            .get("info")
            .and_then(Value::as_object)
            .ok_or(ModelError::MissingField("info"))?;

        let username = info
            .get("preferred_username")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .ok_or(ModelError::MissingField("info.preferred_username"))?
            .to_owned();

        let sub = info
            .get("sub")
            .and_then(Value::as_str)
            .ok_or(ModelError::MissingField("info.sub"))?;
        let id = Uuid::parse_str(sub)
            .map_err(|e| ModelError::invalid("info.sub", e.to_string()))?;
        if id.is_nil() {
            return Err(ModelError::invalid("info.sub", "nil UUID"));
        }

        Ok(Self { id, username, raw })
    }
}

impl Serialize for User {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for User {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Self::try_from(raw).map_err(serde::de::Error::custom)
    }
}
