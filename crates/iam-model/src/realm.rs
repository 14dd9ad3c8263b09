//! Realm domain model.
//!
//! A realm is an isolated tenant. Its document may embed member clients and
//! users; the keyed backend stores the short form and keeps membership in
//! separate edge lists.

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::{ModelError, ModelResult};
use crate::user::User;

/// A realm and, optionally, its embedded members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Realm {
    /// Unique realm name.
    pub name: String,
    /// Member clients.
    #[serde(default)]
    pub clients: Vec<Client>,
    /// Member users.
    #[serde(default)]
    pub users: Vec<User>,
    /// Access token lifetime in seconds.
    #[serde(default)]
    pub token_expiration: i64,
    /// Refresh token lifetime in seconds.
    #[serde(default)]
    pub refresh_expiration: i64,
}

impl Realm {
    /// Creates a realm with no members.
    #[must_use]
    pub fn new(name: impl Into<String>, token_expiration: i64, refresh_expiration: i64) -> Self {
        Self {
            name: name.into(),
            clients: Vec::new(),
            users: Vec::new(),
            token_expiration,
            refresh_expiration,
        }
    }

    /// Decodes and validates a realm payload, including embedded members.
    pub fn from_slice(bytes: &[u8]) -> ModelResult<Self> {
        let realm: Self = serde_json::from_slice(bytes)?;
        if realm.name.is_empty() {
            return Err(ModelError::MissingField("name"));
        }
        for client in &realm.clients {
            client.validate()?;
        }
        Ok(realm)
    }

    /// Returns a copy without embedded members.
    #[must_use]
    pub fn without_members(&self) -> Self {
        Self {
            name: self.name.clone(),
            clients: Vec::new(),
            users: Vec::new(),
            token_expiration: self.token_expiration,
            refresh_expiration: self.refresh_expiration,
        }
    }

    /// Finds an embedded client by exact name.
    #[must_use]
    pub fn client(&self, name: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.name == name)
    }

    /// Finds an embedded user by exact username.
    #[must_use]
    pub fn user(&self, name: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username() == name)
    }
}
