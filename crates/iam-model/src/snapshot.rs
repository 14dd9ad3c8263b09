//! Whole-server snapshot document.

use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::ModelResult;
use crate::realm::Realm;
use crate::user::User;

/// Every realm, client and user known to a server.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ServerData {
    /// All realms, with embedded members.
    #[serde(default, alias = "Realms")]
    pub realms: Vec<Realm>,
    /// Global client table.
    #[serde(default, alias = "Clients")]
    pub clients: Vec<Client>,
    /// Global user table.
    #[serde(default, alias = "Users")]
    pub users: Vec<User>,
}

impl ServerData {
    /// Decodes a snapshot document.
    pub fn from_slice(bytes: &[u8]) -> ModelResult<Self> {
        let data: Self = serde_json::from_slice(bytes)?;
        for client in data
            .clients
            .iter()
            .chain(data.realms.iter().flat_map(|r| r.clients.iter()))
        {
            client.validate()?;
        }
        Ok(data)
    }

    /// Finds a realm by exact name.
    #[must_use]
    pub fn realm(&self, name: &str) -> Option<&Realm> {
        self.realms.iter().find(|r| r.name == name)
    }
}
