//! Client domain model.
//!
//! Clients represent applications that request tokens from the
//! authorization server. A client record is global; realms reference it
//! through membership edges, so one client may be shared by several realms.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ModelError, ModelResult};

/// Client type based on OAuth 2.0 client types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientType {
    /// Confidential client (can keep secrets).
    #[default]
    Confidential,
    /// Public client (cannot keep secrets, e.g., SPAs, mobile apps).
    Public,
}

/// How a client proves its identity.
///
/// Stored as an integer discriminant on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AuthenticationType {
    /// Client id plus shared secret.
    #[default]
    ClientIdAndSecret,
}

impl TryFrom<u8> for AuthenticationType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::ClientIdAndSecret),
            other => Err(format!("unknown authentication type {other}")),
        }
    }
}

impl From<AuthenticationType> for u8 {
    fn from(value: AuthenticationType) -> Self {
        match value {
            AuthenticationType::ClientIdAndSecret => 1,
        }
    }
}

/// Authentication material attached to a client.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Authentication {
    /// Authentication method.
    #[serde(rename = "type")]
    pub auth_type: AuthenticationType,
    /// Secret or other credential value.
    pub value: String,
    /// Method specific attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<serde_json::Value>,
}

/// A registered client application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Public or confidential.
    #[serde(rename = "type", default)]
    pub client_type: ClientType,
    /// Globally unique identifier.
    pub id: Uuid,
    /// Client name, the storage key of the record.
    pub name: String,
    /// Authentication material.
    #[serde(default)]
    pub auth: Authentication,
}

impl Client {
    /// Creates a confidential client with a secret.
    #[must_use]
    pub fn new_confidential(id: Uuid, name: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            client_type: ClientType::Confidential,
            id,
            name: name.into(),
            auth: Authentication {
                auth_type: AuthenticationType::ClientIdAndSecret,
                value: secret.into(),
                attributes: None,
            },
        }
    }

    /// Creates a public client.
    #[must_use]
    pub fn new_public(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            client_type: ClientType::Public,
            id,
            name: name.into(),
            auth: Authentication::default(),
        }
    }

    /// Decodes and validates a client payload.
    pub fn from_slice(bytes: &[u8]) -> ModelResult<Self> {
        let client: Self = serde_json::from_slice(bytes)?;
        client.validate()?;
        Ok(client)
    }

    /// Checks the fields every stored client must carry.
    pub fn validate(&self) -> ModelResult<()> {
        if self.name.is_empty() {
            return Err(ModelError::MissingField("name"));
        }
        if self.id.is_nil() {
            return Err(ModelError::invalid("id", "nil UUID"));
        }
        Ok(())
    }

    /// Checks whether this is a public client.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.client_type == ClientType::Public
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_wire_format() {
        let raw = br#"{
            "type": "confidential",
            "id": "d4dc483d-7d0d-4d2e-a0a0-2d34b55e5a14",
            "name": "test-service-app-client",
            "auth": {"type": 1, "value": "fb6Z4RsOadVycQoeQiN57xpu8w8wplYz"}
        }"#;

        let client = Client::from_slice(raw).unwrap();
        assert_eq!(client.name, "test-service-app-client");
        assert_eq!(client.client_type, ClientType::Confidential);
        assert_eq!(client.auth.auth_type, AuthenticationType::ClientIdAndSecret);
        assert_eq!(client.auth.value, "fb6Z4RsOadVycQoeQiN57xpu8w8wplYz");
    }

    #[test]
    fn public_client_creation() {
        let client = Client::new_public(Uuid::new_v4(), "spa-app");

        assert!(client.is_public());
        assert!(client.auth.value.is_empty());
    }

    #[test]
    fn unknown_auth_type_is_rejected() {
        let raw = br#"{"id": "d4dc483d-7d0d-4d2e-a0a0-2d34b55e5a14", "name": "app", "auth": {"type": 9, "value": ""}}"#;

        assert!(matches!(Client::from_slice(raw), Err(ModelError::Decode(_))));
    }

    #[test]
    fn empty_name_is_rejected() {
        let raw = br#"{"id": "d4dc483d-7d0d-4d2e-a0a0-2d34b55e5a14", "name": ""}"#;

        assert!(matches!(
            Client::from_slice(raw),
            Err(ModelError::MissingField("name"))
        ));
    }

    #[test]
    fn nil_id_is_rejected() {
        let raw = br#"{"id": "00000000-0000-0000-0000-000000000000", "name": "app"}"#;

        assert!(matches!(
            Client::from_slice(raw),
            Err(ModelError::InvalidField { field: "id", .. })
        ));
    }
}
