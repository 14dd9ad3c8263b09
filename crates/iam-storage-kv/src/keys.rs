//! Namespaced key scheme.
//!
//! Every key has the form `{namespace}.{kind}_{identifier}`:
//!
//! | Record | Key |
//! |---|---|
//! | Realm | `ns.realm_{realm}` |
//! | Client | `ns.client_{client}` |
//! | User | `ns.user_{user}` |
//! | Realm clients | `ns.realm_{realm}_clients` |
//! | Realm users | `ns.realm_{realm}_users` |
//!
//! These templates are shared with existing deployments and must not change.

use iam_storage::{StorageError, StorageResult};

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "fe";

const CLIENTS_SUFFIX: &str = "_clients";
const USERS_SUFFIX: &str = "_users";
const GLOB_CHARS: [char; 5] = ['*', '?', '[', ']', '\\'];

/// Builds keys for one namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpace {
    namespace: String,
}

impl Default for KeySpace {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl KeySpace {
    /// Creates a key space for the given namespace.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Malformed` if the namespace is empty or
    /// contains glob characters, which would break edge scans.
    pub fn new(namespace: impl Into<String>) -> StorageResult<Self> {
        let namespace = namespace.into();
        if namespace.is_empty() {
            return Err(StorageError::malformed("Namespace", "namespace is empty"));
        }
        if namespace.contains(GLOB_CHARS) {
            return Err(StorageError::malformed(
                "Namespace",
                format!("namespace '{namespace}' contains glob characters"),
            ));
        }
        Ok(Self { namespace })
    }

    /// Returns the namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Key of a realm document.
    #[must_use]
    pub fn realm(&self, realm: &str) -> String {
        format!("{}.realm_{realm}", self.namespace)
    }

    /// Key of a client document.
    #[must_use]
    pub fn client(&self, client: &str) -> String {
        format!("{}.client_{client}", self.namespace)
    }

    /// Key of a user document.
    #[must_use]
    pub fn user(&self, user: &str) -> String {
        format!("{}.user_{user}", self.namespace)
    }

    /// Key of a realm's client membership list.
    #[must_use]
    pub fn realm_clients(&self, realm: &str) -> String {
        format!("{}.realm_{realm}{CLIENTS_SUFFIX}", self.namespace)
    }

    /// Key of a realm's user membership list.
    #[must_use]
    pub fn realm_users(&self, realm: &str) -> String {
        format!("{}.realm_{realm}{USERS_SUFFIX}", self.namespace)
    }

    /// Pattern matching every client membership list.
    #[must_use]
    pub fn realm_clients_pattern(&self) -> String {
        self.realm_clients("*")
    }

    /// Pattern matching every user membership list.
    #[must_use]
    pub fn realm_users_pattern(&self) -> String {
        self.realm_users("*")
    }

    /// Checks whether a name can be stored as a realm.
    ///
    /// A realm named `x_users` would share its document key with the user
    /// list of realm `x`.
    #[must_use]
    pub fn is_valid_realm_name(name: &str) -> bool {
        !name.is_empty() && !name.ends_with(CLIENTS_SUFFIX) && !name.ends_with(USERS_SUFFIX)
    }

    /// Rejects realm names that would alias another key.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Malformed` for invalid names.
    pub fn validate_realm_name(name: &str) -> StorageResult<()> {
        if Self::is_valid_realm_name(name) {
            Ok(())
        } else {
            Err(StorageError::malformed(
                "Realm",
                format!("realm name '{name}' is empty or ends in '{CLIENTS_SUFFIX}'/'{USERS_SUFFIX}'"),
            ))
        }
    }
}
