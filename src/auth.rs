//! Sign-in gate producing the [`SessionIdentity`] that unlocks bootstrap.
//!
//! Credentials are checked against the configured account table. There is no
//! remote identity provider; the signed-in user is persisted so it survives a
//! restart and cleared on logout.

use crate::domain::error::{CatalogError, Result};
use crate::domain::SessionIdentity;
use crate::storage::PersistenceBridge;
use std::collections::BTreeMap;

/// Message carried by [`CatalogError::Auth`] for rejected credentials.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Accounts accepted when the configuration names none.
#[must_use]
pub fn default_accounts() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("admin".to_string(), "admin".to_string()),
        ("user".to_string(), "password".to_string()),
    ])
}

/// Tracks who is signed in.
#[derive(Debug, Clone)]
pub struct Authenticator {
    accounts: BTreeMap<String, String>,
    persistence: PersistenceBridge,
    current: Option<SessionIdentity>,
}

impl Authenticator {
    #[must_use]
    pub const fn new(accounts: BTreeMap<String, String>, persistence: PersistenceBridge) -> Self {
        Self {
            accounts,
            persistence,
            current: None,
        }
    }

    /// Signs in the persisted user from a previous run, if any.
    pub fn restore(&mut self) -> Option<&SessionIdentity> {
        self.current = self.persistence.read_user();
        if let Some(identity) = &self.current {
            tracing::debug!(user = %identity.username, "restored signed-in user");
        }
        self.current.as_ref()
    }

    /// Checks `username` and `password` and signs the user in.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Auth`] if the credentials do not match a
    /// configured account. The current sign-in is left unchanged.
    pub fn login(&mut self, username: &str, password: &str) -> Result<SessionIdentity> {
        let username = username.trim();
        let accepted = self
            .accounts
            .get(username)
            .is_some_and(|expected| expected == password);

        if !accepted {
            tracing::info!(user = %username, "login rejected");
            return Err(CatalogError::Auth(INVALID_CREDENTIALS.to_string()));
        }

        let identity = SessionIdentity::new(username);
        if let Err(e) = self.persistence.write_user(&identity) {
            tracing::warn!(error = %e, "failed to persist signed-in user");
        }

        tracing::info!(user = %username, "signed in");
        self.current = Some(identity.clone());
        Ok(identity)
    }

    /// Signs out and forgets the persisted user.
    pub fn logout(&mut self) {
        if let Some(identity) = self.current.take() {
            tracing::info!(user = %identity.username, "signed out");
        }
        if let Err(e) = self.persistence.remove_user() {
            tracing::warn!(error = %e, "failed to forget signed-in user");
        }
    }

    #[must_use]
    pub const fn current(&self) -> Option<&SessionIdentity> {
        self.current.as_ref()
    }
}
