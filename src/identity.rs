//! Signed-in user identity
//!
//! A small record (display name and email) stored under its own key.
//! There is no real authentication; signing in only records who is
//! using this workspace.

use crate::backend::{Storage, USER_KEY};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Display name used when neither a name nor an email local part is usable
pub const DEFAULT_DISPLAY_NAME: &str = "Creator";

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
}

impl UserProfile {
    /// Build a profile, deriving the display name when none is given
    pub fn new(email: &str, name: Option<&str>) -> Result<Self> {
        let email = email.trim();
        let Some((local, domain)) = email.split_once('@') else {
            return Err(Error::invalid_input(format!(
                "Invalid email address: {}",
                email
            )));
        };
        if domain.is_empty() {
            return Err(Error::invalid_input(format!(
                "Invalid email address: {}",
                email
            )));
        }

        let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None if !local.is_empty() => local.to_string(),
            None => DEFAULT_DISPLAY_NAME.to_string(),
        };

        Ok(Self {
            name,
            email: email.to_string(),
        })
    }

    /// Upper-cased first letter of the name, for compact display
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('?')
    }
}

/// Load, save, and clear the user record
pub struct IdentityStore;

impl IdentityStore {
    /// Read the current user; a corrupt record is removed
    pub fn load<S: Storage>(storage: &mut S) -> Result<Option<UserProfile>> {
        let Some(raw) = storage.read(USER_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str::<UserProfile>(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!(error = %e, "discarding corrupt user record");
                storage.delete(USER_KEY)?;
                Ok(None)
            }
        }
    }

    /// Record a sign-in
    pub fn sign_in<S: Storage>(
        storage: &mut S,
        email: &str,
        name: Option<&str>,
    ) -> Result<UserProfile> {
        let user = UserProfile::new(email, name)?;
        storage.write(USER_KEY, &serde_json::to_string(&user)?)?;
        info!(name = %user.name, "signed in");
        Ok(user)
    }

    /// Forget the current user
    pub fn clear<S: Storage>(storage: &mut S) -> Result<()> {
        storage.delete(USER_KEY)?;
        info!("signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryStorage;

    #[test]
    fn test_name_defaults_to_email_local_part() {
        let user = UserProfile::new("ada@example.com", None).unwrap();
        assert_eq!(user.name, "ada");
        assert_eq!(user.email, "ada@example.com");

        let user = UserProfile::new("ada@example.com", Some("  ")).unwrap();
        assert_eq!(user.name, "ada");
    }

    #[test]
    fn test_explicit_name_wins() {
        let user = UserProfile::new("ada@example.com", Some("Ada Lovelace")).unwrap();
        assert_eq!(user.name, "Ada Lovelace");
        assert_eq!(user.initial(), 'A');
    }

    #[test]
    fn test_empty_local_part_uses_default_name() {
        let user = UserProfile::new("@example.com", None).unwrap();
        assert_eq!(user.name, DEFAULT_DISPLAY_NAME);
    }

    #[test]
    fn test_rejects_invalid_email() {
        assert!(UserProfile::new("not-an-email", None).is_err());
        assert!(UserProfile::new("ada@", None).is_err());
    }

    #[test]
    fn test_sign_in_load_clear() {
        let mut storage = MemoryStorage::new();
        assert_eq!(IdentityStore::load(&mut storage).unwrap(), None);

        let user = IdentityStore::sign_in(&mut storage, "ada@example.com", None).unwrap();
        assert_eq!(IdentityStore::load(&mut storage).unwrap(), Some(user));

        IdentityStore::clear(&mut storage).unwrap();
        IdentityStore::clear(&mut storage).unwrap();
        assert!(!storage.contains(USER_KEY));
    }

    #[test]
    fn test_corrupt_record_is_removed() {
        let mut storage = MemoryStorage::new();
        storage.write(USER_KEY, "[]").unwrap();
        assert_eq!(IdentityStore::load(&mut storage).unwrap(), None);
        assert!(!storage.contains(USER_KEY));
    }
}
