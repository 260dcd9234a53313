//! Account credentials consumed by key derivation.

use secrecy::{ExposeSecret, SecretString};

use crate::crypto::key::{derive, DerivedKey};
use crate::error::{NotecryptError, Result};

/// A password paired with the account it unlocks.
///
/// The password is held in a `SecretString` and the value is consumed by
/// [`AccountSecret::derive_key`]; it is never retained after derivation.
pub struct AccountSecret {
    password: SecretString,
    account_identifier: String,
}

impl AccountSecret {
    /// Validate and wrap credentials.
    ///
    /// # Errors
    ///
    /// Returns `NotecryptError::KeyDerivation` if either input is empty or
    /// whitespace-only.
    pub fn new(password: impl Into<String>, account_identifier: impl Into<String>) -> Result<Self> {
        let password = password.into();
        let account_identifier = account_identifier.into();
        validate_credentials(&password, &account_identifier)?;
        Ok(Self {
            password: SecretString::from(password),
            account_identifier,
        })
    }

    /// The account this secret belongs to.
    pub fn account_identifier(&self) -> &str {
        &self.account_identifier
    }

    /// Derive the account key, consuming the secret.
    pub fn derive_key(self) -> Result<DerivedKey> {
        derive(self.password.expose_secret(), &self.account_identifier)
    }
}

impl std::fmt::Debug for AccountSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountSecret")
            .field("password", &"[REDACTED]")
            .field("account_identifier", &self.account_identifier)
            .finish()
    }
}

/// Check that credentials are usable for derivation.
pub fn validate_credentials(password: &str, account_identifier: &str) -> Result<()> {
    if password.trim().is_empty() {
        return Err(NotecryptError::KeyDerivation(
            "Password cannot be empty".to_string(),
        ));
    }
    if account_identifier.trim().is_empty() {
        return Err(NotecryptError::KeyDerivation(
            "Account identifier cannot be empty".to_string(),
        ));
    }
    Ok(())
}
