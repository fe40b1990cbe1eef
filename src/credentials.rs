//! Endpoint credentials.
//!
//! The password is taken from the environment or config file first, then
//! from the OS keyring.

use crate::config::EndpointConfig;
use crate::error::{Result, SqlExecError};
use keyring::Entry;
use tracing::{debug, warn};

const SERVICE_NAME: &str = "sqlexec";

/// Keyring account name for an endpoint user.
pub fn keyring_account(endpoint: &EndpointConfig, user: &str) -> String {
    format!("{}@{}", user, endpoint.base_url)
}

/// Resolves the password to send with requests.
///
/// Keyring failures are logged and treated as "no password".
pub fn resolve_password(endpoint: &EndpointConfig) -> Option<String> {
    if let Some(password) = &endpoint.password {
        return Some(password.clone());
    }

    let user = endpoint.user.as_deref()?;
    match retrieve(&keyring_account(endpoint, user)) {
        Ok(Some(password)) => {
            debug!("Using keyring password for {}", user);
            Some(password)
        }
        Ok(None) => None,
        Err(e) => {
            warn!("{}", e);
            None
        }
    }
}

/// Stores the endpoint password in the keyring.
pub fn store_password(endpoint: &EndpointConfig, password: &str) -> Result<()> {
    let user = endpoint
        .user
        .as_deref()
        .ok_or_else(|| SqlExecError::config("An endpoint user is required to store a password"))?;

    let entry = Entry::new(SERVICE_NAME, &keyring_account(endpoint, user))
        .map_err(|e| SqlExecError::config(format!("Failed to create keyring entry: {e}")))?;

    entry
        .set_password(password)
        .map_err(|e| SqlExecError::config(format!("Failed to store password: {e}")))
}

fn retrieve(account: &str) -> Result<Option<String>> {
    let entry = Entry::new(SERVICE_NAME, account)
        .map_err(|e| SqlExecError::config(format!("Failed to access keyring: {e}")))?;

    match entry.get_password() {
        Ok(secret) => Ok(Some(secret)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(SqlExecError::config(format!(
            "Failed to retrieve password: {e}"
        ))),
    }
}
