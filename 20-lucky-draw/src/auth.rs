//! Login gate in front of the operator commands.
//!
//! This is a static, client-side credential check that only hides the
//! controls from a casual passer-by. It is not a security boundary: the
//! credentials ship with the binary and the flag is a plain file anyone with
//! access to the data directory can write.

use tracing::info;

use crate::error::AuthError;
use crate::persistence::Persistence;

pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "Vnvc@2026";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

impl Credentials {
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

/// Checks the pair and records the login flag on success.
pub fn login(
    persistence: &Persistence,
    expected: &Credentials,
    username: &str,
    password: &str,
) -> Result<(), AuthError> {
    if !expected.matches(username, password) {
        return Err(AuthError::InvalidCredentials);
    }
    persistence.set_authed()?;
    info!(username, "operator logged in");
    Ok(())
}
