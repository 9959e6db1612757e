use std::fmt;

use super::{EurosignError, SecureString};

/// Environment variable holding the application's client ID.
pub const CLIENT_ID_ENV: &str = "EUROSIGN_CLIENT_ID";

/// Environment variable holding the application's client secret.
pub const CLIENT_SECRET_ENV: &str = "EUROSIGN_CLIENT_SECRET";

/// Application credentials issued by Eurosign ('Client ID' and 'Client Secret').
///
/// # Example
///
/// ```rust
/// use eurosign_client::Credentials;
///
/// let credentials = Credentials::new("my-client-id", "my-client-secret");
/// assert_eq!(credentials.client_id(), "my-client-id");
///
/// // The secret never leaks through Debug
/// assert!(!format!("{credentials:?}").contains("my-client-secret"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    client_secret: SecureString,
}

impl Credentials {
    /// Creates credentials from a client ID and a client secret.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<SecureString>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Reads the credentials from [`CLIENT_ID_ENV`] and [`CLIENT_SECRET_ENV`].
    ///
    /// # Errors
    ///
    /// Returns [`EurosignError::MissingConfiguration`] if a variable is unset or blank.
    pub fn from_env() -> Result<Self, EurosignError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the credentials through a variable lookup function.
    ///
    /// # Errors
    ///
    /// Returns [`EurosignError::MissingConfiguration`] if a variable is missing or blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EurosignError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .map(SecureString::new)
                .filter(|value| !value.is_blank())
                .ok_or(EurosignError::MissingConfiguration { name })
        };

        let client_id = required(CLIENT_ID_ENV)?.into_string();
        let client_secret = required(CLIENT_SECRET_ENV)?;

        Ok(Self {
            client_id,
            client_secret,
        })
    }

    /// Returns the client ID.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the client secret.
    pub fn client_secret(&self) -> &str {
        self.client_secret.as_str()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}
