//! OAuth2 token types.

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::client::SecureString;

/// Token type of Eurosign access tokens, always `Bearer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TokenType {
    /// Bearer token (RFC 6750), sent as `Authorization: Bearer <token>`.
    #[default]
    #[serde(alias = "bearer")]
    Bearer,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer => f.write_str("Bearer"),
        }
    }
}

/// Successful response of the token endpoint.
///
/// ```json
/// {
///     "access_token": "123456789abcdef123456789abcdef123456789a",
///     "expires_in": 3600,
///     "token_type": "Bearer",
///     "scope": "signature_request.read signature_request.write signature_request.send",
///     "refresh_token": "abcdef123456789abcdef123456789abcdef1234"
/// }
/// ```
///
/// The refresh token is single-use: once it has been exchanged, only the refresh token
/// of the new response is valid. Storing it is the caller's responsibility.
#[derive(Clone, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    access_token: SecureString,
    expires_in: u64,
    token_type: TokenType,
    #[serde(default)]
    scope: String,
    refresh_token: SecureString,
    #[serde(skip, default = "Instant::now")]
    received_at: Instant,
}

impl AccessTokenResponse {
    /// Creates a token pair, e.g. restored from the caller's storage.
    ///
    /// `expires_in` counts from now.
    pub fn new(
        access_token: impl Into<SecureString>,
        refresh_token: impl Into<SecureString>,
        expires_in: Duration,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            expires_in: expires_in.as_secs(),
            token_type: TokenType::Bearer,
            scope: String::new(),
            refresh_token: refresh_token.into(),
            received_at: Instant::now(),
        }
    }

    /// Sets the space-separated scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Returns the access token, to be sent as a bearer token.
    pub fn access_token(&self) -> &str {
        self.access_token.as_str()
    }

    /// Returns the refresh token.
    pub fn refresh_token(&self) -> &str {
        self.refresh_token.as_str()
    }

    /// Returns the token type.
    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    /// Returns the lifetime announced by the server.
    pub fn expires_in(&self) -> Duration {
        Duration::from_secs(self.expires_in)
    }

    /// Returns the raw, space-separated scope.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Iterates over the granted permissions.
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scope.split_whitespace()
    }

    /// Returns `true` if the permission has been granted.
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes().any(|granted| granted == scope)
    }

    /// Returns the instant the access token expires, `None` if it lies beyond what
    /// [`Instant`] can represent.
    pub fn expires_at(&self) -> Option<Instant> {
        self.received_at.checked_add(self.expires_in())
    }

    /// Checks if the access token is expired.
    pub fn is_expired(&self) -> bool {
        self.time_until_expiry().is_none()
    }

    /// Returns `true` if the access token expires within the given threshold.
    pub fn should_refresh(&self, threshold: Duration) -> bool {
        self.time_until_expiry()
            .is_none_or(|remaining| remaining <= threshold)
    }

    /// Returns the time until expiration, `None` once expired.
    pub fn time_until_expiry(&self) -> Option<Duration> {
        self.expires_in()
            .checked_sub(self.received_at.elapsed())
            .filter(|remaining| !remaining.is_zero())
    }
}

impl fmt::Debug for AccessTokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessTokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .field("refresh_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}
