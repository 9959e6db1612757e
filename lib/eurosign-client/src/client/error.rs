use super::oauth2::AuthorizationError;

/// Errors that can occur when using the [`TokenClient`](super::TokenClient).
///
/// Every failure status is reported as [`AuthorizationError`] (token endpoint) or
/// [`ResourceError`] (API resources), keeping the fields sent back by Eurosign when the
/// body has the documented shape. Everything else is a local, transport or decoding
/// failure. No variant is retried automatically.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum EurosignError {
    /// HTTP client error from the underlying reqwest library.
    ///
    /// Occurs when network requests fail, timeouts occur, or connection issues arise.
    ReqwestError(reqwest::Error),

    /// The token endpoint rejected the grant.
    ///
    /// Expired or reused authorization code, spent refresh token, bad client credentials...
    #[display("Authorization failed: {_0}")]
    Authorization(AuthorizationError),

    /// An authenticated API call was rejected.
    #[display("Resource request failed: {_0}")]
    Resource(ResourceError),

    /// A configured endpoint is not a valid URL.
    #[display("Invalid URL '{url}': {reason}")]
    #[from(skip)]
    InvalidUrl {
        /// The URL that was provided.
        url: String,
        /// Why it could not be used.
        reason: String,
    },

    /// The access token cannot be sent in an `Authorization` header.
    #[display("Access token contains invalid characters: {message}")]
    #[from(skip)]
    InvalidAccessToken {
        /// Description of the invalid characters.
        message: String,
    },

    /// A required configuration value is missing or empty.
    #[display("Missing configuration: {name} is not set")]
    #[from(skip)]
    MissingConfiguration {
        /// Name of the environment variable.
        name: &'static str,
    },

    /// A successful response does not have the expected JSON shape.
    ///
    /// The body is not kept: token responses carry secrets.
    #[display("Failed to deserialize response of '{endpoint}' at '{path}': {error}")]
    #[from(skip)]
    InvalidResponse {
        /// The endpoint that answered.
        endpoint: String,
        /// JSON path of the offending value.
        path: String,
        /// The underlying JSON parsing error.
        error: serde_json::Error,
    },
}

impl EurosignError {
    /// Returns `true` if the token endpoint rejected the request.
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Authorization(_))
    }

    /// Returns `true` if an API resource rejected the request.
    pub fn is_resource(&self) -> bool {
        matches!(self, Self::Resource(_))
    }

    /// HTTP status of the failing response, if the server answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Authorization(error) => Some(error.status),
            Self::Resource(error) => Some(error.status),
            Self::ReqwestError(error) => error.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}

/// Error returned by an authenticated API call, e.g. `GET /v2/current-user`.
///
/// Wire format: `{"name": "...", "message": "...", "status": 401}`.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
#[display("{name} ({status}): {message}")]
pub struct ResourceError {
    /// HTTP status code of the response.
    pub status: u16,
    /// Error name, e.g. `Unauthorized`.
    pub name: String,
    /// Detailed error message.
    pub message: String,
}

impl ResourceError {
    /// Returns `true` for a `401 Unauthorized`: the access token is expired or invalid.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}
