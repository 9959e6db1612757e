//! OAuth2-specific error types.

use oauth2::basic::{BasicErrorResponse, BasicErrorResponseType};

/// The token endpoint rejected a grant.
///
/// Wire format: `{"error": "invalid_grant", "error_description": "..."}`. A failure
/// without that body is reported with the status reason as an extension code.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
#[display("{} ({status}): {}", error.as_ref(), description.as_deref().unwrap_or("no description"))]
pub struct AuthorizationError {
    /// HTTP status code of the response.
    pub status: u16,
    /// The error code (RFC 6749 section 5.2).
    pub error: BasicErrorResponseType,
    /// Detailed error message, when provided.
    pub description: Option<String>,
}

impl AuthorizationError {
    pub(super) fn from_response(status: u16, response: &BasicErrorResponse) -> Self {
        Self {
            status,
            error: response.error().clone(),
            description: response.error_description().cloned(),
        }
    }

    /// Returns `true` when the only way forward is a new authorization by the user:
    /// the authorization code or refresh token can no longer be exchanged.
    pub fn requires_reauthorization(&self) -> bool {
        self.error == BasicErrorResponseType::InvalidGrant
    }
}
