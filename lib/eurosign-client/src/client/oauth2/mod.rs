//! OAuth 2.0 grants against the Eurosign token endpoint.
//!
//! Eurosign issues `Bearer` access tokens valid for one hour together with a
//! single-use refresh token:
//!
//! - **Authorization code**: exchanged once, after the user authorized your application
//!   and was redirected to `https://your/redirect/uri?code=THE_AUTHORIZATION_CODE`
//! - **Refresh token**: exchanged once for a new access token *and* a new refresh token;
//!   the previous refresh token is deactivated
//!
//! [`TokenSession`] keeps one token pair and serializes refreshes so a spent refresh
//! token is never sent twice.

mod error;
mod provider;
mod session;
mod token;

pub use self::error::AuthorizationError;
pub use self::session::TokenSession;
pub use self::token::{AccessTokenResponse, TokenType};
pub use oauth2::basic::BasicErrorResponseType;
