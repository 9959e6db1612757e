//! # Eurosign Client
//!
//! OAuth 2.0 token client for the [Eurosign](https://www.eurosign.com) document-signature API.
//!
//! The crate covers the three round-trips an integration needs to act on behalf of a user:
//! - **[`TokenClient::obtain_access_token`]** - exchange the authorization code received on
//!   your redirect URI for an access token and a refresh token
//! - **[`TokenClient::refresh_access_token`]** - trade a refresh token for a fresh pair
//! - **[`TokenClient::get_current_user`]** - authenticated lookup of the user behind a token
//!
//! Each call is a single HTTP request: no retry, no caching, no token bookkeeping.
//! [`TokenSession`] is the opt-in helper that keeps one token pair in memory and
//! serializes its refreshes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use eurosign_client::{Credentials, TokenClient};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = TokenClient::new()?;
//! let credentials = Credentials::from_env()?;
//!
//! // The code is provided to your redirect URI: https://your/redirect/uri?code=THE_CODE
//! let tokens = client
//!     .obtain_access_token(&credentials, "THE_AUTHORIZATION_CODE")
//!     .await?;
//!
//! let user = client.get_current_user(tokens.access_token()).await?;
//! println!("Hello {}", user.full_name());
//!
//! // Refresh tokens are single-use: keep the new one, drop the old one
//! let tokens = client
//!     .refresh_access_token(&credentials, tokens.refresh_token())
//!     .await?;
//! # let _ = tokens;
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Remote failures keep the fields Eurosign sends back:
//!
//! ```rust,no_run
//! use eurosign_client::{Credentials, EurosignError, TokenClient};
//!
//! # async fn example(client: &TokenClient, credentials: &Credentials) {
//! match client.refresh_access_token(credentials, "spent-token").await {
//!     Ok(tokens) => { /* store tokens.refresh_token() */ }
//!     Err(EurosignError::Authorization(error)) if error.requires_reauthorization() => {
//!         // send the user through the authorization flow again
//!     }
//!     Err(error) => eprintln!("{error}"),
//! }
//! # }
//! ```

mod client;

pub use self::client::oauth2::{
    AccessTokenResponse, AuthorizationError, BasicErrorResponseType, TokenSession, TokenType,
};
pub use self::client::{
    CLIENT_ID_ENV, CLIENT_SECRET_ENV, Credentials, CurrentUser, DEFAULT_API_BASE_URL,
    DEFAULT_TOKEN_URL, EurosignError, ResourceError, SecureString, TokenClient,
    TokenClientBuilder,
};
