use url::Url;

mod builder;
pub use self::builder::{DEFAULT_API_BASE_URL, DEFAULT_TOKEN_URL, TokenClientBuilder};

mod credentials;
pub use self::credentials::{CLIENT_ID_ENV, CLIENT_SECRET_ENV, Credentials};

mod error;
pub use self::error::{EurosignError, ResourceError};

mod exchange;

pub mod oauth2;

mod secret;
pub use self::secret::SecureString;

mod user;
pub use self::user::CurrentUser;

/// HTTP client for the Eurosign OAuth 2.0 token endpoint and API.
///
/// Every operation is a single, independent round-trip: no retry, no caching and
/// no shared mutable state. Cloning is cheap and clones share the connection pool,
/// so one client can serve concurrent callers.
///
/// Use [`TokenClientBuilder`] to point at other endpoints, tune timeouts, or inject
/// a preconfigured [`reqwest::Client`].
///
/// # Example
///
/// ```rust,no_run
/// use eurosign_client::{Credentials, TokenClient};
///
/// # async fn example() -> Result<(), eurosign_client::EurosignError> {
/// let client = TokenClient::new()?;
/// let credentials = Credentials::new("YOUR_CLIENT_ID", "YOUR_CLIENT_SECRET");
///
/// let tokens = client
///     .obtain_access_token(&credentials, "YOUR_USER_AUTHORIZATION_CODE")
///     .await?;
/// let user = client.get_current_user(tokens.access_token()).await?;
/// # let _ = user;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TokenClient {
    client: reqwest::Client,
    token_url: Url,
    api_base_url: Url,
}

// Create
impl TokenClient {
    /// Creates a builder with the production Eurosign endpoints.
    pub fn builder() -> TokenClientBuilder {
        TokenClientBuilder::default()
    }

    /// Creates a client with the default configuration.
    ///
    /// # Errors
    ///
    /// Fails if the underlying HTTP client cannot be initialized.
    pub fn new() -> Result<Self, EurosignError> {
        Self::builder().build()
    }
}

// Endpoints
impl TokenClient {
    /// The OAuth 2.0 token endpoint.
    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    /// The API base URL, always ending with `/`.
    pub fn api_base_url(&self) -> &Url {
        &self.api_base_url
    }

    fn resource_url(&self, path: &str) -> Result<Url, EurosignError> {
        self.api_base_url
            .join(path)
            .map_err(|err| EurosignError::InvalidUrl {
                url: format!("{}{path}", self.api_base_url),
                reason: err.to_string(),
            })
    }
}
