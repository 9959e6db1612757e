use std::time::Duration;

use url::Url;

use super::{EurosignError, TokenClient};

/// Production OAuth 2.0 token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://app.eurosign.com/oauth/token";

/// Production API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.eurosign.com/v2/";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Builder for creating [`TokenClient`] instances.
///
/// # Default Configuration
///
/// - **Token URL**: [`DEFAULT_TOKEN_URL`]
/// - **API base URL**: [`DEFAULT_API_BASE_URL`]
/// - **Timeout**: 30 seconds per request, 10 seconds to connect
/// - **User agent**: `eurosign-client/<version>`
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use eurosign_client::TokenClient;
///
/// # fn example() -> Result<(), eurosign_client::EurosignError> {
/// let client = TokenClient::builder()
///     .with_token_url("http://localhost:8080/oauth/token")?
///     .with_api_base_url("http://localhost:8080/v2")?
///     .with_timeout(Duration::from_secs(5))
///     .build()?;
///
/// assert_eq!(client.api_base_url().as_str(), "http://localhost:8080/v2/");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TokenClientBuilder {
    client: Option<reqwest::Client>,
    token_url: Url,
    api_base_url: Url,
    timeout: Duration,
    connect_timeout: Duration,
    user_agent: String,
}

impl TokenClientBuilder {
    /// Builds the [`TokenClient`].
    ///
    /// # Errors
    ///
    /// Returns [`EurosignError::ReqwestError`] if the HTTP client cannot be initialized
    /// (e.g. no TLS backend available).
    pub fn build(self) -> Result<TokenClient, EurosignError> {
        let Self {
            client,
            token_url,
            api_base_url,
            timeout,
            connect_timeout,
            user_agent,
        } = self;

        let client = match client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .timeout(timeout)
                .connect_timeout(connect_timeout)
                .user_agent(user_agent)
                .build()?,
        };

        Ok(TokenClient {
            client,
            token_url,
            api_base_url,
        })
    }

    /// Sets the OAuth 2.0 token endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`EurosignError::InvalidUrl`] if the URL cannot be parsed.
    pub fn with_token_url(mut self, token_url: impl AsRef<str>) -> Result<Self, EurosignError> {
        self.token_url = parse_url(token_url.as_ref())?;
        Ok(self)
    }

    /// Sets the API base URL (e.g. `https://api.eurosign.com/v2`).
    ///
    /// A trailing `/` is added when missing so resource paths are resolved below it.
    ///
    /// # Errors
    ///
    /// Returns [`EurosignError::InvalidUrl`] if the URL cannot be parsed.
    pub fn with_api_base_url(
        mut self,
        api_base_url: impl AsRef<str>,
    ) -> Result<Self, EurosignError> {
        let raw = api_base_url.as_ref();
        let mut url = parse_url(raw)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        self.api_base_url = url;
        Ok(self)
    }

    /// Sets the total request timeout.
    ///
    /// Ignored when a client is injected with [`with_client`](Self::with_client).
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the connection timeout.
    ///
    /// Ignored when a client is injected with [`with_client`](Self::with_client).
    #[must_use]
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Sets the `User-Agent` header.
    ///
    /// Ignored when a client is injected with [`with_client`](Self::with_client).
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Uses a preconfigured HTTP client as transport.
    ///
    /// Timeouts, proxies and user agent are then the responsibility of that client.
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }
}

impl Default for TokenClientBuilder {
    #[allow(clippy::expect_used)] // constant URLs
    fn default() -> Self {
        let token_url = Url::parse(DEFAULT_TOKEN_URL).expect("valid default token URL");
        let api_base_url = Url::parse(DEFAULT_API_BASE_URL).expect("valid default API URL");

        Self {
            client: None,
            token_url,
            api_base_url,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

fn parse_url(raw: &str) -> Result<Url, EurosignError> {
    Url::parse(raw).map_err(|err| EurosignError::InvalidUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_reject_invalid_token_url() {
        let result = TokenClient::builder().with_token_url("not-a-url");

        match result.expect_err("should fail") {
            EurosignError::InvalidUrl { url, .. } => assert_eq!(url, "not-a-url"),
            other => panic!("Expected InvalidUrl error, got {other:?}"),
        }
    }

    #[test]
    fn should_append_trailing_slash_to_api_base_url() {
        let builder = TokenClient::builder()
            .with_api_base_url("https://sandbox.eurosign.com/v2")
            .expect("valid url");

        assert_eq!(
            builder.api_base_url.as_str(),
            "https://sandbox.eurosign.com/v2/"
        );
    }

    #[test]
    fn should_keep_trailing_slash_of_api_base_url() {
        let builder = TokenClient::builder()
            .with_api_base_url("https://sandbox.eurosign.com/v2/")
            .expect("valid url");

        assert_eq!(
            builder.api_base_url.as_str(),
            "https://sandbox.eurosign.com/v2/"
        );
    }

    #[test]
    fn should_default_to_sane_timeouts() {
        let builder = TokenClientBuilder::default();

        assert_eq!(builder.timeout, Duration::from_secs(30));
        assert_eq!(builder.connect_timeout, Duration::from_secs(10));
        assert!(builder.user_agent.starts_with("eurosign-client/"));
    }

    #[test]
    fn should_build_with_injected_client() {
        let client = TokenClient::builder()
            .with_client(reqwest::Client::new())
            .build()
            .expect("should build client");

        assert_eq!(client.token_url().as_str(), DEFAULT_TOKEN_URL);
    }
}
