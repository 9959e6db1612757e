//! In-memory token pair with serialized refreshes.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info};

use super::token::AccessTokenResponse;
use crate::client::{Credentials, CurrentUser, EurosignError, SecureString, TokenClient};

/// Default threshold for token refresh (60 seconds before expiry).
const DEFAULT_REFRESH_THRESHOLD: Duration = Duration::from_secs(60);

/// One user's token pair, shared across async tasks.
///
/// Refresh tokens are single-use and concurrent refreshes with the same token race on
/// the server: only one wins. A session holds its lock for the whole refresh round-trip,
/// so refreshes through the same session (or its clones) happen one at a time and always
/// use the latest refresh token.
///
/// The session lives in memory only: persist [`tokens`](Self::tokens) after each refresh
/// if the pair must survive the process.
///
/// # Example
///
/// ```rust,no_run
/// use eurosign_client::{Credentials, TokenClient, TokenSession};
///
/// # async fn example() -> Result<(), eurosign_client::EurosignError> {
/// let client = TokenClient::new()?;
/// let credentials = Credentials::from_env()?;
///
/// let session = TokenSession::authorize(client, credentials, "THE_AUTHORIZATION_CODE").await?;
/// let user = session.current_user().await?;
///
/// let tokens = session.refresh().await?;
/// // persist tokens.refresh_token() somewhere safe
/// # let _ = (user, tokens);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TokenSession {
    client: TokenClient,
    credentials: Credentials,
    tokens: Arc<Mutex<AccessTokenResponse>>,
}

impl TokenSession {
    /// Wraps an existing token pair.
    pub fn new(client: TokenClient, credentials: Credentials, tokens: AccessTokenResponse) -> Self {
        Self {
            client,
            credentials,
            tokens: Arc::new(Mutex::new(tokens)),
        }
    }

    /// Exchanges an authorization code and wraps the resulting token pair.
    ///
    /// # Errors
    ///
    /// Same as [`TokenClient::obtain_access_token`].
    pub async fn authorize(
        client: TokenClient,
        credentials: Credentials,
        authorization_code: &str,
    ) -> Result<Self, EurosignError> {
        let tokens = client
            .obtain_access_token(&credentials, authorization_code)
            .await?;
        Ok(Self::new(client, credentials, tokens))
    }

    /// Returns a snapshot of the current token pair.
    pub async fn tokens(&self) -> AccessTokenResponse {
        self.tokens.lock().await.clone()
    }

    /// Exchanges the current refresh token and stores the new pair.
    ///
    /// On failure the stored pair is left unchanged.
    ///
    /// # Errors
    ///
    /// Same as [`TokenClient::refresh_access_token`].
    pub async fn refresh(&self) -> Result<AccessTokenResponse, EurosignError> {
        let mut guard = self.tokens.lock().await;
        let tokens = self.refresh_locked(&guard).await?;
        *guard = tokens.clone();
        Ok(tokens)
    }

    /// Returns an access token valid for at least `threshold`, refreshing first if needed.
    ///
    /// # Errors
    ///
    /// Same as [`TokenClient::refresh_access_token`] when a refresh is required.
    pub async fn valid_access_token(
        &self,
        threshold: Duration,
    ) -> Result<SecureString, EurosignError> {
        let mut guard = self.tokens.lock().await;
        if guard.should_refresh(threshold) {
            debug!(?threshold, "access token about to expire");
            *guard = self.refresh_locked(&guard).await?;
        }
        Ok(guard.access_token().into())
    }

    /// Retrieves the user of this session, refreshing the access token first if it
    /// expires within a minute.
    ///
    /// # Errors
    ///
    /// Same as [`TokenClient::get_current_user`] and [`TokenSession::valid_access_token`].
    pub async fn current_user(&self) -> Result<CurrentUser, EurosignError> {
        let access_token = self.valid_access_token(DEFAULT_REFRESH_THRESHOLD).await?;
        self.client.get_current_user(access_token.as_str()).await
    }

    async fn refresh_locked(
        &self,
        current: &AccessTokenResponse,
    ) -> Result<AccessTokenResponse, EurosignError> {
        let tokens = self
            .client
            .refresh_access_token(&self.credentials, current.refresh_token())
            .await?;
        info!(
            client_id = self.credentials.client_id(),
            expires_in = tokens.expires_in().as_secs(),
            "session tokens rotated"
        );
        Ok(tokens)
    }
}
