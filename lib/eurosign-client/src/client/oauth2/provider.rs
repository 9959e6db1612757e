//! Token acquisition and refresh against the token endpoint.

use std::sync::atomic::{AtomicU16, Ordering};

use oauth2::basic::{
    BasicClient, BasicErrorResponse, BasicErrorResponseType, BasicTokenResponse, BasicTokenType,
};
use oauth2::{
    AuthType, AuthorizationCode, ClientId, ClientSecret, HttpRequest, HttpResponse, RefreshToken,
    RequestTokenError, TokenResponse, TokenUrl,
};
use tracing::{debug, warn};
use url::Url;

use super::error::AuthorizationError;
use super::token::AccessTokenResponse;
use crate::client::exchange::{reason, truncate};
use crate::client::{Credentials, EurosignError, TokenClient};

/// OAuth2 grant sent to the token endpoint.
#[derive(Clone, Copy)]
enum Grant<'a> {
    AuthorizationCode(&'a str),
    RefreshToken(&'a str),
}

impl Grant<'_> {
    fn grant_type(self) -> &'static str {
        match self {
            Self::AuthorizationCode(_) => "authorization_code",
            Self::RefreshToken(_) => "refresh_token",
        }
    }
}

impl TokenClient {
    /// Gets an access token from an authorization code.
    ///
    /// The authorization code is provided to your redirect URI after the user has authorized
    /// your application to access their account. It can only be exchanged once.
    ///
    /// # Errors
    ///
    /// - [`EurosignError::Authorization`] on any failure status, usually a bad, expired or
    ///   already used authorization code (`invalid_grant`) or bad client credentials
    ///   (`invalid_client`)
    /// - [`EurosignError::InvalidResponse`] if the token response cannot be decoded
    /// - [`EurosignError::ReqwestError`] on transport failure
    pub async fn obtain_access_token(
        &self,
        credentials: &Credentials,
        authorization_code: &str,
    ) -> Result<AccessTokenResponse, EurosignError> {
        self.request_token(credentials, Grant::AuthorizationCode(authorization_code))
            .await
    }

    /// Gets a new access token (and a new refresh token) from a refresh token.
    ///
    /// The refresh token is deactivated by this call: store the refresh token of the
    /// returned response, the one passed here cannot be used again.
    ///
    /// # Errors
    ///
    /// - [`EurosignError::Authorization`] on any failure status, usually a spent, revoked
    ///   or expired refresh token (`invalid_grant`) or bad client credentials
    /// - [`EurosignError::InvalidResponse`] if the token response cannot be decoded
    /// - [`EurosignError::ReqwestError`] on transport failure
    pub async fn refresh_access_token(
        &self,
        credentials: &Credentials,
        refresh_token: &str,
    ) -> Result<AccessTokenResponse, EurosignError> {
        self.request_token(credentials, Grant::RefreshToken(refresh_token))
            .await
    }

    async fn request_token(
        &self,
        credentials: &Credentials,
        grant: Grant<'_>,
    ) -> Result<AccessTokenResponse, EurosignError> {
        let grant_type = grant.grant_type();
        let client = BasicClient::new(ClientId::new(credentials.client_id().to_string()))
            .set_client_secret(ClientSecret::new(credentials.client_secret().to_string()))
            .set_auth_type(AuthType::RequestBody)
            .set_token_uri(TokenUrl::from_url(self.token_url.clone()));

        // oauth2 only hands back the parsed body, the status is kept aside
        let status = AtomicU16::new(0);
        let http_client = {
            let status = &status;
            move |request: HttpRequest| self.send_token_request(request, status)
        };

        debug!(grant_type, client_id = credentials.client_id(), "requesting token");
        let result = match grant {
            Grant::AuthorizationCode(code) => {
                client
                    .exchange_code(AuthorizationCode::new(code.to_string()))
                    .request_async(&http_client)
                    .await
            }
            Grant::RefreshToken(refresh_token) => {
                let refresh_token = RefreshToken::new(refresh_token.to_string());
                client
                    .exchange_refresh_token(&refresh_token)
                    .request_async(&http_client)
                    .await
            }
        };
        let status = status.load(Ordering::Relaxed);

        match result {
            Ok(response) => {
                let tokens = into_access_token(&response, &self.token_url)?;
                debug!(grant_type, expires_in = tokens.expires_in().as_secs(), "token issued");
                Ok(tokens)
            }
            Err(error) => {
                let error = token_error(status, error, &self.token_url);
                if let EurosignError::Authorization(rejection) = &error {
                    warn!(
                        grant_type,
                        status,
                        error = rejection.error.as_ref(),
                        "token request rejected"
                    );
                }
                Err(error)
            }
        }
    }

    async fn send_token_request(
        &self,
        request: HttpRequest,
        status: &AtomicU16,
    ) -> Result<HttpResponse, EurosignError> {
        let request = reqwest::Request::try_from(request)?;
        let request = reqwest::RequestBuilder::from_parts(self.client.clone(), request);

        let exchange = self.exchange(request).await?;
        status.store(exchange.status_code(), Ordering::Relaxed);
        Ok(exchange.into_http_response())
    }
}

fn into_access_token(
    response: &BasicTokenResponse,
    endpoint: &Url,
) -> Result<AccessTokenResponse, EurosignError> {
    if !matches!(response.token_type(), BasicTokenType::Bearer) {
        let message = format!("unsupported token type {:?}", response.token_type());
        return Err(invalid_response(endpoint, "token_type", &message));
    }
    let Some(refresh_token) = response.refresh_token() else {
        return Err(invalid_response(endpoint, "refresh_token", "missing field"));
    };
    let Some(expires_in) = response.expires_in() else {
        return Err(invalid_response(endpoint, "expires_in", "missing field"));
    };
    let scope = response
        .scopes()
        .map(|scopes| {
            scopes
                .iter()
                .map(|scope| scope.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    let tokens = AccessTokenResponse::new(
        response.access_token().secret().clone(),
        refresh_token.secret().clone(),
        expires_in,
    )
    .with_scope(scope);
    Ok(tokens)
}

fn token_error(
    status: u16,
    error: RequestTokenError<EurosignError, BasicErrorResponse>,
    endpoint: &Url,
) -> EurosignError {
    match error {
        RequestTokenError::Request(error) => error,
        RequestTokenError::ServerResponse(response) => {
            AuthorizationError::from_response(status, &response).into()
        }
        RequestTokenError::Parse(error, _) if status == 200 => EurosignError::InvalidResponse {
            endpoint: endpoint.to_string(),
            path: error.path().to_string(),
            error: error.into_inner(),
        },
        RequestTokenError::Parse(_, body) => {
            undocumented_rejection(status, &String::from_utf8_lossy(&body))
        }
        RequestTokenError::Other(message) if status == 200 => {
            invalid_response(endpoint, ".", &message)
        }
        RequestTokenError::Other(_) => undocumented_rejection(status, ""),
    }
}

/// A failure status without the `{error, error_description}` body.
fn undocumented_rejection(status: u16, body: &str) -> EurosignError {
    let description = (!body.trim().is_empty()).then(|| truncate(body));
    AuthorizationError {
        status,
        error: BasicErrorResponseType::Extension(reason(status).to_string()),
        description,
    }
    .into()
}

fn invalid_response(endpoint: &Url, path: &str, message: &str) -> EurosignError {
    EurosignError::InvalidResponse {
        endpoint: endpoint.to_string(),
        path: path.to_string(),
        error: serde::de::Error::custom(message),
    }
}
