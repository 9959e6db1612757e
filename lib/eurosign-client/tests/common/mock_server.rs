#![allow(clippy::expect_used)]

use std::collections::HashSet;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Context;
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{error, info};

pub const CLIENT_ID: &str = "test-client";
pub const CLIENT_SECRET: &str = "test-secret";
pub const TOKEN_LIFETIME_SECS: u64 = 3600;
pub const SCOPE: &str = "signature_request.read signature_request.write signature_request.send";
pub const USER_UUID: &str = "123456789abcdef123456789abcdef12";

#[derive(Debug, Default)]
struct Grants {
    authorization_codes: HashSet<String>,
    refresh_tokens: HashSet<String>,
    access_tokens: HashSet<String>,
    issued: u32,
    token_lifetime_secs: Option<u64>,
}

/// In-process stand-in for the Eurosign token endpoint and `/v2/current-user`.
///
/// Authorization codes and refresh tokens are single-use; issued pairs are `T1`/`R1`,
/// `T2`/`R2`, and so on.
#[derive(Debug, Clone, Default)]
pub struct MockEurosign {
    grants: Arc<Mutex<Grants>>,
}

impl MockEurosign {
    pub fn issue_authorization_code(&self, code: &str) {
        self.grants().authorization_codes.insert(code.to_string());
    }

    pub fn revoke_access_token(&self, access_token: &str) {
        self.grants().access_tokens.remove(access_token);
    }

    pub fn set_token_lifetime_secs(&self, lifetime: u64) {
        self.grants().token_lifetime_secs = Some(lifetime);
    }

    pub fn issued_pairs(&self) -> u32 {
        self.grants().issued
    }

    pub async fn launch(&self) -> anyhow::Result<SocketAddr> {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .context("bind mock server")?;
        let addr = listener.local_addr()?;

        let app = self.router();
        tokio::spawn(async move {
            if let Err(error) = axum::serve(listener, app).await {
                error!(?error, "mock server stopped");
            }
        });

        info!(%addr, "mock Eurosign server launched");
        Ok(addr)
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/oauth/token", post(token))
            .route("/v2/current-user", get(current_user))
            .route("/broken/oauth/token", post(bad_gateway))
            .route("/broken/v2/current-user", get(malformed_user))
            .route("/bare/oauth/token", post(bare_unauthorized))
            .route("/bare/v2/current-user", get(bare_unauthorized))
            .with_state(self.clone())
    }

    fn grants(&self) -> MutexGuard<'_, Grants> {
        self.grants.lock().expect("mock grants lock")
    }
}

#[derive(Debug, Deserialize)]
struct TokenForm {
    grant_type: String,
    client_id: String,
    client_secret: String,
    code: Option<String>,
    refresh_token: Option<String>,
}

async fn token(State(mock): State<MockEurosign>, Form(form): Form<TokenForm>) -> Response {
    if form.client_id != CLIENT_ID || form.client_secret != CLIENT_SECRET {
        return token_error(
            StatusCode::UNAUTHORIZED,
            "invalid_client",
            "Client authentication failed",
        );
    }

    let mut grants = mock.grants();
    let granted = match form.grant_type.as_str() {
        "authorization_code" => form
            .code
            .is_some_and(|code| grants.authorization_codes.remove(&code)),
        "refresh_token" => form
            .refresh_token
            .is_some_and(|refresh_token| grants.refresh_tokens.remove(&refresh_token)),
        other => {
            return token_error(
                StatusCode::BAD_REQUEST,
                "unsupported_grant_type",
                &format!("The authorization grant type '{other}' is not supported"),
            );
        }
    };
    if !granted {
        return token_error(
            StatusCode::BAD_REQUEST,
            "invalid_grant",
            "The provided authorization grant is invalid, expired or revoked",
        );
    }

    grants.issued += 1;
    let access_token = format!("T{}", grants.issued);
    let refresh_token = format!("R{}", grants.issued);
    grants.access_tokens.insert(access_token.clone());
    grants.refresh_tokens.insert(refresh_token.clone());
    let expires_in = grants.token_lifetime_secs.unwrap_or(TOKEN_LIFETIME_SECS);

    Json(json!({
        "access_token": access_token,
        "expires_in": expires_in,
        "token_type": "Bearer",
        "scope": SCOPE,
        "refresh_token": refresh_token,
    }))
    .into_response()
}

fn token_error(status: StatusCode, error: &str, description: &str) -> Response {
    let body = json!({
        "error": error,
        "error_description": description,
    });
    (status, Json(body)).into_response()
}

async fn current_user(State(mock): State<MockEurosign>, headers: HeaderMap) -> Response {
    let known = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|access_token| mock.grants().access_tokens.contains(access_token));

    if !known {
        let body = json!({
            "name": "Unauthorized",
            "message": "Your request was made with invalid credentials.",
            "status": 401,
        });
        return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
    }

    Json(json!({
        "uuid": USER_UUID,
        "email": "jane.doe@example.com",
        "emailIsValidated": true,
        "registerDate": "2021-07-16 15:09:36",
        "firstname": "Jane",
        "lastname": "Doe",
        "language": "fr-FR",
        "isActive": true,
    }))
    .into_response()
}

async fn bad_gateway() -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Html("<html><body><h1>502 Bad Gateway</h1></body></html>"),
    )
        .into_response()
}

async fn bare_unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(WWW_AUTHENTICATE, r#"Bearer error="invalid_token""#)],
    )
        .into_response()
}

async fn malformed_user() -> Response {
    Json(json!({
        "uuid": 42,
        "email": "jane.doe@example.com",
    }))
    .into_response()
}
