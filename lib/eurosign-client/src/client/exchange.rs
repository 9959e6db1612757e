use http::header::{ACCEPT, HeaderName};
use http::{HeaderMap, HeaderValue, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::{EurosignError, TokenClient};

const BODY_MAX_LENGTH: usize = 1024;
const JSON: &str = "application/json";

/// A fully read HTTP response.
#[derive(Debug)]
pub(super) struct Exchange {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl TokenClient {
    /// Sends the request and reads the whole response body.
    pub(super) async fn exchange(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Exchange, EurosignError> {
        let mut request = request.build()?;
        request
            .headers_mut()
            .entry(ACCEPT)
            .or_insert(HeaderValue::from_static(JSON));

        debug!(method = %request.method(), url = %request.url(), "sending...");
        let response = self.client.execute(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        debug!(%status, "...receiving");

        let body = response.text().await?;
        Ok(Exchange {
            status,
            headers,
            body,
        })
    }
}

impl Exchange {
    pub(super) fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub(super) fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Canonical reason phrase of the status, e.g. `Unauthorized`.
    pub(super) fn reason(&self) -> &'static str {
        reason(self.status.as_u16())
    }

    pub(super) fn header(&self, name: HeaderName) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    /// Decodes a successful response.
    pub(super) fn decode<T>(&self, endpoint: &Url) -> Result<T, EurosignError>
    where
        T: DeserializeOwned,
    {
        let deserializer = &mut serde_json::Deserializer::from_str(&self.body);
        serde_path_to_error::deserialize(deserializer).map_err(|err| {
            EurosignError::InvalidResponse {
                endpoint: endpoint.to_string(),
                path: err.path().to_string(),
                error: err.into_inner(),
            }
        })
    }

    /// Decodes a documented error body, `None` when the body has another shape.
    pub(super) fn decode_error<T>(&self) -> Option<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(&self.body).ok()
    }

    /// The body, cut after 1024 characters.
    pub(super) fn truncated_body(&self) -> String {
        truncate(&self.body)
    }

    pub(super) fn into_http_response(self) -> http::Response<Vec<u8>> {
        let Self {
            status,
            headers,
            body,
        } = self;
        let mut response = http::Response::new(body.into_bytes());
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}

pub(super) fn reason(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or("Unknown Status")
}

pub(super) fn truncate(body: &str) -> String {
    if body.chars().count() > BODY_MAX_LENGTH {
        let truncated = body.chars().take(BODY_MAX_LENGTH).collect::<String>();
        format!("{truncated}... (truncated)")
    } else {
        body.to_string()
    }
}
