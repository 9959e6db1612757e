use chrono::NaiveDateTime;
use http::HeaderValue;
use http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::exchange::Exchange;
use super::{EurosignError, ResourceError, TokenClient};

const CURRENT_USER_PATH: &str = "current-user";

/// The user authenticated by an access token.
///
/// Returned by [`TokenClient::get_current_user`]; fetched on every call, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    /// Stable identifier of the user.
    pub uuid: String,
    /// E-mail address.
    pub email: String,
    /// Whether the e-mail address has been validated.
    pub email_is_validated: bool,
    /// Registration date, as sent by Eurosign (`2021-07-16 15:09:36`).
    #[serde(with = "register_date")]
    pub register_date: NaiveDateTime,
    /// First name.
    pub firstname: String,
    /// Last name.
    pub lastname: String,
    /// Preferred language, e.g. `fr-FR`.
    pub language: String,
    /// Whether the account is active.
    pub is_active: bool,
}

impl CurrentUser {
    /// Returns `"<firstname> <lastname>"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
            .trim()
            .to_string()
    }
}

mod register_date {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub(super) fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Wire format of an API error.
#[derive(Debug, Deserialize)]
struct ResourceErrorBody {
    name: String,
    message: String,
}

impl TokenClient {
    /// Retrieves the user authenticated by the access token.
    ///
    /// Sends `GET <api base>/current-user` with an `Authorization: Bearer <token>` header.
    ///
    /// # Errors
    ///
    /// - [`EurosignError::InvalidAccessToken`] if the token cannot be sent as a header value
    /// - [`EurosignError::Resource`] on any non-success status (e.g. `401` for an expired token),
    ///   named after the status when the body is not Eurosign's error JSON
    /// - [`EurosignError::InvalidResponse`] if the user payload cannot be decoded
    /// - [`EurosignError::ReqwestError`] on transport failure
    pub async fn get_current_user(&self, access_token: &str) -> Result<CurrentUser, EurosignError> {
        let url = self.resource_url(CURRENT_USER_PATH)?;
        let request = self
            .client
            .get(url.clone())
            .header(AUTHORIZATION, bearer(access_token)?);

        let exchange = self.exchange(request).await?;
        if exchange.is_success() {
            return exchange.decode(&url);
        }

        let error = match exchange.decode_error() {
            Some(ResourceErrorBody { name, message }) => ResourceError {
                status: exchange.status_code(),
                name,
                message,
            },
            None => undocumented_error(&exchange),
        };
        warn!(status = error.status, name = %error.name, "resource request rejected");
        Err(error.into())
    }
}

/// Bearer-protected endpoints may answer with an empty body and a `WWW-Authenticate` challenge.
fn undocumented_error(exchange: &Exchange) -> ResourceError {
    let mut message = exchange.truncated_body();
    if message.trim().is_empty() {
        message = exchange
            .header(WWW_AUTHENTICATE)
            .unwrap_or_default()
            .to_string();
    }
    ResourceError {
        status: exchange.status_code(),
        name: exchange.reason().to_string(),
        message,
    }
}

fn bearer(access_token: &str) -> Result<HeaderValue, EurosignError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {access_token}")).map_err(|err| {
        EurosignError::InvalidAccessToken {
            message: err.to_string(),
        }
    })?;
    value.set_sensitive(true);
    Ok(value)
}
