use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::client::ApiClient;
use crate::config::{DEFAULT_PASSWORD, DEFAULT_USERNAME};
use crate::error::{ApiError, ApiResult};

pub const AUTHENTICATE_PATH: &str = "/authenticate";

/// Login credentials sent to `POST /authenticate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub remember_me: bool,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            remember_me: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct JwtToken {
    id_token: String,
}

/// Header map carrying `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct AuthHeaders {
    headers: HeaderMap,
}

impl AuthHeaders {
    pub fn bearer(token: &str) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", token))?);
        Ok(Self { headers })
    }

    pub fn header_map(&self) -> &HeaderMap {
        &self.headers
    }

    /// The raw `Authorization` value, if still valid UTF-8.
    pub fn authorization(&self) -> Option<&str> {
        self.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
    }
}

/// Logs in and returns the bearer header map for subsequent calls.
///
/// Fails with [`ApiError::MissingToken`] when the backend answers without an
/// `id_token`, whatever the status code.
pub async fn authenticate(client: &ApiClient, credentials: &Credentials) -> ApiResult<AuthHeaders> {
    let body = serde_json::to_value(credentials)?;
    let response = client
        .request(Method::POST, AUTHENTICATE_PATH, Some(body), None)
        .await?;

    let token = response
        .status()
        .is_success()
        .then(|| response.parse::<JwtToken>().ok())
        .flatten()
        .filter(|jwt| !jwt.id_token.is_empty());

    match token {
        Some(jwt) => {
            info!("Authenticated as {}", credentials.username);
            AuthHeaders::bearer(&jwt.id_token)
        }
        None => {
            warn!(
                "Authentication as {} failed with status {}",
                credentials.username,
                response.status()
            );
            Err(ApiError::MissingToken {
                status: response.status(),
            })
        }
    }
}
