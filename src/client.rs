//! Logging HTTP client for the restaurant API.
//!
//! Every call goes through [`ApiClient::request`], which records the
//! exchange in the run's [`RequestLogger`] before handing the outcome back.
//! Transport failures are logged too and then returned unchanged, so the
//! calling test still fails on them.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::AuthHeaders;
use crate::config::ApiTestConfig;
use crate::error::{ApiError, ApiResult};
use crate::request_log::{parse_body, RequestLogger, RequestRecord};
use crate::resources::{Resource, ResourceApi, ResourceKey};

/// Status and decoded body of a completed exchange.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    body: Option<Value>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: Option<Value>) -> Self {
        Self { status, body }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The decoded body, `None` when the response had no content.
    pub fn json(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_none()
    }

    /// Top-level field of an object body.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.body.as_ref().and_then(|body| body.get(name))
    }

    pub fn parse<T: DeserializeOwned>(&self) -> ApiResult<T> {
        let body = self.body.clone().unwrap_or(Value::Null);
        Ok(serde_json::from_value(body)?)
    }

    /// The identifier the backend assigned, read from the resource's key field.
    pub fn key(&self, resource: Resource) -> Option<ResourceKey> {
        self.field(resource.key_field())
            .and_then(ResourceKey::from_json)
    }
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    logger: Arc<RequestLogger>,
}

impl ApiClient {
    pub fn new(config: &ApiTestConfig, logger: Arc<RequestLogger>) -> ApiResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(ApiError::ClientBuild)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            logger,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn logger(&self) -> &Arc<RequestLogger> {
        &self.logger
    }

    /// Absolute URL for a path relative to the API root (e.g. `/staff/3`).
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Endpoint wrapper for one resource collection.
    pub fn resource<'a>(&'a self, resource: Resource, headers: &'a AuthHeaders) -> ResourceApi<'a> {
        ResourceApi::new(self, headers, resource)
    }

    /// Sends one request and logs it.
    ///
    /// Non-2xx statuses are not errors: they come back as a normal
    /// [`ApiResponse`] for the caller to assert on.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        headers: Option<&AuthHeaders>,
    ) -> ApiResult<ApiResponse> {
        let url = self.url(path);
        let record = RequestRecord::new(&method, &url, body.as_ref());

        let mut request = self.http.request(method.clone(), &url);
        if let Some(headers) = headers {
            request = request.headers(headers.header_map().clone());
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(source) => {
                self.logger.log(&record.with_error(&source));
                return Err(ApiError::Transport { method, url, source });
            }
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(source) => {
                self.logger
                    .log(&record.with_response(status, None).with_error(&source));
                return Err(ApiError::Transport { method, url, source });
            }
        };

        let body = parse_body(&bytes);
        self.logger.log(&record.with_response(status, body.clone()));
        Ok(ApiResponse::new(status, body))
    }

    pub async fn get(&self, path: &str, headers: &AuthHeaders) -> ApiResult<ApiResponse> {
        self.request(Method::GET, path, None, Some(headers)).await
    }

    pub async fn post(&self, path: &str, body: Value, headers: &AuthHeaders) -> ApiResult<ApiResponse> {
        self.request(Method::POST, path, Some(body), Some(headers)).await
    }
}
