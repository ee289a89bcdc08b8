use reqwest::Method;
use serde::Serialize;

use super::{Resource, ResourceKey};
use crate::auth::AuthHeaders;
use crate::client::{ApiClient, ApiResponse};
use crate::error::ApiResult;

/// Authenticated CRUD calls against one collection.
///
/// When routes change, [`Resource::path`] is the only place to update.
pub struct ResourceApi<'a> {
    client: &'a ApiClient,
    headers: &'a AuthHeaders,
    resource: Resource,
}

impl<'a> ResourceApi<'a> {
    pub fn new(client: &'a ApiClient, headers: &'a AuthHeaders, resource: Resource) -> Self {
        Self {
            client,
            headers,
            resource,
        }
    }

    /// POST {collection}
    pub async fn create<T: Serialize + ?Sized>(&self, body: &T) -> ApiResult<ApiResponse> {
        let body = serde_json::to_value(body)?;
        self.send(Method::POST, self.resource.path().to_string(), Some(body))
            .await
    }

    /// GET {collection}
    pub async fn list(&self) -> ApiResult<ApiResponse> {
        self.send(Method::GET, self.resource.path().to_string(), None)
            .await
    }

    /// GET {collection}/{key}
    pub async fn get(&self, key: &ResourceKey) -> ApiResult<ApiResponse> {
        self.send(Method::GET, self.resource.item_path(key), None)
            .await
    }

    /// PUT {collection}/{key}
    pub async fn update<T: Serialize + ?Sized>(
        &self,
        key: &ResourceKey,
        body: &T,
    ) -> ApiResult<ApiResponse> {
        let body = serde_json::to_value(body)?;
        self.send(Method::PUT, self.resource.item_path(key), Some(body))
            .await
    }

    /// PATCH {collection}/{key}
    pub async fn patch<T: Serialize + ?Sized>(
        &self,
        key: &ResourceKey,
        body: &T,
    ) -> ApiResult<ApiResponse> {
        let body = serde_json::to_value(body)?;
        self.send(Method::PATCH, self.resource.item_path(key), Some(body))
            .await
    }

    /// DELETE {collection}/{key}
    pub async fn delete(&self, key: &ResourceKey) -> ApiResult<ApiResponse> {
        self.send(Method::DELETE, self.resource.item_path(key), None)
            .await
    }

    async fn send(
        &self,
        method: Method,
        path: String,
        body: Option<serde_json::Value>,
    ) -> ApiResult<ApiResponse> {
        self.client
            .request(method, &path, body, Some(self.headers))
            .await
    }
}
