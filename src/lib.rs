//! Restaurant API integration suite
//!
//! Logging HTTP client, authentication fixture and test-data generators used
//! by the end-to-end tests under `tests/`.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod generators;
pub mod logging;
pub mod request_log;
pub mod resources;

// Re-export commonly used types for convenience
pub use auth::{authenticate, AuthHeaders, Credentials};
pub use client::{ApiClient, ApiResponse};
pub use config::ApiTestConfig;
pub use error::{ApiError, ApiResult};
pub use request_log::{RequestLogger, RequestRecord};
pub use resources::{Resource, ResourceApi, ResourceKey};
