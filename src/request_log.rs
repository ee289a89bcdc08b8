//! Per-run request log.
//!
//! Every HTTP exchange made through [`crate::ApiClient`] ends up here as one
//! JSON object per line, in a file named after the moment the run started:
//!
//! ```text
//! api_logs/api_test_20261016_142501.log
//! ```

use chrono::{Local, NaiveDateTime, SecondsFormat};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::error::ApiResult;

/// One logged HTTP exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestRecord {
    /// ISO-8601 local time at which the record was built.
    pub timestamp: String,
    pub method: String,
    pub url: String,
    pub request_data: Option<Value>,
    pub response_status: Option<u16>,
    /// Parsed response body; `None` when the response had no content.
    pub response_body: Option<Value>,
    pub error: Option<String>,
}

impl RequestRecord {
    pub fn new(method: &Method, url: &str, request_data: Option<&Value>) -> Self {
        Self {
            timestamp: Local::now().to_rfc3339_opts(SecondsFormat::Micros, false),
            method: method.as_str().to_string(),
            url: url.to_string(),
            request_data: request_data.cloned(),
            response_status: None,
            response_body: None,
            error: None,
        }
    }

    pub fn with_response(mut self, status: StatusCode, body: Option<Value>) -> Self {
        self.response_status = Some(status.as_u16());
        self.response_body = body;
        self
    }

    pub fn with_error(mut self, error: &impl Display) -> Self {
        self.error = Some(error.to_string());
        self
    }
}

/// Interprets a raw response body for logging.
///
/// Empty bodies yield `None`; anything that is not JSON is kept as a string.
pub fn parse_body(bytes: &[u8]) -> Option<Value> {
    if bytes.is_empty() {
        return None;
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(String::from_utf8_lossy(bytes).into_owned())),
    }
}

/// Append-only JSON-lines log shared by all requests of a run.
pub struct RequestLogger {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl RequestLogger {
    /// Creates the log file for a run starting now.
    pub fn create(log_dir: &Path) -> ApiResult<Self> {
        Self::create_at(log_dir, Local::now().naive_local())
    }

    /// Creates (or reopens for append) the log file for a run that started
    /// at `started_at`. The directory is created if missing.
    pub fn create_at(log_dir: &Path, started_at: NaiveDateTime) -> ApiResult<Self> {
        std::fs::create_dir_all(log_dir)?;
        let path = log_dir.join(Self::file_name(started_at));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        debug!("Request log opened at {:?}", path);

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn file_name(started_at: NaiveDateTime) -> String {
        format!("api_test_{}.log", started_at.format("%Y%m%d_%H%M%S"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record and flushes it to disk.
    pub fn write(&self, record: &RequestRecord) -> ApiResult<()> {
        let line = serde_json::to_string(record)?;
        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Writes the record, downgrading write failures to a warning so a full
    /// disk never masks the outcome of the HTTP call itself.
    pub fn log(&self, record: &RequestRecord) {
        debug!(
            method = %record.method,
            url = %record.url,
            status = ?record.response_status,
            error = ?record.error,
            "api request"
        );
        if let Err(err) = self.write(record) {
            warn!("Failed to write request log record to {:?}: {}", self.path, err);
        }
    }
}
