//! Output formatting helpers.
//!
//! JSON output is wrapped in a stable envelope so scripted callers can rely
//! on `status`, `timestamp`, and `version` regardless of the command.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

#[derive(Serialize)]
pub struct JsonResponse<T> {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub data: T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

pub fn json_ok<T: Serialize>(data: T, warnings: Vec<String>) -> JsonResponse<T> {
    JsonResponse {
        status: "ok",
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data,
        warnings,
    }
}

/// Print a JSON envelope to stdout.
pub fn print_json<T: Serialize>(data: T, warnings: Vec<String>) {
    let response = json_ok(data, warnings);
    println!(
        "{}",
        serde_json::to_string_pretty(&response).unwrap_or_default()
    );
}
