use reqwest::StatusCode;
use serde_json::Value;

use super::ApiError;

/// Body of a normalized response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    None,
    /// Parsed structured body, when the response declared JSON content.
    Json(Value),
    /// Raw text body (plain-text replies such as the bare login token,
    /// or non-JSON bodies passed through for the caller to inspect).
    Text(String),
}

/// The pipeline's single result shape.
///
/// Every call resolves to one of these: transport failures, auth failures,
/// malformed payloads, and successes all share it, so callers branch on
/// `ok` and `status` and never catch errors. A transport-level failure is
/// reported as `status == 0` (no response was obtained).
#[derive(Debug)]
pub struct ApiResponse {
    pub ok: bool,
    pub status: u16,
    pub status_text: String,
    pub body: ResponseBody,
    pub error: Option<ApiError>,
}

impl ApiResponse {
    pub(crate) fn success(status: u16, status_text: String, body: ResponseBody) -> Self {
        Self {
            ok: true,
            status,
            status_text,
            body,
            error: None,
        }
    }

    pub(crate) fn failure(status: u16, error: ApiError) -> Self {
        Self {
            ok: false,
            status,
            status_text: canonical_status_text(status),
            body: ResponseBody::None,
            error: Some(error),
        }
    }

    /// The parsed JSON body, if this response carried one.
    pub fn json(&self) -> Option<&Value> {
        match &self.body {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }

    /// The raw text body, if this response carried one.
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            ResponseBody::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED.as_u16()
    }
}

fn canonical_status_text(status: u16) -> String {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("")
        .to_string()
}
