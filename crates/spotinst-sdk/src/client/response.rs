//! Response envelope decoding
//!
//! Every API response, successful or not, uses the same wrapper:
//!
//! ```json
//! {
//!   "request": {"id": "9d3b..."},
//!   "response": {
//!     "status": {"code": 200, "message": "OK"},
//!     "kind": "spotinst:ocean:aws:k8s",
//!     "items": [ ... ],
//!     "count": 1,
//!     "errors": [{"code": "...", "message": "...", "field": "..."}]
//!   }
//! }
//! ```

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, Error, ErrorDetail, Result};

#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(default)]
    request: Option<RequestMeta>,
    #[serde(default)]
    response: Option<ResponseBody>,
}

#[derive(Debug, Default, Deserialize)]
struct RequestMeta {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseBody {
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    items: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    count: Option<usize>,
    #[serde(default)]
    errors: Option<Vec<ErrorDetail>>,
}

/// Decoded response of one API call
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Request ID assigned by the API
    pub request_id: Option<String>,
    /// Resource kind, e.g. `spotinst:ocean:aws:k8s`
    pub kind: Option<String>,
    /// Raw result items
    pub items: Vec<serde_json::Value>,
    /// Number of items reported by the API
    pub count: usize,
    /// Non-fatal errors reported alongside a successful response
    pub errors: Vec<ErrorDetail>,
}

impl Response {
    /// Decode a 2xx body. An empty body is an empty envelope.
    pub(crate) fn from_body(status: u16, body: &[u8]) -> Result<Self> {
        let envelope: Envelope = if body.iter().all(u8::is_ascii_whitespace) {
            Envelope::default()
        } else {
            serde_json::from_slice(body).map_err(Error::Decode)?
        };

        let request_id = envelope.request.and_then(|r| r.id);
        let body = envelope.response.unwrap_or_default();
        let items = body.items.unwrap_or_default();
        let count = body.count.unwrap_or(items.len());

        Ok(Self {
            status,
            request_id,
            kind: body.kind,
            items,
            count,
            errors: body.errors.unwrap_or_default(),
        })
    }

    /// Decode every item as `T`
    pub fn decode_items<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.items
            .iter()
            .map(|item| serde_json::from_value(item.clone()).map_err(Error::Decode))
            .collect()
    }

    /// Decode the first item as `T`, if there is one
    pub fn first_item<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        self.items
            .first()
            .map(|item| serde_json::from_value(item.clone()).map_err(Error::Decode))
            .transpose()
    }
}

/// Build the structured error for a 4xx/5xx response
///
/// Bodies that are not the usual envelope still produce an [`ApiError`]; the
/// status text and the raw body become a synthetic error entry.
pub(crate) fn api_error(status: u16, reason: Option<&str>, body: &[u8]) -> ApiError {
    let envelope: Envelope = serde_json::from_slice(body).unwrap_or_default();
    let request_id = envelope.request.and_then(|r| r.id);
    let errors = envelope
        .response
        .and_then(|r| r.errors)
        .unwrap_or_default();

    if !errors.is_empty() {
        return ApiError::new(status, request_id, errors);
    }

    let text = String::from_utf8_lossy(body);
    let message = match text.trim() {
        "" => reason.unwrap_or("request failed").to_string(),
        trimmed => trimmed.to_string(),
    };
    let code = reason
        .map(|r| r.to_uppercase().replace(' ', "_"))
        .unwrap_or_else(|| format!("HTTP_{}", status));

    ApiError::new(status, request_id, vec![ErrorDetail::new(code, message)])
}
