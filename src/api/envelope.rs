use crate::errors::ApiError;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    /// Client-caused (4xx) outcomes.
    Fail,
    /// Server-side (5xx) outcomes.
    Error,
}

/// The wire envelope every operation answers with:
/// `{status, data|message}` plus a `results` count on listings.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiResponse {
    /// Wrap one document.
    ///
    /// # Errors
    /// Propagates serialization failure of the document.
    pub fn success(doc: &bson::Document) -> Result<Self, ApiError> {
        Ok(Self {
            status: Status::Success,
            results: None,
            data: Some(serde_json::to_value(doc)?),
            message: None,
        })
    }

    /// Wrap a listing with its filtered total.
    ///
    /// # Errors
    /// Propagates serialization failure of the documents.
    pub fn list(docs: &[bson::Document], total: usize) -> Result<Self, ApiError> {
        Ok(Self {
            status: Status::Success,
            results: Some(total),
            data: Some(serde_json::to_value(docs)?),
            message: None,
        })
    }

    /// The answer to a successful delete: no content.
    #[must_use]
    pub fn no_content() -> Self {
        Self { status: Status::Success, results: None, data: Some(Value::Null), message: None }
    }

    /// Pair an error with the status code a transport should use.
    /// Unclassified (5xx) errors get a generic message so internal state
    /// never leaks to clients.
    #[must_use]
    pub fn from_error(err: &ApiError) -> (u16, Self) {
        let code = err.status_code();
        let (status, message) = if err.is_client_error() {
            (Status::Fail, err.to_string())
        } else {
            (Status::Error, "Something went very wrong".to_string())
        };
        (code, Self { status, results: None, data: None, message: Some(message) })
    }
}

/// Parse a JSON request body into a document payload.
///
/// # Errors
/// `Json` on malformed JSON; `ValidationFailed` when the body is not an
/// object.
pub fn payload_from_json(json: &str) -> Result<bson::Document, ApiError> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Object(map) = value else {
        return Err(ApiError::ValidationFailed(vec!["payload must be a JSON object".to_string()]));
    };
    bson::Document::try_from(map)
        .map_err(|e| ApiError::ValidationFailed(vec![format!("payload is not a document: {e}")]))
}
