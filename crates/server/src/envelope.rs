//! The uniform success wrapper: `{success, message?, count?, data?}`.
//! Error bodies are shaped in `errors`.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize = serde_json::Value> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self { success: true, message: None, count: None, data: Some(data) }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self { success: true, message: Some(message.into()), count: None, data: Some(data) }
    }
}

impl<U: Serialize> Envelope<Vec<U>> {
    /// List shape: the result cardinality rides alongside the payload.
    pub fn list(items: Vec<U>) -> Self {
        Self { success: true, message: None, count: Some(items.len()), data: Some(items) }
    }
}

impl Envelope<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self { success: true, message: Some(message.into()), count: None, data: None }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, message: Some(message.into()), count: None, data: None }
    }
}
