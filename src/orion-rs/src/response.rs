use crate::Result;
use orion_core::{ContextElementResponse, ContextResponses};
use serde::de::DeserializeOwned;

/// Unparsed broker reply: HTTP status and body as received
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn into_body(self) -> String {
        self.body
    }

    /// Parse the body into any deserializable type
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Parse a `contextResponses` envelope (updateContext, queryContext)
    pub fn context_responses(&self) -> Result<ContextResponses> {
        self.json()
    }

    /// Parse a single `contextElement` envelope (query by entity id)
    pub fn context_element(&self) -> Result<ContextElementResponse> {
        self.json()
    }
}
