//! NGSI10 request and response envelopes
//!
//! Request bodies borrow the caller's entities; response bodies are owned and
//! tolerant of fields the broker adds or leaves out.

use serde::{Deserialize, Serialize};

use crate::models::{Attribute, Entity};

/// Business status code the broker uses for success
pub const SUCCESS_CODE: &str = "200";

/// updateAction carried by an updateContext request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum UpdateAction {
    Append,
    Update,
    Delete,
}

/// Body of `POST /ngsi10/updateContext`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContextRequest<'a> {
    pub context_elements: &'a [Entity],
    pub update_action: UpdateAction,
}

/// Body of `POST /ngsi10/queryContext`
#[derive(Debug, Serialize)]
pub struct QueryContextRequest<'a> {
    pub entities: &'a [Entity],
}

/// Body of `PUT /ngsi10/contextEntities/{id}/attributes`
#[derive(Debug, Serialize)]
pub struct AppendAttributesRequest<'a> {
    pub attributes: &'a [Attribute],
}

/// statusCode / errorCode object returned by the broker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCode {
    pub code: String,
    #[serde(default)]
    pub reason_phrase: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl StatusCode {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

/// One element of `contextResponses`, also the body of a single-entity query
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextElementResponse {
    #[serde(default)]
    pub context_element: Option<Entity>,
    pub status_code: StatusCode,
}

/// Response to updateContext, queryContext and the attribute convenience operations
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextResponses {
    #[serde(default)]
    pub context_responses: Vec<ContextElementResponse>,
    /// Set instead of `contextResponses` when the request failed as a whole
    #[serde(default)]
    pub error_code: Option<StatusCode>,
    /// Set by Orion when it rejects the request itself (bad payload, auth)
    #[serde(default)]
    pub orion_error: Option<StatusCode>,
}

/// Outcome of a failed status check over a whole response
#[derive(Debug, Clone, PartialEq)]
pub enum StatusFailure {
    /// Nothing succeeded; carries the first reported failure
    Total(StatusCode),
    /// Some elements succeeded and some did not
    Partial {
        total: usize,
        failures: Vec<StatusCode>,
    },
}

impl ContextResponses {
    /// Inspect every element's status code.
    ///
    /// A top-level `errorCode` / `orionError` or failure of every element is
    /// a total failure. An empty response with neither has nothing to report
    /// and passes; callers that expect per-element results check `is_empty`.
    pub fn check(&self) -> Result<(), StatusFailure> {
        let top_level = [&self.orion_error, &self.error_code];
        if let Some(error) = top_level
            .into_iter()
            .flatten()
            .find(|status| !status.is_success())
        {
            return Err(StatusFailure::Total(error.clone()));
        }

        let failures: Vec<StatusCode> = self
            .context_responses
            .iter()
            .map(|element| &element.status_code)
            .filter(|status| !status.is_success())
            .cloned()
            .collect();

        match failures.len() {
            0 => Ok(()),
            n if n == self.context_responses.len() => {
                Err(StatusFailure::Total(failures[0].clone()))
            }
            _ => Err(StatusFailure::Partial {
                total: self.context_responses.len(),
                failures,
            }),
        }
    }

    /// True when the broker reported no element and no top-level status
    pub fn is_empty(&self) -> bool {
        self.context_responses.is_empty() && self.error_code.is_none() && self.orion_error.is_none()
    }

    /// Entities carried by successful elements, in response order
    pub fn entities(&self) -> Vec<Entity> {
        self.context_responses
            .iter()
            .filter(|element| element.status_code.is_success())
            .filter_map(|element| element.context_element.clone())
            .collect()
    }
}
