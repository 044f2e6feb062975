//! Orion Client Library
//!
//! NGSI10 client ("Knowledge Processor") for the Orion Context Broker.

mod client;
mod response;

pub use client::KnowledgeProcessor;
pub use orion_core::ngsi::StatusFailure;
pub use orion_core::{
    Attribute, ClientConfig, ContextElementResponse, ContextResponses, Entity, ModelError,
    StatusCode, UpdateAction,
};
pub use response::RawResponse;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid JSON from broker: {0}")]
    Protocol(#[from] serde_json::Error),

    #[error("Broker error {code}: {reason}")]
    Application { code: String, reason: String },

    #[error("{} of {} context elements failed", .failures.len(), .total)]
    PartialFailure {
        total: usize,
        failures: Vec<StatusCode>,
    },

    #[error("Usage error: {0}")]
    Usage(#[from] ModelError),
}

impl From<StatusFailure> for ClientError {
    fn from(failure: StatusFailure) -> Self {
        match failure {
            StatusFailure::Total(status) => ClientError::Application {
                code: status.code,
                reason: status.reason_phrase,
            },
            StatusFailure::Partial { total, failures } => {
                ClientError::PartialFailure { total, failures }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
