//! Orion Core Library
//!
//! This crate provides the data model shared by NGSI10 clients:
//! - Attributes and entities with their broker wire representation
//! - NGSI10 request and response envelopes
//! - Client connection configuration

pub mod config;
pub mod error;
pub mod models;
pub mod ngsi;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::ModelError;
pub use models::*;
pub use ngsi::{ContextElementResponse, ContextResponses, StatusCode, StatusFailure, UpdateAction};
