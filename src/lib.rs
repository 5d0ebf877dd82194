/*
 * DataFlow Client - Rust client for the DataFlow scientific data management service
 */

// Internal modules
mod client;
pub mod models;
pub mod metadata;
pub mod apis;
mod error;
mod auth;
mod config;
mod validate;

#[cfg(feature = "curl-command")]
pub mod curl;

// Re-export public types and interfaces
pub use client::{DataFlowClient, RequestBody};
pub use models::*;
pub use metadata::{Metadata, MetadataValue};
pub use apis::*;
pub use error::{DataFlowError, DataFlowResult};
pub use auth::{Authentication, BearerAuth};
pub use config::{DataFlowConfig, API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use validate::{validate_integer, validate_str};

// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        DataFlowClient, DataFlowConfig,
        DataFlowError, DataFlowResult,
        Metadata, MetadataValue,
        Transport, GlobusEndpoint,
    };
}
