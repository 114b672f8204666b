//! Courier Application - Use cases and ports
//!
//! This crate holds the request pipeline logic that sits between the pure
//! domain model and the I/O adapters: variable substitution, request
//! encoding, response classification, and the ports the infrastructure
//! layer implements.

pub mod classifier;
pub mod encoder;
pub mod error;
pub mod ports;
pub mod use_cases;
pub mod variables;

pub use classifier::{ClassifiedBody, ClassifyError, ClassifyStrategy, InlineClassifier, classify};
pub use encoder::{EncodeError, encode};
pub use error::{ApplicationError, ApplicationResult};
pub use ports::{ExecuteError, ExecutionRequest, ProgressCallback, RequestExecutor, RequestPayload};
pub use use_cases::{SendRequest, SendRequestInput};
pub use variables::{apply_to_request, apply_variables, substitute_str};
