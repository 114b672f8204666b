//! HTTP infrastructure utilities.
//!
//! - Body building for every body mode, with file streaming
//! - Worker-thread response classification

mod body_builder;
mod worker;

pub use body_builder::{BodyBuildError, BuiltBody, build_body, validate_file_path};
pub use worker::WorkerClassifier;
