//! Ports implemented by the infrastructure layer.

mod executor;

pub use executor::{
    ExecuteError, ExecutionRequest, FileDescriptor, ProgressCallback, RequestExecutor,
    RequestPayload,
};
