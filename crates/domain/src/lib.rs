//! Courier Domain - Core request engine types
//!
//! This crate defines the data model of the Courier request engine:
//! collections, requests, bodies, auth, environments and execution results.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod collection;
pub mod environment;
pub mod error;
pub mod id;
pub mod request;
pub mod response;
pub mod settings;

pub use auth::{AuthConfig, AuthPlacement, AuthSpec};
pub use collection::{Collection, Folder, Item, Route};
pub use environment::{Environment, EnvironmentVariable};
pub use error::{DomainError, DomainResult};
pub use id::generate_id;
pub use request::{BodyMode, BodySpec, HttpMethod, KeyValuePair, RequestSpec};
pub use response::{DownloadProgress, ExecutionResult, MediaKind, ResponseData};
pub use settings::ClientSettings;
