//! Use cases of the request engine.

mod send_request;

pub use send_request::{SendRequest, SendRequestInput};
