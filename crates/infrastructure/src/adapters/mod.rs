//! Port implementations.

mod reqwest_executor;

pub use reqwest_executor::{ReqwestExecutor, SAVE_PATH_HEADER};
