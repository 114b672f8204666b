//! Response model: execution results, download progress and saved examples.

mod progress;
mod result;
mod saved;

pub use progress::{DownloadProgress, ProgressStatus};
pub use result::{ExecutionResult, MediaKind, ResponseData};
pub use saved::ResponseSpec;
