//! Response classification.
//!
//! Sniffs the media type of a response body and decodes it for the caller.

mod sniff;
mod strategy;

pub use sniff::{ClassifiedBody, classify, essence, media_kind, sniff};
pub use strategy::{
    ClassifyError, ClassifyStrategy, InlineClassifier, ThresholdClassifier, should_offload,
};
