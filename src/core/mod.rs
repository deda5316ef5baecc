//! Core types and error handling shared across the pipeline

pub mod error;
pub mod types;

pub use error::{ParlanceError, Result};
pub use types::{EntityCandidate, ParseResult, ResolvedIntent, Tag};
