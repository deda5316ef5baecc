//! Parse orchestration: tagger -> expander -> confidence-scored results

pub mod parser;

pub use parser::{ParseIter, ParseObserver, Parser, TagReport};
