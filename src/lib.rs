//! Parlance - natural language intent determination
//!
//! Turns free-text utterances into ranked, structured intents: known
//! vocabulary and regex-defined spans are located in the text, overlapping
//! candidates are resolved into non-overlapping interpretations via maximal
//! cliques, and the interpretations are matched against declarative intent
//! schemas to produce confidence-scored results.
//!
//! Everything downstream of registration is a lazy, pull-based sequence, so
//! asking for one result short-circuits most of the combinatorial work.
//!
//! ```
//! use parlance::{IntentBuilder, IntentEngine};
//!
//! let mut engine = IntentEngine::new();
//! engine.register_entity("weather", "WeatherKeyword", None);
//! engine.register_regex_entity(r" in (?<Location>\w+)").unwrap();
//! engine.register_intent_parser(
//!     IntentBuilder::new("WeatherIntent")
//!         .require("WeatherKeyword")
//!         .optionally("Location")
//!         .build(),
//! );
//!
//! let intent = engine
//!     .determine_intent("what is the weather like in tokyo", 1)
//!     .next()
//!     .unwrap();
//! assert_eq!(intent.field("Location"), Some("tokyo"));
//! ```

pub mod core;
pub mod engine;
pub mod expand;
pub mod intent;
pub mod parse;
pub mod tagging;
pub mod text;

pub use crate::core::error::{ParlanceError, Result};
pub use crate::core::types::{EntityCandidate, ParseResult, ResolvedIntent, Tag};
pub use crate::engine::{DomainRouter, IntentEngine};
pub use crate::intent::{Intent, IntentBuilder, IntentParser};
pub use crate::parse::{ParseObserver, Parser, TagReport};
pub use crate::text::{EnglishTokenizer, Trie};
