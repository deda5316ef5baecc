//! Core type definitions used throughout the pipeline

use std::time::Duration;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// One typed interpretation of a matched span.
///
/// `value` is the canonical (original-case) form registered with the engine;
/// `entity_type` is the tag/kind it was registered under (Ex: "Artist").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityCandidate {
    pub value: String,
    pub entity_type: String,
    /// Match quality in [0, 1]. Exact vocabulary hits score 1.0; spans born
    /// from regex capture groups are fixed at 0.5.
    pub confidence: f64,
}

/// A candidate entity occurrence within an utterance.
///
/// Token indices are 0-based and inclusive on both ends. A tag fresh out of
/// the tagger may carry several candidates (the same literal registered under
/// several types); clique expansion reduces each tag to a single candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// The span text as it appeared in the (lowercased) utterance.
    pub matched: String,
    pub start_token: usize,
    /// Derived from the token length of `matched`, never set independently.
    pub end_token: usize,
    pub candidates: Vec<EntityCandidate>,
    /// 1.0 for tagger output; candidate confidence folded in after reduction.
    pub confidence: f64,
}

impl Tag {
    /// Confidence of the best candidate, 0.0 for a candidate-less tag.
    pub fn best_candidate_confidence(&self) -> f64 {
        self.candidates
            .iter()
            .map(|c| c.confidence)
            .fold(0.0, f64::max)
    }
}

/// One complete, non-overlapping tag sequence for an utterance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseResult {
    pub utterance: String,
    pub tags: Vec<Tag>,
    /// Sum over tags of candidate confidence weighted by the share of the
    /// utterance (per character) that the match covers.
    pub confidence: f64,
    pub elapsed: Duration,
}

/// The result of resolving a parse against one intent schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolvedIntent {
    pub intent_type: String,
    /// Schema-declared fields bound to canonical entity values.
    pub fields: AHashMap<String, String>,
    /// Bound from the first unconsumed tag of the reserved "Client" type.
    pub target: Option<String>,
    /// In [0, 1]; 0.0 means the schema did not resolve.
    pub confidence: f64,
}

impl ResolvedIntent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}
