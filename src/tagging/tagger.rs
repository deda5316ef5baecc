//! Known-entity tagger
//!
//! Combines trie lookups and named-capture regex matches over token
//! subsequences into overlapping span candidates. Overlap resolution is the
//! expander's job; this stage deliberately over-generates.

use regex::Regex;

use crate::core::types::{EntityCandidate, Tag};
use crate::text::tokenizer::EnglishTokenizer;
use crate::text::trie::{Trie, TriePayload};

/// Confidence assigned to every candidate born from a regex capture group.
/// A fixed discount reflecting lower trust than exact vocabulary hits.
const REGEX_CONFIDENCE: f64 = 0.5;

/// Tags known entities within an utterance.
///
/// Holds borrowed views of the owning engine's trie, tokenizer, and compiled
/// patterns; construction is free and happens per query.
#[derive(Clone, Copy)]
pub struct EntityTagger<'a> {
    trie: &'a Trie,
    tokenizer: &'a EnglishTokenizer,
    patterns: &'a [Regex],
}

impl<'a> EntityTagger<'a> {
    pub fn new(trie: &'a Trie, tokenizer: &'a EnglishTokenizer, patterns: &'a [Regex]) -> Self {
        Self {
            trie,
            tokenizer,
            patterns,
        }
    }

    /// Produces every candidate entity occurrence in `utterance`.
    ///
    /// Regex patterns are run against all O(n^2) contiguous token
    /// subsequences; this is an accepted cost of supporting free-form capture
    /// groups, not something to optimize away behind the caller's back.
    pub fn tag(&self, utterance: &str) -> Vec<Tag> {
        let tokens = self.tokenizer.tokenize(utterance);
        let mut tags = Vec::new();

        if !self.patterns.is_empty() {
            for start in 0..tokens.len() {
                for end in start + 1..=tokens.len() {
                    let part = tokens[start..end].join(" ");
                    self.tag_subsequence(&part, start, &mut tags);
                }
            }
        }
        let needs_sort = !tags.is_empty();

        for i in 0..tokens.len() {
            let part = tokens[i..].join(" ");
            for hit in self.trie.gather(&part) {
                let span_tokens = self.tokenizer.tokenize(&hit.matched).len();
                let candidates = hit
                    .payloads
                    .iter()
                    .map(|p| EntityCandidate {
                        value: p.value.clone(),
                        entity_type: p.entity_type.clone(),
                        confidence: hit.confidence,
                    })
                    .collect();
                tags.push(Tag {
                    matched: hit.matched,
                    start_token: i,
                    end_token: i + span_tokens.saturating_sub(1),
                    candidates,
                    confidence: 1.0,
                });
            }
        }

        // Pure vocabulary tagging is already ordered by the start-index loop.
        if needs_sort {
            tags.sort_by_key(|t| (t.start_token, t.end_token));
        }
        tags
    }

    /// Runs every pattern against one joined subsequence, then re-tags the
    /// captures through a throwaway trie. The sub-tagger carries no patterns,
    /// which pins the recursion to depth 1.
    fn tag_subsequence(&self, part: &str, offset: usize, out: &mut Vec<Tag>) {
        let mut local = Trie::new();
        let mut captured = false;
        for pattern in self.patterns {
            if let Some(caps) = pattern.captures(part) {
                for name in pattern.capture_names().flatten() {
                    if let Some(m) = caps.name(name) {
                        local.insert(m.as_str(), TriePayload::new(m.as_str(), name));
                        captured = true;
                    }
                }
            }
        }
        if !captured {
            return;
        }

        let sub_tagger = EntityTagger::new(&local, self.tokenizer, &[]);
        for mut tag in sub_tagger.tag(part) {
            tag.start_token += offset;
            tag.end_token += offset;
            for candidate in &mut tag.candidates {
                candidate.confidence = REGEX_CONFIDENCE;
            }
            out.push(tag);
        }
    }
}
