//! Greedy intent determination over one vocabulary
//!
//! Given an utterance, the engine produces a sorted stream of tagged parses
//! and keeps, per parse, the best-scoring registered schema. Every stage is a
//! pull-based sequence, so a caller asking for one result short-circuits most
//! of the combinatorial work.

use ahash::AHashSet;
use regex::{Regex, RegexBuilder};

use crate::core::error::Result;
use crate::core::types::{ParseResult, ResolvedIntent};
use crate::intent::resolve::IntentParser;
use crate::parse::parser::{ParseObserver, Parser};
use crate::tagging::tagger::EntityTagger;
use crate::text::tokenizer::EnglishTokenizer;
use crate::text::trie::{Trie, TriePayload};

/// Entity type implicitly registered for every non-alias entity type name.
const CONCEPT_ENTITY: &str = "Concept";

/// Owns one vocabulary trie, regex pattern set, and schema list.
///
/// Registration mutates in place and is not designed for concurrent use;
/// finish registering before querying. Queries never mutate, so a frozen
/// engine is safe to share for read-only traffic.
pub struct IntentEngine {
    tokenizer: EnglishTokenizer,
    trie: Trie,
    patterns: Vec<Regex>,
    pattern_sources: AHashSet<String>,
    parsers: Vec<Box<dyn IntentParser>>,
    observer: Option<Box<dyn ParseObserver>>,
}

impl Default for IntentEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentEngine {
    pub fn new() -> Self {
        Self::with_trie(Trie::new())
    }

    /// Builds over a caller-supplied trie; the hook for typo tolerance via
    /// [`Trie::with_tolerance`].
    pub fn with_trie(trie: Trie) -> Self {
        Self {
            tokenizer: EnglishTokenizer::new(),
            trie,
            patterns: Vec::new(),
            pattern_sources: AHashSet::new(),
            parsers: Vec::new(),
            observer: None,
        }
    }

    /// Installs the diagnostic observer for tagging and parse events.
    pub fn set_observer(&mut self, observer: Box<dyn ParseObserver>) {
        self.observer = Some(observer);
    }

    /// Registers an entity value under a type.
    ///
    /// The matchable key is lowercased; the payload keeps the original case.
    /// Without an alias, the type name itself also becomes matchable as a
    /// "Concept" entity. With an alias, only the alias-to-canonical binding
    /// is added.
    pub fn register_entity(&mut self, value: &str, entity_type: &str, alias_of: Option<&str>) {
        match alias_of {
            Some(canonical) => {
                self.trie.insert(
                    &value.to_lowercase(),
                    TriePayload::new(canonical, entity_type),
                );
            }
            None => {
                self.trie
                    .insert(&value.to_lowercase(), TriePayload::new(value, entity_type));
                self.trie.insert(
                    &entity_type.to_lowercase(),
                    TriePayload::new(entity_type, CONCEPT_ENTITY),
                );
            }
        }
        tracing::debug!(value, entity_type, "registered entity");
    }

    /// Removes an entity binding; returns `false` if it was never registered.
    pub fn unregister_entity(&mut self, value: &str, entity_type: &str) -> bool {
        self.trie.remove(
            &value.to_lowercase(),
            Some(&TriePayload::new(value, entity_type)),
        )
    }

    /// Registers a regex entity pattern with named capture groups, e.g.
    /// `" in (?<Location>\w+)"`. Compiled case-insensitively; duplicates of
    /// the same raw pattern are ignored. Fails fast on an unparsable pattern.
    pub fn register_regex_entity(&mut self, pattern: &str) -> Result<()> {
        if self.pattern_sources.contains(pattern) {
            return Ok(());
        }
        let compiled = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        self.pattern_sources.insert(pattern.to_string());
        self.patterns.push(compiled);
        tracing::debug!(pattern, "registered regex entity");
        Ok(())
    }

    /// Registers an intent schema (or any [`IntentParser`]) for resolution.
    pub fn register_intent_parser(&mut self, parser: impl IntentParser + 'static) {
        self.parsers.push(Box::new(parser));
    }

    /// Lazily yields up to `num_results` positive-confidence intents, the
    /// best-scoring schema per parse result.
    pub fn determine_intent<'a>(
        &'a self,
        utterance: &str,
        num_results: usize,
    ) -> impl Iterator<Item = ResolvedIntent> + 'a {
        let tagger = EntityTagger::new(&self.trie, &self.tokenizer, &self.patterns);
        let parser = Parser::new(&self.tokenizer, tagger, self.observer.as_deref());
        parser
            .parse(utterance, num_results)
            .filter_map(move |result| {
                if let Some(observer) = self.observer.as_deref() {
                    observer.on_parse_result(&result);
                }
                self.best_intent(&result)
                    .filter(|intent| intent.confidence > 0.0)
            })
    }

    /// Highest-confidence resolution across registered parsers; ties keep
    /// the earlier-registered parser.
    fn best_intent(&self, result: &ParseResult) -> Option<ResolvedIntent> {
        let mut best: Option<ResolvedIntent> = None;
        for parser in &self.parsers {
            let resolved = parser.validate(&result.tags, result.confidence);
            let beaten = best
                .as_ref()
                .is_some_and(|b| b.confidence >= resolved.confidence);
            if !beaten {
                best = Some(resolved);
            }
        }
        best
    }
}
