//! Coordinates the tagger and expander to yield valid parse results

use std::time::{Duration, Instant};

use crate::core::types::{ParseResult, Tag};
use crate::expand::expander::CliqueExpander;
use crate::expand::lattice::{CliqueScorer, Traversal};
use crate::tagging::tagger::EntityTagger;
use crate::text::tokenizer::EnglishTokenizer;

/// Diagnostic report emitted once tagging completes.
#[derive(Debug)]
pub struct TagReport<'a> {
    pub utterance: &'a str,
    pub tags: &'a [Tag],
    pub elapsed: Duration,
}

/// Optional side channel for tagging and parse diagnostics.
///
/// Informational only; correctness never depends on an observer being
/// installed, and the default methods discard everything.
pub trait ParseObserver {
    fn on_tagged(&self, _report: &TagReport<'_>) {}
    fn on_parse_result(&self, _result: &ParseResult) {}
}

/// Orchestrates tagging and expansion into a lazy parse-result sequence.
#[derive(Clone, Copy)]
pub struct Parser<'a> {
    tokenizer: &'a EnglishTokenizer,
    tagger: EntityTagger<'a>,
    observer: Option<&'a dyn ParseObserver>,
}

impl<'a> Parser<'a> {
    pub fn new(
        tokenizer: &'a EnglishTokenizer,
        tagger: EntityTagger<'a>,
        observer: Option<&'a dyn ParseObserver>,
    ) -> Self {
        Self {
            tokenizer,
            tagger,
            observer,
        }
    }

    /// Lazily yields at most `limit` parse results, best-ranked alternatives
    /// first within each island. No work happens until the first pull.
    pub fn parse(&self, utterance: &str, limit: usize) -> ParseIter<'a> {
        ParseIter {
            parser: *self,
            utterance: utterance.to_string(),
            limit,
            yielded: 0,
            state: None,
        }
    }
}

struct ParseState<'a> {
    traversal: Traversal<'a>,
    expansion_started: Instant,
    utterance_chars: usize,
}

/// Lazy sequence of [`ParseResult`]s; abandoning it early costs nothing.
pub struct ParseIter<'a> {
    parser: Parser<'a>,
    utterance: String,
    limit: usize,
    yielded: usize,
    state: Option<ParseState<'a>>,
}

impl<'a> ParseIter<'a> {
    fn start(&mut self) -> ParseState<'a> {
        let tagging_started = Instant::now();
        let tagged = self.parser.tagger.tag(&self.utterance.to_lowercase());
        tracing::debug!(
            tags = tagged.len(),
            elapsed = ?tagging_started.elapsed(),
            "tagged utterance"
        );
        if let Some(observer) = self.parser.observer {
            observer.on_tagged(&TagReport {
                utterance: &self.utterance,
                tags: &tagged,
                elapsed: tagging_started.elapsed(),
            });
        }

        let utterance_chars = self.utterance.chars().count();
        // Rank clique alternatives by per-character coverage; this orders an
        // island's choices without forcing full enumeration of combinations.
        let scorer: CliqueScorer = Box::new(move |clique: &[Tag]| {
            clique
                .iter()
                .map(|tag| {
                    tag.best_candidate_confidence() * tag.matched.chars().count() as f64
                        / (utterance_chars + 1) as f64
                })
                .sum()
        });

        let expander = CliqueExpander::new(self.parser.tokenizer);
        ParseState {
            traversal: expander.expand(tagged, Some(scorer)),
            expansion_started: Instant::now(),
            utterance_chars,
        }
    }
}

impl Iterator for ParseIter<'_> {
    type Item = ParseResult;

    fn next(&mut self) -> Option<ParseResult> {
        if self.yielded >= self.limit {
            return None;
        }
        if self.state.is_none() {
            self.state = Some(self.start());
        }
        let state = self.state.as_mut()?;

        let tags = state.traversal.next()?;
        let confidence = tags
            .iter()
            .map(|tag| {
                tag.candidates.first().map_or(0.0, |c| c.confidence)
                    * tag.matched.chars().count() as f64
                    / state.utterance_chars.max(1) as f64
            })
            .sum();

        self.yielded += 1;
        Some(ParseResult {
            utterance: self.utterance.clone(),
            tags,
            confidence,
            elapsed: state.expansion_started.elapsed(),
        })
    }
}
