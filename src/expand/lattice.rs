//! Lattice of island alternatives and its Cartesian-product traversal

use std::cmp::Ordering;

use crate::core::types::Tag;
use crate::expand::expander::expand_island;
use crate::text::tokenizer::EnglishTokenizer;

/// Ranks one clique (an ordered, reduced tag sequence) for ordering within
/// its island slot. Higher scores come out of the lattice first.
pub type CliqueScorer = Box<dyn Fn(&[Tag]) -> f64>;

/// One lattice position: a passthrough singleton tag, or an island whose
/// cliques are materialized on first traversal.
#[derive(Debug)]
pub(crate) enum Slot {
    Single(Tag),
    Island {
        tags: Vec<Tag>,
        alternatives: Option<Vec<Vec<Tag>>>,
    },
}

impl Slot {
    fn width(&self) -> usize {
        match self {
            Slot::Single(_) => 1,
            Slot::Island { alternatives, .. } => {
                alternatives.as_ref().map_or(0, Vec::len)
            }
        }
    }
}

/// Lazy Cartesian product across island slots in utterance order.
///
/// Each item is one combined, non-overlapping, full-utterance tag sequence.
/// The sequence is finite (bounded by the product of per-island clique
/// counts) and computes island cliques only once iteration begins; a fresh
/// `expand` call restarts from the first combination.
pub struct Traversal<'t> {
    tokenizer: &'t EnglishTokenizer,
    scorer: Option<CliqueScorer>,
    slots: Vec<Slot>,
    cursor: Vec<usize>,
    started: bool,
    done: bool,
}

impl<'t> Traversal<'t> {
    pub(crate) fn new(
        tokenizer: &'t EnglishTokenizer,
        scorer: Option<CliqueScorer>,
        slots: Vec<Slot>,
    ) -> Self {
        Self {
            tokenizer,
            scorer,
            slots,
            cursor: Vec::new(),
            started: false,
            done: false,
        }
    }

    fn materialize(&mut self) {
        for slot in &mut self.slots {
            if let Slot::Island { tags, alternatives } = slot {
                if alternatives.is_none() {
                    let mut cliques = expand_island(self.tokenizer, tags);
                    if let Some(scorer) = &self.scorer {
                        let mut scored: Vec<(f64, Vec<Tag>)> =
                            cliques.drain(..).map(|c| (scorer(&c), c)).collect();
                        scored.sort_by(|a, b| {
                            b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal)
                        });
                        cliques = scored.into_iter().map(|(_, c)| c).collect();
                    }
                    tracing::trace!(cliques = cliques.len(), "island expanded");
                    *alternatives = Some(cliques);
                }
            }
        }
    }

    fn current(&self) -> Vec<Tag> {
        let mut combined = Vec::new();
        for (slot, &choice) in self.slots.iter().zip(&self.cursor) {
            match slot {
                Slot::Single(tag) => combined.push(tag.clone()),
                Slot::Island { alternatives, .. } => {
                    if let Some(alts) = alternatives {
                        combined.extend(alts[choice].iter().cloned());
                    }
                }
            }
        }
        combined
    }
}

impl Iterator for Traversal<'_> {
    type Item = Vec<Tag>;

    fn next(&mut self) -> Option<Vec<Tag>> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            self.materialize();
            // An island with no valid disambiguation contributes nothing;
            // drop it so the remaining slots still combine.
            self.slots.retain(|s| s.width() > 0);
            self.cursor = vec![0; self.slots.len()];
            return Some(self.current());
        }

        // Mixed-radix odometer, last slot fastest.
        let mut i = self.slots.len();
        loop {
            if i == 0 {
                self.done = true;
                return None;
            }
            i -= 1;
            self.cursor[i] += 1;
            if self.cursor[i] < self.slots[i].width() {
                break;
            }
            self.cursor[i] = 0;
        }
        Some(self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::EntityCandidate;

    fn tag(value: &str, start: usize) -> Tag {
        Tag {
            matched: value.to_string(),
            start_token: start,
            end_token: start,
            candidates: vec![EntityCandidate {
                value: value.to_string(),
                entity_type: "Word".to_string(),
                confidence: 1.0,
            }],
            confidence: 1.0,
        }
    }

    #[test]
    fn test_island_without_cliques_is_skipped() {
        let tok = EnglishTokenizer::new();
        let slots = vec![
            Slot::Single(tag("play", 0)),
            Slot::Island {
                tags: Vec::new(),
                alternatives: Some(Vec::new()),
            },
            Slot::Single(tag("rain", 2)),
        ];
        let mut traversal = Traversal::new(&tok, None, slots);

        let first = traversal.next().expect("remaining slots still combine");
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].matched, "play");
        assert_eq!(first[1].matched, "rain");
        assert!(traversal.next().is_none());
    }
}
