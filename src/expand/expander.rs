//! Island segmentation and per-island clique expansion
//!
//! A parse result is valid when it contains no overlapping spans, and parse
//! confidence is a sum over tag confidences, so nothing is gained by yielding
//! a subset of a larger valid result. Treating non-overlapping candidates as
//! graph neighbors makes each maximal clique exactly one valid disambiguation,
//! which is the classic Bron-Kerbosch setting.

use ahash::AHashMap;
use ordered_float::OrderedFloat;

use crate::core::types::Tag;
use crate::expand::graph::{max_cliques, SpanGraph, VertexKey};
use crate::expand::lattice::{CliqueScorer, Slot, Traversal};
use crate::text::tokenizer::EnglishTokenizer;

/// Expands tagged entities into valid (non-overlapping) parse alternatives.
pub struct CliqueExpander<'t> {
    tokenizer: &'t EnglishTokenizer,
}

impl<'t> CliqueExpander<'t> {
    pub fn new(tokenizer: &'t EnglishTokenizer) -> Self {
        Self { tokenizer }
    }

    /// Segments `tags` into overlap islands and returns the lazy traversal
    /// over all island combinations. When `scorer` is supplied, each island's
    /// cliques are ordered by descending score before entering the lattice.
    pub fn expand(&self, mut tags: Vec<Tag>, scorer: Option<CliqueScorer>) -> Traversal<'t> {
        tags.sort_by_key(|t| (t.start_token, t.end_token));

        let mut slots = Vec::new();
        let mut island: Vec<Tag> = Vec::new();
        let mut max_end = 0;
        for tag in tags {
            if !island.is_empty() && tag.start_token <= max_end {
                max_end = max_end.max(tag.end_token);
                island.push(tag);
            } else {
                flush_island(&mut slots, std::mem::take(&mut island));
                max_end = tag.end_token;
                island.push(tag);
            }
        }
        flush_island(&mut slots, island);

        Traversal::new(self.tokenizer, scorer, slots)
    }
}

fn flush_island(slots: &mut Vec<Slot>, mut island: Vec<Tag>) {
    match island.len() {
        0 => {}
        1 => slots.push(Slot::Single(island.remove(0))),
        _ => slots.push(Slot::Island {
            tags: island,
            alternatives: None,
        }),
    }
}

/// Enumerates one island's maximal cliques and maps each back to an ordered
/// sequence of reduced, single-candidate tags.
///
/// Expects `tags` ordered by (start_token, end_token): when duplicate vertex
/// identities collapse, the first (shortest) span must win so the reduced tag
/// stays consistent with the union of recorded edges.
pub(crate) fn expand_island(tokenizer: &EnglishTokenizer, tags: &[Tag]) -> Vec<Vec<Tag>> {
    // Intern vertices: identity is (start_token, entity type, confidence).
    let mut order: Vec<VertexKey> = Vec::new();
    let mut sources: AHashMap<VertexKey, (usize, usize)> = AHashMap::new();
    for (tag_idx, tag) in tags.iter().enumerate() {
        for (cand_idx, candidate) in tag.candidates.iter().enumerate() {
            let key = VertexKey {
                start_token: tag.start_token,
                entity_type: candidate.entity_type.clone(),
                confidence: OrderedFloat(candidate.confidence),
            };
            if !sources.contains_key(&key) {
                sources.insert(key.clone(), (tag_idx, cand_idx));
                order.push(key);
            }
        }
    }

    // An edge connects candidates of distinct tags whose spans cannot
    // overlap: the later tag starts at or past the earlier span's token end.
    let mut graph = SpanGraph::default();
    for (tag_idx, tag) in tags.iter().enumerate() {
        let span_tokens = tokenizer.tokenize(&tag.matched).len();
        for candidate in &tag.candidates {
            let a = VertexKey {
                start_token: tag.start_token,
                entity_type: candidate.entity_type.clone(),
                confidence: OrderedFloat(candidate.confidence),
            };
            for later in &tags[tag_idx + 1..] {
                if later.start_token >= tag.start_token + span_tokens {
                    for later_candidate in &later.candidates {
                        let b = VertexKey {
                            start_token: later.start_token,
                            entity_type: later_candidate.entity_type.clone(),
                            confidence: OrderedFloat(later_candidate.confidence),
                        };
                        graph.add_edge(&a, &b);
                    }
                }
            }
        }
    }

    max_cliques(order, &graph)
        .into_iter()
        .map(|clique| {
            let mut reduced: Vec<Tag> = clique
                .iter()
                .map(|key| {
                    let (tag_idx, cand_idx) = sources[key];
                    let source = &tags[tag_idx];
                    let candidate = source.candidates[cand_idx].clone();
                    let confidence = candidate.confidence * source.confidence;
                    Tag {
                        matched: source.matched.clone(),
                        start_token: source.start_token,
                        end_token: source.end_token,
                        candidates: vec![candidate],
                        confidence,
                    }
                })
                .collect();
            reduced.sort_by_key(|t| t.start_token);
            reduced
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::EntityCandidate;

    fn tag(matched: &str, start: usize, candidates: Vec<(&str, &str, f64)>) -> Tag {
        let span = matched.split(' ').count();
        Tag {
            matched: matched.to_string(),
            start_token: start,
            end_token: start + span - 1,
            candidates: candidates
                .into_iter()
                .map(|(value, entity_type, confidence)| EntityCandidate {
                    value: value.to_string(),
                    entity_type: entity_type.to_string(),
                    confidence,
                })
                .collect(),
            confidence: 1.0,
        }
    }

    fn expander(tokenizer: &EnglishTokenizer) -> CliqueExpander<'_> {
        CliqueExpander::new(tokenizer)
    }

    #[test]
    fn test_disjoint_tags_pass_through() {
        let tok = EnglishTokenizer::new();
        let tags = vec![
            tag("play", 0, vec![("play", "MusicKeyword", 1.0)]),
            tag("daft punk", 2, vec![("Daft Punk", "MusicArtist", 1.0)]),
        ];
        let results: Vec<Vec<Tag>> = expander(&tok).expand(tags, None).collect();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].len(), 2);
    }

    #[test]
    fn test_overlapping_tags_split_into_alternatives() {
        let tok = EnglishTokenizer::new();
        // "new" and "new york" overlap; "york city" overlaps "new york".
        let tags = vec![
            tag("new", 0, vec![("new", "Adjective", 1.0)]),
            tag("new york", 0, vec![("New York", "City", 1.0)]),
            tag("york city", 1, vec![("York City", "City", 1.0)]),
        ];
        let results: Vec<Vec<Tag>> = expander(&tok).expand(tags, None).collect();
        assert!(!results.is_empty());
        for sequence in &results {
            for pair in sequence.windows(2) {
                assert!(pair[0].end_token < pair[1].start_token);
            }
        }
    }

    #[test]
    fn test_same_tag_candidates_never_share_a_clique() {
        let tok = EnglishTokenizer::new();
        // One literal registered under two types plus an overlapping span.
        let tags = vec![
            tag("sun", 0, vec![("sun", "WeatherType", 1.0), ("sun", "Concept", 1.0)]),
            tag("sun valley", 0, vec![("Sun Valley", "Location", 1.0)]),
        ];
        let results: Vec<Vec<Tag>> = expander(&tok).expand(tags, None).collect();
        assert_eq!(results.len(), 3);
        for sequence in &results {
            assert_eq!(sequence.len(), 1);
            assert_eq!(sequence[0].candidates.len(), 1);
        }
    }

    #[test]
    fn test_duplicate_vertices_collapse() {
        let tok = EnglishTokenizer::new();
        let dup = || tag("tokyo", 6, vec![("tokyo", "Location", 0.5)]);
        let tags = vec![dup(), dup(), dup()];
        let results: Vec<Vec<Tag>> = expander(&tok).expand(tags, None).collect();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].len(), 1);
    }

    #[test]
    fn test_reduced_confidence_is_product() {
        let tok = EnglishTokenizer::new();
        let mut input = tag("tokyo", 0, vec![("tokyo", "Location", 0.5)]);
        input.confidence = 0.8;
        let other = tag("tokyo", 0, vec![("tokyo", "City", 1.0)]);
        let results: Vec<Vec<Tag>> =
            expander(&tok).expand(vec![input, other], None).collect();
        let reduced: Vec<&Tag> = results.iter().flatten().collect();
        let location = reduced
            .iter()
            .find(|t| t.candidates[0].entity_type == "Location")
            .unwrap();
        assert!((location.confidence - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_scorer_orders_island_alternatives() {
        let tok = EnglishTokenizer::new();
        let tags = vec![
            tag("sun", 0, vec![("sun", "WeatherType", 0.4)]),
            tag("sun valley", 0, vec![("Sun Valley", "Location", 0.9)]),
        ];
        let scorer: CliqueScorer =
            Box::new(|clique| clique.iter().map(|t| t.candidates[0].confidence).sum());
        let results: Vec<Vec<Tag>> = expander(&tok).expand(tags, Some(scorer)).collect();
        assert_eq!(results[0][0].candidates[0].entity_type, "Location");
    }

    #[test]
    fn test_empty_tags_yield_single_empty_sequence() {
        let tok = EnglishTokenizer::new();
        let results: Vec<Vec<Tag>> = expander(&tok).expand(Vec::new(), None).collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_empty());
    }
}
