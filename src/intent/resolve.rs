//! Resolution of tag sequences against intent schemas
//!
//! Resolution never fails with an error: a schema that does not match
//! produces a zero-confidence result, and callers distinguish "no intent"
//! from "error" by confidence and sequence length alone.

use ahash::AHashMap;

use crate::core::types::{ResolvedIntent, Tag};

/// Reserved entity type carrying the addressee of an utterance.
const CLIENT_ENTITY: &str = "Client";

/// Anything able to resolve a tag sequence into a scored intent.
///
/// Registration requires this capability up front, so an object that cannot
/// validate is unrepresentable rather than a runtime configuration error.
pub trait IntentParser {
    fn validate(&self, tags: &[Tag], parse_confidence: f64) -> ResolvedIntent;
}

/// An immutable intent schema; build one with
/// [`IntentBuilder`](crate::intent::builder::IntentBuilder).
#[derive(Debug, Clone)]
pub struct Intent {
    name: String,
    requires: Vec<(String, String)>,
    at_least_one: Vec<Vec<String>>,
    optional: Vec<(String, String)>,
}

impl Intent {
    pub(crate) fn new(
        name: String,
        requires: Vec<(String, String)>,
        at_least_one: Vec<Vec<String>>,
        optional: Vec<(String, String)>,
    ) -> Self {
        Self {
            name,
            requires,
            at_least_one,
            optional,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alternative_group_count(&self) -> usize {
        self.at_least_one.len()
    }

    /// Resolves `tags` into a field map with a coverage-weighted confidence.
    ///
    /// Required slots consume tags from a working copy in declaration order;
    /// alternative groups resolve against the full tag list; optionals are
    /// best-effort. Confidence is the satisfied-slot count over the total tag
    /// count, scaled by the parse confidence.
    pub fn validate(&self, tags: &[Tag], parse_confidence: f64) -> ResolvedIntent {
        let mut result = ResolvedIntent {
            intent_type: self.name.clone(),
            ..Default::default()
        };
        let mut satisfied = 0.0;
        let mut remaining: Vec<&Tag> = tags.iter().collect();

        for (entity_type, field) in &self.requires {
            match find_first_tag(&remaining, entity_type, None) {
                Some((index, value)) => {
                    result.fields.insert(field.clone(), value);
                    remaining.remove(index);
                    satisfied += 1.0;
                }
                None => return result,
            }
        }

        if !self.at_least_one.is_empty() {
            match resolve_one_of(tags, &self.at_least_one) {
                Some(picks) => {
                    satisfied += picks.len() as f64;
                    for (entity_type, value) in picks {
                        result.fields.entry(entity_type).or_insert(value);
                    }
                }
                None => return result,
            }
        }

        for (entity_type, field) in &self.optional {
            if result.fields.contains_key(field) {
                continue;
            }
            if let Some((index, value)) = find_first_tag(&remaining, entity_type, None) {
                result.fields.insert(field.clone(), value);
                remaining.remove(index);
                satisfied += 1.0;
            }
        }

        if !tags.is_empty() {
            result.confidence = satisfied / tags.len() as f64 * parse_confidence;
        }
        result.target =
            find_first_tag(&remaining, CLIENT_ENTITY, None).map(|(_, value)| value);
        result
    }
}

impl IntentParser for Intent {
    fn validate(&self, tags: &[Tag], parse_confidence: f64) -> ResolvedIntent {
        Intent::validate(self, tags, parse_confidence)
    }
}

/// First tag (in tag order) carrying a candidate of `entity_type`, starting
/// strictly after `after` when given. Type comparison is case-insensitive.
fn find_first_tag(
    tags: &[&Tag],
    entity_type: &str,
    after: Option<usize>,
) -> Option<(usize, String)> {
    for (index, tag) in tags.iter().enumerate() {
        if let Some(end) = after {
            if tag.start_token <= end {
                continue;
            }
        }
        for candidate in &tag.candidates {
            if candidate.entity_type.eq_ignore_ascii_case(entity_type) {
                return Some((index, candidate.value.clone()));
            }
        }
    }
    None
}

/// Tries every pick-one-per-group combination in order; the first combination
/// whose every slot resolves wins. Repeated types across groups must consume
/// distinct, later-occurring tags, tracked by the previous match's end token.
fn resolve_one_of(tags: &[Tag], groups: &[Vec<String>]) -> Option<Vec<(String, String)>> {
    if tags.len() < groups.len() {
        return None;
    }
    let refs: Vec<&Tag> = tags.iter().collect();

    for combination in Combinations::over(groups) {
        let mut last_end: AHashMap<&str, usize> = AHashMap::new();
        let mut picks = Vec::with_capacity(combination.len());
        let mut resolved = true;
        for entity_type in combination {
            let after = last_end.get(entity_type).copied();
            match find_first_tag(&refs, entity_type, after) {
                Some((index, value)) => {
                    last_end.insert(entity_type, tags[index].end_token);
                    picks.push((entity_type.to_string(), value));
                }
                None => {
                    resolved = false;
                    break;
                }
            }
        }
        if resolved {
            return Some(picks);
        }
    }
    None
}

/// Pick-one-from-each-group Cartesian product, lazily enumerated.
struct Combinations<'g> {
    groups: &'g [Vec<String>],
    cursor: Vec<usize>,
    done: bool,
}

impl<'g> Combinations<'g> {
    fn over(groups: &'g [Vec<String>]) -> Self {
        Self {
            groups,
            cursor: vec![0; groups.len()],
            done: groups.iter().any(Vec::is_empty),
        }
    }
}

impl<'g> Iterator for Combinations<'g> {
    type Item = Vec<&'g str>;

    fn next(&mut self) -> Option<Vec<&'g str>> {
        if self.done {
            return None;
        }
        let combination = self
            .groups
            .iter()
            .zip(&self.cursor)
            .map(|(group, &i)| group[i].as_str())
            .collect();

        let mut i = self.groups.len();
        loop {
            if i == 0 {
                self.done = true;
                break;
            }
            i -= 1;
            self.cursor[i] += 1;
            if self.cursor[i] < self.groups[i].len() {
                break;
            }
            self.cursor[i] = 0;
        }
        Some(combination)
    }
}
