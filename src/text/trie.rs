//! Character trie with exact and bounded-edit-distance lookup
//!
//! Keys are stored as registered (callers normalize to lowercase for
//! matching); payloads carry the original-case canonical value so output
//! never loses casing.

use ahash::AHashMap;

/// Registered vocabulary payload: canonical value plus its entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriePayload {
    pub value: String,
    pub entity_type: String,
}

impl TriePayload {
    pub fn new(value: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            entity_type: entity_type.into(),
        }
    }
}

/// A terminal reached during lookup.
#[derive(Debug, Clone)]
pub struct TrieMatch {
    /// The registered key that terminated here.
    pub key: String,
    /// The prefix of the query text consumed to reach the terminal.
    pub matched: String,
    pub payloads: Vec<TriePayload>,
    /// `(key_len - edits) / max(key_len, consumed_len)`, in (0, 1].
    pub confidence: f64,
}

#[derive(Debug, Default)]
struct TrieNode {
    key: Option<String>,
    is_terminal: bool,
    payloads: Vec<TriePayload>,
    children: AHashMap<char, TrieNode>,
}

impl TrieNode {
    fn insert(&mut self, key: &str, chars: &[char], index: usize, payload: TriePayload) {
        if index == chars.len() {
            self.is_terminal = true;
            self.key = Some(key.to_string());
            if !self.payloads.contains(&payload) {
                self.payloads.push(payload);
            }
        } else {
            self.children
                .entry(chars[index])
                .or_default()
                .insert(key, chars, index + 1, payload);
        }
    }

    fn remove(&mut self, chars: &[char], index: usize, payload: Option<&TriePayload>) -> bool {
        if index == chars.len() {
            if !self.is_terminal {
                return false;
            }
            match payload {
                Some(p) => {
                    self.payloads.retain(|existing| existing != p);
                    if self.payloads.is_empty() {
                        self.is_terminal = false;
                    }
                }
                None => {
                    self.payloads.clear();
                    self.is_terminal = false;
                }
            }
            true
        } else if let Some(child) = self.children.get_mut(&chars[index]) {
            child.remove(chars, index + 1, payload)
        } else {
            false
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn lookup(
        &self,
        text: &[char],
        index: usize,
        gather: bool,
        edits: usize,
        max_edits: usize,
        threshold: f64,
        out: &mut Vec<TrieMatch>,
    ) {
        if self.is_terminal {
            // Exact mode only accepts end-of-text; gather mode also accepts a
            // word boundary, so "cat" never matches inside "category".
            let at_end = index == text.len();
            let at_boundary = gather && index < text.len() && text[index] == ' ';
            if at_end || at_boundary {
                if let Some(key) = &self.key {
                    let key_len = key.chars().count();
                    let confidence =
                        (key_len as f64 - edits as f64) / key_len.max(index) as f64;
                    if confidence > threshold {
                        out.push(TrieMatch {
                            key: key.clone(),
                            matched: text[..index].iter().collect(),
                            payloads: self.payloads.clone(),
                            confidence,
                        });
                    }
                }
            }
        }

        if index < text.len() {
            if let Some(child) = self.children.get(&text[index]) {
                child.lookup(text, index + 1, gather, edits, max_edits, threshold, out);
            }
        }

        if edits < max_edits {
            for (ch, child) in &self.children {
                if index >= text.len() || *ch != text[index] {
                    // substitution
                    child.lookup(text, index + 1, gather, edits + 1, max_edits, threshold, out);
                    // deletion
                    child.lookup(text, index + 2, gather, edits + 1, max_edits, threshold, out);
                    // insertion
                    child.lookup(text, index, gather, edits + 1, max_edits, threshold, out);
                }
            }
        }
    }
}

/// Character-keyed lexicon with exact and fuzzy lookup.
///
/// The default configuration matches exactly (zero edit budget); callers that
/// need typo tolerance construct with [`Trie::with_tolerance`].
#[derive(Debug, Default)]
pub struct Trie {
    root: TrieNode,
    max_edit_distance: usize,
    match_threshold: f64,
}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(max_edit_distance: usize, match_threshold: f64) -> Self {
        Self {
            root: TrieNode::default(),
            max_edit_distance,
            match_threshold,
        }
    }

    /// Adds `payload` to the terminal at `key`, creating the path if absent.
    /// Duplicate payloads at one terminal are deduplicated.
    pub fn insert(&mut self, key: &str, payload: TriePayload) {
        let chars: Vec<char> = key.chars().collect();
        self.root.insert(key, &chars, 0, payload);
    }

    /// Removes one payload (or all, when `payload` is `None`) at `key`,
    /// demoting the terminal if nothing remains. Returns `false` when the
    /// key path does not exist or is not a terminal.
    pub fn remove(&mut self, key: &str, payload: Option<&TriePayload>) -> bool {
        let chars: Vec<char> = key.chars().collect();
        self.root.remove(&chars, 0, payload)
    }

    /// Lookup in gather mode from position 0: every reachable terminal ending
    /// at a word boundary is returned, not just the longest.
    pub fn gather(&self, text: &str) -> Vec<TrieMatch> {
        self.lookup(text, true)
    }

    pub fn lookup(&self, text: &str, gather: bool) -> Vec<TrieMatch> {
        let chars: Vec<char> = text.chars().collect();
        let mut out = Vec::new();
        self.root.lookup(
            &chars,
            0,
            gather,
            0,
            self.max_edit_distance,
            self.match_threshold,
            &mut out,
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(value: &str, entity_type: &str) -> TriePayload {
        TriePayload::new(value, entity_type)
    }

    #[test]
    fn test_exact_lookup_full_confidence() {
        let mut trie = Trie::new();
        trie.insert("restaurant", payload("Restaurant", "Concept"));
        let hits = trie.lookup("restaurant", false);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].confidence, 1.0);
        assert_eq!(hits[0].payloads[0].value, "Restaurant");
    }

    #[test]
    fn test_exact_mode_rejects_prefix() {
        let mut trie = Trie::new();
        trie.insert("cat", payload("cat", "Animal"));
        assert!(trie.lookup("category", false).is_empty());
    }

    #[test]
    fn test_gather_stops_at_word_boundary() {
        let mut trie = Trie::new();
        trie.insert("cat", payload("cat", "Animal"));
        // "cat" followed by a space is a word break; inside "category" it is not.
        assert_eq!(trie.gather("cat videos").len(), 1);
        assert!(trie.gather("category").is_empty());
    }

    #[test]
    fn test_gather_yields_every_length() {
        let mut trie = Trie::new();
        trie.insert("daft", payload("daft", "Word"));
        trie.insert("daft punk", payload("Daft Punk", "Artist"));
        let hits = trie.gather("daft punk tonight");
        let keys: Vec<&str> = hits.iter().map(|h| h.key.as_str()).collect();
        assert!(keys.contains(&"daft"));
        assert!(keys.contains(&"daft punk"));
    }

    #[test]
    fn test_payload_dedup() {
        let mut trie = Trie::new();
        trie.insert("sun", payload("sun", "WeatherType"));
        trie.insert("sun", payload("sun", "WeatherType"));
        trie.insert("sun", payload("sun", "Concept"));
        let hits = trie.lookup("sun", false);
        assert_eq!(hits[0].payloads.len(), 2);
    }

    #[test]
    fn test_remove_single_payload_keeps_terminal() {
        let mut trie = Trie::new();
        trie.insert("sun", payload("sun", "WeatherType"));
        trie.insert("sun", payload("sun", "Concept"));
        assert!(trie.remove("sun", Some(&payload("sun", "WeatherType"))));
        let hits = trie.lookup("sun", false);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].payloads, vec![payload("sun", "Concept")]);
    }

    #[test]
    fn test_remove_demotes_empty_terminal() {
        let mut trie = Trie::new();
        trie.insert("sun", payload("sun", "WeatherType"));
        assert!(trie.remove("sun", None));
        assert!(trie.lookup("sun", false).is_empty());
    }

    #[test]
    fn test_remove_missing_key_is_silent() {
        let mut trie = Trie::new();
        assert!(!trie.remove("ghost", None));
    }

    #[test]
    fn test_fuzzy_substitution() {
        let mut trie = Trie::with_tolerance(1, 0.5);
        trie.insert("weather", payload("weather", "Keyword"));
        let hits = trie.lookup("wezther", false);
        assert_eq!(hits.len(), 1);
        // One edit against a 7-char key over 7 consumed chars.
        assert!((hits[0].confidence - 6.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_fuzzy_threshold_filters() {
        let mut trie = Trie::with_tolerance(2, 0.9);
        trie.insert("rain", payload("rain", "WeatherType"));
        assert!(trie.lookup("ruin", false).is_empty());
    }
}
