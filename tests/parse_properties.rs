//! Property tests for the parse pipeline invariants

use proptest::prelude::*;

use parlance::tagging::EntityTagger;
use parlance::text::trie::TriePayload;
use parlance::{EnglishTokenizer, ParseResult, Parser, Trie};

fn overlapping_vocabulary() -> Trie {
    let mut trie = Trie::new();
    for (key, value, entity_type) in [
        ("new", "new", "Adjective"),
        ("new york", "New York", "City"),
        ("new york city", "New York City", "City"),
        ("york", "york", "Name"),
        ("york city", "York City", "City"),
        ("city", "city", "Concept"),
        ("san", "san", "Name"),
        ("san francisco", "San Francisco", "City"),
    ] {
        trie.insert(key, TriePayload::new(value, entity_type));
    }
    trie
}

proptest! {
    /// Tags inside any single parse result never share a token index.
    #[test]
    fn prop_parse_results_never_overlap(
        words in proptest::collection::vec(
            prop_oneof![
                Just("new"), Just("york"), Just("city"), Just("san"),
                Just("francisco"), Just("the"), Just("in"),
            ],
            0..8,
        )
    ) {
        let trie = overlapping_vocabulary();
        let tokenizer = EnglishTokenizer::new();
        let tagger = EntityTagger::new(&trie, &tokenizer, &[]);
        let parser = Parser::new(&tokenizer, tagger, None);

        let utterance = words.join(" ");
        let results: Vec<ParseResult> = parser.parse(&utterance, 5).collect();
        for result in &results {
            for (i, a) in result.tags.iter().enumerate() {
                for b in &result.tags[i + 1..] {
                    prop_assert!(
                        a.end_token < b.start_token || b.end_token < a.start_token,
                        "overlapping spans {:?} and {:?} in {:?}",
                        (a.start_token, a.end_token),
                        (b.start_token, b.end_token),
                        utterance,
                    );
                }
            }
        }
    }

    /// Tokenization is stable: retokenizing the joined tokens changes nothing.
    #[test]
    fn prop_tokenizer_idempotent(text in "[a-z0-9 ',.?!-]{0,40}") {
        let tokenizer = EnglishTokenizer::new();
        let first = tokenizer.tokenize(&text);
        let second = tokenizer.tokenize(&first.join(" "));
        prop_assert_eq!(first, second);
    }

    /// Registering (value, type) then tagging text starting with the value
    /// yields that candidate at confidence 1.0.
    #[test]
    fn prop_registration_round_trip(value in "[a-z]{1,8}") {
        let mut trie = Trie::new();
        trie.insert(&value, TriePayload::new(value.clone(), "Thing"));
        let tokenizer = EnglishTokenizer::new();
        let tagger = EntityTagger::new(&trie, &tokenizer, &[]);

        for utterance in [value.clone(), format!("{value} please")] {
            let tags = tagger.tag(&utterance);
            let hit = tags.iter().any(|tag| {
                tag.start_token == 0
                    && tag.candidates.iter().any(|c| {
                        c.value == value && c.entity_type == "Thing" && c.confidence == 1.0
                    })
            });
            prop_assert!(hit, "no round-trip tag in {:?}", utterance);
        }
    }
}
