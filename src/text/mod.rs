//! Text tooling: tokenization and the fuzzy lexicon trie

pub mod tokenizer;
pub mod trie;

pub use tokenizer::EnglishTokenizer;
pub use trie::{Trie, TrieMatch, TriePayload};
