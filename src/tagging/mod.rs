//! Entity tagging: locating vocabulary and regex spans in an utterance

pub mod tagger;

pub use tagger::EntityTagger;
