//! Declarative intent schemas: builder and tag-sequence resolution

pub mod builder;
pub mod resolve;

pub use builder::IntentBuilder;
pub use resolve::{Intent, IntentParser};
