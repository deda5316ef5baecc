//! Overlap resolution: islands, compatibility graphs, cliques, and the lattice
//!
//! Tag overlap is resolved per "ambiguity island": vertices are (tag,
//! candidate) pairs, edges connect non-overlapping spans, and each maximal
//! clique is one valid disambiguation. Islands recombine through a lazy
//! Cartesian-product lattice traversal.

pub mod expander;
pub mod graph;
pub mod lattice;

pub use expander::CliqueExpander;
pub use lattice::{CliqueScorer, Traversal};
