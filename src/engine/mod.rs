//! Engine surface: registration plus intent determination, per domain

pub mod engine;
pub mod router;

pub use engine::IntentEngine;
pub use router::DomainRouter;
