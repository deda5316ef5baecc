//! Multi-domain routing over isolated engines
//!
//! Domains never share vocabulary, patterns, or schemas: each name owns a
//! whole [`IntentEngine`], created on first reference.

use std::cmp::Ordering;

use crate::core::error::Result;
use crate::core::types::ResolvedIntent;
use crate::engine::engine::IntentEngine;
use crate::intent::resolve::IntentParser;

/// Holds named, independent engines and merges their best guesses.
#[derive(Default)]
pub struct DomainRouter {
    // Vec keeps encounter order, which breaks confidence ties.
    domains: Vec<(String, IntentEngine)>,
}

impl DomainRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the named domain if absent and returns its engine.
    pub fn register_domain(&mut self, domain: &str) -> &mut IntentEngine {
        if let Some(index) = self.domains.iter().position(|(name, _)| name == domain) {
            return &mut self.domains[index].1;
        }
        self.domains.push((domain.to_string(), IntentEngine::new()));
        tracing::debug!(domain, "registered domain");
        &mut self.domains.last_mut().expect("just pushed").1
    }

    pub fn domain(&self, domain: &str) -> Option<&IntentEngine> {
        self.domains
            .iter()
            .find(|(name, _)| name == domain)
            .map(|(_, engine)| engine)
    }

    pub fn register_entity(
        &mut self,
        domain: &str,
        value: &str,
        entity_type: &str,
        alias_of: Option<&str>,
    ) {
        self.register_domain(domain)
            .register_entity(value, entity_type, alias_of);
    }

    pub fn register_regex_entity(&mut self, domain: &str, pattern: &str) -> Result<()> {
        self.register_domain(domain).register_regex_entity(pattern)
    }

    pub fn register_intent_parser(
        &mut self,
        domain: &str,
        parser: impl IntentParser + 'static,
    ) {
        self.register_domain(domain).register_intent_parser(parser);
    }

    /// Runs every domain's single best guess independently and returns the
    /// top `num_results` by confidence, ties broken by encounter order.
    pub fn determine_intent(
        &self,
        utterance: &str,
        num_results: usize,
    ) -> impl Iterator<Item = ResolvedIntent> + '_ {
        let mut winners: Vec<ResolvedIntent> = self
            .domains
            .iter()
            .filter_map(|(_, engine)| engine.determine_intent(utterance, 1).next())
            .collect();
        // Stable sort: equal confidences stay in domain encounter order.
        winners.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });
        winners.into_iter().take(num_results)
    }
}
