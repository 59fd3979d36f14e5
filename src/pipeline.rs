use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::eligibility::{packs_for, Classifier, Postcode, RuleSet};
use crate::listings::{ListingSource, PoaAggregator, PoaResult, RecencyFilter};
use crate::report::JobsArtifact;

/// Runs the per-POA classify, query, filter, aggregate loop against a
/// listing source. Postal areas are processed to completion one at a
/// time, in ascending postcode order.
pub struct JobsPipeline<S> {
    classifier: Classifier,
    recency: RecencyFilter,
    source: Arc<S>,
}

impl<S> JobsPipeline<S>
where
    S: ListingSource + 'static,
{
    pub fn new(rules: RuleSet, source: Arc<S>, window_days: u32) -> Self {
        Self {
            classifier: Classifier::new(rules),
            recency: RecencyFilter::new(window_days),
            source,
        }
    }

    /// Postal areas the run will cover: every postcode the rules
    /// enumerate, optionally narrowed by an allowlist. An allowlist that
    /// shares nothing with the rule-derived candidates is taken verbatim
    /// so hand-picked areas can still be monitored.
    pub fn poa_run_list(&self, allowlist: &[Postcode]) -> Vec<Postcode> {
        let candidates = self.classifier.rules().candidate_postcodes();
        if allowlist.is_empty() {
            return candidates.into_iter().collect();
        }

        let wanted: BTreeSet<&Postcode> = allowlist.iter().collect();
        let narrowed: Vec<Postcode> = candidates
            .iter()
            .filter(|postcode| wanted.contains(postcode))
            .cloned()
            .collect();
        if narrowed.is_empty() {
            wanted.into_iter().cloned().collect()
        } else {
            narrowed
        }
    }

    pub async fn run(&self, allowlist: &[Postcode]) -> JobsArtifact {
        let poas = self.poa_run_list(allowlist);
        info!(
            poas = poas.len(),
            window_days = self.recency.window_days(),
            "starting eligibility run"
        );

        let mut artifact =
            JobsArtifact::empty(self.recency.window_days(), self.source.source_name());
        for poa in poas {
            let result = self.process_poa(&poa).await;
            debug!(%poa, count = result.count, "postal area complete");
            artifact.insert(poa, result);
        }
        info!(jobs = artifact.total_jobs(), "eligibility run complete");
        artifact
    }

    async fn process_poa(&self, poa: &Postcode) -> PoaResult {
        let tiers = self.classifier.tiers(poa);
        let packs = packs_for(&tiers);
        if packs.is_empty() {
            debug!(%poa, "no eligible tier, recording empty result");
            return PoaResult::empty();
        }

        let mut aggregator = PoaAggregator::new();
        for pack in packs {
            // A failed query is an empty query; the rest of the run
            // continues.
            let listings = match self.source.fetch_listings(poa, pack).await {
                Ok(listings) => listings,
                Err(err) => {
                    warn!(%poa, pack = pack.label(), error = %err, "listing fetch failed");
                    Vec::new()
                }
            };
            for raw in &listings {
                if !self.recency.within_window(&raw.body_text) {
                    continue;
                }
                aggregator.offer(raw);
            }
        }
        aggregator.finish()
    }
}
