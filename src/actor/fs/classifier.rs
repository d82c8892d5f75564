//! Reload Classification
//!
//! Pure functions deciding whether a closed change batch can be hot-injected
//! or must force a full page reload. No timing, no channel access; the result
//! depends only on the batch's served paths and the configured suffix set.

use crate::protocol::ServedFile;

/// Outcome of classifying one change batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadDecision {
    /// Every change is a live-patchable asset; clients are not contacted.
    Inject,
    /// At least one change is not injectable; every client must reload.
    Reload,
}

/// Classifies closed batches into reload decisions.
pub(super) struct ReloadClassifier;

impl ReloadClassifier {
    /// Full pipeline: strip source maps, then decide.
    ///
    /// Returns the decision together with the surviving items, or `None` when
    /// source-map filtering emptied the batch (no decision is produced).
    pub(super) fn classify(
        batch: Vec<ServedFile>,
        inject: &[String],
    ) -> Option<(ReloadDecision, Vec<ServedFile>)> {
        let batch = Self::strip_source_maps(batch);
        if batch.is_empty() {
            return None;
        }
        let decision = Self::decide(&batch, inject);
        Some((decision, batch))
    }

    /// Drop `.map` files before classification; source maps track their parent
    /// asset and must never influence the decision.
    fn strip_source_maps(batch: Vec<ServedFile>) -> Vec<ServedFile> {
        batch
            .into_iter()
            .filter(|item| !item.served_path().ends_with(".map"))
            .collect()
    }

    /// All-or-nothing rule: `Inject` iff every served path matches at least
    /// one injectable suffix. A single non-matching change forces `Reload`
    /// for the whole batch.
    fn decide(batch: &[ServedFile], inject: &[String]) -> ReloadDecision {
        debug_assert!(!batch.is_empty(), "classifier invoked on empty batch");

        let all_injectable = batch
            .iter()
            .all(|item| Self::is_injectable(item, inject));

        if all_injectable {
            ReloadDecision::Inject
        } else {
            ReloadDecision::Reload
        }
    }

    /// Match the served path (never the filesystem path) against the suffix
    /// set, so match rules stay independent of on-disk layout.
    fn is_injectable(item: &ServedFile, inject: &[String]) -> bool {
        let served = item.served_path();
        inject.iter().any(|suffix| served.ends_with(suffix.as_str()))
    }
}
