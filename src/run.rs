//! A single batch run: evaluate every configured entry in order, then send
//! the digests.

use crate::config::SiteConfig;
use crate::error::HostEvaluationError;
use crate::evaluator::{EvaluationResult, Evaluator};
use crate::notify::{digest, Dispatcher};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiringEntry {
    pub identifier: String,
    pub days_remaining: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErroredEntry {
    pub identifier: String,
    pub cause: String,
}

/// Findings of one run, in configuration order. Healthy entries are only
/// counted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub expiring: Vec<ExpiringEntry>,
    pub errored: Vec<ErroredEntry>,
    pub healthy: usize,
}

impl RunSummary {
    pub fn record(&mut self, result: EvaluationResult) {
        match result {
            EvaluationResult::Expiring {
                identifier,
                days_remaining,
            } => self.expiring.push(ExpiringEntry {
                identifier,
                days_remaining,
            }),
            EvaluationResult::Healthy { .. } => self.healthy += 1,
            EvaluationResult::Errored { identifier, cause } => self.errored.push(ErroredEntry {
                identifier,
                cause: cause.to_string(),
            }),
        }
    }

    /// Number of results recorded.
    pub fn total(&self) -> usize {
        self.expiring.len() + self.errored.len() + self.healthy
    }
}

/// Evaluates all plain hosts, then all special entries, then dispatches the
/// digests.
pub fn run(sites: &SiteConfig, evaluator: &Evaluator, dispatcher: &Dispatcher) -> RunSummary {
    info!(
        hosts = sites.sites.len(),
        special = sites.special.len(),
        threshold = evaluator.threshold(),
        "starting certificate check"
    );

    let mut summary = RunSummary::default();

    for hostname in &sites.sites {
        let result = evaluator.evaluate_host(hostname);
        if let EvaluationResult::Errored {
            cause: HostEvaluationError::MissingExpiry,
            ..
        } = result
        {
            dispatcher.send(&digest::missing_expiry_notice(hostname));
        }
        summary.record(result);
    }

    for entry in &sites.special {
        summary.record(evaluator.evaluate_special(&entry.label, &entry.expiry_date));
    }

    dispatcher.dispatch(&summary);

    info!(
        checked = summary.total(),
        expiring = summary.expiring.len(),
        errored = summary.errored.len(),
        healthy = summary.healthy,
        "certificate check finished"
    );
    summary
}
