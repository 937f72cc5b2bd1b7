use crate::run::RunSummary;
use lazy_static::lazy_static;
use prometheus::{labels, register_gauge, Gauge};

lazy_static! {
    static ref CERTWATCH_CHECKED_ENTRIES: Gauge = register_gauge!(
        "certwatch_checked_entries",
        "certificates evaluated in the last run"
    )
    .unwrap();
    static ref CERTWATCH_EXPIRING_ENTRIES: Gauge = register_gauge!(
        "certwatch_expiring_entries",
        "certificates expiring within the threshold"
    )
    .unwrap();
    static ref CERTWATCH_ERRORED_ENTRIES: Gauge = register_gauge!(
        "certwatch_errored_entries",
        "certificates that could not be evaluated"
    )
    .unwrap();
}

/// Pushes the totals of a run to the gateway at `prometheus_address`.
pub fn push_run_totals(
    summary: &RunSummary,
    prometheus_address: &str,
) -> Result<(), prometheus::Error> {
    CERTWATCH_CHECKED_ENTRIES.set(summary.total() as f64);
    CERTWATCH_EXPIRING_ENTRIES.set(summary.expiring.len() as f64);
    CERTWATCH_ERRORED_ENTRIES.set(summary.errored.len() as f64);

    prometheus::push_metrics(
        "certwatch",
        labels! {
            "instance".to_owned() => "certwatch".to_owned(),
        },
        prometheus_address,
        prometheus::gather(),
        None,
    )
}
