//! Classification of hosts and manually tracked certificates by expiry.

use crate::certificate::{parse_not_after, CertificateSource};
use crate::clock::Clock;
use crate::error::HostEvaluationError;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::debug;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Date format of manually tracked expiry dates, e.g. `31-12-2025`.
pub const SPECIAL_DATE_FORMAT: &str = "%d-%m-%Y";

/// Outcome of evaluating one configured entry. Every host and every special
/// entry yields exactly one of these.
#[derive(Debug)]
pub enum EvaluationResult {
    Expiring {
        identifier: String,
        days_remaining: i64,
    },
    Healthy {
        identifier: String,
        days_remaining: i64,
    },
    Errored {
        identifier: String,
        cause: HostEvaluationError,
    },
}

pub struct Evaluator<'a> {
    threshold: i64,
    source: &'a dyn CertificateSource,
    clock: &'a dyn Clock,
}

impl<'a> Evaluator<'a> {
    pub fn new(threshold: i64, source: &'a dyn CertificateSource, clock: &'a dyn Clock) -> Self {
        Evaluator {
            threshold,
            source,
            clock,
        }
    }

    pub fn threshold(&self) -> i64 {
        self.threshold
    }

    /// Reads the live certificate of `hostname` and classifies it. Network,
    /// handshake and parse failures become [`EvaluationResult::Errored`].
    pub fn evaluate_host(&self, hostname: &str) -> EvaluationResult {
        let result = match self.host_expiry(hostname) {
            Ok(expiry) => self.classify(hostname, expiry),
            Err(cause) => EvaluationResult::Errored {
                identifier: hostname.to_string(),
                cause,
            },
        };
        debug!(host = hostname, result = ?result, "evaluated host");
        result
    }

    /// Classifies a manually tracked certificate by its configured
    /// `DD-MM-YYYY` expiry date. No network I/O.
    pub fn evaluate_special(&self, label: &str, date: &str) -> EvaluationResult {
        let result = match NaiveDate::parse_from_str(date.trim(), SPECIAL_DATE_FORMAT) {
            Ok(expiry) => self.classify(label, expiry),
            Err(_) => EvaluationResult::Errored {
                identifier: label.to_string(),
                cause: HostEvaluationError::InvalidDate {
                    value: date.to_string(),
                },
            },
        };
        debug!(label, result = ?result, "evaluated special entry");
        result
    }

    fn host_expiry(&self, hostname: &str) -> Result<NaiveDate, HostEvaluationError> {
        match self.source.not_after(hostname)? {
            Some(value) if !value.trim().is_empty() => parse_not_after(&value),
            _ => Err(HostEvaluationError::MissingExpiry),
        }
    }

    fn classify(&self, identifier: &str, expiry: NaiveDate) -> EvaluationResult {
        let remaining = days_until(expiry, self.clock.now());
        let days_remaining = remaining.round() as i64;
        // The threshold is compared before rounding.
        if remaining < self.threshold as f64 {
            EvaluationResult::Expiring {
                identifier: identifier.to_string(),
                days_remaining,
            }
        } else {
            EvaluationResult::Healthy {
                identifier: identifier.to_string(),
                days_remaining,
            }
        }
    }
}

/// Fractional days from `now` until midnight UTC of `expiry`.
pub fn days_until(expiry: NaiveDate, now: DateTime<Utc>) -> f64 {
    let expiry = expiry.and_time(NaiveTime::MIN).and_utc();
    (expiry - now).num_milliseconds() as f64 / MILLIS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::TimeZone;
    use std::collections::HashMap;

    struct StaticSource(HashMap<&'static str, Option<&'static str>>);

    impl CertificateSource for StaticSource {
        fn not_after(&self, hostname: &str) -> Result<Option<String>, HostEvaluationError> {
            match self.0.get(hostname) {
                Some(value) => Ok(value.map(String::from)),
                None => Err(HostEvaluationError::HandshakeFailed {
                    details: "unknown host".to_string(),
                }),
            }
        }
    }

    fn new_year() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    fn source() -> StaticSource {
        let mut certs = HashMap::new();
        certs.insert("soon.example", Some("Jan 11 15:00:00 2024 GMT"));
        certs.insert("later.example", Some("Feb  4 00:00:00 2025 GMT"));
        certs.insert("bare.example", None);
        certs.insert("garbled.example", Some("yesterday-ish"));
        StaticSource(certs)
    }

    #[test]
    fn test_host_expiring_within_threshold() {
        let (source, clock) = (source(), new_year());
        let evaluator = Evaluator::new(30, &source, &clock);

        match evaluator.evaluate_host("soon.example") {
            EvaluationResult::Expiring {
                identifier,
                days_remaining,
            } => {
                assert_eq!(identifier, "soon.example");
                assert_eq!(days_remaining, 10);
            }
            other => panic!("expected Expiring, got {:?}", other),
        }
    }

    #[test]
    fn test_host_far_from_expiry_is_healthy() {
        let (source, clock) = (source(), new_year());
        let evaluator = Evaluator::new(30, &source, &clock);

        match evaluator.evaluate_host("later.example") {
            EvaluationResult::Healthy { days_remaining, .. } => assert_eq!(days_remaining, 400),
            other => panic!("expected Healthy, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_and_garbled_expiry_are_errors() {
        let (source, clock) = (source(), new_year());
        let evaluator = Evaluator::new(30, &source, &clock);

        assert!(matches!(
            evaluator.evaluate_host("bare.example"),
            EvaluationResult::Errored {
                cause: HostEvaluationError::MissingExpiry,
                ..
            }
        ));
        assert!(matches!(
            evaluator.evaluate_host("garbled.example"),
            EvaluationResult::Errored {
                cause: HostEvaluationError::InvalidExpiry { .. },
                ..
            }
        ));
        assert!(matches!(
            evaluator.evaluate_host("unknown.example"),
            EvaluationResult::Errored {
                cause: HostEvaluationError::HandshakeFailed { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_special_entry() {
        let (source, clock) = (source(), new_year());
        let evaluator = Evaluator::new(30, &source, &clock);

        match evaluator.evaluate_special("VPN gateway", "16-01-2024") {
            EvaluationResult::Expiring {
                identifier,
                days_remaining,
            } => {
                assert_eq!(identifier, "VPN gateway");
                assert_eq!(days_remaining, 15);
            }
            other => panic!("expected Expiring, got {:?}", other),
        }
        assert!(matches!(
            evaluator.evaluate_special("VPN gateway", "2024-01-16"),
            EvaluationResult::Errored {
                cause: HostEvaluationError::InvalidDate { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_threshold_compares_unrounded_days() {
        // 29.5 days left rounds to 30 for display but is still below 30.
        let source = source();
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());
        let evaluator = Evaluator::new(30, &source, &clock);

        match evaluator.evaluate_special("edge", "31-01-2024") {
            EvaluationResult::Expiring { days_remaining, .. } => assert_eq!(days_remaining, 30),
            other => panic!("expected Expiring, got {:?}", other),
        }
    }

    #[test]
    fn test_already_expired_is_negative() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2023, 12, 29).unwrap();
        assert_eq!(days_until(expiry, now), -3.0);
    }
}
