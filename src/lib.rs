//! Scheduled TLS certificate expiry checks with chat notifications.
//!
//! A run loads the site configuration, reads the expiry date of every
//! configured host's certificate (plus the manually tracked "special"
//! certificates), and sends at most one digest of certificates expiring
//! within the threshold and one digest of hosts that could not be checked.
//!
//! ```no_run
//! use certwatch::{run, Dispatcher, Evaluator, OpensslSource, SiteConfig, SystemClock};
//! # use certwatch::{Message, Notifier, DeliveryError};
//! # struct Stdout;
//! # impl Notifier for Stdout {
//! #     fn send(&self, _: &str, m: &Message) -> Result<(), DeliveryError> {
//! #         println!("{}", m.text);
//! #         Ok(())
//! #     }
//! # }
//! let sites = SiteConfig::from_file("sites.json")?;
//! let source = OpensslSource::new(std::time::Duration::from_secs(10))?;
//! let evaluator = Evaluator::new(30, &source, &SystemClock);
//! let dispatcher = Dispatcher::new(&Stdout, "C0123", 30, "https://wiki.example.com/ssl");
//! let summary = run(&sites, &evaluator, &dispatcher);
//! println!("{} expiring", summary.expiring.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod certificate;
pub mod clock;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod logging;
pub mod metrics;
pub mod notify;
pub mod report;
pub mod run;

pub use certificate::{CertificateSource, OpensslSource};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, RunConfig, Settings, SiteConfig, SpecialEntry};
pub use error::{DeliveryError, HostEvaluationError};
pub use evaluator::{EvaluationResult, Evaluator};
pub use notify::{Dispatcher, Message, Notifier};
pub use run::{run, ErroredEntry, ExpiringEntry, RunSummary};
