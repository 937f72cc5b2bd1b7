//! Metrics export.
//!
//! Run totals can be pushed to a Prometheus Push Gateway after each run.
//!
//! # Submodules
//!
//! - `prom` - Prometheus metrics integration

pub mod prom;
