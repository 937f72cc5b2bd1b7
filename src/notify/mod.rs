//! Chat notifications.
//!
//! A run sends at most one expiry digest and one error digest, plus an
//! immediate plain notice for each host whose certificate carries no expiry
//! date. Delivery failures are logged and never abort the run.
//!
//! # Submodules
//!
//! - `digest` - message builders
//! - `slack` - Slack Web API transport

pub mod digest;
pub mod slack;

use crate::error::DeliveryError;
use crate::run::RunSummary;
use serde_json::Value;
use tracing::{error, info};

/// A chat message: fallback text plus structured block content.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub text: String,
    pub blocks: Vec<Value>,
}

/// Message delivery seam.
pub trait Notifier {
    fn send(&self, channel: &str, message: &Message) -> Result<(), DeliveryError>;
}

/// Sends digests to one channel, swallowing and logging delivery failures.
pub struct Dispatcher<'a> {
    notifier: &'a dyn Notifier,
    channel: &'a str,
    threshold: i64,
    docs_url: &'a str,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        notifier: &'a dyn Notifier,
        channel: &'a str,
        threshold: i64,
        docs_url: &'a str,
    ) -> Self {
        Dispatcher {
            notifier,
            channel,
            threshold,
            docs_url,
        }
    }

    /// Returns whether the message was delivered.
    pub fn send(&self, message: &Message) -> bool {
        match self.notifier.send(self.channel, message) {
            Ok(()) => {
                info!(channel = self.channel, "sent \"{}\"", message.text);
                true
            }
            Err(e) => {
                error!("{}", e);
                false
            }
        }
    }

    /// Sends the expiry digest and then the error digest, skipping whichever
    /// is empty.
    pub fn dispatch(&self, summary: &RunSummary) {
        if !summary.expiring.is_empty() {
            self.send(&digest::expiry_digest(
                &summary.expiring,
                self.threshold,
                self.docs_url,
            ));
        }

        if !summary.errored.is_empty() {
            self.send(&digest::error_digest(&summary.errored));
        }
    }
}
