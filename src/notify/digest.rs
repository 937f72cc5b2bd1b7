//! Builders for the messages a run can send, in Slack block-kit `mrkdwn`.

use super::Message;
use crate::run::{ErroredEntry, ExpiringEntry};
use serde_json::{json, Value};
use tracing::error;

fn section(text: &str) -> Value {
    json!({
        "type": "section",
        "text": {
            "type": "mrkdwn",
            "text": text
        }
    })
}

fn divider() -> Value {
    json!({ "type": "divider" })
}

fn site_link(identifier: &str) -> String {
    format!("*<https://{0}|{0}>*", identifier)
}

/// Lists every certificate below the threshold, closed by a link to the
/// certificate overview page.
pub fn expiry_digest(entries: &[ExpiringEntry], threshold: i64, docs_url: &str) -> Message {
    let mut blocks = vec![
        section(&format!(
            ":bell: *Website certificates to expire* :bell:\n\nGoodmorning, here is a list of \
             the certificates which are going to expire within {} days.",
            threshold
        )),
        divider(),
    ];

    blocks.extend(entries.iter().map(|entry| {
        section(&format!(
            "{}\nGoing to expire in *{}* days!",
            site_link(&entry.identifier),
            entry.days_remaining
        ))
    }));

    blocks.push(divider());
    blocks.push(section(&format!(
        "See the following Confluence page for a detailed overview for all certificates\n\
         *<{}|Confluence | SSL Certificaten>* ",
        docs_url
    )));

    Message {
        text: "Expiry list".to_string(),
        blocks,
    }
}

/// Lists every failed evaluation. Each failure is also logged at error level
/// while the digest is built.
pub fn error_digest(entries: &[ErroredEntry]) -> Message {
    let mut blocks = vec![
        section(
            ":x: *Website certificates errors* :x:\n\nGoodmorning, here is a list of the \
             certificates for which errors occurred.",
        ),
        divider(),
    ];

    for entry in entries {
        blocks.push(section(&format!(
            "{}\nError: *{}*",
            site_link(&entry.identifier),
            entry.cause
        )));
        error!("{} - {}", entry.identifier, entry.cause);
    }

    Message {
        text: "Error list".to_string(),
        blocks,
    }
}

/// A single text block without any list structure.
pub fn plain(text: &str) -> Message {
    Message {
        text: text.to_string(),
        blocks: vec![section(text)],
    }
}

/// Sent immediately when a host's certificate has no expiry date.
pub fn missing_expiry_notice(hostname: &str) -> Message {
    plain(&format!(
        ":x: Certificate doesn't contain an expiry date for website: <https://{0}|{0}> :x:",
        hostname
    ))
}
