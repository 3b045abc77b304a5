//! Advisory text inbox.
//!
//! Threat-summary and intercept-plan text is produced outside the tick (a
//! network fetch, a planning backend) and must never block motion updates.
//! Senders push whenever their request resolves; the engine drains whatever
//! has arrived at the top of each tick and keeps only the newest text.
//! Last writer wins — stale or out-of-order deliveries are accepted, and a
//! failed fetch is delivered as a user-visible placeholder rather than an
//! error.

use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

/// Create a connected sender/inbox pair. Hand the inbox to the engine and
/// clone the sender into whatever produces advisory text.
pub fn advisory_channel() -> (AdvisorySender, AdvisoryInbox) {
    let (tx, rx) = channel();
    (AdvisorySender { tx }, AdvisoryInbox { rx })
}

/// Producer side of the advisory channel.
#[derive(Clone)]
pub struct AdvisorySender {
    tx: Sender<String>,
}

impl AdvisorySender {
    /// Deliver advisory text. A closed inbox just drops the text.
    pub fn deliver(&self, text: impl Into<String>) {
        let _ = self.tx.send(text.into());
    }

    /// Deliver the placeholder shown when an advisory fetch fails.
    pub fn deliver_unavailable(&self, reason: &str) {
        self.deliver(format!("(advisory unavailable: {reason})"));
    }
}

/// Consumer side, owned by the engine.
pub struct AdvisoryInbox {
    rx: Receiver<String>,
}

impl AdvisoryInbox {
    /// Non-blocking drain: the newest delivered text, or `None` if nothing
    /// arrived since the last poll.
    pub fn poll(&self) -> Option<String> {
        let mut latest = None;
        loop {
            match self.rx.try_recv() {
                Ok(text) => latest = Some(text),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        latest
    }
}
