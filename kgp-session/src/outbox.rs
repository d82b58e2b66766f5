use kgp_codec::{Command, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::UnboundedSender;

/// The session-wide outbound id counter and the single FIFO queue every
/// worker and the dispatcher itself funnel outbound commands through
/// (§3 "Outbound id counter", §4.3 "Send serialisation").
///
/// Cloned freely — every clone shares the same counter and the same
/// queue, the way the teacher's `UnboundedSender<Event>` is cloned into
/// every `Actor`. `fetch_add` gives atomic, linearisable id allocation
/// without a lock, satisfying "increments must be atomic with respect
/// to concurrent senders".
#[derive(Clone)]
pub struct Outbox {
    tx: UnboundedSender<Command>,
    next_id: std::sync::Arc<AtomicU64>,
}

impl Outbox {
    pub(crate) fn new(tx: UnboundedSender<Command>) -> Self {
        Outbox {
            tx,
            next_id: std::sync::Arc::new(AtomicU64::new(1)),
        }
    }

    /// Allocate the next outbound id and enqueue a command. `reference`
    /// is the request id being replied to, if any (§9 open question 3:
    /// `Some(0)` is treated the same as `None` by [`Command`]'s own
    /// `Display`).
    pub fn send(&self, reference: Option<u64>, name: &str, args: Vec<Value>) {
        let id = self.next_id.fetch_add(2, Ordering::SeqCst);
        let cmd = Command::outbound(id, reference, name, args);
        // The dispatcher/worker side of the channel outliving the
        // sender task only happens during shutdown; a failed send here
        // just means the line will never reach a peer that's already
        // gone.
        let _ = self.tx.send(cmd);
    }
}
