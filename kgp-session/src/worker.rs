use crate::agent::Agent;
use crate::outbox::Outbox;
use futures::StreamExt;
use kgp_board::Board;
use kgp_codec::Value;
use kgp_core::RequestId;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Drives a single in-flight request to completion (§4.3 "Worker
/// protocol").
///
/// Runs as its own `tokio` task so [`CancellationToken::cancel`] plus
/// `JoinHandle::abort` gives the dispatcher unconditional, non-blocking
/// cancellation (§5) — the closest this binding gets to the reference
/// implementation's "just kill the process" strategy without leaving
/// the async runtime.
pub(crate) async fn run_worker(
    request_id: RequestId,
    board: Board,
    agent: Arc<dyn Agent>,
    outbox: Outbox,
    cancel: CancellationToken,
) {
    if board.is_final() {
        outbox.send(Some(request_id), "yield", Vec::new());
        return;
    }

    let mut moves = agent.search(board);
    let mut previous: Option<i64> = None;

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            item = moves.next() => item,
        };

        match next {
            None => {
                outbox.send(Some(request_id), "yield", Vec::new());
                return;
            }
            Some(m) if m < 0 => {
                // Non-integer/invalid move: abandon the request, no
                // further messages (§7 "Non-integer move from agent").
                log::debug!("request {} agent yielded invalid move {}, abandoning", request_id, m);
                return;
            }
            Some(m) if Some(m) == previous => {
                // Dedup against the immediately previous move.
                continue;
            }
            Some(m) => {
                if cancel.is_cancelled() {
                    return;
                }
                // Wire pits are 1-indexed; internal pits are 0-indexed.
                outbox.send(Some(request_id), "move", vec![Value::Int(m + 1)]);
                previous = Some(m);
            }
        }
    }
}
