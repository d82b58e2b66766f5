use futures::stream::Stream;
use kgp_board::Board;
use std::pin::Pin;

/// A lazy, restartable sequence of candidate pit indices (§6 "Agent
/// interface", §9 "Lazy restartable move sequence").
///
/// The worker consumes a prefix of this stream and may stop polling it
/// at any point — nothing requires the sequence to be finite, and
/// nothing requires the agent's own state to survive being dropped
/// mid-iteration (see [`Agent`]'s cancellation note).
pub type MoveStream = Pin<Box<dyn Stream<Item = i64> + Send>>;

/// The user-supplied search procedure.
///
/// Given a board, returns a [`MoveStream`] of improving move guesses.
/// Values are expected to be non-negative pit indices; a negative
/// value is treated as the agent misbehaving and abandons the request
/// silently (§4.3 "Non-integer move from agent" — in this Rust
/// binding the type system already rules out non-integers, so the
/// only residual failure mode is a negative index).
///
/// # Cancellation
///
/// A worker driving this agent may be aborted at any `.await` point
/// without warning — the reference implementation kills the OS
/// process running the agent outright (§5, §9 "Unconditional
/// cancellation"). This binding runs the agent as a `tokio` task and
/// calls [`tokio::task::JoinHandle::abort`] on `stop`, which runs Rust
/// drop glue but does **not** let the agent observe or react to the
/// cancellation. Do not rely on side effects (file handles, external
/// processes, partially-written state) surviving past the last
/// checkpoint the worker happened to poll before abortion.
pub trait Agent: Send + Sync + 'static {
    fn search(&self, board: Board) -> MoveStream;
}

impl<F> Agent for F
where
    F: Fn(Board) -> MoveStream + Send + Sync + 'static,
{
    fn search(&self, board: Board) -> MoveStream {
        self(board)
    }
}
