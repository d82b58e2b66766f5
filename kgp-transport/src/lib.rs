//! The two concrete line-delivery transports KGP speaks over (§6):
//! a raw TCP stream socket and a WebSocket, plus a debug tracing
//! wrapper. The session/dispatcher layer depends only on the
//! [`LineReader`]/[`LineWriter`] traits defined here, never on a
//! concrete transport — the same shape as the teacher's `Player`
//! trait in `rbp_gameroom`, which lets `rbp_hosting::Client` bridge a
//! WebSocket to the room actor without the room knowing it's a
//! WebSocket on the other end.

mod debug;
mod stream;
mod websocket;

pub use debug::{DebugLineReader, DebugLineWriter};
pub use stream::StreamTransport;
pub use websocket::WebSocketTransport;

/// Reads one line at a time from an inbound transport.
///
/// Framing is the transport's concern: the stream variant splits on
/// `\n` (accepting bare `\r\n` or `\n`), the WebSocket variant treats
/// each text frame as one line.
#[async_trait::async_trait]
pub trait LineReader: Send {
    /// Returns `None` on end-of-stream (§7 "transport closed").
    async fn read_line(&mut self) -> Option<String>;
}

/// Writes one message at a time to an outbound transport.
///
/// `line` is the already-serialised command text with no trailing
/// CRLF — each transport appends whatever framing it needs (a CRLF for
/// the stream case, nothing for the WebSocket case, which sends the
/// line as its own text frame per §6).
#[async_trait::async_trait]
pub trait LineWriter: Send {
    /// Returns `false` if the write failed or the peer is gone.
    async fn write_line(&mut self, line: &str) -> bool;
}

/// A connected, not-yet-split transport. Splitting into independent
/// read/write halves is what lets the dispatcher block on reads while
/// the sender concurrently blocks on writes (§5 suspension points).
pub trait LineTransport: Send {
    fn split(self: Box<Self>) -> (Box<dyn LineReader>, Box<dyn LineWriter>);
}

#[async_trait::async_trait]
impl LineReader for Box<dyn LineReader> {
    async fn read_line(&mut self) -> Option<String> {
        (**self).read_line().await
    }
}

#[async_trait::async_trait]
impl LineWriter for Box<dyn LineWriter> {
    async fn write_line(&mut self, line: &str) -> bool {
        (**self).write_line(line).await
    }
}
