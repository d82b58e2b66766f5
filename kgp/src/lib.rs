//! Kalah Game Protocol (KGP) client library.
//!
//! Facade crate re-exporting the `kgp-*` workspace and providing the
//! single public [`connect`] entry point, mirroring the teacher's
//! `rbp` facade (`pub use rbp_core as core; ...`).
//!
//! ```no_run
//! use kgp::{Config, MoveStream};
//! use futures::stream;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::new("localhost", 2671).with_name("example");
//! kgp::connect(config, |board: kgp::Board| -> MoveStream {
//!     Box::pin(stream::iter(board.legal_moves(kgp::Side::South).into_iter().map(|m| m as i64)))
//! }).await?;
//! # Ok(())
//! # }
//! ```

pub use kgp_board as board;
pub use kgp_codec as codec;
pub use kgp_core as core;
pub use kgp_session as session;
pub use kgp_transport as transport;

// Re-export the most commonly used types at the crate root, the way
// the teacher re-exports `rbp_core::*` from `rbp`.
pub use kgp_board::Board;
pub use kgp_core::{Error, RequestId, Side};
pub use kgp_session::{Agent, MoveStream, Session, SessionConfig};

use kgp_transport::{DebugLineReader, DebugLineWriter, LineReader, LineTransport, LineWriter, StreamTransport, WebSocketTransport};

/// Connection parameters for [`connect`] (§6 "Configuration").
///
/// Plain field construction plus a small `with_*` builder chain, the
/// teacher's preferred shape for explicit config structs (robopoker
/// has no config-file layer anywhere in the workspace; its binaries
/// take `clap` args instead).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub token: Option<String>,
    pub name: Option<String>,
    pub authors: Vec<String>,
    pub debug: bool,
}

impl Config {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Config {
            host: host.into(),
            port,
            token: None,
            name: None,
            authors: Vec::new(),
            debug: false,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_authors(mut self, authors: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// A host starting with `ws` selects the WebSocket transport and
    /// ignores `port` (§6).
    fn is_websocket(&self) -> bool {
        self.host.starts_with("ws")
    }
}

/// Connect to a KGP server and run `agent` for every search request the
/// server issues, until the session reaches a fatal transition
/// (`goodbye`, `fail`, transport closed, or protocol version
/// mismatch).
///
/// Per §7, no protocol-level condition is ever surfaced as an `Err`
/// here — those describe *why* the session loop stopped and are only
/// logged. The only `Err` this returns is a failure to establish the
/// transport connection in the first place.
pub async fn connect<A: Agent>(config: Config, agent: A) -> anyhow::Result<()> {
    let (reader, writer): (Box<dyn LineReader>, Box<dyn LineWriter>) = if config.is_websocket() {
        let transport = WebSocketTransport::connect(&config.host).await?;
        Box::new(transport).split()
    } else {
        let transport = StreamTransport::connect(&config.host, config.port).await?;
        Box::new(transport).split()
    };

    let (reader, writer) = wrap_debug(reader, writer, config.debug);

    let session_config = SessionConfig {
        name: config.name,
        authors: config.authors,
        token: config.token,
    };
    let session = Session::new(session_config, agent);

    match session.run(reader, writer).await {
        Ok(()) => log::info!("kgp session ended cleanly"),
        Err(e) => log::info!("kgp session terminated: {}", e),
    }

    Ok(())
}

fn wrap_debug(
    reader: Box<dyn LineReader>,
    writer: Box<dyn LineWriter>,
    debug: bool,
) -> (Box<dyn LineReader>, Box<dyn LineWriter>) {
    if debug {
        (
            Box::new(DebugLineReader::new(reader)),
            Box::new(DebugLineWriter::new(writer)),
        )
    } else {
        (reader, writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder_chains() {
        let config = Config::new("localhost", 2671)
            .with_name("magenta")
            .with_authors(["ash", "misty"])
            .with_token("secret")
            .with_debug(true);
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 2671);
        assert_eq!(config.name.as_deref(), Some("magenta"));
        assert_eq!(config.authors, vec!["ash".to_string(), "misty".to_string()]);
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert!(config.debug);
        assert!(!config.is_websocket());
    }

    #[test]
    fn websocket_host_is_detected() {
        let config = Config::new("wss://example.com/kgp", 2671);
        assert!(config.is_websocket());
    }
}
