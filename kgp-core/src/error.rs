use thiserror::Error as ThisError;

/// Session-terminating conditions (§7 of the protocol spec).
///
/// None of these ever propagate past `connect`: they describe *why*
/// the session loop stopped, for logging and tests, not a failure the
/// caller must handle.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("unsupported protocol version {major}.{minor}.{patch}")]
    UnsupportedVersion {
        major: u32,
        minor: u32,
        patch: u32,
    },

    #[error("transport closed by peer")]
    TransportClosed,

    #[error("server said goodbye")]
    Goodbye,

    #[error("server reported a fatal failure")]
    Fail,
}
