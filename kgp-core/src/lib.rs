//! Shared type aliases, identifiers, and error/log bootstrap for the
//! Kalah Game Protocol (KGP) client.
//!
//! This crate provides the foundational types used throughout the
//! `kgp-*` workspace, the same way `rbp-core` anchors the `rbp-*`
//! workspace it was split out of.

mod error;
mod side;

pub use error::Error;
pub use side::Side;

/// A server-assigned request identifier, named by `state`/`stop`/`move`/`yield`.
///
/// Request ids are positive integers chosen by the server; they are
/// opaque to the client beyond equality and ordering for use as a map
/// key.
pub type RequestId = u64;

/// An outbound command identifier, allocated by this client.
///
/// Distinct from [`RequestId`] only in intent: outbound ids are always
/// produced by [`kgp_core`]'s own odd-numbered counter, never by the
/// server.
pub type OutboundId = u64;

/// Initialize a terminal logger for binaries embedding this library.
///
/// Mirrors the teacher's `rbp_core::log()`: a convenience for
/// applications, never called by the library itself. Feature-gated
/// behind `server` so a pure library consumer doesn't pull in
/// `env_logger`.
#[cfg(feature = "server")]
pub fn init_logging() {
    let _ = env_logger::try_init();
}

#[cfg(not(feature = "server"))]
pub fn init_logging() {}
