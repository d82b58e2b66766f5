//! Handshake, inbound command dispatch, per-request worker lifecycle
//! with cancellation, and outbound id/send discipline (§4.3, §5).
//!
//! This is the 45%-by-weight core of the protocol: the dispatcher owns
//! the transport, the outbound id counter, and the request table
//! exclusively; workers own their own board copy and the agent's move
//! stream. Grounded on the teacher's `Engine`/`Actor` split in
//! `rbp_gameroom`/`gameroom`: one task per participant, a single
//! channel funneling everything back to the coordinator.

mod agent;
mod outbox;
mod session;
mod worker;

pub use agent::{Agent, MoveStream};
pub use session::{Session, SessionConfig};
