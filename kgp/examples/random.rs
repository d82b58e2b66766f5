//! A trivial agent that picks a uniformly random legal move, ported
//! from the original `chance.py` example bundled with the reference
//! implementation (which does the same thing:
//! `random.choice(state.legal_moves(kgp.SOUTH))`).
//!
//! Run against a local KGP server on the default port:
//!
//! ```sh
//! cargo run --example random
//! ```

use futures::stream;
use kgp::{Board, Config, MoveStream, Side};

fn random_agent(board: Board) -> MoveStream {
    let legal = board.legal_moves(Side::South);
    let mv = (!legal.is_empty()).then(|| legal[rand::random_range(0..legal.len())] as i64);
    Box::pin(stream::iter(mv))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    kgp::core::init_logging();

    let mut config = Config::new("localhost", 2671)
        .with_name(std::env::var("NAME").unwrap_or_else(|_| "random".to_string()))
        .with_debug(std::env::var("DEBUG").is_ok());
    if let Ok(token) = std::env::var("TOKEN") {
        config = config.with_token(token);
    }

    kgp::connect(config, random_agent as fn(Board) -> MoveStream).await
}
