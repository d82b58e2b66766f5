//! Iterative-deepening minimax, in the shape of the reference
//! implementation's bundled `minmax.py` example (a generator that
//! yields successively deeper, improving guesses) — except this
//! version actually yields pit indices, which is what the protocol
//! requires; the original yields whole board states at a fixed depth
//! of zero, which is not a move the worker could ever send.
//!
//! Always plays as the south side, matching the convention the other
//! bundled example (`chance.py`) uses: `state.legal_moves(kgp.SOUTH)`.
//!
//! ```sh
//! cargo run --example minimax
//! ```

use futures::stream;
use kgp::{Board, Config, MoveStream, Side};

fn evaluate(board: &Board) -> i64 {
    board.store(Side::South) as i64 - board.store(Side::North) as i64
}

fn minimax(board: &Board, depth: u32, side: Side) -> i64 {
    if depth == 0 || board.is_final() {
        return evaluate(board);
    }
    let legal = board.legal_moves(side);
    if legal.is_empty() {
        return evaluate(board);
    }
    legal
        .into_iter()
        .map(|mv| {
            let (next, again) = board.sow(side, mv);
            let next_side = if again { side } else { !side };
            minimax(&next, depth - 1, next_side)
        })
        .reduce(|a, b| if side == Side::South { a.max(b) } else { a.min(b) })
        .unwrap_or_else(|| evaluate(board))
}

fn best_move(board: &Board, depth: u32) -> Option<usize> {
    board
        .legal_moves(Side::South)
        .into_iter()
        .max_by_key(|&mv| {
            let (next, again) = board.sow(Side::South, mv);
            let next_side = if again { Side::South } else { Side::North };
            minimax(&next, depth.saturating_sub(1), next_side)
        })
}

fn minimax_agent(board: Board) -> MoveStream {
    Box::pin(stream::unfold(1u32, move |depth| {
        let board = board.clone();
        async move {
            if board.is_final() {
                return None;
            }
            let mv = best_move(&board, depth)?;
            Some((mv as i64, depth + 1))
        }
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    kgp::core::init_logging();

    let config = Config::new("localhost", 2671)
        .with_name(std::env::var("NAME").unwrap_or_else(|_| "minimax".to_string()))
        .with_debug(std::env::var("DEBUG").is_ok());

    kgp::connect(config, minimax_agent as fn(Board) -> MoveStream).await
}
