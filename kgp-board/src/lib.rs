//! The Kalah board: parsing, legal-move enumeration, and the sowing
//! rule (capture, the again-rule, and endgame collection).
//!
//! Grounded on the reference Python implementation's `Board` class
//! (`kgp.py`), with the north/south wire-field order deliberately
//! fixed opposite to that source — see the module-level note on
//! [`Board::parse`].

use kgp_core::Side;
use std::fmt;

/// An immutable-by-default Kalah board of size `n` (pits per side).
///
/// `sow` never mutates `self`; it returns a new board and an
/// again-flag, matching the protocol's "logical copy" semantics (§4.1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    stores: [u32; 2],
    pits: [Vec<u32>; 2],
}

impl Board {
    /// Construct a board directly from side stores and pit rows.
    ///
    /// Panics if `north_pits.len() != south_pits.len()`, mirroring the
    /// source's `assert len(north_pits) == len(south_pits)`.
    pub fn new(
        north_store: u32,
        south_store: u32,
        north_pits: Vec<u32>,
        south_pits: Vec<u32>,
    ) -> Self {
        assert_eq!(north_pits.len(), south_pits.len());
        let size = north_pits.len();
        Board {
            size,
            stores: [north_store, south_store],
            pits: [north_pits, south_pits],
        }
    }

    /// Pits per side.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Stones in `side`'s store.
    pub fn store(&self, side: Side) -> u32 {
        self.stores[side.index()]
    }

    /// Read-only view of `side`'s pits, index 0 nearest the sowing start.
    pub fn pits(&self, side: Side) -> &[u32] {
        &self.pits[side.index()]
    }

    /// Stones in pit `i` on `side`.
    pub fn pit(&self, side: Side, i: usize) -> u32 {
        self.pits[side.index()][i]
    }

    fn set_pit(&mut self, side: Side, i: usize, v: u32) {
        self.pits[side.index()][i] = v;
    }

    /// Whether `side` may play pit `i`: it must hold at least one stone.
    pub fn is_legal(&self, side: Side, i: usize) -> bool {
        i < self.size && self.pit(side, i) > 0
    }

    /// Legal pit indices for `side`, ascending.
    pub fn legal_moves(&self, side: Side) -> Vec<usize> {
        (0..self.size).filter(|&i| self.is_legal(side, i)).collect()
    }

    /// A board is final iff at least one side has no legal moves left.
    pub fn is_final(&self) -> bool {
        self.pits[Side::North.index()].iter().all(|&s| s == 0)
            || self.pits[Side::South.index()].iter().all(|&s| s == 0)
    }

    /// Sow the stones from pit `i` on `side`, returning the resulting
    /// board and whether `side` moves again.
    ///
    /// Panics if the move is illegal — callers (agents, the session
    /// worker) are expected to consult [`Board::is_legal`] or
    /// [`Board::legal_moves`] first.
    pub fn sow(&self, side: Side, i: usize) -> (Board, bool) {
        assert!(self.is_legal(side, i), "sow from an empty or out-of-range pit");

        #[derive(Copy, Clone, PartialEq, Eq)]
        enum Loc {
            Pit(Side, usize),
            Store(Side),
        }

        let mut b = self.clone();
        let me = side;
        let mut stones = b.pit(side, i);
        b.set_pit(side, i, 0);

        let advance = |loc: Loc, size: usize| -> Loc {
            match loc {
                Loc::Pit(s, idx) if idx + 1 < size => Loc::Pit(s, idx + 1),
                Loc::Pit(s, _) => Loc::Store(s),
                Loc::Store(s) => Loc::Pit(!s, 0),
            }
        };

        let mut loc = Loc::Pit(me, i);
        let mut last = loc;
        while stones > 0 {
            loc = advance(loc, b.size);
            // players skip the opponent's store
            if let Loc::Store(s) = loc {
                if s != me {
                    loc = advance(loc, b.size);
                }
            }
            match loc {
                Loc::Pit(s, idx) => {
                    let v = b.pit(s, idx);
                    b.set_pit(s, idx, v + 1);
                }
                Loc::Store(s) => b.stores[s.index()] += 1,
            }
            stones -= 1;
            last = loc;
        }

        let again = matches!(last, Loc::Store(s) if s == me);

        if !again {
            if let Loc::Pit(s, idx) = last {
                if s == me && b.pit(s, idx) == 1 {
                    let other = b.size - 1 - idx;
                    let opposite = !me;
                    let captured = b.pit(opposite, other);
                    if captured > 0 {
                        b.stores[me.index()] += captured + 1;
                        b.set_pit(me, idx, 0);
                        b.set_pit(opposite, other, 0);
                    }
                }
            }
        }

        if b.is_final() {
            for s in [Side::North, Side::South] {
                let sum: u32 = b.pits(s).iter().sum();
                b.stores[s.index()] += sum;
                for p in b.pits[s.index()].iter_mut() {
                    *p = 0;
                }
            }
            return (b, false);
        }

        (b, again)
    }

    /// Parse a KGP board literal.
    ///
    /// Wire form: `<n,south_store,north_store,s0,..,s(n-1),n0,..,n(n-1)>`.
    /// Returns `None` if the delimiters are missing, a token is not a
    /// base-10 integer, or the integer count doesn't equal `2n + 3`.
    ///
    /// **Convention note** (resolves the source's north/south
    /// inconsistency, see spec §9 open question 1): the *south* store
    /// and pits precede the *north* ones on the wire, the reverse of
    /// the original Python's `Board(north, south, north_pits,
    /// south_pits)` ordering. This matches the test vectors this crate
    /// is built against.
    pub fn parse(raw: &str) -> Option<Board> {
        let raw = raw.trim();
        let inner = raw.strip_prefix('<')?.strip_suffix('>')?;

        let mut data = Vec::new();
        for tok in inner.split(',') {
            data.push(tok.parse::<u32>().ok()?);
        }

        let n = *data.first()? as usize;
        if n == 0 || data.len() != 2 * n + 3 {
            return None;
        }

        let south_store = data[1];
        let north_store = data[2];
        let south_pits = data[3..3 + n].to_vec();
        let north_pits = data[3 + n..3 + 2 * n].to_vec();

        Some(Board::new(north_store, south_store, north_pits, south_pits))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.size)?;
        write!(f, ",{}", self.store(Side::South))?;
        write!(f, ",{}", self.store(Side::North))?;
        for s in self.pits(Side::South) {
            write!(f, ",{}", s)?;
        }
        for n in self.pits(Side::North) {
            write!(f, ",{}", n)?;
        }
        write!(f, ">")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(b: &Board) -> u32 {
        b.store(Side::North)
            + b.store(Side::South)
            + b.pits(Side::North).iter().sum::<u32>()
            + b.pits(Side::South).iter().sum::<u32>()
    }

    #[test]
    fn parse_fixes_south_before_north() {
        let b = Board::parse("<3,4,5,1,2,3,6,7,8>").unwrap();
        assert_eq!(b.store(Side::South), 4);
        assert_eq!(b.store(Side::North), 5);
        assert_eq!(b.pits(Side::South), &[1, 2, 3]);
        assert_eq!(b.pits(Side::North), &[6, 7, 8]);
    }

    #[test]
    fn parse_serialise_round_trip() {
        let s = "<3,4,5,1,2,3,6,7,8>";
        let b = Board::parse(s).unwrap();
        assert_eq!(b.to_string(), s);
    }

    #[test]
    fn parse_rejects_wrong_arity() {
        assert!(Board::parse("<3,4,5,1,2,3,6,7>").is_none());
    }

    #[test]
    fn parse_rejects_missing_delimiters() {
        assert!(Board::parse("3,4,5,1,2,3,6,7,8").is_none());
    }

    #[test]
    fn parse_rejects_non_integer_token() {
        assert!(Board::parse("<3,4,5,1,x,3,6,7,8>").is_none());
    }

    #[test]
    fn scenario_1_again_on_store_landing() {
        let b = Board::new(0, 0, vec![3, 3, 3], vec![3, 3, 3]);
        let (b2, again) = b.sow(Side::North, 0);
        assert!(again);
        assert_eq!(b2.store(Side::South), 0);
        assert_eq!(b2.store(Side::North), 1);
        assert_eq!(b2.pits(Side::North), &[0, 4, 4]);
        assert_eq!(b2.pits(Side::South), &[3, 3, 3]);
    }

    #[test]
    fn scenario_2_wraparound_no_capture() {
        let b = Board::new(0, 0, vec![5, 5, 5, 5], vec![5, 5, 5, 5]);
        let (b2, again) = b.sow(Side::North, 2);
        assert!(!again);
        assert_eq!(b2.store(Side::South), 0);
        assert_eq!(b2.store(Side::North), 1);
        assert_eq!(b2.pits(Side::South), &[6, 6, 6, 5]);
        assert_eq!(b2.pits(Side::North), &[5, 5, 0, 6]);
    }

    #[test]
    fn scenario_3_capture() {
        let b = Board::new(0, 0, vec![3, 3, 3], vec![3, 3, 3]);
        let (b2, again) = b.sow(Side::North, 2);
        assert!(!again);
        assert_eq!(b2.store(Side::South), 0);
        assert_eq!(b2.store(Side::North), 1);
        assert_eq!(b2.pits(Side::South), &[4, 4, 3]);
        assert_eq!(b2.pits(Side::North), &[3, 3, 0]);
    }

    #[test]
    fn scenario_4_capture_on_large_board() {
        let b = Board::new(0, 0, vec![9, 9, 9], vec![9, 9, 9]);
        let (b2, again) = b.sow(Side::North, 0);
        assert!(!again);
        assert_eq!(b2.store(Side::South), 0);
        assert_eq!(b2.store(Side::North), 1);
        assert_eq!(b2.pits(Side::South), &[10, 10, 10]);
        assert_eq!(b2.pits(Side::North), &[1, 11, 11]);
    }

    #[test]
    fn scenario_5_endgame_collection() {
        let b = Board::new(0, 0, vec![1, 1, 1], vec![0, 0, 1]);
        let (b2, again) = b.sow(Side::South, 2);
        assert!(!again);
        assert!(b2.is_final());
        assert_eq!(b2.store(Side::South), 1);
        assert_eq!(b2.store(Side::North), 3);
        assert_eq!(b2.pits(Side::North), &[0, 0, 0]);
        assert_eq!(b2.pits(Side::South), &[0, 0, 0]);
    }

    #[test]
    fn sowing_conserves_stones_before_endgame() {
        let b = Board::new(0, 0, vec![5, 5, 5, 5], vec![5, 5, 5, 5]);
        for i in 0..4 {
            let (b2, _) = b.sow(Side::North, i);
            assert_eq!(total(&b2), total(&b));
        }
    }

    #[test]
    fn legal_moves_ascending() {
        let b = Board::new(0, 0, vec![0, 2, 0, 1], vec![1, 1, 1, 1]);
        assert_eq!(b.legal_moves(Side::North), vec![1, 3]);
    }

    #[test]
    fn again_implies_not_final() {
        let b = Board::new(0, 0, vec![3, 3, 3], vec![3, 3, 3]);
        let (b2, again) = b.sow(Side::North, 0);
        assert!(again);
        assert!(!b2.is_final());
    }
}
