use std::fmt;
use std::ops::Not;

/// Which half of the board a pit or store belongs to.
///
/// The library's convention (§3 of the protocol spec): the board
/// parser is the one place `north`/`south` field order is fixed, and
/// it fixes south before north on the wire (see [`kgp_board`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    North,
    South,
}

impl Side {
    /// Index into a `[T; 2]` keyed by side, north first.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::North => 0,
            Side::South => 1,
        }
    }
}

impl Not for Side {
    type Output = Side;

    #[inline]
    fn not(self) -> Side {
        match self {
            Side::North => Side::South,
            Side::South => Side::North,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::North => write!(f, "north"),
            Side::South => write!(f, "south"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_round_trips() {
        assert_eq!(!Side::North, Side::South);
        assert_eq!(!!Side::North, Side::North);
    }

    #[test]
    fn index_is_stable() {
        assert_eq!(Side::North.index(), 0);
        assert_eq!(Side::South.index(), 1);
    }
}
