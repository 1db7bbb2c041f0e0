//! Core board vocabulary shared by the session, the move selector, and the
//! rules-engine boundary.
//!
//! Everything here is a plain value type. The actual position lives behind
//! [`crate::rules::RulesEngine`]; the rest of the crate only ever sees these
//! snapshots and move records.

use std::fmt;
use std::str::FromStr;

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    White,
    Black,
}

impl Side {
    /// The other player.
    pub fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => write!(f, "White"),
            Side::Black => write!(f, "Black"),
        }
    }
}

/// Chess piece kinds with their conventional material values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Conventional material value used by the evaluation function.
    ///
    /// The king is worth zero: it is never actually exchanged, so counting
    /// it would only add a constant to both sides.
    pub fn material_value(self) -> i32 {
        match self {
            PieceKind::Pawn => 1,
            PieceKind::Knight => 3,
            PieceKind::Bishop => 3,
            PieceKind::Rook => 5,
            PieceKind::Queen => 9,
            PieceKind::King => 0,
        }
    }
}

/// A board square addressed by zero-based file (a=0) and rank (1st=0).
///
/// Parses from and displays as algebraic notation:
///
/// ```
/// use quickchess::SquareId;
///
/// let sq: SquareId = "e4".parse().unwrap();
/// assert_eq!((sq.file(), sq.rank()), (4, 3));
/// assert_eq!(sq.to_string(), "e4");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SquareId {
    file: u8,
    rank: u8,
}

impl SquareId {
    /// Build a square from zero-based file and rank.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate is 8 or more.
    pub fn new(file: u8, rank: u8) -> Self {
        assert!(file < 8 && rank < 8, "square out of range: ({file}, {rank})");
        Self { file, rank }
    }

    /// Zero-based file (a-file = 0).
    pub fn file(self) -> u8 {
        self.file
    }

    /// Zero-based rank (1st rank = 0).
    pub fn rank(self) -> u8 {
        self.rank
    }
}

/// Error returned when parsing a malformed algebraic square.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid square: {input:?}")]
pub struct ParseSquareError {
    /// The rejected input.
    pub input: String,
}

impl FromStr for SquareId {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        match bytes {
            [f @ b'a'..=b'h', r @ b'1'..=b'8'] => Ok(SquareId {
                file: f - b'a',
                rank: r - b'1',
            }),
            _ => Err(ParseSquareError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SquareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            (b'a' + self.file) as char,
            (b'1' + self.rank) as char
        )
    }
}

/// A legal move the rules engine offers for the current position.
///
/// Only the fields the selector needs: the endpoints, the promotion piece
/// (always queen under this crate's fixed promotion policy), and what the
/// move would capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveCandidate {
    pub from: SquareId,
    pub to: SquareId,
    pub promotion: Option<PieceKind>,
    pub captures: Option<PieceKind>,
}

impl MoveCandidate {
    /// Whether this move takes an opposing piece.
    pub fn is_capture(&self) -> bool {
        self.captures.is_some()
    }
}

/// A move that has actually been applied to the position.
///
/// Produced by [`crate::rules::RulesEngine::apply`] with the derived fields
/// (capture, SAN string) filled in. Immutable once appended to the session
/// log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealizedMove {
    /// Which side played the move.
    pub mover: Side,
    /// The piece that moved.
    pub piece: PieceKind,
    pub from: SquareId,
    pub to: SquareId,
    /// Promotion piece, if the move promoted a pawn.
    pub promotion: Option<PieceKind>,
    /// The piece this move captured, if any.
    pub captured: Option<PieceKind>,
    /// Standard algebraic notation, e.g. `"Nxf7+"`.
    pub san: String,
}

/// A serializable piece-by-square view of the position.
///
/// Rank/file addressed, 8x8. This is the only way the core reads the
/// position; mutation always goes through the rules engine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardSnapshot {
    squares: [[Option<(Side, PieceKind)>; 8]; 8],
}

impl BoardSnapshot {
    /// An empty board.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Place a piece. Used by rules adapters when building a snapshot.
    pub fn set(&mut self, square: SquareId, side: Side, kind: PieceKind) {
        self.squares[square.rank() as usize][square.file() as usize] = Some((side, kind));
    }

    /// The piece occupying `square`, if any.
    pub fn piece_at(&self, square: SquareId) -> Option<(Side, PieceKind)> {
        self.squares[square.rank() as usize][square.file() as usize]
    }

    /// Iterate over every occupied square.
    pub fn occupied(&self) -> impl Iterator<Item = (SquareId, Side, PieceKind)> + '_ {
        self.squares.iter().enumerate().flat_map(|(rank, row)| {
            row.iter().enumerate().filter_map(move |(file, cell)| {
                cell.map(|(side, kind)| (SquareId::new(file as u8, rank as u8), side, kind))
            })
        })
    }
}
