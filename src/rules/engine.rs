//! Shakmaty-backed implementation of the [`RulesEngine`] contract.
//!
//! This is boundary glue: it translates between the crate's value types and
//! shakmaty's position/move model, and layers an undo stack on top of
//! shakmaty's forward-only positions so the session and the lookahead tier
//! get paired apply/undo.
//!
//! Two policy decisions live here rather than in the session:
//!
//! - Promotion is always to queen. Under-promotions are filtered out of the
//!   candidate list so the selector and the applied move can never disagree.
//! - Castling is requested with the king's destination square (`e1 -> g1`),
//!   the way a UI expresses it.

use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::{CastlingMode, Chess, Color, Move, Position, Role, Square};

use crate::error::{GameError, GameResult};
use crate::rules::RulesEngine;
use crate::types::{BoardSnapshot, MoveCandidate, PieceKind, RealizedMove, Side, SquareId};

/// Rules engine adapter over [`shakmaty::Chess`].
///
/// Keeps a stack of prior positions so every applied move can be reverted;
/// shakmaty positions themselves only move forward.
#[derive(Debug, Clone)]
pub struct ShakmatyRules {
    pos: Chess,
    undo_stack: Vec<Chess>,
}

impl ShakmatyRules {
    /// Standard starting position.
    pub fn new() -> Self {
        Self {
            pos: Chess::default(),
            undo_stack: Vec::new(),
        }
    }

    /// Build a position from a FEN string. Intended for tests and analysis
    /// setups.
    pub fn from_fen(fen: &str) -> GameResult<Self> {
        let parsed: Fen = fen.parse().map_err(|e| GameError::InvalidPosition {
            message: format!("{e}"),
        })?;
        let pos: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| GameError::InvalidPosition {
                message: e.to_string(),
            })?;
        Ok(Self {
            pos,
            undo_stack: Vec::new(),
        })
    }

    fn side(color: Color) -> Side {
        match color {
            Color::White => Side::White,
            Color::Black => Side::Black,
        }
    }

    fn kind(role: Role) -> PieceKind {
        match role {
            Role::Pawn => PieceKind::Pawn,
            Role::Knight => PieceKind::Knight,
            Role::Bishop => PieceKind::Bishop,
            Role::Rook => PieceKind::Rook,
            Role::Queen => PieceKind::Queen,
            Role::King => PieceKind::King,
        }
    }

    fn square_id(sq: Square) -> SquareId {
        SquareId::new(
            sq.file().char() as u8 - b'a',
            sq.rank().char() as u8 - b'1',
        )
    }

    fn square(id: SquareId) -> Square {
        Square::new(u32::from(id.rank()) * 8 + u32::from(id.file()))
    }

    /// The square a UI would click to request this move.
    ///
    /// Shakmaty encodes castling as king-takes-rook; the session speaks in
    /// king destinations, so translate.
    fn destination(m: &Move) -> Square {
        match m {
            Move::Castle { king, rook } => {
                let file = if rook.file().char() > king.file().char() {
                    b'g'
                } else {
                    b'c'
                };
                Self::square(SquareId::new(file - b'a', king.rank().char() as u8 - b'1'))
            }
            _ => m.to(),
        }
    }

    /// Translate a shakmaty move into a candidate, dropping under-promotions
    /// per the fixed queen policy.
    fn candidate(m: &Move) -> Option<MoveCandidate> {
        if m.promotion().is_some_and(|r| r != Role::Queen) {
            return None;
        }
        let from = m.from()?;
        Some(MoveCandidate {
            from: Self::square_id(from),
            to: Self::square_id(Self::destination(m)),
            promotion: m.promotion().map(Self::kind),
            captures: m.capture().map(Self::kind),
        })
    }
}

impl Default for ShakmatyRules {
    fn default() -> Self {
        Self::new()
    }
}

impl RulesEngine for ShakmatyRules {
    fn reset(&mut self) {
        self.pos = Chess::default();
        self.undo_stack.clear();
    }

    fn legal_moves(&self) -> Vec<MoveCandidate> {
        self.pos
            .legal_moves()
            .iter()
            .filter_map(Self::candidate)
            .collect()
    }

    fn legal_destinations(&self, from: SquareId) -> Vec<SquareId> {
        let mut destinations = Vec::new();
        for candidate in self.legal_moves() {
            if candidate.from == from && !destinations.contains(&candidate.to) {
                destinations.push(candidate.to);
            }
        }
        destinations
    }

    fn apply(&mut self, from: SquareId, to: SquareId) -> GameResult<RealizedMove> {
        let from_sq = Self::square(from);
        let to_sq = Self::square(to);

        let moves = self.pos.legal_moves();
        let chosen = moves.iter().find(|&m| {
            m.from() == Some(from_sq)
                && Self::destination(m) == to_sq
                && m.promotion().map_or(true, |r| r == Role::Queen)
        });
        let m = chosen.ok_or(GameError::IllegalMove { from, to })?;

        let san = SanPlus::from_move(self.pos.clone(), m).to_string();
        let realized = RealizedMove {
            mover: Self::side(self.pos.turn()),
            piece: Self::kind(m.role()),
            from,
            to,
            promotion: m.promotion().map(Self::kind),
            captured: m.capture().map(Self::kind),
            san,
        };

        self.undo_stack.push(self.pos.clone());
        self.pos.play_unchecked(m);
        Ok(realized)
    }

    fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(previous) => {
                self.pos = previous;
                true
            }
            None => false,
        }
    }

    fn turn(&self) -> Side {
        Self::side(self.pos.turn())
    }

    fn is_checkmate(&self) -> bool {
        self.pos.is_checkmate()
    }

    fn is_draw(&self) -> bool {
        // Fifty-move rule or insufficient material. Threefold repetition
        // needs game history shakmaty positions do not carry.
        self.pos.halfmoves() >= 100 || self.pos.is_insufficient_material()
    }

    fn is_stalemate(&self) -> bool {
        self.pos.is_stalemate()
    }

    fn snapshot(&self) -> BoardSnapshot {
        let mut snap = BoardSnapshot::empty();
        let board = self.pos.board();
        for index in 0..64 {
            let sq = Square::new(index);
            if let Some(piece) = board.piece_at(sq) {
                snap.set(Self::square_id(sq), Self::side(piece.color), Self::kind(piece.role));
            }
        }
        snap
    }
}
