//! The rules-engine boundary.
//!
//! Move legality, check and mate detection, and the position itself are the
//! job of an external rules engine. [`RulesEngine`] is the contract the
//! session and selector program against; [`engine::ShakmatyRules`] is the
//! production adapter. Tests substitute their own implementations (e.g. a
//! counting wrapper that audits apply/undo pairing).

pub mod engine;

use crate::error::GameResult;
use crate::types::{BoardSnapshot, MoveCandidate, RealizedMove, Side, SquareId};

/// Contract the core requires from the external rules engine.
///
/// Mutations are strictly paired: every successful [`apply`](Self::apply)
/// must be reversible by exactly one [`undo`](Self::undo), LIFO ordered.
pub trait RulesEngine {
    /// Restore the standard starting position and forget all prior moves.
    fn reset(&mut self);

    /// All legal moves in the current position.
    ///
    /// Empty only in terminal positions. Ordering is stable for a fixed
    /// position, which the hard selection tier relies on for its
    /// first-candidate tie-break.
    fn legal_moves(&self) -> Vec<MoveCandidate>;

    /// Legal destination squares for the piece on `from`, for UI highlighting.
    fn legal_destinations(&self, from: SquareId) -> Vec<SquareId>;

    /// Realize the move `from` -> `to`, promoting to queen when a pawn
    /// reaches the back rank.
    ///
    /// Returns [`crate::GameError::IllegalMove`] without touching the
    /// position if no legal move matches.
    fn apply(&mut self, from: SquareId, to: SquareId) -> GameResult<RealizedMove>;

    /// Revert the most recent applied move. Returns `false` when there is
    /// nothing to revert.
    fn undo(&mut self) -> bool;

    /// The side to move.
    fn turn(&self) -> Side;

    /// Whether the side to move is checkmated.
    fn is_checkmate(&self) -> bool;

    /// Whether the position is drawn (fifty-move rule, insufficient
    /// material). Stalemate is reported separately.
    fn is_draw(&self) -> bool;

    /// Whether the side to move is stalemated.
    fn is_stalemate(&self) -> bool;

    /// A piece-by-square view of the current position.
    fn snapshot(&self) -> BoardSnapshot;
}

/// A hypothetical move that is guaranteed to be reverted.
///
/// Applies the move on construction and undoes it on drop, so a scoring
/// pass can never leak a mutated position back to the session, whatever
/// path the surrounding code takes.
///
/// ```
/// use quickchess::{RulesEngine, ScopedMove, ShakmatyRules};
///
/// let mut rules = ShakmatyRules::new();
/// let before = rules.snapshot();
/// {
///     let probe = ScopedMove::apply(
///         &mut rules,
///         "e2".parse().unwrap(),
///         "e4".parse().unwrap(),
///     )
///     .unwrap();
///     assert_ne!(probe.rules().snapshot(), before);
/// }
/// assert_eq!(rules.snapshot(), before);
/// ```
pub struct ScopedMove<'a> {
    rules: &'a mut dyn RulesEngine,
}

impl<'a> ScopedMove<'a> {
    /// Apply `from` -> `to` hypothetically. Fails without side effects if
    /// the move is illegal.
    pub fn apply(
        rules: &'a mut dyn RulesEngine,
        from: SquareId,
        to: SquareId,
    ) -> GameResult<Self> {
        rules.apply(from, to)?;
        Ok(Self { rules })
    }

    /// Read-only access to the position with the hypothetical move applied.
    pub fn rules(&self) -> &dyn RulesEngine {
        &*self.rules
    }
}

impl Drop for ScopedMove<'_> {
    fn drop(&mut self) {
        self.rules.undo();
    }
}
