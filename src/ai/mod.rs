//! Move selection for the automated opponent.
//!
//! Three difficulty tiers, each its own [`SelectStrategy`] implementation:
//!
//! | Tier   | Policy                                               |
//! |--------|------------------------------------------------------|
//! | Easy   | uniform random over all legal moves                  |
//! | Medium | 50% uniform over captures when any exist, else random|
//! | Hard   | one-ply material lookahead, first-candidate tie-break|
//!
//! The medium tier's asymmetry is intentional: it approximates "prefers
//! captures but not always" rather than a strict greedy-capture rule.
//!
//! The hard tier probes each candidate through a [`ScopedMove`], so the
//! shared position is always restored before the next candidate is tried,
//! whatever path the scoring takes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::{GameError, GameResult};
use crate::eval::evaluate;
use crate::rules::{RulesEngine, ScopedMove};
use crate::types::MoveCandidate;

/// Strength tier for the automated opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    /// Uniform random move.
    Easy,
    /// Capture-biased random move.
    Medium,
    /// One-ply material lookahead.
    Hard,
}

impl Difficulty {
    /// Lowercase label used in history mode descriptions, e.g. `"AI (easy)"`.
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// Picks the automated opponent's move.
///
/// Holds the randomness source so tests can seed it and replay a selection
/// exactly. The hard tier never consults the RNG.
#[derive(Debug)]
pub struct MoveSelector {
    rng: StdRng,
}

impl MoveSelector {
    /// Selector with OS-seeded randomness.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Selector with deterministic randomness, for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Choose a move for the side to move at the given difficulty.
    ///
    /// # Errors
    ///
    /// [`GameError::NoLegalMoves`] if the position is terminal. Correct
    /// turn-gating in the session never lets that happen; it is an invariant
    /// violation, not a normal outcome.
    pub fn select(
        &mut self,
        rules: &mut dyn RulesEngine,
        difficulty: Difficulty,
    ) -> GameResult<MoveCandidate> {
        let moves = rules.legal_moves();
        if moves.is_empty() {
            return Err(GameError::NoLegalMoves { side: rules.turn() });
        }

        let strategy: &dyn SelectStrategy = match difficulty {
            Difficulty::Easy => &UniformRandom,
            Difficulty::Medium => &CaptureBiased,
            Difficulty::Hard => &OnePlyLookahead,
        };
        let chosen = strategy.choose(rules, &moves, &mut self.rng)?;
        debug!(
            "[AI] {:?} tier chose {} -> {} ({} candidates)",
            difficulty,
            chosen.from,
            chosen.to,
            moves.len()
        );
        Ok(chosen)
    }
}

impl Default for MoveSelector {
    fn default() -> Self {
        Self::new()
    }
}

/// One selection policy per difficulty tier.
trait SelectStrategy {
    /// Pick one of `moves`. `moves` is non-empty; `rules` holds the position
    /// the candidates were generated from and must be returned unchanged.
    fn choose(
        &self,
        rules: &mut dyn RulesEngine,
        moves: &[MoveCandidate],
        rng: &mut StdRng,
    ) -> GameResult<MoveCandidate>;
}

struct UniformRandom;

impl SelectStrategy for UniformRandom {
    fn choose(
        &self,
        _rules: &mut dyn RulesEngine,
        moves: &[MoveCandidate],
        rng: &mut StdRng,
    ) -> GameResult<MoveCandidate> {
        Ok(moves[rng.random_range(0..moves.len())])
    }
}

struct CaptureBiased;

impl SelectStrategy for CaptureBiased {
    fn choose(
        &self,
        _rules: &mut dyn RulesEngine,
        moves: &[MoveCandidate],
        rng: &mut StdRng,
    ) -> GameResult<MoveCandidate> {
        let captures: Vec<MoveCandidate> =
            moves.iter().copied().filter(MoveCandidate::is_capture).collect();
        if !captures.is_empty() && rng.random_bool(0.5) {
            return Ok(captures[rng.random_range(0..captures.len())]);
        }
        Ok(moves[rng.random_range(0..moves.len())])
    }
}

struct OnePlyLookahead;

impl SelectStrategy for OnePlyLookahead {
    fn choose(
        &self,
        rules: &mut dyn RulesEngine,
        moves: &[MoveCandidate],
        _rng: &mut StdRng,
    ) -> GameResult<MoveCandidate> {
        let mut best = moves[0];
        let mut best_score = i32::MIN;

        for candidate in moves {
            let probe = ScopedMove::apply(rules, candidate.from, candidate.to)?;
            // After the hypothetical move the opponent is to move; negate so
            // higher is better for the original mover.
            let score = -evaluate(&probe.rules().snapshot(), probe.rules().turn());
            drop(probe);

            // Strictly greater: ties keep the earliest candidate, which makes
            // the tier fully deterministic.
            if score > best_score {
                best_score = score;
                best = *candidate;
            }
        }

        Ok(best)
    }
}
