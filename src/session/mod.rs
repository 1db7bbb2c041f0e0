//! The game session state machine.
//!
//! [`Session`] owns the authoritative state of one play: mode, side
//! assignment, selection cursor, move log, and terminal outcome. It is
//! driven entirely by discrete external intents (square clicks, undo
//! requests, the scheduled automated reply) and runs each transition to
//! completion; there is no interior concurrency.
//!
//! Phase diagram:
//!
//! ```text
//! Idle --start--> Active --(terminal move)--> Terminal --start--> Active
//! ```
//!
//! `Terminal` is absorbing until the next [`Session::start`], which always
//! succeeds and always resets.

mod pending;

pub use pending::{PendingReply, ReplySlot, REPLY_DELAY};

use tracing::{debug, info, warn};

use crate::ai::{Difficulty, MoveSelector};
use crate::error::GameResult;
use crate::history::{HistoryRecord, HistoryStore};
use crate::rules::RulesEngine;
use crate::types::{BoardSnapshot, RealizedMove, Side, SquareId};

/// How a session is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Two humans sharing the board.
    LocalMultiplayer,
    /// One human against the automated opponent.
    VsComputer {
        /// The side the human controls.
        human: Side,
        /// Strength of the automated opponent.
        difficulty: Difficulty,
    },
}

impl Mode {
    /// Description used in history records, matching the history screen.
    pub fn describe(&self) -> String {
        match self {
            Mode::LocalMultiplayer => "1 vs 1".to_string(),
            Mode::VsComputer { difficulty, .. } => format!("AI ({})", difficulty.label()),
        }
    }

    /// The side the automated opponent plays, if any.
    pub fn computer_side(&self) -> Option<Side> {
        match self {
            Mode::LocalMultiplayer => None,
            Mode::VsComputer { human, .. } => Some(human.opponent()),
        }
    }
}

/// How a terminated session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// One side delivered mate.
    Checkmate { winner: Side },
    /// Drawn by rule (fifty moves, insufficient material).
    Draw,
    /// The side to move had no legal moves and was not in check.
    Stalemate,
}

impl Outcome {
    /// User-facing result message.
    pub fn description(&self) -> String {
        match self {
            Outcome::Checkmate { winner } => format!("Checkmate! {winner} wins"),
            Outcome::Draw => "Draw".to_string(),
            Outcome::Stalemate => "Stalemate".to_string(),
        }
    }

    /// The winning side, `None` for draws and stalemate.
    pub fn winner(&self) -> Option<Side> {
        match self {
            Outcome::Checkmate { winner } => Some(*winner),
            Outcome::Draw | Outcome::Stalemate => None,
        }
    }
}

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No session started yet.
    #[default]
    Idle,
    /// A game is in progress.
    Active,
    /// The game ended; absorbing until the next start.
    Terminal(Outcome),
}

/// One live game session.
///
/// Owns the rules engine, the selector for the automated opponent, and the
/// history store completed sessions are recorded into. Created once and
/// restarted in place; `start` always resets.
pub struct Session<E: RulesEngine> {
    rules: E,
    selector: MoveSelector,
    history: HistoryStore,
    mode: Mode,
    phase: Phase,
    selection: Option<SquareId>,
    destinations: Vec<SquareId>,
    log: Vec<RealizedMove>,
    generation: u64,
    reply: ReplySlot,
}

impl<E: RulesEngine> Session<E> {
    /// New idle session. Call [`start`](Self::start) to begin playing.
    pub fn new(rules: E, history: HistoryStore) -> Self {
        Self::with_selector(rules, history, MoveSelector::new())
    }

    /// New idle session with an explicit selector, so tests can seed the
    /// automated opponent's randomness.
    pub fn with_selector(rules: E, history: HistoryStore, selector: MoveSelector) -> Self {
        Self {
            rules,
            selector,
            history,
            mode: Mode::LocalMultiplayer,
            phase: Phase::Idle,
            selection: None,
            destinations: Vec::new(),
            log: Vec::new(),
            generation: 0,
            reply: ReplySlot::default(),
        }
    }

    /// Start (or restart) a session in `mode`.
    ///
    /// Always legal, always resets: the board returns to the starting
    /// position, the log and selection clear, and any automated reply still
    /// pending from the previous session is invalidated by the generation
    /// bump. When the human plays Black, the opening reply is scheduled
    /// immediately.
    pub fn start(&mut self, mode: Mode) {
        self.generation += 1;
        self.reply.clear();
        self.rules.reset();
        self.log.clear();
        self.selection = None;
        self.destinations.clear();
        self.mode = mode;
        self.phase = Phase::Active;
        info!(
            "[SESSION] started {} (generation {})",
            mode.describe(),
            self.generation
        );
        self.schedule_reply_if_needed();
    }

    /// Handle a square intent from the UI.
    ///
    /// With nothing selected, selects the square if it holds a piece of the
    /// side to move; with a selection, attempts the move. Ignored outside an
    /// active session and, against the computer, outside the human's turn.
    /// Illegal attempts are normal interaction: they reselect or clear, and
    /// never surface an error.
    pub fn handle_square(&mut self, square: SquareId) {
        if self.phase != Phase::Active {
            return;
        }
        if !self.is_humans_turn() {
            debug!("[SESSION] ignoring {square}: not the human's turn");
            return;
        }
        match self.selection {
            Some(from) => self.attempt_move(from, square),
            None => self.select_square(square),
        }
    }

    /// Undo the most recent move.
    ///
    /// No-op when the log is empty or the session is not active (undoing a
    /// finished game would mutate a recorded result, so `Terminal` refuses
    /// it). Against the computer a single undo reverts both the automated
    /// reply and the human move that provoked it. When the rewound position
    /// still leaves the computer on move (the log held an unanswered human
    /// move, or only the computer's opening), a fresh reply is scheduled so
    /// the game keeps moving.
    pub fn request_undo(&mut self) {
        if self.phase != Phase::Active {
            return;
        }
        if self.log.is_empty() {
            return;
        }

        if self.rules.undo() {
            self.log.pop();
        }
        if matches!(self.mode, Mode::VsComputer { .. }) && !self.log.is_empty() && self.rules.undo()
        {
            self.log.pop();
        }

        self.selection = None;
        self.destinations.clear();
        // Whatever reply was scheduled answered a move that no longer exists.
        self.reply.clear();
        debug!("[SESSION] undo; {} moves remain", self.log.len());
        self.schedule_reply_if_needed();
    }

    /// Whether an automated reply is waiting to be played.
    pub fn has_pending_reply(&self) -> bool {
        self.reply.is_pending()
    }

    /// Play the scheduled automated reply, if one is still valid.
    ///
    /// Drivers call this after [`REPLY_DELAY`]. The reply is re-validated
    /// before anything moves: a stale generation, a finished session, or a
    /// turn that meanwhile returned to the human all drop the reply with a
    /// debug log instead of mutating state.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::GameError::NoLegalMoves`] and internal apply
    /// failures; both indicate a gating bug, not a playable condition.
    pub fn play_pending_reply(&mut self) -> GameResult<Option<RealizedMove>> {
        let Some(pending) = self.reply.take() else {
            return Ok(None);
        };
        if pending.generation() != self.generation {
            debug!(
                "[AI] dropping reply from stale generation {} (now {})",
                pending.generation(),
                self.generation
            );
            return Ok(None);
        }
        if self.phase != Phase::Active {
            debug!("[AI] dropping reply: session no longer active");
            return Ok(None);
        }
        let Mode::VsComputer { difficulty, .. } = self.mode else {
            debug!("[AI] dropping reply: no automated opponent in this mode");
            return Ok(None);
        };
        let Some(computer) = self.mode.computer_side() else {
            return Ok(None);
        };
        if self.rules.turn() != computer {
            debug!("[AI] dropping reply: it is no longer the computer's turn");
            return Ok(None);
        }

        let chosen = self.selector.select(&mut self.rules, difficulty)?;
        let played = self.rules.apply(chosen.from, chosen.to)?;
        info!("[AI] played {}", played.san);
        self.log.push(played.clone());
        self.selection = None;
        self.destinations.clear();
        self.check_termination();
        Ok(Some(played))
    }

    // --- Observable state ---

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The terminal outcome, once reached.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Terminal(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// The side to move.
    pub fn turn(&self) -> Side {
        self.rules.turn()
    }

    /// The currently selected square, if any.
    pub fn selection(&self) -> Option<SquareId> {
        self.selection
    }

    /// Legal destinations of the current selection, for highlighting.
    pub fn selected_destinations(&self) -> &[SquareId] {
        &self.destinations
    }

    /// The realized moves of this session, in play order.
    pub fn moves(&self) -> &[RealizedMove] {
        &self.log
    }

    /// Piece-by-square view of the current position, for rendering.
    pub fn board(&self) -> BoardSnapshot {
        self.rules.snapshot()
    }

    /// The mode this session was started in.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The match-history store, for the history screen.
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    // --- Internals ---

    fn is_humans_turn(&self) -> bool {
        match self.mode.computer_side() {
            Some(computer) => self.rules.turn() != computer,
            None => true,
        }
    }

    fn select_square(&mut self, square: SquareId) {
        let owns_piece = self
            .rules
            .snapshot()
            .piece_at(square)
            .is_some_and(|(side, _)| side == self.rules.turn());
        if owns_piece {
            self.selection = Some(square);
            self.destinations = self.rules.legal_destinations(square);
            debug!(
                "[SESSION] selected {square} ({} destinations)",
                self.destinations.len()
            );
        }
    }

    fn attempt_move(&mut self, from: SquareId, to: SquareId) {
        match self.rules.apply(from, to) {
            Ok(played) => {
                info!("[SESSION] {} played {}", played.mover, played.san);
                self.log.push(played);
                self.selection = None;
                self.destinations.clear();
                if !self.check_termination() {
                    self.schedule_reply_if_needed();
                }
            }
            Err(_) => {
                // Not an error to the player: clicking another of your own
                // pieces re-selects it, anything else clears the selection.
                let reselect = self
                    .rules
                    .snapshot()
                    .piece_at(to)
                    .is_some_and(|(side, _)| side == self.rules.turn());
                if reselect {
                    self.select_square(to);
                } else {
                    self.selection = None;
                    self.destinations.clear();
                }
            }
        }
    }

    /// Classify the position after a realized move. Checkmate is checked
    /// first, then draw, then stalemate. Returns `true` when the session
    /// terminated.
    fn check_termination(&mut self) -> bool {
        let outcome = if self.rules.is_checkmate() {
            // The side to move is mated, so the previous mover won.
            Some(Outcome::Checkmate {
                winner: self.rules.turn().opponent(),
            })
        } else if self.rules.is_draw() {
            Some(Outcome::Draw)
        } else if self.rules.is_stalemate() {
            Some(Outcome::Stalemate)
        } else {
            None
        };

        let Some(outcome) = outcome else {
            return false;
        };

        info!("[SESSION] game over: {}", outcome.description());
        let record =
            HistoryRecord::new(self.mode.describe(), outcome.description(), self.log.len());
        if let Err(e) = self.history.append(record) {
            warn!("[HISTORY] failed to persist match record: {e}");
        }
        self.reply.clear();
        self.phase = Phase::Terminal(outcome);
        true
    }

    fn schedule_reply_if_needed(&mut self) {
        let Some(computer) = self.mode.computer_side() else {
            return;
        };
        if self.rules.turn() != computer {
            return;
        }
        if self.reply.request(self.generation) {
            debug!("[AI] reply scheduled (generation {})", self.generation);
        }
    }
}
