//! Chess session management on top of an external rules engine.
//!
//! This crate is the non-rendering half of a small chess game: it tracks
//! whose turn it is, the selection cursor, the move log, and terminal
//! outcomes, and it picks moves for an automated opponent at three
//! difficulty tiers (random, capture-biased, one-ply material lookahead).
//! Move legality, check and mate detection, and the board itself are
//! delegated to a rules engine behind the [`RulesEngine`] trait; the
//! production adapter wraps [shakmaty](https://crates.io/crates/shakmaty).
//!
//! Completed sessions land in a bounded, JSON-persisted match history.
//!
//! ```
//! use quickchess::{HistoryStore, Mode, Phase, Session, ShakmatyRules, Side};
//!
//! let mut session = Session::new(ShakmatyRules::new(), HistoryStore::in_memory());
//! session.start(Mode::LocalMultiplayer);
//!
//! session.handle_square("e2".parse().unwrap());
//! session.handle_square("e4".parse().unwrap());
//!
//! assert_eq!(session.moves().len(), 1);
//! assert_eq!(session.turn(), Side::Black);
//! assert_eq!(session.phase(), Phase::Active);
//! ```

pub mod ai;
pub mod error;
pub mod eval;
pub mod history;
pub mod rules;
pub mod session;
pub mod types;

pub use ai::{Difficulty, MoveSelector};
pub use error::{GameError, GameResult};
pub use history::{HistoryRecord, HistoryStore, HISTORY_CAP};
pub use rules::{engine::ShakmatyRules, RulesEngine, ScopedMove};
pub use session::{Mode, Outcome, Phase, Session, REPLY_DELAY};
pub use types::{BoardSnapshot, MoveCandidate, PieceKind, RealizedMove, Side, SquareId};
