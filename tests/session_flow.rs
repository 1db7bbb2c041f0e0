//! Session flow integration tests
//!
//! Drives full sessions through the public API:
//! - Turn alternation and move logging
//! - Selection, re-selection, and illegal-attempt absorption
//! - Undo in both modes
//! - Automated replies and their invalidation across restarts
//! - Terminal outcomes and history recording

use quickchess::{
    Difficulty, HistoryStore, Mode, MoveSelector, Outcome, Phase, Session, ShakmatyRules, Side,
    SquareId,
};

fn sq(s: &str) -> SquareId {
    s.parse().unwrap()
}

fn session_in(mode: Mode) -> Session<ShakmatyRules> {
    let mut session = Session::with_selector(
        ShakmatyRules::new(),
        HistoryStore::in_memory(),
        MoveSelector::seeded(0),
    );
    session.start(mode);
    session
}

/// Play a move through the click interface and assert it landed.
fn play(session: &mut Session<ShakmatyRules>, from: &str, to: &str) {
    let before = session.moves().len();
    session.handle_square(sq(from));
    session.handle_square(sq(to));
    assert_eq!(
        session.moves().len(),
        before + 1,
        "{from}->{to} did not realize"
    );
}

// ============================================================================
// Turn Alternation
// ============================================================================

#[test]
fn test_turn_flips_once_per_realized_move() {
    let mut session = session_in(Mode::LocalMultiplayer);
    assert_eq!(session.turn(), Side::White);

    for (n, (from, to)) in [("e2", "e4"), ("e7", "e5"), ("g1", "f3"), ("b8", "c6")]
        .into_iter()
        .enumerate()
    {
        let side_before = session.turn();
        play(&mut session, from, to);
        assert_eq!(session.turn(), side_before.opponent());
        assert_eq!(session.moves().len(), n + 1);
    }
}

#[test]
fn test_two_move_opening_returns_to_white() {
    // start(local); e2e4; e7e5; log = 2; turn = white.
    let mut session = session_in(Mode::LocalMultiplayer);
    play(&mut session, "e2", "e4");
    play(&mut session, "e7", "e5");

    assert_eq!(session.moves().len(), 2);
    assert_eq!(session.turn(), Side::White);
    assert_eq!(session.phase(), Phase::Active);
    assert_eq!(session.moves()[0].san, "e4");
    assert_eq!(session.moves()[1].san, "e5");
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_select_exposes_pawn_destinations() {
    let mut session = session_in(Mode::VsComputer {
        human: Side::White,
        difficulty: Difficulty::Easy,
    });

    session.handle_square(sq("e2"));
    assert_eq!(session.selection(), Some(sq("e2")));
    let destinations = session.selected_destinations();
    assert_eq!(destinations.len(), 2);
    assert!(destinations.contains(&sq("e3")));
    assert!(destinations.contains(&sq("e4")));
}

#[test]
fn test_move_clears_selection() {
    let mut session = session_in(Mode::LocalMultiplayer);
    play(&mut session, "e2", "e4");
    assert_eq!(session.selection(), None);
    assert!(session.selected_destinations().is_empty());
}

// ============================================================================
// Automated Replies
// ============================================================================

#[test]
fn test_computer_replies_after_human_move() {
    let mut session = session_in(Mode::VsComputer {
        human: Side::White,
        difficulty: Difficulty::Easy,
    });
    assert!(!session.has_pending_reply());

    play(&mut session, "e2", "e3");
    assert!(session.has_pending_reply());
    assert_eq!(session.turn(), Side::Black);

    let reply = session.play_pending_reply().unwrap();
    let reply = reply.expect("scheduled reply should play");
    assert_eq!(reply.mover, Side::Black);
    assert_eq!(session.moves().len(), 2);
    assert_eq!(session.turn(), Side::White);
    assert!(!session.has_pending_reply());
}

#[test]
fn test_computer_opens_when_human_is_black() {
    let mut session = session_in(Mode::VsComputer {
        human: Side::Black,
        difficulty: Difficulty::Hard,
    });

    assert!(session.has_pending_reply());
    let opening = session.play_pending_reply().unwrap().unwrap();
    assert_eq!(opening.mover, Side::White);
    assert_eq!(session.turn(), Side::Black);
}

#[test]
fn test_input_ignored_during_computer_turn() {
    let mut session = session_in(Mode::VsComputer {
        human: Side::White,
        difficulty: Difficulty::Easy,
    });
    play(&mut session, "e2", "e4");

    // It is black's (the computer's) turn; human clicks do nothing.
    session.handle_square(sq("e7"));
    assert_eq!(session.selection(), None);
    session.handle_square(sq("d2"));
    assert_eq!(session.selection(), None);
    assert_eq!(session.moves().len(), 1);
}

#[test]
fn test_restart_invalidates_pending_reply() {
    let mut session = session_in(Mode::VsComputer {
        human: Side::Black,
        difficulty: Difficulty::Easy,
    });
    assert!(session.has_pending_reply());

    // New session before the reply fires; the stale reply must not move.
    session.start(Mode::LocalMultiplayer);
    let replayed = session.play_pending_reply().unwrap();
    assert!(replayed.is_none());
    assert!(session.moves().is_empty());
    assert_eq!(session.turn(), Side::White);
}

// ============================================================================
// Undo
// ============================================================================

#[test]
fn test_undo_local_pops_one() {
    let mut session = session_in(Mode::LocalMultiplayer);
    play(&mut session, "e2", "e4");
    play(&mut session, "e7", "e5");

    session.request_undo();
    assert_eq!(session.moves().len(), 1);
    assert_eq!(session.turn(), Side::Black);

    session.request_undo();
    assert!(session.moves().is_empty());
    assert_eq!(session.turn(), Side::White);

    // Empty log: no-op.
    session.request_undo();
    assert!(session.moves().is_empty());
}

#[test]
fn test_undo_vs_computer_pops_reply_and_human_move() {
    let mut session = session_in(Mode::VsComputer {
        human: Side::White,
        difficulty: Difficulty::Easy,
    });
    play(&mut session, "e2", "e4");
    session.play_pending_reply().unwrap().unwrap();
    assert_eq!(session.moves().len(), 2);

    session.request_undo();
    assert!(session.moves().is_empty());
    assert_eq!(session.turn(), Side::White);
}

#[test]
fn test_undo_before_reply_pops_only_human_move() {
    let mut session = session_in(Mode::VsComputer {
        human: Side::White,
        difficulty: Difficulty::Easy,
    });
    play(&mut session, "e2", "e4");
    assert!(session.has_pending_reply());

    session.request_undo();
    assert!(session.moves().is_empty());
    assert_eq!(session.turn(), Side::White);

    // The scheduled reply answered a move that was taken back.
    assert!(!session.has_pending_reply());
    assert!(session.play_pending_reply().unwrap().is_none());
}

#[test]
fn test_undo_with_pending_reply_reschedules_computer_move() {
    let mut session = session_in(Mode::VsComputer {
        human: Side::White,
        difficulty: Difficulty::Easy,
    });
    play(&mut session, "e2", "e4");
    session.play_pending_reply().unwrap().unwrap();
    play(&mut session, "d2", "d4");
    assert_eq!(session.moves().len(), 3);
    assert!(session.has_pending_reply());

    // Undo takes back the second human move and the computer's reply,
    // leaving the computer on move; a fresh reply must be rescheduled or
    // the human is gated off forever.
    session.request_undo();
    assert_eq!(session.moves().len(), 1);
    assert_eq!(session.turn(), Side::Black);
    assert!(session.has_pending_reply());

    let reply = session.play_pending_reply().unwrap().unwrap();
    assert_eq!(reply.mover, Side::Black);
    assert_eq!(session.moves().len(), 2);
    assert_eq!(session.turn(), Side::White);
}

#[test]
fn test_undo_of_computer_opening_reschedules_it() {
    let mut session = session_in(Mode::VsComputer {
        human: Side::Black,
        difficulty: Difficulty::Easy,
    });
    session.play_pending_reply().unwrap().unwrap();
    assert_eq!(session.turn(), Side::Black);

    // Taking back the opening puts the computer back on move.
    session.request_undo();
    assert!(session.moves().is_empty());
    assert_eq!(session.turn(), Side::White);
    assert!(session.has_pending_reply());

    let opening = session.play_pending_reply().unwrap().unwrap();
    assert_eq!(opening.mover, Side::White);
    assert_eq!(session.moves().len(), 1);
    assert_eq!(session.turn(), Side::Black);
}

// ============================================================================
// Termination and History
// ============================================================================

/// 1. f3 e5 2. g4 Qh4#
fn play_fools_mate(session: &mut Session<ShakmatyRules>) {
    play(session, "f2", "f3");
    play(session, "e7", "e5");
    play(session, "g2", "g4");
    play(session, "d8", "h4");
}

#[test]
fn test_checkmate_terminates_session_and_records_history() {
    let mut session = session_in(Mode::LocalMultiplayer);
    play_fools_mate(&mut session);

    assert_eq!(
        session.outcome(),
        Some(Outcome::Checkmate {
            winner: Side::Black
        })
    );
    assert_eq!(
        session.phase(),
        Phase::Terminal(Outcome::Checkmate {
            winner: Side::Black
        })
    );

    let records = session.history().records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].mode, "1 vs 1");
    assert_eq!(records[0].outcome, "Checkmate! Black wins");
    assert_eq!(records[0].move_count, 4);
}

#[test]
fn test_terminal_is_absorbing() {
    let mut session = session_in(Mode::LocalMultiplayer);
    play_fools_mate(&mut session);
    let outcome = session.outcome();

    // Clicks and undo are refused once terminal.
    session.handle_square(sq("e2"));
    assert_eq!(session.selection(), None);
    session.request_undo();
    assert_eq!(session.moves().len(), 4);
    assert_eq!(session.outcome(), outcome);
}

#[test]
fn test_start_resets_after_terminal() {
    let mut session = session_in(Mode::LocalMultiplayer);
    play_fools_mate(&mut session);

    session.start(Mode::LocalMultiplayer);
    assert_eq!(session.phase(), Phase::Active);
    assert!(session.moves().is_empty());
    assert_eq!(session.turn(), Side::White);
    play(&mut session, "e2", "e4");
}

#[test]
fn test_history_is_bounded_across_sessions() {
    let mut session = session_in(Mode::LocalMultiplayer);
    for _ in 0..13 {
        play_fools_mate(&mut session);
        session.start(Mode::LocalMultiplayer);
    }
    assert_eq!(session.history().len(), 10);
}
