//! Deferred automated-reply bookkeeping.
//!
//! The automated opponent's move is never computed inside the triggering
//! event; the session records a pending reply that the driver plays after a
//! cosmetic delay. Each pending reply is stamped with the session generation
//! that scheduled it, so a reply left over from a finished session can never
//! mutate its successor.

use std::time::Duration;

/// Cosmetic pacing between a human move and the automated reply.
///
/// Purely presentational: drivers may honor it or play the reply
/// immediately; correctness only depends on the turn-gating in the session.
pub const REPLY_DELAY: Duration = Duration::from_millis(500);

/// A scheduled automated reply, tagged with its session generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingReply {
    generation: u64,
}

impl PendingReply {
    /// The session generation this reply was scheduled under.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Holds at most one pending reply.
#[derive(Debug, Default)]
pub struct ReplySlot {
    pending: Option<PendingReply>,
}

impl ReplySlot {
    /// Schedule a reply for `generation`. Refused (returns `false`) when one
    /// is already pending, so a move can never be answered twice.
    pub fn request(&mut self, generation: u64) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(PendingReply { generation });
        true
    }

    /// Take the pending reply, leaving the slot empty.
    pub fn take(&mut self) -> Option<PendingReply> {
        self.pending.take()
    }

    /// Whether a reply is waiting to be played.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any pending reply without playing it.
    pub fn clear(&mut self) {
        self.pending = None;
    }
}
