//! Material-only position evaluation.
//!
//! Deliberately free of positional heuristics: the hard selection tier is a
//! one-ply search, and a pure material count keeps its choices predictable
//! enough to test exactly.

use crate::types::{BoardSnapshot, Side};

/// Material balance of the position, white-positive.
pub fn material_balance(board: &BoardSnapshot) -> i32 {
    board
        .occupied()
        .map(|(_, side, kind)| {
            let value = kind.material_value();
            match side {
                Side::White => value,
                Side::Black => -value,
            }
        })
        .sum()
}

/// Material balance oriented so a positive score favors `side_to_move`.
pub fn evaluate(board: &BoardSnapshot, side_to_move: Side) -> i32 {
    let balance = material_balance(board);
    match side_to_move {
        Side::White => balance,
        Side::Black => -balance,
    }
}
