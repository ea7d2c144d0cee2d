//! Static material count.

use chess_core::{Board, Color, Role};

/// Piece weights in centipawns.
pub const PIECE_VALUES: [(Role, i32); 6] = [
    (Role::Pawn, 100),
    (Role::Knight, 320),
    (Role::Bishop, 330),
    (Role::Rook, 500),
    (Role::Queen, 900),
    (Role::King, 20_000),
];

/// Total weight of one side's pieces.
#[must_use]
pub fn side_material(board: &Board, color: Color) -> i32 {
    PIECE_VALUES
        .iter()
        .map(|&(role, value)| board.count(color, role) as i32 * value)
        .sum()
}

/// White material minus Black material.
#[must_use]
pub fn material_balance(board: &Board) -> i32 {
    side_material(board, Color::White) - side_material(board, Color::Black)
}
