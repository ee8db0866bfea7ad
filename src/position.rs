/*
  Fiddler, a UCI-compatible chess engine.
  Copyright (C) 2022 Clayton Ramsey.

  Fiddler is free software: you can redistribute it and/or modify
  it under the terms of the GNU General Public License as published by
  the Free Software Foundation, either version 3 of the License, or
  (at your option) any later version.

  Fiddler is distributed in the hope that it will be useful,
  but WITHOUT ANY WARRANTY; without even the implied warranty of
  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
  GNU General Public License for more details.

  You should have received a copy of the GNU General Public License
  along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/

//! `Position`: the pure-data snapshot of a chess game at one point in time.
//!
//! A `Position` carries no behavior of its own beyond simple occupancy queries; the transition
//! operations that turn one `Position` into the next live on `Board` (see `crate::board`).

use crate::bitboard::Bitboard;
use crate::castling::CastleRights;
use crate::color::Color;
use crate::piece::PieceType;
use crate::square::Square;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Whether, and how, the game embodied by a `Position` has ended.
pub enum GameState {
    InProgress,
    Draw,
    WhiteWins,
    BlackWins,
}

#[derive(Clone, Copy, PartialEq, Eq)]
/// A complete, self-contained snapshot of a chess game: piece placement, side to move, castling
/// rights, en-passant target, and the two move counters.
///
/// Every field is a fixed-size array or scalar; there are no keyed containers. `piece_occ` is
/// indexed by `PieceType::index()` (pawn=0 .. king=5); `color_occ` is indexed by `Color::index()`.
pub struct Position {
    /// Squares occupied by each color, indexed by `Color::index()`.
    pub color_occ: [Bitboard; 2],
    /// Squares occupied by each piece type (any color), indexed by `PieceType::index()`.
    pub piece_occ: [Bitboard; PieceType::NUM_TYPES],
    /// `true` if it is White's turn to move.
    pub white_to_move: bool,
    /// Remaining castling rights for both sides.
    pub castle_rights: CastleRights,
    /// The square a pawn may capture onto en passant this ply, if any.
    pub ep_target: Option<Square>,
    /// Plies since the last pawn move or capture.
    pub halfmove_clock: u32,
    /// Starts at 1 and increments after Black's move.
    pub fullmove_number: u32,
    /// Whether the game has concluded, and how.
    pub game_state: GameState,
}

impl Position {
    #[must_use]
    /// Construct the standard chess starting position.
    pub fn new_initial() -> Position {
        // Bitboard literals below are written as rank-8-down-to-rank-1, H-file-to-A-file per
        // byte, matching the square convention: bit 0 = h1 ... bit 63 = a8.
        let white_pawns = Bitboard::new(0x0000_0000_0000_FF00);
        let black_pawns = Bitboard::new(0x00FF_0000_0000_0000);
        let white_knights = Bitboard::new(0x0000_0000_0000_0042);
        let black_knights = Bitboard::new(0x4200_0000_0000_0000);
        let white_bishops = Bitboard::new(0x0000_0000_0000_0024);
        let black_bishops = Bitboard::new(0x2400_0000_0000_0000);
        let white_rooks = Bitboard::new(0x0000_0000_0000_0081);
        let black_rooks = Bitboard::new(0x8100_0000_0000_0000);
        let white_queen = Bitboard::new(0x0000_0000_0000_0010);
        let black_queen = Bitboard::new(0x1000_0000_0000_0000);
        let white_king = Bitboard::new(0x0000_0000_0000_0008);
        let black_king = Bitboard::new(0x0800_0000_0000_0000);

        let white = white_pawns
            | white_knights
            | white_bishops
            | white_rooks
            | white_queen
            | white_king;
        let black = black_pawns
            | black_knights
            | black_bishops
            | black_rooks
            | black_queen
            | black_king;

        let mut piece_occ = [Bitboard::EMPTY; PieceType::NUM_TYPES];
        piece_occ[PieceType::Pawn.index()] = white_pawns | black_pawns;
        piece_occ[PieceType::Knight.index()] = white_knights | black_knights;
        piece_occ[PieceType::Bishop.index()] = white_bishops | black_bishops;
        piece_occ[PieceType::Rook.index()] = white_rooks | black_rooks;
        piece_occ[PieceType::Queen.index()] = white_queen | black_queen;
        piece_occ[PieceType::King.index()] = white_king | black_king;

        Position {
            color_occ: [white, black],
            piece_occ,
            white_to_move: true,
            castle_rights: CastleRights::ALL,
            ep_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            game_state: GameState::InProgress,
        }
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        if self.white_to_move {
            Color::White
        } else {
            Color::Black
        }
    }

    #[inline]
    #[must_use]
    pub fn occupied(&self) -> Bitboard {
        self.color_occ[Color::White.index()] | self.color_occ[Color::Black.index()]
    }

    #[inline]
    #[must_use]
    pub fn empty(&self) -> Bitboard {
        !self.occupied()
    }

    #[must_use]
    /// The piece type and color occupying `sq`, or `None` if the square is empty.
    pub fn piece_at(&self, sq: Square) -> Option<(PieceType, Color)> {
        let bb = Bitboard::from(sq);
        if (self.occupied() & bb).is_empty() {
            return None;
        }
        let color = if (self.color_occ[Color::White.index()] & bb).is_empty() {
            Color::Black
        } else {
            Color::White
        };
        for i in 0..PieceType::NUM_TYPES {
            if (self.piece_occ[i] & bb) != Bitboard::EMPTY {
                return Some((PieceType::from_index(i), color));
            }
        }
        None
    }

    #[must_use]
    pub fn color_bb(&self, color: Color) -> Bitboard {
        self.color_occ[color.index()]
    }

    #[must_use]
    pub fn piece_bb(&self, pt: PieceType) -> Bitboard {
        self.piece_occ[pt.index()]
    }

    #[must_use]
    pub fn pieces_of(&self, pt: PieceType, color: Color) -> Bitboard {
        self.piece_bb(pt) & self.color_bb(color)
    }

    #[must_use]
    pub fn king_square(&self, color: Color) -> Square {
        let kings = self.pieces_of(PieceType::King, color);
        // SAFETY: the invariant guarantees exactly one king bit for a non-terminal position.
        unsafe { Square::unsafe_from(kings) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_position_invariants_hold() {
        let pos = Position::new_initial();
        assert_eq!(
            pos.color_occ[0] & pos.color_occ[1],
            Bitboard::EMPTY
        );
        let mut union = Bitboard::EMPTY;
        for bb in pos.piece_occ {
            union |= bb;
        }
        assert_eq!(union, pos.occupied());
        assert_eq!(pos.pieces_of(PieceType::King, Color::White).len(), 1);
        assert_eq!(pos.pieces_of(PieceType::King, Color::Black).len(), 1);
    }

    #[test]
    fn initial_piece_placement_matches_fen_layout() {
        let pos = Position::new_initial();
        assert_eq!(pos.piece_at(Square::E1), Some((PieceType::King, Color::White)));
        assert_eq!(pos.piece_at(Square::E8), Some((PieceType::King, Color::Black)));
        assert_eq!(pos.piece_at(Square::A1), Some((PieceType::Rook, Color::White)));
        assert_eq!(pos.piece_at(Square::H8), Some((PieceType::Rook, Color::Black)));
        assert_eq!(pos.piece_at(Square::E4), None);
    }

    #[test]
    fn initial_castle_rights_are_all_granted() {
        let pos = Position::new_initial();
        assert_eq!(pos.castle_rights, CastleRights::ALL);
    }
}
