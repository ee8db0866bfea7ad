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

//! `Board`: a `Position` plus the transition operations (`make_move`, `make_move_copy`) that
//! carry it from one ply to the next.

use std::ops::Deref;

use crate::bitboard::Bitboard;
use crate::castling::CastleRights;
use crate::color::Color;
use crate::moves::{Move, MoveType};
use crate::piece::PieceType;
use crate::position::{GameState, Position};
use crate::square::Square;

/// A per-corner rook-toggle mask: XORing it onto both the rook bitboard and the mover's color
/// bitboard slides the rook across the king during a castle, in one step.
struct CastleToggle {
    landing_king_square: Square,
    rook_toggle: Bitboard,
}

const WHITE_KINGSIDE_TOGGLE: CastleToggle = CastleToggle {
    landing_king_square: Square::G1,
    rook_toggle: Bitboard::new((1 << Square::H1 as u8) | (1 << Square::F1 as u8)),
};
const WHITE_QUEENSIDE_TOGGLE: CastleToggle = CastleToggle {
    landing_king_square: Square::C1,
    rook_toggle: Bitboard::new((1 << Square::A1 as u8) | (1 << Square::D1 as u8)),
};
const BLACK_KINGSIDE_TOGGLE: CastleToggle = CastleToggle {
    landing_king_square: Square::G8,
    rook_toggle: Bitboard::new((1 << Square::H8 as u8) | (1 << Square::F8 as u8)),
};
const BLACK_QUEENSIDE_TOGGLE: CastleToggle = CastleToggle {
    landing_king_square: Square::C8,
    rook_toggle: Bitboard::new((1 << Square::A8 as u8) | (1 << Square::D8 as u8)),
};

#[derive(Clone, Copy, PartialEq, Eq)]
/// A `Position` with the move-application behavior attached to it.
pub struct Board {
    pub position: Position,
}

impl Deref for Board {
    type Target = Position;
    fn deref(&self) -> &Position {
        &self.position
    }
}

impl Board {
    #[must_use]
    pub fn new(position: Position) -> Board {
        Board { position }
    }

    #[must_use]
    pub fn new_initial() -> Board {
        Board::new(Position::new_initial())
    }

    #[must_use]
    pub fn game_state(&self) -> GameState {
        self.position.game_state
    }

    /// Apply `mv` to this board in place.
    ///
    /// # Panics
    /// Panics if `mv` claims to be a castle but its destination is not one of the four known
    /// landing squares — an internal invariant breach per the core's error-handling policy.
    pub fn make_move(&mut self, mv: Move) {
        apply_move(&mut self.position, mv);
    }

    #[must_use]
    /// Apply `mv` to a clone of this board's position, leaving `self` untouched.
    pub fn make_move_copy(&self, mv: Move) -> Board {
        let mut copy = self.position;
        apply_move(&mut copy, mv);
        Board::new(copy)
    }
}

fn apply_move(pos: &mut Position, mv: Move) {
    let src = mv.from_square();
    let dst = mv.to_square();
    let src_type = mv.src_piece();
    let src_color = mv.src_color();
    let move_type = mv.move_type();

    let move_mask = Bitboard::from(src) | Bitboard::from(dst);

    // 1. Toggle the moving piece between source and destination.
    pos.piece_occ[src_type.index()] ^= move_mask;
    pos.color_occ[src_color.index()] ^= move_mask;

    // 2. Remove a captured piece, if any. En passant captures a pawn that is not on `dst`.
    if move_type == MoveType::EnPassant {
        let captured_square = match src_color {
            Color::White => dst - crate::direction::Direction::NORTH,
            Color::Black => dst + crate::direction::Direction::NORTH,
        };
        let captured_mask = Bitboard::from(captured_square);
        pos.piece_occ[PieceType::Pawn.index()] ^= captured_mask;
        pos.color_occ[(!src_color).index()] ^= captured_mask;
    } else {
        let dst_type = mv.dst_piece();
        if dst_type != PieceType::Empty {
            let dst_color = mv.dst_color();
            pos.piece_occ[dst_type.index()] ^= Bitboard::from(dst);
            pos.color_occ[dst_color.index()] ^= Bitboard::from(dst);
        }
    }

    // 3. Clear the en-passant target; it is only ever live for the single ply after a double
    //    push, and is possibly re-set by effect 6 below.
    pos.ep_target = None;

    // 4. Fullmove number increments once Black has moved.
    if src_color == Color::Black {
        pos.fullmove_number += 1;
    }

    // 5. Halfmove clock.
    if move_type.resets_halfmove_clock() {
        pos.halfmove_clock = 0;
    } else {
        pos.halfmove_clock += 1;
    }

    // 6. Double pawn push sets the en-passant target behind the pawn.
    if move_type == MoveType::PawnMove {
        let delta = dst as i16 - src as i16;
        if delta == 16 {
            pos.ep_target = Some(src + crate::direction::Direction::NORTH);
        } else if delta == -16 {
            pos.ep_target = Some(src + crate::direction::Direction::SOUTH);
        }
    }

    // 7. Fifty-move (100-ply) rule. The original source compared against 50, a bug; this
    //    implementation uses the corrected 100-ply threshold (see DESIGN.md open question #1).
    if pos.halfmove_clock >= 100 {
        pos.game_state = GameState::Draw;
    }

    // 8. Castle-right updates.
    if src_type == PieceType::King {
        pos.castle_rights &= !CastleRights::for_color(src_color);
    }
    clear_rights_if_rook_home(pos, src);
    // Corrected per DESIGN.md open question #4: a capture landing on a rook's home square also
    // clears that corner's right, even though the captured rook itself never "moved".
    if mv.is_capture() && move_type != MoveType::EnPassant {
        clear_rights_if_rook_home(pos, dst);
    }

    // 9. Slide the rook across the king for a castle.
    match move_type {
        MoveType::KingCastle | MoveType::QueenCastle => {
            let toggle = castle_toggle(src_color, move_type);
            assert_eq!(
                dst, toggle.landing_king_square,
                "castle destination {dst} does not match the known landing square for this castle"
            );
            pos.piece_occ[PieceType::Rook.index()] ^= toggle.rook_toggle;
            pos.color_occ[src_color.index()] ^= toggle.rook_toggle;
        }
        _ => {}
    }

    // 10. Flip side to move.
    pos.white_to_move = !pos.white_to_move;
}

fn clear_rights_if_rook_home(pos: &mut Position, sq: Square) {
    match sq {
        Square::H1 => pos.castle_rights &= !CastleRights::WHITE_KINGSIDE,
        Square::A1 => pos.castle_rights &= !CastleRights::WHITE_QUEENSIDE,
        Square::H8 => pos.castle_rights &= !CastleRights::BLACK_KINGSIDE,
        Square::A8 => pos.castle_rights &= !CastleRights::BLACK_QUEENSIDE,
        _ => {}
    }
}

fn castle_toggle(color: Color, move_type: MoveType) -> &'static CastleToggle {
    match (color, move_type) {
        (Color::White, MoveType::KingCastle) => &WHITE_KINGSIDE_TOGGLE,
        (Color::White, MoveType::QueenCastle) => &WHITE_QUEENSIDE_TOGGLE,
        (Color::Black, MoveType::KingCastle) => &BLACK_KINGSIDE_TOGGLE,
        (Color::Black, MoveType::QueenCastle) => &BLACK_QUEENSIDE_TOGGLE,
        _ => unreachable!("castle_toggle called with a non-castle move type"),
    }
}
