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

//! A minimal FEN loader and writer. This exists to give tests a compact way to stand up
//! arbitrary positions; it is not a general-purpose PGN/EPD toolkit.

use crate::castling::CastleRights;
use crate::color::Color;
use crate::piece::PieceType;
use crate::position::{GameState, Position};
use crate::square::Square;

/// The starting position of a standard game.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn piece_code(pt: PieceType) -> char {
    match pt {
        PieceType::Pawn => 'P',
        PieceType::Knight => 'N',
        PieceType::Bishop => 'B',
        PieceType::Rook => 'R',
        PieceType::Queen => 'Q',
        PieceType::King => 'K',
        PieceType::Empty => unreachable!("no FEN code for an empty square"),
    }
}

fn piece_from_code(c: char) -> Option<PieceType> {
    match c.to_ascii_uppercase() {
        'P' => Some(PieceType::Pawn),
        'N' => Some(PieceType::Knight),
        'B' => Some(PieceType::Bishop),
        'R' => Some(PieceType::Rook),
        'Q' => Some(PieceType::Queen),
        'K' => Some(PieceType::King),
        _ => None,
    }
}

/// Parse a FEN string into a `Position`.
///
/// # Errors
/// Returns a message describing the first malformed field encountered.
pub fn parse_fen(fen: &str) -> Result<Position, &'static str> {
    let mut fields = fen.split_whitespace();
    let placement = fields.next().ok_or("FEN is missing the board field")?;
    let side = fields.next().ok_or("FEN is missing the side-to-move field")?;
    let castling = fields.next().ok_or("FEN is missing the castling field")?;
    let ep = fields.next().ok_or("FEN is missing the en-passant field")?;
    let halfmove = fields.next().unwrap_or("0");
    let fullmove = fields.next().unwrap_or("1");

    let mut pos = Position {
        color_occ: [crate::bitboard::Bitboard::EMPTY; 2],
        piece_occ: [crate::bitboard::Bitboard::EMPTY; PieceType::NUM_TYPES],
        white_to_move: true,
        castle_rights: CastleRights::NONE,
        ep_target: None,
        halfmove_clock: 0,
        fullmove_number: 1,
        game_state: GameState::InProgress,
    };

    let mut rank = 7i8;
    let mut file_from_a = 0u8; // 0 = a-file, 7 = h-file, as FEN lists them left to right
    for row in placement.split('/') {
        if rank < 0 {
            return Err("FEN board field has too many ranks");
        }
        file_from_a = 0;
        for c in row.chars() {
            if let Some(skip) = c.to_digit(10) {
                file_from_a += skip as u8;
                continue;
            }
            if file_from_a >= 8 {
                return Err("FEN board field has too many files in some rank");
            }
            let pt = piece_from_code(c).ok_or("unrecognized piece code in FEN")?;
            let color = if c.is_uppercase() { Color::White } else { Color::Black };
            // FEN's file order is a..h; this crate's file index is h=0..a=7, so invert.
            let file = 7 - file_from_a;
            let sq = Square::new(rank as u8, file).ok_or("invalid square while parsing FEN")?;
            pos.piece_occ[pt.index()] |= crate::bitboard::Bitboard::from(sq);
            pos.color_occ[color.index()] |= crate::bitboard::Bitboard::from(sq);
            file_from_a += 1;
        }
        if file_from_a != 8 {
            return Err("FEN rank did not total 8 files");
        }
        rank -= 1;
    }
    if rank != -1 {
        return Err("FEN board field has too few ranks");
    }

    pos.white_to_move = match side {
        "w" => true,
        "b" => false,
        _ => return Err("FEN side-to-move field must be 'w' or 'b'"),
    };

    if castling != "-" {
        for c in castling.chars() {
            pos.castle_rights |= match c {
                'K' => CastleRights::WHITE_KINGSIDE,
                'Q' => CastleRights::WHITE_QUEENSIDE,
                'k' => CastleRights::BLACK_KINGSIDE,
                'q' => CastleRights::BLACK_QUEENSIDE,
                _ => return Err("unrecognized character in FEN castling field"),
            };
        }
    }

    pos.ep_target = if ep == "-" {
        None
    } else {
        Some(Square::from_algebraic(ep).map_err(|_| "invalid en-passant square in FEN")?)
    };

    pos.halfmove_clock = halfmove.parse().map_err(|_| "invalid halfmove clock in FEN")?;
    pos.fullmove_number = fullmove.parse().map_err(|_| "invalid fullmove number in FEN")?;

    Ok(pos)
}

#[must_use]
/// Render a `Position` back to FEN.
pub fn to_fen(pos: &Position) -> String {
    let mut s = String::new();
    for rank in (0..8i8).rev() {
        let mut empty_run = 0u8;
        // Walk files in FEN's a..h order, which is this crate's file 7..0.
        for file in (0..=7u8).rev() {
            let sq = Square::new(rank as u8, file).expect("rank/file in range");
            match pos.piece_at(sq) {
                None => empty_run += 1,
                Some((pt, color)) => {
                    if empty_run > 0 {
                        s.push_str(&empty_run.to_string());
                        empty_run = 0;
                    }
                    let code = piece_code(pt);
                    s.push(if color == Color::White { code } else { code.to_ascii_lowercase() });
                }
            }
        }
        if empty_run > 0 {
            s.push_str(&empty_run.to_string());
        }
        if rank != 0 {
            s.push('/');
        }
    }

    s.push(' ');
    s.push(if pos.white_to_move { 'w' } else { 'b' });

    s.push(' ');
    if pos.castle_rights == CastleRights::NONE {
        s.push('-');
    } else {
        if pos.castle_rights.has_kingside(Color::White) {
            s.push('K');
        }
        if pos.castle_rights.has_queenside(Color::White) {
            s.push('Q');
        }
        if pos.castle_rights.has_kingside(Color::Black) {
            s.push('k');
        }
        if pos.castle_rights.has_queenside(Color::Black) {
            s.push('q');
        }
    }

    s.push(' ');
    match pos.ep_target {
        Some(sq) => s.push_str(&sq.to_string()),
        None => s.push('-'),
    }

    s.push(' ');
    s.push_str(&pos.halfmove_clock.to_string());
    s.push(' ');
    s.push_str(&pos.fullmove_number.to_string());

    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_fen_round_trips() {
        let pos = parse_fen(STARTING_FEN).unwrap();
        assert_eq!(to_fen(&pos), STARTING_FEN);
    }

    #[test]
    fn starting_fen_matches_new_initial() {
        let parsed = parse_fen(STARTING_FEN).unwrap();
        let hardcoded = Position::new_initial();
        assert_eq!(parsed.color_occ, hardcoded.color_occ);
        assert_eq!(parsed.piece_occ, hardcoded.piece_occ);
        assert_eq!(parsed.castle_rights, hardcoded.castle_rights);
    }

    #[test]
    fn en_passant_square_parses() {
        let fen = "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3";
        let pos = parse_fen(fen).unwrap();
        assert_eq!(pos.ep_target, Some(Square::D6));
    }

    #[test]
    fn malformed_fen_is_rejected() {
        assert!(parse_fen("not a fen").is_err());
    }
}
