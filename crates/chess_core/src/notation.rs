//! Long algebraic move notation (`e2e4`, `e7e8q`) and SAN rendering.

use crate::{board::Position, error::ChessError, movegen::legal_moves, types::*};

pub fn move_to_uci(mv: Move) -> String {
    mv.to_string()
}

/// Squares and promotion read from text, before any legality check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveText {
    pub from: u8,
    pub to: u8,
    pub promo: Option<PieceKind>,
}

/// Syntactic parse of a 4–5 character move. Case-insensitive.
pub fn parse_move_text(txt: &str) -> Result<MoveText, ChessError> {
    let txt = txt.trim();
    let invalid = || ChessError::InvalidNotation(format!("'{txt}' is not a move"));
    if !txt.is_ascii() || !(4..=5).contains(&txt.len()) {
        return Err(invalid());
    }
    let from = coord_to_sq(&txt[0..2]).ok_or_else(invalid)?;
    let to = coord_to_sq(&txt[2..4]).ok_or_else(invalid)?;
    let promo = match txt[4..].chars().next() {
        None => None,
        Some(c) => match PieceKind::from_char(c) {
            Some(k) if PieceKind::PROMOTIONS.contains(&k) => Some(k),
            _ => return Err(invalid()),
        },
    };
    if from == to {
        return Err(invalid());
    }
    Ok(MoveText { from, to, promo })
}

/// Parse and resolve a move against the legal moves of `pos`, so the
/// returned move carries the correct capture/castle/en-passant flags.
pub fn parse_move(pos: &Position, txt: &str) -> Result<Move, ChessError> {
    let MoveText { from, to, promo } = parse_move_text(txt)?;
    let legals = legal_moves(pos);
    if let Some(&mv) = legals.iter().find(|m| m.same_as(from, to, promo)) {
        return Ok(mv);
    }
    let wanted = txt.trim().to_ascii_lowercase();
    if promo.is_none() && legals.iter().any(|m| m.from == from && m.to == to) {
        return Err(ChessError::AmbiguousPromotion(wanted));
    }
    Err(ChessError::IllegalMove(wanted))
}

/// Standard algebraic notation, including check and mate suffixes.
pub fn to_san(pos: &Position, mv: Move) -> String {
    let Some(piece) = pos.piece_at(mv.from) else {
        return mv.to_string();
    };

    let mut san = if mv.is_castle {
        if mv.to > mv.from { "O-O" } else { "O-O-O" }.to_string()
    } else {
        let mut san = String::new();
        if piece.kind != PieceKind::Pawn {
            san.push(piece.kind.to_char().to_ascii_uppercase());
            // Disambiguate between identical pieces reaching the same square.
            let rivals: Vec<Move> = legal_moves(pos)
                .into_iter()
                .filter(|m| {
                    m.to == mv.to && m.from != mv.from && pos.piece_at(m.from) == Some(piece)
                })
                .collect();
            if !rivals.is_empty() {
                let from = sq_to_coord(mv.from);
                if rivals.iter().all(|m| file_of(m.from) != file_of(mv.from)) {
                    san.push_str(&from[0..1]);
                } else if rivals.iter().all(|m| rank_of(m.from) != rank_of(mv.from)) {
                    san.push_str(&from[1..2]);
                } else {
                    san.push_str(&from);
                }
            }
        }
        if mv.is_capture {
            if piece.kind == PieceKind::Pawn {
                san.push_str(&sq_to_coord(mv.from)[0..1]);
            }
            san.push('x');
        }
        san.push_str(&sq_to_coord(mv.to));
        if let Some(promo) = mv.promo {
            san.push('=');
            san.push(promo.to_char().to_ascii_uppercase());
        }
        san
    };

    if let Ok(next) = pos.apply(mv)
        && next.in_check(next.side_to_move)
    {
        san.push(if legal_moves(&next).is_empty() { '#' } else { '+' });
    }
    san
}

#[cfg(test)]
#[path = "notation_tests.rs"]
mod notation_tests;
