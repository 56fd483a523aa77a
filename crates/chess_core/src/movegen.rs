use crate::{board::CastlingRights, board::Position, types::*};

pub(crate) const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (-1, 2),
    (-2, 1),
    (1, -2),
    (2, -1),
    (-1, -2),
    (-2, -1),
];
pub(crate) const KING_DELTAS: [(i8, i8); 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];
pub(crate) const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub(crate) const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Generate all legal moves, returning a freshly allocated vector.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let mut tmp = pos.clone();
    let mut out = Vec::with_capacity(64);
    legal_moves_into(&mut tmp, &mut out);
    out
}

/// Generate all legal moves into the provided buffer, reusing it across calls.
///
/// `pos` is used as scratch space and is restored before returning.
pub fn legal_moves_into(pos: &mut Position, out: &mut Vec<Move>) {
    out.clear();
    pseudo_moves(pos, out);

    let mover = pos.side_to_move;
    out.retain(|&mv| {
        let undo = pos.make_move(mv);
        let illegal = pos.in_check(mover);
        pos.unmake_move(mv, undo);
        !illegal
    });
}

/// True when the side to move has at least one legal move.
pub fn has_legal_move(pos: &Position) -> bool {
    !legal_moves(pos).is_empty()
}

fn pseudo_moves(pos: &Position, out: &mut Vec<Move>) {
    for from in 0..64u8 {
        let Some(pc) = pos.piece_at(from) else { continue };
        if pc.color != pos.side_to_move {
            continue;
        }
        match pc.kind {
            PieceKind::Pawn => gen_pawn(pos, from, pc.color, out),
            PieceKind::Knight => gen_steps(pos, from, pc.color, &KNIGHT_DELTAS, out),
            PieceKind::Bishop => gen_slider(pos, from, pc.color, &DIAGONALS, out),
            PieceKind::Rook => gen_slider(pos, from, pc.color, &ORTHOGONALS, out),
            PieceKind::Queen => {
                gen_slider(pos, from, pc.color, &DIAGONALS, out);
                gen_slider(pos, from, pc.color, &ORTHOGONALS, out);
            }
            PieceKind::King => {
                gen_steps(pos, from, pc.color, &KING_DELTAS, out);
                gen_castle(pos, from, pc.color, out);
            }
        }
    }
}

fn push_pawn_move(mut mv: Move, promo_rank: i8, out: &mut Vec<Move>) {
    if rank_of(mv.to) == promo_rank {
        for pk in PieceKind::PROMOTIONS {
            mv.promo = Some(pk);
            out.push(mv);
        }
    } else {
        out.push(mv);
    }
}

fn gen_pawn(pos: &Position, from: u8, c: Color, out: &mut Vec<Move>) {
    let f = file_of(from);
    let r = rank_of(from);
    let (dir, start_rank, promo_rank) = match c {
        Color::White => (1, 1, 7),
        Color::Black => (-1, 6, 0),
    };

    if let Some(to) = sq(f, r + dir)
        && pos.piece_at(to).is_none()
    {
        push_pawn_move(Move::new(from, to), promo_rank, out);

        if r == start_rank
            && let Some(to2) = sq(f, r + 2 * dir)
            && pos.piece_at(to2).is_none()
        {
            out.push(Move::new(from, to2));
        }
    }

    for df in [-1, 1] {
        let Some(to) = sq(f + df, r + dir) else { continue };
        match pos.piece_at(to) {
            Some(target) if target.color != c => {
                let mut mv = Move::new(from, to);
                mv.is_capture = true;
                push_pawn_move(mv, promo_rank, out);
            }
            None if pos.en_passant == Some(to) => {
                let mut mv = Move::new(from, to);
                mv.is_capture = true;
                mv.is_en_passant = true;
                out.push(mv);
            }
            _ => {}
        }
    }
}

fn gen_steps(pos: &Position, from: u8, c: Color, deltas: &[(i8, i8)], out: &mut Vec<Move>) {
    let f = file_of(from);
    let r = rank_of(from);
    for (df, dr) in deltas {
        let Some(to) = sq(f + df, r + dr) else { continue };
        match pos.piece_at(to) {
            None => out.push(Move::new(from, to)),
            Some(pc) if pc.color != c => {
                let mut mv = Move::new(from, to);
                mv.is_capture = true;
                out.push(mv);
            }
            _ => {}
        }
    }
}

fn gen_slider(pos: &Position, from: u8, c: Color, dirs: &[(i8, i8)], out: &mut Vec<Move>) {
    let f0 = file_of(from);
    let r0 = rank_of(from);
    for (df, dr) in dirs {
        let mut f = f0 + df;
        let mut r = r0 + dr;
        while let Some(to) = sq(f, r) {
            match pos.piece_at(to) {
                None => out.push(Move::new(from, to)),
                Some(pc) if pc.color != c => {
                    let mut mv = Move::new(from, to);
                    mv.is_capture = true;
                    out.push(mv);
                    break;
                }
                _ => break,
            }
            f += df;
            r += dr;
        }
    }
}

fn gen_castle(pos: &Position, from: u8, c: Color, out: &mut Vec<Move>) {
    let (home, king_side, queen_side) = match c {
        Color::White => (4u8, CastlingRights::WHITE_KING, CastlingRights::WHITE_QUEEN),
        Color::Black => (60u8, CastlingRights::BLACK_KING, CastlingRights::BLACK_QUEEN),
    };
    if from != home || pos.in_check(c) {
        return;
    }
    let enemy = c.other();
    let empty = |squares: &[u8]| squares.iter().all(|&s| pos.piece_at(s).is_none());
    let safe = |squares: &[u8]| squares.iter().all(|&s| !pos.is_square_attacked(s, enemy));
    let rook_on = |s: u8| pos.piece_at(s) == Some(Piece::new(c, PieceKind::Rook));

    // The king may not pass through an attacked square; the b-file only has to be empty.
    if pos.castling.has(king_side)
        && rook_on(home + 3)
        && empty(&[home + 1, home + 2])
        && safe(&[home + 1, home + 2])
    {
        let mut mv = Move::new(home, home + 2);
        mv.is_castle = true;
        out.push(mv);
    }
    if pos.castling.has(queen_side)
        && rook_on(home - 4)
        && empty(&[home - 1, home - 2, home - 3])
        && safe(&[home - 1, home - 2])
    {
        let mut mv = Move::new(home, home - 2);
        mv.is_castle = true;
        out.push(mv);
    }
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
