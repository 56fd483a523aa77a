use crate::error::ChessError;
use crate::movegen::{DIAGONALS, KING_DELTAS, KNIGHT_DELTAS, ORTHOGONALS, legal_moves};
use crate::types::*;
use crate::zobrist::ZOBRIST;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Castling rights packed into four bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const WHITE_KING: u8 = 0b0001;
    pub const WHITE_QUEEN: u8 = 0b0010;
    pub const BLACK_KING: u8 = 0b0100;
    pub const BLACK_QUEEN: u8 = 0b1000;

    pub const fn none() -> Self {
        Self(0)
    }
    pub const fn all() -> Self {
        Self(0b1111)
    }
    pub fn bits(self) -> u8 {
        self.0
    }
    pub fn has(self, flag: u8) -> bool {
        self.0 & flag != 0
    }
    pub fn insert(&mut self, flag: u8) {
        self.0 |= flag;
    }
    pub fn remove(&mut self, flag: u8) {
        self.0 &= !flag;
    }

    /// Drop every right tied to `sq` (a king or rook home square).
    fn touch(&mut self, sq: u8) {
        match sq {
            0 => self.remove(Self::WHITE_QUEEN),
            7 => self.remove(Self::WHITE_KING),
            4 => self.remove(Self::WHITE_KING | Self::WHITE_QUEEN),
            56 => self.remove(Self::BLACK_QUEEN),
            63 => self.remove(Self::BLACK_KING),
            60 => self.remove(Self::BLACK_KING | Self::BLACK_QUEEN),
            _ => {}
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub board: [Option<Piece>; 64],
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<u8>, // square behind a pawn that just advanced 2
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

/// State needed to take back a move made with `make_move`.
#[derive(Clone, Debug)]
pub(crate) struct Undo {
    captured: Option<Piece>,
    castling: CastlingRights,
    en_passant: Option<u8>,
    halfmove_clock: u32,
    fullmove_number: u32,
    moved_piece: Piece,
    rook_move: Option<(u8, u8)>, // (rook_from, rook_to) for castling
    ep_captured_sq: Option<u8>,  // square actually captured in en-passant
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl Position {
    pub fn startpos() -> Self {
        let mut p = Position {
            board: [None; 64],
            side_to_move: Color::White,
            castling: CastlingRights::all(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        };

        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (f, &kind) in back.iter().enumerate() {
            p.board[f] = Some(Piece::new(Color::White, kind));
            p.board[8 + f] = Some(Piece::new(Color::White, PieceKind::Pawn));
            p.board[48 + f] = Some(Piece::new(Color::Black, PieceKind::Pawn));
            p.board[56 + f] = Some(Piece::new(Color::Black, kind));
        }
        p
    }

    /// Parse Forsyth-Edwards Notation. The move counters may be omitted.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let bad = |why: &str| ChessError::InvalidNotation(format!("{why} in FEN '{fen}'"));

        let parts: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&parts.len()) {
            return Err(bad("expected 4 to 6 fields"));
        }

        let mut board = [None; 64];
        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(bad("expected 8 ranks"));
        }
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank: i8 = 7 - rank_idx as i8; // FEN lists rank 8 .. 1
            let mut file: i8 = 0;
            for ch in rank_str.chars() {
                if let Some(d) = ch.to_digit(10) {
                    if !(1..=8).contains(&d) {
                        return Err(bad("bad empty-square count"));
                    }
                    file += d as i8;
                } else {
                    let kind = PieceKind::from_char(ch).ok_or_else(|| bad("bad piece letter"))?;
                    let color = if ch.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    let s = sq(file, rank).ok_or_else(|| bad("too many squares in a rank"))?;
                    if kind == PieceKind::Pawn && (rank == 0 || rank == 7) {
                        return Err(bad("pawn on a back rank"));
                    }
                    board[s as usize] = Some(Piece::new(color, kind));
                    file += 1;
                }
                if file > 8 {
                    return Err(bad("too many squares in a rank"));
                }
            }
            if file != 8 {
                return Err(bad("too few squares in a rank"));
            }
        }

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(bad("bad side to move")),
        };

        let mut castling = CastlingRights::none();
        if parts[2] != "-" {
            for c in parts[2].chars() {
                let flag = match c {
                    'K' => CastlingRights::WHITE_KING,
                    'Q' => CastlingRights::WHITE_QUEEN,
                    'k' => CastlingRights::BLACK_KING,
                    'q' => CastlingRights::BLACK_QUEEN,
                    _ => return Err(bad("bad castling field")),
                };
                castling.insert(flag);
            }
        }

        let en_passant = match parts[3] {
            "-" => None,
            s => {
                let ep = coord_to_sq(s).ok_or_else(|| bad("bad en-passant square"))?;
                let expected_rank = match side_to_move {
                    Color::White => 5,
                    Color::Black => 2,
                };
                if rank_of(ep) != expected_rank {
                    return Err(bad("en-passant square on the wrong rank"));
                }
                Some(ep)
            }
        };

        let halfmove_clock = match parts.get(4) {
            Some(s) => s.parse().map_err(|_| bad("bad halfmove clock"))?,
            None => 0,
        };
        let fullmove_number = match parts.get(5) {
            Some(s) => s.parse().map_err(|_| bad("bad fullmove number"))?,
            None => 1,
        };

        let pos = Position {
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        };
        for color in [Color::White, Color::Black] {
            if pos.count(color, PieceKind::King) != 1 {
                return Err(bad("each side needs exactly one king"));
            }
        }
        if pos.in_check(side_to_move.other()) {
            return Err(bad("side not to move is in check"));
        }
        Ok(pos)
    }

    pub fn to_fen(&self) -> String {
        let mut out = String::with_capacity(90);
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.board[rank * 8 + file] {
                    Some(pc) => {
                        if empty > 0 {
                            out.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        out.push(pc.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push(char::from(b'0' + empty));
            }
            if rank > 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        out.push(' ');
        if self.castling.bits() == 0 {
            out.push('-');
        } else {
            for (flag, c) in [
                (CastlingRights::WHITE_KING, 'K'),
                (CastlingRights::WHITE_QUEEN, 'Q'),
                (CastlingRights::BLACK_KING, 'k'),
                (CastlingRights::BLACK_QUEEN, 'q'),
            ] {
                if self.castling.has(flag) {
                    out.push(c);
                }
            }
        }

        out.push(' ');
        match self.en_passant {
            Some(ep) => out.push_str(&sq_to_coord(ep)),
            None => out.push('-'),
        }

        out.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        out
    }

    pub fn king_sq(&self, c: Color) -> Option<u8> {
        (0..64u8).find(|&s| self.board[s as usize] == Some(Piece::new(c, PieceKind::King)))
    }

    pub fn piece_at(&self, sq: u8) -> Option<Piece> {
        self.board[sq as usize]
    }
    pub(crate) fn set_piece(&mut self, sq: u8, pc: Option<Piece>) {
        self.board[sq as usize] = pc;
    }

    fn count(&self, color: Color, kind: PieceKind) -> usize {
        self.board
            .iter()
            .filter(|pc| **pc == Some(Piece::new(color, kind)))
            .count()
    }

    pub fn in_check(&self, c: Color) -> bool {
        match self.king_sq(c) {
            Some(ksq) => self.is_square_attacked(ksq, c.other()),
            None => false,
        }
    }

    pub fn is_square_attacked(&self, target: u8, by: Color) -> bool {
        let tf = file_of(target);
        let tr = rank_of(target);
        let holds = |s: u8, kinds: &[PieceKind]| {
            self.piece_at(s)
                .is_some_and(|pc| pc.color == by && kinds.contains(&pc.kind))
        };

        // A white pawn attacks from the rank below its target, a black one from above.
        let pawn_rank = match by {
            Color::White => tr - 1,
            Color::Black => tr + 1,
        };
        for df in [-1, 1] {
            if let Some(s) = sq(tf + df, pawn_rank)
                && holds(s, &[PieceKind::Pawn])
            {
                return true;
            }
        }

        for (df, dr) in KNIGHT_DELTAS {
            if let Some(s) = sq(tf + df, tr + dr)
                && holds(s, &[PieceKind::Knight])
            {
                return true;
            }
        }
        for (df, dr) in KING_DELTAS {
            if let Some(s) = sq(tf + df, tr + dr)
                && holds(s, &[PieceKind::King])
            {
                return true;
            }
        }

        let rays = [
            (&DIAGONALS, [PieceKind::Bishop, PieceKind::Queen]),
            (&ORTHOGONALS, [PieceKind::Rook, PieceKind::Queen]),
        ];
        for (dirs, sliders) in rays {
            for (df, dr) in dirs.iter() {
                let (mut f, mut r) = (tf + df, tr + dr);
                while let Some(s) = sq(f, r) {
                    if self.piece_at(s).is_some() {
                        if holds(s, &sliders) {
                            return true;
                        }
                        break;
                    }
                    f += df;
                    r += dr;
                }
            }
        }

        false
    }

    /// Play `mv` if it is legal here, returning the successor position.
    ///
    /// Only `from`, `to` and `promo` of the argument are looked at; the flags
    /// come from the generated legal move.
    pub fn apply(&self, mv: Move) -> Result<Position, ChessError> {
        let legal = legal_moves(self);
        let Some(&chosen) = legal.iter().find(|m| m.same_as(mv.from, mv.to, mv.promo)) else {
            if mv.promo.is_none()
                && legal
                    .iter()
                    .any(|m| m.from == mv.from && m.to == mv.to && m.is_promotion())
            {
                return Err(ChessError::AmbiguousPromotion(mv.to_string()));
            }
            return Err(ChessError::IllegalMove(mv.to_string()));
        };
        let mut next = self.clone();
        next.make_move(chosen);
        Ok(next)
    }

    pub(crate) fn make_move(&mut self, mv: Move) -> Undo {
        let from = mv.from;
        let to = mv.to;
        let moved = self.piece_at(from).expect("no piece on from-square");
        let mut captured = self.piece_at(to);
        let undo_castling = self.castling;
        let undo_ep = self.en_passant;
        let undo_hmc = self.halfmove_clock;
        let undo_fmn = self.fullmove_number;

        self.en_passant = None;
        let mut reset_hmc = moved.kind == PieceKind::Pawn || captured.is_some();

        let mut ep_captured_sq = None;
        if mv.is_en_passant {
            let dir = match moved.color {
                Color::White => -1,
                Color::Black => 1,
            };
            if let Some(cs) = sq(file_of(to), rank_of(to) + dir) {
                captured = self.piece_at(cs);
                self.set_piece(cs, None);
                ep_captured_sq = Some(cs);
                reset_hmc = true;
            }
        }

        self.set_piece(from, None);
        let placed = match mv.promo {
            Some(kind) => Piece::new(moved.color, kind),
            None => moved,
        };
        self.set_piece(to, Some(placed));

        let mut rook_move = None;
        if mv.is_castle {
            // e1g1 -> h1f1, e1c1 -> a1d1, and the same on the eighth rank
            let (rf, rt) = if to > from { (from + 3, from + 1) } else { (from - 4, from - 1) };
            let rook = self.piece_at(rf);
            self.set_piece(rf, None);
            self.set_piece(rt, rook);
            rook_move = Some((rf, rt));
        }

        self.castling.touch(from);
        self.castling.touch(to);

        if moved.kind == PieceKind::Pawn && (rank_of(from) - rank_of(to)).abs() == 2 {
            self.en_passant = sq(file_of(from), (rank_of(from) + rank_of(to)) / 2);
        }

        self.halfmove_clock = if reset_hmc { 0 } else { self.halfmove_clock + 1 };
        if self.side_to_move == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = self.side_to_move.other();

        Undo {
            captured,
            castling: undo_castling,
            en_passant: undo_ep,
            halfmove_clock: undo_hmc,
            fullmove_number: undo_fmn,
            moved_piece: moved,
            rook_move,
            ep_captured_sq,
        }
    }

    pub(crate) fn unmake_move(&mut self, mv: Move, undo: Undo) {
        self.side_to_move = self.side_to_move.other();
        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;

        if let Some((rf, rt)) = undo.rook_move {
            let rook = self.piece_at(rt);
            self.set_piece(rt, None);
            self.set_piece(rf, rook);
        }

        self.set_piece(mv.to, None);
        self.set_piece(mv.from, Some(undo.moved_piece));

        match undo.ep_captured_sq {
            Some(cs) => self.set_piece(cs, undo.captured),
            None => self.set_piece(mv.to, undo.captured),
        }
    }

    /// Fifty moves by each side without a capture or pawn move.
    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Neither side can possibly deliver mate.
    pub fn is_insufficient_material(&self) -> bool {
        let mut minors = 0;
        let mut knights = 0;
        let mut bishop_square_colors = [false; 2];
        for (s, pc) in self.board.iter().enumerate() {
            let Some(pc) = pc else { continue };
            match pc.kind {
                PieceKind::King => {}
                PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
                PieceKind::Knight => {
                    minors += 1;
                    knights += 1;
                }
                PieceKind::Bishop => {
                    minors += 1;
                    bishop_square_colors[(s / 8 + s % 8) % 2] = true;
                }
            }
        }
        if minors <= 1 {
            return true;
        }
        // Any number of bishops, all on one square color, cannot mate.
        knights == 0 && !(bishop_square_colors[0] && bishop_square_colors[1])
    }

    /// Zobrist hash of everything that makes two positions "the same" for
    /// repetition purposes. Move counters are not included.
    pub fn position_hash(&self) -> u64 {
        let mut h = 0u64;
        for (s, pc) in self.board.iter().enumerate() {
            if let Some(pc) = pc {
                h ^= ZOBRIST.piece_key(*pc, s as u8);
            }
        }
        if self.side_to_move == Color::Black {
            h ^= ZOBRIST.side_to_move;
        }
        for i in 0..4 {
            if self.castling.has(1 << i) {
                h ^= ZOBRIST.castling_key(i);
            }
        }
        // The en-passant file only distinguishes positions where the capture is playable.
        if let Some(ep) = self.en_passant
            && legal_moves(self).iter().any(|m| m.is_en_passant)
        {
            h ^= ZOBRIST.ep_key(file_of(ep) as u8);
        }
        h
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
