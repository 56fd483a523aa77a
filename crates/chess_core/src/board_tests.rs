use super::*;
use crate::notation::parse_move;

fn play(pos: &Position, txt: &str) -> Position {
    let mv = parse_move(pos, txt).unwrap();
    pos.apply(mv).unwrap()
}

#[test]
fn test_startpos_fen_roundtrip() {
    assert_eq!(Position::startpos().to_fen(), START_FEN);
    assert_eq!(Position::from_fen(START_FEN).unwrap(), Position::startpos());
}

#[test]
fn test_fen_roundtrip_all_fields() {
    for fen in [
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 12 40",
        "r3k2r/8/8/8/8/8/8/R3K2R b Kq - 3 17",
    ] {
        assert_eq!(Position::from_fen(fen).unwrap().to_fen(), fen);
    }
}

#[test]
fn test_four_field_fen_defaults_counters() {
    let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - -").unwrap();
    assert_eq!(pos.halfmove_clock, 0);
    assert_eq!(pos.fullmove_number, 1);
    assert_eq!(pos.to_fen(), "4k3/8/8/8/8/8/8/4K3 b - - 0 1");
}

#[test]
fn test_malformed_fen_is_rejected() {
    for fen in [
        "",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1",
        "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX w KQkq - 0 1",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQxq - 0 1",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e4 0 1",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - x 1",
        "rnbq1bnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "Pnbqkbnr/pppppppp/8/8/8/8/1PPPPPPP/RNBQKBNR w KQkq - 0 1",
    ] {
        assert!(
            matches!(Position::from_fen(fen), Err(ChessError::InvalidNotation(_))),
            "accepted bad FEN '{fen}'"
        );
    }
}

#[test]
fn test_fen_with_capturable_king_is_rejected() {
    for fen in [
        "4k3/8/8/8/8/8/8/4RK2 w - - 0 1",
        "4k3/8/8/8/8/8/3p4/4K3 b - - 0 1",
    ] {
        assert!(
            matches!(Position::from_fen(fen), Err(ChessError::InvalidNotation(_))),
            "accepted '{fen}'"
        );
    }
    // Check on the side to move is fine.
    let pos = Position::from_fen("4k3/8/8/8/8/8/8/4RK2 b - - 0 1").unwrap();
    assert!(pos.in_check(Color::Black));
    assert!(
        legal_moves(&pos)
            .iter()
            .all(|m| pos.piece_at(m.to).map(|p| p.kind) != Some(PieceKind::King))
    );
}

#[test]
fn test_apply_leaves_original_untouched() {
    let start = Position::startpos();
    let next = play(&start, "e2e4");
    assert_eq!(start, Position::startpos());
    assert_eq!(next.side_to_move, Color::Black);
    assert_eq!(next.en_passant, coord_to_sq("e3"));
}

#[test]
fn test_en_passant_target_cleared_after_one_ply() {
    let pos = play(&play(&Position::startpos(), "e2e4"), "g8f6");
    assert_eq!(pos.en_passant, None);
}

#[test]
fn test_counters_update() {
    let pos = play(&Position::startpos(), "g1f3");
    assert_eq!(pos.halfmove_clock, 1);
    assert_eq!(pos.fullmove_number, 1);
    let pos = play(&pos, "b8c6");
    assert_eq!(pos.halfmove_clock, 2);
    assert_eq!(pos.fullmove_number, 2);
    let pos = play(&pos, "e2e4");
    assert_eq!(pos.halfmove_clock, 0);
}

#[test]
fn test_castling_moves_rook_and_clears_rights() {
    let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let after = play(&pos, "e1g1");
    assert_eq!(after.piece_at(5), Some(Piece::new(Color::White, PieceKind::Rook)));
    assert_eq!(after.piece_at(7), None);
    assert!(!after.castling.has(CastlingRights::WHITE_KING));
    assert!(!after.castling.has(CastlingRights::WHITE_QUEEN));
    assert!(after.castling.has(CastlingRights::BLACK_KING));
    assert_eq!(after.to_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1");
}

#[test]
fn test_rook_capture_revokes_opponent_right() {
    let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let after = play(&pos, "a1a8");
    assert!(!after.castling.has(CastlingRights::WHITE_QUEEN));
    assert!(!after.castling.has(CastlingRights::BLACK_QUEEN));
    assert!(after.castling.has(CastlingRights::BLACK_KING));
}

#[test]
fn test_en_passant_capture_removes_pawn() {
    let pos =
        Position::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3").unwrap();
    let after = play(&pos, "e5f6");
    assert_eq!(after.piece_at(coord_to_sq("f5").unwrap()), None);
    assert_eq!(
        after.piece_at(coord_to_sq("f6").unwrap()),
        Some(Piece::new(Color::White, PieceKind::Pawn))
    );
}

#[test]
fn test_apply_rejects_illegal_and_ambiguous() {
    let start = Position::startpos();
    assert!(matches!(
        start.apply(Move::new(12, 36)),
        Err(ChessError::IllegalMove(_))
    ));

    let pos = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    assert!(matches!(
        pos.apply(Move::new(48, 56)),
        Err(ChessError::AmbiguousPromotion(_))
    ));
    let mut knight = Move::new(48, 56);
    knight.promo = Some(PieceKind::Knight);
    let after = pos.apply(knight).unwrap();
    assert_eq!(after.piece_at(56), Some(Piece::new(Color::White, PieceKind::Knight)));
}

#[test]
fn test_make_unmake_restores_position() {
    let original =
        Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
            .unwrap();
    let mut pos = original.clone();
    for mv in crate::movegen::legal_moves(&original) {
        let undo = pos.make_move(mv);
        pos.unmake_move(mv, undo);
        assert_eq!(pos, original, "make/unmake of {mv} changed the position");
    }
}

#[test]
fn test_insufficient_material_bishops_same_color() {
    // Three bishops, all on dark squares.
    let pos = Position::from_fen("4k3/8/8/8/8/8/8/B1B1K1b1 w - - 0 1").unwrap();
    assert!(pos.is_insufficient_material());
}
