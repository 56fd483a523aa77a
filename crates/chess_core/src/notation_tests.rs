use super::*;

#[test]
fn test_parse_is_case_insensitive_and_output_lowercase() {
    let pos = Position::startpos();
    let mv = parse_move(&pos, "E2E4").unwrap();
    assert_eq!(move_to_uci(mv), "e2e4");
}

#[test]
fn test_parse_rejects_malformed_text() {
    let pos = Position::startpos();
    for txt in ["", "e2", "e2e", "e2e4e5", "i2i4", "e2e4k", "e2e2", "e9e4"] {
        assert!(
            matches!(parse_move(&pos, txt), Err(ChessError::InvalidNotation(_))),
            "accepted '{txt}'"
        );
    }
}

#[test]
fn test_parse_reports_illegal_move() {
    let pos = Position::startpos();
    assert_eq!(
        parse_move(&pos, "e2e5"),
        Err(ChessError::IllegalMove("e2e5".to_string()))
    );
    assert!(matches!(parse_move(&pos, "e2e4q"), Err(ChessError::IllegalMove(_))));
}

#[test]
fn test_parse_promotion() {
    let pos = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    assert!(matches!(
        parse_move(&pos, "a7a8"),
        Err(ChessError::AmbiguousPromotion(_))
    ));
    let mv = parse_move(&pos, "a7a8Q").unwrap();
    assert_eq!(mv.promo, Some(PieceKind::Queen));
    assert_eq!(mv.to_string(), "a7a8q");
}

#[test]
fn test_parse_castle_sets_flag() {
    let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    assert!(parse_move(&pos, "e1c1").unwrap().is_castle);
}

#[test]
fn test_san_rendering() {
    let pos = Position::startpos();
    assert_eq!(to_san(&pos, parse_move(&pos, "g1f3").unwrap()), "Nf3");
    assert_eq!(to_san(&pos, parse_move(&pos, "e2e4").unwrap()), "e4");

    let castle = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    assert_eq!(to_san(&castle, parse_move(&castle, "e1g1").unwrap()), "O-O");

    // Both rooks can reach d1.
    let rooks = Position::from_fen("4k3/8/8/8/8/8/4K3/R6R w - - 0 1").unwrap();
    assert_eq!(to_san(&rooks, parse_move(&rooks, "a1d1").unwrap()), "Rad1");

    let mate = Position::from_fen("rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2")
        .unwrap();
    assert_eq!(to_san(&mate, parse_move(&mate, "d8h4").unwrap()), "Qh4#");
}
