use super::*;

fn session(mode: GameMode) -> GameSession {
    GameSession::new(
        mode,
        Difficulty::default(),
        &SessionConfig::default(),
        Arc::new(PuzzleSet::builtin()),
    )
}

fn play(game: &mut GameSession, moves: &[&str]) {
    for m in moves {
        let turn = game.player_move(m).unwrap();
        assert!(!turn.reply_due);
    }
}

#[test]
fn local_game_alternates_sides() {
    let mut game = session(GameMode::LocalTwoPlayer);
    play(&mut game, &["e2e4", "e7e5", "g1f3"]);

    assert_eq!(game.move_log(), vec!["e2e4", "e7e5", "g1f3"]);
    assert_eq!(game.state(), TurnState::AwaitingPlayerMove);
    assert_eq!(
        game.position().to_fen(),
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
    );
}

#[test]
fn rejected_moves_change_nothing() {
    let mut game = session(GameMode::LocalTwoPlayer);
    play(&mut game, &["e2e4"]);
    let before = game.clone();

    assert!(matches!(game.player_move("e2e4"), Err(SessionError::IllegalMove(_))));
    assert!(matches!(game.player_move("zz"), Err(SessionError::InvalidNotation(_))));
    assert!(matches!(game.player_move("e7e4"), Err(SessionError::IllegalMove(_))));
    assert_eq!(game, before);
}

#[test]
fn promotion_without_piece_is_ambiguous() {
    let mut game = session(GameMode::LocalTwoPlayer);
    game.reset(Some("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1")).unwrap();
    let before = game.clone();

    assert!(matches!(
        game.player_move("b7b8"),
        Err(SessionError::AmbiguousPromotion(_))
    ));
    assert_eq!(game, before);
    play(&mut game, &["b7b8q"]);
    assert_eq!(game.status(), GameStatus::Check);
}

#[test]
fn undo_restores_previous_position() {
    let mut game = session(GameMode::LocalTwoPlayer);
    let start = game.clone();
    play(&mut game, &["d2d4"]);
    let after_one = game.clone();
    play(&mut game, &["d7d5"]);

    assert_eq!(game.undo().unwrap().to_string(), "d7d5");
    assert_eq!(game, after_one);
    game.undo().unwrap();
    assert_eq!(game, start);
    assert_eq!(game.undo(), Err(SessionError::NothingToUndo));
}

#[test]
fn undo_stack_is_bounded() {
    let config = SessionConfig {
        undo_limit: 2,
        ..SessionConfig::default()
    };
    let mut game = GameSession::new(
        GameMode::LocalTwoPlayer,
        Difficulty::default(),
        &config,
        Arc::new(PuzzleSet::builtin()),
    );
    play(&mut game, &["e2e4", "e7e5", "g1f3", "b8c6"]);

    assert_eq!(game.undo_depth(), 2);
    game.undo().unwrap();
    game.undo().unwrap();
    assert_eq!(game.undo(), Err(SessionError::NothingToUndo));
    assert_eq!(game.move_log(), vec!["e2e4", "e7e5"]);
}

#[test]
fn checkmate_ends_the_game() {
    let mut game = session(GameMode::LocalTwoPlayer);
    play(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);

    assert_eq!(game.status(), GameStatus::Checkmate);
    assert_eq!(game.state(), TurnState::GameOver);
    assert!(matches!(game.player_move("a2a3"), Err(SessionError::GameOver)));

    game.undo().unwrap();
    assert_eq!(game.state(), TurnState::AwaitingPlayerMove);
}

#[test]
fn bot_turn_waits_for_the_reply() {
    let mut game = session(GameMode::Bot);
    let turn = game.player_move("e2e4").unwrap();
    assert!(turn.reply_due);
    assert_eq!(game.state(), TurnState::AwaitingOpponentMove);
    assert!(matches!(game.player_move("d2d4"), Err(SessionError::NotPlayerTurn)));

    let request = game.opponent_request();
    assert_eq!(request.moves.len(), 1);
    assert_eq!(request.current.to_fen(), game.position().to_fen());

    let reply = chess_core::parse_move(game.position(), "c7c5").unwrap();
    game.opponent_move(reply).unwrap();
    assert_eq!(game.state(), TurnState::AwaitingPlayerMove);
    assert_eq!(game.move_log(), vec!["e2e4", "c7c5"]);
}

#[test]
fn abandoned_reply_takes_back_the_player_move() {
    let config = SessionConfig {
        undo_limit: 1,
        ..SessionConfig::default()
    };
    let mut game = GameSession::new(
        GameMode::Bot,
        Difficulty::default(),
        &config,
        Arc::new(PuzzleSet::builtin()),
    );
    let first = game.player_move("e2e4").unwrap();
    let reply = chess_core::parse_move(game.position(), "e7e5").unwrap();
    game.opponent_move(reply).unwrap();
    let _ = first;
    let before = game.clone();

    let turn = game.player_move("g1f3").unwrap();
    game.abandon_reply(turn);
    assert_eq!(game, before);
}

#[test]
fn wrong_puzzle_move_is_rolled_back() {
    let mut game = session(GameMode::Puzzle);
    let before = game.clone();

    // Legal, but not the mate.
    let turn = game.player_move("h5h6").unwrap();
    assert_eq!(turn.puzzle_result, Some(PuzzleResult::WrongSolution));
    assert!(!turn.reply_due);
    assert_eq!(game, before);
    assert_eq!(game.undo(), Err(SessionError::NothingToUndo));
}

#[test]
fn correct_puzzle_move_solves_it() {
    let mut game = session(GameMode::Puzzle);
    let turn = game.player_move("h5f7").unwrap();

    assert_eq!(turn.puzzle_result, Some(PuzzleResult::CorrectSolution));
    assert!(!turn.reply_due);
    assert_eq!(game.status(), GameStatus::Checkmate);
    assert_eq!(game.state(), TurnState::GameOver);
    let view = game.report().puzzle.unwrap();
    assert!(view.solved);
    assert_eq!(view.index, 0);

    game.undo().unwrap();
    assert!(!game.report().puzzle.unwrap().solved);
}

#[test]
fn puzzle_reset_replays_until_solved_then_advances() {
    let mut game = session(GameMode::Puzzle);
    let first = game.position().clone();

    let _ = game.player_move("h5h6").unwrap();
    game.reset(None).unwrap();
    assert_eq!(game.position(), &first);

    let _ = game.player_move("h5f7").unwrap();
    game.reset(None).unwrap();
    let view = game.report().puzzle.unwrap();
    assert_eq!(view.index, 1);
    assert!(!view.solved);
    assert_eq!(game.state(), TurnState::AwaitingPlayerMove);
    assert!(game.move_log().is_empty());
}

#[test]
fn puzzle_reset_by_fen_must_name_a_puzzle() {
    let mut game = session(GameMode::Puzzle);
    let back_rank = "6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1";
    game.reset(Some(back_rank)).unwrap();
    assert_eq!(game.report().puzzle.unwrap().index, 2);

    let before = game.clone();
    assert_eq!(
        game.reset(Some(chess_core::START_FEN)),
        Err(SessionError::UnknownPuzzle)
    );
    assert!(matches!(
        game.reset(Some("not a fen")),
        Err(SessionError::InvalidNotation(_))
    ));
    assert_eq!(game, before);
}

#[test]
fn undoing_the_solution_reopens_the_puzzle() {
    let mut game = session(GameMode::Puzzle);
    game.reset(Some("6rk/6pp/8/6N1/8/8/8/6K1 w - - 0 1")).unwrap();
    let turn = game.player_move("g5f7").unwrap();
    assert_eq!(turn.puzzle_result, Some(PuzzleResult::CorrectSolution));
    game.undo().unwrap();

    let turn = game.player_move("g5e6").unwrap();
    assert_eq!(turn.puzzle_result, Some(PuzzleResult::WrongSolution));
}

#[test]
fn moves_after_solving_are_free() {
    let opening = crate::puzzle::PuzzleDef {
        title: "Open".into(),
        fen: chess_core::START_FEN.into(),
        solution: "e2e4".into(),
        hint: String::new(),
    };
    let puzzles = PuzzleSet::from_defs(&[opening]).unwrap();
    let mut game = GameSession::new(
        GameMode::Puzzle,
        Difficulty::default(),
        &SessionConfig::default(),
        Arc::new(puzzles),
    );

    let turn = game.player_move("e2e4").unwrap();
    assert_eq!(turn.puzzle_result, Some(PuzzleResult::CorrectSolution));
    assert_eq!(game.state(), TurnState::AwaitingPlayerMove);

    let turn = game.player_move("c7c5").unwrap();
    assert_eq!(turn.puzzle_result, None);
    assert!(!turn.reply_due);
    assert_eq!(game.move_log(), vec!["e2e4", "c7c5"]);
}

#[test]
fn reset_to_custom_and_standard_start() {
    let mut game = session(GameMode::LocalTwoPlayer);
    play(&mut game, &["e2e4"]);
    game.reset(Some("4k3/8/8/8/8/8/8/4K2R w K - 0 1")).unwrap();
    assert!(game.move_log().is_empty());
    assert_eq!(game.undo_depth(), 0);
    assert_eq!(game.start(), game.position());

    game.reset(None).unwrap();
    assert_eq!(game.position(), &Position::startpos());
}

#[test]
fn repetition_is_detected_from_history() {
    let mut game = session(GameMode::LocalTwoPlayer);
    play(
        &mut game,
        &["g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6", "f3g1", "f6g8"],
    );
    assert_eq!(game.status(), GameStatus::DrawThreefoldRepetition);
    assert_eq!(game.state(), TurnState::GameOver);
}
