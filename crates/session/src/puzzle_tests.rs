use super::*;
use chess_core::{game_status, GameStatus};

fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("{}-{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn every_builtin_solution_is_mate() {
    let set = PuzzleSet::builtin();
    assert_eq!(set.len(), BUILTIN.len());
    for puzzle in (0..set.len()).map(|i| set.get(i)) {
        let after = puzzle.position.apply(puzzle.solution).unwrap();
        assert_eq!(
            game_status(&after, &[after.position_hash()]),
            GameStatus::Checkmate,
            "{} is not mate in one",
            puzzle.title
        );
        assert!(!puzzle.hint.is_empty());
    }
}

#[test]
fn get_wraps_around() {
    let set = PuzzleSet::builtin();
    assert_eq!(set.get(set.len()), set.get(0));
}

#[test]
fn find_locates_puzzle_by_position() {
    let set = PuzzleSet::builtin();
    let third = set.get(2).position.clone();
    assert_eq!(set.find(&third), Some(2));
    assert_eq!(set.find(&Position::default()), None);
}

#[test]
fn loads_puzzles_from_toml() {
    let path = temp_file(
        "puzzles.toml",
        r#"
[[puzzle]]
title = "Ladder"
fen = "k7/8/8/8/8/8/1R6/1R4K1 w - - 0 1"
solution = "b2a2"
hint = "Two rooks"

[[puzzle]]
fen = "6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1"
solution = "A1A8"
"#,
    );
    let set = PuzzleSet::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(set.len(), 2);
    assert_eq!(set.get(0).title, "Ladder");
    assert_eq!(set.get(1).solution.to_string(), "a1a8");
    assert_eq!(set.get(1).hint, "");
}

#[test]
fn illegal_solution_is_rejected_at_load() {
    let defs = [PuzzleDef {
        title: "Broken".into(),
        fen: "6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1".into(),
        solution: "a1h8".into(),
        hint: String::new(),
    }];
    match PuzzleSet::from_defs(&defs) {
        Err(ConfigError::InvalidPuzzle { index, title, .. }) => {
            assert_eq!(index, 0);
            assert_eq!(title, "Broken");
        }
        other => panic!("expected InvalidPuzzle, got {other:?}"),
    }
}

#[test]
fn bad_fen_and_empty_sets_are_rejected() {
    let defs = [PuzzleDef {
        title: "No kings".into(),
        fen: "8/8/8/8/8/8/8/8 w - - 0 1".into(),
        solution: "a1a2".into(),
        hint: String::new(),
    }];
    assert!(matches!(
        PuzzleSet::from_defs(&defs),
        Err(ConfigError::InvalidPuzzle { .. })
    ));
    assert!(matches!(
        PuzzleSet::from_defs(&[]),
        Err(ConfigError::InvalidPuzzle { .. })
    ));
}

#[test]
fn missing_and_malformed_files_report_their_kind() {
    let missing = std::env::temp_dir().join("no-such-puzzle-file.toml");
    assert!(matches!(PuzzleSet::load(&missing), Err(ConfigError::Io { .. })));

    let path = temp_file("broken.toml", "[[puzzle]]\nfen = 3\n");
    let result = PuzzleSet::load(&path);
    std::fs::remove_file(&path).ok();
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}
