use pipe_flap::{
    ScoreKeeper,
    audio::{RecordingOutput, SoundBank},
    clock::Clock,
    config::GameConfig,
    display::{BEST_SCORE_TEXT, SCORE_TEXT},
    prefs::{BEST_SCORE_KEY, FilePrefs, PrefStore},
    scene::{Scene, standard_scene},
};

fn open_keeper(dir: &std::path::Path) -> ScoreKeeper {
    let prefs = FilePrefs::open(dir).unwrap();
    ScoreKeeper::new(
        Box::new(prefs),
        Box::new(RecordingOutput::new()),
        SoundBank::default(),
    )
}

fn stored_best(dir: &std::path::Path) -> i64 {
    FilePrefs::open(dir).unwrap().get_int(BEST_SCORE_KEY, 0)
}

fn text(scene: &Scene, name: &str) -> String {
    scene.label(name).unwrap().text()
}

#[test]
fn test_score_session_across_restart() {
    let dir = tempfile::tempdir().unwrap();
    let mut keeper = open_keeper(dir.path());
    let mut scene = standard_scene("Main", &GameConfig::default());
    let mut clock = Clock::new();
    keeper.initialize(&scene);
    assert_eq!(keeper.best_score(), 0);

    keeper.add_score(3);
    assert_eq!(keeper.best_score(), 3);
    assert_eq!(stored_best(dir.path()), 3);

    let request = keeper.restart(&mut scene, &mut clock);
    assert_eq!(request.scene, "Main");
    assert_eq!(keeper.score(), 0);
    assert_eq!(keeper.best_score(), 3);
    assert_eq!(text(&scene, SCORE_TEXT), "Score: 0");
    assert_eq!(text(&scene, BEST_SCORE_TEXT), "Best Score: 3");

    keeper.add_score(2);
    assert_eq!(keeper.score(), 2);
    assert_eq!(keeper.best_score(), 3);
    assert_eq!(stored_best(dir.path()), 3);

    // Scores accumulate within a run
    keeper.add_score(2);
    assert_eq!(keeper.score(), 4);
    assert_eq!(keeper.best_score(), 4);
    assert_eq!(stored_best(dir.path()), 4);

    keeper.restart(&mut scene, &mut clock);
    keeper.add_score(5);
    assert_eq!(keeper.score(), 5);
    assert_eq!(keeper.best_score(), 5);
    assert_eq!(stored_best(dir.path()), 5);
    assert_eq!(text(&scene, BEST_SCORE_TEXT), "Best Score: 5");
}

#[test]
fn test_best_score_survives_new_process() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut keeper = open_keeper(dir.path());
        keeper.add_score(11);
    }
    let keeper = open_keeper(dir.path());
    assert_eq!(keeper.best_score(), 11);
    assert_eq!(keeper.score(), 0);
}

#[test]
fn test_fresh_store_starts_at_zero() {
    let dir = tempfile::tempdir().unwrap();
    let keeper = open_keeper(dir.path());
    assert_eq!(keeper.best_score(), 0);
}

#[test]
fn test_corrupt_store_still_starts() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("prefs.json"), b"\0\0garbage").unwrap();
    let mut keeper = open_keeper(dir.path());
    assert_eq!(keeper.best_score(), 0);

    keeper.add_score(6);
    assert_eq!(stored_best(dir.path()), 6);
}
