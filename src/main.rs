use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind},
    execute, terminal,
};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use pipe_flap::{
    Game, GameConfig, ScoreKeeper,
    audio::{AudioOutput, RodioOutput, SilentOutput, SoundBank},
    prefs::FilePrefs,
    render::{self, PixelBuf},
    scene::SceneLibrary,
};

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = GameConfig::from_env();
    let _guard = setup_logging()?;

    let save_dir = config.save_dir.clone().unwrap_or_else(FilePrefs::default_dir);
    let prefs = FilePrefs::open(&save_dir)
        .with_context(|| format!("Failed to open preferences in {}", save_dir.display()))?;
    tracing::info!(path = %prefs.path().display(), "Using preference file");

    let output: Box<dyn AudioOutput> = if config.mute {
        tracing::info!("Sound muted");
        Box::new(SilentOutput)
    } else {
        match RodioOutput::open() {
            Ok(output) => Box::new(output),
            Err(e) => {
                tracing::warn!("No sound: {e}");
                Box::new(SilentOutput)
            }
        }
    };

    let keeper = ScoreKeeper::new(Box::new(prefs), output, SoundBank::synthesized());
    let frame_dur = config.frame_duration();
    let pipe_speed = config.pipe_speed;
    let game = Game::new(SceneLibrary::new(config), keeper)?;

    run(game, frame_dur, pipe_speed)
}

fn run(mut game: Game, frame_dur: Duration, pipe_speed: f64) -> Result<()> {
    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
    )?;

    let result = game_loop(&mut game, &mut out, frame_dur, pipe_speed);

    execute!(
        out,
        terminal::LeaveAlternateScreen,
        cursor::Show,
        terminal::EnableLineWrap,
    )?;
    terminal::disable_raw_mode()?;

    tracing::info!(best = game.keeper().best_score(), "Exiting");
    result
}

fn game_loop(
    game: &mut Game,
    out: &mut io::Stdout,
    frame_dur: Duration,
    pipe_speed: f64,
) -> Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut buf = PixelBuf::new(cols as usize, rows as usize * 2);
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();

        // Input
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => {
                        if let Err(e) = game.flap() {
                            tracing::error!("Flap failed: {e}");
                        }
                    }
                    KeyCode::Char('r') => {
                        if let Err(e) = game.restart() {
                            tracing::error!("Restart failed: {e}");
                        }
                    }
                    KeyCode::Char('p') => game.toggle_pause(),
                    _ => {}
                },
                Event::Resize(c, r) => buf.resize(c as usize, r as usize * 2),
                _ => {}
            }
        }

        // Update
        let dt = last.elapsed().as_secs_f64().min(0.1);
        last = Instant::now();
        if let Err(e) = game.tick(dt) {
            tracing::warn!("Frame update: {e}");
        }

        // Render
        let scroll = game.clock().elapsed() * pipe_speed;
        render::draw_scene(&mut buf, game.scene(), game.phase(), scroll);
        buf.render(out)?;
        render::render_labels(out, game.scene())?;

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}

/// Log to a file in the platform cache directory. The terminal belongs to
/// the game, so nothing is written to stderr.
fn setup_logging() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = directories::ProjectDirs::from("", "", "pipe-flap")
        .map(|dirs| dirs.cache_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("/tmp/pipe-flap/logs"));
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "pipe-flap.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    tracing::info!("Log directory: {}", log_dir.display());
    Ok(guard)
}
