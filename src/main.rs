mod display;

use std::fs::File;
use std::io::{stdout, BufWriter};
use std::sync::{mpsc, Mutex};
use std::thread;

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use glam::Vec2;
use rand::thread_rng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dungeon_shooter::config::GameConfig;
use dungeon_shooter::game_loop::GameLoop;

use display::{TerminalInput, TerminalSurface};

/// RON file overriding the built-in configuration.
const CONFIG_ENV: &str = "DUNGEON_SHOOTER_CONFIG";
/// Log destination; stdout belongs to the renderer.
const LOG_ENV: &str = "DUNGEON_SHOOTER_LOG";
const DEFAULT_LOG: &str = "dungeon_shooter.log";

fn init_logging() -> std::io::Result<()> {
    let path = std::env::var(LOG_ENV).unwrap_or_else(|_| DEFAULT_LOG.to_string());
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn load_config() -> Result<GameConfig, dungeon_shooter::error::ConfigError> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => {
            info!(%path, "loading config");
            GameConfig::load(path)
        }
        Err(_) => Ok(GameConfig::default()),
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    // Fail on a bad config before the terminal is taken over.
    let config = load_config()?;
    let mut game = GameLoop::new(config, thread_rng())?;

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let screen = Vec2::new(game.config().screen.width, game.config().screen.height);
    let result = TerminalSurface::new(&mut out, screen).and_then(|mut surface| {
        let mut input = TerminalInput::new(rx, screen, surface.layout());
        game.run(&mut input, &mut surface)
    });

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        error!(error = %e, "terminal I/O failed");
    }
    info!("exited");
    Ok(result?)
}
