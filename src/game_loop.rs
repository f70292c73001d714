/// Fixed-rate frame orchestrator.
///
/// Owns the session and drives it against an injected `InputSource` and
/// `RenderSurface`. Everything runs on the calling thread; one tick finishes
/// before the next starts.

use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::info;

use crate::compute::{advance, follow_camera, handle_event, init_state, EventOutcome, TickReport};
use crate::config::GameConfig;
use crate::entities::GameState;
use crate::error::ConfigError;
use crate::input::InputSource;
use crate::render::{draw_frame, RenderSurface};

#[derive(Clone, Debug, PartialEq)]
pub enum LoopControl {
    Continue(TickReport),
    Quit,
}

pub struct GameLoop<R: Rng> {
    config: GameConfig,
    initial: GameState,
    state: GameState,
    rng: R,
    /// Clock reading at which the current session began.
    session_start: f64,
}

impl<R: Rng> GameLoop<R> {
    pub fn new(config: GameConfig, rng: R) -> Result<GameLoop<R>, ConfigError> {
        config.validate()?;
        let initial = init_state(&config)?;
        Ok(GameLoop {
            config,
            state: initial.clone(),
            initial,
            rng,
            session_start: 0.0,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.config.frame_rate))
    }

    fn restart(&mut self, clock: f64) {
        self.state = self.initial.clone();
        self.session_start = clock;
        info!("session restarted");
    }

    /// Run one whole frame at clock reading `clock` (seconds).
    ///
    /// Events are drained first, then held controls drive the simulation,
    /// the frame is drawn, the camera eases toward the player, and the frame
    /// is presented. The clock is read once by the caller and shared by
    /// every weapon check this tick.
    pub fn step<I, S>(&mut self, input: &mut I, surface: &mut S, clock: f64) -> std::io::Result<LoopControl>
    where
        I: InputSource,
        S: RenderSurface,
    {
        let mut now = clock - self.session_start;

        for event in input.drain_events() {
            match handle_event(&mut self.state, event, &self.config.keys, now) {
                EventOutcome::Continue => {}
                EventOutcome::Restart => {
                    self.restart(clock);
                    now = 0.0;
                }
                EventOutcome::Quit => {
                    info!(frame = self.state.frame, "quit requested");
                    return Ok(LoopControl::Quit);
                }
            }
        }

        let controls = input.controls();
        let report = advance(&mut self.state, &controls, now, &mut self.rng);

        draw_frame(surface, &self.state, now);
        follow_camera(&mut self.state);
        surface.present()?;

        Ok(LoopControl::Continue(report))
    }

    /// Tick at the configured rate until the input source asks to quit.
    pub fn run<I, S>(&mut self, input: &mut I, surface: &mut S) -> std::io::Result<()>
    where
        I: InputSource,
        S: RenderSurface,
    {
        let frame = self.tick_duration();
        let started = Instant::now();
        info!(frame_rate = self.config.frame_rate, "game loop started");

        loop {
            let frame_start = Instant::now();
            let clock = started.elapsed().as_secs_f64();

            if let LoopControl::Quit = self.step(input, surface, clock)? {
                return Ok(());
            }

            let elapsed = frame_start.elapsed();
            if elapsed < frame {
                thread::sleep(frame - elapsed);
            }
        }
    }
}
