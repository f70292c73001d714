/// Game-logic steps for one tick.
///
/// Every function here mutates a `GameState` in place and takes its
/// collaborators (controls, clock reading, RNG) as arguments, so a whole
/// session can be driven from a test with a seeded RNG and a fake clock.

use glam::Vec2;
use rand::Rng;
use tracing::info;

use crate::camera::Camera;
use crate::config::{GameConfig, KeyBindings};
use crate::entities::{Enemy, EnemyAction, GameState, GameStatus, PendingSpawn, Player};
use crate::error::{ConfigError, FireError};
use crate::input::{Controls, InputEvent, Key};

/// What the loop should do after a discrete input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    Continue,
    Restart,
    Quit,
}

/// Summary of one call to `advance`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub fired: bool,
    pub refusal: Option<FireError>,
    pub enemies_activated: usize,
    pub enemies_killed: usize,
    pub rams: usize,
    pub bullets_culled: usize,
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build a fresh session: player at the configured start, every spawn point
/// holding a dormant enemy, camera at the origin.
pub fn init_state(config: &GameConfig) -> Result<GameState, ConfigError> {
    let dungeon = config.build_map()?;
    let player = Player::new(&config.player, &config.catalog());

    let mut enemies = Vec::with_capacity(config.spawns.len());
    let mut pending_spawns = Vec::with_capacity(config.spawns.len());
    for (id, spawn) in (0u32..).zip(&config.spawns) {
        enemies.push(Enemy::dormant(id, Vec2::new(spawn.x, spawn.y), &config.enemy));
        pending_spawns.push(PendingSpawn {
            enemy_id: id,
            at: spawn.delay,
        });
    }

    Ok(GameState {
        dungeon,
        player,
        enemies,
        bullets: Vec::new(),
        camera: Camera::new(config.camera_smoothing),
        pending_spawns,
        pointer: Vec2::ZERO,
        screen: Vec2::new(config.screen.width, config.screen.height),
        status: GameStatus::Playing,
        frame: 0,
    })
}

// ── Discrete input ───────────────────────────────────────────────────────────

pub fn handle_event(
    state: &mut GameState,
    event: InputEvent,
    keys: &KeyBindings,
    now: f64,
) -> EventOutcome {
    let key = match event {
        InputEvent::Quit => return EventOutcome::Quit,
        InputEvent::KeyDown(Key::Char(c)) => c.to_ascii_lowercase(),
        InputEvent::KeyDown(_) => return EventOutcome::Continue,
    };

    match state.status {
        GameStatus::GameOver if key == keys.restart => EventOutcome::Restart,
        GameStatus::GameOver => EventOutcome::Continue,
        GameStatus::Playing => {
            if key == keys.reload {
                state.player.reload(now);
            } else if key == keys.switch_weapon {
                state.player.switch_weapon();
            }
            EventOutcome::Continue
        }
    }
}

// ── Per-tick simulation ──────────────────────────────────────────────────────

/// Advance the simulation by one tick.
///
/// Order: reload timers, movement, firing, aim, spawn timer, enemies,
/// bullets, bullet hits, death check. Once the game is over only the pointer
/// is tracked.
pub fn advance(
    state: &mut GameState,
    controls: &Controls,
    now: f64,
    rng: &mut impl Rng,
) -> TickReport {
    let mut report = TickReport::default();
    state.pointer = controls.pointer;
    if state.status == GameStatus::GameOver {
        return report;
    }
    state.frame += 1;

    // ── 1. Player ────────────────────────────────────────────────────────────
    state.player.poll_weapons(now);
    state.player.move_within(controls, &state.dungeon);

    let aim = state.aim_target();
    if controls.fire {
        match state.player.fire(&mut state.bullets, aim, now, rng) {
            Ok(()) => report.fired = true,
            Err(refusal) => report.refusal = Some(refusal),
        }
    }
    state.player.update_aim(aim);

    // ── 2. Enemies ───────────────────────────────────────────────────────────
    report.enemies_activated = activate_due_spawns(state, now);

    let player = &mut state.player;
    let mut rams = 0;
    state.enemies.retain_mut(|enemy| {
        let rammed = enemy.update(player) == EnemyAction::Rammed;
        if rammed {
            rams += 1;
        }
        !rammed
    });
    report.rams = rams;

    // ── 3. Bullets ───────────────────────────────────────────────────────────
    let viewport = state.viewport();
    let before = state.bullets.len();
    state.bullets.retain_mut(|bullet| {
        bullet.update();
        !bullet.is_outside(&viewport)
    });
    report.bullets_culled = before - state.bullets.len();
    report.enemies_killed = resolve_bullet_hits(state);

    // ── 4. Status ────────────────────────────────────────────────────────────
    if state.player.is_dead() {
        state.status = GameStatus::GameOver;
        info!(frame = state.frame, "player died");
    }

    report
}

/// Wake every dormant enemy whose spawn time has passed. Returns how many
/// woke this tick.
pub fn activate_due_spawns(state: &mut GameState, now: f64) -> usize {
    let enemies = &mut state.enemies;
    let mut woken = 0;
    state.pending_spawns.retain(|spawn| {
        if spawn.at > now {
            return true;
        }
        if let Some(enemy) = enemies.iter_mut().find(|e| e.id == spawn.enemy_id) {
            enemy.activate();
            woken += 1;
            info!(enemy = enemy.id, "enemy spawned");
        }
        false
    });
    woken
}

/// Each bullet damages the first active enemy it overlaps and is used up.
/// Enemies brought to zero health are removed. Returns the kill count.
pub fn resolve_bullet_hits(state: &mut GameState) -> usize {
    let enemies = &mut state.enemies;
    state.bullets.retain(|bullet| {
        let bounds = bullet.bounds();
        let target = enemies
            .iter_mut()
            .find(|e| e.is_active() && !e.is_dead() && e.bounds().overlaps(&bounds));
        match target {
            Some(enemy) => {
                if enemy.take_damage(bullet.damage) {
                    info!(enemy = enemy.id, "enemy killed");
                }
                false
            }
            None => true,
        }
    });

    let before = enemies.len();
    enemies.retain(|e| !e.is_dead());
    before - enemies.len()
}

/// Ease the camera toward the player's center.
pub fn follow_camera(state: &mut GameState) {
    let world = state.world_size();
    let focus = state.player.center();
    state.camera.retarget(focus, state.screen, world);
}
