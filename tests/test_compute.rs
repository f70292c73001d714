use dungeon_shooter::compute::*;
use dungeon_shooter::config::{GameConfig, KeyBindings};
use dungeon_shooter::entities::*;
use dungeon_shooter::error::FireError;
use dungeon_shooter::input::{Controls, InputEvent, Key};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn make_state() -> GameState {
    init_state(&GameConfig::default()).unwrap()
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn idle() -> Controls {
    Controls::default()
}

fn key(c: char) -> InputEvent {
    InputEvent::KeyDown(Key::Char(c))
}

/// Wake the first enemy and park it at `center`, clear of the spawn timer.
fn wake_enemy_at(state: &mut GameState, center: Vec2) {
    state.pending_spawns.clear();
    state.enemies[0].activate();
    state.enemies[0].center = center;
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_places_player_and_dormant_enemies() {
    let s = make_state();
    assert_eq!(s.player.position, Vec2::new(256.0, 256.0));
    assert_eq!(s.player.health, 100);
    assert_eq!(s.enemies.len(), 1);
    assert!(!s.enemies[0].is_active());
    assert_eq!(s.enemies[0].center, Vec2::new(400.0, 300.0));
    assert_eq!(s.pending_spawns, vec![PendingSpawn { enemy_id: 0, at: 3.0 }]);
}

#[test]
fn init_state_empty_collections() {
    let s = make_state();
    assert!(s.bullets.is_empty());
    assert_eq!(s.frame, 0);
    assert_eq!(s.status, GameStatus::Playing);
    assert_eq!(s.camera.offset, Vec2::ZERO);
    assert_eq!(s.screen, Vec2::new(800.0, 700.0));
}

// ── handle_event ──────────────────────────────────────────────────────────────

#[test]
fn quit_event_ends_the_session() {
    let mut s = make_state();
    let outcome = handle_event(&mut s, InputEvent::Quit, &KeyBindings::default(), 0.0);
    assert_eq!(outcome, EventOutcome::Quit);
}

#[test]
fn switch_key_cycles_weapon() {
    let mut s = make_state();
    let keys = KeyBindings::default();
    assert_eq!(handle_event(&mut s, key('q'), &keys, 0.0), EventOutcome::Continue);
    assert_eq!(s.player.active_index(), 1);
    handle_event(&mut s, key('Q'), &keys, 0.0);
    assert_eq!(s.player.active_index(), 0);
}

#[test]
fn reload_key_starts_reload_of_active_weapon() {
    let mut s = make_state();
    let keys = KeyBindings::default();
    let fire = Controls {
        fire: true,
        pointer: Vec2::new(600.0, 281.0),
        ..Controls::default()
    };
    advance(&mut s, &fire, 0.0, &mut seeded_rng());
    handle_event(&mut s, key('r'), &keys, 1.0);

    let pistol = s.player.active_weapon().unwrap();
    assert!(pistol.state().is_reloading());
}

#[test]
fn unbound_keys_are_ignored() {
    let mut s = make_state();
    let keys = KeyBindings::default();
    assert_eq!(handle_event(&mut s, key('x'), &keys, 0.0), EventOutcome::Continue);
    assert_eq!(
        handle_event(&mut s, InputEvent::KeyDown(Key::Other), &keys, 0.0),
        EventOutcome::Continue
    );
    assert_eq!(s.player.active_index(), 0);
}

#[test]
fn restart_key_only_counts_after_death() {
    let mut s = make_state();
    let keys = KeyBindings::default();
    assert_eq!(handle_event(&mut s, key('r'), &keys, 0.0), EventOutcome::Continue);

    s.status = GameStatus::GameOver;
    assert_eq!(handle_event(&mut s, key('r'), &keys, 0.0), EventOutcome::Restart);
    assert_eq!(handle_event(&mut s, key('q'), &keys, 0.0), EventOutcome::Continue);
    assert_eq!(s.player.active_index(), 0);
}

// ── advance — player ──────────────────────────────────────────────────────────

#[test]
fn advance_counts_frames_and_moves_player() {
    let mut s = make_state();
    let down = Controls {
        down: true,
        ..Controls::default()
    };
    advance(&mut s, &down, 0.0, &mut seeded_rng());
    assert_eq!(s.frame, 1);
    assert_eq!(s.player.position, Vec2::new(256.0, 261.0));
}

#[test]
fn held_trigger_fires_at_the_weapon_rate() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let fire = Controls {
        fire: true,
        pointer: Vec2::new(600.0, 281.0),
        ..Controls::default()
    };

    let first = advance(&mut s, &fire, 0.0, &mut rng);
    assert!(first.fired);
    let second = advance(&mut s, &fire, 1.0 / 60.0, &mut rng);
    assert!(!second.fired);
    assert_eq!(second.refusal, Some(FireError::Cooldown));
    assert_eq!(s.bullets.len(), 1);

    let third = advance(&mut s, &fire, 0.4, &mut rng);
    assert!(third.fired);
    assert_eq!(s.bullets.len(), 2);
}

#[test]
fn aim_uses_world_space_pointer() {
    let mut s = make_state();
    s.camera.offset = Vec2::new(100.0, 0.0);
    // Screen point directly below the player once the offset is applied.
    let pointer = s.player.center() - Vec2::new(100.0, 0.0) + Vec2::new(0.0, 80.0);
    let controls = Controls {
        pointer,
        ..Controls::default()
    };
    advance(&mut s, &controls, 0.0, &mut seeded_rng());

    let angle = s.player.active_weapon().unwrap().state().angle();
    assert!((angle - 90.0).abs() < 1e-3, "angle {angle}");
    assert_eq!(s.pointer, pointer);
}

// ── advance — spawn timer & enemies ───────────────────────────────────────────

#[test]
fn enemy_stays_dormant_until_its_delay() {
    let mut s = make_state();
    let mut rng = seeded_rng();

    let early = advance(&mut s, &idle(), 2.9, &mut rng);
    assert_eq!(early.enemies_activated, 0);
    assert!(!s.enemies[0].is_active());
    assert_eq!(s.enemies[0].center, Vec2::new(400.0, 300.0));

    let due = advance(&mut s, &idle(), 3.0, &mut rng);
    assert_eq!(due.enemies_activated, 1);
    assert!(s.enemies[0].is_active());
    assert!(s.pending_spawns.is_empty());
    assert_ne!(s.enemies[0].center, Vec2::new(400.0, 300.0));
}

#[test]
fn ramming_enemy_hurts_player_and_disappears() {
    let mut s = make_state();
    let center = s.player.center();
    wake_enemy_at(&mut s, center + Vec2::new(40.0, 0.0));

    let report = advance(&mut s, &idle(), 0.0, &mut seeded_rng());
    assert_eq!(report.rams, 1);
    assert_eq!(s.player.health, 90);
    assert!(s.enemies.is_empty());
    assert_eq!(s.status, GameStatus::Playing);
}

#[test]
fn lethal_ram_ends_the_game_and_freezes_it() {
    let mut s = make_state();
    s.player.health = 10;
    let center = s.player.center();
    wake_enemy_at(&mut s, center + Vec2::new(40.0, 0.0));
    let mut rng = seeded_rng();

    advance(&mut s, &idle(), 0.0, &mut rng);
    assert_eq!(s.player.health, 0);
    assert_eq!(s.status, GameStatus::GameOver);

    let frame = s.frame;
    let position = s.player.position;
    let moving = Controls {
        down: true,
        fire: true,
        ..Controls::default()
    };
    advance(&mut s, &moving, 5.0, &mut rng);
    assert_eq!(s.frame, frame);
    assert_eq!(s.player.position, position);
    assert!(s.bullets.is_empty());
}

// ── advance — bullets ─────────────────────────────────────────────────────────

#[test]
fn bullets_leaving_the_viewport_are_culled() {
    let mut s = make_state();
    s.bullets.push(Bullet::new(Vec2::new(795.0, 300.0), Vec2::X, 15.0, 10));
    s.bullets.push(Bullet::new(Vec2::new(400.0, 300.0), Vec2::X, 15.0, 10));

    let report = advance(&mut s, &idle(), 0.0, &mut seeded_rng());
    assert_eq!(report.bullets_culled, 1);
    assert_eq!(s.bullets.len(), 1);
    assert_eq!(s.bullets[0].position, Vec2::new(415.0, 300.0));
}

#[test]
fn bullet_damages_first_active_enemy_and_is_spent() {
    let mut s = make_state();
    wake_enemy_at(&mut s, Vec2::new(600.0, 500.0));
    s.bullets.push(Bullet::new(Vec2::new(600.0, 500.0), Vec2::X, 15.0, 25));

    let killed = resolve_bullet_hits(&mut s);
    assert_eq!(killed, 0);
    assert!(s.bullets.is_empty());
    assert_eq!(s.enemies[0].health, 75);
}

#[test]
fn bullet_kill_removes_enemy() {
    let mut s = make_state();
    wake_enemy_at(&mut s, Vec2::new(600.0, 500.0));
    s.enemies[0].health = 20;
    s.bullets.push(Bullet::new(Vec2::new(585.0, 500.0), Vec2::X, 15.0, 20));

    let report = advance(&mut s, &idle(), 0.0, &mut seeded_rng());
    assert_eq!(report.enemies_killed, 1);
    assert!(s.enemies.is_empty());
    assert!(s.bullets.is_empty());
}

#[test]
fn dormant_enemies_are_not_hit() {
    let mut s = make_state();
    let center = s.enemies[0].center;
    s.bullets.push(Bullet::new(center, Vec2::X, 15.0, 100));

    assert_eq!(resolve_bullet_hits(&mut s), 0);
    assert_eq!(s.bullets.len(), 1);
    assert_eq!(s.enemies[0].health, 100);
}

#[test]
fn one_bullet_hits_only_one_enemy() {
    let config = GameConfig {
        spawns: vec![
            dungeon_shooter::config::SpawnPoint { x: 600.0, y: 500.0, delay: 0.0 },
            dungeon_shooter::config::SpawnPoint { x: 600.0, y: 500.0, delay: 0.0 },
        ],
        ..GameConfig::default()
    };
    let mut s = init_state(&config).unwrap();
    activate_due_spawns(&mut s, 0.0);
    s.bullets.push(Bullet::new(Vec2::new(600.0, 500.0), Vec2::X, 15.0, 30));

    resolve_bullet_hits(&mut s);
    assert_eq!(s.enemies[0].health, 70);
    assert_eq!(s.enemies[1].health, 100);
}

// ── Camera ────────────────────────────────────────────────────────────────────

#[test]
fn follow_camera_eases_toward_player() {
    let mut s = make_state();
    s.player.position = Vec2::new(1200.0, 700.0);
    follow_camera(&mut s);
    // desired = center (1225, 725) - half screen (400, 350) = (825, 375)
    assert!((s.camera.offset - Vec2::new(82.5, 37.5)).length() < 1e-3);
}
