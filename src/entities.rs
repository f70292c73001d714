/// Game entity types and the master game state.
///
/// Entities never hold references to each other. Anything one entity does to
/// another (an enemy ramming the player, a weapon adding a bullet) goes
/// through the arguments of the call that does it.

use std::sync::Arc;

use glam::Vec2;
use rand::Rng;
use tracing::{info, warn};

use crate::camera::Camera;
use crate::config::{EnemyConfig, PlayerConfig};
use crate::dungeon::TileMap;
use crate::error::FireError;
use crate::input::Controls;
use crate::weapon::{Weapon, WeaponSpec};

/// Bullet footprint in world units (width, height).
pub const BULLET_SIZE: Vec2 = Vec2::new(10.0, 5.0);

// ── Bounding boxes ────────────────────────────────────────────────────────────

/// Axis-aligned bounding box in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_top_left(top_left: Vec2, size: Vec2) -> Aabb {
        Aabb {
            min: top_left,
            max: top_left + size,
        }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Aabb {
        Aabb {
            min: center - size * 0.5,
            max: center + size * 0.5,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Strict overlap: boxes that only share an edge do not touch.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    /// Top-left corner of the bounding box, in world units.
    pub position: Vec2,
    pub size: f32,
    pub speed: f32,
    pub health: i32,
    pub max_health: i32,
    weapons: Vec<Weapon>,
    active: usize,
}

impl Player {
    /// A player carrying one fresh `Weapon` per catalog entry.
    pub fn new(config: &PlayerConfig, catalog: &[Arc<WeaponSpec>]) -> Player {
        Player {
            position: Vec2::from(config.start),
            size: config.size,
            speed: config.speed,
            health: config.max_health,
            max_health: config.max_health,
            weapons: catalog.iter().cloned().map(Weapon::new).collect(),
            active: 0,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_top_left(self.position, Vec2::splat(self.size))
    }

    pub fn center(&self) -> Vec2 {
        self.position + Vec2::splat(self.size * 0.5)
    }

    pub fn weapons(&self) -> &[Weapon] {
        &self.weapons
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_weapon(&self) -> Option<&Weapon> {
        self.weapons.get(self.active)
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Step once for every held direction, one axis at a time. A step that
    /// would put a corner inside a wall is dropped, so pushing diagonally
    /// into a wall still slides along it.
    pub fn move_within(&mut self, controls: &Controls, map: &TileMap) {
        let steps = [
            (controls.up, Vec2::new(0.0, -self.speed)),
            (controls.down, Vec2::new(0.0, self.speed)),
            (controls.left, Vec2::new(-self.speed, 0.0)),
            (controls.right, Vec2::new(self.speed, 0.0)),
        ];
        for (held, step) in steps {
            if !held {
                continue;
            }
            let candidate = self.position + step;
            if map.can_occupy(candidate.x, candidate.y, self.size, self.size) {
                self.position = candidate;
            }
        }
    }

    /// Cycle to the next carried weapon. Returns false with fewer than two.
    pub fn switch_weapon(&mut self) -> bool {
        if self.weapons.len() < 2 {
            return false;
        }
        self.active = (self.active + 1) % self.weapons.len();
        if let Some(weapon) = self.weapons.get(self.active) {
            info!(weapon = weapon.name(), "switched weapon");
        }
        true
    }

    pub fn reload(&mut self, now: f64) -> bool {
        let Some(weapon) = self.weapons.get_mut(self.active) else {
            return false;
        };
        let started = weapon.reload(now);
        if started {
            info!(weapon = weapon.name(), "reloading");
        }
        started
    }

    /// Finish any reloads that came due, whichever weapon is in hand.
    pub fn poll_weapons(&mut self, now: f64) {
        for weapon in &mut self.weapons {
            if weapon.poll(now) {
                info!(weapon = weapon.name(), "reloaded");
            }
        }
    }

    /// Fire the active weapon at `target`, pushing the bullet onto `bullets`.
    /// Refusals are returned for the caller to inspect but never fatal.
    pub fn fire(
        &mut self,
        bullets: &mut Vec<Bullet>,
        target: Vec2,
        now: f64,
        rng: &mut impl Rng,
    ) -> Result<(), FireError> {
        let origin = self.center();
        let Some(weapon) = self.weapons.get_mut(self.active) else {
            return Err(FireError::NoWeapon);
        };
        match weapon.fire(origin, target, now, rng) {
            Ok(bullet) => {
                bullets.push(bullet);
                Ok(())
            }
            Err(FireError::OutOfAmmo) => {
                if weapon.take_empty_report(now) {
                    warn!(weapon = weapon.name(), "out of ammo");
                }
                Err(FireError::OutOfAmmo)
            }
            Err(e) => Err(e),
        }
    }

    /// Keep the active weapon pointed at `target`, firing or not.
    pub fn update_aim(&mut self, target: Vec2) {
        let origin = self.center();
        if let Some(weapon) = self.weapons.get_mut(self.active) {
            weapon.orient(origin, target);
        }
    }

    /// Health never drops below zero.
    pub fn take_damage(&mut self, amount: i32) {
        self.health = (self.health - amount).max(0);
    }
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

/// What an enemy did on its tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyAction {
    /// Still waiting for its spawn trigger.
    Dormant,
    Advanced,
    /// Hit the player and spent itself; remove it.
    Rammed,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub id: u32,
    pub center: Vec2,
    pub size: f32,
    pub health: i32,
    pub speed: f32,
    pub contact_damage: i32,
    active: bool,
}

impl Enemy {
    /// Enemies start dormant: invisible and inert until activated.
    pub fn dormant(id: u32, center: Vec2, config: &EnemyConfig) -> Enemy {
        Enemy {
            id,
            center,
            size: config.size,
            health: config.health,
            speed: config.speed,
            contact_damage: config.contact_damage,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.center, Vec2::splat(self.size))
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Chase the player's center and ram on contact. Walls are ignored.
    ///
    /// The step is capped at the remaining distance, so a stationary target
    /// gets strictly closer every tick and is never overshot.
    pub fn update(&mut self, player: &mut Player) -> EnemyAction {
        if !self.active {
            return EnemyAction::Dormant;
        }

        let to_player = player.center() - self.center;
        let distance = to_player.length();
        if distance > 0.0 {
            self.center += to_player / distance * self.speed.min(distance);
        }

        if self.bounds().overlaps(&player.bounds()) {
            player.take_damage(self.contact_damage);
            info!(enemy = self.id, health = player.health, "enemy rammed the player");
            return EnemyAction::Rammed;
        }
        EnemyAction::Advanced
    }

    /// Returns true once the hit brings health to zero or below.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.health -= amount;
        self.is_dead()
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// Straight-line projectile. Knows nothing about who fired it.
#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    /// Center, in world units.
    pub position: Vec2,
    /// Unit vector.
    pub direction: Vec2,
    pub speed: f32,
    pub damage: i32,
}

impl Bullet {
    pub fn new(position: Vec2, direction: Vec2, speed: f32, damage: i32) -> Bullet {
        Bullet {
            position,
            direction: direction.normalize_or_zero(),
            speed,
            damage,
        }
    }

    pub fn velocity(&self) -> Vec2 {
        self.direction * self.speed
    }

    pub fn update(&mut self) {
        self.position += self.velocity();
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.position, BULLET_SIZE)
    }

    /// True once the whole bullet lies beyond any edge of `viewport`.
    pub fn is_outside(&self, viewport: &Aabb) -> bool {
        let b = self.bounds();
        b.max.x < viewport.min.x
            || b.min.x > viewport.max.x
            || b.max.y < viewport.min.y
            || b.min.y > viewport.max.y
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

/// An enemy waiting for the spawn timer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingSpawn {
    pub enemy_id: u32,
    /// Session time in seconds at which the enemy wakes.
    pub at: f64,
}

/// Everything the frame orchestrator owns for one session.
#[derive(Clone, Debug)]
pub struct GameState {
    pub dungeon: TileMap,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub camera: Camera,
    pub pending_spawns: Vec<PendingSpawn>,
    /// Last pointer position, screen space.
    pub pointer: Vec2,
    /// Viewport size in world units.
    pub screen: Vec2,
    pub status: GameStatus,
    pub frame: u64,
}

impl GameState {
    /// Pointer position converted to world space.
    pub fn aim_target(&self) -> Vec2 {
        self.camera.screen_to_world(self.pointer)
    }

    /// Visible part of the world, in world units.
    pub fn viewport(&self) -> Aabb {
        Aabb::from_top_left(self.camera.offset, self.screen)
    }

    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.dungeon.world_width(), self.dungeon.world_height())
    }
}
