/// Weapon catalog entries and the per-player runtime state that fires them.
///
/// A `WeaponSpec` never changes once loaded. Every player owns one
/// `WeaponState` per weapon it carries, so ammo and cooldowns are never
/// shared between holders.
///
/// Lifecycle of a `WeaponState`:
///
/// ```text
/// Idle --fire--> CoolingDown --interval--> Idle
///   |                                       |
///   +-- ammo hits 0 --> Empty --reload--> Reloading --reload_time--> Idle
/// ```

use std::sync::Arc;

use glam::Vec2;
use rand::Rng;
use serde::Deserialize;

use crate::entities::Bullet;
use crate::error::FireError;

/// Slack on the cooldown comparison so `t + interval` always counts as ready
/// despite float rounding.
const COOLDOWN_EPSILON: f64 = 1e-9;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct WeaponSpec {
    pub name: String,
    pub damage: i32,
    /// Seconds between shots.
    pub fire_interval: f64,
    pub max_ammo: u32,
    /// Seconds a reload takes. Zero or less reloads instantly.
    pub reload_time: f64,
    /// Maximum random deviation either side of the aim line, in degrees.
    pub spread: f32,
    /// Visual scale of the weapon sprite.
    pub scale: f32,
    /// World units a bullet travels per tick.
    #[serde(default = "default_bullet_speed")]
    pub bullet_speed: f32,
}

fn default_bullet_speed() -> f32 {
    15.0
}

impl WeaponSpec {
    /// Slow, hard-hitting and accurate.
    pub fn pistol() -> WeaponSpec {
        WeaponSpec {
            name: "Pistol".to_string(),
            damage: 20,
            fire_interval: 0.4,
            max_ammo: 12,
            reload_time: 2.0,
            spread: 1.0,
            scale: 0.1,
            bullet_speed: default_bullet_speed(),
        }
    }

    /// Fast with a deep magazine, at the cost of accuracy.
    pub fn rifle() -> WeaponSpec {
        WeaponSpec {
            name: "Rifle".to_string(),
            damage: 15,
            fire_interval: 0.1,
            max_ammo: 30,
            reload_time: 4.0,
            spread: 4.0,
            scale: 0.6,
            bullet_speed: default_bullet_speed(),
        }
    }

    pub fn reference_catalog() -> Vec<WeaponSpec> {
        vec![WeaponSpec::pistol(), WeaponSpec::rifle()]
    }
}

/// Where and how the weapon sprite is drawn. World-space position, rotation
/// in degrees (0 = facing +x, clockwise with +y down).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeaponStatus {
    Idle,
    CoolingDown,
    Empty,
    Reloading,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WeaponState {
    ammo: u32,
    /// Time of the last successful shot.
    last_shot: Option<f64>,
    last_empty_report: Option<f64>,
    reload_done_at: Option<f64>,
    angle: f32,
    transform: Transform,
}

impl WeaponState {
    /// Fresh state with a full magazine.
    pub fn new(spec: &WeaponSpec) -> WeaponState {
        WeaponState {
            ammo: spec.max_ammo,
            last_shot: None,
            last_empty_report: None,
            reload_done_at: None,
            angle: 0.0,
            transform: Transform {
                scale: spec.scale,
                ..Transform::default()
            },
        }
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    /// Facing angle in degrees.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn is_reloading(&self) -> bool {
        self.reload_done_at.is_some()
    }

    pub fn status(&self, spec: &WeaponSpec, now: f64) -> WeaponStatus {
        if self.is_reloading() {
            WeaponStatus::Reloading
        } else if self.ammo == 0 {
            WeaponStatus::Empty
        } else if !self.cooled_down(spec, now) {
            WeaponStatus::CoolingDown
        } else {
            WeaponStatus::Idle
        }
    }

    fn cooled_down(&self, spec: &WeaponSpec, now: f64) -> bool {
        match self.last_shot {
            Some(last) => now - last >= spec.fire_interval - COOLDOWN_EPSILON,
            None => true,
        }
    }

    /// Complete a pending reload once its time has come. Returns true on the
    /// tick the magazine is refilled.
    pub fn poll(&mut self, spec: &WeaponSpec, now: f64) -> bool {
        match self.reload_done_at {
            Some(done_at) if now >= done_at => {
                self.ammo = spec.max_ammo;
                self.reload_done_at = None;
                true
            }
            _ => false,
        }
    }

    /// Start a reload. A full magazine or a reload already in progress makes
    /// this a no-op. Returns true if a reload was started.
    pub fn reload(&mut self, spec: &WeaponSpec, now: f64) -> bool {
        if self.is_reloading() || self.ammo == spec.max_ammo {
            return false;
        }
        if spec.reload_time <= 0.0 {
            self.ammo = spec.max_ammo;
        } else {
            self.reload_done_at = Some(now + spec.reload_time);
        }
        true
    }

    /// Try to fire from `origin` toward `target`.
    ///
    /// Only a successful shot restarts the cooldown; refusals leave it as is.
    pub fn fire(
        &mut self,
        spec: &WeaponSpec,
        origin: Vec2,
        target: Vec2,
        now: f64,
        rng: &mut impl Rng,
    ) -> Result<Bullet, FireError> {
        self.poll(spec, now);
        if self.is_reloading() {
            return Err(FireError::Reloading);
        }
        if !self.cooled_down(spec, now) {
            return Err(FireError::Cooldown);
        }
        if self.ammo == 0 {
            return Err(FireError::OutOfAmmo);
        }

        self.ammo -= 1;
        self.last_shot = Some(now);

        let aim = target - origin;
        let deviation = if spec.spread > 0.0 {
            rng.gen_range(-spec.spread..=spec.spread)
        } else {
            0.0
        };
        let angle = aim.y.atan2(aim.x) + deviation.to_radians();
        let direction = Vec2::from_angle(angle);

        Ok(Bullet::new(origin, direction, spec.bullet_speed, spec.damage))
    }

    /// Whether an empty-magazine refusal at `now` should be reported. Reports
    /// are spaced at least one fire interval apart so a held trigger does not
    /// repeat them every tick.
    pub fn take_empty_report(&mut self, spec: &WeaponSpec, now: f64) -> bool {
        let due = match self.last_empty_report {
            Some(last) => now - last >= spec.fire_interval - COOLDOWN_EPSILON,
            None => true,
        };
        if due {
            self.last_empty_report = Some(now);
        }
        due
    }

    /// Point the weapon at `target` and move its sprite to `origin`.
    /// Presentation only; `fire` computes its own aim line.
    pub fn orient(&mut self, spec: &WeaponSpec, origin: Vec2, target: Vec2) {
        let aim = target - origin;
        self.angle = aim.y.atan2(aim.x).to_degrees();
        self.transform = Transform {
            position: origin,
            rotation: self.angle,
            scale: spec.scale,
        };
    }
}

/// A weapon as carried by one player: the shared catalog entry plus this
/// holder's own runtime state.
#[derive(Clone, Debug)]
pub struct Weapon {
    spec: Arc<WeaponSpec>,
    state: WeaponState,
}

impl Weapon {
    pub fn new(spec: Arc<WeaponSpec>) -> Weapon {
        let state = WeaponState::new(&spec);
        Weapon { spec, state }
    }

    pub fn spec(&self) -> &WeaponSpec {
        &self.spec
    }

    pub fn state(&self) -> &WeaponState {
        &self.state
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn status(&self, now: f64) -> WeaponStatus {
        self.state.status(&self.spec, now)
    }

    pub fn poll(&mut self, now: f64) -> bool {
        self.state.poll(&self.spec, now)
    }

    pub fn reload(&mut self, now: f64) -> bool {
        self.state.reload(&self.spec, now)
    }

    pub fn fire(
        &mut self,
        origin: Vec2,
        target: Vec2,
        now: f64,
        rng: &mut impl Rng,
    ) -> Result<Bullet, FireError> {
        self.state.fire(&self.spec, origin, target, now, rng)
    }

    pub fn take_empty_report(&mut self, now: f64) -> bool {
        self.state.take_empty_report(&self.spec, now)
    }

    pub fn orient(&mut self, origin: Vec2, target: Vec2) {
        self.state.orient(&self.spec, origin, target);
    }
}
