/// Rendering seam.
///
/// The core never touches pixels. It walks the game state and issues draw
/// calls against a `RenderSurface`; whatever sits behind that trait (a
/// terminal, a window, a recorder in tests) decides what they look like.

use glam::Vec2;

use crate::dungeon::Tile;
use crate::entities::{GameState, GameStatus, BULLET_SIZE};
use crate::weapon::WeaponStatus;

/// Unscaled footprint of a weapon sprite, in world units.
pub const GUN_SPRITE_SIZE: Vec2 = Vec2::new(120.0, 60.0);
pub const CROSSHAIR_SIZE: Vec2 = Vec2::new(32.0, 32.0);

/// Logical asset names. The surface maps these to whatever it draws with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sprite {
    Floor,
    Wall,
    Player,
    /// Weapon in the given inventory slot.
    Gun(usize),
    Enemy,
    Bullet,
    Crosshair,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCall {
    pub sprite: Sprite,
    /// Screen-space center of the sprite.
    pub center: Vec2,
    /// Unscaled size in world units.
    pub size: Vec2,
    /// Degrees, clockwise from +x.
    pub rotation: f32,
    pub scale: f32,
}

impl DrawCall {
    fn upright(sprite: Sprite, center: Vec2, size: Vec2) -> DrawCall {
        DrawCall {
            sprite,
            center,
            size,
            rotation: 0.0,
            scale: 1.0,
        }
    }
}

/// Overlay data: ammo counter, health bar and status line.
#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    pub weapon: String,
    pub ammo: u32,
    pub max_ammo: u32,
    pub reloading: bool,
    pub health: i32,
    pub max_health: i32,
    pub game_over: bool,
}

impl Hud {
    /// Health bar fill in [0, 1].
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        (self.health as f32 / self.max_health as f32).clamp(0.0, 1.0)
    }
}

pub trait RenderSurface {
    /// Start a new frame, discarding the previous one.
    fn begin_frame(&mut self);

    fn blit(&mut self, call: DrawCall);

    fn draw_hud(&mut self, hud: &Hud);

    /// Show the finished frame.
    fn present(&mut self) -> std::io::Result<()>;
}

/// Issue every draw call for one frame, back to front: dungeon, player,
/// weapon, enemies, bullets, HUD, crosshair. Does not present.
pub fn draw_frame<S: RenderSurface>(surface: &mut S, state: &GameState, now: f64) {
    surface.begin_frame();

    draw_dungeon(surface, state);

    let camera = &state.camera;
    let player = &state.player;
    surface.blit(DrawCall::upright(
        Sprite::Player,
        camera.world_to_screen(player.center()),
        Vec2::splat(player.size),
    ));

    if let Some(weapon) = player.active_weapon() {
        let transform = weapon.state().transform();
        surface.blit(DrawCall {
            sprite: Sprite::Gun(player.active_index()),
            center: camera.world_to_screen(transform.position),
            size: GUN_SPRITE_SIZE,
            rotation: transform.rotation,
            scale: transform.scale,
        });
    }

    for enemy in state.enemies.iter().filter(|e| e.is_active()) {
        surface.blit(DrawCall::upright(
            Sprite::Enemy,
            camera.world_to_screen(enemy.center),
            Vec2::splat(enemy.size),
        ));
    }

    for bullet in &state.bullets {
        surface.blit(DrawCall {
            sprite: Sprite::Bullet,
            center: camera.world_to_screen(bullet.position),
            size: BULLET_SIZE,
            rotation: bullet.direction.y.atan2(bullet.direction.x).to_degrees(),
            scale: 1.0,
        });
    }

    surface.draw_hud(&hud_for(state, now));

    surface.blit(DrawCall::upright(
        Sprite::Crosshair,
        state.pointer,
        CROSSHAIR_SIZE,
    ));
}

/// Only tiles that intersect the viewport are drawn.
fn draw_dungeon<S: RenderSurface>(surface: &mut S, state: &GameState) {
    let size = state.dungeon.tile_size();
    let viewport = state.viewport();
    for (row, col, tile) in state.dungeon.cells() {
        let top_left = Vec2::new(col as f32, row as f32) * size;
        if top_left.x >= viewport.max.x
            || top_left.y >= viewport.max.y
            || top_left.x + size <= viewport.min.x
            || top_left.y + size <= viewport.min.y
        {
            continue;
        }
        let sprite = match tile {
            Tile::Floor => Sprite::Floor,
            Tile::Wall => Sprite::Wall,
        };
        let center = state.camera.world_to_screen(top_left + Vec2::splat(size * 0.5));
        surface.blit(DrawCall::upright(sprite, center, Vec2::splat(size)));
    }
}

pub fn hud_for(state: &GameState, now: f64) -> Hud {
    let player = &state.player;
    let (weapon, ammo, max_ammo, reloading) = match player.active_weapon() {
        Some(w) => (
            w.name().to_string(),
            w.state().ammo(),
            w.spec().max_ammo,
            w.status(now) == WeaponStatus::Reloading,
        ),
        None => (String::new(), 0, 0, false),
    };
    Hud {
        weapon,
        ammo,
        max_ammo,
        reloading,
        health: player.health,
        max_health: player.max_health,
        game_over: state.status == GameStatus::GameOver,
    }
}
