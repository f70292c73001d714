pub mod camera;
pub mod compute;
pub mod config;
pub mod dungeon;
pub mod entities;
pub mod error;
pub mod game_loop;
pub mod input;
pub mod render;
pub mod weapon;
