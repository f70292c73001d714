/// Input model seen by the simulation: a queue of discrete events plus a
/// snapshot of whatever is currently held down.

use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Escape,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
}

/// Continuous input state for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Controls {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Pointer position in screen space.
    pub pointer: Vec2,
    /// Primary pointer button held.
    pub fire: bool,
}

/// Where input comes from. The game loop drains events first, then reads
/// the held state, once per tick.
pub trait InputSource {
    fn drain_events(&mut self) -> Vec<InputEvent>;

    fn controls(&mut self) -> Controls;
}
