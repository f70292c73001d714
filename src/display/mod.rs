/// Terminal front end: a crossterm cell buffer behind `RenderSurface` and
/// the keyboard/mouse reader behind `InputSource`.
///
/// The world is drawn at a fixed number of screen units per terminal cell,
/// chosen so the configured screen size fills the play area. Input maps
/// mouse cells back to screen units with the same layout.

use std::collections::HashMap;
use std::io::Write;
use std::sync::mpsc;

use crossterm::{
    cursor,
    event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind},
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use glam::Vec2;

use dungeon_shooter::input::{Controls, InputEvent, InputSource, Key};
use dungeon_shooter::render::{DrawCall, Hud, RenderSurface, Sprite};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_WALL: Color = Color::DarkBlue;
const C_FLOOR: Color = Color::DarkGrey;
const C_PLAYER: Color = Color::White;
const C_GUN: Color = Color::Grey;
const C_ENEMY: Color = Color::Red;
const C_BULLET: Color = Color::Yellow;
const C_CROSSHAIR: Color = Color::Cyan;
const C_HUD_AMMO: Color = Color::Yellow;
const C_HUD_HEALTH: Color = Color::Green;
const C_HUD_RELOAD: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

/// Rows reserved above (HUD) and below (controls hint) the play area.
const HUD_ROWS: u16 = 1;
const HINT_ROWS: u16 = 1;

const HEALTH_BAR_CELLS: usize = 20;

/// A key counts as held if its last press/repeat arrived within this many
/// frames. Terminals without release events rely on OS key repeat to keep
/// it fresh.
const HOLD_WINDOW: u64 = 8;

// ── Layout ────────────────────────────────────────────────────────────────────

/// Mapping between screen units and terminal cells.
#[derive(Clone, Copy, Debug)]
pub struct Layout {
    pub cols: u16,
    pub rows: u16,
    /// Screen units covered by one cell.
    pub cell: Vec2,
}

impl Layout {
    pub fn new(term_cols: u16, term_rows: u16, screen: Vec2) -> Layout {
        let cols = term_cols.max(1);
        let rows = term_rows.saturating_sub(HUD_ROWS + HINT_ROWS).max(1);
        Layout {
            cols,
            rows,
            cell: Vec2::new(screen.x / cols as f32, screen.y / rows as f32),
        }
    }

    /// Play-area cell containing a screen point, if any.
    fn cell_of(&self, screen: Vec2) -> Option<(u16, u16)> {
        let c = (screen / self.cell).floor();
        if c.x < 0.0 || c.y < 0.0 || c.x >= self.cols as f32 || c.y >= self.rows as f32 {
            return None;
        }
        Some((c.x as u16, c.y as u16))
    }

    /// Screen point at the middle of a terminal cell.
    fn screen_of(&self, column: u16, row: u16) -> Vec2 {
        let play_row = row.saturating_sub(HUD_ROWS);
        (Vec2::new(column as f32, play_row as f32) + 0.5) * self.cell
    }
}

// ── Render surface ────────────────────────────────────────────────────────────

pub struct TerminalSurface<W: Write> {
    out: W,
    screen: Vec2,
    layout: Layout,
    cells: Vec<(char, Color)>,
    hud: Option<Hud>,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, screen: Vec2) -> std::io::Result<TerminalSurface<W>> {
        let (width, height) = terminal::size()?;
        let layout = Layout::new(width, height, screen);
        Ok(TerminalSurface {
            out,
            screen,
            layout,
            cells: vec![(' ', C_FLOOR); layout.cols as usize * layout.rows as usize],
            hud: None,
        })
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    fn put(&mut self, column: u16, row: u16, glyph: char, color: Color) {
        if column < self.layout.cols && row < self.layout.rows {
            let i = row as usize * self.layout.cols as usize + column as usize;
            self.cells[i] = (glyph, color);
        }
    }

    /// Fill every cell whose center lies inside the rectangle.
    fn fill(&mut self, min: Vec2, max: Vec2, glyph: char, color: Color) {
        let cell = self.layout.cell;
        let first = (min / cell - 0.5).ceil().max(Vec2::ZERO);
        let last = (max / cell - 0.5).floor();
        if last.x < first.x || last.y < first.y {
            return;
        }
        for row in first.y as u16..=last.y.min(u16::MAX as f32) as u16 {
            for column in first.x as u16..=last.x.min(u16::MAX as f32) as u16 {
                self.put(column, row, glyph, color);
            }
        }
    }

    fn point(&mut self, at: Vec2, glyph: char, color: Color) {
        if let Some((column, row)) = self.layout.cell_of(at) {
            self.put(column, row, glyph, color);
        }
    }

    fn write_hud(&mut self, hud: &Hud) -> std::io::Result<()> {
        self.out.queue(cursor::MoveTo(1, 0))?;
        self.out.queue(style::SetForegroundColor(C_HUD_AMMO))?;
        self.out.queue(Print(format!(
            "{} Ammo: {}/{}",
            hud.weapon, hud.ammo, hud.max_ammo
        )))?;
        if hud.reloading {
            self.out.queue(style::SetForegroundColor(C_HUD_RELOAD))?;
            self.out.queue(Print("  [RELOADING]"))?;
        }

        let filled = (hud.health_fraction() * HEALTH_BAR_CELLS as f32).round() as usize;
        let bar = format!(
            "HP [{}{}] {}/{}",
            "█".repeat(filled),
            "░".repeat(HEALTH_BAR_CELLS - filled.min(HEALTH_BAR_CELLS)),
            hud.health,
            hud.max_health
        );
        let x = self.layout.cols.saturating_sub(bar.chars().count() as u16 + 1);
        self.out.queue(cursor::MoveTo(x, 0))?;
        self.out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
        self.out.queue(Print(bar))?;
        Ok(())
    }

    fn draw_controls_hint(&mut self) -> std::io::Result<()> {
        let row = HUD_ROWS + self.layout.rows;
        self.out.queue(cursor::MoveTo(1, row))?;
        self.out.queue(style::SetForegroundColor(C_HINT))?;
        self.out.queue(Print(
            "WASD / ←↑↓→ : Move   Mouse : Aim + Fire   R : Reload   Q : Switch   Esc : Quit",
        ))?;
        Ok(())
    }

    fn draw_game_over(&mut self) -> std::io::Result<()> {
        let lines: &[(&str, Color)] = &[
            ("╔════════════════════╗", Color::Red),
            ("║     YOU  DIED      ║", Color::Red),
            ("╚════════════════════╝", Color::Red),
            ("R - Play Again  Esc - Quit", Color::White),
        ];

        let cx = self.layout.cols / 2;
        let start_row = HUD_ROWS + (self.layout.rows / 2).saturating_sub(lines.len() as u16 / 2);
        for (i, (msg, color)) in lines.iter().enumerate() {
            let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
            self.out.queue(cursor::MoveTo(col, start_row + i as u16))?;
            self.out.queue(style::SetForegroundColor(*color))?;
            self.out.queue(Print(*msg))?;
        }
        Ok(())
    }
}

/// Arrow pointing along a rotation in degrees, +y down.
fn arrow_for(rotation: f32) -> char {
    const ARROWS: [char; 8] = ['→', '↘', '↓', '↙', '←', '↖', '↑', '↗'];
    let octant = (rotation.rem_euclid(360.0) / 45.0).round() as usize % 8;
    ARROWS[octant]
}

impl<W: Write> RenderSurface for TerminalSurface<W> {
    fn begin_frame(&mut self) {
        if let Ok((width, height)) = terminal::size() {
            let layout = Layout::new(width, height, self.screen);
            if layout.cols != self.layout.cols || layout.rows != self.layout.rows {
                self.layout = layout;
            }
        }
        self.cells.clear();
        self.cells.resize(
            self.layout.cols as usize * self.layout.rows as usize,
            (' ', C_FLOOR),
        );
        self.hud = None;
    }

    fn blit(&mut self, call: DrawCall) {
        let half = call.size * call.scale * 0.5;
        let (min, max) = (call.center - half, call.center + half);
        match call.sprite {
            Sprite::Floor => self.fill(min, max, '·', C_FLOOR),
            Sprite::Wall => self.fill(min, max, '█', C_WALL),
            Sprite::Player => {
                self.fill(min, max, '▓', C_PLAYER);
                self.point(call.center, '☻', C_PLAYER);
            }
            Sprite::Enemy => {
                self.fill(min, max, '▒', C_ENEMY);
                self.point(call.center, '◎', C_ENEMY);
            }
            Sprite::Gun(_) => {
                let reach = half.x.max(self.layout.cell.x);
                let tip = call.center + Vec2::from_angle(call.rotation.to_radians()) * reach;
                self.point(tip, arrow_for(call.rotation), C_GUN);
            }
            Sprite::Bullet => self.point(call.center, '•', C_BULLET),
            Sprite::Crosshair => self.point(call.center, '+', C_CROSSHAIR),
        }
    }

    fn draw_hud(&mut self, hud: &Hud) {
        self.hud = Some(hud.clone());
    }

    fn present(&mut self) -> std::io::Result<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;

        let cols = self.layout.cols as usize;
        for (row, line) in self.cells.chunks(cols).enumerate() {
            self.out.queue(cursor::MoveTo(0, HUD_ROWS + row as u16))?;
            let mut current: Option<Color> = None;
            let mut run = String::with_capacity(cols);
            for &(glyph, color) in line {
                if current != Some(color) {
                    if let Some(c) = current {
                        self.out.queue(style::SetForegroundColor(c))?;
                        self.out.queue(Print(&run))?;
                        run.clear();
                    }
                    current = Some(color);
                }
                run.push(glyph);
            }
            if let Some(c) = current {
                self.out.queue(style::SetForegroundColor(c))?;
                self.out.queue(Print(&run))?;
            }
        }

        if let Some(hud) = self.hud.take() {
            self.write_hud(&hud)?;
            if hud.game_over {
                self.draw_game_over()?;
            }
        }
        self.draw_controls_hint()?;

        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, HUD_ROWS + self.layout.rows))?;
        self.out.flush()
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Turns the raw crossterm event stream into discrete events plus held state.
///
/// Held keys are tracked by the frame they were last seen (press or repeat);
/// release events remove them immediately on terminals that report them.
pub struct TerminalInput {
    rx: mpsc::Receiver<Event>,
    screen: Vec2,
    layout: Layout,
    key_frame: HashMap<KeyCode, u64>,
    frame: u64,
    pointer: Vec2,
    fire: bool,
}

impl TerminalInput {
    pub fn new(rx: mpsc::Receiver<Event>, screen: Vec2, layout: Layout) -> TerminalInput {
        TerminalInput {
            rx,
            screen,
            layout,
            key_frame: HashMap::new(),
            frame: 0,
            pointer: Vec2::ZERO,
            fire: false,
        }
    }

    fn is_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|code| {
            self.key_frame
                .get(code)
                .map(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
                .unwrap_or(false)
        })
    }
}

impl InputSource for TerminalInput {
    fn drain_events(&mut self) -> Vec<InputEvent> {
        self.frame += 1;
        let mut events = Vec::new();

        while let Ok(event) = self.rx.try_recv() {
            match event {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        self.key_frame.insert(code, self.frame);
                        let event = match code {
                            KeyCode::Esc => InputEvent::Quit,
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                InputEvent::Quit
                            }
                            KeyCode::Char(c) => InputEvent::KeyDown(Key::Char(c)),
                            _ => InputEvent::KeyDown(Key::Other),
                        };
                        events.push(event);
                    }
                    KeyEventKind::Repeat => {
                        self.key_frame.insert(code, self.frame);
                    }
                    KeyEventKind::Release => {
                        self.key_frame.remove(&code);
                    }
                },
                Event::Mouse(mouse) => {
                    self.pointer = self.layout.screen_of(mouse.column, mouse.row);
                    match mouse.kind {
                        MouseEventKind::Down(MouseButton::Left)
                        | MouseEventKind::Drag(MouseButton::Left) => self.fire = true,
                        MouseEventKind::Up(MouseButton::Left) => self.fire = false,
                        _ => {}
                    }
                }
                Event::Resize(width, height) => {
                    self.layout = Layout::new(width, height, self.screen);
                }
                _ => {}
            }
        }
        events
    }

    fn controls(&mut self) -> Controls {
        Controls {
            up: self.is_held(&[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')]),
            down: self.is_held(&[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')]),
            left: self.is_held(&[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')]),
            right: self.is_held(&[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')]),
            pointer: self.pointer,
            fire: self.fire,
        }
    }
}
