//! Input collaborators.
//!
//! The console never polls devices. Application code reads input through the [`GridInput`]
//! trait, whose positions are already in grid cells. [`InputState`] implements it from
//! `crossterm` events with "just pressed" semantics: events are recorded as they arrive and become
//! visible when the next frame starts.

use crate::rendering::geometry::Point;
use crate::rendering::renderer::TileMetrics;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use smallvec::SmallVec;

/// At most this many distinct keys are recorded per frame.
pub const MAX_KEYS_PER_FRAME: usize = 16;

type KeyCounts = micromap::Map<KeyCode, u8, MAX_KEYS_PER_FRAME>;

/// Per-frame input as seen by the application.
pub trait GridInput {
    /// The grid cell under the pointer.
    fn mouse_pos(&self) -> Point;
    /// Has the pointer moved to another cell since the last frame?
    fn has_mouse_moved(&self) -> bool;

    fn is_mouse_left(&self) -> bool;
    fn is_mouse_right(&self) -> bool;

    /// Escape.
    fn is_menu_close(&self) -> bool;
    /// Enter, or a left click.
    fn is_menu_confirm(&self) -> bool;
    /// Arrow down or `s`.
    fn is_menu_down(&self) -> bool;
    /// Arrow up or `w`.
    fn is_menu_up(&self) -> bool;

    /// The keys pressed since the last frame.
    fn just_pressed_keys(&self) -> SmallVec<[KeyCode; MAX_KEYS_PER_FRAME]>;
}

/// Converts a pointer position in device pixels to the grid cell under it.
///
/// The result is clamped into the grid, so positions outside the window map to the nearest edge
/// cell. An empty grid always yields the origin.
///
/// ```rust
/// use deltacon::input::pointer_from_pixels;
/// use deltacon::rendering::geometry::Point;
/// use deltacon::rendering::renderer::TileMetrics;
///
/// let tiles = TileMetrics::new(20, 20, 2.0);
/// let grid = Point::new(64, 36);
/// assert_eq!(pointer_from_pixels(85.0, 39.0, tiles, grid), Point::new(2, 0));
/// assert_eq!(pointer_from_pixels(-5.0, 1e9, tiles, grid), Point::new(0, 35));
/// ```
pub fn pointer_from_pixels(px: f64, py: f64, tiles: TileMetrics, grid_size: Point) -> Point {
    let to_cell = |pixels: f64, tile: u32, cells: usize| -> usize {
        let max = cells.saturating_sub(1) as f64;
        // a NaN cell saturates to zero
        (pixels / (f64::from(tile) * tiles.scale)).clamp(0.0, max) as usize
    };
    Point::new(
        to_cell(px, tiles.tile_width, grid_size.x),
        to_cell(py, tiles.tile_height, grid_size.y),
    )
}

/// Button presses since the last frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct MousePresses {
    left: bool,
    right: bool,
}

/// Input state fed by `crossterm` events.
///
/// Call [`InputState::handle_event`] for every event, and [`InputState::next_frame`] once at the
/// start of every frame.
pub struct InputState {
    grid_size: Point,
    pending_keys: KeyCounts,
    pressed_keys: KeyCounts,
    pending_presses: MousePresses,
    presses: MousePresses,
    pending_mouse_pos: Option<Point>,
    mouse_pos: Point,
    last_mouse_pos: Point,
}

impl InputState {
    /// Creates an input state for a grid of the given size.
    pub fn new(grid_size: Point) -> Self {
        Self {
            grid_size,
            pending_keys: KeyCounts::new(),
            pressed_keys: KeyCounts::new(),
            pending_presses: MousePresses::default(),
            presses: MousePresses::default(),
            pending_mouse_pos: None,
            mouse_pos: Point::default(),
            last_mouse_pos: Point::default(),
        }
    }

    /// Updates the grid size. The pointer is clamped into the new grid.
    pub fn set_grid_size(&mut self, grid_size: Point) {
        self.grid_size = grid_size;
        self.mouse_pos = self.clamp(self.mouse_pos);
        self.last_mouse_pos = self.clamp(self.last_mouse_pos);
    }

    fn clamp(&self, p: Point) -> Point {
        Point::new(
            p.x.min(self.grid_size.x.saturating_sub(1)),
            p.y.min(self.grid_size.y.saturating_sub(1)),
        )
    }

    /// Records an event. It becomes visible on the next [`InputState::next_frame`].
    pub fn handle_event(&mut self, event: &Event) {
        match event {
            // only capture presses to work on windows as well (where we get Release too)
            Event::Key(KeyEvent {
                kind: KeyEventKind::Press,
                code,
                ..
            }) => self.record_key(*code),
            Event::Mouse(mouse) => self.record_mouse(*mouse),
            _ => {}
        }
    }

    fn record_key(&mut self, code: KeyCode) {
        if let Some(count) = self.pending_keys.get_mut(&code) {
            *count = count.saturating_add(1);
        } else if self.pending_keys.len() < MAX_KEYS_PER_FRAME {
            // the map is fixed size, further keys of this frame are dropped
            self.pending_keys.insert(code, 1);
        }
    }

    fn record_mouse(&mut self, event: MouseEvent) {
        let p = Point::new(event.column as usize, event.row as usize);
        self.pending_mouse_pos = Some(self.clamp(p));
        if let MouseEventKind::Down(button) = event.kind {
            match button {
                MouseButton::Left => self.pending_presses.left = true,
                MouseButton::Right => self.pending_presses.right = true,
                MouseButton::Middle => {}
            }
        }
    }

    /// Moves the pointer to a position given in device pixels, e.g. from a windowing system.
    pub fn record_pointer_pixels(&mut self, px: f64, py: f64, tiles: TileMetrics) {
        self.pending_mouse_pos = Some(pointer_from_pixels(px, py, tiles, self.grid_size));
    }

    /// Starts a new frame: everything recorded since the last call becomes the current input.
    pub fn next_frame(&mut self) {
        std::mem::swap(&mut self.pressed_keys, &mut self.pending_keys);
        self.pending_keys.clear();
        self.presses = std::mem::take(&mut self.pending_presses);

        self.last_mouse_pos = self.mouse_pos;
        if let Some(p) = self.pending_mouse_pos.take() {
            self.mouse_pos = p;
        }
    }

    /// Returns true if the given key was pressed since the last frame.
    pub fn did_press(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains_key(&key)
    }

    /// Returns true if the given character was pressed since the last frame, ignoring case.
    pub fn did_press_char_ignore_case(&self, c: char) -> bool {
        self.did_press(KeyCode::Char(c.to_ascii_lowercase()))
            || self.did_press(KeyCode::Char(c.to_ascii_uppercase()))
    }

    /// How often `key` was pressed since the last frame.
    pub fn press_count(&self, key: KeyCode) -> u8 {
        self.pressed_keys.get(&key).copied().unwrap_or(0)
    }
}

impl GridInput for InputState {
    fn mouse_pos(&self) -> Point {
        self.mouse_pos
    }

    fn has_mouse_moved(&self) -> bool {
        self.mouse_pos != self.last_mouse_pos
    }

    fn is_mouse_left(&self) -> bool {
        self.presses.left
    }

    fn is_mouse_right(&self) -> bool {
        self.presses.right
    }

    fn is_menu_close(&self) -> bool {
        self.did_press(KeyCode::Esc)
    }

    fn is_menu_confirm(&self) -> bool {
        self.did_press(KeyCode::Enter) || self.is_mouse_left()
    }

    fn is_menu_down(&self) -> bool {
        self.did_press(KeyCode::Down) || self.did_press_char_ignore_case('s')
    }

    fn is_menu_up(&self) -> bool {
        self.did_press(KeyCode::Up) || self.did_press_char_ignore_case('w')
    }

    fn just_pressed_keys(&self) -> SmallVec<[KeyCode; MAX_KEYS_PER_FRAME]> {
        self.pressed_keys.iter().map(|(key, _)| *key).collect()
    }
}
