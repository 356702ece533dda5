//! Translation of raw keys and gestures into gameplay input.

use glam::Vec2;
use tile_merge_core::{Direction, Input};

/// Minimum travel, in screen units, for a gesture to count as a swipe.
pub const SWIPE_THRESHOLD: f32 = 30.0;

/// Keys an input source may report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Arrow key pointing up.
    ArrowUp,
    /// Arrow key pointing down.
    ArrowDown,
    /// Arrow key pointing left.
    ArrowLeft,
    /// Arrow key pointing right.
    ArrowRight,
    /// Any printable character.
    Char(char),
    /// Any other key.
    Other,
}

impl Key {
    /// Translates the key into gameplay input.
    ///
    /// Arrow keys, `WASD` and the `hjkl` keys map to directions; everything
    /// else is inert.
    #[must_use]
    pub fn to_input(self) -> Input {
        let direction = match self {
            Key::ArrowUp => Direction::Up,
            Key::ArrowDown => Direction::Down,
            Key::ArrowLeft => Direction::Left,
            Key::ArrowRight => Direction::Right,
            Key::Char(character) => match character.to_ascii_lowercase() {
                'w' | 'k' => Direction::Up,
                's' | 'j' => Direction::Down,
                'a' | 'h' => Direction::Left,
                'd' | 'l' => Direction::Right,
                _ => return Input::Inert,
            },
            Key::Other => return Input::Inert,
        };
        Input::Direction(direction)
    }
}

/// Touch gesture from the point of contact to the point of release.
///
/// Coordinates are in screen space, so `y` grows downwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Swipe {
    /// Position where the gesture started.
    pub start: Vec2,
    /// Position where the gesture ended.
    pub end: Vec2,
}

impl Swipe {
    /// Creates a swipe between the provided positions.
    #[must_use]
    pub const fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Translates the swipe into gameplay input along its dominant axis.
    #[must_use]
    pub fn to_input(self) -> Input {
        let delta = self.end - self.start;
        let direction = if delta.x.abs() > delta.y.abs() {
            if delta.x > SWIPE_THRESHOLD {
                Direction::Right
            } else if delta.x < -SWIPE_THRESHOLD {
                Direction::Left
            } else {
                return Input::Inert;
            }
        } else if delta.y > SWIPE_THRESHOLD {
            Direction::Down
        } else if delta.y < -SWIPE_THRESHOLD {
            Direction::Up
        } else {
            return Input::Inert;
        };
        Input::Direction(direction)
    }
}
