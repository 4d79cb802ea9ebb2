//! UI-agnostic input events.
//!
//! Widgets in this crate never talk to a terminal backend directly. Convert backend events
//! into these types (see `crossterm_input` behind the `crossterm` feature) and feed them to
//! `handle_event`.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl KeyModifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };

    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };

    pub fn none() -> Self {
        Self::NONE
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Tab,
    Esc,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn shift(code: KeyCode) -> Self {
        Self::new(code).with_modifiers(KeyModifiers::SHIFT)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code).with_modifiers(KeyModifiers::CTRL)
    }
}

/// Mouse wheel direction. Horizontal wheels are reported as `Left`/`Right`; terminals that
/// lack them usually send `Shift` with a vertical wheel instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WheelDirection {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WheelEvent {
    pub direction: WheelDirection,
    pub modifiers: KeyModifiers,
}

impl WheelEvent {
    /// Rows and columns to scroll by for one notch of `step` cells.
    pub fn delta(self, step: i64) -> (i64, i64) {
        match (self.direction, self.modifiers.shift) {
            (WheelDirection::Up, false) => (-step, 0),
            (WheelDirection::Down, false) => (step, 0),
            (WheelDirection::Up, true) | (WheelDirection::Left, _) => (0, -step),
            (WheelDirection::Down, true) | (WheelDirection::Right, _) => (0, step),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Wheel(WheelEvent),
    Paste(String),
}
