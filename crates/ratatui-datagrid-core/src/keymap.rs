use crate::datagrid::navigation::NavigationCommand;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::KeyModifiers;

pub fn key_event_matches(pattern: &KeyEvent, event: &KeyEvent) -> bool {
    pattern.code == event.code && pattern.modifiers == event.modifiers
}

pub fn key_char(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c))
}

pub fn key_ctrl(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code).with_modifiers(KeyModifiers::CTRL)
}

/// Key bindings for grid navigation.
///
/// Each field lists the keys that trigger one [`NavigationCommand`]. Modifiers must match
/// exactly, so `Shift+Tab` never triggers `tab`.
#[derive(Clone, Debug)]
pub struct NavigationBindings {
    pub left: Vec<KeyEvent>,
    pub right: Vec<KeyEvent>,
    pub up: Vec<KeyEvent>,
    pub down: Vec<KeyEvent>,
    pub row_start: Vec<KeyEvent>,
    pub row_end: Vec<KeyEvent>,
    pub top: Vec<KeyEvent>,
    pub bottom: Vec<KeyEvent>,
    pub first_cell: Vec<KeyEvent>,
    pub last_cell: Vec<KeyEvent>,
    pub tab: Vec<KeyEvent>,
    pub shift_tab: Vec<KeyEvent>,
}

impl Default for NavigationBindings {
    fn default() -> Self {
        Self {
            left: vec![KeyEvent::new(KeyCode::Left), key_char('h')],
            right: vec![KeyEvent::new(KeyCode::Right), key_char('l')],
            up: vec![KeyEvent::new(KeyCode::Up), key_char('k')],
            down: vec![KeyEvent::new(KeyCode::Down), key_char('j')],
            row_start: vec![KeyEvent::new(KeyCode::Home), key_ctrl(KeyCode::Left)],
            row_end: vec![KeyEvent::new(KeyCode::End), key_ctrl(KeyCode::Right)],
            top: vec![key_ctrl(KeyCode::Up), key_char('g')],
            bottom: vec![key_ctrl(KeyCode::Down), key_char('G')],
            first_cell: vec![key_ctrl(KeyCode::Home)],
            last_cell: vec![key_ctrl(KeyCode::End)],
            tab: vec![KeyEvent::new(KeyCode::Tab)],
            shift_tab: vec![KeyEvent::shift(KeyCode::Tab)],
        }
    }
}

impl NavigationBindings {
    pub fn command_for(&self, key: &KeyEvent) -> Option<NavigationCommand> {
        let table: [(&[KeyEvent], NavigationCommand); 12] = [
            (&self.left, NavigationCommand::Left),
            (&self.right, NavigationCommand::Right),
            (&self.up, NavigationCommand::Up),
            (&self.down, NavigationCommand::Down),
            (&self.row_start, NavigationCommand::RowStart),
            (&self.row_end, NavigationCommand::RowEnd),
            (&self.top, NavigationCommand::Top),
            (&self.bottom, NavigationCommand::Bottom),
            (&self.first_cell, NavigationCommand::FirstCell),
            (&self.last_cell, NavigationCommand::LastCell),
            (&self.tab, NavigationCommand::Tab),
            (&self.shift_tab, NavigationCommand::ShiftTab),
        ];
        table
            .into_iter()
            .find(|(keys, _)| keys.iter().any(|p| key_event_matches(p, key)))
            .map(|(_, command)| command)
    }
}
