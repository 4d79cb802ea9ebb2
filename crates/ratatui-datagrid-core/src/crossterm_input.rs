use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::KeyModifiers;
use crate::input::WheelDirection;
use crate::input::WheelEvent;

pub fn input_event_from_crossterm(ev: crossterm::event::Event) -> Option<InputEvent> {
    match ev {
        crossterm::event::Event::Key(key) => {
            if key.kind != crossterm::event::KeyEventKind::Press {
                return None;
            }
            Some(InputEvent::Key(key_event_from_crossterm(key)?))
        }
        crossterm::event::Event::Mouse(m) => {
            Some(InputEvent::Wheel(wheel_event_from_crossterm(m)?))
        }
        crossterm::event::Event::Paste(s) => Some(InputEvent::Paste(s)),
        _ => None,
    }
}

/// Only wheel motion is forwarded; clicks and drags have no meaning for the grid.
pub fn wheel_event_from_crossterm(m: crossterm::event::MouseEvent) -> Option<WheelEvent> {
    let direction = match m.kind {
        crossterm::event::MouseEventKind::ScrollUp => WheelDirection::Up,
        crossterm::event::MouseEventKind::ScrollDown => WheelDirection::Down,
        crossterm::event::MouseEventKind::ScrollLeft => WheelDirection::Left,
        crossterm::event::MouseEventKind::ScrollRight => WheelDirection::Right,
        _ => return None,
    };
    Some(WheelEvent {
        direction,
        modifiers: modifiers_from_crossterm(m.modifiers),
    })
}

/// Converts a crossterm key press.
///
/// `BackTab` becomes `Shift+Tab`. For printable characters the shift state is already encoded
/// in the character itself, so it is dropped from the modifiers.
pub fn key_event_from_crossterm(key: crossterm::event::KeyEvent) -> Option<KeyEvent> {
    let mut modifiers = modifiers_from_crossterm(key.modifiers);
    let code = match key.code {
        crossterm::event::KeyCode::Char(c) => {
            modifiers.shift = false;
            KeyCode::Char(c)
        }
        crossterm::event::KeyCode::BackTab => {
            modifiers.shift = true;
            KeyCode::Tab
        }
        crossterm::event::KeyCode::Enter => KeyCode::Enter,
        crossterm::event::KeyCode::Backspace => KeyCode::Backspace,
        crossterm::event::KeyCode::Delete => KeyCode::Delete,
        crossterm::event::KeyCode::Tab => KeyCode::Tab,
        crossterm::event::KeyCode::Esc => KeyCode::Esc,
        crossterm::event::KeyCode::Left => KeyCode::Left,
        crossterm::event::KeyCode::Right => KeyCode::Right,
        crossterm::event::KeyCode::Up => KeyCode::Up,
        crossterm::event::KeyCode::Down => KeyCode::Down,
        crossterm::event::KeyCode::Home => KeyCode::Home,
        crossterm::event::KeyCode::End => KeyCode::End,
        crossterm::event::KeyCode::PageUp => KeyCode::PageUp,
        crossterm::event::KeyCode::PageDown => KeyCode::PageDown,
        _ => return None,
    };

    Some(KeyEvent { code, modifiers })
}

fn modifiers_from_crossterm(m: crossterm::event::KeyModifiers) -> KeyModifiers {
    KeyModifiers {
        shift: m.contains(crossterm::event::KeyModifiers::SHIFT),
        ctrl: m.contains(crossterm::event::KeyModifiers::CONTROL),
        alt: m.contains(crossterm::event::KeyModifiers::ALT),
    }
}
