// crates/skyfire_core/src/input/keymap.rs
//! winit keyboard events to the game's key types.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use skyfire_shared::{Key, KeyAction, KeyEvent, Modifiers};
use winit::event::{ElementState, KeyEvent as WinitKeyEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

pub fn map_key_code(code: KeyCode) -> Key {
    match code {
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::Space => Key::Space,
        KeyCode::Escape => Key::Escape,
        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        other => Key::Other(unnamed_key_id(other)),
    }
}

/// Stable per-process id for keys the game has no name for.
fn unnamed_key_id(code: KeyCode) -> u32 {
    let mut hasher = DefaultHasher::new();
    code.hash(&mut hasher);
    hasher.finish() as u32
}

pub fn map_action(state: ElementState, repeat: bool) -> KeyAction {
    match (state, repeat) {
        (ElementState::Released, _) => KeyAction::Release,
        (ElementState::Pressed, true) => KeyAction::Repeat,
        (ElementState::Pressed, false) => KeyAction::Press,
    }
}

pub fn map_modifiers(state: ModifiersState) -> Modifiers {
    Modifiers {
        shift: state.shift_key(),
        control: state.control_key(),
        alt: state.alt_key(),
        logo: state.super_key(),
    }
}

/// None for keys winit could not identify.
pub fn map_key_event(event: &WinitKeyEvent, modifiers: Modifiers) -> Option<KeyEvent> {
    let PhysicalKey::Code(code) = event.physical_key else {
        return None;
    };
    Some(KeyEvent {
        key: map_key_code(code),
        action: map_action(event.state, event.repeat),
        modifiers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_function_keys_map_by_name() {
        assert_eq!(map_key_code(KeyCode::ArrowLeft), Key::Left);
        assert_eq!(map_key_code(KeyCode::Space), Key::Space);
        assert_eq!(map_key_code(KeyCode::F7), Key::F7);
        assert!(matches!(map_key_code(KeyCode::KeyQ), Key::Other(_)));
        assert_eq!(map_key_code(KeyCode::KeyQ), map_key_code(KeyCode::KeyQ));
    }

    #[test]
    fn repeats_are_told_apart_from_presses() {
        assert_eq!(map_action(ElementState::Pressed, false), KeyAction::Press);
        assert_eq!(map_action(ElementState::Pressed, true), KeyAction::Repeat);
        assert_eq!(map_action(ElementState::Released, true), KeyAction::Release);
    }

    #[test]
    fn modifier_flags_carry_over() {
        let mods = map_modifiers(ModifiersState::SHIFT | ModifiersState::ALT);
        assert!(mods.shift && mods.alt);
        assert!(!mods.control && !mods.logo);
        assert_eq!(map_modifiers(ModifiersState::empty()), Modifiers::NONE);
    }
}
