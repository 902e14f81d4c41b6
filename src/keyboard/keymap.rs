//! Physical key codes and the characters they produce

use std::collections::HashMap;
use std::sync::LazyLock;

/// Physical key identifier, numbered after Linux evdev scancodes.
///
/// The code identifies the key switch, not the character: `a` and `A` share
/// `KeyCode(30)`. Code 0 collects every key the keymap does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub const UNKNOWN: KeyCode = KeyCode(0);
    pub const LEFT_SHIFT: KeyCode = KeyCode(42);
    pub const RIGHT_SHIFT: KeyCode = KeyCode(54);
    pub const ESCAPE: KeyCode = KeyCode(1);
    pub const TAB: KeyCode = KeyCode(15);

    pub fn new(code: u16) -> Self {
        Self(code)
    }

    pub fn as_u16(&self) -> u16 {
        self.0
    }

    pub fn is_shift(&self) -> bool {
        *self == Self::LEFT_SHIFT || *self == Self::RIGHT_SHIFT
    }

    /// Ctrl, Alt or Meta: keys that turn the next key into a shortcut
    pub fn is_chord_modifier(&self) -> bool {
        matches!(self.0, 29 | 97 | 56 | 100 | 125 | 126)
    }

    /// F1 through F12
    pub fn is_function_key(&self) -> bool {
        matches!(self.0, 59..=68 | 87 | 88)
    }
}

impl From<u16> for KeyCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

impl From<device_query::Keycode> for KeyCode {
    fn from(keycode: device_query::Keycode) -> Self {
        use device_query::Keycode as DK;
        let code = match keycode {
            DK::Escape => 1,
            DK::Key1 => 2,
            DK::Key2 => 3,
            DK::Key3 => 4,
            DK::Key4 => 5,
            DK::Key5 => 6,
            DK::Key6 => 7,
            DK::Key7 => 8,
            DK::Key8 => 9,
            DK::Key9 => 10,
            DK::Key0 => 11,
            DK::Minus => 12,
            DK::Equal => 13,
            DK::Backspace => 14,
            DK::Tab => 15,
            DK::Q => 16,
            DK::W => 17,
            DK::E => 18,
            DK::R => 19,
            DK::T => 20,
            DK::Y => 21,
            DK::U => 22,
            DK::I => 23,
            DK::O => 24,
            DK::P => 25,
            DK::LeftBracket => 26,
            DK::RightBracket => 27,
            DK::Enter => 28,
            DK::LControl => 29,
            DK::A => 30,
            DK::S => 31,
            DK::D => 32,
            DK::F => 33,
            DK::G => 34,
            DK::H => 35,
            DK::J => 36,
            DK::K => 37,
            DK::L => 38,
            DK::Semicolon => 39,
            DK::Apostrophe => 40,
            DK::Grave => 41,
            DK::LShift => 42,
            DK::BackSlash => 43,
            DK::Z => 44,
            DK::X => 45,
            DK::C => 46,
            DK::V => 47,
            DK::B => 48,
            DK::N => 49,
            DK::M => 50,
            DK::Comma => 51,
            DK::Dot => 52,
            DK::Slash => 53,
            DK::RShift => 54,
            DK::LAlt => 56,
            DK::Space => 57,
            DK::CapsLock => 58,
            DK::F1 => 59,
            DK::F2 => 60,
            DK::F3 => 61,
            DK::F4 => 62,
            DK::F5 => 63,
            DK::F6 => 64,
            DK::F7 => 65,
            DK::F8 => 66,
            DK::F9 => 67,
            DK::F10 => 68,
            DK::F11 => 87,
            DK::F12 => 88,
            DK::RControl => 97,
            DK::RAlt => 100,
            DK::Home => 102,
            DK::Up => 103,
            DK::PageUp => 104,
            DK::Left => 105,
            DK::Right => 106,
            DK::End => 107,
            DK::Down => 108,
            DK::PageDown => 109,
            DK::Insert => 110,
            DK::Delete => 111,
            DK::LMeta => 125,
            DK::RMeta => 126,
            DK::Numpad0 => 82,
            DK::Numpad1 => 79,
            DK::Numpad2 => 80,
            DK::Numpad3 => 81,
            DK::Numpad4 => 75,
            DK::Numpad5 => 76,
            DK::Numpad6 => 77,
            DK::Numpad7 => 71,
            DK::Numpad8 => 72,
            DK::Numpad9 => 73,
            DK::NumpadSubtract => 74,
            DK::NumpadAdd => 78,
            DK::NumpadDivide => 98,
            DK::NumpadMultiply => 55,
            _ => 0,
        };
        Self(code)
    }
}

/// What a physical key is called and what it types
#[derive(Debug, Clone)]
pub struct KeyInfo {
    /// Display name for the key
    pub name: &'static str,
    /// Character typed without Shift
    pub base: Option<char>,
    /// Character typed with Shift held
    pub shifted: Option<char>,
}

impl KeyInfo {
    const fn typing(name: &'static str, base: char, shifted: char) -> Self {
        Self { name, base: Some(base), shifted: Some(shifted) }
    }

    const fn control(name: &'static str) -> Self {
        Self { name, base: None, shifted: None }
    }
}

/// Static keymap for the US layout
pub static KEYMAP: LazyLock<HashMap<KeyCode, KeyInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Number row
    map.insert(KeyCode(41), KeyInfo::typing("Grave", '`', '~'));
    map.insert(KeyCode(2), KeyInfo::typing("1", '1', '!'));
    map.insert(KeyCode(3), KeyInfo::typing("2", '2', '@'));
    map.insert(KeyCode(4), KeyInfo::typing("3", '3', '#'));
    map.insert(KeyCode(5), KeyInfo::typing("4", '4', '$'));
    map.insert(KeyCode(6), KeyInfo::typing("5", '5', '%'));
    map.insert(KeyCode(7), KeyInfo::typing("6", '6', '^'));
    map.insert(KeyCode(8), KeyInfo::typing("7", '7', '&'));
    map.insert(KeyCode(9), KeyInfo::typing("8", '8', '*'));
    map.insert(KeyCode(10), KeyInfo::typing("9", '9', '('));
    map.insert(KeyCode(11), KeyInfo::typing("0", '0', ')'));
    map.insert(KeyCode(12), KeyInfo::typing("Minus", '-', '_'));
    map.insert(KeyCode(13), KeyInfo::typing("Equals", '=', '+'));

    // Letter rows
    let letters: [(u16, &'static str, char); 26] = [
        (16, "Q", 'q'), (17, "W", 'w'), (18, "E", 'e'), (19, "R", 'r'), (20, "T", 't'),
        (21, "Y", 'y'), (22, "U", 'u'), (23, "I", 'i'), (24, "O", 'o'), (25, "P", 'p'),
        (30, "A", 'a'), (31, "S", 's'), (32, "D", 'd'), (33, "F", 'f'), (34, "G", 'g'),
        (35, "H", 'h'), (36, "J", 'j'), (37, "K", 'k'), (38, "L", 'l'),
        (44, "Z", 'z'), (45, "X", 'x'), (46, "C", 'c'), (47, "V", 'v'), (48, "B", 'b'),
        (49, "N", 'n'), (50, "M", 'm'),
    ];
    for (code, name, ch) in letters {
        map.insert(KeyCode(code), KeyInfo::typing(name, ch, ch.to_ascii_uppercase()));
    }

    // Punctuation
    map.insert(KeyCode(26), KeyInfo::typing("LeftBracket", '[', '{'));
    map.insert(KeyCode(27), KeyInfo::typing("RightBracket", ']', '}'));
    map.insert(KeyCode(43), KeyInfo::typing("Backslash", '\\', '|'));
    map.insert(KeyCode(39), KeyInfo::typing("Semicolon", ';', ':'));
    map.insert(KeyCode(40), KeyInfo::typing("Apostrophe", '\'', '"'));
    map.insert(KeyCode(51), KeyInfo::typing("Comma", ',', '<'));
    map.insert(KeyCode(52), KeyInfo::typing("Period", '.', '>'));
    map.insert(KeyCode(53), KeyInfo::typing("Slash", '/', '?'));
    map.insert(KeyCode(57), KeyInfo::typing("Space", ' ', ' '));

    // Numpad types the same with or without Shift
    for (code, name, ch) in [
        (82, "Numpad0", '0'), (79, "Numpad1", '1'), (80, "Numpad2", '2'), (81, "Numpad3", '3'),
        (75, "Numpad4", '4'), (76, "Numpad5", '5'), (77, "Numpad6", '6'), (71, "Numpad7", '7'),
        (72, "Numpad8", '8'), (73, "Numpad9", '9'), (74, "NumpadMinus", '-'),
        (78, "NumpadPlus", '+'), (98, "NumpadSlash", '/'), (55, "NumpadAsterisk", '*'),
    ] {
        map.insert(KeyCode(code), KeyInfo::typing(name, ch, ch));
    }

    // Control and navigation keys type nothing
    for (code, name) in [
        (1, "Escape"), (14, "Backspace"), (15, "Tab"), (28, "Enter"), (58, "CapsLock"),
        (29, "LeftCtrl"), (97, "RightCtrl"), (42, "LeftShift"), (54, "RightShift"),
        (56, "LeftAlt"), (100, "RightAlt"), (125, "LeftMeta"), (126, "RightMeta"),
        (102, "Home"), (103, "Up"), (104, "PageUp"), (105, "Left"), (106, "Right"),
        (107, "End"), (108, "Down"), (109, "PageDown"), (110, "Insert"), (111, "Delete"),
        (59, "F1"), (60, "F2"), (61, "F3"), (62, "F4"), (63, "F5"), (64, "F6"),
        (65, "F7"), (66, "F8"), (67, "F9"), (68, "F10"), (87, "F11"), (88, "F12"),
    ] {
        map.insert(KeyCode(code), KeyInfo::control(name));
    }

    map
});

/// Get key info by code, returns a placeholder if not found
pub fn get_key_info(code: KeyCode) -> KeyInfo {
    KEYMAP
        .get(&code)
        .cloned()
        .unwrap_or_else(|| KeyInfo::control("Unknown"))
}

/// Character produced by `code` given the current Shift state
pub fn logical_char(code: KeyCode, shift: bool) -> Option<char> {
    let info = KEYMAP.get(&code)?;
    if shift {
        info.shifted
    } else {
        info.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_follow_shift_state() {
        assert_eq!(logical_char(KeyCode(30), false), Some('a'));
        assert_eq!(logical_char(KeyCode(30), true), Some('A'));
        assert_eq!(logical_char(KeyCode(50), false), Some('m'));
    }

    #[test]
    fn punctuation_has_shifted_symbol() {
        assert_eq!(logical_char(KeyCode(2), true), Some('!'));
        assert_eq!(logical_char(KeyCode(53), false), Some('/'));
        assert_eq!(logical_char(KeyCode(53), true), Some('?'));
    }

    #[test]
    fn control_keys_type_nothing() {
        assert_eq!(logical_char(KeyCode::LEFT_SHIFT, false), None);
        assert_eq!(logical_char(KeyCode(14), true), None);
        assert_eq!(logical_char(KeyCode::UNKNOWN, false), None);
    }

    #[test]
    fn unknown_code_has_placeholder_name() {
        assert_eq!(get_key_info(KeyCode(999)).name, "Unknown");
        assert_eq!(get_key_info(KeyCode(57)).name, "Space");
    }

    #[test]
    fn device_query_letters_map_to_scancodes() {
        assert_eq!(KeyCode::from(device_query::Keycode::A), KeyCode(30));
        assert_eq!(KeyCode::from(device_query::Keycode::S), KeyCode(31));
        assert!(KeyCode::from(device_query::Keycode::RShift).is_shift());
    }

    #[test]
    fn distinct_device_keys_get_distinct_codes() {
        use device_query::Keycode as DK;
        use std::collections::HashSet;

        let keys = [
            DK::Escape, DK::Tab, DK::Enter, DK::Space, DK::Backspace, DK::A, DK::Z,
            DK::Key1, DK::Key0, DK::LControl, DK::RControl, DK::LAlt, DK::RAlt,
            DK::LShift, DK::RShift, DK::LMeta, DK::RMeta, DK::F1, DK::F2, DK::F3,
            DK::F4, DK::F5, DK::F6, DK::F7, DK::F8, DK::F9, DK::F10, DK::F11, DK::F12,
            DK::Numpad0, DK::Numpad1, DK::Numpad2, DK::Numpad3, DK::Numpad4, DK::Numpad5,
            DK::Numpad6, DK::Numpad7, DK::Numpad8, DK::Numpad9, DK::NumpadSubtract,
            DK::NumpadAdd, DK::NumpadDivide, DK::NumpadMultiply, DK::Minus, DK::Slash,
        ];

        let mut seen = HashSet::new();
        for key in keys {
            let code = KeyCode::from(key);
            assert_ne!(code, KeyCode::UNKNOWN, "{:?} is unmapped", key);
            assert!(KEYMAP.contains_key(&code), "{:?} has no keymap entry", key);
            assert!(seen.insert(code), "{:?} shares {:?} with another key", key, code);
        }
    }

    #[test]
    fn numpad_and_function_keys() {
        use device_query::Keycode as DK;

        assert_eq!(logical_char(KeyCode::from(DK::Numpad1), false), Some('1'));
        assert_eq!(logical_char(KeyCode::from(DK::NumpadMultiply), true), Some('*'));
        let f1 = KeyCode::from(DK::F1);
        assert!(f1.is_function_key());
        assert_eq!(logical_char(f1, false), None);
        assert_eq!(get_key_info(f1).name, "F1");
        assert!(KeyCode::from(DK::LControl).is_chord_modifier());
        assert!(!KeyCode::LEFT_SHIFT.is_chord_modifier());
    }
}
