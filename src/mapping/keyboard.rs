//! Tastatur-Layout und Beschriftungen für die Anzeige
//!
//! Definiert das feste Universum an Tastencodes, das die Tastatur-Ansicht zeigt,
//! und übersetzt Tastennamen des Fenstersystems in diese Codes.

use crate::mapping::model::KeyCode;

/// Hauptblock der Tastatur, Zeile für Zeile
pub const KEYBOARD_ROWS: [&[&str]; 6] = [
    &[
        "Escape", "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12",
    ],
    &[
        "Backquote", "Digit1", "Digit2", "Digit3", "Digit4", "Digit5", "Digit6", "Digit7",
        "Digit8", "Digit9", "Digit0", "Minus", "Equal", "Backspace",
    ],
    &[
        "Tab", "KeyQ", "KeyW", "KeyE", "KeyR", "KeyT", "KeyY", "KeyU", "KeyI", "KeyO", "KeyP",
        "BracketLeft", "BracketRight", "Backslash",
    ],
    &[
        "CapsLock", "KeyA", "KeyS", "KeyD", "KeyF", "KeyG", "KeyH", "KeyJ", "KeyK", "KeyL",
        "Semicolon", "Quote", "Enter",
    ],
    &[
        "ShiftLeft", "KeyZ", "KeyX", "KeyC", "KeyV", "KeyB", "KeyN", "KeyM", "Comma", "Period",
        "Slash", "ShiftRight",
    ],
    &[
        "ControlLeft", "MetaLeft", "AltLeft", "Space", "AltRight", "MetaRight", "ContextMenu",
        "ControlRight",
    ],
];

/// Pfeiltasten-Block (links, oben, unten, rechts)
pub const ARROW_KEYS: [&str; 4] = ["ArrowLeft", "ArrowUp", "ArrowDown", "ArrowRight"];

/// Prüft, ob ein Code auf der angezeigten Tastatur vorkommt
pub fn is_displayed(code: &str) -> bool {
    ARROW_KEYS.contains(&code) || KEYBOARD_ROWS.iter().any(|row| row.contains(&code))
}

/// Beschriftung einer Taste
pub fn key_label(code: &str) -> &str {
    match code {
        "ShiftLeft" | "ShiftRight" => "Shift",
        "Escape" => "Esc",
        "ArrowUp" => "↑",
        "ArrowDown" => "↓",
        "ArrowLeft" => "←",
        "ArrowRight" => "→",
        "ControlLeft" | "ControlRight" => "Ctrl",
        "AltLeft" | "AltRight" => "Alt",
        "MetaLeft" | "MetaRight" => "Win",
        "Backspace" => "Back",
        "CapsLock" => "Caps",
        "ContextMenu" => "Menu",
        "Backquote" => "`",
        "Minus" => "-",
        "Equal" => "=",
        "BracketLeft" => "[",
        "BracketRight" => "]",
        "Backslash" => "\\",
        "Semicolon" => ";",
        "Quote" => "'",
        "Comma" => ",",
        "Period" => ".",
        "Slash" => "/",
        _ => code
            .strip_prefix("Key")
            .or_else(|| code.strip_prefix("Digit"))
            .unwrap_or(code),
    }
}

/// Relative Breite einer Taste in der Ansicht
pub fn key_width(code: &str) -> f32 {
    match code {
        "Space" => 6.0,
        "ShiftLeft" | "ShiftRight" => 2.25,
        "Enter" | "Backspace" | "CapsLock" => 1.75,
        "Tab" | "Backslash" => 1.5,
        _ => 1.0,
    }
}

/// Übersetzt einen Tastennamen des Fenstersystems (`"A"`, `"7"`, `"OpenBracket"`)
/// in den Code der Tastatur-Ansicht
pub fn code_for_key_name(name: &str) -> Option<KeyCode> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphabetic() {
            return Some(KeyCode::new(format!("Key{}", c.to_ascii_uppercase())));
        }
        if c.is_ascii_digit() {
            return Some(KeyCode::new(format!("Digit{}", c)));
        }
    }

    let code = match name {
        "Equals" | "Plus" => "Equal",
        "Backtick" => "Backquote",
        "OpenBracket" => "BracketLeft",
        "CloseBracket" => "BracketRight",
        "Up" => "ArrowUp",
        "Down" => "ArrowDown",
        "Left" => "ArrowLeft",
        "Right" => "ArrowRight",
        "Minus" | "Backslash" | "Semicolon" | "Quote" | "Comma" | "Period" | "Slash" | "Space"
        | "Enter" | "Tab" | "Backspace" | "Escape" | "Insert" | "Delete" | "Home" | "End"
        | "PageUp" | "PageDown" | "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" => name,
        _ if is_function_key(name) => name,
        _ => return None,
    };
    Some(KeyCode::from(code))
}

fn is_function_key(name: &str) -> bool {
    name.strip_prefix('F')
        .and_then(|n| n.parse::<u8>().ok())
        .is_some_and(|n| (1..=24).contains(&n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_strip_code_prefixes() {
        assert_eq!(key_label("KeyW"), "W");
        assert_eq!(key_label("Digit0"), "0");
        assert_eq!(key_label("F11"), "F11");
        assert_eq!(key_label("ShiftRight"), "Shift");
        assert_eq!(key_label("Backslash"), "\\");
        assert_eq!(key_label("Space"), "Space");
    }

    #[test]
    fn layout_contains_every_row_and_arrows() {
        assert!(is_displayed("KeyQ"));
        assert!(is_displayed("ArrowDown"));
        assert!(is_displayed("ContextMenu"));
        assert!(!is_displayed("NumpadEnter"));
        let total: usize = KEYBOARD_ROWS.iter().map(|row| row.len()).sum();
        assert_eq!(total, 13 + 14 + 14 + 13 + 12 + 8);
    }

    #[test]
    fn window_key_names_translate_to_codes() {
        let cases = [
            ("A", "KeyA"),
            ("z", "KeyZ"),
            ("7", "Digit7"),
            ("Space", "Space"),
            ("Equals", "Equal"),
            ("Backtick", "Backquote"),
            ("OpenBracket", "BracketLeft"),
            ("ArrowLeft", "ArrowLeft"),
            ("Down", "ArrowDown"),
            ("F12", "F12"),
        ];
        for (name, code) in cases {
            assert_eq!(code_for_key_name(name), Some(KeyCode::from(code)), "{}", name);
        }
        assert_eq!(code_for_key_name("F99"), None);
        assert_eq!(code_for_key_name("Copy"), None);
        assert_eq!(code_for_key_name("?"), None);
    }
}
