//! Kanonisches Datenmodell für Gamepad→Tastatur-Mappings
//!
//! Ein [`Mapping`] ist eine geordnete Liste von [`MappingEntry`]s. Jeder Eintrag
//! verweist auf ein Gamepad-Control (aufgelöst als [`ControlRef`] oder als Freitext,
//! der erst beim Übersetzen über den Alias-Resolver aufgelöst wird) und auf einen
//! [`KeyCode`].

use crate::mapping::alias;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Kurznamen der 17 Standard-Buttons, indexiert nach Button-Index
pub const BUTTON_NAMES: [&str; 17] = [
    "A", "B", "X", "Y", "LB", "RB", "LT", "RT", "Sel", "Sta", "L3", "R3", "↑", "↓", "←", "→", "H",
];

/// Virtueller Tastencode wie `KeyW`, `Space` oder `ArrowUp`
///
/// Wird vom Kern nie interpretiert, nur verglichen.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(String);

impl KeyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for KeyCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

impl From<String> for KeyCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl Borrow<str> for KeyCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Menge der aktuell "gedrückten" virtuellen Tasten
pub type ActiveKeySet = HashSet<KeyCode>;

/// Richtung einer Analogachse
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisDirection {
    Negative,
    Positive,
}

/// Aufgelöste Referenz auf einen Button oder eine Achsenrichtung
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ControlRef {
    Button {
        index: usize,
    },
    Axis {
        index: usize,
        direction: AxisDirection,
    },
}

impl ControlRef {
    /// Anzeigename, wie ihn auch die Legacy-Migration erzeugt
    ///
    /// Jeder hier erzeugte Name löst über [`alias::resolve`] wieder auf dieselbe
    /// Referenz auf.
    pub fn display_name(&self) -> String {
        match *self {
            ControlRef::Button { index } => BUTTON_NAMES
                .get(index)
                .map(|name| name.to_string())
                .unwrap_or_else(|| format!("Button {}", index)),
            ControlRef::Axis { index, direction } => {
                let stick_name = match (index, direction) {
                    (0, AxisDirection::Negative) => Some("LeftStickLeft"),
                    (1, AxisDirection::Negative) => Some("LeftStickUp"),
                    (2, AxisDirection::Negative) => Some("RightStickLeft"),
                    (3, AxisDirection::Negative) => Some("RightStickUp"),
                    (0, AxisDirection::Positive) => Some("LeftStickRight"),
                    (1, AxisDirection::Positive) => Some("LeftStickDown"),
                    (2, AxisDirection::Positive) => Some("RightStickRight"),
                    (3, AxisDirection::Positive) => Some("RightStickDown"),
                    _ => None,
                };
                match stick_name {
                    Some(name) => name.to_string(),
                    None => format!("Axis {} {}", index, direction.sign()),
                }
            }
        }
    }

    /// Kurzes Badge für die Rückwärtsanzeige auf der Tastatur (`A`, `L←`, `A4+`)
    pub fn badge(&self) -> String {
        match *self {
            ControlRef::Button { index } => BUTTON_NAMES
                .get(index)
                .map(|name| name.to_string())
                .unwrap_or_else(|| format!("Btn{}", index)),
            ControlRef::Axis { index, direction } => {
                let (stick, negative, positive) = match index {
                    0 => ("L", "←", "→"),
                    1 => ("L", "↑", "↓"),
                    2 => ("R", "←", "→"),
                    3 => ("R", "↑", "↓"),
                    _ => return format!("A{}{}", index, direction.sign()),
                };
                match direction {
                    AxisDirection::Negative => format!("{}{}", stick, negative),
                    AxisDirection::Positive => format!("{}{}", stick, positive),
                }
            }
        }
    }
}

impl AxisDirection {
    pub fn sign(&self) -> char {
        match self {
            AxisDirection::Negative => '-',
            AxisDirection::Positive => '+',
        }
    }
}

impl fmt::Display for ControlRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// Gamepad-Seite eines Mapping-Eintrags
///
/// In Dateien steht hier normalerweise ein Freitext-Name (`"L1"`, `"dpad-up"`).
/// Beide Formen werden beim Übersetzen gleich behandelt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GamepadRef {
    Control(ControlRef),
    Name(String),
}

impl GamepadRef {
    pub fn resolve(&self) -> Option<ControlRef> {
        match self {
            GamepadRef::Control(control) => Some(*control),
            GamepadRef::Name(name) => alias::resolve(name),
        }
    }
}

impl From<ControlRef> for GamepadRef {
    fn from(control: ControlRef) -> Self {
        GamepadRef::Control(control)
    }
}

impl From<&str> for GamepadRef {
    fn from(name: &str) -> Self {
        GamepadRef::Name(name.to_string())
    }
}

impl From<String> for GamepadRef {
    fn from(name: String) -> Self {
        GamepadRef::Name(name)
    }
}

impl fmt::Display for GamepadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GamepadRef::Control(control) => write!(f, "{}", control),
            GamepadRef::Name(name) => f.write_str(name),
        }
    }
}

/// Ein einzelner Eintrag: Gamepad-Control → Taste
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub gamepad: GamepadRef,

    /// Optionale Beschreibung für Menschen, ohne Einfluss auf die Übersetzung
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    pub keyboard: KeyCode,
}

impl MappingEntry {
    pub fn new(gamepad: impl Into<GamepadRef>, keyboard: impl Into<KeyCode>) -> Self {
        Self {
            gamepad: gamepad.into(),
            action: None,
            keyboard: keyboard.into(),
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

/// Kanonisches Mapping
///
/// Wird beim Laden oder Importieren immer komplett ersetzt, nie eintragsweise
/// verändert. Doppelte Einträge sind erlaubt und harmlos.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    pub mappings: Vec<MappingEntry>,
}

impl Mapping {
    pub fn new(mappings: Vec<MappingEntry>) -> Self {
        Self { mappings }
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.mappings
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Einträge, deren Gamepad-Referenz sich nicht auflösen lässt
    pub fn unresolved_entries(&self) -> impl Iterator<Item = &MappingEntry> {
        self.mappings
            .iter()
            .filter(|entry| entry.gamepad.resolve().is_none())
    }

    /// Rückwärts-Lookup Taste → Badges der Controls, die sie auslösen
    ///
    /// Nicht auflösbare Einträge lösen nie aus und erscheinen deshalb nicht.
    pub fn labels_by_key(&self) -> HashMap<KeyCode, Vec<String>> {
        let mut labels: HashMap<KeyCode, Vec<String>> = HashMap::new();
        for entry in &self.mappings {
            if let Some(control) = entry.gamepad.resolve() {
                let badges = labels.entry(entry.keyboard.clone()).or_default();
                let badge = control.badge();
                if !badges.contains(&badge) {
                    badges.push(badge);
                }
            }
        }
        labels
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl FromIterator<MappingEntry> for Mapping {
    fn from_iter<I: IntoIterator<Item = MappingEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gamepad_strings_deserialize_as_names() {
        let entry: MappingEntry =
            serde_json::from_str(r#"{"gamepad":"L1","keyboard":"KeyQ"}"#).unwrap();
        assert_eq!(entry.gamepad, GamepadRef::Name("L1".to_string()));
        assert_eq!(entry.action, None);
        assert_eq!(entry.gamepad.resolve(), Some(ControlRef::Button { index: 4 }));
    }

    #[test]
    fn resolved_controls_round_trip_through_json() {
        let entry = MappingEntry::new(
            ControlRef::Axis {
                index: 3,
                direction: AxisDirection::Positive,
            },
            "KeyS",
        );
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(
            json,
            r#"{"gamepad":{"kind":"axis","index":3,"direction":"positive"},"keyboard":"KeyS"}"#
        );
        let back: MappingEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn display_names_resolve_to_their_control() {
        let mut controls: Vec<ControlRef> =
            (0..20).map(|index| ControlRef::Button { index }).collect();
        for index in 0..6 {
            controls.push(ControlRef::Axis {
                index,
                direction: AxisDirection::Negative,
            });
            controls.push(ControlRef::Axis {
                index,
                direction: AxisDirection::Positive,
            });
        }

        for control in controls {
            assert_eq!(
                alias::resolve(&control.display_name()),
                Some(control),
                "{}",
                control
            );
        }
    }

    #[test]
    fn badges_use_short_names() {
        assert_eq!(ControlRef::Button { index: 12 }.badge(), "↑");
        assert_eq!(ControlRef::Button { index: 30 }.badge(), "Btn30");
        let left_up = ControlRef::Axis {
            index: 1,
            direction: AxisDirection::Negative,
        };
        assert_eq!(left_up.badge(), "L↑");
        let fifth = ControlRef::Axis {
            index: 5,
            direction: AxisDirection::Positive,
        };
        assert_eq!(fifth.badge(), "A5+");
    }

    #[test]
    fn labels_by_key_collects_every_control_for_a_key() {
        let mapping: Mapping = vec![
            MappingEntry::new("A", "Space"),
            MappingEntry::new("Cross", "Space"),
            MappingEntry::new("DpadUp", "Space"),
            MappingEntry::new("LeftStickLeft", "KeyA"),
            MappingEntry::new("Flubber", "KeyZ"),
        ]
        .into_iter()
        .collect();

        let labels = mapping.labels_by_key();
        assert_eq!(labels[&KeyCode::from("Space")], vec!["A", "↑"]);
        assert_eq!(labels[&KeyCode::from("KeyA")], vec!["L←"]);
        assert!(!labels.contains_key("KeyZ"));
        assert_eq!(mapping.unresolved_entries().count(), 1);
    }
}
