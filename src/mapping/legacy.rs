//! Migration des veralteten indexbasierten Mapping-Formats
//!
//! Das alte Format speicherte Buttons und Achsen als Records, die nach Index
//! adressiert waren. Diese Version liest es nur noch und übersetzt es verlustfrei
//! in ein kanonisches [`Mapping`]; eine Rückrichtung gibt es nicht.

use crate::mapping::model::{AxisDirection, ControlRef, KeyCode, Mapping, MappingEntry};
use serde::Deserialize;
use std::collections::BTreeMap;

pub const BUTTON_ACTION: &str = "Button Press";
pub const AXIS_NEGATIVE_ACTION: &str = "Axis Negative";
pub const AXIS_POSITIVE_ACTION: &str = "Axis Positive";

/// Ziele einer Achse im Legacy-Format
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct LegacyAxis {
    #[serde(default)]
    pub negative: Option<KeyCode>,
    #[serde(default)]
    pub positive: Option<KeyCode>,
}

/// Legacy-Mapping `{ "buttons": {...}, "axes": {...} }`
///
/// Die JSON-Schlüssel sind Indizes als Strings; `BTreeMap` liefert sie aufsteigend.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct LegacyMapping {
    pub buttons: BTreeMap<usize, Option<KeyCode>>,
    pub axes: BTreeMap<usize, LegacyAxis>,
}

impl LegacyMapping {
    /// Übersetzt in das kanonische Format
    ///
    /// Erst alle Buttons, dann alle Achsen (negativ vor positiv). Jedes Paar
    /// (Index, Richtung) mit nicht-leerem Tastencode ergibt genau einen Eintrag.
    pub fn to_canonical(&self) -> Mapping {
        let buttons = self.buttons.iter().filter_map(|(&index, key)| {
            let key = non_empty(key)?;
            Some(
                MappingEntry::new(ControlRef::Button { index }.display_name(), key.clone())
                    .with_action(BUTTON_ACTION),
            )
        });

        let axes = self.axes.iter().flat_map(|(&index, axis)| {
            let negative = non_empty(&axis.negative).map(|key| {
                axis_entry(index, AxisDirection::Negative, key, AXIS_NEGATIVE_ACTION)
            });
            let positive = non_empty(&axis.positive).map(|key| {
                axis_entry(index, AxisDirection::Positive, key, AXIS_POSITIVE_ACTION)
            });
            negative.into_iter().chain(positive)
        });

        buttons.chain(axes).collect()
    }

    /// Anzahl der Einträge, die [`Self::to_canonical`] erzeugt
    pub fn binding_count(&self) -> usize {
        let buttons = self.buttons.values().filter(|key| non_empty(key).is_some());
        let axes = self.axes.values().map(|axis| {
            usize::from(non_empty(&axis.negative).is_some())
                + usize::from(non_empty(&axis.positive).is_some())
        });
        buttons.count() + axes.sum::<usize>()
    }
}

fn non_empty(key: &Option<KeyCode>) -> Option<&KeyCode> {
    key.as_ref().filter(|key| !key.is_empty())
}

fn axis_entry(index: usize, direction: AxisDirection, key: &KeyCode, action: &str) -> MappingEntry {
    MappingEntry::new(
        ControlRef::Axis { index, direction }.display_name(),
        key.clone(),
    )
    .with_action(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::model::GamepadRef;

    fn legacy(json: &str) -> LegacyMapping {
        serde_json::from_str(json).unwrap()
    }

    fn names(mapping: &Mapping) -> Vec<String> {
        mapping
            .entries()
            .iter()
            .map(|entry| entry.gamepad.to_string())
            .collect()
    }

    #[test]
    fn single_button_migrates_to_named_entry() {
        let mapping = legacy(r#"{"buttons":{"0":"Space"},"axes":{}}"#).to_canonical();
        assert_eq!(
            serde_json::to_value(&mapping).unwrap(),
            serde_json::json!({
                "mappings": [
                    { "gamepad": "A", "action": "Button Press", "keyboard": "Space" }
                ]
            })
        );
    }

    #[test]
    fn buttons_come_first_in_ascending_order() {
        let mapping = legacy(
            r#"{
                "buttons": { "12": "ArrowUp", "2": "KeyX", "20": "KeyP" },
                "axes": { "1": { "positive": "KeyS", "negative": "KeyW" }, "0": { "negative": "KeyA" } }
            }"#,
        )
        .to_canonical();

        assert_eq!(
            names(&mapping),
            vec!["X", "↑", "Button 20", "LeftStickLeft", "LeftStickUp", "LeftStickDown"]
        );
        let actions: Vec<_> = mapping
            .entries()
            .iter()
            .map(|entry| entry.action.as_deref().unwrap())
            .collect();
        assert_eq!(
            actions,
            vec![
                BUTTON_ACTION,
                BUTTON_ACTION,
                BUTTON_ACTION,
                AXIS_NEGATIVE_ACTION,
                AXIS_NEGATIVE_ACTION,
                AXIS_POSITIVE_ACTION
            ]
        );
    }

    #[test]
    fn unnamed_axes_use_generic_names() {
        let mapping =
            legacy(r#"{"buttons":{},"axes":{"4":{"negative":"KeyQ","positive":"KeyE"}}}"#)
                .to_canonical();
        assert_eq!(names(&mapping), vec!["Axis 4 -", "Axis 4 +"]);
    }

    #[test]
    fn empty_and_missing_targets_produce_no_entries() {
        let source = legacy(
            r#"{
                "buttons": { "0": "", "1": null, "3": "KeyY" },
                "axes": { "2": {}, "3": { "negative": "", "positive": "KeyK" } }
            }"#,
        );
        let mapping = source.to_canonical();
        assert_eq!(names(&mapping), vec!["Y", "RightStickDown"]);
        assert_eq!(source.binding_count(), mapping.len());
    }

    #[test]
    fn migrated_entries_resolve_to_their_source_index() {
        let mapping = legacy(
            r#"{
                "buttons": { "8": "Tab", "9": "Escape", "16": "F1", "17": "F2" },
                "axes": { "2": { "negative": "KeyJ" }, "7": { "positive": "KeyL" } }
            }"#,
        )
        .to_canonical();

        let resolved: Vec<_> = mapping
            .entries()
            .iter()
            .map(|entry| entry.gamepad.resolve())
            .collect();
        assert_eq!(
            resolved,
            vec![
                Some(ControlRef::Button { index: 8 }),
                Some(ControlRef::Button { index: 9 }),
                Some(ControlRef::Button { index: 16 }),
                Some(ControlRef::Button { index: 17 }),
                Some(ControlRef::Axis {
                    index: 2,
                    direction: AxisDirection::Negative
                }),
                Some(ControlRef::Axis {
                    index: 7,
                    direction: AxisDirection::Positive
                }),
            ]
        );
        assert!(mapping
            .entries()
            .iter()
            .all(|entry| matches!(entry.gamepad, GamepadRef::Name(_))));
    }
}
