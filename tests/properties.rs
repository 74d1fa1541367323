//! Property-based tests for translation and legacy migration.
//!
//! - The active key set always contains the held keys and adds exactly the keys
//!   of entries whose control is pressed
//! - Migration emits one entry per non-empty legacy binding, and each entry
//!   resolves back to the index and direction it came from
//! - Every control display name resolves back to its control

use padmapper::controller::ControllerSample;
use padmapper::mapping::alias;
use padmapper::mapping::legacy::{LegacyAxis, LegacyMapping};
use padmapper::mapping::{
    compute_active_keys, ActiveKeySet, AxisDirection, ControlRef, KeyCode, Mapping,
    MappingEntry, DEADZONE,
};
use proptest::prelude::*;

const KEYS: [&str; 8] = [
    "Space", "KeyW", "KeyA", "KeyS", "KeyD", "Enter", "ShiftLeft", "ArrowUp",
];

const NAMES: [&str; 12] = [
    "A", "Cross", "RB", "L2", "dpad-up", "Home", "LeftStickLeft", "rs_down", "Button 20",
    "Axis 5 +", "Flubber", "",
];

fn key() -> impl Strategy<Value = KeyCode> {
    prop::sample::select(KEYS.to_vec()).prop_map(KeyCode::from)
}

fn direction() -> impl Strategy<Value = AxisDirection> {
    prop_oneof![Just(AxisDirection::Negative), Just(AxisDirection::Positive)]
}

fn control() -> impl Strategy<Value = ControlRef> {
    prop_oneof![
        (0usize..64).prop_map(|index| ControlRef::Button { index }),
        (0usize..64, direction())
            .prop_map(|(index, direction)| ControlRef::Axis { index, direction }),
    ]
}

fn entry() -> impl Strategy<Value = MappingEntry> {
    prop_oneof![
        (prop::sample::select(NAMES.to_vec()), key())
            .prop_map(|(name, key)| MappingEntry::new(name, key)),
        (control(), key()).prop_map(|(control, key)| MappingEntry::new(control, key)),
    ]
}

fn sample() -> impl Strategy<Value = ControllerSample> {
    (
        prop::collection::vec(any::<bool>(), 0..20),
        prop::collection::vec(-1.0f32..=1.0, 0..6),
    )
        .prop_map(|(buttons, axes)| ControllerSample {
            id: "Prop Pad".to_string(),
            connected: true,
            buttons,
            axes,
            timestamp: 0.0,
        })
}

fn optional_key() -> impl Strategy<Value = Option<KeyCode>> {
    prop_oneof![Just(None), Just(Some(KeyCode::from(""))), key().prop_map(Some)]
}

fn legacy() -> impl Strategy<Value = LegacyMapping> {
    (
        prop::collection::btree_map(0usize..32, optional_key(), 0..12),
        prop::collection::btree_map(
            0usize..8,
            (optional_key(), optional_key())
                .prop_map(|(negative, positive)| LegacyAxis { negative, positive }),
            0..6,
        ),
    )
        .prop_map(|(buttons, axes)| LegacyMapping { buttons, axes })
}

// Independent reading of "pressed" for the union law
fn pressed(control: ControlRef, sample: &ControllerSample) -> bool {
    match control {
        ControlRef::Button { index } => sample.buttons.get(index) == Some(&true),
        ControlRef::Axis { index, direction } => match sample.axes.get(index) {
            Some(value) if direction == AxisDirection::Negative => *value < -DEADZONE,
            Some(value) => *value > DEADZONE,
            None => false,
        },
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_active_keys_are_held_plus_pressed_entries(
        sample in sample(),
        entries in prop::collection::vec(entry(), 0..16),
        held in prop::collection::hash_set(key(), 0..4),
    ) {
        let mapping = Mapping::new(entries);
        let active = compute_active_keys(Some(&sample), Some(&mapping), &held);

        let mut expected: ActiveKeySet = held.clone();
        for entry in mapping.entries() {
            if entry.gamepad.resolve().is_some_and(|control| pressed(control, &sample)) {
                expected.insert(entry.keyboard.clone());
            }
        }

        prop_assert!(active.is_superset(&held));
        prop_assert_eq!(active, expected);
    }

    #[test]
    fn prop_missing_inputs_yield_exactly_held(
        sample in sample(),
        entries in prop::collection::vec(entry(), 0..8),
        held in prop::collection::hash_set(key(), 0..4),
    ) {
        let mapping = Mapping::new(entries);
        prop_assert_eq!(compute_active_keys(None, Some(&mapping), &held), held.clone());
        prop_assert_eq!(compute_active_keys(Some(&sample), None, &held), held);
    }

    #[test]
    fn prop_migration_emits_one_entry_per_binding(legacy in legacy()) {
        let mapping = legacy.to_canonical();
        prop_assert_eq!(mapping.len(), legacy.binding_count());

        let expected: Vec<(ControlRef, KeyCode)> = legacy
            .buttons
            .iter()
            .filter_map(|(&index, key)| {
                let key = key.clone().filter(|key| !key.is_empty())?;
                Some((ControlRef::Button { index }, key))
            })
            .chain(legacy.axes.iter().flat_map(|(&index, axis)| {
                [
                    (AxisDirection::Negative, axis.negative.clone()),
                    (AxisDirection::Positive, axis.positive.clone()),
                ]
                .into_iter()
                .filter_map(move |(direction, key)| {
                    let key = key.filter(|key| !key.is_empty())?;
                    Some((ControlRef::Axis { index, direction }, key))
                })
            }))
            .collect();

        let actual: Vec<(ControlRef, KeyCode)> = mapping
            .entries()
            .iter()
            .map(|entry| {
                let control = entry.gamepad.resolve().expect("migrated name resolves");
                (control, entry.keyboard.clone())
            })
            .collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_display_names_resolve_back(control in control()) {
        prop_assert_eq!(alias::resolve(&control.display_name()), Some(control));
    }
}
