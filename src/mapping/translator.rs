//! Übersetzung eines Controller-Samples in aktive Tasten
//!
//! Läuft einmal pro Tick. Die Übersetzung ist eine reine Funktion und wirft nie:
//! fehlende oder fehlerhafte Eingaben führen nur dazu, dass der Controller
//! nichts beiträgt.

use crate::controller::ControllerSample;
use crate::mapping::model::{ActiveKeySet, AxisDirection, ControlRef, Mapping};
use tracing::trace;

/// Minimaler Achsenausschlag, ab dem eine Stick-Richtung als gedrückt gilt (strikt)
pub const DEADZONE: f32 = 0.2;

impl ControlRef {
    /// Prüft, ob dieses Control im Sample gedrückt ist
    ///
    /// Indizes außerhalb des Samples gelten als nicht gedrückt.
    pub fn is_active(&self, sample: &ControllerSample) -> bool {
        match *self {
            ControlRef::Button { index } => sample.button(index),
            ControlRef::Axis { index, direction } => match (sample.axis(index), direction) {
                (Some(value), AxisDirection::Negative) => value < -DEADZONE,
                (Some(value), AxisDirection::Positive) => value > DEADZONE,
                (None, _) => false,
            },
        }
    }
}

/// Berechnet die Menge der aktiven Tasten
///
/// Ergebnis ist immer eine Obermenge von `held`. Jeder Eintrag kann eine Taste
/// nur hinzufügen, nie entfernen.
pub fn compute_active_keys(
    sample: Option<&ControllerSample>,
    mapping: Option<&Mapping>,
    held: &ActiveKeySet,
) -> ActiveKeySet {
    let mut keys = held.clone();

    let (Some(sample), Some(mapping)) = (sample, mapping) else {
        return keys;
    };

    for entry in mapping.entries() {
        let Some(control) = entry.gamepad.resolve() else {
            trace!("Skipping unresolved gamepad control '{}'", entry.gamepad);
            continue;
        };

        if control.is_active(sample) {
            keys.insert(entry.keyboard.clone());
        }
    }

    keys
}
