//! Modul für die Abbildung von Gamepad-Controls auf virtuelle Tasten.
//!
//! Enthält das kanonische Mapping-Modell, die Auflösung freier Control-Namen,
//! die Migration des Legacy-Formats, die Formaterkennung beim Laden sowie die
//! Übersetzung eines Controller-Samples in die Menge aktiver Tasten.

pub mod alias;
pub mod error;
pub mod format;
pub mod keyboard;
pub mod legacy;
pub mod manager;
pub mod model;
pub mod translator;

// Re-exports für einfacheren Zugriff
pub use error::MappingError;
pub use format::{detect_and_normalize, parse_mapping, MappingFormat};
pub use legacy::LegacyMapping;
pub use manager::{MappingManager, MappingReceiver, MappingSource};
pub use model::{
    ActiveKeySet, AxisDirection, ControlRef, GamepadRef, KeyCode, Mapping, MappingEntry,
};
pub use translator::{compute_active_keys, DEADZONE};
