//! Formaterkennung für geladene oder importierte Mapping-Dateien
//!
//! Zweistufig: erst ein struktureller Test auf dem JSON-Wert, der das Format
//! bestimmt, dann ein typisierter Decode in genau dieses Format.

use crate::mapping::legacy::LegacyMapping;
use crate::mapping::model::Mapping;
use crate::mapping::MappingError;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use tracing::{debug, info};

/// Erkannte Struktur einer Mapping-Datei
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MappingFormat {
    /// `{ "mappings": [ ... ] }`
    Canonical,
    /// `{ "buttons": { ... }, "axes": { ... } }`
    Legacy,
}

impl fmt::Display for MappingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingFormat::Canonical => write!(f, "kanonisches"),
            MappingFormat::Legacy => write!(f, "Legacy"),
        }
    }
}

impl MappingFormat {
    /// Struktureller Test, kanonisch hat Vorrang vor Legacy
    pub fn detect(raw: &Value) -> Option<Self> {
        if raw.get("mappings").is_some_and(Value::is_array) {
            return Some(MappingFormat::Canonical);
        }

        let is_record = |field: &str| raw.get(field).is_some_and(Value::is_object);
        if is_record("buttons") && is_record("axes") {
            return Some(MappingFormat::Legacy);
        }

        None
    }
}

/// Erkennt das Format und liefert immer ein kanonisches Mapping
///
/// Kanonische Eingaben werden unverändert übernommen, Legacy-Eingaben migriert.
pub fn detect_and_normalize(raw: &Value) -> Result<Mapping, MappingError> {
    let format = MappingFormat::detect(raw).ok_or(MappingError::UnknownFormat)?;
    debug!("Detected {:?} mapping format", format);

    let malformed = |e: serde_json::Error| MappingError::Malformed {
        format,
        reason: e.to_string(),
    };

    match format {
        MappingFormat::Canonical => Mapping::deserialize(raw).map_err(malformed),
        MappingFormat::Legacy => {
            let legacy = LegacyMapping::deserialize(raw).map_err(malformed)?;
            let mapping = legacy.to_canonical();
            info!(
                "Migrated legacy mapping ({} buttons, {} axes) to {} entries",
                legacy.buttons.len(),
                legacy.axes.len(),
                mapping.len()
            );
            let skipped = legacy.buttons.len() + 2 * legacy.axes.len() - legacy.binding_count();
            if skipped > 0 {
                debug!("Skipped {} legacy slots without a key code", skipped);
            }
            Ok(mapping)
        }
    }
}

/// Liest JSON-Text und normalisiert ihn
pub fn parse_mapping(bytes: &[u8]) -> Result<Mapping, MappingError> {
    let raw: Value = serde_json::from_slice(bytes)?;
    detect_and_normalize(&raw)
}
