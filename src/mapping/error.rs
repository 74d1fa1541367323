//! Fehlerdefinitionen für das Mapping-Modul

use crate::mapping::format::MappingFormat;
use thiserror::Error;

/// Fehlertypen beim Laden und Importieren von Mappings
///
/// Keiner dieser Fehler ist fatal: der Aufrufer behält das bisherige Mapping
/// und zeigt die Meldung dem Benutzer an.
#[derive(Debug, Error)]
pub enum MappingError {
    /// Der Text ist kein gültiges JSON
    #[error("JSON konnte nicht gelesen werden: {0}")]
    Parse(#[from] serde_json::Error),

    /// Weder kanonisches noch Legacy-Format erkannt
    #[error("Unbekanntes Mapping-Format")]
    UnknownFormat,

    /// Die Struktur wurde erkannt, der typisierte Decode ist aber fehlgeschlagen
    #[error("Fehlerhaftes {format}-Mapping: {reason}")]
    Malformed {
        format: MappingFormat,
        reason: String,
    },

    /// Fehler beim Lesen der Mapping-Datei
    #[error("Dateifehler: {0}")]
    Io(#[from] std::io::Error),
}
