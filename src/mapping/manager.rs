//! Manager für das aktive Mapping
//!
//! Hält das aktuelle Mapping in einem `watch`-Kanal. Ersetzen ist ein einziger
//! atomarer Tausch, der beim nächsten Tick sichtbar wird; Leser sehen nie ein
//! halb geladenes Mapping.

use crate::mapping::format::parse_mapping;
use crate::mapping::model::Mapping;
use crate::mapping::MappingError;
use crate::persistence::mapping_store::MappingStore;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Geteilter Lesezugriff auf das aktuelle Mapping
pub type MappingReceiver = watch::Receiver<Option<Arc<Mapping>>>;

/// Herkunft des aktuell geladenen Mappings
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MappingSource {
    /// Zuvor importiertes und gespeichertes Mapping
    Stored,
    /// Mapping-Datei aus der Konfiguration
    File(PathBuf),
    /// Vom Benutzer importierte Datei
    Imported(PathBuf),
}

impl fmt::Display for MappingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingSource::Stored => write!(f, "saved import"),
            MappingSource::File(path) => write!(f, "{}", path.display()),
            MappingSource::Imported(path) => write!(f, "import {}", path.display()),
        }
    }
}

/// Verwaltet Laden, Import und Persistenz des Mappings
pub struct MappingManager {
    /// Einziger Schreiber des aktuellen Mappings
    mapping_tx: watch::Sender<Option<Arc<Mapping>>>,

    /// Ablage für importierte Mappings
    store: MappingStore,
}

impl MappingManager {
    /// Erstellt einen Manager ohne geladenes Mapping
    pub fn new(store: MappingStore) -> Self {
        info!("Creating new MappingManager");
        let (mapping_tx, _) = watch::channel(None);
        Self { mapping_tx, store }
    }

    pub fn subscribe(&self) -> MappingReceiver {
        self.mapping_tx.subscribe()
    }

    pub fn current(&self) -> Option<Arc<Mapping>> {
        self.mapping_tx.borrow().clone()
    }

    /// Ersetzt das aktuelle Mapping komplett
    pub fn replace(&self, mapping: Mapping) -> Arc<Mapping> {
        for entry in mapping.unresolved_entries() {
            warn!(
                "Mapping entry '{}' -> {} names no known gamepad control and will never activate",
                entry.gamepad, entry.keyboard
            );
        }

        let mapping = Arc::new(mapping);
        self.mapping_tx.send_replace(Some(mapping.clone()));
        info!("Active mapping replaced ({} entries)", mapping.len());
        mapping
    }

    /// Lädt das Startmapping: gespeicherter Import, sonst die konfigurierte Datei
    ///
    /// Fehler werden geloggt und führen zum nächsten Kandidaten; ohne Treffer
    /// bleibt kein Mapping aktiv.
    pub async fn load_initial(&self, mapping_file: &Path) -> Option<MappingSource> {
        match self.store.load().await {
            Ok(Some(bytes)) => match parse_mapping(&bytes) {
                Ok(mapping) => {
                    self.replace(mapping);
                    info!("Loaded stored mapping");
                    return Some(MappingSource::Stored);
                }
                Err(e) => warn!("Stored mapping is unusable, ignoring it: {}", e),
            },
            Ok(None) => debug!("No stored mapping found"),
            Err(e) => warn!("Failed to read stored mapping: {}", e),
        }

        match read_mapping_file(mapping_file).await {
            Ok(mapping) => {
                self.replace(mapping);
                info!("Loaded mapping file {}", mapping_file.display());
                Some(MappingSource::File(mapping_file.to_path_buf()))
            }
            Err(e) => {
                error!("Failed to load mapping {}: {}", mapping_file.display(), e);
                None
            }
        }
    }

    /// Importiert eine Mapping-Datei, aktiviert sie und speichert sie kanonisch
    ///
    /// Schlägt das Lesen oder Erkennen fehl, bleibt das bisherige Mapping aktiv.
    pub async fn import_file(&self, path: &Path) -> Result<Arc<Mapping>, MappingError> {
        info!("Importing mapping from {}", path.display());
        let mapping = read_mapping_file(path).await.inspect_err(|e| {
            warn!("Import of {} rejected: {}", path.display(), e);
        })?;

        let mapping = self.replace(mapping);
        self.persist(&mapping).await;
        Ok(mapping)
    }

    /// Verwirft den gespeicherten Import
    pub async fn forget_import(&self) {
        if let Err(e) = self.store.clear().await {
            warn!("Failed to remove stored mapping: {}", e);
        }
    }

    async fn persist(&self, mapping: &Mapping) {
        let json = match mapping.to_json_pretty() {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize mapping: {}", e);
                return;
            }
        };
        match self.store.save(json.as_bytes()).await {
            Ok(()) => debug!("Imported mapping persisted"),
            Err(e) => error!("Failed to persist imported mapping: {}", e),
        }
    }
}

async fn read_mapping_file(path: &Path) -> Result<Mapping, MappingError> {
    let bytes = tokio::fs::read(path).await?;
    parse_mapping(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::model::MappingEntry;
    use tempfile::TempDir;

    fn manager(dir: &TempDir) -> MappingManager {
        MappingManager::new(MappingStore::new(dir.path().join("store")))
    }

    #[tokio::test]
    async fn failed_import_keeps_previous_mapping() {
        let dir = TempDir::new().unwrap();
        let manager = manager(&dir);
        let rx = manager.subscribe();

        manager.replace(vec![MappingEntry::new("A", "Space")].into_iter().collect());

        let bad = dir.path().join("bad.json");
        tokio::fs::write(&bad, r#"{"keys": []}"#).await.unwrap();
        let result = manager.import_file(&bad).await;
        assert!(matches!(result, Err(MappingError::UnknownFormat)));

        let missing = manager.import_file(&dir.path().join("missing.json")).await;
        assert!(matches!(missing, Err(MappingError::Io(_))));

        let current = rx.borrow().clone().unwrap();
        assert_eq!(current.entries()[0].keyboard.as_str(), "Space");
    }

    #[tokio::test]
    async fn import_persists_canonical_form_for_next_start() {
        let dir = TempDir::new().unwrap();
        let legacy = dir.path().join("legacy.json");
        tokio::fs::write(&legacy, r#"{"buttons":{"3":"KeyY"},"axes":{}}"#)
            .await
            .unwrap();

        let first = manager(&dir);
        let imported = first.import_file(&legacy).await.unwrap();
        assert_eq!(imported.entries()[0].gamepad.to_string(), "Y");

        let second = manager(&dir);
        let source = second.load_initial(&dir.path().join("unused.json")).await;
        assert_eq!(source, Some(MappingSource::Stored));
        assert_eq!(second.current(), Some(imported));
    }

    #[tokio::test]
    async fn startup_falls_back_to_mapping_file_then_nothing() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("mapping.json");
        tokio::fs::write(&file, r#"{"mappings":[{"gamepad":"RB","keyboard":"KeyE"}]}"#)
            .await
            .unwrap();

        let manager = manager(&dir);
        assert_eq!(
            manager.load_initial(&file).await,
            Some(MappingSource::File(file.clone()))
        );
        assert_eq!(manager.current().unwrap().len(), 1);

        let empty = self::manager(&dir);
        assert_eq!(empty.load_initial(&dir.path().join("nope.json")).await, None);
        assert_eq!(empty.current(), None);
    }
}
