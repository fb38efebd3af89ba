//! Сохранение выбранных мест между сессиями.
//!
//! Файл хранит JSON-объект "ключ → значение", как localStorage браузера.
//! Список мест лежит под фиксированным ключом. Ошибки чтения и записи
//! только логируются: потерянный выбор не повод останавливать сессию.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

use crate::error::StorageError;
use crate::models::{SelectedSeat, Venue};

pub const SELECTION_STORAGE_KEY: &str = "venue-seat-selector-selection";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSelection {
    saved_at: DateTime<Utc>,
    seats: Vec<SelectedSeat>,
}

#[derive(Debug, Clone)]
pub struct SelectionStore {
    path: PathBuf,
}

impl SelectionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Сохранённый выбор или `None`, если его нет или он не читается.
    pub fn load(&self) -> Option<Vec<SelectedSeat>> {
        match self.try_load() {
            Ok(seats) => seats,
            Err(e) => {
                error!("Failed to load selection from {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Выбор, отфильтрованный по текущему залу: пропавшие места тихо отбрасываются.
    pub fn restore(&self, venue: &Venue) -> Vec<SelectedSeat> {
        let Some(stored) = self.load() else {
            return Vec::new();
        };
        let total = stored.len();
        let valid = validate_persisted_seats(stored, venue);
        if valid.len() != total {
            debug!("Dropped {} persisted seats missing from venue", total - valid.len());
        }
        valid
    }

    pub fn save(&self, seats: &[SelectedSeat]) {
        if let Err(e) = self.try_save(seats) {
            error!("Failed to save selection to {}: {}", self.path.display(), e);
        }
    }

    pub fn clear(&self) {
        let result = self.read_entries().and_then(|mut entries| {
            entries.remove(SELECTION_STORAGE_KEY);
            self.write_entries(&entries)
        });
        if let Err(e) = result {
            error!("Failed to clear selection in {}: {}", self.path.display(), e);
        }
    }

    fn try_load(&self) -> Result<Option<Vec<SelectedSeat>>, StorageError> {
        let mut entries = self.read_entries()?;
        match entries.remove(SELECTION_STORAGE_KEY) {
            Some(value) => {
                let stored: StoredSelection = serde_json::from_value(value)?;
                Ok(Some(stored.seats))
            }
            None => Ok(None),
        }
    }

    fn try_save(&self, seats: &[SelectedSeat]) -> Result<(), StorageError> {
        // Испорченный файл перезаписывается целиком
        let mut entries = match self.read_entries() {
            Err(StorageError::Json(e)) => {
                warn!("Selection store {} is corrupted, starting over: {}", self.path.display(), e);
                BTreeMap::new()
            }
            other => other?,
        };
        let stored = StoredSelection {
            saved_at: Utc::now(),
            seats: seats.to_vec(),
        };
        entries.insert(SELECTION_STORAGE_KEY.to_string(), serde_json::to_value(stored)?);
        self.write_entries(&entries)
    }

    // Чужие ключи в файле сохраняются как есть
    fn read_entries(&self) -> Result<BTreeMap<String, serde_json::Value>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, serde_json::Value>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(entries)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Оставляет только места, которые есть в зале.
pub fn validate_persisted_seats(seats: Vec<SelectedSeat>, venue: &Venue) -> Vec<SelectedSeat> {
    let ids: std::collections::HashSet<&str> = venue.seats().map(|(_, _, seat)| seat.id.as_str()).collect();
    seats.into_iter().filter(|s| ids.contains(s.id())).collect()
}
