//! Хранение состояния часов в key-value хранилище.
//!
//! Раскладка совпадает с браузерным local storage:
//! - `pomer-tournament-state`: JSON `TournamentState`;
//! - `pomer-config`: последний использованный `TournamentConfig` (для формы).
//!
//! Битые или отсутствующие записи не ошибка: берём состояние "не настроен".

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::domain::tournament::{TournamentConfig, TournamentState};
use crate::state::StateObserver;
use crate::time_ctrl::ClockEvent;

/// Ключ состояния часов.
pub const STATE_KEY: &str = "pomer-tournament-state";

/// Ключ последнего конфига.
pub const CONFIG_KEY: &str = "pomer-config";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is unavailable: {0}")]
    Unavailable(String),

    #[error("i/o error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode value for key {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Абстракция строкового key-value хранилища.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Удаление отсутствующего ключа: не ошибка.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Простая in-memory реализация для тестов и локального запуска.
///
/// Клоны смотрят в одну и ту же карту.
#[derive(Clone, Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StorageError {
        StorageError::Unavailable("in-memory store lock poisoned".into())
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| Self::poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| Self::poisoned())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| Self::poisoned())?;
        entries.remove(key);
        Ok(())
    }
}

/// Один JSON-файл на ключ в каталоге `dir`.
#[derive(Clone, Debug)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_err)?;
        fs::write(self.path_for(key), value).map_err(io_err)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// Типизированный слой над `KeyValueStore`: состояние часов и последний конфиг.
///
/// Сам является `StateObserver`, то есть подключается к `ClockStore` как
/// write-through подписчик.
#[derive(Clone, Debug)]
pub struct TournamentRepository<S> {
    store: S,
}

impl<S: KeyValueStore> TournamentRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Загрузить состояние. Нет записи или она битая → "не настроен".
    pub fn load_state(&self) -> TournamentState {
        self.read_json(STATE_KEY).unwrap_or_default()
    }

    pub fn save_state(&mut self, state: &TournamentState) -> Result<(), StorageError> {
        self.write_json(STATE_KEY, state)
    }

    pub fn clear_state(&mut self) -> Result<(), StorageError> {
        self.store.remove(STATE_KEY)
    }

    /// Последний конфиг для предзаполнения формы.
    pub fn load_saved_config(&self) -> Option<TournamentConfig> {
        self.read_json(CONFIG_KEY)
    }

    pub fn save_config(&mut self, config: &TournamentConfig) -> Result<(), StorageError> {
        self.write_json(CONFIG_KEY, config)
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(key, error = %err, "failed to read from storage");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, error = %err, "discarding malformed record");
                None
            }
        }
    }

    fn write_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, &raw)
    }
}

impl<S: KeyValueStore> StateObserver for TournamentRepository<S> {
    fn on_change(&mut self, state: &TournamentState, event: &ClockEvent) {
        if matches!(event, ClockEvent::Reset) {
            if let Err(err) = self.clear_state() {
                warn!(error = %err, "failed to erase tournament state");
            }
            return;
        }

        if matches!(event, ClockEvent::Started { .. }) {
            if let Err(err) = self.save_config(&state.config) {
                warn!(error = %err, "failed to save tournament config");
            }
        }

        if let Err(err) = self.save_state(state) {
            warn!(error = %err, "failed to save tournament state, continuing in memory");
        }
    }
}
