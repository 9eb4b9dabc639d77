//! Настройки запуска часов (каталог данных, период тиков, фильтр логов).
//!
//! Здесь описываем только "правила" запуска, без состояния турнира.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Переменная окружения с каталогом для JSON-файлов состояния.
pub const ENV_DATA_DIR: &str = "POKER_CLOCK_DATA_DIR";

/// Переменная окружения с периодом тиков в миллисекундах.
pub const ENV_TICK_MS: &str = "POKER_CLOCK_TICK_MS";

/// Стандартная переменная фильтра `tracing-subscriber`.
pub const ENV_LOG_FILTER: &str = "RUST_LOG";

/// Подкаталог приложения внутри системного каталога данных.
pub const DATA_DIR_NAME: &str = "poker-clock";

/// Каталог данных, если системный не определился (относительно cwd).
pub const FALLBACK_DATA_DIR: &str = ".poker-clock";

/// `<data_dir>/poker-clock`, например `~/.local/share/poker-clock` на Linux.
#[cfg(not(target_arch = "wasm32"))]
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(DATA_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
}

#[cfg(target_arch = "wasm32")]
pub fn default_data_dir() -> PathBuf {
    PathBuf::from(FALLBACK_DATA_DIR)
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClockSettings {
    /// Куда писать `pomer-tournament-state.json` и `pomer-config.json`.
    pub data_dir: PathBuf,
    /// Период тиков. Часы считают от временных меток, так что это только частота обновления.
    pub tick_interval_ms: u64,
    /// Фильтр логов в синтаксисе `EnvFilter`.
    pub log_filter: String,
}

impl ClockSettings {
    /// Стандартный профиль: `default_data_dir()`, тик раз в секунду, логи `info`.
    pub fn standard() -> Self {
        Self {
            data_dir: default_data_dir(),
            tick_interval_ms: 1000,
            log_filter: "info".to_string(),
        }
    }

    /// Стандартный профиль + переопределения из окружения.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// То же, что `from_env`, но с произвольным источником переменных.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::standard();

        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|d| !d.trim().is_empty()) {
            settings.data_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup(ENV_TICK_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => settings.tick_interval_ms = ms,
                Err(err) => warn!(value = %raw, error = %err, "ignoring invalid {}", ENV_TICK_MS),
            }
        }

        if let Some(filter) = lookup(ENV_LOG_FILTER).filter(|f| !f.trim().is_empty()) {
            settings.log_filter = filter;
        }

        settings
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.data_dir.as_os_str().is_empty() {
            return Err("ClockSettings: data_dir is empty".into());
        }
        if self.tick_interval_ms == 0 {
            return Err("ClockSettings: tick_interval_ms = 0".into());
        }
        if self.tick_interval_ms > 60_000 {
            return Err(format!(
                "ClockSettings: tick_interval_ms ({}) > 60000",
                self.tick_interval_ms
            ));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self::standard()
    }
}
