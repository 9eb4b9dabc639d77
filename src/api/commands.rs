use serde::{Deserialize, Serialize};

use crate::domain::blinds::BlindPreset;
use crate::domain::tournament::TournamentConfig;
use crate::state::ClockStore;
use crate::time_ctrl::ClockEvent;

use super::errors::ApiError;

/// Команда верхнего уровня: всё, что меняет состояние часов.
///
/// Эти команды превращаются в операции (`ClockOperation`), которые
/// приложение экспонирует наружу.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Command {
    /// Старт турнира с новым конфигом (история очищается).
    Start(StartCommand),

    /// Пауза / продолжение.
    Toggle,

    /// Перейти к следующему уровню (или закончить перерыв) прямо сейчас.
    SkipLevel,

    /// Полный сброс: расписание и история очищаются.
    Reset,

    /// Тик таймера. Обычно его шлёт `Ticker`, а не пользователь.
    Tick,
}

/// Команда на старт турнира.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StartCommand {
    /// Полная конфигурация (см. `domain::tournament::TournamentConfig`).
    pub config: TournamentConfig,
}

impl StartCommand {
    /// Старт по готовому пресету блайндов, опционально со своим названием.
    pub fn from_preset(preset: BlindPreset, name: Option<String>) -> Self {
        let mut config = TournamentConfig::from_preset(preset);
        if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
            config.name = name;
        }
        Self { config }
    }
}

/// Разобрать команду из JSON (формат serde по умолчанию: `"Toggle"`, `{"Start":{...}}`).
pub fn parse_command(raw: &str) -> Result<Command, ApiError> {
    Ok(serde_json::from_str(raw)?)
}

/// Выполнить команду над хранилищем часов.
pub fn execute(store: &mut ClockStore, command: Command) -> Result<ClockEvent, ApiError> {
    match command {
        Command::Start(StartCommand { config }) => Ok(store.start(config)?),
        Command::Toggle => Ok(store.toggle()),
        Command::SkipLevel => Ok(store.skip_level()),
        Command::Reset => Ok(store.reset()),
        Command::Tick => Ok(store.tick()),
    }
}
