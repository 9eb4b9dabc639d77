// src/domain/tournament.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::blinds::{BlindLevel, BlindPreset, BlindStructure};
use crate::domain::chips::Chips;

/// Название турнира по умолчанию.
pub const DEFAULT_TOURNAMENT_NAME: &str = "Torneio Pomer";

/// Основной цвет табло по умолчанию.
pub const DEFAULT_PRIMARY_COLOR: &str = "#006FEE";

/// Конфигурация турнира.
/// Всё, что приходит из формы настройки перед стартом.
///
/// Во время турнира не меняется, пересоздаётся только через reset.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TournamentConfig {
    /// Название турнира.
    pub name: String,

    /// Длительность уровня по умолчанию (минуты).
    ///
    /// Используется как запасное значение, когда расписание закончилось.
    #[serde(rename = "levelDuration")]
    pub level_duration_minutes: u32,

    /// Перерыв после каждого N-го уровня.
    pub break_interval: u32,

    /// Длительность перерыва (минуты).
    #[serde(rename = "breakDuration")]
    pub break_duration_minutes: u32,

    /// Структура блайндов и их длительности.
    pub blind_structure: BlindStructure,

    /// Основной цвет табло (CSS-строка).
    pub primary_color: String,
}

impl TournamentConfig {
    /// Жёсткая валидация конфига перед стартом.
    pub fn validate(&self) -> Result<(), TournamentError> {
        if self.level_duration_minutes == 0 {
            return Err(TournamentError::InvalidConfig(
                "TournamentConfig: level_duration_minutes = 0".into(),
            ));
        }

        if self.break_interval == 0 {
            return Err(TournamentError::InvalidConfig(
                "TournamentConfig: break_interval = 0".into(),
            ));
        }

        if self.break_duration_minutes == 0 {
            return Err(TournamentError::InvalidConfig(
                "TournamentConfig: break_duration_minutes = 0".into(),
            ));
        }

        self.blind_structure
            .validate()
            .map_err(TournamentError::InvalidConfig)?;

        Ok(())
    }

    /// Конфиг по пресету: каденция перерывов по умолчанию, блайнды из пресета.
    pub fn from_preset(preset: BlindPreset) -> Self {
        let (_, _, minutes) = preset.parameters();
        Self {
            level_duration_minutes: minutes,
            blind_structure: preset.structure(),
            ..Self::default()
        }
    }

    /// Длительность перерыва в секундах.
    pub fn break_duration_secs(&self) -> u64 {
        u64::from(self.break_duration_minutes) * 60
    }

    /// Запасная длительность уровня в секундах.
    pub fn level_duration_secs(&self) -> u64 {
        u64::from(self.level_duration_minutes) * 60
    }
}

impl Default for TournamentConfig {
    /// 20 минут на уровень, перерыв 10 минут после каждого 3-го уровня, средний пресет.
    fn default() -> Self {
        Self {
            name: DEFAULT_TOURNAMENT_NAME.to_string(),
            level_duration_minutes: 20,
            break_interval: 3,
            break_duration_minutes: 10,
            blind_structure: BlindPreset::Medium.structure(),
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
        }
    }
}

/// Запись истории: завершённый или пропущенный уровень.
///
/// Перерывы в историю не пишутся.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LevelHistory {
    pub level: u32,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Плановая длительность уровня (минуты), не фактическая.
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
}

impl LevelHistory {
    pub fn for_level(level: &BlindLevel, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            level: level.level,
            small_blind: level.small_blind,
            big_blind: level.big_blind,
            start_time,
            end_time,
            duration_minutes: level.duration_minutes,
        }
    }
}

/// Фаза часов, вычисляется из `TournamentState`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClockPhase {
    /// Пустое расписание: турнир не настроен.
    Unconfigured,
    Running { level: u32 },
    Paused { level: u32 },
    RunningBreak { after_level: u32 },
    PausedBreak { after_level: u32 },
    /// Уровни закончились, автопереходов больше нет.
    Finished,
}

/// Сводка по перерыву для табло.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BreakInfo {
    pub is_break: bool,
    /// Секунды до конца перерыва (0, если сейчас не перерыв).
    pub break_time_remaining: u64,
    /// Какой уровень будет следующим после перерыва (или текущий).
    pub next_level: u32,
}

/// Состояние часов турнира. Ровно то, что пишется в хранилище.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TournamentState {
    pub config: TournamentConfig,
    pub current_level: u32,
    /// Секунды до конца текущего отрезка (уровня или перерыва).
    pub time_remaining: u64,
    pub is_running: bool,
    pub is_break: bool,
    pub history: Vec<LevelHistory>,

    /// Начало текущего отрезка. Есть только пока отсчёт реально идёт.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,

    /// Снимок остатка на момент паузы.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused_time_remaining: Option<u64>,
}

impl TournamentState {
    /// Состояние "не настроен": конфиг по умолчанию, но без расписания.
    pub fn unconfigured() -> Self {
        Self {
            config: TournamentConfig {
                blind_structure: BlindStructure::empty(),
                ..TournamentConfig::default()
            },
            current_level: 1,
            time_remaining: 0,
            is_running: false,
            is_break: false,
            history: Vec::new(),
            start_time: None,
            paused_time_remaining: None,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.config.blind_structure.is_empty()
    }

    /// Данные текущего уровня (None, если расписание пустое или закончилось).
    pub fn current_level_data(&self) -> Option<&BlindLevel> {
        self.config.blind_structure.level(self.current_level)
    }

    /// Следующий уровень для табло. Во время перерыва это уровень после него.
    pub fn next_level_data(&self) -> Option<&BlindLevel> {
        self.config
            .blind_structure
            .level(self.current_level.saturating_add(1))
    }

    pub fn is_finished(&self) -> bool {
        self.is_configured() && self.current_level_data().is_none()
    }

    /// Полная длина текущего отрезка в секундах.
    ///
    /// None: нет текущего уровня (не настроен / закончился).
    pub fn segment_duration_secs(&self) -> Option<u64> {
        let level = self.current_level_data()?;
        if self.is_break {
            Some(self.config.break_duration_secs())
        } else {
            Some(level.duration_secs())
        }
    }

    /// Доля прошедшего времени текущего отрезка, 0..=100.
    pub fn progress_percent(&self) -> f64 {
        match self.segment_duration_secs() {
            Some(total) if total > 0 => {
                let done = total.saturating_sub(self.time_remaining.min(total));
                done as f64 * 100.0 / total as f64
            }
            _ => 0.0,
        }
    }

    pub fn phase(&self) -> ClockPhase {
        if !self.is_configured() {
            return ClockPhase::Unconfigured;
        }
        if self.current_level_data().is_none() {
            return ClockPhase::Finished;
        }

        let level = self.current_level;
        match (self.is_break, self.is_running) {
            (false, true) => ClockPhase::Running { level },
            (false, false) => ClockPhase::Paused { level },
            (true, true) => ClockPhase::RunningBreak { after_level: level },
            (true, false) => ClockPhase::PausedBreak { after_level: level },
        }
    }

    pub fn break_info(&self) -> BreakInfo {
        BreakInfo {
            is_break: self.is_break,
            break_time_remaining: if self.is_break { self.time_remaining } else { 0 },
            next_level: if self.is_break {
                self.current_level.saturating_add(1)
            } else {
                self.current_level
            },
        }
    }
}

impl Default for TournamentState {
    fn default() -> Self {
        Self::unconfigured()
    }
}

/// Ошибки, которые могут возникать при работе с турниром.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TournamentError {
    #[error("Invalid tournament config: {0}")]
    InvalidConfig(String),
}
