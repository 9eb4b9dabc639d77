// src/time_ctrl/clock.rs
//! Часы турнира: переходы уровень → перерыв → уровень поверх `TournamentState`.
//!
//! Все операции принимают `now` явно, поэтому логика детерминирована и не
//! знает, откуда берётся время (системные часы, ручные часы в тестах).

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::blinds::BlindStructure;
use crate::domain::tournament::{LevelHistory, TournamentConfig, TournamentError, TournamentState};

/// Результат операции над часами.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClockEvent {
    /// Ничего не изменилось (часы стоят, нет текущего уровня и т.п.).
    Unchanged,
    Started { level: u32 },
    /// Обычный тик: остаток пересчитан, перехода нет.
    Ticked { remaining: u64 },
    Paused { remaining: u64 },
    Resumed { remaining: u64 },
    LevelAdvanced { from: u32, to: u32 },
    BreakStarted { after_level: u32 },
    BreakEnded { next_level: u32 },
    Reset,
}

impl ClockEvent {
    /// Смена отрезка (уровня или перерыва).
    pub fn is_transition(&self) -> bool {
        matches!(
            self,
            ClockEvent::LevelAdvanced { .. }
                | ClockEvent::BreakStarted { .. }
                | ClockEvent::BreakEnded { .. }
        )
    }

    pub fn changes_state(&self) -> bool {
        !matches!(self, ClockEvent::Unchanged)
    }
}

/// Остаток отрезка длиной `duration_secs`, начатого в `start`, на момент `now`.
///
/// Прошедшее время считается целыми секундами (вниз). `now` раньше `start`
/// считается нулём прошедшего времени.
pub fn derive_remaining(start: DateTime<Utc>, duration_secs: u64, now: DateTime<Utc>) -> u64 {
    let elapsed = now.signed_duration_since(start).num_seconds().max(0) as u64;
    duration_secs.saturating_sub(elapsed)
}

/// Перерыв положен после уровня `level`, если он кратен `interval`.
pub fn should_take_break(level: u32, interval: u32) -> bool {
    level > 0 && interval > 0 && level % interval == 0
}

/// Следующий уровень, но не дальше последнего.
pub fn next_level_number(current: u32, total: u32) -> u32 {
    current.saturating_add(1).min(total)
}

impl TournamentState {
    /// Старт турнира с новым конфигом. Пустое расписание: ошибка вызывающего.
    pub fn start(
        &mut self,
        config: TournamentConfig,
        now: DateTime<Utc>,
    ) -> Result<ClockEvent, TournamentError> {
        config.validate()?;

        let time_remaining = level_secs_or_fallback(&config, 1);

        *self = TournamentState {
            config,
            current_level: 1,
            time_remaining,
            is_running: true,
            is_break: false,
            history: Vec::new(),
            start_time: Some(now),
            paused_time_remaining: None,
        };

        Ok(ClockEvent::Started { level: 1 })
    }

    /// Тиковое обновление по времени.
    ///
    /// Остаток каждый раз считается заново от `start_time`, поэтому пропущенные
    /// тики не накапливают ошибку. Но за один тик делается не больше одного
    /// перехода: новый отрезок стартует в `now`, а не на плановой границе.
    pub fn tick(&mut self, now: DateTime<Utc>) -> ClockEvent {
        if !self.is_running {
            return ClockEvent::Unchanged;
        }
        let Some(start) = self.start_time else {
            return ClockEvent::Unchanged;
        };
        let Some(total) = self.segment_duration_secs() else {
            return ClockEvent::Unchanged;
        };

        let remaining = derive_remaining(start, total, now);
        if remaining > 0 {
            self.time_remaining = remaining;
            return ClockEvent::Ticked { remaining };
        }

        self.complete_segment(now)
    }

    /// Пауза / продолжение.
    ///
    /// При продолжении `start_time` сдвигается назад на уже отыгранную часть
    /// отрезка, так что следующий тик даст тот же остаток.
    pub fn toggle(&mut self, now: DateTime<Utc>) -> ClockEvent {
        let Some(total) = self.segment_duration_secs() else {
            return ClockEvent::Unchanged;
        };

        if self.is_running {
            if let Some(start) = self.start_time {
                self.time_remaining = derive_remaining(start, total, now);
            }
            self.paused_time_remaining = Some(self.time_remaining);
            self.is_running = false;
            self.start_time = None;
            return ClockEvent::Paused {
                remaining: self.time_remaining,
            };
        }

        let remaining = self
            .paused_time_remaining
            .unwrap_or(self.time_remaining)
            .min(total);
        let elapsed = total - remaining;

        self.start_time = Some(now - TimeDelta::seconds(elapsed as i64));
        self.time_remaining = remaining;
        self.is_running = true;
        self.paused_time_remaining = None;

        ClockEvent::Resumed { remaining }
    }

    /// Ручной переход к следующему отрезку, как будто время вышло.
    ///
    /// На паузе часы остаются на паузе: новый отрезок целиком лежит в
    /// `paused_time_remaining`.
    pub fn skip_level(&mut self, now: DateTime<Utc>) -> ClockEvent {
        if self.current_level_data().is_none() {
            return ClockEvent::Unchanged;
        }

        let event = self.complete_segment(now);

        if !self.is_running && event.changes_state() {
            self.start_time = None;
            self.paused_time_remaining = Some(self.time_remaining);
        }

        event
    }

    /// Полный сброс: расписание и история очищаются, остальной конфиг остаётся.
    pub fn reset(&mut self) -> ClockEvent {
        self.config.blind_structure = BlindStructure::empty();
        self.current_level = 1;
        self.time_remaining = 0;
        self.is_running = false;
        self.is_break = false;
        self.history.clear();
        self.start_time = None;
        self.paused_time_remaining = None;

        ClockEvent::Reset
    }

    /// После загрузки из хранилища: пересчитать остаток идущего отрезка.
    ///
    /// Переходов здесь нет, их сделает первый тик.
    pub fn refresh_after_load(&mut self, now: DateTime<Utc>) {
        if !self.is_running {
            return;
        }
        if let (Some(start), Some(total)) = (self.start_time, self.segment_duration_secs()) {
            self.time_remaining = derive_remaining(start, total, now);
        }
    }

    /// Завершить текущий отрезок и открыть следующий (старт в `now`).
    fn complete_segment(&mut self, now: DateTime<Utc>) -> ClockEvent {
        if self.is_break {
            // Перерыв в историю не пишем.
            let next_level = self.current_level.saturating_add(1);
            self.current_level = next_level;
            self.is_break = false;
            self.start_time = Some(now);
            self.time_remaining = level_secs_or_fallback(&self.config, next_level);
            return ClockEvent::BreakEnded { next_level };
        }

        let Some(level) = self.current_level_data().cloned() else {
            return ClockEvent::Unchanged;
        };

        let level_start = self.start_time.unwrap_or(now);
        self.history
            .push(LevelHistory::for_level(&level, level_start, now));
        self.start_time = Some(now);

        // Перерыв считаем по только что сыгранному уровню.
        if should_take_break(self.current_level, self.config.break_interval) {
            self.is_break = true;
            self.time_remaining = self.config.break_duration_secs();
            return ClockEvent::BreakStarted {
                after_level: self.current_level,
            };
        }

        let from = self.current_level;
        let to = next_level_number(from, self.config.blind_structure.last_level_number());
        self.current_level = to;
        self.time_remaining = level_secs_or_fallback(&self.config, to);

        ClockEvent::LevelAdvanced { from, to }
    }
}

/// Длина уровня `number` в секундах, либо `level_duration` из конфига,
/// если такого уровня в расписании нет.
fn level_secs_or_fallback(config: &TournamentConfig, number: u32) -> u64 {
    config
        .blind_structure
        .level(number)
        .map(|lvl| lvl.duration_secs())
        .unwrap_or_else(|| config.level_duration_secs())
}
