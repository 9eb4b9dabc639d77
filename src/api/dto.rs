use serde::{Deserialize, Serialize};

use crate::domain::blinds::BlindLevel;
use crate::domain::chips::Chips;
use crate::domain::tournament::{ClockPhase, LevelHistory, TournamentState};
use crate::time_ctrl::format_time;

/// DTO блайндов уровня для табло.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlindsDto {
    pub level: u32,
    pub small_blind: Chips,
    pub big_blind: Chips,
    /// Например `"1.5k / 3.0k"`.
    pub display: String,
}

impl From<&BlindLevel> for BlindsDto {
    fn from(level: &BlindLevel) -> Self {
        Self {
            level: level.level,
            small_blind: level.small_blind,
            big_blind: level.big_blind,
            display: format!(
                "{} / {}",
                level.small_blind.format_compact(),
                level.big_blind.format_compact()
            ),
        }
    }
}

/// DTO строки истории.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntryDto {
    pub level: u32,
    pub display: String,
    /// Фактически отыгранное время, `MM:SS`.
    pub played: String,
}

impl From<&LevelHistory> for HistoryEntryDto {
    fn from(entry: &LevelHistory) -> Self {
        let played_secs = entry
            .end_time
            .signed_duration_since(entry.start_time)
            .num_seconds()
            .max(0) as u64;

        Self {
            level: entry.level,
            display: format!(
                "{} / {}",
                entry.small_blind.format_compact(),
                entry.big_blind.format_compact()
            ),
            played: format_time(played_secs),
        }
    }
}

/// Всё, что нужно табло для отрисовки.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClockViewDto {
    pub name: String,
    pub primary_color: String,
    pub phase: ClockPhase,
    pub is_running: bool,
    pub is_break: bool,
    /// Текущий уровень (None: не настроен или расписание закончилось).
    pub current: Option<BlindsDto>,
    /// Следующий уровень (во время перерыва: тот, что после него).
    pub next: Option<BlindsDto>,
    pub time_remaining: u64,
    pub time_display: String,
    pub progress_percent: f64,
    pub history: Vec<HistoryEntryDto>,
}

/// Собрать DTO табло из состояния.
pub fn build_clock_view(state: &TournamentState) -> ClockViewDto {
    ClockViewDto {
        name: state.config.name.clone(),
        primary_color: state.config.primary_color.clone(),
        phase: state.phase(),
        is_running: state.is_running,
        is_break: state.is_break,
        current: state.current_level_data().map(BlindsDto::from),
        next: state.next_level_data().map(BlindsDto::from),
        time_remaining: state.time_remaining,
        time_display: format_time(state.time_remaining),
        progress_percent: state.progress_percent(),
        history: state.history.iter().map(HistoryEntryDto::from).collect(),
    }
}
