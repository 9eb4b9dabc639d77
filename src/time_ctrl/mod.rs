// src/time_ctrl/mod.rs
//! Контроль времени турнира.
//!
//! Здесь собираем:
//! - переходы часов (`clock`) поверх `TournamentState`;
//! - источники времени (`TimeSource`): системный и ручной для тестов;
//! - периодический драйвер тиков (`Ticker`), только не для wasm32.

pub mod clock;
pub mod time_source;
#[cfg(not(target_arch = "wasm32"))]
pub mod ticker;

pub use clock::{derive_remaining, next_level_number, should_take_break, ClockEvent};
pub use time_source::{ManualTimeSource, SystemTimeSource, TimeSource};
#[cfg(not(target_arch = "wasm32"))]
pub use ticker::{Ticker, TickerSlot};

/// Секунды в формате `MM:SS`. Минуты не заворачиваются в часы (`75:00`).
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
