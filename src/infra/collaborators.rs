//! Внешние "соавторы" часов: звук и удержание экрана.
//!
//! Оба best-effort: ошибки логируются хранилищем и не влияют на переходы.

use std::io::Write;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Какой звук проиграть.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SoundKind {
    LevelChange,
    BreakStart,
    BreakEnd,
    TournamentStart,
    TournamentEnd,
}

#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("sound playback failed: {0}")]
    Sound(String),

    #[error("not supported on this platform")]
    Unsupported,
}

/// Проигрывание звука перехода (fire-and-forget).
pub trait SoundNotifier: Send {
    fn play(&mut self, kind: SoundKind) -> Result<(), CollaboratorError>;
}

/// Не даём экрану уснуть, пока часы идут.
pub trait WakeHold: Send {
    fn acquire(&mut self) -> Result<(), CollaboratorError>;
    fn release(&mut self) -> Result<(), CollaboratorError>;
}

/// Без звука.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentNotifier;

impl SoundNotifier for SilentNotifier {
    fn play(&mut self, _kind: SoundKind) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

/// Платформа без удержания экрана.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoWakeHold;

impl WakeHold for NoWakeHold {
    fn acquire(&mut self) -> Result<(), CollaboratorError> {
        Ok(())
    }

    fn release(&mut self) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

/// Звонок терминала (`BEL`) в любой `Write`.
#[derive(Debug)]
pub struct TerminalBell<W> {
    out: W,
}

impl<W: Write + Send> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> SoundNotifier for TerminalBell<W> {
    fn play(&mut self, _kind: SoundKind) -> Result<(), CollaboratorError> {
        self.out
            .write_all(b"\x07")
            .and_then(|_| self.out.flush())
            .map_err(|err| CollaboratorError::Sound(err.to_string()))
    }
}

/// Удержание экрана, которое только пишет в лог (для CLI и отладки).
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingWakeHold;

impl WakeHold for LoggingWakeHold {
    fn acquire(&mut self) -> Result<(), CollaboratorError> {
        info!("wake hold acquired");
        Ok(())
    }

    fn release(&mut self) -> Result<(), CollaboratorError> {
        info!("wake hold released");
        Ok(())
    }
}
