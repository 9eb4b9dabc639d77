//! Хранилище состояния часов: единственный владелец `TournamentState`.
//!
//! Создаётся в корне композиции (CLI, сервис) и передаётся дальше явно,
//! глобального состояния нет. После каждой операции, которая что-то изменила:
//! - уведомляются наблюдатели (`StateObserver`), например запись в хранилище;
//! - проигрывается звук перехода (best-effort);
//! - захватывается или отпускается удержание экрана (best-effort).

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::domain::tournament::{BreakInfo, ClockPhase, TournamentConfig, TournamentError, TournamentState};
use crate::infra::collaborators::{NoWakeHold, SilentNotifier, SoundKind, SoundNotifier, WakeHold};
use crate::time_ctrl::{ClockEvent, TimeSource};

/// Общий хэндл на хранилище для таймера и команд.
#[cfg(not(target_arch = "wasm32"))]
pub type SharedClockStore = std::sync::Arc<tokio::sync::Mutex<ClockStore>>;

/// Подписчик на изменения состояния (write-through в хранилище и т.п.).
///
/// Ошибки подписчик обрабатывает сам: переход часов уже случился.
pub trait StateObserver: Send {
    fn on_change(&mut self, state: &TournamentState, event: &ClockEvent);
}

/// Какой звук играть на событие. Конец расписания: отдельный звук.
pub fn sound_for_event(event: &ClockEvent, state: &TournamentState) -> Option<SoundKind> {
    match event {
        ClockEvent::Started { .. } => Some(SoundKind::TournamentStart),
        ClockEvent::LevelAdvanced { .. } => Some(SoundKind::LevelChange),
        ClockEvent::BreakStarted { .. } => Some(SoundKind::BreakStart),
        ClockEvent::BreakEnded { .. } if state.is_finished() => Some(SoundKind::TournamentEnd),
        ClockEvent::BreakEnded { .. } => Some(SoundKind::BreakEnd),
        _ => None,
    }
}

pub struct ClockStore {
    state: TournamentState,
    time: Box<dyn TimeSource>,
    observers: Vec<Box<dyn StateObserver>>,
    sound: Box<dyn SoundNotifier>,
    wake: Box<dyn WakeHold>,
    wake_held: bool,
}

impl ClockStore {
    /// Пустое хранилище в состоянии "не настроен", без звука и без удержания экрана.
    pub fn new(time: impl TimeSource + 'static) -> Self {
        Self {
            state: TournamentState::unconfigured(),
            time: Box::new(time),
            observers: Vec::new(),
            sound: Box::new(SilentNotifier),
            wake: Box::new(NoWakeHold),
            wake_held: false,
        }
    }

    /// Восстановить состояние (обычно загруженное из хранилища).
    pub fn with_state(mut self, mut state: TournamentState) -> Self {
        state.refresh_after_load(self.time.now());
        self.state = state;
        self.sync_wake_hold();
        self
    }

    pub fn with_observer(mut self, observer: impl StateObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    pub fn with_sound(mut self, sound: impl SoundNotifier + 'static) -> Self {
        self.sound = Box::new(sound);
        self
    }

    pub fn with_wake_hold(mut self, wake: impl WakeHold + 'static) -> Self {
        self.wake = Box::new(wake);
        self.wake_held = false;
        self.sync_wake_hold();
        self
    }

    pub fn state(&self) -> &TournamentState {
        &self.state
    }

    pub fn phase(&self) -> ClockPhase {
        self.state.phase()
    }

    pub fn break_info(&self) -> BreakInfo {
        self.state.break_info()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.time.now()
    }

    /// Нужно ли сейчас гонять тики.
    pub fn should_tick(&self) -> bool {
        self.state.is_running && self.state.current_level_data().is_some()
    }

    pub fn start(&mut self, config: TournamentConfig) -> Result<ClockEvent, TournamentError> {
        let now = self.time.now();
        let event = self.state.start(config, now)?;
        info!(
            name = %self.state.config.name,
            levels = self.state.config.blind_structure.len(),
            "tournament started"
        );
        Ok(self.commit(event))
    }

    pub fn tick(&mut self) -> ClockEvent {
        let now = self.time.now();
        let event = self.state.tick(now);
        self.commit(event)
    }

    pub fn toggle(&mut self) -> ClockEvent {
        let now = self.time.now();
        let event = self.state.toggle(now);
        self.commit(event)
    }

    pub fn skip_level(&mut self) -> ClockEvent {
        let now = self.time.now();
        let event = self.state.skip_level(now);
        self.commit(event)
    }

    pub fn reset(&mut self) -> ClockEvent {
        let event = self.state.reset();
        info!("tournament reset");
        self.commit(event)
    }

    fn commit(&mut self, event: ClockEvent) -> ClockEvent {
        if !event.changes_state() {
            return event;
        }

        if event.is_transition() {
            debug!(
                ?event,
                level = self.state.current_level,
                is_break = self.state.is_break,
                remaining = self.state.time_remaining,
                "clock transition"
            );
        }

        for observer in &mut self.observers {
            observer.on_change(&self.state, &event);
        }

        if let Some(kind) = sound_for_event(&event, &self.state) {
            if let Err(err) = self.sound.play(kind) {
                warn!(error = %err, ?kind, "sound notification failed");
            }
        }

        self.sync_wake_hold();
        event
    }

    /// Экран держим, пока часы реально идут.
    fn sync_wake_hold(&mut self) {
        let want = self.should_tick();
        if want == self.wake_held {
            return;
        }

        let result = if want {
            self.wake.acquire()
        } else {
            self.wake.release()
        };

        if let Err(err) = result {
            warn!(error = %err, acquire = want, "wake hold request failed");
        }
        self.wake_held = want;
    }
}
