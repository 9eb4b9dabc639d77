// src/time_ctrl/ticker.rs
//! Периодический драйвер тиков (1 Гц по умолчанию) поверх tokio.
//!
//! Задача живёт, пока часы идут; при остановке (`stop`, `Drop`) она
//! гарантированно отменяется, чтобы старый таймер не трогал состояние.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

use crate::state::SharedClockStore;

/// Запущенный таймер. Отменяется при drop.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Запустить тики с периодом `period`. Нужен активный tokio runtime.
    pub fn spawn(store: SharedClockStore, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // Первый тик interval срабатывает сразу: пропускаем его.
            interval.tick().await;

            loop {
                interval.tick().await;

                let mut store = store.lock().await;
                if !store.should_tick() {
                    debug!("clock is not running, ticker exits");
                    break;
                }
                store.tick();
            }
        });

        Self { handle }
    }

    /// Задача завершилась сама (часы остановились) или была отменена.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Слот под не более чем один таймер.
///
/// После каждой команды вызываем `sync`, и слот сам запускает или гасит тики.
#[derive(Debug)]
pub struct TickerSlot {
    period: Duration,
    ticker: Option<Ticker>,
}

impl TickerSlot {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            ticker: None,
        }
    }

    pub fn sync(&mut self, store: &SharedClockStore, should_tick: bool) {
        if !should_tick {
            if self.ticker.take().is_some() {
                debug!("ticker stopped");
            }
            return;
        }

        let alive = self.ticker.as_ref().is_some_and(|t| !t.is_finished());
        if !alive {
            debug!(period_ms = self.period.as_millis() as u64, "ticker started");
            self.ticker = Some(Ticker::spawn(store.clone(), self.period));
        }
    }

    pub fn is_active(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn stop(&mut self) {
        self.ticker = None;
    }
}
