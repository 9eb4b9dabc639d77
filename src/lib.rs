//! Часы покерного турнира: расписание блайндов, перерывы, пауза без дрейфа, история.
//!
//! Здесь описываем ABI (Operation / Message / Query / Response) и
//! связываем его с `ClockStore`.

pub mod api;
pub mod domain;
pub mod infra;
pub mod state;
pub mod time_ctrl;

use linera_sdk::linera_base_types::{ContractAbi, ServiceAbi};
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, Command, Query, QueryResponse};
use crate::state::ClockStore;
use crate::time_ctrl::ClockEvent;

/// Операции (внешние команды), которые модуль принимает.
///
/// Для простоты: одна операция = одна команда из api::Command.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ClockOperation {
    Command(Command),
}

impl ClockOperation {
    pub fn apply(self, store: &mut ClockStore) -> Result<ClockEvent, ApiError> {
        match self {
            ClockOperation::Command(command) => api::execute(store, command),
        }
    }
}

/// Сообщения между приложениями.
/// Пока нам не нужны – оставим пустой enum.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ClockMessage {}

/// Запросы к сервису (read-only).
pub type ClockQuery = Query;

/// Ответы на запросы.
pub type ClockResponse = QueryResponse;

/// ABI для контракта и сервиса.
#[derive(Clone, Debug)]
pub struct ClockAbi;

impl ContractAbi for ClockAbi {
    type Operation = ClockOperation;
    type Response = ();
}

impl ServiceAbi for ClockAbi {
    type Query = ClockQuery;
    type QueryResponse = ClockResponse;
}
