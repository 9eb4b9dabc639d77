use serde::{Deserialize, Serialize};

use crate::domain::tournament::{BreakInfo, TournamentState};
use crate::state::ClockStore;

use super::dto::{build_clock_view, ClockViewDto};

/// Запросы "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Query {
    /// Сырое состояние (как в хранилище).
    GetState,

    /// Готовое представление для табло.
    GetView,

    /// Сводка по перерыву.
    GetBreakInfo,
}

/// Результат запроса "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum QueryResponse {
    State(Box<TournamentState>),
    View(Box<ClockViewDto>),
    BreakInfo(BreakInfo),
}

pub fn run_query(store: &ClockStore, query: Query) -> QueryResponse {
    match query {
        Query::GetState => QueryResponse::State(Box::new(store.state().clone())),
        Query::GetView => QueryResponse::View(Box::new(build_clock_view(store.state()))),
        Query::GetBreakInfo => QueryResponse::BreakInfo(store.break_info()),
    }
}
