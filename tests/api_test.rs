use chrono::{DateTime, TimeZone, Utc};
use linera_sdk::linera_base_types::{ContractAbi, ServiceAbi};

use poker_clock::{
    api::{
        commands::{execute, parse_command, Command, StartCommand},
        dto::build_clock_view,
        errors::ApiError,
        queries::{run_query, Query, QueryResponse},
    },
    domain::{
        blinds::{BlindPreset, BlindStructure},
        chips::Chips,
        tournament::{ClockPhase, TournamentConfig, TournamentError},
    },
    state::ClockStore,
    time_ctrl::{ClockEvent, ManualTimeSource},
    ClockAbi, ClockOperation, ClockQuery, ClockResponse,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 19, 0, 0).unwrap()
}

/// Утилита: хранилище с ручными часами, турнир по пресету medium уже запущен.
fn started_medium() -> (ClockStore, ManualTimeSource) {
    let time = ManualTimeSource::at(t0());
    let mut store = ClockStore::new(time.clone());
    let event = execute(
        &mut store,
        Command::Start(StartCommand::from_preset(BlindPreset::Medium, Some("Sexta".into()))),
    )
    .unwrap();
    assert_eq!(event, ClockEvent::Started { level: 1 });
    (store, time)
}

#[test]
fn start_from_preset_uses_custom_name() {
    let (store, _) = started_medium();

    assert_eq!(store.state().config.name, "Sexta");
    assert_eq!(store.state().config.blind_structure.len(), 20);
    assert_eq!(store.phase(), ClockPhase::Running { level: 1 });

    // Пустое имя → имя по умолчанию.
    let blank = StartCommand::from_preset(BlindPreset::Small, Some("   ".into()));
    assert_eq!(blank.config.name, "Torneio Pomer");
}

#[test]
fn start_with_empty_schedule_is_invalid_command() {
    let mut store = ClockStore::new(ManualTimeSource::at(t0()));
    let config = TournamentConfig {
        blind_structure: BlindStructure::empty(),
        ..TournamentConfig::default()
    };

    let err = execute(&mut store, Command::Start(StartCommand { config })).unwrap_err();
    assert!(matches!(err, ApiError::InvalidCommand(_)));
    assert_eq!(store.phase(), ClockPhase::Unconfigured);
}

#[test]
fn view_shows_current_and_next_blinds() {
    let (store, _) = started_medium();

    let QueryResponse::View(view) = run_query(&store, Query::GetView) else {
        panic!("ожидали View");
    };
    assert_eq!(view.name, "Sexta");
    assert_eq!(view.primary_color, "#006FEE");
    assert_eq!(view.time_display, "20:00");
    assert_eq!(view.current.as_ref().unwrap().display, "50 / 100");
    assert_eq!(view.next.as_ref().unwrap().display, "100 / 200");
    assert_eq!(view.progress_percent, 0.0);
    assert!(view.history.is_empty());
}

#[test]
fn view_uses_compact_numbers_and_history() {
    let (mut store, time) = started_medium();

    // Уровень 1 отыгран целиком, дальше пропускаем до 11-го.
    time.advance_secs(20 * 60);
    assert_eq!(
        execute(&mut store, Command::Tick).unwrap(),
        ClockEvent::LevelAdvanced { from: 1, to: 2 }
    );
    for _ in 0..12 {
        execute(&mut store, Command::SkipLevel).unwrap();
    }
    // По пути три перерыва: после 3, 6 и 9 уровней.
    assert_eq!(store.state().current_level, 11);
    assert!(!store.state().is_break);

    let view = build_clock_view(store.state());
    assert_eq!(view.current.as_ref().unwrap().display, "2.4k / 4.8k");
    assert_eq!(view.history.len(), 10);
    assert_eq!(view.history[0].played, "20:00");
    assert_eq!(view.history[1].played, "00:00");
}

#[test]
fn break_info_query_during_break() {
    let (mut store, time) = started_medium();

    for _ in 0..3 {
        execute(&mut store, Command::SkipLevel).unwrap();
    }
    assert_eq!(store.phase(), ClockPhase::RunningBreak { after_level: 3 });

    time.advance_secs(4 * 60);
    execute(&mut store, Command::Tick).unwrap();

    let QueryResponse::BreakInfo(info) = run_query(&store, Query::GetBreakInfo) else {
        panic!("ожидали BreakInfo");
    };
    assert!(info.is_break);
    assert_eq!(info.break_time_remaining, 6 * 60);
    assert_eq!(info.next_level, 4);
}

#[test]
fn state_query_returns_raw_state() {
    let (mut store, _) = started_medium();
    execute(&mut store, Command::Toggle).unwrap();

    let QueryResponse::State(state) = run_query(&store, Query::GetState) else {
        panic!("ожидали State");
    };
    assert!(!state.is_running);
    assert_eq!(state.paused_time_remaining, Some(20 * 60));
    assert_eq!(*state, *store.state());
}

#[test]
fn operation_applies_command() {
    let (mut store, _) = started_medium();

    let event = ClockOperation::Command(Command::SkipLevel)
        .apply(&mut store)
        .unwrap();
    assert_eq!(event, ClockEvent::LevelAdvanced { from: 1, to: 2 });

    let event = ClockOperation::Command(Command::Reset)
        .apply(&mut store)
        .unwrap();
    assert_eq!(event, ClockEvent::Reset);
    assert_eq!(store.phase(), ClockPhase::Unconfigured);
}

#[test]
fn parse_command_accepts_json() {
    assert!(matches!(parse_command("\"Toggle\"").unwrap(), Command::Toggle));
    assert!(matches!(parse_command("\"SkipLevel\"").unwrap(), Command::SkipLevel));

    let raw = r##"{"Start":{"config":{
        "name":"JSON Cup",
        "levelDuration":15,
        "breakInterval":4,
        "breakDuration":5,
        "blindStructure":[
            {"level":1,"smallBlind":25,"bigBlind":50,"duration":15},
            {"level":2,"smallBlind":50,"bigBlind":100,"duration":15}
        ],
        "primaryColor":"#111111"
    }}}"##;

    let Command::Start(start) = parse_command(raw).unwrap() else {
        panic!("ожидали Start");
    };
    assert_eq!(start.config.name, "JSON Cup");
    assert_eq!(start.config.break_interval, 4);
    assert_eq!(start.config.blind_structure.level(2).unwrap().big_blind, Chips(100));
}

#[test]
fn parse_command_rejects_garbage() {
    assert!(matches!(parse_command("{not json"), Err(ApiError::BadRequest(_))));
    assert!(matches!(parse_command("\"Explode\""), Err(ApiError::BadRequest(_))));
}

#[test]
fn tournament_error_maps_to_invalid_command() {
    let err: ApiError = TournamentError::InvalidConfig("empty".into()).into();
    assert_eq!(
        err,
        ApiError::InvalidCommand("Invalid tournament config: empty".into())
    );

    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "InvalidCommand": "Invalid tournament config: empty" })
    );
}

/// ABI связывает операцию, запрос и ответ с типами крейта.
fn abi_types<A>() -> (&'static str, &'static str, &'static str)
where
    A: ContractAbi<Operation = ClockOperation, Response = ()>
        + ServiceAbi<Query = ClockQuery, QueryResponse = ClockResponse>,
{
    (
        std::any::type_name::<<A as ContractAbi>::Operation>(),
        std::any::type_name::<<A as ServiceAbi>::Query>(),
        std::any::type_name::<<A as ServiceAbi>::QueryResponse>(),
    )
}

#[test]
fn abi_operation_and_query_roundtrip_through_json() {
    let (op, query, response) = abi_types::<ClockAbi>();
    assert!(op.ends_with("ClockOperation"));
    assert!(query.ends_with("Query"));
    assert!(response.ends_with("QueryResponse"));

    // Операция приходит в контракт как JSON и применяется к хранилищу.
    let raw = serde_json::to_string(&ClockOperation::Command(Command::Toggle)).unwrap();
    assert_eq!(raw, r#"{"Command":"Toggle"}"#);
    let op: ClockOperation = serde_json::from_str(&raw).unwrap();

    let (mut store, _) = started_medium();
    assert_eq!(
        op.apply(&mut store).unwrap(),
        ClockEvent::Paused { remaining: 20 * 60 }
    );

    // Запрос к сервису и ответ тоже переживают JSON.
    let query: ClockQuery = serde_json::from_str(r#""GetBreakInfo""#).unwrap();
    let response: ClockResponse = run_query(&store, query);
    let raw = serde_json::to_string(&response).unwrap();
    let QueryResponse::BreakInfo(info) = serde_json::from_str::<ClockResponse>(&raw).unwrap() else {
        panic!("ожидали BreakInfo");
    };
    assert!(!info.is_break);
    assert_eq!(info.next_level, 1);
}
