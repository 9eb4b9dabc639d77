// src/bin/poker_clock_cli.rs
//
// Dev-CLI часов турнира: команды читаются из stdin, состояние пишется в
// каталог данных (по JSON-файлу на ключ), тики идут раз в секунду.

use std::sync::Arc;

use poker_clock::api::{build_clock_view, execute, parse_command, ClockViewDto, Command, StartCommand};
use poker_clock::domain::blinds::BlindPreset;
use poker_clock::domain::tournament::TournamentState;
use poker_clock::infra::{
    ClockSettings, FileKeyValueStore, LoggingWakeHold, TerminalBell, TournamentRepository,
};
use poker_clock::state::{ClockStore, SharedClockStore, StateObserver};
use poker_clock::time_ctrl::{format_time, ClockEvent, SystemTimeSource, TickerSlot};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Печатает переходы (уровень/перерыв) прямо в консоль.
struct ConsoleObserver;

impl StateObserver for ConsoleObserver {
    fn on_change(&mut self, state: &TournamentState, event: &ClockEvent) {
        if !event.is_transition() {
            return;
        }
        let view = build_clock_view(state);
        println!(">>> {:?}", event);
        print_view(&view);
    }
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_view(view: &ClockViewDto) {
    println!(
        "[{}] phase={:?} | {} | progress={:.0}% | running={}",
        view.name, view.phase, view.time_display, view.progress_percent, view.is_running
    );
    match &view.current {
        Some(cur) if view.is_break => println!("    ПЕРЕРЫВ после уровня {}", cur.level),
        Some(cur) => println!("    Уровень {}: {}", cur.level, cur.display),
        None => println!("    Нет активного уровня"),
    }
    if let Some(next) = &view.next {
        println!("    Следующий: уровень {} ({})", next.level, next.display);
    }
}

fn print_help() {
    println!("Команды:");
    println!("  start [small|medium|large|turbo|last] [название]  — старт турнира");
    println!("  pause | resume | toggle                        — пауза / продолжение");
    println!("  next                                           — следующий уровень");
    println!("  reset                                          — сброс");
    println!("  status | history | presets | help | quit");
    println!("  json <команда>                                 — сырая команда API в JSON");
}

fn print_presets() {
    for preset in BlindPreset::ALL {
        let (start, levels, minutes) = preset.parameters();
        println!(
            "  {:<7} SB={} уровней={} по {} мин",
            preset.name(),
            start,
            levels,
            minutes
        );
    }
}

fn print_history(state: &TournamentState) {
    if state.history.is_empty() {
        println!("История пуста.");
        return;
    }
    for entry in build_clock_view(state).history {
        println!("  уровень {:>2} | {:<15} | {}", entry.level, entry.display, entry.played);
    }
}

/// `start [пресет|last] [название]` → команда старта.
///
/// Без пресета берём последний сохранённый конфиг, а если его нет: medium.
fn start_command(args: &[&str], repo: &TournamentRepository<FileKeyValueStore>) -> Command {
    let name = (args.len() > 1).then(|| args[1..].join(" "));

    let config = match args.first().copied() {
        Some("last") => repo.load_saved_config(),
        Some(raw) => BlindPreset::from_name(raw)
            .map(|preset| StartCommand::from_preset(preset, None).config),
        None => repo.load_saved_config(),
    };

    let mut start = StartCommand {
        config: config.unwrap_or_else(|| StartCommand::from_preset(BlindPreset::Medium, None).config),
    };
    if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
        start.config.name = name;
    }

    Command::Start(start)
}

/// Аргумент команды `json <команда>`: всё после слова `json`.
fn json_payload(line: &str) -> &str {
    let line = line.trim_start();
    line.strip_prefix("json").unwrap_or(line).trim()
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let settings = ClockSettings::from_env();
    init_tracing(&settings.log_filter);

    if let Err(err) = settings.validate() {
        error!(error = %err, "invalid settings");
        return;
    }

    let repo = TournamentRepository::new(FileKeyValueStore::new(settings.data_dir.clone()));
    info!(data_dir = %settings.data_dir.display(), "poker_clock_cli: loading state");

    let store = ClockStore::new(SystemTimeSource)
        .with_state(repo.load_state())
        .with_observer(repo.clone())
        .with_observer(ConsoleObserver)
        .with_sound(TerminalBell::new(std::io::stdout()))
        .with_wake_hold(LoggingWakeHold);
    let store: SharedClockStore = Arc::new(Mutex::new(store));

    let mut ticker = TickerSlot::new(settings.tick_interval());
    {
        let guard = store.lock().await;
        print_view(&build_clock_view(guard.state()));
        ticker.sync(&store, guard.should_tick());
    }

    println!("=== POKER CLOCK CLI === (help — список команд)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                error!(error = %err, "failed to read stdin");
                break;
            }
        };

        let line = line.trim();
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&head, args)) = words.split_first() else {
            continue;
        };

        let command = match head {
            "start" => start_command(args, &repo),
            "pause" | "resume" | "toggle" => Command::Toggle,
            "next" | "skip" => Command::SkipLevel,
            "reset" => Command::Reset,
            "json" => match parse_command(json_payload(line)) {
                Ok(command) => command,
                Err(err) => {
                    println!("Ошибка: {:?}", err);
                    continue;
                }
            },
            "status" => {
                print_view(&build_clock_view(store.lock().await.state()));
                continue;
            }
            "history" => {
                print_history(store.lock().await.state());
                continue;
            }
            "presets" => {
                print_presets();
                continue;
            }
            "help" => {
                print_help();
                continue;
            }
            "quit" | "exit" => break,
            other => {
                println!("Неизвестная команда: {} (help — список команд)", other);
                continue;
            }
        };

        let mut guard = store.lock().await;
        match execute(&mut guard, command) {
            Ok(ClockEvent::Paused { remaining }) => println!("Пауза, осталось {}", format_time(remaining)),
            Ok(ClockEvent::Resumed { remaining }) => println!("Продолжаем, осталось {}", format_time(remaining)),
            Ok(ClockEvent::Reset) => println!("Турнир сброшен."),
            Ok(ClockEvent::Started { .. }) => print_view(&build_clock_view(guard.state())),
            Ok(ClockEvent::Unchanged) => println!("Ничего не изменилось."),
            Ok(_) => {}
            Err(err) => println!("Ошибка: {:?}", err),
        }
        ticker.sync(&store, guard.should_tick());
    }

    ticker.stop();
    println!("=== POKER CLOCK CLI DONE ===");
}
