// tests/tournament_blinds_test.rs
//
// Проверяем генератор расписания блайндов:
// - ровно `level_count` уровней, номера 1..=N;
// - SB строго растёт, BB = 2 × SB;
// - таблица множителей для 1..=20 и геометрия ×1.5 после 20-го;
// - пресеты и валидация структуры.

use poker_clock::domain::blinds::{
    generate_schedule, small_blind_for_level, BlindLevel, BlindPreset, BlindStructure,
    MAX_SCHEDULE_LEVELS, SMALL_BLIND_MULTIPLIERS,
};
use poker_clock::domain::chips::Chips;
use poker_clock::domain::tournament::{TournamentConfig, TournamentState};

#[test]
fn schedule_has_requested_shape() {
    for (start, count, minutes) in [(1u64, 1u32, 1u32), (25, 15, 20), (50, 20, 20), (100, 25, 20), (7, 30, 5)] {
        let s = generate_schedule(Chips(start), count, minutes);

        assert_eq!(s.len(), count as usize);

        for (idx, lvl) in s.levels.iter().enumerate() {
            assert_eq!(lvl.level, idx as u32 + 1);
            assert_eq!(lvl.big_blind, Chips(lvl.small_blind.0 * 2));
            assert_eq!(lvl.duration_minutes, minutes);
        }

        for pair in s.levels.windows(2) {
            assert!(
                pair[1].small_blind > pair[0].small_blind,
                "SB должен строго расти: {:?} -> {:?}",
                pair[0],
                pair[1]
            );
        }

        assert!(s.validate().is_ok());
    }
}

#[test]
fn medium_schedule_first_and_last_levels() {
    let s = generate_schedule(Chips(50), 20, 20);

    let first = s.level(1).unwrap();
    assert_eq!(first.small_blind, Chips(50));
    assert_eq!(first.big_blind, Chips(100));

    let last = s.level(20).unwrap();
    assert_eq!(last.small_blind, Chips(51_200));
    assert_eq!(last.big_blind, Chips(102_400));
}

#[test]
fn multiplier_table_is_used_for_first_twenty_levels() {
    let s = generate_schedule(Chips(10), 20, 15);
    let got: Vec<u64> = s.levels.iter().map(|l| l.small_blind.0 / 10).collect();
    assert_eq!(got, SMALL_BLIND_MULTIPLIERS.to_vec());
}

#[test]
fn late_levels_grow_geometrically() {
    // 50 × 1.5^20 = 166262.83… → 166263
    assert_eq!(small_blind_for_level(21, Chips(50)), Some(Chips(166_263)));
    // 1 × 1.5^21 = 4987.88… → 4988
    assert_eq!(small_blind_for_level(22, Chips(1)), Some(Chips(4_988)));

    let s = generate_schedule(Chips(100), 25, 20);
    assert_eq!(Some(s.level(21).unwrap().small_blind), small_blind_for_level(21, Chips(100)));
    assert_eq!(
        Some(s.level(25).unwrap().big_blind),
        small_blind_for_level(25, Chips(100)).map(Chips::doubled)
    );
}

#[test]
fn blinds_that_do_not_fit_are_none() {
    assert_eq!(small_blind_for_level(0, Chips(50)), None);
    // При SB = 50 к уровню 100 BB уже не влезает в u64.
    assert_eq!(small_blind_for_level(100, Chips(50)), None);
    assert_eq!(small_blind_for_level(3, Chips(u64::MAX / 4)), None);
    assert!(small_blind_for_level(MAX_SCHEDULE_LEVELS, Chips(50)).is_some());
}

#[test]
fn long_schedule_is_capped_and_startable() {
    let s = generate_schedule(Chips(50), 120, 20);

    assert_eq!(s.len(), MAX_SCHEDULE_LEVELS as usize);
    assert!(s.validate().is_ok());
    for lvl in &s.levels {
        assert_eq!(lvl.big_blind, Chips(lvl.small_blind.0 * 2));
    }
    for pair in s.levels.windows(2) {
        assert!(pair[1].small_blind > pair[0].small_blind);
    }

    let config = TournamentConfig {
        blind_structure: s,
        ..TournamentConfig::default()
    };
    let mut state = TournamentState::unconfigured();
    let now = chrono::Utc::now();
    assert!(state.start(config, now).is_ok());
}

#[test]
fn huge_start_blind_truncates_schedule() {
    let s = generate_schedule(Chips(u64::MAX / 4), 5, 10);

    // Уровень 3 (×3) уже не помещается вместе с BB.
    assert_eq!(s.len(), 2);
    assert!(s.validate().is_ok());
    assert_eq!(s.level(2).unwrap().big_blind, Chips((u64::MAX / 4) * 4));
}

#[test]
fn presets_match_their_parameters() {
    assert_eq!(BlindPreset::Small.structure().len(), 15);
    assert_eq!(BlindPreset::Medium.structure().len(), 20);
    assert_eq!(BlindPreset::Large.structure().len(), 25);

    let turbo = BlindPreset::Turbo.structure();
    assert_eq!(turbo.len(), 12);
    assert!(turbo.levels.iter().all(|l| l.duration_minutes == 10));
    assert_eq!(turbo.level(1).unwrap().small_blind, Chips(25));

    assert_eq!(BlindPreset::from_name("Turbo"), Some(BlindPreset::Turbo));
    assert_eq!(BlindPreset::from_name(" large "), Some(BlindPreset::Large));
    assert_eq!(BlindPreset::from_name("hyper"), None);
}

#[test]
fn default_config_uses_medium_preset() {
    let cfg = TournamentConfig::default();

    assert_eq!(cfg.name, "Torneio Pomer");
    assert_eq!(cfg.level_duration_minutes, 20);
    assert_eq!(cfg.break_interval, 3);
    assert_eq!(cfg.break_duration_minutes, 10);
    assert_eq!(cfg.primary_color, "#006FEE");
    assert_eq!(cfg.blind_structure, BlindPreset::Medium.structure());
    assert!(cfg.validate().is_ok());

    let turbo = TournamentConfig::from_preset(BlindPreset::Turbo);
    assert_eq!(turbo.level_duration_minutes, 10);
    assert_eq!(turbo.break_interval, 3);
}

#[test]
fn structure_validation_catches_bad_levels() {
    assert!(BlindStructure::empty().validate().is_err());

    // Пропущен уровень 2.
    let gap = BlindStructure::new(vec![
        BlindLevel::new(1, Chips(25), Chips(50), 10),
        BlindLevel::new(3, Chips(50), Chips(100), 10),
    ]);
    assert!(gap.validate().is_err());

    // BB не больше SB.
    let flat = BlindStructure::new(vec![BlindLevel::new(1, Chips(50), Chips(50), 10)]);
    assert!(flat.validate().is_err());

    // Нулевая длительность.
    let zero = BlindStructure::new(vec![BlindLevel::new(1, Chips(25), Chips(50), 0)]);
    assert!(zero.validate().is_err());
}

#[test]
fn config_validation_rejects_zero_cadence() {
    let mut cfg = TournamentConfig::default();
    cfg.break_interval = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = TournamentConfig::default();
    cfg.break_duration_minutes = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = TournamentConfig::default();
    cfg.blind_structure = BlindStructure::empty();
    assert!(cfg.validate().is_err());
}

#[test]
fn level_lookup_is_one_based() {
    let s = generate_schedule(Chips(25), 3, 10);

    assert!(s.level(0).is_none());
    assert_eq!(s.level(1).unwrap().level, 1);
    assert_eq!(s.level(3).unwrap().level, 3);
    assert!(s.level(4).is_none());
    assert_eq!(s.total_duration_minutes(), 30);
}

#[test]
fn chips_compact_format() {
    assert_eq!(Chips(50).format_compact(), "50");
    assert_eq!(Chips(999).format_compact(), "999");
    assert_eq!(Chips(1000).format_compact(), "1.0k");
    assert_eq!(Chips(1250).format_compact(), "1.3k");
    assert_eq!(Chips(51_200).format_compact(), "51.2k");
    assert_eq!(Chips(102_400).format_compact(), "102.4k");
}

#[test]
fn schedule_serializes_as_plain_array() {
    let s = generate_schedule(Chips(50), 1, 20);
    let json = serde_json::to_value(&s).unwrap();

    assert_eq!(
        json,
        serde_json::json!([
            { "level": 1, "smallBlind": 50, "bigBlind": 100, "duration": 20 }
        ])
    );
}
