// src/domain/blinds.rs

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;

/// Множители малого блайнда для уровней 1..=20 (от стартового SB).
///
/// Ранняя прогрессия подобрана вручную; после 20-го уровня идёт геометрия ×1.5.
pub const SMALL_BLIND_MULTIPLIERS: [u64; 20] = [
    1, 2, 3, 4, 6, 8, 12, 16, 24, 32, 48, 64, 96, 128, 192, 256, 384, 512, 768, 1024,
];

/// Знаменатель геометрической прогрессии для уровней > 20.
const LATE_LEVEL_GROWTH: f64 = 1.5;

/// Один уровень блайндов.
/// Пример: level = 3, SB = 150, BB = 300, duration = 20 минут.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BlindLevel {
    /// Порядковый номер уровня (1, 2, 3, ...).
    pub level: u32,
    /// Малый блайнд.
    pub small_blind: Chips,
    /// Большой блайнд.
    pub big_blind: Chips,
    /// Длительность уровня в минутах.
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
}

impl BlindLevel {
    pub fn new(level: u32, small_blind: Chips, big_blind: Chips, duration_minutes: u32) -> Self {
        Self {
            level,
            small_blind,
            big_blind,
            duration_minutes,
        }
    }

    /// Длительность уровня в секундах.
    pub fn duration_secs(&self) -> u64 {
        u64::from(self.duration_minutes) * 60
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.level == 0 {
            return Err("BlindLevel: level = 0".into());
        }
        if self.small_blind.is_zero() {
            return Err(format!("BlindLevel {}: small_blind = 0", self.level));
        }
        if self.big_blind.0 <= self.small_blind.0 {
            return Err(format!(
                "BlindLevel {}: big_blind ({}) <= small_blind ({})",
                self.level, self.big_blind.0, self.small_blind.0
            ));
        }
        if self.duration_minutes == 0 {
            return Err(format!("BlindLevel {}: duration_minutes = 0", self.level));
        }
        Ok(())
    }
}

/// Структура уровней блайндов (расписание турнира).
///
/// В JSON это просто массив уровней, поэтому `transparent`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct BlindStructure {
    pub levels: Vec<BlindLevel>,
}

impl BlindStructure {
    pub fn new(levels: Vec<BlindLevel>) -> Self {
        Self { levels }
    }

    /// Пустое расписание: маркер "турнир не настроен".
    pub fn empty() -> Self {
        Self { levels: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Количество уровней как номер последнего уровня.
    pub fn last_level_number(&self) -> u32 {
        u32::try_from(self.levels.len()).unwrap_or(u32::MAX)
    }

    /// Уровень по номеру (1-based, номер = позиция в расписании).
    pub fn level(&self, number: u32) -> Option<&BlindLevel> {
        let idx = usize::try_from(number).ok()?.checked_sub(1)?;
        self.levels.get(idx)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.levels.is_empty() {
            return Err("BlindStructure: empty levels".into());
        }

        let mut expected_level = 1u32;
        for lvl in &self.levels {
            lvl.validate()?;
            if lvl.level != expected_level {
                return Err(format!(
                    "BlindStructure: expected level {}, got {}",
                    expected_level, lvl.level
                ));
            }
            expected_level += 1;
        }

        Ok(())
    }

    pub fn total_duration_minutes(&self) -> u32 {
        self.levels.iter().map(|lvl| lvl.duration_minutes).sum()
    }
}

/// Потолок длины сгенерированного расписания.
///
/// Геометрия ×1.5 после 20-го уровня быстро растёт: при SB = 50 уровень 60
/// даёт ~1.2e12, а к уровню 100 BB уже не помещается в u64.
pub const MAX_SCHEDULE_LEVELS: u32 = 60;

/// Верхняя граница SB, при которой BB = 2 × SB ещё влезает в u64.
const MAX_SMALL_BLIND: u64 = u64::MAX / 2;

/// Малый блайнд для уровня `level` при стартовом `start`.
///
/// None, если уровень 0 или SB (вместе с BB = 2 × SB) не помещается в u64.
pub fn small_blind_for_level(level: u32, start: Chips) -> Option<Chips> {
    let small_blind = match level {
        0 => return None,
        1..=20 => start
            .0
            .checked_mul(SMALL_BLIND_MULTIPLIERS[(level - 1) as usize])?,
        _ => {
            let exp = i32::try_from(level - 1).ok()?;
            let raw = ((start.0 as f64) * LATE_LEVEL_GROWTH.powi(exp)).round();
            if !raw.is_finite() || raw >= MAX_SMALL_BLIND as f64 {
                return None;
            }
            raw as u64
        }
    };

    (small_blind <= MAX_SMALL_BLIND).then_some(Chips(small_blind))
}

/// Сгенерировать расписание из `level_count` уровней по `level_duration_minutes` минут.
///
/// BB всегда = 2 × SB. Уровней не больше `MAX_SCHEDULE_LEVELS`; если при
/// огромном стартовом SB блайнды перестают помещаться в u64, расписание
/// обрывается на последнем целом уровне.
pub fn generate_schedule(
    start_small_blind: Chips,
    level_count: u32,
    level_duration_minutes: u32,
) -> BlindStructure {
    let levels = (1..=level_count.min(MAX_SCHEDULE_LEVELS))
        .map_while(|level| {
            let small_blind = small_blind_for_level(level, start_small_blind)?;
            Some(BlindLevel::new(
                level,
                small_blind,
                small_blind.doubled(),
                level_duration_minutes,
            ))
        })
        .collect();

    BlindStructure { levels }
}

/// Готовые структуры для формы конфигурации.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BlindPreset {
    /// Небольшой турнир (низкий бай-ин).
    Small,
    /// Средний турнир.
    Medium,
    /// Крупный турнир.
    Large,
    /// Быстрый турнир: короткие уровни.
    Turbo,
}

impl BlindPreset {
    pub const ALL: [BlindPreset; 4] = [
        BlindPreset::Small,
        BlindPreset::Medium,
        BlindPreset::Large,
        BlindPreset::Turbo,
    ];

    /// (стартовый SB, количество уровней, минут на уровень).
    pub const fn parameters(self) -> (u64, u32, u32) {
        match self {
            BlindPreset::Small => (25, 15, 20),
            BlindPreset::Medium => (50, 20, 20),
            BlindPreset::Large => (100, 25, 20),
            BlindPreset::Turbo => (25, 12, 10),
        }
    }

    pub fn structure(self) -> BlindStructure {
        let (start, levels, minutes) = self.parameters();
        generate_schedule(Chips(start), levels, minutes)
    }

    pub fn name(self) -> &'static str {
        match self {
            BlindPreset::Small => "small",
            BlindPreset::Medium => "medium",
            BlindPreset::Large => "large",
            BlindPreset::Turbo => "turbo",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(name.trim()))
    }
}
