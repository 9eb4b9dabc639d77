use core::fmt;
use core::ops::Mul;

use serde::{Deserialize, Serialize};

/// Количество фишек. Обёртка над u64, чтобы не путать блайнды с секундами и минутами.
///
/// В JSON сериализуется как обычное число (`"smallBlind": 50`).
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Chips(pub u64);

impl Chips {
    pub const ZERO: Chips = Chips(0);

    pub fn new(amount: u64) -> Self {
        Chips(amount)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Большой блайнд по конвенции = 2 × малый.
    pub fn doubled(self) -> Chips {
        Chips(self.0.saturating_mul(2))
    }

    /// Компактная запись для табло: `1.5k` для >= 1000, иначе просто число.
    ///
    /// Десятые округляются "половина вверх": 1250 → `1.3k`.
    pub fn format_compact(&self) -> String {
        if self.0 < 1000 {
            return self.0.to_string();
        }
        let tenths = (self.0.saturating_mul(10).saturating_add(500)) / 1000;
        format!("{}.{}k", tenths / 10, tenths % 10)
    }
}

impl Mul<u64> for Chips {
    type Output = Chips;

    fn mul(self, rhs: u64) -> Self::Output {
        Chips(self.0.saturating_mul(rhs))
    }
}

impl fmt::Display for Chips {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
