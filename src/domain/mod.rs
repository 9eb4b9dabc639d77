//! Доменная модель часов турнира: блайнды, расписание, конфиг, состояние, история.

pub mod blinds;
pub mod chips;
pub mod tournament;

// Удобные реэкспорты, чтобы в других модулях писать crate::domain::BlindLevel и т.п.
pub use blinds::*;
pub use chips::*;
pub use tournament::*;
