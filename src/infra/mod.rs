//! Инфраструктурный слой вокруг часов турнира:
//! - key-value хранилище и репозиторий состояния;
//! - внешние соавторы (звук, удержание экрана);
//! - настройки запуска.

pub mod collaborators;
pub mod persistence;
pub mod settings;

pub use collaborators::*;
pub use persistence::*;
pub use settings::ClockSettings;
