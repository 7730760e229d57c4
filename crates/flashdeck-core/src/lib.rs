//! flashdeck-core: Core library for the flashdeck flashcard app
//!
//! Themes, cards and per-card stats persisted to a string key-value store,
//! plus the in-memory practice session that draws cards and scores answers.

pub mod card_store;
pub mod config;
pub mod error;
pub mod id;
pub mod kv;
pub mod library;
pub mod model;
pub mod practice;
pub mod preferences;
pub mod stat_store;
pub mod theme_store;

pub use card_store::CardStore;
pub use config::Config;
pub use error::Error;
pub use id::generate_id;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use library::Library;
pub use model::{Card, CardReport, CardStat, Theme, ThemeSummary};
pub use practice::{AnswerOutcome, PracticeScope, PracticeSession, PracticeState};
pub use preferences::{Language, Preferences};
pub use stat_store::StatStore;
pub use theme_store::ThemeStore;

/// Result type for flashdeck operations
pub type Result<T> = std::result::Result<T, Error>;
