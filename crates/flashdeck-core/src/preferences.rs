//! User preferences stored next to the flashcard data

use crate::kv::{KeyValueStore, LANGUAGE_KEY};
use crate::Error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Display language, stored as a two-letter code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Es,
    En,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Es => "es",
            Language::En => "en",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "es" => Ok(Language::Es),
            "en" => Ok(Language::En),
            _ => Err(Error::InvalidLanguage(s.to_string())),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Clone)]
pub struct Preferences {
    backend: Arc<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Stored language, falling back to Spanish
    pub fn language(&self) -> Language {
        match self.backend.get(LANGUAGE_KEY) {
            Ok(Some(code)) => code.parse().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "ignoring stored language");
                Language::default()
            }),
            Ok(None) => Language::default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load language");
                Language::default()
            }
        }
    }

    /// Store the language as its raw code
    pub fn set_language(&self, language: Language) -> bool {
        match self.backend.set(LANGUAGE_KEY, language.code()) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(%language, error = %e, "failed to save language");
                false
            }
        }
    }
}
