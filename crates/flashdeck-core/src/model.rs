//! Data model for flashdeck
//!
//! Themes and cards are stored under separate keys; a theme never embeds its cards.
//! Field names are camelCase on disk to stay compatible with existing app data.

use serde::{Deserialize, Serialize};

/// A named collection of cards
///
/// Older records may carry an embedded `cards` array. It is ignored on read and
/// never written back; the per-theme card collection is the source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub id: String,
    pub name: String,
}

impl Theme {
    pub fn new(id: String, name: String) -> Self {
        Self { id, name }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.id, self.name)
    }
}

/// A word/description pair belonging to one theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub word: String,
    pub description: String,
    pub theme_id: String,
}

impl Card {
    pub fn new(id: String, theme_id: String, word: String, description: String) -> Self {
        Self {
            id,
            word,
            description,
            theme_id,
        }
    }

    /// Check an answer against the word: trimmed, case-insensitive, exact
    pub fn matches(&self, answer: &str) -> bool {
        answer.trim().to_lowercase() == self.word.trim().to_lowercase()
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} - {}", self.id, self.word, self.description)
    }
}

/// Correctness counters for one card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardStat {
    pub correct: u32,
    pub total: u32,
}

impl CardStat {
    /// Count one answer
    pub fn record(&mut self, is_correct: bool) {
        self.total = self.total.saturating_add(1);
        if is_correct {
            self.correct = self.correct.saturating_add(1);
        }
    }

    /// Percentage of correct answers, rounded half-up, 0 when nothing was answered
    pub fn success_rate(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let total = u64::from(self.total);
        // Stored data may violate correct <= total; clamp so the rate stays in 0..=100
        let correct = u64::from(self.correct.min(self.total));
        ((200 * correct + total) / (2 * total)) as u8
    }
}

/// A theme together with the number of cards currently stored for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSummary {
    #[serde(flatten)]
    pub theme: Theme,
    pub card_count: usize,
}

/// A card with its practice record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardReport {
    #[serde(flatten)]
    pub card: Card,
    pub stat: CardStat,
    pub success_rate: u8,
}
