//! Per-card answer statistics
//!
//! Stats are keyed by card id and outlive the card: deleting a card or theme
//! leaves its entry in place.

use crate::kv::{self, CARD_STATS_KEY, KeyValueStore};
use crate::CardStat;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct StatStore {
    backend: Arc<dyn KeyValueStore>,
}

impl StatStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Full snapshot; empty on missing or unreadable data
    pub fn get(&self) -> HashMap<String, CardStat> {
        match kv::read_json(self.backend.as_ref(), CARD_STATS_KEY) {
            Ok(stats) => stats.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load card stats");
                HashMap::new()
            }
        }
    }

    /// Stats of one card, zeroed if none were recorded
    pub fn get_card(&self, card_id: &str) -> CardStat {
        self.get().get(card_id).copied().unwrap_or_default()
    }

    /// Count one answer for a card and persist the whole mapping
    pub fn record_answer(&self, card_id: &str, is_correct: bool) {
        let mut stats: HashMap<String, CardStat> =
            match kv::read_for_update(self.backend.as_ref(), CARD_STATS_KEY) {
                Ok(stats) => stats,
                Err(e) => {
                    tracing::error!(card_id, error = %e, "failed to load card stats for update");
                    return;
                }
            };
        stats.entry(card_id.to_string()).or_default().record(is_correct);

        if let Err(e) = kv::write_json(self.backend.as_ref(), CARD_STATS_KEY, &stats) {
            tracing::error!(card_id, error = %e, "failed to save card stats");
            return;
        }
        tracing::debug!(card_id, is_correct, "recorded answer");
    }

    /// Percentage of correct answers for a card, 0 when never answered
    pub fn success_rate(&self, card_id: &str) -> u8 {
        self.get_card(card_id).success_rate()
    }
}
