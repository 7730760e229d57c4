//! Card persistence, one collection per theme

use crate::id::{CARD_PREFIX, generate_id};
use crate::kv::{self, CARDS_KEY_PREFIX, KeyValueStore, THEMES_KEY, cards_key};
use crate::{Card, CardReport, Error, Result, StatStore, Theme};
use std::sync::Arc;

/// Cards scoped to themes, stored under `cards_<themeId>`
#[derive(Clone)]
pub struct CardStore {
    backend: Arc<dyn KeyValueStore>,
}

impl CardStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// All cards of a theme; empty on missing or unreadable data
    pub fn list(&self, theme_id: &str) -> Vec<Card> {
        let key = cards_key(theme_id);
        match kv::read_json::<Vec<Card>>(self.backend.as_ref(), &key) {
            Ok(cards) => cards.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(theme_id, error = %e, "failed to load cards");
                Vec::new()
            }
        }
    }

    /// Cards of every theme, concatenated in key order
    ///
    /// An unreadable collection or a malformed card inside one is skipped; the
    /// rest of the scan continues.
    pub fn list_all(&self) -> Vec<Card> {
        let mut keys = match self.backend.keys() {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!(error = %e, "failed to list storage keys");
                return Vec::new();
            }
        };
        keys.retain(|k| k.starts_with(CARDS_KEY_PREFIX));
        keys.sort();

        let mut all = Vec::new();
        for key in keys {
            let entries =
                match kv::read_json::<Vec<serde_json::Value>>(self.backend.as_ref(), &key) {
                    Ok(entries) => entries.unwrap_or_default(),
                    Err(e) => {
                        tracing::warn!(key = %key, error = %e, "skipping unreadable card collection");
                        continue;
                    }
                };
            for entry in entries {
                match serde_json::from_value::<Card>(entry) {
                    Ok(card) => all.push(card),
                    Err(e) => tracing::warn!(key = %key, error = %e, "skipping malformed card"),
                }
            }
        }
        all
    }

    /// Create a card in a theme
    ///
    /// Word and description are trimmed and must not be empty. The theme must exist.
    pub fn add(&self, theme_id: &str, word: &str, description: &str) -> Result<Card> {
        let word = word.trim();
        let description = description.trim();
        if word.is_empty() {
            return Err(Error::Validation("card word must not be empty".to_string()));
        }
        if description.is_empty() {
            return Err(Error::Validation(
                "card description must not be empty".to_string(),
            ));
        }
        if !self.theme_exists(theme_id)? {
            return Err(Error::NotFound(format!("theme {}", theme_id)));
        }

        let card = Card::new(
            generate_id(CARD_PREFIX),
            theme_id.to_string(),
            word.to_string(),
            description.to_string(),
        );

        let mut cards: Vec<Card> =
            kv::read_for_update(self.backend.as_ref(), &cards_key(theme_id))?;
        cards.push(card.clone());
        self.save(theme_id, &cards)?;

        tracing::debug!(theme_id, card_id = %card.id, "added card");
        Ok(card)
    }

    /// Remove a card from a theme
    ///
    /// Returns false only when storage fails; a missing card is not an error.
    /// Stats recorded for the card are left in place.
    pub fn delete(&self, theme_id: &str, card_id: &str) -> bool {
        let mut cards: Vec<Card> =
            match kv::read_for_update(self.backend.as_ref(), &cards_key(theme_id)) {
                Ok(cards) => cards,
                Err(e) => {
                    tracing::error!(theme_id, card_id, error = %e, "failed to load cards for delete");
                    return false;
                }
            };
        let before = cards.len();
        cards.retain(|c| c.id != card_id);
        if cards.len() == before {
            tracing::debug!(theme_id, card_id, "card to delete not found");
            return true;
        }

        match self.save(theme_id, &cards) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(theme_id, card_id, error = %e, "failed to delete card");
                false
            }
        }
    }

    /// Cards of a theme with their practice record
    pub fn list_with_rates(&self, theme_id: &str, stats: &StatStore) -> Vec<CardReport> {
        let snapshot = stats.get();
        self.list(theme_id)
            .into_iter()
            .map(|card| {
                let stat = snapshot.get(&card.id).copied().unwrap_or_default();
                CardReport {
                    success_rate: stat.success_rate(),
                    stat,
                    card,
                }
            })
            .collect()
    }

    /// Drop the whole card collection of a theme
    pub(crate) fn remove_collection(&self, theme_id: &str) -> Result<()> {
        let key = cards_key(theme_id);
        self.backend
            .remove(&key)
            .map_err(|e| Error::write(&key, e))
    }

    fn save(&self, theme_id: &str, cards: &[Card]) -> Result<()> {
        kv::write_json(self.backend.as_ref(), &cards_key(theme_id), cards)
    }

    /// Malformed theme data counts as no themes; a backend failure is returned
    fn theme_exists(&self, theme_id: &str) -> Result<bool> {
        let themes: Vec<Theme> = kv::read_for_update(self.backend.as_ref(), THEMES_KEY)?;
        Ok(themes.iter().any(|t| t.id == theme_id))
    }
}
