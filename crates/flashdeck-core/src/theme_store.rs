//! Theme persistence
//!
//! The theme list lives under one key. Deleting a theme also drops its card
//! collection; stats are kept.

use crate::id::{THEME_PREFIX, generate_id};
use crate::kv::{self, KeyValueStore, THEMES_KEY};
use crate::{CardStore, Error, Result, Theme, ThemeSummary};
use std::sync::Arc;

#[derive(Clone)]
pub struct ThemeStore {
    backend: Arc<dyn KeyValueStore>,
    cards: CardStore,
}

impl ThemeStore {
    pub fn new(backend: Arc<dyn KeyValueStore>, cards: CardStore) -> Self {
        Self { backend, cards }
    }

    /// All themes in stored order; empty on missing or unreadable data
    pub fn list(&self) -> Vec<Theme> {
        match kv::read_json(self.backend.as_ref(), THEMES_KEY) {
            Ok(themes) => themes.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load themes");
                Vec::new()
            }
        }
    }

    /// Look up a theme by ID
    pub fn get(&self, theme_id: &str) -> Option<Theme> {
        self.list().into_iter().find(|t| t.id == theme_id)
    }

    /// Themes with their current card counts, recomputed on every call
    pub fn summaries(&self) -> Vec<ThemeSummary> {
        self.list()
            .into_iter()
            .map(|theme| {
                let card_count = self.cards.list(&theme.id).len();
                ThemeSummary { theme, card_count }
            })
            .collect()
    }

    /// Create a theme; the trimmed name must not be empty
    pub fn add(&self, name: &str) -> Result<Theme> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("theme name must not be empty".to_string()));
        }

        let theme = Theme::new(generate_id(THEME_PREFIX), name.to_string());

        let mut themes: Vec<Theme> = kv::read_for_update(self.backend.as_ref(), THEMES_KEY)?;
        themes.push(theme.clone());
        self.save(&themes)?;

        tracing::debug!(theme_id = %theme.id, name, "added theme");
        Ok(theme)
    }

    /// Remove a theme and its card collection
    ///
    /// Returns false only when storage fails; a missing theme is not an error.
    pub fn delete(&self, theme_id: &str) -> bool {
        let result = self.update_themes(theme_id, |themes| {
            themes.retain(|t| t.id != theme_id);
        });
        if let Err(e) = result {
            tracing::error!(theme_id, error = %e, "failed to delete theme");
            return false;
        }

        if let Err(e) = self.cards.remove_collection(theme_id) {
            tracing::error!(theme_id, error = %e, "failed to delete theme cards");
            return false;
        }

        tracing::debug!(theme_id, "deleted theme");
        true
    }

    /// Rename a theme in place
    ///
    /// An empty trimmed name is rejected with false. A missing theme reports
    /// success without writing anything.
    pub fn update(&self, theme_id: &str, new_name: &str) -> bool {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            tracing::warn!(theme_id, "refusing to rename theme to an empty name");
            return false;
        }

        let result = self.update_themes(theme_id, |themes| {
            for theme in themes.iter_mut().filter(|t| t.id == theme_id) {
                theme.name = new_name.to_string();
            }
        });
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(theme_id, error = %e, "failed to rename theme");
                false
            }
        }
    }

    /// Read-modify-write the theme list; skips the write when `theme_id` is absent
    fn update_themes(&self, theme_id: &str, apply: impl FnOnce(&mut Vec<Theme>)) -> Result<()> {
        let mut themes: Vec<Theme> = kv::read_for_update(self.backend.as_ref(), THEMES_KEY)?;
        if !themes.iter().any(|t| t.id == theme_id) {
            tracing::debug!(theme_id, "theme not found");
            return Ok(());
        }
        apply(&mut themes);
        self.save(&themes)
    }

    fn save(&self, themes: &[Theme]) -> Result<()> {
        kv::write_json(self.backend.as_ref(), THEMES_KEY, themes)
    }
}
