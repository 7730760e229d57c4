//! All stores over one shared backend

use crate::kv::{FileStore, KeyValueStore, MemoryStore};
use crate::{CardStore, PracticeScope, PracticeSession, Preferences, Result, StatStore, ThemeStore};
use std::path::Path;
use std::sync::Arc;

/// Themes, cards, stats and preferences sharing one key-value backend
#[derive(Clone)]
pub struct Library {
    pub themes: ThemeStore,
    pub cards: CardStore,
    pub stats: StatStore,
    pub preferences: Preferences,
}

impl Library {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        let cards = CardStore::new(backend.clone());
        Self {
            themes: ThemeStore::new(backend.clone(), cards.clone()),
            cards,
            stats: StatStore::new(backend.clone()),
            preferences: Preferences::new(backend),
        }
    }

    /// Library backed by a storage file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Arc::new(FileStore::open(path)?)))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Start practicing one theme or every card
    pub fn start_practice(&self, scope: &PracticeScope) -> PracticeSession {
        PracticeSession::start(self.practice_pool(scope), self.stats.clone())
    }

    /// Cards a session over `scope` would draw from
    pub fn practice_pool(&self, scope: &PracticeScope) -> Vec<crate::Card> {
        match scope {
            PracticeScope::Theme(theme_id) => self.cards.list(theme_id),
            PracticeScope::All => self.cards.list_all(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnswerOutcome, PracticeState};

    #[test]
    fn test_science_atom_end_to_end() {
        let library = Library::in_memory();
        let theme = library.themes.add("Science").unwrap();
        library
            .cards
            .add(&theme.id, "Atom", "Basic unit of matter")
            .unwrap();

        let mut session = library.start_practice(&PracticeScope::Theme(theme.id.clone()));
        assert_eq!(session.state(), PracticeState::AwaitingAnswer);
        assert_eq!(session.current().unwrap().description, "Basic unit of matter");

        let outcome = session.submit_answer("atom").unwrap();
        assert_eq!(
            outcome,
            AnswerOutcome {
                is_correct: true,
                success_rate: 100
            }
        );
    }

    #[test]
    fn test_empty_pool_end_to_end() {
        let library = Library::in_memory();
        let theme = library.themes.add("Empty").unwrap();

        let mut session = library.start_practice(&PracticeScope::Theme(theme.id));
        assert_eq!(session.state(), PracticeState::Empty);
        assert!(session.current().is_none());
        session.next();
        assert!(session.current().is_none());
        assert!(session.submit_answer("x").is_none());

        let all = library.start_practice(&PracticeScope::All);
        assert!(all.is_empty());
    }

    #[test]
    fn test_practice_all_spans_themes() {
        let library = Library::in_memory();
        let science = library.themes.add("Science").unwrap();
        let history = library.themes.add("History").unwrap();
        library.cards.add(&science.id, "Atom", "Matter").unwrap();
        library.cards.add(&history.id, "Rome", "City").unwrap();

        let pool = library.practice_pool(&PracticeScope::All);
        assert_eq!(pool.len(), 2);

        let mut session = library.start_practice(&PracticeScope::All);
        let first = session.current().unwrap().id.clone();
        session.next();
        assert_ne!(session.current().unwrap().id, first);
    }

    #[test]
    fn test_deleted_theme_leaves_nothing_to_practice() {
        let library = Library::in_memory();
        let theme = library.themes.add("Science").unwrap();
        library.cards.add(&theme.id, "Atom", "Matter").unwrap();

        assert!(library.themes.delete(&theme.id));
        assert!(library.cards.list(&theme.id).is_empty());
        assert!(library.start_practice(&PracticeScope::All).is_empty());
    }

    #[test]
    fn test_file_backed_library_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let card_id = {
            let library = Library::open(&path).unwrap();
            let theme = library.themes.add("Science").unwrap();
            let card = library.cards.add(&theme.id, "Atom", "Matter").unwrap();
            let mut session = library.start_practice(&PracticeScope::Theme(theme.id));
            session.submit_answer("wrong");
            card.id
        };

        let library = Library::open(&path).unwrap();
        assert_eq!(library.themes.list().len(), 1);
        assert_eq!(library.cards.list_all().len(), 1);
        assert_eq!(library.stats.get_card(&card_id).total, 1);
        assert_eq!(library.stats.success_rate(&card_id), 0);
    }
}
