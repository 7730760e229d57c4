//! Practice sessions
//!
//! A session holds a pool of cards in memory, shows one at a time and scores
//! typed answers. Selection is uniform random; the card just shown is never
//! picked again immediately while another distinct card is available.

use crate::{Card, StatStore};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::HashSet;

/// Result of checking one answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub is_correct: bool,
    /// Success rate of the card after this answer was recorded
    pub success_rate: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeState {
    /// Nothing to practice; the caller should leave practice
    Empty,
    AwaitingAnswer,
    Answered(AnswerOutcome),
}

/// Which cards a session draws from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PracticeScope {
    Theme(String),
    All,
}

pub struct PracticeSession<R = StdRng> {
    pool: Vec<Card>,
    distinct_ids: usize,
    current: Option<usize>,
    state: PracticeState,
    stats: StatStore,
    rng: R,
}

impl PracticeSession<StdRng> {
    /// Start a session with an OS-seeded generator
    pub fn start(pool: Vec<Card>, stats: StatStore) -> Self {
        Self::with_rng(pool, stats, StdRng::from_os_rng())
    }
}

impl<R: Rng> PracticeSession<R> {
    pub fn with_rng(pool: Vec<Card>, stats: StatStore, mut rng: R) -> Self {
        let distinct_ids = pool
            .iter()
            .map(|c| c.id.as_str())
            .collect::<HashSet<_>>()
            .len();

        let (current, state) = if pool.is_empty() {
            (None, PracticeState::Empty)
        } else {
            (
                Some(pick(&pool, distinct_ids, None, &mut rng)),
                PracticeState::AwaitingAnswer,
            )
        };

        tracing::debug!(cards = pool.len(), distinct_ids, "started practice session");

        Self {
            pool,
            distinct_ids,
            current,
            state,
            stats,
            rng,
        }
    }

    pub fn state(&self) -> PracticeState {
        self.state
    }

    pub fn is_empty(&self) -> bool {
        self.state == PracticeState::Empty
    }

    /// The card being shown
    pub fn current(&self) -> Option<&Card> {
        self.current.map(|i| &self.pool[i])
    }

    pub fn pool(&self) -> &[Card] {
        &self.pool
    }

    /// Move to another card
    ///
    /// Picks uniformly among cards whose id differs from the current one; with
    /// fewer than two distinct cards, picks from the whole pool.
    pub fn next(&mut self) {
        if self.pool.is_empty() {
            return;
        }
        let exclude = self.current.map(|i| self.pool[i].id.clone());
        let index = pick(&self.pool, self.distinct_ids, exclude.as_deref(), &mut self.rng);
        self.current = Some(index);
        self.state = PracticeState::AwaitingAnswer;
    }

    /// Show the expected word without scoring
    pub fn reveal(&self) -> Option<&str> {
        self.current().map(|c| c.word.as_str())
    }

    /// Check an answer against the current card and record it
    ///
    /// Returns `None` when there is no card to answer, or when the current card
    /// was already answered.
    pub fn submit_answer(&mut self, text: &str) -> Option<AnswerOutcome> {
        let index = match (self.state, self.current) {
            (PracticeState::AwaitingAnswer, Some(index)) => index,
            (state, _) => {
                tracing::debug!(?state, "answer ignored");
                return None;
            }
        };

        let card = &self.pool[index];
        let is_correct = card.matches(text);
        self.stats.record_answer(&card.id, is_correct);
        let outcome = AnswerOutcome {
            is_correct,
            success_rate: self.stats.success_rate(&card.id),
        };

        self.state = PracticeState::Answered(outcome);
        Some(outcome)
    }
}

fn pick<R: Rng>(pool: &[Card], distinct_ids: usize, exclude: Option<&str>, rng: &mut R) -> usize {
    let candidates: Vec<usize> = match exclude {
        Some(id) if distinct_ids >= 2 => (0..pool.len()).filter(|&i| pool[i].id != id).collect(),
        _ => (0..pool.len()).collect(),
    };
    candidates[rng.random_range(0..candidates.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn card(id: &str, word: &str) -> Card {
        Card::new(
            id.to_string(),
            "thm-1".to_string(),
            word.to_string(),
            format!("{} description", word),
        )
    }

    fn stats() -> StatStore {
        StatStore::new(Arc::new(MemoryStore::new()))
    }

    fn session(pool: Vec<Card>, seed: u64) -> PracticeSession<StdRng> {
        PracticeSession::with_rng(pool, stats(), StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_empty_pool() {
        let mut s = session(Vec::new(), 1);
        assert_eq!(s.state(), PracticeState::Empty);
        assert!(s.is_empty());
        assert!(s.current().is_none());

        s.next();
        assert!(s.current().is_none());
        assert_eq!(s.submit_answer("anything"), None);
        assert_eq!(s.reveal(), None);
        assert_eq!(s.state(), PracticeState::Empty);
    }

    #[test]
    fn test_start_selects_a_card() {
        let pool = vec![card("a", "Alpha"), card("b", "Beta")];
        let s = session(pool.clone(), 2);
        assert_eq!(s.state(), PracticeState::AwaitingAnswer);
        assert!(pool.contains(s.current().unwrap()));
    }

    #[test]
    fn test_no_immediate_repeats() {
        let mut s = session(vec![card("a", "A"), card("b", "B"), card("c", "C")], 3);
        let mut previous = s.current().unwrap().id.clone();
        for _ in 0..1000 {
            s.next();
            let id = s.current().unwrap().id.clone();
            assert_ne!(id, previous);
            previous = id;
        }
    }

    #[test]
    fn test_next_covers_other_cards_roughly_evenly() {
        let mut s = session(vec![card("a", "A"), card("b", "B"), card("c", "C")], 4);
        let mut counts: HashMap<String, usize> = HashMap::new();
        for _ in 0..3000 {
            s.next();
            *counts.entry(s.current().unwrap().id.clone()).or_default() += 1;
        }
        assert_eq!(counts.len(), 3);
        for count in counts.values() {
            assert!(*count > 700, "skewed selection: {:?}", counts);
        }
    }

    #[test]
    fn test_duplicate_ids_do_not_count_as_distinct() {
        let mut s = session(vec![card("a", "A"), card("a", "A")], 5);
        for _ in 0..20 {
            s.next();
            assert_eq!(s.current().unwrap().id, "a");
        }
    }

    #[test]
    fn test_duplicates_skipped_when_another_card_exists() {
        let mut s = session(vec![card("a", "A"), card("a", "A"), card("b", "B")], 6);
        let mut previous = s.current().unwrap().id.clone();
        for _ in 0..200 {
            s.next();
            let id = s.current().unwrap().id.clone();
            assert_ne!(id, previous);
            previous = id;
        }
    }

    #[test]
    fn test_single_card_repeats() {
        let mut s = session(vec![card("only", "Solo")], 7);
        s.next();
        assert_eq!(s.current().unwrap().id, "only");
        assert_eq!(s.state(), PracticeState::AwaitingAnswer);
    }

    #[test]
    fn test_submit_answer_scores_and_records() {
        let stats = stats();
        let mut s = PracticeSession::with_rng(
            vec![card("a", "Atom")],
            stats.clone(),
            StdRng::seed_from_u64(8),
        );

        let outcome = s.submit_answer("  ATOM ").unwrap();
        assert_eq!(
            outcome,
            AnswerOutcome {
                is_correct: true,
                success_rate: 100
            }
        );
        assert_eq!(s.state(), PracticeState::Answered(outcome));

        s.next();
        let outcome = s.submit_answer("molecule").unwrap();
        assert!(!outcome.is_correct);
        assert_eq!(outcome.success_rate, 50);
        assert_eq!(stats.get_card("a").total, 2);
    }

    #[test]
    fn test_second_submission_is_ignored() {
        let stats = stats();
        let mut s = PracticeSession::with_rng(
            vec![card("a", "Atom")],
            stats.clone(),
            StdRng::seed_from_u64(9),
        );
        assert!(s.submit_answer("atom").is_some());
        assert_eq!(s.submit_answer("atom"), None);
        assert_eq!(stats.get_card("a").total, 1);
    }

    #[test]
    fn test_reveal_does_not_score() {
        let stats = stats();
        let s = PracticeSession::with_rng(
            vec![card("a", "Atom")],
            stats.clone(),
            StdRng::seed_from_u64(10),
        );
        assert_eq!(s.reveal(), Some("Atom"));
        assert_eq!(s.state(), PracticeState::AwaitingAnswer);
        assert!(stats.get().is_empty());
    }
}
