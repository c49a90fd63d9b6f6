//! Best score readout
//!
//! Two integers persisted in the key-value store: the player's own best and
//! a tournament best published by the host page. Neither affects gameplay.

use crate::platform::KeyValueStore;

/// Stored best scores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BestScores {
    /// Player's best finished round
    pub best: u64,
    /// Tournament best (read-only from the game's side)
    pub tournament_best: u64,
}

impl BestScores {
    const BEST_KEY: &'static str = "watermelon-best";
    const TOURNAMENT_KEY: &'static str = "watermelon-tournament-best";

    /// Read both scores; missing or malformed values count as zero
    pub fn load(store: &impl KeyValueStore) -> Self {
        let scores = Self {
            best: parse_score(store.get(Self::BEST_KEY).as_deref()),
            tournament_best: parse_score(store.get(Self::TOURNAMENT_KEY).as_deref()),
        };
        log::info!(
            "Loaded best scores (best: {}, tournament: {})",
            scores.best,
            scores.tournament_best
        );
        scores
    }

    /// Persist the player's best
    pub fn save(&self, store: &mut impl KeyValueStore) {
        store.set(Self::BEST_KEY, &self.best.to_string());
    }

    /// Value shown in the HUD while a round is in progress
    pub fn display_best(&self, current: u64) -> u64 {
        self.best.max(current)
    }

    /// Record a finished round; returns true on a new best
    pub fn record(&mut self, score: u64) -> bool {
        if score > self.best {
            log::info!("New best score: {} (was {})", score, self.best);
            self.best = score;
            true
        } else {
            false
        }
    }
}

/// Parse a stored score with integer-prefix semantics
///
/// Leading whitespace is skipped and trailing junk ignored (`"42abc"` is 42).
/// Missing, empty, negative or non-numeric values are zero.
pub fn parse_score(raw: Option<&str>) -> u64 {
    let Some(raw) = raw else { return 0 };
    let digits: String = raw
        .trim_start()
        .trim_start_matches('+')
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}
