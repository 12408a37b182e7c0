use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::score::NEUTRAL_SCORE;

pub const DEFAULT_HISTORY_CAPACITY: usize = 7;

/// One committed score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub score: u8,
    /// Unknown for history written before commit times were persisted
    pub committed_at: Option<DateTime<Utc>>,
}

/// Persisted state of one sentiment track ("stock", "crypto", ...)
///
/// The current score is the last entry, never an average of the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSeries {
    pub name: String,
    entries: VecDeque<ScoreEntry>,
    pub last_update: Option<DateTime<Utc>>,
    #[serde(skip, default = "default_capacity")]
    capacity: usize,
}

fn default_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

impl MarketSeries {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_capacity(name, DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            entries: VecDeque::with_capacity(capacity),
            last_update: None,
            capacity: capacity.max(1),
        }
    }

    /// Rebuild from persisted entries, keeping only the newest `capacity`
    pub fn from_entries(
        name: impl Into<String>,
        entries: impl IntoIterator<Item = ScoreEntry>,
        last_update: Option<DateTime<Utc>>,
        capacity: usize,
    ) -> Self {
        let mut series = Self::with_capacity(name, capacity);
        for entry in entries {
            series.push_entry(entry);
        }
        series.last_update = last_update;
        series
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> impl Iterator<Item = &ScoreEntry> {
        self.entries.iter()
    }

    pub fn recent_scores(&self) -> Vec<u8> {
        self.entries.iter().map(|e| e.score).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Last committed score, or neutral for a series never written
    pub fn current_score(&self) -> u8 {
        self.entries.back().map(|e| e.score).unwrap_or(NEUTRAL_SCORE)
    }

    /// Append a validated score, evicting the oldest past capacity
    pub fn push(&mut self, score: u8, at: DateTime<Utc>) {
        self.push_entry(ScoreEntry {
            score,
            committed_at: Some(at),
        });
        self.last_update = Some(at);
    }

    fn push_entry(&mut self, entry: ScoreEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Change between the two most recent commits, and when the score last moved
    pub fn delta(&self) -> SeriesDelta {
        let current = self.current_score();
        let previous = self
            .entries
            .len()
            .checked_sub(2)
            .and_then(|i| self.entries.get(i))
            .map(|e| e.score);
        let change = previous
            .map(|p| i16::from(current) - i16::from(p))
            .unwrap_or(0);

        SeriesDelta {
            current,
            previous,
            change,
            last_changed_at: self.last_changed_at(),
        }
    }

    /// Commit time of the newest entry that differs from its predecessor.
    /// Runs of identical commits are looked through; if the whole retained
    /// history is one run, its first entry is the change.
    fn last_changed_at(&self) -> Option<DateTime<Utc>> {
        let scores: Vec<&ScoreEntry> = self.entries.iter().collect();
        scores
            .windows(2)
            .rev()
            .find(|pair| pair[0].score != pair[1].score)
            .map(|pair| pair[1].committed_at)
            .unwrap_or_else(|| scores.first().and_then(|e| e.committed_at))
    }
}

/// "Up/down N points" style report for a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesDelta {
    pub current: u8,
    pub previous: Option<u8>,
    /// `current - previous`; zero when there is no previous commit
    pub change: i16,
    pub last_changed_at: Option<DateTime<Utc>>,
}
