use chrono::{DateTime, Utc};

use crate::model::review::rounded_percent;

/// Correct/wrong tallies for one word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordStat {
    pub correct: u32,
    pub wrong: u32,
    pub last_seen: DateTime<Utc>,
}

impl WordStat {
    /// A stat with no answers yet, first seen at `at`.
    #[must_use]
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            correct: 0,
            wrong: 0,
            last_seen: at,
        }
    }

    #[must_use]
    pub fn from_persisted(correct: u32, wrong: u32, last_seen: DateTime<Utc>) -> Self {
        Self {
            correct,
            wrong,
            last_seen,
        }
    }

    pub fn record(&mut self, is_correct: bool, at: DateTime<Utc>) {
        if is_correct {
            self.correct = self.correct.saturating_add(1);
        } else {
            self.wrong = self.wrong.saturating_add(1);
        }
        self.last_seen = at;
    }

    #[must_use]
    pub fn attempts(&self) -> u64 {
        u64::from(self.correct) + u64::from(self.wrong)
    }

    /// `wrong / (correct + wrong)`, or `0.0` before any answer.
    #[must_use]
    pub fn error_rate(&self) -> f64 {
        match self.attempts() {
            0 => 0.0,
            total => f64::from(self.wrong) / total as f64,
        }
    }

    /// Rounded accuracy percentage; `None` before any answer.
    #[must_use]
    pub fn accuracy_percent(&self) -> Option<u8> {
        match self.attempts() {
            0 => None,
            total => Some(rounded_percent(u64::from(self.correct), total)),
        }
    }

    /// Any recorded mistake keeps a word in the review set.
    #[must_use]
    pub fn needs_review(&self) -> bool {
        self.wrong > 0
    }
}
