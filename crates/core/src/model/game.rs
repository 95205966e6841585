use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameKindError {
    #[error("unknown game kind: {0}")]
    Unknown(String),
}

//
// ─── GAME KIND ─────────────────────────────────────────────────────────────────
//

/// Alphabet games whose scores are tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GameKind {
    Matching,
    Quiz,
    Typing,
    Flashcards,
}

impl GameKind {
    /// Persisted order.
    pub const ALL: [GameKind; 4] = [
        GameKind::Matching,
        GameKind::Quiz,
        GameKind::Typing,
        GameKind::Flashcards,
    ];

    /// Order used when listing scores on the dashboard.
    pub const DISPLAY_ORDER: [GameKind; 4] = [
        GameKind::Quiz,
        GameKind::Matching,
        GameKind::Typing,
        GameKind::Flashcards,
    ];

    /// Storage name of the game.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GameKind::Matching => "matching",
            GameKind::Quiz => "quiz",
            GameKind::Typing => "typing",
            GameKind::Flashcards => "flashcards",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            GameKind::Matching => "Matching",
            GameKind::Quiz => "Quiz",
            GameKind::Typing => "Typing",
            GameKind::Flashcards => "Flashcards",
        }
    }
}

impl FromStr for GameKind {
    type Err = GameKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameKindError::Unknown(s.to_owned()))
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── SCORES ────────────────────────────────────────────────────────────────────
//

/// Best score and attempt count for one game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameScore {
    pub best_score: u32,
    pub total_attempts: u32,
}

impl GameScore {
    #[must_use]
    pub fn new(best_score: u32, total_attempts: u32) -> Self {
        Self {
            best_score,
            total_attempts,
        }
    }

    /// Count one finished attempt and keep the higher of the two scores.
    pub fn record(&mut self, score: u32) {
        self.total_attempts = self.total_attempts.saturating_add(1);
        self.best_score = self.best_score.max(score);
    }

    #[must_use]
    pub fn is_played(&self) -> bool {
        self.total_attempts > 0
    }
}

/// Scores for every [`GameKind`]; all four entries always exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameScores {
    matching: GameScore,
    quiz: GameScore,
    typing: GameScore,
    flashcards: GameScore,
}

impl GameScores {
    #[must_use]
    pub fn get(&self, kind: GameKind) -> GameScore {
        match kind {
            GameKind::Matching => self.matching,
            GameKind::Quiz => self.quiz,
            GameKind::Typing => self.typing,
            GameKind::Flashcards => self.flashcards,
        }
    }

    pub fn get_mut(&mut self, kind: GameKind) -> &mut GameScore {
        match kind {
            GameKind::Matching => &mut self.matching,
            GameKind::Quiz => &mut self.quiz,
            GameKind::Typing => &mut self.typing,
            GameKind::Flashcards => &mut self.flashcards,
        }
    }

    /// Replace the score for one game.
    pub fn set(&mut self, kind: GameKind, score: GameScore) {
        *self.get_mut(kind) = score;
    }

    /// Iterate in the given order.
    pub fn iter_in(
        &self,
        order: [GameKind; 4],
    ) -> impl Iterator<Item = (GameKind, GameScore)> + '_ {
        order.into_iter().map(|kind| (kind, self.get(kind)))
    }
}
