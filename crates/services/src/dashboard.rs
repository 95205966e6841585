use chrono::{DateTime, NaiveDate, Utc};

use uky_core::model::{
    AnswerTotals, GameKind, GameScore, LETTER_COUNT, LessonAccuracy, ProgressRecord, StreakInfo,
};

/// Everything the progress dashboard shows, computed from one record.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub letters_learned: usize,
    pub letters_total: u32,
    pub overall_percent: u8,
    pub streak: StreakInfo,
    /// Whether today's activity has already been counted.
    pub active_today: bool,
    pub totals: AnswerTotals,
    pub overall_accuracy: u8,
    pub review_count: usize,
    pub lessons: Vec<LessonAccuracy>,
    pub games: Vec<(GameKind, GameScore)>,
    pub last_activity: DateTime<Utc>,
}

impl DashboardSummary {
    #[must_use]
    pub fn from_record(record: &ProgressRecord, today: NaiveDate) -> Self {
        let totals = record.answer_totals();
        Self {
            letters_learned: record.learned_letters().len(),
            letters_total: LETTER_COUNT,
            overall_percent: record.overall_percent(),
            streak: record.streak_info(),
            active_today: record.streak().is_active_on(today),
            overall_accuracy: totals.accuracy(),
            totals,
            review_count: record.words_to_review().len(),
            lessons: record.lesson_accuracies(),
            games: record.games().iter_in(GameKind::DISPLAY_ORDER).collect(),
            last_activity: record.last_activity(),
        }
    }

    /// Whether any alphabet game has been played.
    #[must_use]
    pub fn has_game_history(&self) -> bool {
        self.games.iter().any(|(_, score)| score.is_played())
    }
}
