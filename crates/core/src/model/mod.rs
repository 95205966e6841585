mod game;
mod ids;
mod progress;
mod review;
mod streak;
mod word_stat;

pub use game::{GameKind, GameKindError, GameScore, GameScores};
pub use ids::{IdError, LETTER_COUNT, LessonId, LetterId, WORD_KEY_SEPARATOR, WordKey};
pub use progress::{AnswerTotals, ProgressRecord};
pub use review::{
    AccuracyBand, LessonAccuracy, REVIEW_SESSION_SIZE, ReviewItem, rank_for_review,
    rounded_percent,
};
pub use streak::{Streak, StreakInfo, StreakUpdate};
pub use word_stat::WordStat;
