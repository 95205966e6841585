use crate::model::ids::{LessonId, WordKey};
use crate::model::word_stat::WordStat;

/// Number of words a review session draws from the top of the review set.
pub const REVIEW_SESSION_SIZE: usize = 10;

/// `part / whole` as a percentage, rounded half up. Zero when `whole` is zero.
#[must_use]
pub fn rounded_percent(part: u64, whole: u64) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = part.min(whole);
    let pct = (part * 200 + whole) / (whole * 2);
    u8::try_from(pct).unwrap_or(100)
}

//
// ─── REVIEW SET ────────────────────────────────────────────────────────────────
//

/// One entry of the review set.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewItem {
    pub key: WordKey,
    pub stat: WordStat,
    pub error_rate: f64,
}

impl ReviewItem {
    #[must_use]
    pub fn new(key: WordKey, stat: WordStat) -> Self {
        Self {
            error_rate: stat.error_rate(),
            key,
            stat,
        }
    }

    #[must_use]
    pub fn lesson_id(&self) -> &LessonId {
        self.key.lesson_id()
    }

    #[must_use]
    pub fn word(&self) -> &str {
        self.key.word()
    }
}

/// Order review items by descending error rate.
///
/// Items with equal rates keep their incoming order; callers must not rely on it.
pub fn rank_for_review(items: &mut [ReviewItem]) {
    items.sort_by(|a, b| b.error_rate.total_cmp(&a.error_rate));
}

//
// ─── LESSON ACCURACY ───────────────────────────────────────────────────────────
//

/// Colour band for an accuracy percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccuracyBand {
    Strong,
    Fair,
    Weak,
}

impl AccuracyBand {
    #[must_use]
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            70..=u8::MAX => AccuracyBand::Strong,
            40..=69 => AccuracyBand::Fair,
            _ => AccuracyBand::Weak,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AccuracyBand::Strong => "strong",
            AccuracyBand::Fair => "fair",
            AccuracyBand::Weak => "weak",
        }
    }
}

/// Answer totals across all words of one lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonAccuracy {
    pub lesson_id: LessonId,
    pub correct: u64,
    pub wrong: u64,
}

impl LessonAccuracy {
    #[must_use]
    pub fn empty(lesson_id: LessonId) -> Self {
        Self {
            lesson_id,
            correct: 0,
            wrong: 0,
        }
    }

    pub fn add(&mut self, stat: &WordStat) {
        self.correct += u64::from(stat.correct);
        self.wrong += u64::from(stat.wrong);
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.correct + self.wrong
    }

    /// Rounded accuracy; `None` means the lesson has not been started.
    #[must_use]
    pub fn accuracy(&self) -> Option<u8> {
        match self.total() {
            0 => None,
            total => Some(rounded_percent(self.correct, total)),
        }
    }

    #[must_use]
    pub fn band(&self) -> Option<AccuracyBand> {
        self.accuracy().map(AccuracyBand::from_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn item(lesson: &str, word: &str, correct: u32, wrong: u32) -> ReviewItem {
        ReviewItem::new(
            WordKey::new(LessonId::new(lesson).unwrap(), word),
            WordStat::from_persisted(correct, wrong, fixed_now()),
        )
    }

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(rounded_percent(0, 0), 0);
        assert_eq!(rounded_percent(1, 2), 50);
        assert_eq!(rounded_percent(1, 3), 33);
        assert_eq!(rounded_percent(2, 3), 67);
        assert_eq!(rounded_percent(1, 200), 1);
        assert_eq!(rounded_percent(33, 33), 100);
    }

    #[test]
    fn ranking_puts_highest_error_rate_first() {
        let mut items = vec![
            item("a", "one", 3, 1),
            item("a", "two", 0, 2),
            item("b", "three", 1, 1),
        ];
        rank_for_review(&mut items);
        let words: Vec<_> = items.iter().map(ReviewItem::word).collect();
        assert_eq!(words, ["two", "three", "one"]);
    }

    #[test]
    fn bands_follow_thresholds() {
        assert_eq!(AccuracyBand::from_percent(100), AccuracyBand::Strong);
        assert_eq!(AccuracyBand::from_percent(70), AccuracyBand::Strong);
        assert_eq!(AccuracyBand::from_percent(69), AccuracyBand::Fair);
        assert_eq!(AccuracyBand::from_percent(40), AccuracyBand::Fair);
        assert_eq!(AccuracyBand::from_percent(39), AccuracyBand::Weak);
    }

    #[test]
    fn lesson_accuracy_aggregates_words() {
        let mut acc = LessonAccuracy::empty(LessonId::new("basics").unwrap());
        assert_eq!(acc.accuracy(), None);
        acc.add(&WordStat::from_persisted(3, 1, fixed_now()));
        acc.add(&WordStat::from_persisted(0, 1, fixed_now()));
        assert_eq!(acc.total(), 5);
        assert_eq!(acc.accuracy(), Some(60));
        assert_eq!(acc.band(), Some(AccuracyBand::Fair));
    }
}
