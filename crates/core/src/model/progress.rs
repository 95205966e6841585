use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::model::game::{GameKind, GameScore, GameScores};
use crate::model::ids::{LETTER_COUNT, LessonId, LetterId, WordKey};
use crate::model::review::{LessonAccuracy, ReviewItem, rank_for_review, rounded_percent};
use crate::model::streak::{Streak, StreakInfo, StreakUpdate};
use crate::model::word_stat::WordStat;

/// A learner's accumulated progress.
///
/// There is exactly one record per installation. Every mutation below changes
/// the in-memory value only; callers persist the whole record afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressRecord {
    learned_letters: Vec<LetterId>,
    games: GameScores,
    word_stats: BTreeMap<WordKey, WordStat>,
    streak: Streak,
    total_sessions: u32,
    last_activity: DateTime<Utc>,
}

/// Correct/wrong totals over every tracked word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnswerTotals {
    pub words_studied: usize,
    pub correct: u64,
    pub wrong: u64,
}

impl AnswerTotals {
    /// Rounded overall accuracy, `0` before any answer.
    #[must_use]
    pub fn accuracy(&self) -> u8 {
        rounded_percent(self.correct, self.correct + self.wrong)
    }
}

impl ProgressRecord {
    /// The first-run record.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            learned_letters: Vec::new(),
            games: GameScores::default(),
            word_stats: BTreeMap::new(),
            streak: Streak::default(),
            total_sessions: 0,
            last_activity: now,
        }
    }

    /// Rebuild a record from persisted parts.
    ///
    /// Duplicate letters are collapsed, keeping the first occurrence.
    #[must_use]
    pub fn from_persisted(
        learned_letters: Vec<LetterId>,
        games: GameScores,
        word_stats: BTreeMap<WordKey, WordStat>,
        streak: Streak,
        total_sessions: u32,
        last_activity: DateTime<Utc>,
    ) -> Self {
        let mut letters = Vec::with_capacity(learned_letters.len());
        for id in learned_letters {
            if !letters.contains(&id) {
                letters.push(id);
            }
        }
        Self {
            learned_letters: letters,
            games,
            word_stats,
            streak,
            total_sessions,
            last_activity,
        }
    }

    #[must_use]
    pub fn learned_letters(&self) -> &[LetterId] {
        &self.learned_letters
    }

    #[must_use]
    pub fn games(&self) -> &GameScores {
        &self.games
    }

    #[must_use]
    pub fn game(&self, kind: GameKind) -> GameScore {
        self.games.get(kind)
    }

    #[must_use]
    pub fn word_stats(&self) -> &BTreeMap<WordKey, WordStat> {
        &self.word_stats
    }

    #[must_use]
    pub fn word_stat(&self, key: &WordKey) -> Option<&WordStat> {
        self.word_stats.get(key)
    }

    #[must_use]
    pub fn streak(&self) -> Streak {
        self.streak
    }

    #[must_use]
    pub fn total_sessions(&self) -> u32 {
        self.total_sessions
    }

    #[must_use]
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    #[must_use]
    pub fn is_letter_learned(&self, id: LetterId) -> bool {
        self.learned_letters.contains(&id)
    }

    //
    // ─── MUTATIONS ─────────────────────────────────────────────────────────────
    //

    /// Add a letter to the learned set. Returns `false` if it was already there.
    pub fn mark_letter_learned(&mut self, id: LetterId) -> bool {
        if self.is_letter_learned(id) {
            return false;
        }
        self.learned_letters.push(id);
        true
    }

    pub fn record_game_score(&mut self, kind: GameKind, score: u32) -> GameScore {
        let entry = self.games.get_mut(kind);
        entry.record(score);
        *entry
    }

    pub fn record_word_result(
        &mut self,
        key: WordKey,
        is_correct: bool,
        at: DateTime<Utc>,
    ) -> WordStat {
        let stat = self.word_stats.entry(key).or_insert_with(|| WordStat::new(at));
        stat.record(is_correct, at);
        *stat
    }

    /// Count activity on `today`; a new day also counts a session.
    pub fn register_activity(&mut self, today: NaiveDate) -> StreakUpdate {
        let update = self.streak.register(today);
        if update.counted() {
            self.total_sessions = self.total_sessions.saturating_add(1);
        }
        update
    }

    /// Stamp the time of the write that is about to happen.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.last_activity = at;
    }

    //
    // ─── QUERIES ───────────────────────────────────────────────────────────────
    //

    /// Words with at least one wrong answer, highest error rate first.
    #[must_use]
    pub fn words_to_review(&self) -> Vec<ReviewItem> {
        let mut items: Vec<ReviewItem> = self
            .word_stats
            .iter()
            .filter(|(_, stat)| stat.needs_review())
            .map(|(key, stat)| ReviewItem::new(key.clone(), *stat))
            .collect();
        rank_for_review(&mut items);
        items
    }

    #[must_use]
    pub fn streak_info(&self) -> StreakInfo {
        StreakInfo {
            current: self.streak.current,
            last_date: self.streak.last_date,
            total_sessions: self.total_sessions,
        }
    }

    /// Share of the alphabet learned, as a rounded percentage.
    #[must_use]
    pub fn overall_percent(&self) -> u8 {
        rounded_percent(self.learned_letters.len() as u64, u64::from(LETTER_COUNT))
    }

    #[must_use]
    pub fn answer_totals(&self) -> AnswerTotals {
        self.word_stats.values().fold(
            AnswerTotals {
                words_studied: self.word_stats.len(),
                ..AnswerTotals::default()
            },
            |mut acc, stat| {
                acc.correct += u64::from(stat.correct);
                acc.wrong += u64::from(stat.wrong);
                acc
            },
        )
    }

    #[must_use]
    pub fn lesson_accuracy(&self, lesson_id: &LessonId) -> LessonAccuracy {
        let mut acc = LessonAccuracy::empty(lesson_id.clone());
        for stat in self
            .word_stats
            .iter()
            .filter(|(key, _)| key.lesson_id() == lesson_id)
            .map(|(_, stat)| stat)
        {
            acc.add(stat);
        }
        acc
    }

    /// Accuracy per lesson that has any tracked word, ordered by lesson id.
    #[must_use]
    pub fn lesson_accuracies(&self) -> Vec<LessonAccuracy> {
        let mut lessons: BTreeMap<&LessonId, LessonAccuracy> = BTreeMap::new();
        for (key, stat) in &self.word_stats {
            lessons
                .entry(key.lesson_id())
                .or_insert_with(|| LessonAccuracy::empty(key.lesson_id().clone()))
                .add(stat);
        }
        lessons.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn letter(n: u32) -> LetterId {
        LetterId::new(n).unwrap()
    }

    fn key(lesson: &str, word: &str) -> WordKey {
        WordKey::new(LessonId::new(lesson).unwrap(), word)
    }

    #[test]
    fn new_record_is_empty() {
        let record = ProgressRecord::new(fixed_now());
        assert!(record.learned_letters().is_empty());
        for kind in GameKind::ALL {
            assert_eq!(record.game(kind), GameScore::default());
        }
        assert!(record.word_stats().is_empty());
        assert_eq!(record.streak(), Streak::default());
        assert_eq!(record.total_sessions(), 0);
        assert_eq!(record.last_activity(), fixed_now());
    }

    #[test]
    fn marking_is_idempotent() {
        let mut record = ProgressRecord::new(fixed_now());
        assert!(record.mark_letter_learned(letter(5)));
        assert!(!record.mark_letter_learned(letter(5)));
        assert_eq!(record.learned_letters(), &[letter(5)]);
    }

    #[test]
    fn from_persisted_collapses_duplicates() {
        let record = ProgressRecord::from_persisted(
            vec![letter(3), letter(1), letter(3)],
            GameScores::default(),
            BTreeMap::new(),
            Streak::default(),
            0,
            fixed_now(),
        );
        assert_eq!(record.learned_letters(), &[letter(3), letter(1)]);
    }

    #[test]
    fn word_results_accumulate() {
        let mut record = ProgressRecord::new(fixed_now());
        let later = fixed_now() + Duration::seconds(30);
        record.record_word_result(key("basics", "привіт"), true, fixed_now());
        let stat = record.record_word_result(key("basics", "привіт"), false, later);
        assert_eq!((stat.correct, stat.wrong), (1, 1));
        assert_eq!(stat.last_seen, later);
    }

    #[test]
    fn review_excludes_words_without_mistakes() {
        let mut record = ProgressRecord::new(fixed_now());
        record.record_word_result(key("basics", "так"), true, fixed_now());
        record.record_word_result(key("basics", "ні"), false, fixed_now());
        record.record_word_result(key("food", "хліб"), true, fixed_now());
        record.record_word_result(key("food", "хліб"), false, fixed_now());

        let review = record.words_to_review();
        assert_eq!(review.len(), 2);
        assert_eq!(review[0].word(), "ні");
        assert_eq!(review[1].word(), "хліб");
        assert!((review[1].error_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn activity_counts_sessions_once_per_day() {
        let mut record = ProgressRecord::new(fixed_now());
        let today = fixed_now().date_naive();
        assert_eq!(record.register_activity(today), StreakUpdate::Started);
        assert_eq!(record.register_activity(today), StreakUpdate::AlreadyCounted);
        assert_eq!(record.total_sessions(), 1);
        assert_eq!(record.streak_info().current, 1);
    }

    #[test]
    fn overall_percent_rounds() {
        let mut record = ProgressRecord::new(fixed_now());
        assert_eq!(record.overall_percent(), 0);
        for n in 1..=11 {
            record.mark_letter_learned(letter(n));
        }
        assert_eq!(record.overall_percent(), 33);
        for n in 12..=33 {
            record.mark_letter_learned(letter(n));
        }
        assert_eq!(record.overall_percent(), 100);
    }

    #[test]
    fn lesson_accuracies_group_by_lesson() {
        let mut record = ProgressRecord::new(fixed_now());
        record.record_word_result(key("food", "хліб"), true, fixed_now());
        record.record_word_result(key("basics", "так"), true, fixed_now());
        record.record_word_result(key("basics", "ні"), false, fixed_now());

        let lessons = record.lesson_accuracies();
        let ids: Vec<_> = lessons.iter().map(|l| l.lesson_id.as_str()).collect();
        assert_eq!(ids, ["basics", "food"]);
        assert_eq!(lessons[0].accuracy(), Some(50));
        assert_eq!(lessons[1].accuracy(), Some(100));

        let unknown = record.lesson_accuracy(&LessonId::new("travel").unwrap());
        assert_eq!(unknown.accuracy(), None);

        let totals = record.answer_totals();
        assert_eq!(totals.words_studied, 3);
        assert_eq!((totals.correct, totals.wrong), (2, 1));
        assert_eq!(totals.accuracy(), 67);
    }
}
