use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use storage::document::{self, PROGRESS_KEY};
use storage::repository::BlobRepository;
use uky_core::model::{
    GameKind, GameScore, LessonAccuracy, LessonId, LetterId, ProgressRecord, ReviewItem,
    StreakInfo, StreakUpdate, WordKey, WordStat,
};

use crate::Clock;
use crate::dashboard::DashboardSummary;
use crate::error::ProgressServiceError;

/// The learner's progress store.
///
/// Every mutation is a read-modify-write of the single persisted progress
/// document. Mutations on one service (and its clones) are serialized, so a
/// write never loses a concurrent change made through the same service.
/// Separate processes writing the same document follow last-writer-wins.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    blobs: Arc<dyn BlobRepository>,
    write_lock: Arc<Mutex<()>>,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, blobs: Arc<dyn BlobRepository>) -> Self {
        Self {
            clock,
            blobs,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Override the clock (usually for deterministic testing).
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    //
    // ─── LOADING ───────────────────────────────────────────────────────────────
    //

    /// Load the current record.
    ///
    /// Never fails: a missing, unreadable, or corrupt document yields the
    /// first-run record instead.
    pub async fn load_record(&self) -> ProgressRecord {
        match self.read_for_update().await {
            Ok(record) => record,
            Err(err) => {
                warn!(%err, "progress storage unavailable, using defaults");
                ProgressRecord::new(self.clock.now())
            }
        }
    }

    /// Like [`Self::load_record`], but a storage read failure is returned so a
    /// mutation never overwrites a document it could not see.
    async fn read_for_update(&self) -> Result<ProgressRecord, ProgressServiceError> {
        let now = self.clock.now();
        let Some(raw) = self.blobs.get_blob(PROGRESS_KEY).await? else {
            debug!("no stored progress, starting fresh");
            return Ok(ProgressRecord::new(now));
        };
        Ok(document::decode(&raw, now).unwrap_or_else(|err| {
            warn!(%err, "discarding unreadable progress document");
            ProgressRecord::new(now)
        }))
    }

    async fn persist(&self, record: &mut ProgressRecord) -> Result<(), ProgressServiceError> {
        record.touch(self.clock.now());
        let raw = document::encode(record)?;
        self.blobs.put_blob(PROGRESS_KEY, &raw).await?;
        Ok(())
    }

    //
    // ─── MUTATIONS ─────────────────────────────────────────────────────────────
    //

    /// Mark a letter as learned.
    ///
    /// Returns `false` without writing when the letter was already learned.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` if storage cannot be read or written.
    pub async fn mark_letter_learned(
        &self,
        letter: LetterId,
    ) -> Result<bool, ProgressServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut record = self.read_for_update().await?;
        if !record.mark_letter_learned(letter) {
            debug!(%letter, "letter already learned");
            return Ok(false);
        }
        self.persist(&mut record).await?;
        debug!(%letter, learned = record.learned_letters().len(), "letter learned");
        Ok(true)
    }

    /// Count a finished game and keep its best score.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` if storage cannot be read or written.
    pub async fn update_game_score(
        &self,
        game: GameKind,
        score: u32,
    ) -> Result<GameScore, ProgressServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut record = self.read_for_update().await?;
        let updated = record.record_game_score(game, score);
        self.persist(&mut record).await?;
        debug!(
            %game,
            score,
            best = updated.best_score,
            attempts = updated.total_attempts,
            "game score recorded"
        );
        Ok(updated)
    }

    /// Record one answer for a vocabulary word.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` if storage cannot be read or written.
    pub async fn record_word_result(
        &self,
        lesson_id: &LessonId,
        word: &str,
        is_correct: bool,
    ) -> Result<WordStat, ProgressServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut record = self.read_for_update().await?;
        let key = WordKey::new(lesson_id.clone(), word);
        let stat = record.record_word_result(key, is_correct, self.clock.now());
        self.persist(&mut record).await?;
        debug!(lesson = %lesson_id, word, is_correct, "word result recorded");
        Ok(stat)
    }

    /// Register today's activity for the daily streak.
    ///
    /// Calling more than once on the same day changes nothing and does not write.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` if storage cannot be read or written.
    pub async fn update_streak(&self) -> Result<StreakUpdate, ProgressServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut record = self.read_for_update().await?;
        let today = self.clock.today();
        let update = record.register_activity(today);
        if !update.counted() {
            return Ok(update);
        }
        self.persist(&mut record).await?;
        info!(
            ?update,
            %today,
            current = record.streak().current,
            sessions = record.total_sessions(),
            "streak updated"
        );
        Ok(update)
    }

    //
    // ─── QUERIES ───────────────────────────────────────────────────────────────
    //

    /// Words with at least one mistake, highest error rate first.
    pub async fn words_to_review(&self) -> Vec<ReviewItem> {
        self.load_record().await.words_to_review()
    }

    /// The first `limit` words of the review set.
    pub async fn review_batch(&self, limit: usize) -> Vec<ReviewItem> {
        let mut items = self.words_to_review().await;
        items.truncate(limit);
        items
    }

    pub async fn streak_info(&self) -> StreakInfo {
        self.load_record().await.streak_info()
    }

    /// Share of the alphabet learned, as a rounded percentage.
    pub async fn overall_percent(&self) -> u8 {
        self.load_record().await.overall_percent()
    }

    pub async fn lesson_accuracy(&self, lesson_id: &LessonId) -> LessonAccuracy {
        self.load_record().await.lesson_accuracy(lesson_id)
    }

    pub async fn dashboard(&self) -> DashboardSummary {
        let record = self.load_record().await;
        DashboardSummary::from_record(&record, self.clock.today())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use storage::repository::{InMemoryRepository, StorageError};
    use uky_core::time::{fixed_clock, fixed_clock_on_day, fixed_now};

    fn service(repo: &InMemoryRepository) -> ProgressService {
        ProgressService::new(fixed_clock(), Arc::new(repo.clone()))
    }

    fn letter(n: u32) -> LetterId {
        LetterId::new(n).unwrap()
    }

    /// Reads fail; writes are counted.
    #[derive(Default)]
    struct BrokenRepository {
        writes: std::sync::atomic::AtomicUsize,
    }

    #[async_trait]
    impl BlobRepository for BrokenRepository {
        async fn get_blob(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Connection("disk unavailable".into()))
        }

        async fn put_blob(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            self.writes.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn load_on_empty_storage_returns_defaults() {
        let repo = InMemoryRepository::new();
        let record = service(&repo).load_record().await;
        assert_eq!(record, ProgressRecord::new(fixed_now()));
        assert!(repo.get_blob(PROGRESS_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_document_loads_as_defaults() {
        let repo = InMemoryRepository::new();
        repo.insert_raw(PROGRESS_KEY, "{not json").unwrap();
        let record = service(&repo).load_record().await;
        assert_eq!(record, ProgressRecord::new(fixed_now()));
    }

    #[tokio::test]
    async fn corrupt_document_is_replaced_on_next_write() {
        let repo = InMemoryRepository::new();
        repo.insert_raw(PROGRESS_KEY, "[1, 2").unwrap();
        let svc = service(&repo);
        svc.mark_letter_learned(letter(2)).await.unwrap();
        assert_eq!(svc.load_record().await.learned_letters(), &[letter(2)]);
    }

    #[tokio::test]
    async fn read_failure_loads_defaults_but_blocks_writes() {
        let repo = Arc::new(BrokenRepository::default());
        let svc = ProgressService::new(fixed_clock(), repo.clone());

        assert_eq!(svc.load_record().await, ProgressRecord::new(fixed_now()));
        let err = svc.update_game_score(GameKind::Quiz, 3).await.unwrap_err();
        assert!(matches!(err, ProgressServiceError::Storage(_)));
        assert_eq!(repo.writes.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn relearning_a_letter_does_not_write() {
        let repo = InMemoryRepository::new();
        let svc = service(&repo);
        assert!(svc.mark_letter_learned(letter(9)).await.unwrap());
        let first = repo.get_blob(PROGRESS_KEY).await.unwrap();

        let later = svc.clone().with_clock(fixed_clock_on_day(1));
        assert!(!later.mark_letter_learned(letter(9)).await.unwrap());
        let second = repo.get_blob(PROGRESS_KEY).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn writes_stamp_last_activity() {
        let repo = InMemoryRepository::new();
        let svc = service(&repo).with_clock(fixed_clock_on_day(2));
        svc.update_game_score(GameKind::Typing, 1).await.unwrap();
        let record = svc.load_record().await;
        assert_eq!(record.last_activity(), fixed_clock_on_day(2).now());
    }

    #[tokio::test]
    async fn same_day_streak_update_does_not_write() {
        let repo = InMemoryRepository::new();
        let svc = service(&repo);
        assert_eq!(svc.update_streak().await.unwrap(), StreakUpdate::Started);
        let first = repo.get_blob(PROGRESS_KEY).await.unwrap();
        assert_eq!(
            svc.update_streak().await.unwrap(),
            StreakUpdate::AlreadyCounted
        );
        assert_eq!(repo.get_blob(PROGRESS_KEY).await.unwrap(), first);
    }

    #[tokio::test]
    async fn concurrent_mutations_are_not_lost() {
        let repo = InMemoryRepository::new();
        let svc = service(&repo);
        let lesson = LessonId::new("basics").unwrap();

        let mut handles = Vec::new();
        for i in 0..20 {
            let svc = svc.clone();
            let lesson = lesson.clone();
            handles.push(tokio::spawn(async move {
                svc.record_word_result(&lesson, "так", i % 2 == 0).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let record = svc.load_record().await;
        let stat = record
            .word_stat(&WordKey::new(lesson, "так"))
            .copied()
            .unwrap();
        assert_eq!((stat.correct, stat.wrong), (10, 10));
    }

    #[tokio::test]
    async fn review_batch_truncates() {
        let repo = InMemoryRepository::new();
        let svc = service(&repo);
        let lesson = LessonId::new("numbers").unwrap();
        for word in ["один", "два", "три"] {
            svc.record_word_result(&lesson, word, false).await.unwrap();
        }
        assert_eq!(svc.words_to_review().await.len(), 3);
        assert_eq!(svc.review_batch(2).await.len(), 2);
    }
}
