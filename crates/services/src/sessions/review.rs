use tracing::debug;

use uky_core::model::{ReviewItem, WordStat};

use super::progress::SessionProgress;
use crate::error::ReviewSessionError;
use crate::progress_service::ProgressService;

/// A pass over the top of the review set.
///
/// The batch is fixed when the session starts; answers recorded during the
/// session change word stats but not the order of the remaining words.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    items: Vec<ReviewItem>,
    position: usize,
    correct: usize,
}

/// Result of answering the current word.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewAnswer {
    pub item: ReviewItem,
    /// Stat after this answer was recorded.
    pub stat: WordStat,
    pub is_correct: bool,
    pub is_complete: bool,
}

impl ReviewSession {
    /// Build a session over `items`.
    ///
    /// # Errors
    ///
    /// Returns `ReviewSessionError::Empty` when there is nothing to review.
    pub fn new(items: Vec<ReviewItem>) -> Result<Self, ReviewSessionError> {
        if items.is_empty() {
            return Err(ReviewSessionError::Empty);
        }
        Ok(Self {
            items,
            position: 0,
            correct: 0,
        })
    }

    #[must_use]
    pub fn current(&self) -> Option<&ReviewItem> {
        self.items.get(self.position)
    }

    #[must_use]
    pub fn items(&self) -> &[ReviewItem] {
        &self.items
    }

    /// Number of correct answers so far.
    #[must_use]
    pub fn score(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.position >= self.items.len()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress::new(self.items.len(), self.position)
    }
}

impl ProgressService {
    /// Start a review session over the `limit` words most in need of practice.
    ///
    /// # Errors
    ///
    /// Returns `ReviewSessionError::Empty` when no word has a recorded mistake.
    pub async fn start_review(&self, limit: usize) -> Result<ReviewSession, ReviewSessionError> {
        let session = ReviewSession::new(self.review_batch(limit).await)?;
        debug!(words = session.items.len(), "review session started");
        Ok(session)
    }

    /// Record an answer for the session's current word and move to the next.
    ///
    /// The session only advances once the answer has been persisted.
    ///
    /// # Errors
    ///
    /// Returns `ReviewSessionError::Completed` if every word was answered, or
    /// `ReviewSessionError::Progress` if the answer could not be stored.
    pub async fn answer_review(
        &self,
        session: &mut ReviewSession,
        is_correct: bool,
    ) -> Result<ReviewAnswer, ReviewSessionError> {
        let item = session
            .current()
            .cloned()
            .ok_or(ReviewSessionError::Completed)?;

        let stat = self
            .record_word_result(item.lesson_id(), item.word(), is_correct)
            .await?;

        session.position += 1;
        if is_correct {
            session.correct += 1;
        }

        Ok(ReviewAnswer {
            item,
            stat,
            is_correct,
            is_complete: session.is_complete(),
        })
    }
}
