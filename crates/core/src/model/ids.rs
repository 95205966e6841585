use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of letters in the alphabet reference; letter ids run `1..=LETTER_COUNT`.
pub const LETTER_COUNT: u32 = 33;

/// Separator between lesson id and word in a persisted word key.
pub const WORD_KEY_SEPARATOR: char = ':';

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IdError {
    #[error("letter id {0} is outside 1..={LETTER_COUNT}")]
    LetterOutOfRange(u32),

    #[error("invalid letter id: {0}")]
    MalformedLetter(String),

    #[error("lesson id cannot be empty")]
    EmptyLesson,

    #[error("lesson id `{0}` cannot contain `{WORD_KEY_SEPARATOR}`")]
    LessonContainsSeparator(String),
}

//
// ─── LETTER ID ─────────────────────────────────────────────────────────────────
//

/// Identifier of one alphabet letter's study entry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LetterId(u32);

impl LetterId {
    /// Creates a `LetterId`.
    ///
    /// # Errors
    ///
    /// Returns `IdError::LetterOutOfRange` unless `1 <= id <= 33`.
    pub fn new(id: u32) -> Result<Self, IdError> {
        if (1..=LETTER_COUNT).contains(&id) {
            Ok(Self(id))
        } else {
            Err(IdError::LetterOutOfRange(id))
        }
    }

    /// Returns the underlying value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl FromStr for LetterId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: u32 = s
            .trim()
            .parse()
            .map_err(|_| IdError::MalformedLetter(s.to_owned()))?;
        Self::new(raw)
    }
}

impl fmt::Debug for LetterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LetterId({})", self.0)
    }
}

impl fmt::Display for LetterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── LESSON ID ─────────────────────────────────────────────────────────────────
//

/// Identifier of a vocabulary unit, e.g. `"basics"`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LessonId(String);

impl LessonId {
    /// Creates a `LessonId`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `IdError::EmptyLesson` for blank input and
    /// `IdError::LessonContainsSeparator` if the id contains `:`.
    pub fn new(id: impl Into<String>) -> Result<Self, IdError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(IdError::EmptyLesson);
        }
        if trimmed.contains(WORD_KEY_SEPARATOR) {
            return Err(IdError::LessonContainsSeparator(trimmed.to_owned()));
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LessonId({:?})", self.0)
    }
}

impl fmt::Display for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LessonId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

//
// ─── WORD KEY ──────────────────────────────────────────────────────────────────
//

/// Composite `(lesson, word)` key identifying one vocabulary item's statistics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WordKey {
    lesson_id: LessonId,
    word: String,
}

impl WordKey {
    #[must_use]
    pub fn new(lesson_id: LessonId, word: impl Into<String>) -> Self {
        Self {
            lesson_id,
            word: word.into(),
        }
    }

    /// Parses the persisted `"<lesson>:<word>"` form.
    ///
    /// Splits on the first separator only, so words may themselves contain
    /// `:`. A key without any separator is a lesson with an empty word.
    ///
    /// # Errors
    ///
    /// Returns `IdError::EmptyLesson` if the lesson part is blank.
    pub fn parse(raw: &str) -> Result<Self, IdError> {
        let (lesson, word) = raw.split_once(WORD_KEY_SEPARATOR).unwrap_or((raw, ""));
        Ok(Self::new(LessonId::new(lesson)?, word))
    }

    #[must_use]
    pub fn lesson_id(&self) -> &LessonId {
        &self.lesson_id
    }

    #[must_use]
    pub fn word(&self) -> &str {
        &self.word
    }
}

impl fmt::Display for WordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{WORD_KEY_SEPARATOR}{}", self.lesson_id, self.word)
    }
}
