//! Persisted JSON form of a [`ProgressRecord`].
//!
//! The document is tolerant on the way in: absent or `null` fields take their
//! defaults, unknown fields are ignored, and entries that no longer validate
//! (out-of-range letters, blank lesson ids) are dropped with a warning. Only
//! structural problems, such as text that is not JSON or a count that is not
//! a non-negative integer, reject the document as a whole.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::warn;
use uky_core::model::{
    GameKind, GameScore, GameScores, LetterId, ProgressRecord, Streak, WordKey, WordStat,
};

/// Storage key of the progress document.
pub const PROGRESS_KEY: &str = "uky-progress";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DocumentError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Serialize a record to its persisted JSON text.
///
/// # Errors
///
/// Returns `DocumentError::Json` if serialization fails.
pub fn encode(record: &ProgressRecord) -> Result<String, DocumentError> {
    Ok(serde_json::to_string(&ProgressDocument::from_record(record))?)
}

/// Parse persisted JSON text into a record.
///
/// `now` stands in for timestamps that are missing or unreadable.
///
/// # Errors
///
/// Returns `DocumentError::Json` if the text is not a structurally valid document.
pub fn decode(raw: &str, now: DateTime<Utc>) -> Result<ProgressRecord, DocumentError> {
    let document: ProgressDocument = serde_json::from_str(raw)?;
    Ok(document.into_record(now))
}

//
// ─── DOCUMENT SHAPE ────────────────────────────────────────────────────────────
//

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ProgressDocument {
    #[serde(deserialize_with = "null_as_default")]
    learned_letters: Vec<u32>,
    #[serde(deserialize_with = "null_as_default")]
    games: GamesDocument,
    #[serde(deserialize_with = "null_as_default")]
    word_stats: BTreeMap<String, WordStatDocument>,
    #[serde(deserialize_with = "null_as_default")]
    streak: StreakDocument,
    #[serde(deserialize_with = "null_as_default")]
    total_sessions: u32,
    #[serde(deserialize_with = "null_as_default")]
    last_activity: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct GamesDocument {
    #[serde(deserialize_with = "null_as_default")]
    matching: GameScoreDocument,
    #[serde(deserialize_with = "null_as_default")]
    quiz: GameScoreDocument,
    #[serde(deserialize_with = "null_as_default")]
    typing: GameScoreDocument,
    #[serde(deserialize_with = "null_as_default")]
    flashcards: GameScoreDocument,
}

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct GameScoreDocument {
    #[serde(deserialize_with = "null_as_default")]
    best_score: u32,
    #[serde(deserialize_with = "null_as_default")]
    total_attempts: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WordStatDocument {
    #[serde(deserialize_with = "null_as_default")]
    correct: u32,
    #[serde(deserialize_with = "null_as_default")]
    wrong: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_seen: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StreakDocument {
    #[serde(deserialize_with = "null_as_default")]
    current: u32,
    /// `""` when there has been no activity yet.
    #[serde(deserialize_with = "null_as_default")]
    last_date: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}

//
// ─── MAPPING ───────────────────────────────────────────────────────────────────
//

impl GamesDocument {
    fn slot(&self, kind: GameKind) -> GameScoreDocument {
        match kind {
            GameKind::Matching => self.matching,
            GameKind::Quiz => self.quiz,
            GameKind::Typing => self.typing,
            GameKind::Flashcards => self.flashcards,
        }
    }

    fn slot_mut(&mut self, kind: GameKind) -> &mut GameScoreDocument {
        match kind {
            GameKind::Matching => &mut self.matching,
            GameKind::Quiz => &mut self.quiz,
            GameKind::Typing => &mut self.typing,
            GameKind::Flashcards => &mut self.flashcards,
        }
    }
}

impl ProgressDocument {
    fn from_record(record: &ProgressRecord) -> Self {
        let mut games = GamesDocument::default();
        for kind in GameKind::ALL {
            let score = record.game(kind);
            *games.slot_mut(kind) = GameScoreDocument {
                best_score: score.best_score,
                total_attempts: score.total_attempts,
            };
        }

        let word_stats = record
            .word_stats()
            .iter()
            .map(|(key, stat)| {
                (
                    key.to_string(),
                    WordStatDocument {
                        correct: stat.correct,
                        wrong: stat.wrong,
                        last_seen: Some(format_timestamp(stat.last_seen)),
                    },
                )
            })
            .collect();

        let streak = record.streak();
        Self {
            learned_letters: record.learned_letters().iter().map(LetterId::value).collect(),
            games,
            word_stats,
            streak: StreakDocument {
                current: streak.current,
                last_date: streak
                    .last_date
                    .map(|date| date.format(DATE_FORMAT).to_string())
                    .unwrap_or_default(),
            },
            total_sessions: record.total_sessions(),
            last_activity: format_timestamp(record.last_activity()),
        }
    }

    fn into_record(self, now: DateTime<Utc>) -> ProgressRecord {
        let last_activity = parse_timestamp(&self.last_activity).unwrap_or_else(|| {
            if !self.last_activity.is_empty() {
                warn!(raw = %self.last_activity, "unreadable lastActivity, using current time");
            }
            now
        });

        let learned_letters = self
            .learned_letters
            .into_iter()
            .filter_map(|raw| match LetterId::new(raw) {
                Ok(id) => Some(id),
                Err(err) => {
                    warn!(%err, "dropping persisted letter");
                    None
                }
            })
            .collect();

        let mut games = GameScores::default();
        for kind in GameKind::ALL {
            let slot = self.games.slot(kind);
            games.set(kind, GameScore::new(slot.best_score, slot.total_attempts));
        }

        let mut word_stats = BTreeMap::new();
        for (raw_key, stat) in self.word_stats {
            let key = match WordKey::parse(&raw_key) {
                Ok(key) => key,
                Err(err) => {
                    warn!(key = %raw_key, %err, "dropping persisted word stat");
                    continue;
                }
            };
            let last_seen = stat
                .last_seen
                .as_deref()
                .and_then(parse_timestamp)
                .unwrap_or(last_activity);
            word_stats.insert(key, WordStat::from_persisted(stat.correct, stat.wrong, last_seen));
        }

        let last_date = match self.streak.last_date.as_str() {
            "" => None,
            raw => match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(err) => {
                    warn!(raw, %err, "unreadable streak date, treating streak as broken");
                    None
                }
            },
        };

        ProgressRecord::from_persisted(
            learned_letters,
            games,
            word_stats,
            Streak::new(self.streak.current, last_date),
            self.total_sessions,
            last_activity,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use uky_core::model::LessonId;
    use uky_core::time::fixed_now;

    const FULL: &str = r#"{
        "learnedLetters": [5, 1],
        "games": {
            "matching": {"bestScore": 0, "totalAttempts": 0},
            "quiz": {"bestScore": 7, "totalAttempts": 2},
            "typing": {"bestScore": 3, "totalAttempts": 1},
            "flashcards": {"bestScore": 0, "totalAttempts": 0}
        },
        "wordStats": {
            "basics:привіт": {"correct": 1, "wrong": 1, "lastSeen": "2026-01-01T10:00:00.000Z"}
        },
        "streak": {"current": 3, "lastDate": "2026-01-01"},
        "totalSessions": 4,
        "lastActivity": "2026-01-01T10:05:00.000Z"
    }"#;

    fn letter(n: u32) -> LetterId {
        LetterId::new(n).unwrap()
    }

    fn basics(word: &str) -> WordKey {
        WordKey::new(LessonId::new("basics").unwrap(), word)
    }

    #[test]
    fn decodes_full_document() {
        let record = decode(FULL, fixed_now()).unwrap();
        assert_eq!(record.learned_letters(), &[letter(5), letter(1)]);
        assert_eq!(record.game(GameKind::Quiz), GameScore::new(7, 2));
        assert_eq!(record.game(GameKind::Typing), GameScore::new(3, 1));

        let stat = record.word_stat(&basics("привіт")).unwrap();
        assert_eq!((stat.correct, stat.wrong), (1, 1));
        assert_eq!(stat.last_seen, parse_timestamp("2026-01-01T10:00:00Z").unwrap());

        assert_eq!(record.streak().current, 3);
        assert_eq!(record.streak().last_date, NaiveDate::from_ymd_opt(2026, 1, 1));
        assert_eq!(record.total_sessions(), 4);
        assert_eq!(
            record.last_activity(),
            parse_timestamp("2026-01-01T10:05:00Z").unwrap()
        );
    }

    #[test]
    fn older_document_gets_defaults_for_missing_fields() {
        let raw =
            r#"{"learnedLetters": [2], "games": {"quiz": {"bestScore": 4, "totalAttempts": 1}}}"#;
        let record = decode(raw, fixed_now()).unwrap();
        assert_eq!(record.learned_letters(), &[letter(2)]);
        assert_eq!(record.game(GameKind::Quiz), GameScore::new(4, 1));
        assert_eq!(record.game(GameKind::Matching), GameScore::default());
        assert!(record.word_stats().is_empty());
        assert_eq!(record.streak(), Streak::default());
        assert_eq!(record.total_sessions(), 0);
        assert_eq!(record.last_activity(), fixed_now());
    }

    #[test]
    fn null_fields_take_defaults() {
        let raw = r#"{
            "wordStats": null,
            "streak": null,
            "totalSessions": null,
            "games": {"typing": null}
        }"#;
        let record = decode(raw, fixed_now()).unwrap();
        assert!(record.word_stats().is_empty());
        assert_eq!(record.streak(), Streak::default());
        assert_eq!(record.total_sessions(), 0);
        assert_eq!(record.game(GameKind::Typing), GameScore::default());
    }

    #[test]
    fn nested_null_counts_keep_the_rest_of_the_record() {
        let raw = r#"{
            "learnedLetters": [1, 2, 3],
            "games": {"quiz": {"bestScore": null, "totalAttempts": 4}},
            "wordStats": {"basics:так": {"correct": 2, "wrong": null, "lastSeen": null}}
        }"#;
        let record = decode(raw, fixed_now()).unwrap();
        assert_eq!(record.learned_letters(), &[letter(1), letter(2), letter(3)]);
        assert_eq!(record.game(GameKind::Quiz), GameScore::new(0, 4));
        let stat = record.word_stat(&basics("так")).unwrap();
        assert_eq!((stat.correct, stat.wrong), (2, 0));
        assert_eq!(stat.last_seen, fixed_now());
    }

    #[test]
    fn structural_errors_are_rejected() {
        assert!(decode("not json", fixed_now()).is_err());
        assert!(decode("null", fixed_now()).is_err());
        assert!(decode(r#"{"totalSessions": -1}"#, fixed_now()).is_err());
        assert!(decode(r#"{"learnedLetters": "abc"}"#, fixed_now()).is_err());
    }

    #[test]
    fn invalid_entries_are_dropped() {
        let raw = r#"{
            "learnedLetters": [0, 4, 40, 4],
            "games": {"chess": {"bestScore": 9, "totalAttempts": 9}},
            "wordStats": {
                ":orphan": {"correct": 1, "wrong": 0},
                "basics:так": {"correct": 2, "wrong": 0}
            },
            "streak": {"current": 2, "lastDate": "yesterday"}
        }"#;
        let record = decode(raw, fixed_now()).unwrap();
        assert_eq!(record.learned_letters(), &[letter(4)]);
        assert_eq!(record.word_stats().len(), 1);
        assert!(record.word_stat(&basics("так")).is_some());
        assert_eq!(record.streak().last_date, None);
    }

    #[test]
    fn missing_last_seen_falls_back_to_last_activity() {
        let raw = r#"{
            "wordStats": {"basics:так": {"correct": 1, "wrong": 0}},
            "lastActivity": "2026-02-02T08:00:00.000Z"
        }"#;
        let record = decode(raw, fixed_now()).unwrap();
        let stat = record.word_stat(&basics("так")).unwrap();
        assert_eq!(stat.last_seen, parse_timestamp("2026-02-02T08:00:00Z").unwrap());
    }

    #[test]
    fn encode_uses_persisted_field_names() {
        let mut record = ProgressRecord::new(fixed_now());
        record.mark_letter_learned(letter(5));
        record.record_game_score(GameKind::Quiz, 7);
        record.record_word_result(basics("привіт"), false, fixed_now());

        let value: Value = serde_json::from_str(&encode(&record).unwrap()).unwrap();
        assert_eq!(value["learnedLetters"], serde_json::json!([5]));
        assert_eq!(value["games"]["quiz"]["bestScore"], 7);
        assert_eq!(value["games"]["quiz"]["totalAttempts"], 1);
        assert_eq!(value["games"]["flashcards"]["totalAttempts"], 0);
        assert_eq!(value["wordStats"]["basics:привіт"]["wrong"], 1);
        assert_eq!(
            value["wordStats"]["basics:привіт"]["lastSeen"],
            "2023-11-14T22:13:20.000Z"
        );
        assert_eq!(value["streak"]["current"], 0);
        assert_eq!(value["streak"]["lastDate"], "");
        assert_eq!(value["totalSessions"], 0);
        assert_eq!(value["lastActivity"], "2023-11-14T22:13:20.000Z");
    }

    #[test]
    fn encoded_record_decodes_to_the_same_record() {
        let mut record = decode(FULL, fixed_now()).unwrap();
        record.register_activity(NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());
        let decoded = decode(&encode(&record).unwrap(), fixed_now()).unwrap();
        assert_eq!(decoded, record);
    }
}
