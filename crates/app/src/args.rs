use std::fmt;

use uky_core::model::{GameKind, GameKindError, IdError, LessonId, LetterId, REVIEW_SESSION_SIZE};

pub const DB_ENV: &str = "UKY_DB_URL";
const DEFAULT_DB_URL: &str = "sqlite:uky.sqlite3";

#[derive(Debug)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArgument { command: &'static str, name: &'static str },
    MissingCommand,
    UnknownArg(String),
    UnknownCommand(String),
    InvalidDbUrl { raw: String },
    InvalidLimit { raw: String },
    InvalidScore { raw: String },
    InvalidOutcome { raw: String },
    Letter(IdError),
    Lesson(IdError),
    Game(GameKindError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { command, name } => {
                write!(f, "{command} requires <{name}>")
            }
            ArgsError::MissingCommand => write!(f, "missing command"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown command: {cmd}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidLimit { raw } => write!(f, "invalid --limit value: {raw}"),
            ArgsError::InvalidScore { raw } => write!(f, "invalid score: {raw}"),
            ArgsError::InvalidOutcome { raw } => {
                write!(f, "invalid outcome: {raw} (expected right or wrong)")
            }
            ArgsError::Letter(err) => write!(f, "invalid letter: {err}"),
            ArgsError::Lesson(err) => write!(f, "invalid lesson: {err}"),
            ArgsError::Game(err) => write!(f, "invalid game: {err}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Show,
    Stats,
    Review { limit: usize },
    Learn(LetterId),
    Score { game: GameKind, score: u32 },
    Word { lesson: LessonId, word: String, is_correct: bool },
    Streak,
}

#[derive(Debug)]
pub struct Args {
    pub db_url: String,
    pub command: Command,
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  uky [--db <sqlite_url>] <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  show                              print the stored progress as JSON");
    eprintln!("  stats                             progress summary");
    eprintln!("  review [--limit <n>]              words that need practice");
    eprintln!("  learn <letter-id>                 mark a letter (1-33) as learned");
    eprintln!("  score <game> <score>              record a game result");
    eprintln!("  word <lesson> <word> <right|wrong>");
    eprintln!("  streak                            count today's practice");
    eprintln!();
    eprintln!("Games: matching, quiz, typing, flashcards");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  {DB_ENV}, {}", crate::logging::LOG_ENV);
}

impl Args {
    /// Parse the arguments after the program name.
    ///
    /// `env_db_url` is the value of `UKY_DB_URL`, applied before `--db`.
    pub fn parse(
        args: impl IntoIterator<Item = String>,
        env_db_url: Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url = env_db_url
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| normalize_sqlite_url(DEFAULT_DB_URL.into()), normalize_sqlite_url);
        let mut command_name: Option<String> = None;
        let mut positional = Vec::new();
        let mut limit: Option<String> = None;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--limit" => limit = Some(require_value(&mut args, "--limit")?),
                "--help" | "-h" => {
                    return Ok(Self {
                        db_url,
                        command: Command::Help,
                    });
                }
                flag if flag.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ if command_name.is_none() => command_name = Some(arg),
                _ => positional.push(arg),
            }
        }

        let name = command_name.ok_or(ArgsError::MissingCommand)?;
        if limit.is_some() && name != "review" {
            return Err(ArgsError::UnknownArg("--limit".into()));
        }

        let mut positional = positional.into_iter();
        let command = match name.as_str() {
            "help" => Command::Help,
            "show" => Command::Show,
            "stats" => Command::Stats,
            "streak" => Command::Streak,
            "review" => {
                let limit = match limit {
                    Some(raw) => raw
                        .parse()
                        .map_err(|_| ArgsError::InvalidLimit { raw: raw.clone() })?,
                    None => REVIEW_SESSION_SIZE,
                };
                Command::Review { limit }
            }
            "learn" => {
                let raw = required(&mut positional, "learn", "letter-id")?;
                Command::Learn(raw.parse().map_err(ArgsError::Letter)?)
            }
            "score" => {
                let game = required(&mut positional, "score", "game")?
                    .parse()
                    .map_err(ArgsError::Game)?;
                let raw = required(&mut positional, "score", "score")?;
                let score = raw
                    .parse()
                    .map_err(|_| ArgsError::InvalidScore { raw: raw.clone() })?;
                Command::Score { game, score }
            }
            "word" => {
                let lesson = LessonId::new(required(&mut positional, "word", "lesson")?)
                    .map_err(ArgsError::Lesson)?;
                let word = required(&mut positional, "word", "word")?;
                let is_correct = parse_outcome(required(&mut positional, "word", "right|wrong")?)?;
                Command::Word {
                    lesson,
                    word,
                    is_correct,
                }
            }
            _ => return Err(ArgsError::UnknownCommand(name)),
        };

        if let Some(extra) = positional.next() {
            return Err(ArgsError::UnknownArg(extra));
        }

        Ok(Self { db_url, command })
    }
}

fn required(
    args: &mut impl Iterator<Item = String>,
    command: &'static str,
    name: &'static str,
) -> Result<String, ArgsError> {
    args.next()
        .ok_or(ArgsError::MissingArgument { command, name })
}

fn parse_outcome(raw: String) -> Result<bool, ArgsError> {
    match raw.to_ascii_lowercase().as_str() {
        "right" | "correct" | "yes" => Ok(true),
        "wrong" | "incorrect" | "no" => Ok(false),
        _ => Err(ArgsError::InvalidOutcome { raw }),
    }
}

pub fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file and its parent directory so the pool can open it.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}
