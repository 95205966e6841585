//! Plain-text views of progress for the terminal.

use services::DashboardSummary;
use uky_core::model::{GameKind, GameScore, ReviewItem, StreakUpdate, WordStat};

pub fn dashboard(summary: &DashboardSummary) -> String {
    let mut lines = vec![
        format!(
            "Alphabet: {}/{} letters ({}%)",
            summary.letters_learned, summary.letters_total, summary.overall_percent
        ),
        format!(
            "Streak: {} day(s){}",
            summary.streak.current,
            if summary.active_today {
                ", practised today"
            } else {
                ""
            }
        ),
        format!("Sessions: {}", summary.streak.total_sessions),
        format!(
            "Words: {} studied, {} correct, {} wrong ({}% accuracy)",
            summary.totals.words_studied,
            summary.totals.correct,
            summary.totals.wrong,
            summary.overall_accuracy
        ),
        format!("To review: {}", summary.review_count),
    ];

    if !summary.lessons.is_empty() {
        lines.push("Lessons:".into());
        for lesson in &summary.lessons {
            let accuracy = match (lesson.accuracy(), lesson.band()) {
                (Some(percent), Some(band)) => format!("{percent}% ({})", band.as_str()),
                _ => "not started".into(),
            };
            lines.push(format!("  {:<16} {accuracy}", lesson.lesson_id.as_str()));
        }
    }

    if summary.has_game_history() {
        lines.push("Games:".into());
        for (kind, score) in &summary.games {
            lines.push(format!("  {}", game_line(*kind, *score)));
        }
    }

    lines.push(format!(
        "Last activity: {}",
        summary.last_activity.format("%Y-%m-%d %H:%M UTC")
    ));
    lines.join("\n")
}

pub fn review(items: &[ReviewItem]) -> String {
    if items.is_empty() {
        return "Nothing to review.".into();
    }
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            format!(
                "{:>2}. {} ({}) {}",
                idx + 1,
                item.word(),
                item.lesson_id(),
                stat_line(&item.stat)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn game_line(kind: GameKind, score: GameScore) -> String {
    format!(
        "{:<10} best {}, played {}",
        kind.label(),
        score.best_score,
        score.total_attempts
    )
}

pub fn stat_line(stat: &WordStat) -> String {
    format!(
        "{} right, {} wrong, {}% errors",
        stat.correct,
        stat.wrong,
        (stat.error_rate() * 100.0).round()
    )
}

pub fn streak(update: StreakUpdate, current: u32) -> String {
    match update {
        StreakUpdate::AlreadyCounted => format!("Already counted today. Streak: {current}"),
        StreakUpdate::Started => format!("Streak started: {current}"),
        StreakUpdate::Extended => format!("Streak extended: {current}"),
        StreakUpdate::Reset => format!("Streak reset: {current}"),
    }
}
