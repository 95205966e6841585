mod args;
mod logging;
mod render;

use args::{Args, Command, DB_ENV, prepare_sqlite_file, print_usage};
use services::{AppServices, Clock};
use storage::document;
use tracing::debug;

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = Args::parse(std::env::args().skip(1), std::env::var(DB_ENV).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    if parsed.command == Command::Help {
        print_usage();
        return Ok(());
    }

    logging::init_tracing(&logging::filter_from_env());

    // Open + migrate SQLite at startup; services only see the repository trait.
    prepare_sqlite_file(&parsed.db_url)?;
    debug!(db_url = %parsed.db_url, "opening progress store");
    let services = AppServices::new_sqlite(&parsed.db_url, Clock::default_clock()).await?;
    let progress = services.progress();

    match parsed.command {
        Command::Help => {}
        Command::Show => {
            let record = progress.load_record().await;
            println!("{}", document::encode(&record)?);
        }
        Command::Stats => println!("{}", render::dashboard(&progress.dashboard().await)),
        Command::Review { limit } => {
            println!("{}", render::review(&progress.review_batch(limit).await));
        }
        Command::Learn(letter) => {
            if progress.mark_letter_learned(letter).await? {
                println!("Letter {letter} learned.");
            } else {
                println!("Letter {letter} was already learned.");
            }
            println!("Alphabet: {}%", progress.overall_percent().await);
        }
        Command::Score { game, score } => {
            let updated = progress.update_game_score(game, score).await?;
            println!("{}", render::game_line(game, updated));
        }
        Command::Word {
            lesson,
            word,
            is_correct,
        } => {
            let stat = progress.record_word_result(&lesson, &word, is_correct).await?;
            println!("{word} ({lesson}) {}", render::stat_line(&stat));
        }
        Command::Streak => {
            let update = progress.update_streak().await?;
            let info = progress.streak_info().await;
            println!("{}", render::streak(update, info.current));
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
