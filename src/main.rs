//! lexis CLI: serve the HTTP API, import wordbooks, review in the terminal.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use lexis::config::Config;
use lexis::ledger::ActivityLedger;
use lexis::review::{EditField, ReviewSession, SessionState};
use lexis::server::{self, AppState};
use lexis::wordbook;
use lexis::words::{
    HistoryStore, ModificationKind, PositionedWord, UpdateWordRequest, WordSort, WordStore,
};

#[derive(Parser)]
#[command(name = "lexis", about = "Personal vocabulary trainer", version)]
struct Cli {
    /// Path to a lexis.toml config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API server (the default)
    Serve {
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },

    /// Import a wordbook XML file
    Import {
        /// Path to the XML file
        file: PathBuf,
    },

    /// Review words interactively in the terminal
    Review {
        /// Category to review ("All" spans every category)
        #[arg(long, default_value = "All")]
        category: String,

        /// Sort order: updated_at, updated_at_asc or review_count
        #[arg(long)]
        sort_by: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let data_dir = match cli.data_dir.or_else(|| config.data_dir.clone()) {
        Some(dir) => dir,
        None => lexis::storage::default_data_dir()?,
    };

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            let port = port.unwrap_or(config.port);
            let state = AppState::new(&config, data_dir)?;
            server::serve(state, port).await.context("server failed")?;
        }
        Command::Import { file } => {
            let store = WordStore::new(data_dir)?;
            let stats = wordbook::import_file(&store, &file)
                .with_context(|| format!("failed to import {}", file.display()))?;
            println!(
                "Import completed: {} added, {} duplicates skipped, {} errors ({} items)",
                stats.added, stats.skipped_duplicates, stats.errors, stats.total_processed
            );
        }
        Command::Review { category, sort_by } => {
            let sort = WordSort::from_param(sort_by.as_deref());
            run_review(&config, data_dir, category, sort)?;
        }
    }

    Ok(())
}

/// Interactive review loop. One [`ReviewSession`] drives the whole
/// screen: every keystroke is a transition on it.
fn run_review(
    config: &Config,
    data_dir: PathBuf,
    category: String,
    sort: WordSort,
) -> anyhow::Result<()> {
    let store = WordStore::new(data_dir.clone())?;
    let history = HistoryStore::new(data_dir.clone())?;
    let ledger = ActivityLedger::new(data_dir, config.utc_offset_hours)?;

    let mut session = ReviewSession::new(category, sort);
    let stdin = std::io::stdin();

    loop {
        match session.state().clone() {
            SessionState::Loading => {
                match store.page(&session.category, session.current_index(), session.sort) {
                    Ok(Some(page)) => session.loaded(page.total_in_category, page.current_index),
                    Ok(None) => session.loaded(0, 0),
                    Err(e) => session.fail(e.to_string()),
                }
            }
            SessionState::Empty => {
                println!("No words in \"{}\".", session.category);
                break;
            }
            SessionState::Error { message } => {
                println!("Error: {message}");
                break;
            }
            SessionState::Displaying { index } => {
                let page = match store.page(&session.category, index, session.sort) {
                    Ok(Some(page)) => page,
                    Ok(None) => {
                        session.loaded(0, 0);
                        continue;
                    }
                    Err(e) => {
                        session.fail(e.to_string());
                        continue;
                    }
                };
                // Re-sync in case a mutation changed the list size
                session.loaded(page.total_in_category, page.current_index);

                print_card(&page);
                print!("[n]ext [p]rev [w]ord [t]ranslation [s]ample [r]eviewed [q]uit > ");
                std::io::stdout().flush()?;

                let mut line = String::new();
                if stdin.lock().read_line(&mut line)? == 0 {
                    break;
                }

                match line.trim() {
                    "n" => session.next(),
                    "p" => session.prev(),
                    "w" => edit_field(
                        &mut session,
                        &store,
                        &history,
                        &ledger,
                        &page,
                        EditField::WordText,
                        &stdin,
                    )?,
                    "t" => edit_field(
                        &mut session,
                        &store,
                        &history,
                        &ledger,
                        &page,
                        EditField::Translation,
                        &stdin,
                    )?,
                    "s" => edit_field(
                        &mut session,
                        &store,
                        &history,
                        &ledger,
                        &page,
                        EditField::ExampleSentence,
                        &stdin,
                    )?,
                    "r" => {
                        let word = store.record_review(page.word.id)?;
                        record_side_effects(&history, &ledger, &word);
                        println!("Review count: {}", word.review_count);
                    }
                    "q" => break,
                    _ => {}
                }
            }
            SessionState::Editing { .. } => {
                // Edits run synchronously inside edit_field
                session.end_edit();
            }
        }
    }

    Ok(())
}

fn print_card(page: &PositionedWord) {
    println!();
    println!(
        "[{}/{}] {} ({})",
        page.current_index + 1,
        page.total_in_category,
        page.word.word,
        page.word.category
    );
    println!("  {}", page.word.translation);
    if let Some(sample) = &page.word.example_sentence {
        println!("  e.g. {sample}");
    }
}

fn edit_field(
    session: &mut ReviewSession,
    store: &WordStore,
    history: &HistoryStore,
    ledger: &ActivityLedger,
    page: &PositionedWord,
    field: EditField,
    stdin: &std::io::Stdin,
) -> anyhow::Result<()> {
    session.begin_edit(field);

    let label = match field {
        EditField::WordText => "word",
        EditField::Translation => "translation",
        EditField::ExampleSentence => "example sentence",
    };
    print!("New {label} (empty to cancel): ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    let value = line.trim();

    if !value.is_empty() {
        let mut request = UpdateWordRequest::default();
        match field {
            EditField::WordText => request.word = Some(value.to_string()),
            EditField::Translation => request.translation = Some(value.to_string()),
            EditField::ExampleSentence => request.example_sentence = Some(value.to_string()),
        }
        let word = store.update(page.word.id, request, ledger.today())?;
        record_side_effects(history, ledger, &word);
    }

    session.end_edit();
    Ok(())
}

/// History and ledger updates shared by every mutating review action.
/// Both are non-fatal: the review keeps going either way.
fn record_side_effects(history: &HistoryStore, ledger: &ActivityLedger, word: &lexis::words::Word) {
    if let Err(e) = history.record(word, ModificationKind::Updated) {
        log::warn!("Failed to record history for {}: {}", word.id, e);
    }
    if let Err(e) = ledger.record_activity(word.id, ledger.today()) {
        log::warn!("Failed to record daily activity for {}: {}", word.id, e);
    }
}
