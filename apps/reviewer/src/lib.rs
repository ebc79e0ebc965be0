pub mod cli;
pub mod config;
pub mod deck;
pub mod host;
pub mod session;

use std::io::{BufRead, Write};
use std::time::Duration;

use clap::Parser;
use reveal_core::{AdaptiveController, CardId, TimerEdit, TimerStore, TokioScheduler};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::host::TokioTime;
use crate::session::format_delay;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::resolve(&cli.config)?;
    tracing::debug!(state_file = %config.state_file.display(), "using timer file");

    let mut store = TimerStore::open_file(&config.state_file);
    let mut stdout = std::io::stdout();

    match cli.command {
        Command::Review { deck } => {
            let cards = deck::load_deck(&deck)?;
            let (scheduler, mut expiries) = TokioScheduler::channel();
            let mut controller =
                AdaptiveController::new(config.settings, store, scheduler, TokioTime::new());
            let mut lines = stdin_lines();
            session::run_review(&cards, &mut controller, &mut expiries, &mut lines, &mut stdout)
                .await?;
        }
        Command::List => list_timers(&store, &mut stdout)?,
        Command::Set { card, seconds } => {
            let edit = store.edit(CardId::from(card.as_str()), &seconds)?;
            report_edit(&card, edit, &mut stdout)?;
        }
        Command::Clear { card } => clear_card(&mut store, &card, &mut stdout)?,
    }

    Ok(())
}

/// Stdin lines forwarded from a dedicated thread, so a pending read never
/// holds up the runtime at exit.
fn stdin_lines() -> UnboundedReceiver<String> {
    let (tx, rx) = unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Print every stored timer, sorted by card.
pub fn list_timers<W: Write>(store: &TimerStore, out: &mut W) -> std::io::Result<()> {
    if store.is_empty() {
        return writeln!(out, "no timers stored");
    }

    let mut entries: Vec<_> = store.timers().iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    for (card, state) in entries {
        let delay = if state.is_timed() {
            format_delay(Duration::from_millis(state.delay_ms))
        } else {
            "off".to_string()
        };
        writeln!(
            out,
            "{card}\t{delay}\tstreak {}\tmisses {}",
            state.streak, state.wrong_counter
        )?;
    }
    Ok(())
}

/// Remove one card's timer and report whether anything was stored.
pub fn clear_card<W: Write>(
    store: &mut TimerStore,
    card: &str,
    out: &mut W,
) -> std::io::Result<()> {
    match store.clear(&CardId::from(card)) {
        Some(_) => writeln!(out, "{card}: timer cleared"),
        None => writeln!(out, "{card}: no timer stored"),
    }
}

fn report_edit<W: Write>(card: &str, edit: TimerEdit, out: &mut W) -> std::io::Result<()> {
    match edit {
        TimerEdit::Cancelled => writeln!(out, "{card}: timer unchanged"),
        TimerEdit::Set(state) => writeln!(
            out,
            "{card}: timer set to {}",
            format_delay(Duration::from_millis(state.delay_ms))
        ),
        TimerEdit::Cleared(_) => writeln!(out, "{card}: timer cleared"),
    }
}
