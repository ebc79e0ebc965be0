//! Command-line definition.

use crate::config::ConfigArgs;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Review flashcards with a per-card adaptive auto-reveal timer
#[derive(Debug, Parser)]
#[command(name = "reveal-reviewer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Review a markdown deck in the terminal
    Review {
        /// Deck file (ID:/Q:/A: blocks)
        deck: PathBuf,
    },

    /// List stored timers
    List,

    /// Set a card's timer in seconds (0 clears it)
    Set {
        /// Card identifier
        card: String,
        /// Delay in seconds
        seconds: String,
    },

    /// Remove a card's stored timer
    Clear {
        /// Card identifier
        card: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_review_with_global_flags() {
        let cli = Cli::try_parse_from([
            "reveal-reviewer",
            "review",
            "deck.md",
            "--state-file",
            "/tmp/timers.json",
            "--policy",
            "fixed",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Review { ref deck } if deck == &PathBuf::from("deck.md")));
        assert_eq!(cli.config.state_file, Some(PathBuf::from("/tmp/timers.json")));
        assert_eq!(cli.config.policy.as_deref(), Some("fixed"));
    }

    #[test]
    fn parses_set() {
        let cli = Cli::try_parse_from(["reveal-reviewer", "set", "42", "2.5"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Set { ref card, ref seconds } if card == "42" && seconds == "2.5"
        ));
    }
}
