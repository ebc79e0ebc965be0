//! Reviewer configuration.
//!
//! Each value comes from a command-line flag, then the matching `REVEAL_*`
//! environment variable (a `.env` file is loaded first), then the default.

use clap::Args;
use reveal_core::{PolicyKind, RevealSettings};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown policy {0:?} (expected \"adaptive\" or \"fixed\")")]
    UnknownPolicy(String),

    #[error("could not determine a data directory; pass --state-file")]
    NoDataDir,
}

/// Flags shared by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// Path of the JSON timer document
    #[arg(long, global = true, env = "REVEAL_STATE_FILE")]
    pub state_file: Option<PathBuf>,

    /// Start with auto reveal on or off
    #[arg(long, global = true, env = "REVEAL_ENABLED")]
    pub enabled: Option<bool>,

    /// Delay policy: adaptive or fixed
    #[arg(long, global = true, env = "REVEAL_POLICY")]
    pub policy: Option<String>,

    /// Step in milliseconds for slow delay convergence
    #[arg(long, global = true, env = "REVEAL_STEP_MS")]
    pub step_ms: Option<u64>,
}

/// Resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub state_file: PathBuf,
    pub settings: RevealSettings,
}

impl Config {
    pub fn resolve(args: &ConfigArgs) -> Result<Self, ConfigError> {
        let state_file = match &args.state_file {
            Some(path) => path.clone(),
            None => default_state_file().ok_or(ConfigError::NoDataDir)?,
        };

        let mut settings = RevealSettings::default();
        if let Some(enabled) = args.enabled {
            settings.enabled = enabled;
        }
        if let Some(name) = &args.policy {
            settings.policy =
                PolicyKind::from_str(name).ok_or_else(|| ConfigError::UnknownPolicy(name.clone()))?;
        }
        if let Some(step_ms) = args.step_ms {
            settings.step_ms = step_ms;
        }

        Ok(Self {
            state_file,
            settings,
        })
    }
}

/// `<data_local_dir>/reveal-timer/timers.json`
pub fn default_state_file() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("reveal-timer").join("timers.json"))
}
