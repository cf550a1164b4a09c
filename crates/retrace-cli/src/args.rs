//! CLI argument definitions using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use retrace_core::config::loader::DEFAULT_CONFIG_FILE;

#[derive(Parser)]
#[command(name = "retrace")]
#[command(about = "Record program state tick by tick, then jump, replay, diff and bisect it")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (json, toml or yaml)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: PathBuf,

    /// Session storage directory, overriding the configuration
    #[arg(long, global = true)]
    pub storage_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Print machine-readable JSON instead of formatted text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List recorded sessions
    List,

    /// Show one session's metadata
    Show {
        /// Session ID or unique prefix
        session: String,
    },

    /// Delete a session and its artifact
    Delete {
        /// Session ID or unique prefix
        session: String,
    },

    /// Write a standalone artifact for a session
    Export {
        /// Session ID or unique prefix
        session: String,

        /// Directory for the artifact (defaults to the configured export directory)
        #[arg(long, short)]
        output_dir: Option<PathBuf>,
    },

    /// Import an artifact as a new session
    Import {
        /// Path to an exported artifact
        path: PathBuf,
    },

    /// Show the state at a tick (or the nearest recorded one)
    Jump {
        /// Session ID or unique prefix
        session: String,

        /// Tick to jump to
        tick: u64,
    },

    /// List the ticks within an inclusive range
    Range {
        /// Session ID or unique prefix
        session: String,

        /// First tick
        from: u64,

        /// Last tick
        to: u64,
    },

    /// Compare two sessions tick by tick
    Diff {
        /// First session
        a: String,

        /// Second session
        b: String,

        /// Also compare async operations and network requests
        #[arg(long)]
        all: bool,
    },

    /// Every tick at which a variable changed value
    Changes {
        /// Session ID or unique prefix
        session: String,

        /// Variable name
        variable: String,
    },

    /// Find the first tick where a failing run departs from a working run
    Regress {
        /// Session recorded from the working program
        working: String,

        /// Session recorded from the failing program
        failing: String,
    },

    /// Replay a session with breakpoints, watches and overrides
    Replay(ReplayArgs),

    /// Record a session from snapshot drafts, one JSON object per line
    Record(RecordArgs),
}

#[derive(Args, Clone)]
pub struct ReplayArgs {
    /// Session ID or unique prefix
    pub session: String,

    /// Playback speed multiplier
    #[arg(long, default_value_t = 1.0)]
    pub speed: f64,

    /// Tick to report as a breakpoint (repeatable)
    #[arg(long = "breakpoint", short = 'b')]
    pub breakpoints: Vec<u64>,

    /// Variable to report on every tick (repeatable)
    #[arg(long = "watch", short = 'w')]
    pub watches: Vec<String>,

    /// Override as TICK:NAME=VALUE, VALUE parsed as JSON when possible (repeatable)
    #[arg(long = "set")]
    pub overrides: Vec<String>,

    /// Print every replayed tick
    #[arg(long)]
    pub ticks: bool,
}

#[derive(Args, Clone)]
pub struct RecordArgs {
    /// JSON lines file with snapshot drafts, `-` for stdin
    pub input: PathBuf,

    /// Session name
    #[arg(long, short, default_value = "recording")]
    pub name: String,

    /// Project path of the recorded program
    #[arg(long, default_value = ".")]
    pub project: PathBuf,

    /// Entry point of the recorded program
    #[arg(long, default_value = "main")]
    pub entry: String,
}
