//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// SummarAI: summarize long text with a chunked map-reduce pipeline.
///
/// Sign up or log in once, then summarize files, inline text or stdin.
#[derive(Parser, Debug)]
#[command(name = "summarai")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the SummarAI database file.
    ///
    /// Defaults to `.summarai/summarai.db` in the current directory.
    #[arg(short, long, env = "SUMMARAI_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Path to a TOML config file.
    #[arg(short, long, env = "SUMMARAI_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output (debug logs on stderr).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the SummarAI database.
    Init {
        /// Force re-initialization (destroys existing accounts).
        #[arg(short, long)]
        force: bool,
    },

    /// Show database status.
    Status,

    /// Create an account and log in.
    Signup {
        /// Display name.
        username: String,

        /// Email address, used to log in.
        email: String,

        /// Password.
        #[arg(short, long, env = "SUMMARAI_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Log in to an existing account.
    Login {
        /// Email address.
        email: String,

        /// Password.
        #[arg(short, long, env = "SUMMARAI_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Log out.
    Logout,

    /// Show the logged-in user.
    Whoami,

    /// Summarize text.
    ///
    /// Reads `--text`, else FILE, else stdin.
    #[command(alias = "sum")]
    Summarize {
        /// File to summarize.
        file: Option<PathBuf>,

        #[command(flatten)]
        input: InputArgs,

        /// Summarize chunks in parallel.
        #[arg(long)]
        parallel: bool,

        /// Wrap text output at this many columns.
        #[arg(short, long)]
        width: Option<usize>,
    },

    /// Show how text would be chunked, without summarizing.
    Plan {
        /// File to plan.
        file: Option<PathBuf>,

        #[command(flatten)]
        input: InputArgs,
    },
}

/// Input options shared by `summarize` and `plan`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Inline text (takes precedence over FILE).
    #[arg(short, long)]
    pub text: Option<String>,

    /// Maximum tokens per chunk.
    #[arg(long)]
    pub chunk_tokens: Option<usize>,

    /// Maximum chunks; input past the cap is dropped.
    #[arg(long)]
    pub max_chunks: Option<usize>,
}

impl Cli {
    /// Returns the database path, using the default if not specified.
    #[must_use]
    pub fn get_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(crate::storage::DEFAULT_DB_PATH))
    }
}
