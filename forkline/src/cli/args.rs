//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use forkline::config::{DEFAULT_MAX_CONCURRENT_READS, MAX_CONCURRENT_READS_ENV, PROJECTS_DIR_ENV};

/// Forkline - Trace how recorded assistant sessions were resumed and forked
#[derive(Parser, Debug)]
#[command(name = "forkline")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root directory holding one directory per project (default: ~/.claude/projects)
    #[arg(long, global = true, env = PROJECTS_DIR_ENV)]
    pub projects_dir: Option<PathBuf>,

    /// Maximum number of log files read at once
    #[arg(long, global = true, env = MAX_CONCURRENT_READS_ENV, default_value_t = DEFAULT_MAX_CONCURRENT_READS)]
    pub max_concurrent_reads: usize,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show every session tree with its forks and branch endpoints
    Trees {
        /// Directory of session logs, or a project id (default: current project)
        target: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the most advanced session of every branch
    Latest {
        /// Directory of session logs, or a project id (default: current project)
        target: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the newest continuation of a session
    Descendant {
        /// Project id or project path
        project: String,

        /// Session ID to start from
        session: String,
    },

    /// Print every record of a session, oldest first
    Messages {
        /// Project id or project path
        project: String,

        /// Session ID to look up
        session: String,

        /// Print raw JSON records
        #[arg(long)]
        json: bool,
    },

    /// List projects under the projects root
    Projects,

    /// Show what was parsed from a single log file
    Inspect {
        /// Path to a session log
        file: PathBuf,
    },
}
