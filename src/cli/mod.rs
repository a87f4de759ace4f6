//! Command-line interface for Syncguard
//!
//! This module provides the main CLI structure and command handling.
//! It uses clap for argument parsing and keeps each command in its own module.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

pub mod commands;
mod output;

pub use output::Output;

/// Syncguard - Commit Guard and Auto-Sync for Agent Workspaces
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable quiet output (minimal)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Commit and push pending changes across all configured repositories
    Sync {
        /// Workspace repository to process first
        #[arg(short, long, env = "SYNCGUARD_WORKSPACE", value_name = "DIR")]
        workspace: Option<PathBuf>,
    },
    /// Scan staged changes for secrets without committing (pre-commit mode)
    Check {
        /// Repository to check (discovered from the current directory by default)
        path: Option<PathBuf>,
    },
    /// Print the compiled-in secret rule table
    Rules,
    /// Show version information
    Version,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<ExitCode> {
        // Initialize output handler with global verbose and quiet settings
        let output = Output::new(self.verbose, self.quiet);

        match self.command {
            Some(Commands::Sync { workspace }) => commands::sync::execute(workspace, &output),
            Some(Commands::Check { path }) => commands::check::execute(path, &output),
            Some(Commands::Rules) => commands::rules::execute(&output),
            Some(Commands::Version) => commands::version::execute(&output),
            None => {
                // Show help when no command is provided
                let mut cmd = Cli::command();
                cmd.print_help()?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}
