//! # Syncguard - Commit Guard and Auto-Sync for Agent Workspaces
//!
//! Syncguard commits and pushes pending changes across a fixed, ordered list
//! of repositories, and blocks any commit to a guarded repository whose
//! staged changes look like leaked credentials.
//!
//! ## Features
//!
//! - **Secret-first**: staged file names and added diff lines are checked
//!   against a compiled-in rule table before a guarded commit is created
//! - **Multi-repo**: the active workspace and the shared configuration
//!   repository are synced independently; a block in one never stops the other
//! - **Convenience, not delivery**: push failures degrade to a local commit
//!   with a one-line report, never a retry loop
//!
//! ## Quick Start
//!
//! ```bash
//! # Install syncguard
//! cargo install syncguard
//!
//! # Commit and push everything pending
//! syncguard sync
//!
//! # Scan staged changes as a pre-commit hook
//! syncguard check
//! ```

pub mod cli;
pub mod config;
pub mod git;
pub mod scanner;
pub mod sync;

pub use cli::{Cli, Output};
pub use config::SyncConfig;

/// Result type alias for Syncguard operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
