//! Version command implementation

use crate::cli::Output;
use anyhow::Result;
use std::process::ExitCode;

/// Execute the version command
pub fn execute(output: &Output) -> Result<ExitCode> {
    output.header(&format!("{} v{}", crate::PKG_NAME, crate::VERSION));
    output.key_value("Description:", crate::PKG_DESCRIPTION);
    output.key_value("Target:", std::env::consts::ARCH);
    output.key_value(
        "Profile:",
        if cfg!(debug_assertions) { "debug" } else { "release" },
    );
    Ok(ExitCode::SUCCESS)
}
