//! # CLI Completions Command

use clap::Command;
use clap_complete::Shell;
use error::Result;

/// Writes shell completions for `cmd` to stdout
pub fn completions(shell: Shell, cmd: &mut Command) -> Result<()> {
    clap_complete::generate(shell, cmd, "prism", &mut std::io::stdout());
    Ok(())
}
