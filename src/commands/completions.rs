use std::io;

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{
    generate,
    shells::{Bash, Elvish, Fish, PowerShell, Zsh},
};

use crate::Cli;

pub fn run(shell: String) -> Result<()> {
    let mut cmd = Cli::command();
    let out = &mut io::stdout();
    match shell.as_str() {
        "bash" => generate(Bash, &mut cmd, "glctl", out),
        "zsh" => generate(Zsh, &mut cmd, "glctl", out),
        "fish" => generate(Fish, &mut cmd, "glctl", out),
        "powershell" => generate(PowerShell, &mut cmd, "glctl", out),
        "elvish" => generate(Elvish, &mut cmd, "glctl", out),
        other => anyhow::bail!(
            "unsupported shell '{}', choose: bash, zsh, fish, powershell, elvish",
            other
        ),
    }
    Ok(())
}
