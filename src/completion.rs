//! Shell completion listings.
//!
//! Invoked with the hidden `-generate-bash-completion` flag, the CLI prints
//! one candidate per line for the current scope and stops. Nothing is printed
//! when positional arguments are left over, since the shell is then completing
//! a value rather than a flag or command.

use std::io::{self, Write};

use crate::command::Command;
use crate::defaults;
use crate::flag::Flag;

/// Candidates at the global scope: visible flags, then visible commands.
pub(crate) fn write_global(
    flags: &[Flag],
    commands: &[Command],
    leftovers: &[String],
    out: &mut dyn Write,
) -> io::Result<()> {
    if !leftovers.is_empty() {
        return Ok(());
    }
    for flag in flags {
        let name = flag.name().to_lowercase();
        if !flag.is_hidden() {
            writeln!(out, "-{name}")?;
        } else if flag.name() == defaults::VERSION {
            writeln!(out, "-v,-version")?;
        }
    }
    for cmd in commands.iter().filter(|c| !c.is_hidden()) {
        writeln!(out, "{}", cmd.name().to_lowercase())?;
    }
    Ok(())
}

/// Candidates inside a command: visible subcommands, then its flags.
pub(crate) fn write_command(
    command: &Command,
    leftovers: &[String],
    out: &mut dyn Write,
) -> io::Result<()> {
    if !leftovers.is_empty() {
        return Ok(());
    }
    for sub in command.subcommands().iter().filter(|s| !s.is_hidden()) {
        writeln!(out, "{}", sub.name().to_lowercase())?;
    }
    for flag in command.flags() {
        if flag.name() == defaults::HELP {
            writeln!(out, "-h,-help")?;
        } else if !flag.is_hidden() {
            writeln!(out, "-{}", flag.name().to_lowercase())?;
        }
    }
    Ok(())
}
