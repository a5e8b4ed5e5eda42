//! Definition checks, registration and shared-slot diagnostics.
//!
//! Names are checked before anything touches the tokenizer, so a badly
//! declared CLI fails with a [`CliError`] instead of a tokenizer assertion.

use std::collections::HashMap;

use crate::command::Command;
use crate::error::CliError;
use crate::flag::Flag;
use crate::types::{Presence, SharedSlot};

fn check_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("name is empty".into());
    }
    if name.starts_with('-') {
        return Err("name must not start with '-'".into());
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        return Err(format!("'{c}' is not allowed; use letters, digits, '_' or '-'"));
    }
    Ok(())
}

/// Check one flag scope: well-formed names and no name or short name used
/// twice, across both namespaces.
pub(crate) fn check_flags(flags: &[Flag], scope: &str) -> Result<(), CliError> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for flag in flags {
        let mut names = vec![flag.name()];
        names.extend(flag.short_name());
        for name in names {
            check_name(name).map_err(|reason| CliError::InvalidFlag {
                name: name.to_string(),
                reason,
            })?;
            if let Some(owner) = seen.insert(name, flag.name()) {
                return Err(CliError::InvalidFlag {
                    name: name.to_string(),
                    reason: format!("already used by '-{owner}' in {scope}"),
                });
            }
        }
    }
    Ok(())
}

/// Check sibling commands, their flags, and the one-level nesting rule.
pub(crate) fn check_commands(commands: &[Command], parent: Option<&str>) -> Result<(), CliError> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for cmd in commands {
        let mut names = vec![cmd.name()];
        names.extend(cmd.short_name());
        for name in names {
            check_name(name).map_err(|reason| CliError::InvalidCommand {
                name: name.to_string(),
                reason,
            })?;
            if let Some(owner) = seen.insert(name.to_lowercase(), cmd.name()) {
                return Err(CliError::InvalidCommand {
                    name: name.to_string(),
                    reason: format!("already used by command '{owner}'"),
                });
            }
        }

        let scope = match parent {
            Some(p) => format!("command '{p} {}'", cmd.name()),
            None => format!("command '{}'", cmd.name()),
        };
        check_flags(cmd.flags(), &scope)?;

        match parent {
            Some(_) if !cmd.subcommands().is_empty() => {
                return Err(CliError::InvalidCommand {
                    name: cmd.name().to_string(),
                    reason: "subcommands cannot have subcommands".into(),
                });
            }
            Some(_) => {}
            None => check_commands(cmd.subcommands(), Some(cmd.name()))?,
        }
    }
    Ok(())
}

/// Record the owning command and write every sentinel default.
pub(crate) fn register(flags: &mut [Flag], command: &str, presence: Presence) {
    for flag in flags {
        flag.set_command(command);
        flag.register(presence);
    }
}

/// Walk global, command and subcommand flags in declaration order.
pub(crate) fn for_each_flag<'a>(
    global: &'a [Flag],
    commands: &'a [Command],
    mut f: impl FnMut(&'a Flag),
) {
    global.iter().for_each(&mut f);
    for cmd in commands {
        cmd.flags().iter().for_each(&mut f);
        for sub in cmd.subcommands() {
            sub.flags().iter().for_each(&mut f);
        }
    }
}

/// Groups of flags bound to the same storage cell.
pub(crate) fn shared_slots(global: &[Flag], commands: &[Command]) -> Vec<SharedSlot> {
    let mut order: Vec<usize> = Vec::new();
    let mut uses: HashMap<usize, Vec<(String, String)>> = HashMap::new();

    for_each_flag(global, commands, |flag| {
        let id = flag.slot_id();
        let entry = uses.entry(id).or_default();
        if entry.is_empty() {
            order.push(id);
        }
        entry.push((flag.command().to_string(), flag.name().to_string()));
    });

    order
        .into_iter()
        .filter_map(|id| uses.remove(&id))
        .filter(|u| u.len() > 1)
        .map(|uses| SharedSlot { uses })
        .collect()
}
