//! Adapter over clap's builder API.
//!
//! Each scope gets its own throwaway `clap::Command` built from the scope's
//! flags. clap splits the (already scanned) tokens and reports which flags
//! appeared on the command line; the raw values are then parsed by the flags
//! themselves so that every layer goes through the same typed parser.

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches};
use tracing::trace;

use crate::error::CliError;
use crate::flag::Flag;

/// Id of the positional that collects leftover tokens.
const ARGS: &str = "<args>";

fn build(scope: &str, flags: &[Flag]) -> clap::Command {
    let mut cmd = clap::Command::new(scope.to_string())
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .args_override_self(true);

    for flag in flags {
        let mut arg = Arg::new(flag.name().to_string())
            .long(flag.name().to_string())
            .action(ArgAction::Set);
        if let Some(short) = flag.short_name() {
            arg = arg.alias(short.to_string());
        }
        arg = if flag.is_switch() {
            arg.num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true")
        } else {
            arg.num_args(1)
        };
        cmd = cmd.arg(arg);
    }

    cmd.arg(
        Arg::new(ARGS)
            .value_name("ARGS")
            .num_args(1..)
            .action(ArgAction::Append)
            .trailing_var_arg(true)
            .allow_negative_numbers(true),
    )
}

fn seen_on_command_line(matches: &ArgMatches, id: &str) -> Option<String> {
    if matches.value_source(id) != Some(ValueSource::CommandLine) {
        return None;
    }
    matches.get_one::<String>(id).cloned()
}

/// Tokenize `tokens` against `flags`, apply every value the command line
/// supplied, and return the leftover positional tokens.
pub(crate) fn tokenize(
    scope: &str,
    flags: &mut [Flag],
    tokens: &[String],
) -> Result<Vec<String>, CliError> {
    trace!(scope, ?tokens, "tokenizing");
    let matches = build(scope, flags)
        .try_get_matches_from(tokens)
        .map_err(|source| CliError::Tokenize {
            scope: scope.to_string(),
            source,
        })?;

    for flag in flags.iter_mut() {
        if let Some(raw) = seen_on_command_line(&matches, flag.name()) {
            trace!(scope, flag = flag.name(), value = %raw, "command line value");
            flag.apply_cli(&raw)?;
        }
    }

    Ok(matches
        .get_many::<String>(ARGS)
        .map(|values| values.cloned().collect())
        .unwrap_or_default())
}
