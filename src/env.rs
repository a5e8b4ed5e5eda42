//! Environment variable naming and overlay.
//!
//! Every flag that is not excluded gets one canonical variable name:
//! `UPPER(prefix + "_" + name)`, where `name` is the flag's override or its
//! own name, and the prefix part is dropped when the prefix is empty. Flags
//! declared with an exact name use it verbatim.
//!
//! The overlay reads from a map rather than `std::env` directly so tests can
//! pass synthetic data.

use std::collections::HashMap;

use tracing::debug;

use crate::error::CliError;
use crate::flag::Flag;

/// Canonical variable name for `name` under `prefix`.
pub fn env_var_name(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_uppercase()
    } else {
        format!("{prefix}_{name}").to_uppercase()
    }
}

/// Compute each flag's variable. `prefix` is `None` when environment lookup
/// is disabled, which clears every name.
pub(crate) fn assign_names(flags: &mut [Flag], prefix: Option<&str>) {
    for flag in flags {
        let name = match prefix {
            Some(_) if flag.env_excluded() => None,
            Some(_) if flag.env_exact() => flag.env_override().map(str::to_string),
            Some(prefix) => Some(env_var_name(
                prefix,
                flag.env_override().unwrap_or(flag.name()),
            )),
            None => None,
        };
        flag.set_env_var(name);
    }
}

/// Fill every still-unset flag in `flags` from its variable. Empty values are
/// skipped. A value that does not parse is an error naming the variable.
pub(crate) fn overlay(
    flags: &mut [Flag],
    vars: &HashMap<String, String>,
    scope: &str,
) -> Result<(), CliError> {
    for flag in flags {
        let Some(var) = flag.env_var().map(str::to_string) else {
            continue;
        };
        let Some(raw) = vars.get(&var).filter(|v| !v.is_empty()) else {
            continue;
        };
        if flag.apply_env(&var, raw)? {
            debug!(scope, flag = flag.name(), var = %var, value = %raw, "applied environment value");
        }
    }
    Ok(())
}
