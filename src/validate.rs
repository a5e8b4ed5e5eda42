//! Post-resolution checks.
//!
//! Two passes with different failure shapes:
//!
//! - The required check is exhaustive. Every missing flag in the scope is
//!   collected so the user sees all of them at once.
//! - The allow-list check stops at the first invalid flag and returns a
//!   structured [`CliError::InvalidValue`].

use crate::error::CliError;
use crate::flag::Flag;
use crate::types::MissingFlag;

/// Every required flag in `flags` that no layer supplied.
pub(crate) fn missing_required(flags: &[Flag], command: Option<&str>) -> Vec<MissingFlag> {
    flags
        .iter()
        .filter(|f| f.is_required_and_unset())
        .map(|f| MissingFlag {
            name: f.name().to_string(),
            command: command.map(str::to_string),
        })
        .collect()
}

/// The first flag whose resolved value is outside its allow-list.
pub(crate) fn first_invalid(flags: &[Flag]) -> Result<(), CliError> {
    match flags.iter().find(|f| !f.is_valid()) {
        Some(flag) => Err(CliError::InvalidValue {
            field: flag.name().to_string(),
            value: flag.value_string(),
            options: flag.options(),
        }),
        None => Ok(()),
    }
}
