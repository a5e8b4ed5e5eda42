//! Pluggable reporting hooks.
//!
//! [`NoticeAdapter`] receives advisory notices (missing required flags).
//! [`UsageAdapter`] renders a command's help text. Both have defaults that
//! write plain text; applications swap them to change wording or destination,
//! and tests swap them to record calls.

use std::io::{self, Write};
use std::rc::Rc;

use crate::command::Command;
use crate::usage;

/// Receives advisory notices raised during resolution.
pub trait NoticeAdapter {
    /// A required global flag was not supplied by any layer.
    fn required_flag(&self, name: &str);

    /// A required flag of the active command or subcommand was not supplied.
    fn required_flag_in(&self, name: &str, command: &str);
}

/// Writes notices to standard error.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrNotices;

impl NoticeAdapter for StderrNotices {
    fn required_flag(&self, name: &str) {
        eprintln!("required flag '-{name}' not set");
    }

    fn required_flag_in(&self, name: &str, command: &str) {
        eprintln!("required flag '-{name}' not set on sub-command: {command}");
    }
}

impl<A: NoticeAdapter + ?Sized> NoticeAdapter for Rc<A> {
    fn required_flag(&self, name: &str) {
        (**self).required_flag(name);
    }

    fn required_flag_in(&self, name: &str, command: &str) {
        (**self).required_flag_in(name, command);
    }
}

/// Renders help for a single command or subcommand.
pub trait UsageAdapter {
    fn command_usage(&self, command: &Command, out: &mut dyn Write) -> io::Result<()>;
}

/// The built-in `Usage of <cmd>:` layout.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultUsage;

impl UsageAdapter for DefaultUsage {
    fn command_usage(&self, command: &Command, out: &mut dyn Write) -> io::Result<()> {
        usage::write_command_usage(command, out)
    }
}

impl<A: UsageAdapter + ?Sized> UsageAdapter for Rc<A> {
    fn command_usage(&self, command: &Command, out: &mut dyn Write) -> io::Result<()> {
        (**self).command_usage(command, out)
    }
}
