//! Help text.
//!
//! The global page lists global options, then each visible command with its
//! flags and subcommands. A command page lists that command's subcommands and
//! flags. Hidden flags and commands are left out of both.

use std::io::{self, Write};

use crate::command::Command;
use crate::flag::Flag;

/// Indentation for one nesting level of the global page.
struct Layout {
    name: &'static str,
    env: &'static str,
    options: &'static str,
    usage: &'static str,
}

const GLOBAL: Layout = Layout {
    name: "  ",
    env: "\n    ",
    options: "\n    \tOptions: ",
    usage: "\n    \t",
};

const COMMAND: Layout = Layout {
    name: "      ",
    env: "\n        ",
    options: "\n        \tOptions: ",
    usage: "\n    \t  ",
};

const SUBCOMMAND: Layout = Layout {
    name: "        ",
    env: "\n          ",
    options: "\n    \t    Options: ",
    usage: "\n    \t    ",
};

/// Widths that decide how far `(REQUIRED_FLAG)` is tabbed out.
const REQUIRED_NARROW: usize = 28;
const REQUIRED_WIDE: usize = 29;

fn flag_head(flag: &Flag, indent: &str) -> String {
    let mut s = match flag.short_name() {
        Some(short) => format!("{indent}-{}, -{short}", flag.name()),
        None => format!("{indent}-{}", flag.name()),
    };
    let label = flag.type_label();
    if !label.is_empty() {
        s.push_str("  ");
        s.push_str(label);
    }
    s
}

fn options_text(flag: &Flag) -> Option<String> {
    let options = flag.options();
    if options.is_empty() {
        None
    } else {
        Some(format!("[{}]", options.join(" ")))
    }
}

fn default_text(flag: &Flag) -> String {
    let default = flag.default_string();
    if default.is_empty() {
        String::new()
    } else {
        format!(" (default {default})")
    }
}

fn flag_entry(flag: &Flag, layout: &Layout) -> String {
    let mut s = flag_head(flag, layout.name);
    if flag.is_required() {
        let pad = if s.len() < REQUIRED_NARROW {
            "\t\t"
        } else if s.len() <= REQUIRED_WIDE {
            "\t"
        } else {
            "  "
        };
        s.push_str(pad);
        s.push_str("(REQUIRED_FLAG)");
    }
    if let Some(var) = flag.env_var() {
        s.push_str(&format!("{}{var}\t(as environment var)", layout.env));
    }
    if let Some(options) = options_text(flag) {
        s.push_str(layout.options);
        s.push_str(&options);
    }
    s.push_str(layout.usage);
    s.push_str(&flag.usage().replace('\n', "\n    \t"));
    s.push_str(&default_text(flag));
    s.push_str("\n\n");
    s
}

/// Render the global page for `program`.
pub(crate) fn write_global_usage(
    program: &str,
    flags: &[Flag],
    commands: &[Command],
    out: &mut dyn Write,
) -> io::Result<()> {
    let mut page = String::new();
    page.push_str(&format!("NAME:\n  {program}\n\n"));
    page.push_str(&format!(
        "USAGE:\n  {program} [global options] command [command options] [arguments...]\n\n"
    ));

    if !flags.is_empty() {
        page.push_str("GLOBAL OPTIONS:\n");
        for flag in flags.iter().filter(|f| !f.is_hidden()) {
            page.push_str(&flag_entry(flag, &GLOBAL));
        }
        page.push('\n');
    }

    let visible: Vec<&Command> = commands.iter().filter(|c| !c.is_hidden()).collect();
    if !visible.is_empty() {
        page.push_str("COMMANDS:\n");
        for cmd in visible {
            page.push_str(&format!("  {}", cmd.name().to_lowercase()));
            if !cmd.usage_text().is_empty() {
                page.push_str(&format!(":    ({})", cmd.usage_text().to_lowercase()));
            }
            page.push('\n');
            for flag in cmd.flags().iter().filter(|f| !f.is_hidden()) {
                page.push_str(&flag_entry(flag, &COMMAND));
            }

            let subs: Vec<&Command> = cmd.subcommands().iter().filter(|s| !s.is_hidden()).collect();
            if !subs.is_empty() {
                page.push_str("    \n    Sub Commands:\n");
            }
            for sub in subs {
                page.push_str(&format!(
                    "      {} :\t{}\n",
                    sub.name().to_lowercase(),
                    sub.usage_text().to_lowercase()
                ));
                for flag in sub.flags().iter().filter(|f| !f.is_hidden()) {
                    page.push_str(&flag_entry(flag, &SUBCOMMAND));
                }
            }
        }
        page.push('\n');
    }

    out.write_all(page.as_bytes())
}

/// Render the page for one command or subcommand.
pub(crate) fn write_command_usage(command: &Command, out: &mut dyn Write) -> io::Result<()> {
    let mut page = format!("Usage of {}:\t({})\n", command.name(), command.usage_text());
    let subs: Vec<&str> = command
        .subcommands()
        .iter()
        .filter(|s| !s.is_hidden())
        .map(Command::name)
        .collect();
    if !subs.is_empty() {
        page.push_str(&format!("  {}\n", subs.join(",  ")));
    }

    for flag in command.flags().iter().filter(|f| !f.is_hidden()) {
        let mut s = flag_head(flag, "      ");
        if let Some(options) = options_text(flag) {
            s.push_str("\n    \tOptions: ");
            s.push_str(&options);
        }
        s.push_str("\n    \t");
        s.push_str(&flag.usage().replace('\n', "\n    \t"));
        s.push_str(&default_text(flag));
        s.push('\n');
        page.push_str(&s);
    }
    page.push('\n');

    out.write_all(page.as_bytes())
}
