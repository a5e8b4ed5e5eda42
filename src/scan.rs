//! Left-to-right split of the argument vector into per-scope segments.
//!
//! The scan finds which tokens belong to the global scope, which token names
//! the active command, and where its arguments start. It also rewrites
//! single-dash long flags (`-port 8090`, `-port=8090`) into the `--name=value`
//! form the tokenizer expects, so every flag arrives as one token.
//!
//! Rules, applied per scope:
//!
//! - Before the first positional token, a token starting with `-` is a flag.
//!   A non-switch flag written without `=` takes the next token as its value.
//!   `-`, `--` and `-<digit>...` are not flags.
//! - Any other token that equals a command's lowercase name or short name
//!   starts that command's segment; everything after it belongs to the child.
//! - `--` stops the scan. It and everything after it stay in this scope as
//!   raw leftovers, and no command is matched past it.

use tracing::trace;

use crate::command::Command;
use crate::flag::Flag;

/// The tokens of one scope, and the child scope they hand off to.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Segment {
    pub tokens: Vec<String>,
    /// Index of the matched command among the candidates, and its arguments.
    pub next: Option<(usize, Vec<String>)>,
}

fn is_flag_token(token: &str) -> bool {
    let Some(rest) = token.strip_prefix('-') else {
        return false;
    };
    match rest.chars().next() {
        None => false,
        Some(c) if c.is_ascii_digit() => false,
        Some('-') => rest.len() > 1,
        Some(_) => true,
    }
}

/// Split `-name`, `--name`, `-name=v` into `(name, Some(v))`.
fn split_flag(token: &str) -> (&str, Option<&str>) {
    let body = token
        .strip_prefix("--")
        .or_else(|| token.strip_prefix('-'))
        .unwrap_or(token);
    match body.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    }
}

fn lookup<'a>(flags: &'a [Flag], name: &str) -> Option<&'a Flag> {
    flags
        .iter()
        .find(|f| f.name() == name || f.short_name() == Some(name))
}

pub(crate) fn scan(tokens: &[String], flags: &[Flag], commands: &[Command]) -> Segment {
    let mut out = Vec::with_capacity(tokens.len());
    let mut positional = false;
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];

        if token == "--" {
            out.extend(tokens[i..].iter().cloned());
            break;
        }

        if !positional && is_flag_token(token) {
            let (name, value) = split_flag(token);
            let switch = lookup(flags, name).is_none_or(Flag::is_switch);
            match value {
                Some(v) => out.push(format!("--{name}={v}")),
                None if !switch && i + 1 < tokens.len() => {
                    out.push(format!("--{name}={}", tokens[i + 1]));
                    i += 1;
                }
                None => out.push(format!("--{name}")),
            }
            i += 1;
            continue;
        }

        if let Some(idx) = commands.iter().position(|c| c.matches_token(token)) {
            trace!(command = %commands[idx].name(), position = i, "matched command token");
            return Segment {
                tokens: out,
                next: Some((idx, tokens[i + 1..].to_vec())),
            };
        }

        positional = true;
        out.push(token.clone());
        i += 1;
    }

    Segment { tokens: out, next: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::Slot;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn scope() -> (Vec<Flag>, Vec<Command>) {
        let port = Slot::new(0i64);
        let debug = Slot::new(false);
        let flags: Vec<Flag> = vec![
            Flag::new("port", &port).short("p").into(),
            Flag::new("debug", &debug).short("d").into(),
        ];
        let commands = vec![
            Command::new("server").short("s"),
            Command::new("client"),
        ];
        (flags, commands)
    }

    #[test]
    fn rewrites_single_dash_flags() {
        let (flags, commands) = scope();
        let seg = scan(&args(&["-port", "8090", "-d", "-p=1"]), &flags, &commands);
        assert_eq!(seg.tokens, args(&["--port=8090", "--d", "--p=1"]));
        assert_eq!(seg.next, None);
    }

    #[test]
    fn switch_does_not_consume_next_token() {
        let (flags, commands) = scope();
        let seg = scan(&args(&["-debug", "server", "-port", "1"]), &flags, &commands);
        assert_eq!(seg.tokens, args(&["--debug"]));
        assert_eq!(seg.next, Some((0, args(&["-port", "1"]))));
    }

    #[test]
    fn flag_value_is_not_a_command() {
        let (_, commands) = scope();
        let name = Slot::new(String::new());
        let flags: Vec<Flag> = vec![Flag::new("name", &name).into()];
        let seg = scan(&args(&["-name", "client", "server"]), &flags, &commands);
        assert_eq!(seg.tokens, args(&["--name=client"]));
        assert_eq!(seg.next.map(|(idx, _)| idx), Some(0));
    }

    #[test]
    fn short_command_name_matches() {
        let (flags, commands) = scope();
        let seg = scan(&args(&["s"]), &flags, &commands);
        assert_eq!(seg.next, Some((0, Vec::new())));
    }

    #[test]
    fn flags_after_positional_are_left_alone() {
        let (flags, commands) = scope();
        let seg = scan(&args(&["file", "-port", "1"]), &flags, &commands);
        assert_eq!(seg.tokens, args(&["file", "-port", "1"]));
    }

    #[test]
    fn double_dash_stops_command_matching() {
        let (flags, commands) = scope();
        let seg = scan(&args(&["-d", "--", "server"]), &flags, &commands);
        assert_eq!(seg.tokens, args(&["--d", "--", "server"]));
        assert_eq!(seg.next, None);
    }

    #[test]
    fn negative_numbers_and_lone_dash_are_positional() {
        let (flags, commands) = scope();
        let seg = scan(&args(&["-5", "-"]), &flags, &commands);
        assert_eq!(seg.tokens, args(&["-5", "-"]));
    }

    #[test]
    fn trailing_non_switch_without_value_is_left_for_tokenizer() {
        let (flags, commands) = scope();
        let seg = scan(&args(&["-port"]), &flags, &commands);
        assert_eq!(seg.tokens, args(&["--port"]));
    }
}
