//! Reserved flags every CLI carries.
//!
//! Before resolution the global scope receives `-help`, `-debug`,
//! `-debugLevel`, `-version`, `-config` and the proxy triplet, unless the
//! application already declared a flag with that name. Every command and
//! subcommand receives its own `-help`, and every scope receives the hidden
//! completion flag when completion is enabled.
//!
//! Injection is idempotent: a scope that already holds a reserved name is left
//! alone, so running it twice changes nothing.

use crate::command::Command;
use crate::flag::Flag;
use crate::slot::Slot;

pub(crate) const HELP: &str = "help";
pub(crate) const DEBUG: &str = "debug";
pub(crate) const DEBUG_LEVEL: &str = "debugLevel";
pub(crate) const VERSION: &str = "version";
pub(crate) const CONFIG: &str = "config";
pub(crate) const HTTP_PROXY: &str = "proxyhttp";
pub(crate) const HTTPS_PROXY: &str = "proxyhttps";
pub(crate) const NO_PROXY: &str = "noproxy";
pub(crate) const COMPLETION: &str = "generate-bash-completion";

fn declared(flags: &[Flag], name: &str) -> bool {
    flags.iter().any(|f| f.name() == name)
}

/// A short name is free when no flag in the scope uses it as a name or alias.
fn short_free(flags: &[Flag], short: &str) -> bool {
    !flags
        .iter()
        .any(|f| f.name() == short || f.short_name() == Some(short))
}

fn with_short<B>(builder: B, short: &str, flags: &[Flag], apply: impl FnOnce(B, &str) -> B) -> B {
    if short_free(flags, short) {
        apply(builder, short)
    } else {
        builder
    }
}

/// Insert the reserved global flags that are not already declared.
///
/// Missing defaults are placed ahead of the application's own flags, in the
/// order help, debug, debugLevel, version, config, proxies. The completion
/// flag goes last.
pub(crate) fn inject_global(flags: &mut Vec<Flag>, config_default: &str, completion: bool) {
    let mut reserved: Vec<Flag> = Vec::new();

    if !declared(flags, HELP) {
        let b = Flag::new(HELP, &Slot::new(false))
            .usage("print commands")
            .no_env()
            .hidden();
        reserved.push(with_short(b, "h", flags, |b, s| b.short(s)).into());
    }
    if !declared(flags, DEBUG) {
        let b = Flag::new(DEBUG, &Slot::new(false))
            .usage("flag set to debug")
            .no_env();
        reserved.push(with_short(b, "d", flags, |b, s| b.short(s)).into());
    }
    if !declared(flags, DEBUG_LEVEL) {
        let b = Flag::new(DEBUG_LEVEL, &Slot::new(0i64))
            .usage("set debug level")
            .env("DEBUG_LEVEL");
        reserved.push(with_short(b, "dbglvl", flags, |b, s| b.short(s)).into());
    }
    if !declared(flags, VERSION) {
        let b = Flag::new(VERSION, &Slot::new(false))
            .usage("flag to show version")
            .no_env()
            .hidden();
        reserved.push(with_short(b, "v", flags, |b, s| b.short(s)).into());
    }
    if !declared(flags, CONFIG) {
        let b = Flag::new(CONFIG, &Slot::new(String::new()))
            .usage("config file path")
            .default(config_default)
            .env("config_filepath");
        reserved.push(with_short(b, "c", flags, |b, s| b.short(s)).into());
    }
    if !declared(flags, HTTP_PROXY) {
        for (name, var, usage) in [
            (HTTP_PROXY, "HTTP_PROXY", "Sets http_proxy for network connections"),
            (HTTPS_PROXY, "HTTPS_PROXY", "Sets https_proxy for network connections"),
            (NO_PROXY, "NO_PROXY", "Sets no_proxy for network connections"),
        ] {
            if !declared(flags, name) {
                reserved.push(
                    Flag::new(name, &Slot::new(String::new()))
                        .usage(usage)
                        .env_exact(var)
                        .into(),
                );
            }
        }
    }

    if !reserved.is_empty() {
        reserved.append(flags);
        *flags = reserved;
    }

    if completion {
        inject_completion(flags);
    }
}

/// Give `command` and each of its subcommands a `-help` flag and, when
/// enabled, the completion flag.
pub(crate) fn inject_command(command: &mut Command, completion: bool) {
    if !declared(&command.flags, HELP) {
        let b = Flag::new(HELP, &Slot::new(false))
            .usage("print commands")
            .no_env();
        let flag = with_short(b, "h", &command.flags, |b, s| b.short(s)).into();
        command.flags.push(flag);
    }
    if completion {
        inject_completion(&mut command.flags);
    }
    for sub in &mut command.subcommands {
        inject_command(sub, completion);
    }
}

fn inject_completion(flags: &mut Vec<Flag>) {
    if declared(flags, COMPLETION) {
        return;
    }
    flags.push(
        Flag::new(COMPLETION, &Slot::new(false))
            .usage("provides bash completion")
            .no_env()
            .hidden()
            .into(),
    );
}
