//! The resolution pipeline behind [`Cli::parse_from`].
//!
//! One call walks these steps in order:
//!
//! 1. Inject reserved flags, check every name, compute environment names.
//! 2. Register every flag in every scope (write sentinel defaults).
//! 3. Scan the arguments into global, command and subcommand segments.
//! 4. Tokenize the global segment, then overlay the environment.
//! 5. Run the post-global action. Print the version and stop if requested.
//! 6. Tokenize the active command and subcommand, each followed by its
//!    environment overlay.
//! 7. Overlay the config file onto the active chain and bind sections.
//! 8. Required check of the global scope. Any miss ends resolution and is
//!    reported together with misses in the active command chain.
//! 9. Completion, then help, each ending resolution.
//! 10. Required check of the active command chain (exhaustive), then the
//!     allow-list check (first failure).
//! 11. Dispatch: pre-action, action, post-action of the deepest active
//!     command, or the main action when no command matched.
//!
//! Inactive commands are registered but never tokenized or overlaid, so their
//! flags keep their defaults.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use tracing::{debug, warn};

use crate::cli::Cli;
use crate::command::{Action, Command};
use crate::completion;
use crate::config::{self, ConfigTree};
use crate::defaults;
use crate::env;
use crate::error::CliError;
use crate::flag::Flag;
use crate::registry;
use crate::scan::{self, Segment};
use crate::tokenize;
use crate::types::{Context, ExitPolicy, MissingFlag, Outcome};
use crate::usage;
use crate::validate;

/// Scan result for the whole argument vector.
struct Segments {
    global: Segment,
    command: Option<(usize, Segment)>,
    subcommand: Option<(usize, Segment)>,
}

fn run_action(action: Option<&mut Action>, ctx: &Context, label: &str) -> Result<(), CliError> {
    match action {
        Some(action) => action(ctx).map_err(|source| CliError::Action {
            command: label.to_string(),
            source,
        }),
        None => Ok(()),
    }
}

fn program_name(argv0: &str) -> Option<String> {
    Path::new(argv0)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}

fn dump_flags(scope: &str, flags: &[Flag]) {
    for flag in flags {
        debug!(scope, flag = flag.name(), value = %flag.value_string(), "resolved flag");
    }
}

impl Cli {
    /// Resolve `std::env::args()`.
    pub fn parse(&mut self) -> Result<Outcome, CliError> {
        self.parse_from(std::env::args())
    }

    /// Resolve `args`. The first element is the program name.
    ///
    /// Under [`ExitPolicy::Exit`], advisory-fatal outcomes (help, completion,
    /// missing required flags) end the process with status 1 instead of
    /// returning.
    pub fn parse_from<I, T>(&mut self, args: I) -> Result<Outcome, CliError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        self.program = args
            .next()
            .as_deref()
            .and_then(program_name)
            .unwrap_or_else(|| self.name.clone());
        let tokens: Vec<String> = args.collect();

        let result = self.resolve(&tokens);
        if let Ok(outcome) = &result
            && outcome.is_advisory_fatal()
            && self.exit_policy == ExitPolicy::Exit
        {
            let _ = self.out.flush();
            std::process::exit(1);
        }
        result
    }

    fn resolve(&mut self, tokens: &[String]) -> Result<Outcome, CliError> {
        self.active = None;
        self.args.clear();
        self.shared.clear();

        self.prepare()?;
        let segments = self.scan(tokens);
        self.active = segments
            .command
            .as_ref()
            .map(|(ci, _)| (*ci, segments.subcommand.as_ref().map(|(si, _)| *si)));

        // Global scope.
        let vars = self.environment();
        let global_args = tokenize::tokenize("global", &mut self.flags, &segments.global.tokens)?;
        env::overlay(&mut self.flags, &vars, "global")?;
        self.args = global_args.clone();

        if self.is_debug() {
            dump_flags("global", &self.flags);
        }
        let ctx = self.context();
        run_action(self.post_global_action.as_mut(), &ctx, "global")?;

        if self.version_requested() {
            self.print_version()?;
            return Ok(Outcome::Version);
        }

        // Active command chain.
        if let Some((ci, seg)) = &segments.command {
            let cmd = &mut self.commands[*ci];
            self.args = tokenize::tokenize(&cmd.name, &mut cmd.flags, &seg.tokens)?;
            env::overlay(&mut cmd.flags, &vars, &cmd.name)?;
            debug!(command = %cmd.name, "active command");

            if let Some((si, sseg)) = &segments.subcommand {
                let sub = &mut cmd.subcommands[*si];
                self.args = tokenize::tokenize(&sub.name, &mut sub.flags, &sseg.tokens)?;
                env::overlay(&mut sub.flags, &vars, &sub.name)?;
                debug!(command = %cmd.name, subcommand = %sub.name, "active subcommand");
            }
        }

        self.overlay_config()?;

        // A missing global flag ends resolution before completion or help.
        // The active chain is checked too so every violation is reported.
        let mut missing = validate::missing_required(&self.flags, None);
        if !missing.is_empty() {
            missing.extend(self.missing_in_active());
        }
        if let Some(outcome) = self.report_missing(missing) {
            return Ok(outcome);
        }

        if let Some(outcome) = self.completion(&global_args)? {
            return Ok(outcome);
        }
        if let Some(outcome) = self.help()? {
            return Ok(outcome);
        }

        if self.shared_slot_check {
            for group in &self.shared {
                let uses: Vec<String> = group
                    .uses
                    .iter()
                    .map(|(cmd, flag)| {
                        if cmd.is_empty() {
                            format!("-{flag}")
                        } else {
                            format!("{cmd} -{flag}")
                        }
                    })
                    .collect();
                warn!(count = group.uses.len(), uses = %uses.join(", "), "flags share one storage cell");
            }
        }

        if let Some(outcome) = self.report_missing(self.missing_in_active()) {
            return Ok(outcome);
        }
        self.check_valid()?;

        if self.is_debug()
            && let Some((cmd, sub)) = self.active_scopes()
        {
            dump_flags(&cmd.name, &cmd.flags);
            if let Some(sub) = sub {
                dump_flags(&sub.name, &sub.flags);
            }
        }

        self.dispatch()
    }

    /// Steps 1 and 2: defaults, definition checks, env names, registration.
    fn prepare(&mut self) -> Result<(), CliError> {
        let config_default = self.config_default();
        defaults::inject_global(&mut self.flags, &config_default, self.completion_enabled);
        for cmd in &mut self.commands {
            defaults::inject_command(cmd, self.completion_enabled);
        }

        registry::check_flags(&self.flags, "global scope")?;
        registry::check_commands(&self.commands, None)?;

        let prefix = self.env_enabled.then_some(self.env_prefix.as_str());
        let presence = self.presence;
        env::assign_names(&mut self.flags, prefix);
        registry::register(&mut self.flags, "", presence);
        for cmd in &mut self.commands {
            env::assign_names(&mut cmd.flags, prefix);
            registry::register(&mut cmd.flags, &cmd.name, presence);
            for sub in &mut cmd.subcommands {
                env::assign_names(&mut sub.flags, prefix);
                registry::register(&mut sub.flags, &sub.name, presence);
            }
        }

        self.shared = registry::shared_slots(&self.flags, &self.commands);
        Ok(())
    }

    fn scan(&self, tokens: &[String]) -> Segments {
        let global = scan::scan(tokens, &self.flags, &self.commands);
        let mut command = None;
        let mut subcommand = None;

        if let Some((ci, rest)) = &global.next {
            let cmd = &self.commands[*ci];
            let seg = scan::scan(rest, &cmd.flags, &cmd.subcommands);
            if let Some((si, rest)) = &seg.next {
                let sub = &cmd.subcommands[*si];
                subcommand = Some((*si, scan::scan(rest, &sub.flags, &[])));
            }
            command = Some((*ci, seg));
        }

        Segments {
            global,
            command,
            subcommand,
        }
    }

    fn environment(&self) -> HashMap<String, String> {
        if !self.env_enabled {
            return HashMap::new();
        }
        match &self.env_vars {
            Some(vars) => vars.clone(),
            None => std::env::vars().collect(),
        }
    }

    fn config_default(&self) -> String {
        if !self.platform_config {
            return String::new();
        }
        directories::ProjectDirs::from("", "", &self.name)
            .map(|dirs| {
                dirs.config_dir()
                    .join(format!("{}.toml", self.name))
                    .display()
                    .to_string()
            })
            .unwrap_or_default()
    }

    fn print_version(&mut self) -> Result<(), CliError> {
        match &mut self.version_action {
            Some(action) => action(&self.info, &mut *self.out)?,
            None => writeln!(
                self.out,
                "version={} build={} revision={}",
                self.info.version, self.info.build_date, self.info.git_commit
            )?,
        }
        Ok(())
    }

    fn active_scopes(&self) -> Option<(&Command, Option<&Command>)> {
        let (ci, si) = self.active?;
        let cmd = self.commands.get(ci)?;
        Some((cmd, si.and_then(|si| cmd.subcommands.get(si))))
    }

    fn overlay_config(&mut self) -> Result<(), CliError> {
        let raw = self.config_path();
        let Some(path) = config::resolve_path(&raw) else {
            return Ok(());
        };
        let Some(tree) = ConfigTree::load(&path)? else {
            if self.flag_named(defaults::CONFIG).is_some_and(Flag::is_set) {
                warn!(path = %path.display(), "config file not found");
            } else {
                debug!(path = %path.display(), "no config file");
            }
            return Ok(());
        };
        debug!(path = %path.display(), "loaded config file");

        config::overlay(&mut self.flags, &[], &tree)?;
        if let Some((ci, si)) = self.active {
            let cmd = &mut self.commands[ci];
            config::overlay(&mut cmd.flags, &[cmd.name.as_str()], &tree)?;
            if let Some(si) = si {
                let sub = &mut cmd.subcommands[si];
                config::overlay(&mut sub.flags, &[cmd.name.as_str(), sub.name.as_str()], &tree)?;
            }
        }
        config::bind_sections(&self.commands, &tree)
    }

    fn completion(&mut self, global_args: &[String]) -> Result<Option<Outcome>, CliError> {
        let global = self
            .flag_named(defaults::COMPLETION)
            .is_some_and(|f| f.value_string() == "true");
        if global {
            completion::write_global(&self.flags, &self.commands, global_args, &mut *self.out)?;
            return Ok(Some(Outcome::Completion));
        }

        let Some((ci, si)) = self.active else {
            return Ok(None);
        };
        let cmd = &self.commands[ci];
        let target = si.map_or(cmd, |si| &cmd.subcommands[si]);
        if target.completion_requested() {
            completion::write_command(target, &self.args, &mut *self.out)?;
            return Ok(Some(Outcome::Completion));
        }
        Ok(None)
    }

    fn help(&mut self) -> Result<Option<Outcome>, CliError> {
        if self.help_requested() {
            usage::write_global_usage(&self.program, &self.flags, &self.commands, &mut *self.out)?;
            return Ok(Some(Outcome::Help));
        }

        let Some((ci, si)) = self.active else {
            return Ok(None);
        };
        let cmd = &self.commands[ci];
        let target = si.map_or(cmd, |si| &cmd.subcommands[si]);
        if target.help_requested() {
            self.usage.command_usage(target, &mut *self.out)?;
            return Ok(Some(Outcome::Help));
        }
        Ok(None)
    }

    /// Required flags still unset in the active command and subcommand.
    fn missing_in_active(&self) -> Vec<MissingFlag> {
        let mut missing = Vec::new();
        if let Some((cmd, sub)) = self.active_scopes() {
            missing.extend(validate::missing_required(&cmd.flags, Some(&cmd.name)));
            if let Some(sub) = sub {
                missing.extend(validate::missing_required(&sub.flags, Some(&sub.name)));
            }
        }
        missing
    }

    /// Report every entry to the notice adapter. `None` when nothing is
    /// missing.
    fn report_missing(&self, missing: Vec<MissingFlag>) -> Option<Outcome> {
        if missing.is_empty() {
            return None;
        }
        for m in &missing {
            match &m.command {
                Some(command) => self.notices.required_flag_in(&m.name, command),
                None => self.notices.required_flag(&m.name),
            }
        }
        Some(Outcome::MissingRequired(missing))
    }

    fn check_valid(&self) -> Result<(), CliError> {
        validate::first_invalid(&self.flags)?;
        if let Some((cmd, sub)) = self.active_scopes() {
            validate::first_invalid(&cmd.flags)?;
            if let Some(sub) = sub {
                validate::first_invalid(&sub.flags)?;
            }
        }
        Ok(())
    }

    fn dispatch(&mut self) -> Result<Outcome, CliError> {
        let ctx = self.context();

        let Some((ci, si)) = self.active else {
            if self.main_action.is_some() {
                run_action(self.main_action.as_mut(), &ctx, "main")?;
                return Ok(Outcome::MainAction);
            }
            writeln!(self.out, "!!! no command set to run")?;
            return Ok(Outcome::NoCommand);
        };

        let cmd = &mut self.commands[ci];
        let command = cmd.name.clone();
        let subcommand = si.map(|si| cmd.subcommands[si].name.clone());
        let target = match si {
            Some(si) => &mut cmd.subcommands[si],
            None => cmd,
        };
        let label = match &subcommand {
            Some(sub) => format!("{command} {sub}"),
            None => command.clone(),
        };

        run_action(target.pre_action.as_mut(), &ctx, &label)?;

        if target.action.is_none() {
            if target.subcommands.is_empty() {
                return Err(CliError::NoAction { command: label });
            }
            let mut listing = format!("No action on {} command\n - SubCommands available:\n", target.name);
            for sub in &target.subcommands {
                listing.push_str(&format!("\t{}\n", sub.name));
            }
            self.out.write_all(listing.as_bytes())?;
            return Ok(Outcome::SubcommandsListed { command: label });
        }

        run_action(target.action.as_mut(), &ctx, &label)?;
        run_action(target.post_action.as_mut(), &ctx, &label)?;

        Ok(Outcome::Dispatched {
            command,
            subcommand,
        })
    }
}
