//! The CLI root: builder surface and post-parse accessors.
//!
//! ```ignore
//! let port = Slot::new(0i64);
//! let mut cli = Cli::new("myapp")
//!     .env_prefix("MYAPP")
//!     .command(
//!         Command::new("server")
//!             .flag(Flag::new("port", &port).default(8080).required())
//!             .action(|_| Ok(())),
//!     );
//! let outcome = cli.parse()?;
//! ```
//!
//! Resolution itself lives in [`resolve`](crate::resolve).

use std::collections::HashMap;
use std::io::{self, Write};

use crate::command::{Action, ActionError, Command};
use crate::defaults;
use crate::flag::Flag;
use crate::notice::{DefaultUsage, NoticeAdapter, StderrNotices, UsageAdapter};
use crate::types::{AppInfo, Context, ExitPolicy, Presence, SharedSlot};

/// Replacement for the built-in version print.
pub type VersionAction = Box<dyn FnMut(&AppInfo, &mut dyn Write) -> io::Result<()>>;

/// Default environment prefix.
pub const DEFAULT_ENV_PREFIX: &str = "T";

pub struct Cli {
    pub(crate) name: String,
    pub(crate) info: AppInfo,
    pub(crate) flags: Vec<Flag>,
    pub(crate) commands: Vec<Command>,
    pub(crate) main_action: Option<Action>,
    pub(crate) post_global_action: Option<Action>,
    pub(crate) version_action: Option<VersionAction>,
    pub(crate) env_prefix: String,
    pub(crate) env_enabled: bool,
    pub(crate) env_vars: Option<HashMap<String, String>>,
    pub(crate) exit_policy: ExitPolicy,
    pub(crate) presence: Presence,
    pub(crate) completion_enabled: bool,
    pub(crate) shared_slot_check: bool,
    pub(crate) platform_config: bool,
    pub(crate) out: Box<dyn Write>,
    pub(crate) notices: Box<dyn NoticeAdapter>,
    pub(crate) usage: Box<dyn UsageAdapter>,
    /// Program name as it appeared in `argv[0]`, for the global usage page.
    pub(crate) program: String,
    /// Indices of the active command and subcommand after `parse`.
    pub(crate) active: Option<(usize, Option<usize>)>,
    pub(crate) args: Vec<String>,
    pub(crate) shared: Vec<SharedSlot>,
}

impl Cli {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            info: AppInfo::default(),
            flags: Vec::new(),
            commands: Vec::new(),
            main_action: None,
            post_global_action: None,
            version_action: None,
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            env_enabled: true,
            env_vars: None,
            exit_policy: ExitPolicy::default(),
            presence: Presence::default(),
            completion_enabled: true,
            shared_slot_check: true,
            platform_config: false,
            out: Box::new(io::stdout()),
            notices: Box::new(StderrNotices),
            usage: Box::new(DefaultUsage),
            program: name.to_string(),
            active: None,
            args: Vec::new(),
            shared: Vec::new(),
        }
    }

    /// Metadata used by the version print.
    pub fn app_info(mut self, info: AppInfo) -> Self {
        self.info = info;
        self
    }

    /// Declare a global flag.
    pub fn flag(mut self, flag: impl Into<Flag>) -> Self {
        self.flags.push(flag.into());
        self
    }

    pub fn command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    /// Runs when no command token matches.
    pub fn main_action<F>(mut self, f: F) -> Self
    where
        F: FnMut(&Context) -> Result<(), ActionError> + 'static,
    {
        self.main_action = Some(Box::new(f));
        self
    }

    /// Runs once global flags are resolved, before any command is dispatched.
    pub fn post_global_action<F>(mut self, f: F) -> Self
    where
        F: FnMut(&Context) -> Result<(), ActionError> + 'static,
    {
        self.post_global_action = Some(Box::new(f));
        self
    }

    /// Replace the `version=... build=... revision=...` print.
    pub fn version_action<F>(mut self, f: F) -> Self
    where
        F: FnMut(&AppInfo, &mut dyn Write) -> io::Result<()> + 'static,
    {
        self.version_action = Some(Box::new(f));
        self
    }

    /// Prefix for environment variable names (default `"T"`). An empty prefix
    /// uses bare flag names.
    pub fn env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = prefix.to_string();
        self
    }

    /// Disable environment variable lookup entirely.
    pub fn no_env(mut self) -> Self {
        self.env_enabled = false;
        self
    }

    /// Read variables from `vars` instead of the process environment.
    pub fn env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars = Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    pub fn exit_policy(mut self, policy: ExitPolicy) -> Self {
        self.exit_policy = policy;
        self
    }

    pub fn presence(mut self, presence: Presence) -> Self {
        self.presence = presence;
        self
    }

    /// Leave out the hidden completion flag in every scope.
    pub fn no_completion(mut self) -> Self {
        self.completion_enabled = false;
        self
    }

    /// Skip the warning for flags that share a storage cell.
    pub fn no_shared_slot_check(mut self) -> Self {
        self.shared_slot_check = false;
        self
    }

    /// Default `-config` to `<platform config dir>/<name>.toml`.
    pub fn platform_config(mut self) -> Self {
        self.platform_config = true;
        self
    }

    /// Destination for usage, version, completion and listing output
    /// (default stdout).
    pub fn writer(mut self, out: impl Write + 'static) -> Self {
        self.out = Box::new(out);
        self
    }

    pub fn notices(mut self, notices: impl NoticeAdapter + 'static) -> Self {
        self.notices = Box::new(notices);
        self
    }

    pub fn usage_adapter(mut self, usage: impl UsageAdapter + 'static) -> Self {
        self.usage = Box::new(usage);
        self
    }

    // -- accessors ----------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn info(&self) -> &AppInfo {
        &self.info
    }

    fn global_value(&self, name: &str) -> String {
        self.flag_named(name).map(Flag::value_string).unwrap_or_default()
    }

    fn global_switch(&self, name: &str) -> bool {
        self.global_value(name) == "true"
    }

    pub fn help_requested(&self) -> bool {
        self.global_switch(defaults::HELP)
    }

    pub fn version_requested(&self) -> bool {
        self.global_switch(defaults::VERSION)
    }

    pub fn is_debug(&self) -> bool {
        self.global_switch(defaults::DEBUG)
    }

    pub fn debug_level(&self) -> i64 {
        self.global_value(defaults::DEBUG_LEVEL).parse().unwrap_or(0)
    }

    /// Value of `-config`, as given (before it is made absolute).
    pub fn config_path(&self) -> String {
        self.global_value(defaults::CONFIG)
    }

    pub fn http_proxy(&self) -> String {
        self.global_value(defaults::HTTP_PROXY)
    }

    pub fn https_proxy(&self) -> String {
        self.global_value(defaults::HTTPS_PROXY)
    }

    pub fn no_proxy(&self) -> String {
        self.global_value(defaults::NO_PROXY)
    }

    pub fn is_proxy_set(&self) -> bool {
        !(self.http_proxy().is_empty() && self.https_proxy().is_empty() && self.no_proxy().is_empty())
    }

    /// Look up a global flag by name.
    pub fn flag_named(&self, name: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.name() == name)
    }

    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    pub fn command_named(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name() == name)
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Positional tokens left over in the deepest active scope.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Flags that were bound to the same storage cell, as of the last parse.
    pub fn shared_slots(&self) -> &[SharedSlot] {
        &self.shared
    }

    pub fn active_command(&self) -> Option<&str> {
        let (idx, _) = self.active?;
        self.commands.get(idx).map(Command::name)
    }

    pub fn active_subcommand(&self) -> Option<&str> {
        let (idx, sub) = self.active?;
        self.commands
            .get(idx)?
            .subcommands()
            .get(sub?)
            .map(Command::name)
    }

    pub(crate) fn context(&self) -> Context {
        Context {
            command: self.active_command().map(str::to_string),
            subcommand: self.active_subcommand().map(str::to_string),
            args: self.args.clone(),
            debug: self.is_debug(),
            debug_level: self.debug_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::Slot;

    #[test]
    fn builder_defaults() {
        let cli = Cli::new("myapp");
        assert_eq!(cli.name(), "myapp");
        assert_eq!(cli.env_prefix, "T");
        assert!(cli.env_enabled);
        assert_eq!(cli.exit_policy, ExitPolicy::Exit);
        assert_eq!(cli.presence, Presence::Sentinel);
        assert!(cli.completion_enabled);
        assert!(!cli.help_requested());
        assert_eq!(cli.debug_level(), 0);
        assert!(!cli.is_proxy_set());
        assert_eq!(cli.active_command(), None);
    }

    #[test]
    fn builder_toggles() {
        let cli = Cli::new("myapp")
            .env_prefix("")
            .no_env()
            .no_completion()
            .no_shared_slot_check()
            .exit_policy(ExitPolicy::Return)
            .presence(Presence::Explicit)
            .env_vars([("A", "1")]);
        assert_eq!(cli.env_prefix, "");
        assert!(!cli.env_enabled);
        assert!(!cli.completion_enabled);
        assert!(!cli.shared_slot_check);
        assert_eq!(cli.exit_policy, ExitPolicy::Return);
        assert_eq!(cli.presence, Presence::Explicit);
        assert_eq!(
            cli.env_vars.as_ref().and_then(|v| v.get("A")).map(String::as_str),
            Some("1")
        );
    }

    #[test]
    fn lookups_by_name() {
        let path = Slot::new(String::new());
        let cli = Cli::new("myapp")
            .flag(Flag::new("path", &path))
            .command(Command::new("server"));
        assert!(cli.flag_named("path").is_some());
        assert!(cli.flag_named("nope").is_none());
        assert!(cli.command_named("server").is_some());
        assert!(cli.command_named("client").is_none());
    }
}
