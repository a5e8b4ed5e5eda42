/// What happens after an advisory-fatal outcome (help shown, completion
/// listed, required flag missing).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExitPolicy {
    /// End the process with status 1 once output has been written.
    #[default]
    Exit,
    /// Return the outcome to the caller. Used by tests and embedding code.
    Return,
}

/// How a flag decides whether it has been set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Presence {
    /// Compare the cell to the sentinel default. A value explicitly equal to
    /// the default is indistinguishable from no value.
    #[default]
    Sentinel,
    /// Track whether the command line or an overlay actually wrote the flag.
    Explicit,
}

/// Information handed to every action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    /// Active top-level command, if any.
    pub command: Option<String>,
    /// Active subcommand, if any.
    pub subcommand: Option<String>,
    /// Positional tokens left over in the active scope.
    pub args: Vec<String>,
    pub debug: bool,
    pub debug_level: i64,
}

/// Descriptive application metadata, used by the version print and usage text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppInfo {
    pub title: String,
    pub version: String,
    pub build_date: String,
    pub git_commit: String,
    pub description: String,
    pub author: String,
    pub copyright: String,
}

/// A required flag that no layer supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFlag {
    pub name: String,
    /// Owning command, `None` for global flags.
    pub command: Option<String>,
}

/// Two or more flags bound to the same storage cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedSlot {
    /// `(command, flag)` pairs, in registration order. Global flags have an
    /// empty command.
    pub uses: Vec<(String, String)>,
}

/// How a successful `parse` ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A command (and possibly a subcommand) ran its actions.
    Dispatched {
        command: String,
        subcommand: Option<String>,
    },
    /// No command matched and the main action ran.
    MainAction,
    /// No command matched and there is no main action.
    NoCommand,
    /// The version was printed.
    Version,
    /// Usage text was printed.
    Help,
    /// A completion listing was printed.
    Completion,
    /// The active command has no action; its subcommands were listed.
    SubcommandsListed { command: String },
    /// Required flags were missing; a notice was emitted for each.
    MissingRequired(Vec<MissingFlag>),
}

impl Outcome {
    /// Outcomes that end the process under [`ExitPolicy::Exit`].
    pub fn is_advisory_fatal(&self) -> bool {
        matches!(
            self,
            Outcome::Help | Outcome::Completion | Outcome::MissingRequired(_)
        )
    }
}
