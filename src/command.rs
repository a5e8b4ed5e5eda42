//! Commands and subcommands.
//!
//! A [`Command`] is a named, dispatchable unit with its own flag scope. It may
//! carry one level of subcommands. When a command token appears on the
//! command line, the command's flags are tokenized from the tokens that follow
//! it and its pre-action, action and post-action run in that order.

use serde::de::DeserializeOwned;

use crate::config::{SectionBinding, SectionSlot};
use crate::defaults;
use crate::flag::Flag;
use crate::slot::Slot;
use crate::types::Context;

/// Error type returned by actions.
pub type ActionError = Box<dyn std::error::Error + Send + Sync>;

/// A callback run during dispatch.
pub type Action = Box<dyn FnMut(&Context) -> Result<(), ActionError>>;

pub struct Command {
    pub(crate) name: String,
    pub(crate) short_name: Option<String>,
    pub(crate) usage: String,
    pub(crate) hidden: bool,
    pub(crate) flags: Vec<Flag>,
    pub(crate) subcommands: Vec<Command>,
    pub(crate) pre_action: Option<Action>,
    pub(crate) action: Option<Action>,
    pub(crate) post_action: Option<Action>,
    pub(crate) section: Option<Box<dyn SectionBinding>>,
}

impl Command {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            short_name: None,
            usage: String::new(),
            hidden: false,
            flags: Vec::new(),
            subcommands: Vec::new(),
            pre_action: None,
            action: None,
            post_action: None,
            section: None,
        }
    }

    /// Alternate token that selects this command, e.g. `s` for `server`.
    pub fn short(mut self, short: &str) -> Self {
        self.short_name = Some(short.to_string()).filter(|s| !s.is_empty());
        self
    }

    pub fn usage(mut self, usage: &str) -> Self {
        self.usage = usage.to_string();
        self
    }

    /// Leave the command out of usage text and completion listings.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn flag(mut self, flag: impl Into<Flag>) -> Self {
        self.flags.push(flag.into());
        self
    }

    pub fn subcommand(mut self, command: Command) -> Self {
        self.subcommands.push(command);
        self
    }

    pub fn pre_action<F>(mut self, f: F) -> Self
    where
        F: FnMut(&Context) -> Result<(), ActionError> + 'static,
    {
        self.pre_action = Some(Box::new(f));
        self
    }

    pub fn action<F>(mut self, f: F) -> Self
    where
        F: FnMut(&Context) -> Result<(), ActionError> + 'static,
    {
        self.action = Some(Box::new(f));
        self
    }

    pub fn post_action<F>(mut self, f: F) -> Self
    where
        F: FnMut(&Context) -> Result<(), ActionError> + 'static,
    {
        self.post_action = Some(Box::new(f));
        self
    }

    /// Bind the whole `[name]` table of the config file to `slot`.
    ///
    /// Typically combined with [`hidden`](Self::hidden): the command exists
    /// only to give a structured config section a home.
    pub fn section<T: DeserializeOwned + 'static>(mut self, slot: &Slot<T>) -> Self {
        self.section = Some(Box::new(SectionSlot::new(slot.clone())));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_name(&self) -> Option<&str> {
        self.short_name.as_deref()
    }

    pub fn usage_text(&self) -> &str {
        &self.usage
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    pub fn flag_named(&self, name: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.name() == name)
    }

    pub fn subcommands(&self) -> &[Command] {
        &self.subcommands
    }

    pub fn subcommand_named(&self, name: &str) -> Option<&Command> {
        self.subcommands.iter().find(|c| c.name == name)
    }

    /// Whether `-help` was passed to this command.
    pub fn help_requested(&self) -> bool {
        self.switch_on(defaults::HELP)
    }

    pub(crate) fn completion_requested(&self) -> bool {
        self.switch_on(defaults::COMPLETION)
    }

    fn switch_on(&self, name: &str) -> bool {
        self.flag_named(name)
            .is_some_and(|f| f.value_string() == "true")
    }

    /// Command tokens are the lowercased name or short name.
    pub(crate) fn matches_token(&self, token: &str) -> bool {
        token == self.name.to_lowercase()
            || self
                .short_name
                .as_deref()
                .is_some_and(|s| token == s.to_lowercase())
    }
}
