//! Typed flags.
//!
//! A [`Flag`] is a named configuration slot bound to an application-owned
//! [`Slot`]. Its value kind is one of the closed [`FlagKind`] variants; all
//! resolution logic (sentinel comparison, overlay, allow-list checks) is
//! written once against [`Typed<T>`] and dispatched over the variants.
//!
//! Flags are declared through the typed [`FlagBuilder`], so defaults and
//! allow-lists are checked against the slot's type at compile time:
//!
//! ```ignore
//! let port = Slot::new(0i64);
//! let flag = Flag::new("port", &port).short("p").default(8080).usage("server port");
//! ```

use toml::Value;

use crate::error::CliError;
use crate::slot::Slot;
use crate::types::Presence;
use crate::value::{FlagValue, StringList};

/// Storage, sentinel default and allow-list for one value kind.
#[doc(hidden)]
pub struct Typed<T: FlagValue> {
    slot: Slot<T>,
    default: T,
    options: Vec<T>,
}

impl<T: FlagValue> Typed<T> {
    fn register(&self) {
        self.slot.set(self.default.clone());
    }

    fn unchanged(&self) -> bool {
        self.slot.with(|current| current.same_as(&self.default))
    }

    fn current(&self) -> String {
        self.slot.with(FlagValue::render)
    }

    fn valid(&self, comma_separated: bool) -> bool {
        if self.options.is_empty() || self.unchanged() {
            return true;
        }
        let current = self.current();
        if current.is_empty() {
            return true;
        }
        if comma_separated {
            let allowed: Vec<String> = self.options.iter().flat_map(FlagValue::items).collect();
            return self
                .slot
                .with(|value| value.items().iter().all(|item| allowed.contains(item)));
        }
        self.slot
            .with(|value| self.options.iter().any(|o| value.same_as(o)))
    }
}

/// The closed union of flag value kinds.
#[doc(hidden)]
pub enum FlagKind {
    Bool(Typed<bool>),
    Int64(Typed<i64>),
    Uint64(Typed<u64>),
    Float64(Typed<f64>),
    Str(Typed<String>),
    List(Typed<StringList>),
}

macro_rules! each_kind {
    ($kind:expr, $typed:ident => $body:expr) => {
        match $kind {
            FlagKind::Bool($typed) => $body,
            FlagKind::Int64($typed) => $body,
            FlagKind::Uint64($typed) => $body,
            FlagKind::Float64($typed) => $body,
            FlagKind::Str($typed) => $body,
            FlagKind::List($typed) => $body,
        }
    };
}

macro_rules! each_kind_typed {
    ($kind:expr, $t:ident, $typed:ident => $body:expr) => {
        match $kind {
            FlagKind::Bool($typed) => {
                type $t = bool;
                $body
            }
            FlagKind::Int64($typed) => {
                type $t = i64;
                $body
            }
            FlagKind::Uint64($typed) => {
                type $t = u64;
                $body
            }
            FlagKind::Float64($typed) => {
                type $t = f64;
                $body
            }
            FlagKind::Str($typed) => {
                type $t = String;
                $body
            }
            FlagKind::List($typed) => {
                type $t = StringList;
                $body
            }
        }
    };
}

/// A named, typed configuration slot.
pub struct Flag {
    name: String,
    short_name: Option<String>,
    usage: String,
    required: bool,
    hidden: bool,
    env_override: Option<String>,
    env_exact: bool,
    env_exclude: bool,
    comma_separated: bool,
    kind: FlagKind,
    /// Owning command name, empty for global flags.
    command: String,
    /// Canonical environment variable, computed before resolution.
    env_var: Option<String>,
    presence: Presence,
    touched: bool,
}

impl Flag {
    /// Start declaring a flag bound to `slot`. The default starts as the
    /// type's zero value.
    pub fn new<T: FlagValue>(name: &str, slot: &Slot<T>) -> FlagBuilder<T> {
        FlagBuilder {
            name: name.to_string(),
            short_name: None,
            usage: String::new(),
            default: T::default(),
            options: Vec::new(),
            required: false,
            hidden: false,
            env_override: None,
            env_exact: false,
            env_exclude: false,
            comma_separated: false,
            slot: slot.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_name(&self) -> Option<&str> {
        self.short_name.as_deref()
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_comma_separated(&self) -> bool {
        self.comma_separated
    }

    /// Owning command name; empty for global flags.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// The environment variable consulted for this flag, once names have been
    /// assigned. `None` when excluded or when environment lookup is disabled.
    pub fn env_var(&self) -> Option<&str> {
        self.env_var.as_deref()
    }

    pub fn type_label(&self) -> &'static str {
        each_kind_typed!(&self.kind, T, _typed => <T as FlagValue>::TYPE_LABEL)
    }

    pub(crate) fn is_switch(&self) -> bool {
        each_kind_typed!(&self.kind, T, _typed => <T as FlagValue>::IS_SWITCH)
    }

    /// Current cell content, rendered.
    pub fn value_string(&self) -> String {
        each_kind!(&self.kind, typed => typed.current())
    }

    /// The sentinel default, rendered.
    pub fn default_string(&self) -> String {
        each_kind!(&self.kind, typed => typed.default.render())
    }

    /// The allow-list, rendered. Empty when any value is accepted.
    pub fn options(&self) -> Vec<String> {
        each_kind!(&self.kind, typed => typed.options.iter().map(FlagValue::render).collect())
    }

    /// Whether the flag counts as set.
    ///
    /// Under [`Presence::Sentinel`] this compares the cell to the default, so
    /// a value explicitly equal to the default reads as unset. Under
    /// [`Presence::Explicit`] it reports whether the command line or an
    /// overlay wrote the flag.
    pub fn is_set(&self) -> bool {
        match self.presence {
            Presence::Sentinel => !each_kind!(&self.kind, typed => typed.unchanged()),
            Presence::Explicit => self.touched,
        }
    }

    pub fn is_required_and_unset(&self) -> bool {
        self.required && !self.is_set()
    }

    /// Allow-list check. Flags without an allow-list, or still at their
    /// default, are always valid. Comma-separated flags require every token to
    /// be allowed.
    pub fn is_valid(&self) -> bool {
        each_kind!(&self.kind, typed => typed.valid(self.comma_separated))
    }

    pub(crate) fn env_excluded(&self) -> bool {
        self.env_exclude
    }

    pub(crate) fn env_override(&self) -> Option<&str> {
        self.env_override.as_deref()
    }

    pub(crate) fn env_exact(&self) -> bool {
        self.env_exact
    }

    pub(crate) fn set_env_var(&mut self, name: Option<String>) {
        self.env_var = name;
    }

    pub(crate) fn set_command(&mut self, command: &str) {
        self.command = command.to_string();
    }

    pub(crate) fn slot_id(&self) -> usize {
        each_kind!(&self.kind, typed => typed.slot.id())
    }

    /// Write the sentinel default into the cell before tokenization.
    pub(crate) fn register(&mut self, presence: Presence) {
        self.presence = presence;
        self.touched = false;
        each_kind!(&self.kind, typed => typed.register());
    }

    /// Apply a value the tokenizer saw on the command line.
    pub(crate) fn apply_cli(&mut self, raw: &str) -> Result<(), CliError> {
        each_kind_typed!(&self.kind, T, typed => {
            let value = <T as FlagValue>::parse_raw(raw).map_err(|reason| CliError::BadValue {
                flag: self.name.clone(),
                value: raw.to_string(),
                reason,
            })?;
            typed.slot.set(value);
        });
        self.touched = true;
        Ok(())
    }

    /// Fill the cell from an environment value if it is still unset.
    /// Returns whether the value was applied.
    pub(crate) fn apply_env(&mut self, var: &str, raw: &str) -> Result<bool, CliError> {
        if self.is_set() {
            return Ok(false);
        }
        each_kind_typed!(&self.kind, T, typed => {
            let value = <T as FlagValue>::parse_raw(raw).map_err(|reason| CliError::EnvValue {
                var: var.to_string(),
                value: raw.to_string(),
                reason,
            })?;
            typed.slot.set(value);
        });
        self.touched = true;
        Ok(true)
    }

    /// Fill the cell from a config document entry if it is still unset.
    /// A present key of the wrong type is an error.
    pub(crate) fn apply_config(&mut self, key: &str, value: &Value) -> Result<bool, CliError> {
        if self.is_set() {
            return Ok(false);
        }
        each_kind_typed!(&self.kind, T, typed => {
            let parsed = <T as FlagValue>::from_toml(value).ok_or_else(|| CliError::ConfigValue {
                key: key.to_string(),
                reason: format!(
                    "expected {}, found {}",
                    type_description(<T as FlagValue>::TYPE_LABEL),
                    value.type_str()
                ),
            })?;
            typed.slot.set(parsed);
        });
        self.touched = true;
        Ok(true)
    }
}

fn type_description(label: &str) -> &str {
    if label.is_empty() { "boolean" } else { label }
}

/// Typed declaration of a [`Flag`]. Converts into a `Flag` wherever one is
/// expected.
pub struct FlagBuilder<T: FlagValue> {
    name: String,
    short_name: Option<String>,
    usage: String,
    default: T,
    options: Vec<T>,
    required: bool,
    hidden: bool,
    env_override: Option<String>,
    env_exact: bool,
    env_exclude: bool,
    comma_separated: bool,
    slot: Slot<T>,
}

impl<T: FlagValue> FlagBuilder<T> {
    /// Alternate name, e.g. `p` for `port`. Accepted as `-p`.
    pub fn short(mut self, short: &str) -> Self {
        self.short_name = Some(short.to_string());
        self
    }

    pub fn usage(mut self, usage: &str) -> Self {
        self.usage = usage.to_string();
        self
    }

    /// The sentinel default: the resolved value when nothing else supplies
    /// one, and the marker for "not set".
    pub fn default(mut self, value: impl Into<T>) -> Self {
        self.default = value.into();
        self
    }

    /// Restrict the accepted values.
    pub fn options<I>(mut self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<T>,
    {
        self.options = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Leave the flag out of usage text and completion listings.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Environment name to use instead of the flag name. The configured
    /// prefix is still applied.
    pub fn env(mut self, name: &str) -> Self {
        self.env_override = Some(name.to_string());
        self.env_exact = false;
        self
    }

    /// Environment variable used verbatim, without prefix.
    pub fn env_exact(mut self, name: &str) -> Self {
        self.env_override = Some(name.to_string());
        self.env_exact = true;
        self
    }

    /// Never read this flag from the environment.
    pub fn no_env(mut self) -> Self {
        self.env_exclude = true;
        self
    }

    /// Treat the value as a comma-separated list when checking the
    /// allow-list: every token must be allowed.
    pub fn comma_separated(mut self) -> Self {
        self.comma_separated = true;
        self
    }
}

impl<T: FlagValue> From<FlagBuilder<T>> for Flag {
    fn from(b: FlagBuilder<T>) -> Self {
        Flag {
            name: b.name,
            short_name: b.short_name.filter(|s| !s.is_empty()),
            usage: b.usage,
            required: b.required,
            hidden: b.hidden,
            env_override: b.env_override.filter(|s| !s.is_empty()),
            env_exact: b.env_exact,
            env_exclude: b.env_exclude,
            comma_separated: b.comma_separated,
            kind: T::wrap(Typed {
                slot: b.slot,
                default: b.default,
                options: b.options,
            }),
            command: String::new(),
            env_var: None,
            presence: Presence::default(),
            touched: false,
        }
    }
}
