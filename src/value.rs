//! The closed set of value kinds a flag can hold.
//!
//! [`FlagValue`] is sealed: only `bool`, `i64`, `u64`, `f64`, `String` and
//! [`StringList`] implement it. Each kind knows how to parse a raw token
//! (command line or environment), how to read itself out of a TOML value, and
//! how to render itself for usage text, allow-list checks and diagnostics.

use std::fmt;

use toml::Value;

use crate::flag::{FlagKind, Typed};

mod sealed {
    pub trait Sealed {}
    impl Sealed for bool {}
    impl Sealed for i64 {}
    impl Sealed for u64 {}
    impl Sealed for f64 {}
    impl Sealed for String {}
    impl Sealed for super::StringList {}
}

/// A value kind that can be bound to a flag.
pub trait FlagValue: sealed::Sealed + Clone + Default + PartialEq + fmt::Debug + 'static {
    /// Label shown next to the flag in usage text. Empty for switches.
    const TYPE_LABEL: &'static str;

    /// Switches take no separate value token: `-debug` or `-debug=false`.
    const IS_SWITCH: bool = false;

    /// Parse a raw command-line or environment token.
    fn parse_raw(raw: &str) -> Result<Self, String>;

    /// Read the value out of a config document entry. `None` on type mismatch.
    fn from_toml(value: &Value) -> Option<Self>;

    /// Serialized form, used by usage text and allow-list comparison.
    fn render(&self) -> String;

    /// Whether two values count as the same for "changed from default" checks.
    fn same_as(&self, other: &Self) -> bool {
        self == other
    }

    /// Items checked one by one against a comma-separated allow-list.
    fn items(&self) -> Vec<String> {
        self.render().split(',').map(str::to_string).collect()
    }

    #[doc(hidden)]
    fn wrap(typed: Typed<Self>) -> FlagKind;
}

/// Accepts the same spellings as Go's `strconv.ParseBool`.
fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(format!("'{raw}' is not a boolean")),
    }
}

impl FlagValue for bool {
    const TYPE_LABEL: &'static str = "";
    const IS_SWITCH: bool = true;

    fn parse_raw(raw: &str) -> Result<Self, String> {
        parse_bool(raw)
    }

    fn from_toml(value: &Value) -> Option<Self> {
        value.as_bool()
    }

    fn render(&self) -> String {
        self.to_string()
    }

    fn wrap(typed: Typed<Self>) -> FlagKind {
        FlagKind::Bool(typed)
    }
}

impl FlagValue for i64 {
    const TYPE_LABEL: &'static str = "int";

    fn parse_raw(raw: &str) -> Result<Self, String> {
        raw.trim()
            .parse::<i64>()
            .map_err(|e| format!("'{raw}' is not a 64-bit integer: {e}"))
    }

    fn from_toml(value: &Value) -> Option<Self> {
        value.as_integer()
    }

    fn render(&self) -> String {
        self.to_string()
    }

    fn wrap(typed: Typed<Self>) -> FlagKind {
        FlagKind::Int64(typed)
    }
}

impl FlagValue for u64 {
    const TYPE_LABEL: &'static str = "uint";

    fn parse_raw(raw: &str) -> Result<Self, String> {
        raw.trim()
            .parse::<u64>()
            .map_err(|e| format!("'{raw}' is not an unsigned 64-bit integer: {e}"))
    }

    fn from_toml(value: &Value) -> Option<Self> {
        value.as_integer().and_then(|i| u64::try_from(i).ok())
    }

    fn render(&self) -> String {
        self.to_string()
    }

    fn wrap(typed: Typed<Self>) -> FlagKind {
        FlagKind::Uint64(typed)
    }
}

impl FlagValue for f64 {
    const TYPE_LABEL: &'static str = "float";

    fn parse_raw(raw: &str) -> Result<Self, String> {
        raw.trim()
            .parse::<f64>()
            .map_err(|e| format!("'{raw}' is not a number: {e}"))
    }

    /// Integers are accepted: `rate = 2` is a valid float in a config file.
    fn from_toml(value: &Value) -> Option<Self> {
        match value {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    fn render(&self) -> String {
        self.to_string()
    }

    fn wrap(typed: Typed<Self>) -> FlagKind {
        FlagKind::Float64(typed)
    }
}

impl FlagValue for String {
    const TYPE_LABEL: &'static str = "string";

    fn parse_raw(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }

    fn from_toml(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }

    fn render(&self) -> String {
        self.clone()
    }

    fn wrap(typed: Typed<Self>) -> FlagKind {
        FlagKind::Str(typed)
    }
}

/// A comma-separated list of strings.
///
/// On the command line and in the environment the list is written as
/// `a,b,c`. In a config file it may be an array of strings or a single
/// comma-separated string.
///
/// Lists compare by their rendered form (`[a b c]`), not structurally, when
/// deciding whether a flag still holds its default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringList(pub Vec<String>);

impl StringList {
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for StringList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(" "))
    }
}

impl From<Vec<String>> for StringList {
    fn from(items: Vec<String>) -> Self {
        StringList(items)
    }
}

impl From<Vec<&str>> for StringList {
    fn from(items: Vec<&str>) -> Self {
        StringList(items.into_iter().map(str::to_string).collect())
    }
}

impl<S: Into<String>> FromIterator<S> for StringList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        StringList(iter.into_iter().map(Into::into).collect())
    }
}

impl FlagValue for StringList {
    const TYPE_LABEL: &'static str = "list";

    fn parse_raw(raw: &str) -> Result<Self, String> {
        Ok(raw.split(',').collect())
    }

    fn from_toml(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => items
                .iter()
                .map(|v| v.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(StringList),
            Value::String(s) => Some(s.split(',').collect()),
            _ => None,
        }
    }

    fn render(&self) -> String {
        self.to_string()
    }

    fn same_as(&self, other: &Self) -> bool {
        self.render() == other.render()
    }

    fn items(&self) -> Vec<String> {
        self.0.iter().flat_map(|item| item.split(',')).map(str::to_string).collect()
    }

    fn wrap(typed: Typed<Self>) -> FlagKind {
        FlagKind::List(typed)
    }
}
