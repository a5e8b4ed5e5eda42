//! TOML config file lookup and overlay.
//!
//! The config file is a key-path lookup service: flags address it as
//! `flag` (global), `command.flag` or `command.subcommand.flag`. Only flags
//! still unset after the environment pass take a config value, and a present
//! key of the wrong type is a hard error since the file is trusted input.
//!
//! A command can also bind its whole `[command]` table to a typed value with
//! [`Command::section`](crate::Command::section). Keys the type does not
//! consume are reported through `tracing` rather than rejected.
//!
//! A missing file is not an error: the `-config` default usually points at a
//! file most users never create.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use toml::{Table, Value};
use tracing::{debug, warn};

use crate::command::Command;
use crate::error::CliError;
use crate::flag::Flag;
use crate::slot::Slot;

/// A parsed config document addressed by dotted key paths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTree {
    table: Table,
}

impl ConfigTree {
    /// Read and parse `path`. Returns `Ok(None)` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>, CliError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CliError::ConfigRead {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };
        Self::parse(&content, path).map(Some)
    }

    /// Parse `content`; `path` is only used for error messages.
    pub fn parse(content: &str, path: &Path) -> Result<Self, CliError> {
        let table: Table = toml::from_str(content).map_err(|e| CliError::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(ConfigTree { table })
    }

    /// Look up a dotted key such as `server.port`.
    ///
    /// Intermediate arrays of tables resolve to their last element, so
    /// `[[server]]` blocks behave like the most recent one.
    pub fn get(&self, dotted: &str) -> Option<&Value> {
        if dotted.is_empty() {
            return None;
        }
        let mut segments = dotted.split('.').peekable();
        let mut table = &self.table;
        while let Some(segment) = segments.next() {
            let value = table.get(segment)?;
            if segments.peek().is_none() {
                return Some(value);
            }
            table = match value {
                Value::Table(t) => t,
                Value::Array(items) => items.last()?.as_table()?,
                _ => return None,
            };
        }
        None
    }

    pub fn has(&self, dotted: &str) -> bool {
        self.get(dotted).is_some()
    }
}

/// Turn the `-config` value into an absolute path. Empty means no file.
pub(crate) fn resolve_path(raw: &str) -> Option<PathBuf> {
    if raw.is_empty() {
        return None;
    }
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        return Some(path);
    }
    match std::env::current_dir() {
        Ok(cwd) => Some(cwd.join(path)),
        Err(_) => Some(path),
    }
}

/// Fill still-unset flags of one scope. `scope_path` is empty for globals,
/// `["server"]` for a command, `["server", "start"]` for a subcommand.
pub(crate) fn overlay(
    flags: &mut [Flag],
    scope_path: &[&str],
    tree: &ConfigTree,
) -> Result<(), CliError> {
    for flag in flags {
        let key = scope_path
            .iter()
            .copied()
            .chain(std::iter::once(flag.name()))
            .collect::<Vec<_>>()
            .join(".");
        let Some(value) = tree.get(&key) else {
            continue;
        };
        if flag.apply_config(&key, value)? {
            debug!(key = %key, value = %flag.value_string(), "applied config value");
        }
    }
    Ok(())
}

/// Deserialize the `[name]` table of every command that declared a section.
pub(crate) fn bind_sections(commands: &[Command], tree: &ConfigTree) -> Result<(), CliError> {
    for cmd in commands {
        let Some(section) = &cmd.section else {
            continue;
        };
        let Some(value) = tree.get(cmd.name()) else {
            continue;
        };
        let ignored = section.bind(cmd.name(), value)?;
        for key in ignored {
            warn!(section = cmd.name(), key = %key, "config key not used by section");
        }
        debug!(section = cmd.name(), "bound config section");
    }
    Ok(())
}

/// A typed destination for a whole config table.
pub(crate) trait SectionBinding {
    /// Deserialize `value` into the bound slot and return the keys the target
    /// type ignored.
    fn bind(&self, key: &str, value: &Value) -> Result<Vec<String>, CliError>;
}

pub(crate) struct SectionSlot<T> {
    slot: Slot<T>,
}

impl<T> SectionSlot<T> {
    pub(crate) fn new(slot: Slot<T>) -> Self {
        SectionSlot { slot }
    }
}

impl<T: DeserializeOwned> SectionBinding for SectionSlot<T> {
    fn bind(&self, key: &str, value: &Value) -> Result<Vec<String>, CliError> {
        let mut ignored = Vec::new();
        let parsed: T = serde_ignored::deserialize(value.clone(), |path| {
            ignored.push(path.to_string());
        })
        .map_err(|e: toml::de::Error| CliError::ConfigValue {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.slot.set(parsed);
        Ok(ignored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Presence;
    use serde::Deserialize;
    use std::fs;
    use tempfile::TempDir;

    const DOC: &str = r#"
path = "/var/data"

[server]
port = 9000

[server.start]
workers = 4

[[clients]]
name = "first"

[[clients]]
name = "second"
"#;

    fn tree() -> ConfigTree {
        ConfigTree::parse(DOC, Path::new("test.toml")).unwrap()
    }

    // -- lookup -------------------------------------------------------------

    #[test]
    fn get_dotted_paths() {
        let t = tree();
        assert_eq!(t.get("path").and_then(Value::as_str), Some("/var/data"));
        assert_eq!(t.get("server.port").and_then(Value::as_integer), Some(9000));
        assert_eq!(
            t.get("server.start.workers").and_then(Value::as_integer),
            Some(4)
        );
        assert!(t.get("server.nope").is_none());
        assert!(t.get("path.deeper").is_none());
        assert!(!t.has(""));
    }

    #[test]
    fn arrays_of_tables_use_last_element() {
        let t = tree();
        assert_eq!(t.get("clients.name").and_then(Value::as_str), Some("second"));
    }

    // -- loading ------------------------------------------------------------

    #[test]
    fn load_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let loaded = ConfigTree::load(&dir.path().join("nope.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn load_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.toml");
        fs::write(&path, "port = 3000\n").unwrap();
        let loaded = ConfigTree::load(&path).unwrap().unwrap();
        assert_eq!(loaded.get("port").and_then(Value::as_integer), Some(3000));
    }

    #[test]
    fn load_invalid_toml_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "port = = 1").unwrap();
        let err = ConfigTree::load(&path).unwrap_err();
        assert!(matches!(err, CliError::ConfigParse { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn resolve_path_makes_relative_absolute() {
        assert_eq!(resolve_path(""), None);
        let abs = resolve_path("/etc/app.toml").unwrap();
        assert_eq!(abs, PathBuf::from("/etc/app.toml"));
        let rel = resolve_path("app.toml").unwrap();
        assert!(rel.is_absolute());
        assert!(rel.ends_with("app.toml"));
    }

    // -- overlay ------------------------------------------------------------

    fn registered(mut flags: Vec<Flag>) -> Vec<Flag> {
        for f in &mut flags {
            f.register(Presence::Sentinel);
        }
        flags
    }

    #[test]
    fn overlay_uses_scope_path() {
        let port = Slot::new(0i64);
        let workers = Slot::new(0i64);
        let mut server = registered(vec![Flag::new("port", &port).default(8080).into()]);
        let mut start = registered(vec![Flag::new("workers", &workers).default(1).into()]);

        overlay(&mut server, &["server"], &tree()).unwrap();
        overlay(&mut start, &["server", "start"], &tree()).unwrap();
        assert_eq!(port.get(), 9000);
        assert_eq!(workers.get(), 4);
    }

    #[test]
    fn overlay_does_not_replace_set_flags() {
        let path = Slot::new(String::new());
        let mut flags = registered(vec![Flag::new("path", &path).into()]);
        flags[0].apply_cli("/from/cli").unwrap();
        overlay(&mut flags, &[], &tree()).unwrap();
        assert_eq!(path.get(), "/from/cli");
    }

    #[test]
    fn overlay_type_mismatch_is_fatal() {
        let path = Slot::new(0i64);
        let mut flags = registered(vec![Flag::new("path", &path).into()]);
        let err = overlay(&mut flags, &[], &tree()).unwrap_err();
        assert!(matches!(err, CliError::ConfigValue { ref key, .. } if key == "path"));
    }

    // -- sections -----------------------------------------------------------

    #[derive(Debug, Default, Clone, PartialEq, Deserialize)]
    struct Server {
        port: i64,
    }

    #[test]
    fn section_binds_whole_table() {
        let server = Slot::new(Server::default());
        let commands = vec![Command::new("server").hidden().section(&server)];
        bind_sections(&commands, &tree()).unwrap();
        assert_eq!(server.get(), Server { port: 9000 });
    }

    #[test]
    fn section_reports_ignored_keys() {
        let binding = SectionSlot::new(Slot::new(Server::default()));
        let value = tree().get("server").cloned().unwrap();
        let ignored = binding.bind("server", &value).unwrap();
        assert_eq!(ignored, vec!["start".to_string()]);
    }

    #[test]
    fn section_type_mismatch_is_error() {
        let binding = SectionSlot::new(Slot::new(Server::default()));
        let err = binding
            .bind("path", &Value::String("x".into()))
            .unwrap_err();
        assert!(matches!(err, CliError::ConfigValue { .. }));
    }
}
