//! Structured config sections for the demo.
//!
//! The hidden `clients` command has no flags; it exists to give this table a
//! home in the config file:
//!
//! ```toml
//! [clients]
//! default = "alpha"
//!
//! [[clients.entries]]
//! name = "alpha"
//! url = "http://localhost:8090"
//! retries = 3
//! ```

use serde::Deserialize;

/// The `[clients]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClientsSection {
    /// Name of the entry `client` dials when `-target` is not given.
    pub default: String,
    pub entries: Vec<ClientEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientEntry {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub retries: u64,
}

impl ClientsSection {
    pub fn find(&self, name: &str) -> Option<&ClientEntry> {
        let name = if name.is_empty() { &self.default } else { name };
        self.entries.iter().find(|e| e.name == name)
    }
}
