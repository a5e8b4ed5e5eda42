//! Declarative commands and typed flags, resolved from the command line, the
//! environment and a TOML config file.
//!
//! Declare flags bound to storage cells you own, group them into commands,
//! and let one call resolve every layer, validate the result and run the
//! matching action.
//!
//! ```ignore
//! let port = Slot::new(0i64);
//! let mut cli = Cli::new("myapp")
//!     .env_prefix("MYAPP")
//!     .command(
//!         Command::new("server")
//!             .short("s")
//!             .usage("run as a server")
//!             .flag(Flag::new("port", &port).short("p").default(8080))
//!             .action(|ctx| {
//!                 println!("serving, args = {:?}", ctx.args);
//!                 Ok(())
//!             }),
//!     );
//! cli.parse()?;
//! ```
//!
//! `myapp server -port 9000` sets `port` to 9000. So do `MYAPP_PORT=9000` and
//! a config file containing `[server]` / `port = 9000`.
//!
//! # Flags and slots
//!
//! A [`Flag`] is a name, an optional short alias, usage text and a typed
//! [`Slot`]. The slot is allocated by the application and read back after
//! [`Cli::parse`]; the flag only writes through it. Supported kinds are
//! `bool`, `i64`, `u64`, `f64`, `String` and [`StringList`] (comma-separated on
//! the command line and in the environment, an array in TOML).
//!
//! Each flag carries a **sentinel default**. It is written into the slot
//! before anything else happens, and it doubles as the marker for "not set":
//! an overlay only fills a flag whose slot still holds the default, and a
//! required flag still holding its default is reported as missing. The
//! consequence is that a user who explicitly passes the default value is
//! indistinguishable from one who passed nothing. Switch to
//! [`Presence::Explicit`] to track writes instead.
//!
//! Two flags may share one slot. That is usually a mistake, so each parse
//! reports such groups through [`Cli::shared_slots`] and a `tracing` warning.
//!
//! # Commands
//!
//! The CLI has global flags and any number of [`Command`]s. A command has its
//! own flags, up to one level of subcommands, and optional pre-action, action
//! and post-action hooks. A command's name or short name is matched
//! case-insensitively against the arguments; the first match selects it and
//! everything after it belongs to the command.
//!
//! A command can also bind a whole config table to a typed struct with
//! [`Command::section`]. Such commands are usually [`hidden`](Command::hidden)
//! and have no action.
//!
//! # Layer precedence
//!
//! ```text
//! Sentinel default     Flag::new(..).default(..)
//!        ↑ overridden by
//! Config file          -config path, keys "flag", "cmd.flag", "cmd.sub.flag"
//!        ↑ overridden by
//! Environment          PREFIX_FLAG (or the flag's env override)
//!        ↑ overridden by
//! Command line         -flag value, -flag=value, --flag=value, -f value
//! ```
//!
//! Only the active chain (globals, the matched command, the matched
//! subcommand) is read from the command line, the environment and the config
//! file. Flags of other commands keep their defaults.
//!
//! # Environment variables
//!
//! With the default prefix `T`, flag `port` reads `T_PORT`. An empty prefix
//! reads `PORT`. [`FlagBuilder::env`] replaces the flag name part,
//! [`FlagBuilder::env_exact`] names the variable verbatim, and
//! [`FlagBuilder::no_env`] opts out. Empty values are ignored.
//!
//! # Reserved flags
//!
//! Every CLI carries `-help`/`-h`, `-debug`/`-d`, `-debugLevel`/`-dbglvl`,
//! `-version`/`-v`, `-config`/`-c` and the proxy triplet `-proxyhttp`,
//! `-proxyhttps`, `-noproxy` (read from `HTTP_PROXY`, `HTTPS_PROXY` and
//! `NO_PROXY`). Every command gets its own `-help`. A hidden
//! `-generate-bash-completion` flag prints completion candidates for the
//! current scope. Declaring a flag with a reserved name replaces the built-in
//! one.
//!
//! # Outcomes and exiting
//!
//! [`Cli::parse`] returns an [`Outcome`] describing how resolution ended. Help,
//! completion and missing required flags are advisory-fatal: under the
//! default [`ExitPolicy::Exit`] they end the process with status 1 once
//! output is written. Tests and embedding code use [`ExitPolicy::Return`].
//!
//! # Error handling
//!
//! All fallible operations return [`CliError`]. Definition mistakes (bad
//! names, duplicate flags, nesting too deep) and unusable config files are
//! [fatal](CliError::is_fatal); bad user input (unknown flags, unparseable
//! values, disallowed values) is not. Errors returned from actions are wrapped
//! with the command they came from.
//!
//! # Logging
//!
//! The crate logs through `tracing` and never installs a subscriber. Resolved
//! values, applied overlays and the config file in use are logged at `debug`;
//! shared slots, ignored section keys and a missing explicit config file at
//! `warn`. A post-global action is the natural place to install a subscriber
//! based on `-debug` and `-debugLevel`.

pub mod error;
pub mod types;

mod cli;
mod command;
mod completion;
mod config;
mod defaults;
mod env;
mod flag;
mod notice;
mod registry;
mod resolve;
mod scan;
mod slot;
mod tokenize;
mod usage;
mod validate;
mod value;

#[cfg(test)]
mod fixtures;

pub use cli::{Cli, DEFAULT_ENV_PREFIX, VersionAction};
pub use command::{Action, ActionError, Command};
pub use config::ConfigTree;
pub use env::env_var_name;
pub use error::CliError;
pub use flag::{Flag, FlagBuilder};
pub use notice::{DefaultUsage, NoticeAdapter, StderrNotices, UsageAdapter};
pub use slot::Slot;
pub use types::{AppInfo, Context, ExitPolicy, MissingFlag, Outcome, Presence, SharedSlot};
pub use value::{FlagValue, StringList};
