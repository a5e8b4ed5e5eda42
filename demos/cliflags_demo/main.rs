//! # cliflags demo application
//!
//! A sample CLI that exercises the library end to end. It does not talk to
//! any network; actions only print what they resolved.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example cliflags_demo -- -h
//! cargo run --example cliflags_demo -- server -port 8090
//! cargo run --example cliflags_demo -- -d -dbglvl 2 client -port 9000 ping
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature                | How to exercise it                                              |
//! |------------------------|-----------------------------------------------------------------|
//! | Sentinel defaults      | `cargo run --example cliflags_demo -- server`                   |
//! | Env var override       | `DEMO_PORT=7000 cargo run --example cliflags_demo -- server`    |
//! | Config file            | `cargo run --example cliflags_demo -- -c demo.toml server`      |
//! | Allow-list             | `cargo run --example cliflags_demo -- -capture nope`            |
//! | Required flag          | `cargo run --example cliflags_demo -- client`                   |
//! | Command help           | `cargo run --example cliflags_demo -- client -h`                |
//! | Subcommands            | `cargo run --example cliflags_demo -- client -port 1 ping`      |
//! | Version                | `cargo run --example cliflags_demo -- -v`                       |
//! | Completion             | `cargo run --example cliflags_demo -- -generate-bash-completion` |
//! | Config section         | `[clients]` table in the config file, read by `client ping`     |

mod config;

use std::process;

use cliflags::{AppInfo, Cli, Command, Context, Flag, Outcome, Slot};
use tracing::{Level, debug, info};

use config::ClientsSection;

fn install_logging(ctx: &Context) -> Result<(), cliflags::ActionError> {
    if !ctx.debug {
        return Ok(());
    }
    let level = match ctx.debug_level {
        i64::MIN..=0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    // A second parse in the same process keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
    debug!(?level, "logging enabled");
    Ok(())
}

fn main() {
    let capture = Slot::new(String::new());
    let path = Slot::new(String::new());
    let url = Slot::new(String::new());
    let fields = Slot::new(String::new());

    let server_port = Slot::new(0i64);
    let workers = Slot::new(0u64);
    let client_port = Slot::new(0i64);
    let target = Slot::new(String::new());
    let timeout = Slot::new(0.0f64);
    let clients = Slot::new(ClientsSection::default());

    let mut cli = Cli::new("cliflags-demo")
        .app_info(AppInfo {
            title: "cliflags demo".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            build_date: "unknown".into(),
            git_commit: "unknown".into(),
            ..AppInfo::default()
        })
        .env_prefix("DEMO")
        .platform_config()
        .flag(
            Flag::new("capture", &capture)
                .usage("greeting to capture")
                .options(["hello", "bye"]),
        )
        .flag(Flag::new("path", &path).short("p").usage("data directory").default("/tmp"))
        .flag(Flag::new("url", &url).usage("upstream url"))
        .flag(
            Flag::new("fieldname", &fields)
                .usage("fields to print, comma separated")
                .options(["name", "port", "url"])
                .comma_separated(),
        )
        .post_global_action(install_logging)
        .command(
            Command::new("server")
                .short("s")
                .usage("run as a server")
                .flag(Flag::new("port", &server_port).default(8080).usage("listen port"))
                .flag(Flag::new("workers", &workers).default(4u64).usage("worker threads"))
                .action({
                    let (port, workers, path) = (server_port.clone(), workers.clone(), path.clone());
                    move |ctx| {
                        info!(port = port.get(), workers = workers.get(), "server starting");
                        println!(
                            "server: port={} workers={} path={} args={:?}",
                            port.get(),
                            workers.get(),
                            path.get(),
                            ctx.args
                        );
                        Ok(())
                    }
                }),
        )
        .command(
            Command::new("client")
                .short("cl")
                .usage("run as a client")
                .flag(Flag::new("port", &client_port).required().usage("port to dial"))
                .flag(Flag::new("timeout", &timeout).default(2.5).usage("seconds"))
                .pre_action(|_| {
                    debug!("client pre-action");
                    Ok(())
                })
                .subcommand(
                    Command::new("ping")
                        .usage("ping a configured client")
                        .flag(Flag::new("target", &target).usage("entry in [clients]"))
                        .action({
                            let (clients, target, port) =
                                (clients.clone(), target.clone(), client_port.clone());
                            move |_| {
                                let clients = clients.get();
                                let name = target.get();
                                let entry = clients
                                    .find(&name)
                                    .ok_or_else(|| format!("no client named '{name}' in [clients]"))?;
                                println!(
                                    "ping {} at {} (port {}, retries {})",
                                    entry.name,
                                    entry.url,
                                    port.get(),
                                    entry.retries
                                );
                                Ok(())
                            }
                        }),
                ),
        )
        .command(Command::new("clients").hidden().section(&clients))
        .main_action({
            let (capture, fields) = (capture.clone(), fields.clone());
            move |ctx| {
                println!(
                    "main: capture={:?} fields={:?} args={:?}",
                    capture.get(),
                    fields.get(),
                    ctx.args
                );
                Ok(())
            }
        });

    match cli.parse() {
        Ok(Outcome::Dispatched { command, subcommand }) => {
            debug!(%command, ?subcommand, "done");
        }
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(e.exit_code());
        }
    }
}
