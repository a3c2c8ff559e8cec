mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::net::SocketAddr;
use std::sync::Arc;
use tether_client::{
    Session, SessionConfig, SessionHandle, SessionStatus, SyncRoute, TransportConfig, WsConnector,
};
use tether_core::{ControlState, IceServerConfig, LaunchParams, Role, controller_join_url};
use tether_server::{DEFAULT_BIND_ADDR, RelayServerConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::commands::{Command, parse_command};

const DEFAULT_RELAY_URL: &str = "ws://127.0.0.1:8787/relay";

#[derive(Parser)]
#[command(name = "tether", version, about = "Pair a controller with a receiver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the presence relay.
    Serve {
        #[arg(long, env = "TETHER_BIND", default_value = DEFAULT_BIND_ADDR)]
        bind: SocketAddr,

        #[arg(long, default_value_t = 100)]
        room_capacity: usize,
    },

    /// Open an endpoint. The page URL decides the role: `?control=<room>`
    /// makes a controller, anything else a receiver.
    Open {
        page: String,

        #[arg(long, env = "TETHER_RELAY_URL", default_value = DEFAULT_RELAY_URL)]
        relay: Url,

        /// STUN/TURN server URL; repeatable. Defaults to public STUN.
        #[arg(long = "ice-server")]
        ice_servers: Vec<String>,

        /// Use host candidates only.
        #[arg(long, conflicts_with = "ice_servers")]
        host_only: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Serve {
            bind,
            room_capacity,
        } => {
            println!("{}", "Starting tether relay...".green().bold());
            println!("   ws://{}/relay", bind);
            tether_server::serve(RelayServerConfig {
                bind_addr: bind,
                room_capacity,
            })
            .await
            .context("Relay server failed")?;
        }

        Commands::Open {
            page,
            relay,
            ice_servers,
            host_only,
        } => {
            let transport = if host_only {
                TransportConfig::host_only()
            } else if ice_servers.is_empty() {
                TransportConfig::default()
            } else {
                TransportConfig {
                    ice_servers: ice_servers.into_iter().map(IceServerConfig::new).collect(),
                }
            };
            open(&page, relay, transport).await?;
        }
    }

    Ok(())
}

async fn open(page: &str, relay: Url, transport: TransportConfig) -> Result<()> {
    let page_url = Url::parse(page).context("Invalid page URL")?;
    let params = LaunchParams::from_url(&page_url).context("Cannot start from this page URL")?;

    println!(
        "{} {} in room {}",
        "Opening".cyan(),
        params.role.to_string().as_str().bold(),
        params.room_id.as_str().bold()
    );
    if params.role == Role::Receiver {
        let join = controller_join_url(&page_url, &params.room_id);
        println!("   Controller link: {}", join.as_str().underline());
    }

    let role = params.role;
    let session = Session::spawn(
        SessionConfig::from_launch(params, transport),
        Arc::new(WsConnector::new(relay)),
    )
    .await
    .context("Failed to start session")?;

    let mut status = session.status();
    tokio::spawn(async move {
        loop {
            print_status(&status.borrow_and_update());
            if status.changed().await.is_err() {
                break;
            }
        }
    });

    match role {
        Role::Receiver => run_receiver(&session).await,
        Role::Controller => run_controller(&session).await?,
    }

    session.shutdown().await;
    println!("{}", "Bye.".green());
    Ok(())
}

async fn run_receiver(session: &SessionHandle) {
    let mut controls = session.controls();
    loop {
        tokio::select! {
            changed = controls.changed() => {
                if changed.is_err() {
                    break;
                }
                print_controls(&controls.borrow_and_update());
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
}

async fn run_controller(session: &SessionHandle) -> Result<()> {
    println!("   Commands: a | b | a on|off | b on|off | pad X Y | quit");

    let controls = session.controls();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read stdin")?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };

        let current = *controls.borrow();
        match parse_command(&line, &current) {
            Ok(Command::Quit) => break,
            Ok(Command::Patch(patch)) => {
                let route = session
                    .set_local(patch)
                    .await
                    .context("Session stopped")?;
                print_route(route, &controls.borrow());
            }
            Err(e) => println!("{} {}", "?".yellow(), e),
        }
    }

    Ok(())
}

fn print_status(status: &SessionStatus) {
    let text = status.to_string();
    let text = text.as_str();
    let styled = match status {
        SessionStatus::Direct => text.green(),
        SessionStatus::RelayOnly | SessionStatus::Connecting => text.yellow(),
        SessionStatus::Offline => "offline / no controller".red(),
        SessionStatus::RoleConflict { .. } => text.red(),
    };
    println!("{} {}", "status:".dimmed(), styled.bold());
}

fn print_controls(controls: &ControlState) {
    println!(
        "a={} b={} trackpad=({:.3}, {:.3})",
        on_off(controls.a),
        on_off(controls.b),
        controls.trackpad[0],
        controls.trackpad[1]
    );
}

fn print_route(route: SyncRoute, controls: &ControlState) {
    let via = match route {
        SyncRoute::DataChannel => "data channel".green(),
        SyncRoute::Relay => "relay".yellow(),
        SyncRoute::Dropped => "nowhere (offline)".red(),
    };
    println!("{} {}", "sent via".dimmed(), via);
    print_controls(controls);
}

fn on_off(value: bool) -> ColoredString {
    if value { "on".green() } else { "off".dimmed() }
}
