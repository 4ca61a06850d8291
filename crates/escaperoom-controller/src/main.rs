//! Escape-room puzzle controller binary.
//!
//! Loads the room configuration, starts every puzzle, and serves show-control
//! messages until interrupted.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use escaperoom_controller::room::{self, Ports};
use escaperoom_controller::{ControllerConfig, logging};
use escaperoom_hardware::{MockBoard, MockKeypad};
use escaperoom_network::{OscServer, OscServerConfig, UdpMessenger, UdpMessengerConfig};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "escaperoom", version, about = "Escape-room puzzle controller")]
struct Cli {
    /// TOML configuration file. The installed room is used if omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ControllerConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ControllerConfig::default(),
    };
    config.validate().context("validating configuration")?;

    if cli.check {
        println!("configuration ok");
        return Ok(());
    }

    // Only the simulated board exists so far.
    if cfg!(feature = "hardware-gpio") {
        warn!("GPIO backend is not available in this build, using the simulated board");
    } else {
        info!("Using the simulated board");
    }
    let board = MockBoard::new();
    // Simulated wires start intact.
    for wire in &config.wire.wires {
        board.preset_input(wire.pin, true);
    }
    let ports = Ports {
        input: Arc::new(board.clone()),
        output: Arc::new(board),
        keypad: Arc::new(MockKeypad::new()),
    };

    let messenger = UdpMessenger::bind(
        UdpMessengerConfig::new(config.network.target_addr).with_broadcast(config.network.broadcast),
    )
    .await
    .context("opening the notification socket")?;
    info!(target_addr = %messenger.target(), "Notifications enabled");

    let server = OscServer::bind(OscServerConfig {
        bind_addr: config.network.bind_addr,
    })
    .await
    .context("binding the receive port")?;

    let dispatcher = room::build(&config, ports, Arc::new(messenger))?;
    let router = dispatcher.router();

    let cancel = CancellationToken::new();
    let server_task = tokio::spawn(server.run(cancel.clone(), move |message| router.route(&message)));

    info!("Controller running, press Ctrl-C to stop");
    tokio::signal::ctrl_c()
        .await
        .context("waiting for Ctrl-C")?;

    info!("Shutting down");
    cancel.cancel();
    if let Err(e) = server_task.await {
        warn!(error = %e, "Receive loop ended abnormally");
    }
    dispatcher.shutdown().await;

    Ok(())
}
