use std::error::Error;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info};
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hostwatch::config::load_config;
use hostwatch::monitor::Monitor;
use hostwatch::notifications::webhook::TeamsWebhookSender;
use hostwatch::ping::IcmpPinger;
use hostwatch::version::VERSION;

const DEFAULT_CONFIG_PATH: &str = "servers.json";

fn init_logging() {
    // File log: JSON format, daily rotation. Stdout: human-readable.
    let file_appender = rolling::daily("logs", "hostwatch.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .json();

    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    // Default to `info` if RUST_LOG is not set.
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.contains(&"--version".to_string()) {
        println!("hostwatch {VERSION}");
        return Ok(());
    }

    let config_path = args
        .iter()
        .skip(1)
        .find(|a| !a.starts_with("--"))
        .cloned()
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    init_logging();
    info!(version = VERSION, "starting hostwatch");

    let config = match load_config(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!(path = %config_path, error = %e, "failed to load configuration, exiting");
            return Err(e.into());
        }
    };
    info!(
        path = %config_path,
        servers = config.servers.len(),
        interval_seconds = config.poll_interval,
        "configuration loaded"
    );

    let pinger = match IcmpPinger::new() {
        Ok(pinger) => Arc::new(pinger),
        Err(e) => {
            // Raw ICMP sockets usually need elevated privilege.
            error!(error = %e, "failed to open icmp socket, exiting");
            return Err(e.into());
        }
    };
    let alerts = Arc::new(TeamsWebhookSender::new(config.teams_webhook_url.clone()));

    let (shutdown_tx, shutdown_rx) = watch::channel(());
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
            return;
        }
        info!("ctrl-c received, finishing current cycle");
        let _ = shutdown_tx.send(());
    });

    let monitor = Monitor::new(&config, pinger, alerts);
    monitor.run(shutdown_rx).await;

    info!("hostwatch stopped");
    Ok(())
}
