use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::config::{MonitorConfig, Server};
use crate::notifications::AlertSender;
use crate::ping::Pinger;

/// Drives periodic reachability checks over the configured servers and
/// dispatches an alert for every server found down.
pub struct Monitor {
    poll_interval: Duration,
    servers: Vec<Server>,
    pinger: Arc<dyn Pinger>,
    alerts: Arc<dyn AlertSender>,
}

impl Monitor {
    pub fn new(
        config: &MonitorConfig,
        pinger: Arc<dyn Pinger>,
        alerts: Arc<dyn AlertSender>,
    ) -> Self {
        Self {
            poll_interval: Duration::from_secs(config.poll_interval),
            servers: config.servers.clone(),
            pinger,
            alerts,
        }
    }

    /// Runs poll cycles until `shutdown` fires. Shutdown is honored at the
    /// cycle boundary: a cycle already in flight runs to completion first.
    pub async fn run(&self, mut shutdown: watch::Receiver<()>) {
        info!(
            servers = self.servers.len(),
            interval_seconds = self.poll_interval.as_secs(),
            "monitor loop started"
        );

        loop {
            self.run_cycle().await;

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                _ = shutdown.changed() => {
                    info!("shutdown requested, monitor loop stopping");
                    break;
                }
            }
        }
    }

    /// One full pass over every configured server, in list order.
    async fn run_cycle(&self) {
        for server in &self.servers {
            self.check_server(server).await;
        }
    }

    async fn check_server(&self, server: &Server) {
        let pinger = Arc::clone(&self.pinger);
        let address = server.address.clone();

        // Each probe gets its own task so a panicking probe implementation
        // cannot take the rest of the cycle down with it.
        let verdict = tokio::spawn(async move { pinger.ping(&address).await }).await;

        match verdict {
            Ok(Ok(rtt)) => {
                info!(
                    address = %server.address,
                    rtt_ms = rtt.as_millis() as u64,
                    "server is up"
                );
            }
            Ok(Err(e)) => self.handle_down(&server.address, &e.to_string()).await,
            Err(join_err) => {
                self.handle_down(&server.address, &format!("probe task panicked: {join_err}"))
                    .await
            }
        }
    }

    /// Logs the down observation and dispatches one alert. Delivery failure
    /// is logged and swallowed; the server has already been judged down.
    async fn handle_down(&self, address: &str, reason: &str) {
        warn!(address = %address, reason = %reason, "server is down");

        let message = format!("Server {address} is down");
        match self.alerts.send(&message).await {
            Ok(()) => info!(address = %address, "alert sent"),
            Err(e) => error!(address = %address, error = %e, "failed to send alert"),
        }
    }
}
