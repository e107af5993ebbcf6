use async_trait::async_trait;
use rand::random;
use std::net::IpAddr;
use std::time::Duration;
use thiserror::Error;

/// Echo requests sent per probe. The burst is one verdict: a host counts as
/// reachable as soon as one echo is answered.
const ECHO_COUNT: u16 = 4;

#[derive(Error, Debug)]
pub enum PingError {
    #[error("failed to resolve '{address}': {source}")]
    Resolve {
        address: String,
        source: std::io::Error,
    },
    #[error("no addresses found for '{0}'")]
    NoAddress(String),
    #[error("resolver task failed: {0}")]
    ResolverTask(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Probe(#[from] surge_ping::SurgeError),
}

/// Reachability probe for a single host.
///
/// ICMP needs raw-socket privilege, so the mechanism stays behind a trait
/// and tests substitute a deterministic implementation.
#[async_trait]
pub trait Pinger: Send + Sync {
    /// Probe one address. `Ok` carries the round-trip time of the answering
    /// echo; any error means the host is treated as down, with the error
    /// text as the reason.
    async fn ping(&self, address: &str) -> Result<Duration, PingError>;
}

/// ICMP echo prober backed by surge-ping.
pub struct IcmpPinger {
    client: surge_ping::Client,
}

impl IcmpPinger {
    /// Opens the shared ICMP socket, which usually requires elevated
    /// privilege.
    pub fn new() -> std::io::Result<Self> {
        let client = surge_ping::Client::new(&surge_ping::Config::default())?;
        Ok(Self { client })
    }

    /// Resolves a hostname or IP literal with the system resolver. The
    /// client socket is IPv4, so an IPv4 address is preferred when the name
    /// resolves to both families.
    async fn resolve(address: &str) -> Result<IpAddr, PingError> {
        let host = address.to_string();
        let resolved: Vec<IpAddr> = tokio::task::spawn_blocking(move || {
            use std::net::ToSocketAddrs;
            format!("{host}:0")
                .to_socket_addrs()
                .map(|addrs| addrs.map(|a| a.ip()).collect())
        })
        .await?
        .map_err(|source| PingError::Resolve {
            address: address.to_string(),
            source,
        })?;

        resolved
            .iter()
            .copied()
            .find(IpAddr::is_ipv4)
            .or_else(|| resolved.first().copied())
            .ok_or_else(|| PingError::NoAddress(address.to_string()))
    }
}

#[async_trait]
impl Pinger for IcmpPinger {
    async fn ping(&self, address: &str) -> Result<Duration, PingError> {
        let target = Self::resolve(address).await?;

        let mut pinger = self
            .client
            .pinger(target, surge_ping::PingIdentifier(random()))
            .await;

        let mut verdict = pinger.ping(surge_ping::PingSequence(0), &[]).await;
        for seq in 1..ECHO_COUNT {
            if verdict.is_ok() {
                break;
            }
            verdict = pinger.ping(surge_ping::PingSequence(seq), &[]).await;
        }

        let (_reply, rtt) = verdict?;
        Ok(rtt)
    }
}
