use crate::engine::DEFAULT_TICK_INTERVAL;
use crate::incidents::DEFAULT_TICKET_CAPACITY;
use crate::rate::ResetPolicy;
use crate::transport::{TransportConfig, DEFAULT_RECONNECT_DELAY};
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// WebSocket endpoint delivering topology and incident records
    #[arg(short, long, env = "NETMON_WEBSOCKET_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Server port
    #[arg(short, long, env = "NETMON_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Server host
    #[arg(long, env = "NETMON_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Number of tickets kept in the live feed
    #[arg(long, env = "NETMON_TICKET_CAPACITY", default_value_t = DEFAULT_TICKET_CAPACITY)]
    pub ticket_capacity: usize,

    /// Rate recompute period in milliseconds
    #[arg(long, env = "NETMON_TICK_MS", default_value_t = DEFAULT_TICK_INTERVAL.as_millis() as u64)]
    pub tick_ms: u64,

    /// Delay before re-dialling a dropped transport, in milliseconds
    #[arg(long, env = "NETMON_RECONNECT_MS", default_value_t = DEFAULT_RECONNECT_DELAY.as_millis() as u64)]
    pub reconnect_ms: u64,

    /// Reset the incident rate window whenever the transport reconnects
    #[arg(long, env = "NETMON_RATE_RESET_ON_RECONNECT")]
    pub rate_reset_on_reconnect: bool,

    /// Reset the incident rate window after this many seconds without a counted incident
    #[arg(long, env = "NETMON_RATE_IDLE_RESET_SECS")]
    pub rate_idle_reset_secs: Option<u64>,
}

impl Args {
    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    pub fn reset_policy(&self) -> ResetPolicy {
        ResetPolicy {
            on_reconnect: self.rate_reset_on_reconnect,
            idle_after: self.rate_idle_reset_secs.map(Duration::from_secs),
        }
    }

    pub fn transport(&self) -> Option<TransportConfig> {
        self.endpoint.as_ref().map(|endpoint| TransportConfig {
            endpoint: endpoint.clone(),
            reconnect_delay: Duration::from_millis(self.reconnect_ms),
        })
    }
}
