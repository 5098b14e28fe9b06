use crate::game::RackPolicy;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Command line configuration of the game server
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct ServerConfig {
    /// IP address to bind both listeners to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    pub host: String,

    /// HTTP API port
    #[arg(short, long, default_value = "3000")]
    pub port: u16,

    /// UDP port for update notifications
    #[arg(short, long, default_value = "3001")]
    pub notify_port: u16,

    /// Word list, one word per line
    #[arg(short, long)]
    pub words: PathBuf,

    /// Persist games as JSON under this directory instead of in memory
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    #[arg(long, default_value = "64")]
    pub max_subscribers: usize,

    /// Seconds without a heartbeat before a subscriber is dropped
    #[arg(long, default_value = "30")]
    pub subscriber_timeout: u64,

    /// Accept the letters a client reports as left on hand without checking
    #[arg(long)]
    pub trust_client_rack: bool,
}

impl ServerConfig {
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn notify_addr(&self) -> String {
        format!("{}:{}", self.host, self.notify_port)
    }

    pub fn subscriber_timeout(&self) -> Duration {
        Duration::from_secs(self.subscriber_timeout)
    }

    pub fn rack_policy(&self) -> RackPolicy {
        if self.trust_client_rack {
            RackPolicy::Trust
        } else {
            RackPolicy::Verify
        }
    }
}
