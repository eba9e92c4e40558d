use crate::utils::error::Result;
use crate::utils::validation::{validate_range, Validate};
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "target-server")]
#[command(about = "Tiny HTTP server the parallel-curl batch is aimed at")]
pub struct ServerConfig {
    #[arg(long, default_value = "127.0.0.1:7878")]
    pub bind: SocketAddr,

    #[arg(long, default_value = "5000", help = "How long GET /sleep waits before answering")]
    pub sleep_ms: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ServerConfig {
    pub fn sleep_duration(&self) -> Duration {
        Duration::from_millis(self.sleep_ms)
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<()> {
        validate_range("sleep_ms", self.sleep_ms, 0, 600_000)?;
        Ok(())
    }
}
