//! LSW CLI - Command line tool for lake surface-water forecast analytics.

use clap::Parser;
use lsw_forecast::config::{
    ClientConfig, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_BACKOFF, DEFAULT_TIMEOUT,
};
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "lsw-cli",
    version,
    about = "Lake surface-water forecast analytics toolkit"
)]
struct Cli {
    /// Base URL of the forecast query interface
    #[arg(long, env = "LSW_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "LSW_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs(), global = true)]
    timeout_secs: u64,

    /// Retries after a failed request
    #[arg(long, env = "LSW_RETRIES", default_value_t = DEFAULT_MAX_RETRIES, global = true)]
    retries: u32,

    #[command(subcommand)]
    command: lsw_cmd::Command,
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            max_retries: self.retries,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = cli.client_config();
    lsw_cmd::run(config, cli.command).await
}
