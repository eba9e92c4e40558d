use clap::Parser;
use parallel_curl::utils::{logger, validation::Validate};
use parallel_curl::{ServerConfig, TargetServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();

    logger::init_cli_logger(config.verbose);
    if config.verbose {
        tracing::debug!("Server config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let server = TargetServer::bind(config.bind, config.sleep_duration()).await?;
    println!("Listening on http://{}", server.local_addr()?);

    server.serve().await?;
    Ok(())
}
