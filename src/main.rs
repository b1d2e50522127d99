use clap::Parser;
use tracing::{debug, error, info, warn};

mod log;
mod signal;
mod utils;

#[derive(Parser)]
#[command(version)]
struct Args {
    /// Set config file path
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let cfg = airman::config::Config::load(args.config)?;

    log::set(&cfg.log.level);

    warn!("set log level : {}", cfg.log.level);
    debug!("config : {:?}", cfg);

    let listener = tokio::net::TcpListener::bind(cfg.http.listen).await?;

    if let Err(e) = airman::serve(cfg, listener, utils::shutdown_signal()).await {
        error!("Server error: {:?}", e);
        return Err(e);
    }
    info!("Server shutdown");
    Ok(())
}
