//! initd - initiative daemon

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use figment::providers::Serialized;
use initd::{Config, Server};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Serve deterministic initiative order for tabletop encounters
#[derive(Parser, Debug, Serialize)]
#[command(name = "initd", version, about)]
struct Args {
    /// Address to listen on
    #[arg(short, long = "bind")]
    #[serde(rename = "bind_addr", skip_serializing_if = "Option::is_none")]
    bind: Option<SocketAddr>,

    /// Data directory holding players/ and monsters/
    #[arg(short = 'd', long = "dir")]
    #[serde(rename = "data_dir", skip_serializing_if = "Option::is_none")]
    dir: Option<PathBuf>,

    /// Player source directory (default: <dir>/players)
    #[arg(long = "players")]
    #[serde(rename = "players_dir", skip_serializing_if = "Option::is_none")]
    players: Option<PathBuf>,

    /// Monster source directory (default: <dir>/monsters)
    #[arg(long = "monsters")]
    #[serde(rename = "monsters_dir", skip_serializing_if = "Option::is_none")]
    monsters: Option<PathBuf>,

    /// Config file (default: initd.toml if present)
    #[arg(short, long)]
    #[serde(skip)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "initd=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Defaults < config file < INITD_* env < CLI flags
    let config: Config = Config::figment(args.config.as_deref())
        .merge(Serialized::defaults(&args))
        .extract()?;

    let server = Server::new(config).await?;
    server.run().await?;

    Ok(())
}
