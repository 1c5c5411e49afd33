use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ymusic_gateway::{server, Config};

#[derive(Parser)]
#[command(name = "ymusic-gateway")]
#[command(about = "REST gateway for the Yandex Music API")]
#[command(version)]
struct Cli {
    /// Address to bind (or set YMG_HOST env var)
    #[arg(long, env = "YMG_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to bind (or set YMG_PORT env var)
    #[arg(long, env = "YMG_PORT", default_value_t = 8000)]
    port: u16,

    /// Directory served at the root path (or set YMG_STATIC_DIR env var)
    #[arg(long, env = "YMG_STATIC_DIR", default_value = "./static")]
    static_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    let config = Config::new(cli.host, cli.port, cli.static_dir);
    server::serve(config).await.context("Server error")?;

    Ok(())
}
