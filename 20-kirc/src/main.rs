use anyhow::Result;
use clap::Parser;
use tracing::info;

use kirc::{
    cli::{ClientArgs, Config},
    client,
};

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    // Chat output owns stdout, diagnostics go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from(ClientArgs::parse());
    let exit = client::run(&config).await?;
    info!(?exit, "session ended");

    Ok(())
}
