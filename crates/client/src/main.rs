//! Pulse terminal client entry point.

use anyhow::Result;
use pulse_client::ui::App;

#[tokio::main]
async fn main() -> Result<()> {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pulse_client=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    App::new().run().await
}
