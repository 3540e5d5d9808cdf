use dotenv::dotenv;
use evreg::commands::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // SMTP settings may arrive via .env, as in the original deployment
    let _ = dotenv();

    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    Cli::menu().await
}
