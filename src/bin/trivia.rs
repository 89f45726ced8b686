use anyhow::Context;
use clap::Parser;
use trivia_api::db;
use trivia_api::server::app::run_server;
use trivia_api::settings::Settings;
use trivia_api::telemetry::init_tracing;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(default_value = "serve")]
    runner: Runner,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Runner {
    /// Apply migrations and serve the API
    Serve,
    /// Apply migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = Settings::load().context("Failed to load settings")?;

    let pool = db::establish_connection(&settings.database_path, settings.max_connections)
        .await
        .with_context(|| format!("Cannot open database {}", settings.database_path))?;

    tracing::info!("Running db migrations...");
    db::run_migrations(&pool)
        .await
        .context("Migrations failed")?;

    match cli.runner {
        Runner::Serve => run_server(pool, &settings).await?,
        Runner::Migrate => tracing::info!("Migrations applied"),
    };
    Ok(())
}
