use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use trivia_api::db::queries::categories::{get_all_categories, import_categories};
use trivia_api::db::queries::questions::{get_all_questions, import_questions};
use trivia_api::db::{self, Category, Question};
use trivia_api::telemetry::init_tracing;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Database path
    db_path: PathBuf,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import categories.csv and questions.csv from a directory
    Import { path: PathBuf },
    /// Export categories.csv and questions.csv into a directory
    Export { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let db_path = cli.db_path.display().to_string();
    let pool = db::establish_connection(&db_path, 1)
        .await
        .with_context(|| format!("Cannot connect to DB {db_path}"))?;
    db::run_migrations(&pool).await.context("Migrations failed")?;
    let mut conn = pool.acquire().await?;

    match cli.command {
        Commands::Export { path } => {
            let categories = get_all_categories(&mut conn).await?;
            let questions = get_all_questions(&mut conn).await?;
            if !path.exists() {
                std::fs::create_dir_all(&path)?
            }
            write_to(&path.join("categories.csv"), categories)?;
            write_to(&path.join("questions.csv"), questions)?;
            tracing::info!("Exported to {}", path.display());
        }
        Commands::Import { path } => {
            let categories: Vec<Category> = read_from(&path.join("categories.csv"))?;
            let questions: Vec<Question> = read_from(&path.join("questions.csv"))?;
            tracing::info!(
                categories = categories.len(),
                questions = questions.len(),
                "Importing"
            );
            import_categories(&mut conn, categories).await?;
            import_questions(&mut conn, questions).await?;
        }
    }
    Ok(())
}

fn write_to(path: &Path, data: Vec<impl Serialize>) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Cannot create {}", path.display()))?;
    let mut wtr = csv::Writer::from_writer(file);
    for line in data {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}

fn read_from<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let file =
        std::fs::File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut out = Vec::new();
    for record in rdr.deserialize() {
        let record: T = record?;
        out.push(record);
    }
    Ok(out)
}
