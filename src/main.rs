//! Rental Ledger server and maintenance commands

use clap::{Parser, Subcommand};
use std::{fs::File, net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rental_ledger::{
    api,
    audit::FileAuditLog,
    config::AppConfig,
    repository::Repository,
    services::{catalog::parse_books_csv, Services},
    AppState,
};

#[derive(Parser)]
#[command(name = "rental-ledger", version, about = "Book rental record-keeper")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Import books from a CSV export, skipping ids already present
    ImportBooks {
        #[arg(default_value = "books.csv")]
        path: PathBuf,
    },
    /// Create users by name, skipping existing names
    ImportUsers {
        #[arg(required = true)]
        usernames: Vec<String>,
    },
    /// Look up missing Amazon identifiers on Open Library
    EnrichBooks,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    init_tracing(&config);

    let repository = Repository::connect(&config.database).await?;
    tracing::info!("Connected to database {}", config.database.url);

    let audit = FileAuditLog::create(&config.audit.directory).await?;
    let services = Services::new(repository, Arc::new(audit), config.enrichment.clone())?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, services).await?,
        Command::ImportBooks { path } => {
            let books = parse_books_csv(File::open(&path)?)?;
            let summary = services.catalog.import_books(books).await?;
            println!(
                "Books imported successfully ({} new, {} skipped).",
                summary.imported, summary.skipped
            );
        }
        Command::ImportUsers { usernames } => {
            let summary = services.users.import_users(usernames).await?;
            println!(
                "Users imported ({} new, {} skipped).",
                summary.imported, summary.skipped
            );
        }
        Command::EnrichBooks => {
            let summary = services.enrichment.enrich_books().await?;
            println!(
                "Checked {} book(s): {} updated, {} failed.",
                summary.checked, summary.updated, summary.failed
            );
        }
    }

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("rental_ledger={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn serve(config: AppConfig, services: Services) -> anyhow::Result<()> {
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };
    let app = api::router(state);

    tracing::info!("Starting Rental Ledger v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
