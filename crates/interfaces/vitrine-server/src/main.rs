use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use vitrine_config::ServerConfig;
use vitrine_persistence::RedbCatalogStore;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server.
    Serve {
        #[arg(long, help = "Override the bind address from the environment")]
        bind: Option<String>,
    },
    /// Write the static demo content into the database.
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).expect("default subscriber");

    let mut config = ServerConfig::from_env()?;

    match cli.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.bind = bind;
            }
            vitrine_server::run(config).await?;
        }
        Commands::Seed => {
            let store = RedbCatalogStore::open(&config.data_dir)?;
            let report = vitrine_server::seed::seed(&store)?;
            tracing::info!(
                products = report.products,
                services = report.services,
                projects = report.projects,
                contact = report.contact,
                "seeded static content into {}",
                config.data_dir
            );
        }
    }

    Ok(())
}
