use analytics::{AddressAnalytics, AddressFilter};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use configuration::load_settings;
// Import database types directly from the database crate
use database::connection::{connect, run_migrations};
use database::repository::DbRepository;
use tracing_subscriber::EnvFilter;

type Service = AddressAnalytics<DbRepository, DbRepository, DbRepository>;

/// The main entry point for the Chainfolio analysis application.
#[tokio::main]
async fn main() {
    // Load environment variables from .env file, if one exists.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();

    let settings = load_settings().expect("Failed to load configuration");

    // Initialize the database connection and run migrations
    let db_pool = connect(
        settings.database.max_connections,
        settings.database.acquire_timeout_secs,
    )
    .await
    .expect("Failed to connect to the database");
    run_migrations(&db_pool)
        .await
        .expect("Failed to run database migrations");

    let repository = DbRepository::new(db_pool);
    let service: Service =
        AddressAnalytics::new(repository.clone(), repository.clone(), repository);

    // Execute the appropriate command
    let result = match cli.command {
        Commands::Analyze(args) => handle_analyze(args, &service).await,
        Commands::Balance(args) => handle_balance(args, &service).await,
        Commands::Benchmark(args) => handle_benchmark(args, &service).await,
        Commands::Top(args) => handle_top(args, &service).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Per-address Bitcoin ledger reconstruction and performance analytics.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct an address's ledger and report its performance metrics.
    Analyze(AddressArgs),

    /// Report an address's day-by-day asset balance history.
    Balance(AddressArgs),

    /// Report buy-and-hold benchmark metrics for the reference asset.
    Benchmark(BenchmarkArgs),

    /// Rank addresses from the daily summary table by realized profit.
    Top(TopArgs),
}

#[derive(Parser)]
struct AddressArgs {
    /// The address to analyze.
    #[arg(long)]
    address: String,
}

#[derive(Parser)]
struct BenchmarkArgs {
    /// Start of the price range (format: YYYY-MM-DD); defaults to the
    /// earliest quoted date.
    #[arg(long)]
    from: Option<NaiveDate>,

    /// End of the price range (format: YYYY-MM-DD); defaults to the latest
    /// quoted date.
    #[arg(long)]
    to: Option<NaiveDate>,
}

#[derive(Parser)]
struct TopArgs {
    /// The summary date to rank (format: YYYY-MM-DD).
    #[arg(long)]
    date: NaiveDate,

    /// Keep addresses with realized profit above this, in USD.
    #[arg(long)]
    min_profit: Option<f64>,

    /// Keep addresses with peak holdings above this, in smallest units.
    #[arg(long)]
    min_peak: Option<i64>,

    /// Keep addresses still holding more than this fraction of their peak.
    #[arg(long)]
    min_ratio: Option<f64>,

    /// Keep addresses with at least this many outbound transactions.
    #[arg(long)]
    min_outbound: Option<i64>,

    /// Keep addresses first funded strictly after this date.
    #[arg(long)]
    first_inbound_after: Option<NaiveDate>,
}

// ==============================================================================
// Command Handlers
// ==============================================================================

async fn handle_analyze(args: AddressArgs, service: &Service) -> anyhow::Result<()> {
    let metrics = service.address_metrics(&args.address).await?;
    println!("{}", serde_json::to_string_pretty(&metrics)?);
    Ok(())
}

async fn handle_balance(args: AddressArgs, service: &Service) -> anyhow::Result<()> {
    let balances = service.address_balance(&args.address).await?;
    println!("{}", serde_json::to_string_pretty(&balances)?);
    Ok(())
}

async fn handle_benchmark(args: BenchmarkArgs, service: &Service) -> anyhow::Result<()> {
    let benchmark = service.benchmark(args.from, args.to).await?;
    println!("{}", serde_json::to_string_pretty(&benchmark)?);
    Ok(())
}

async fn handle_top(args: TopArgs, service: &Service) -> anyhow::Result<()> {
    let filter = AddressFilter {
        min_realized_profit: args.min_profit,
        min_peak_holdings: args.min_peak,
        min_current_to_peak_ratio: args.min_ratio,
        min_outbound_count: args.min_outbound,
        first_inbound_after: args.first_inbound_after,
    };
    let addresses = service.top_addresses(args.date, &filter).await?;
    println!("{}", serde_json::to_string_pretty(&addresses)?);
    Ok(())
}
