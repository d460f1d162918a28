mod browse;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use fsf_view::SortMode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "fsf")]
#[command(about = "Find food and shelter listings near you")]
struct Cli {
    /// Listings document; overrides `FSF_LISTINGS_PATH`.
    #[arg(long, global = true, value_name = "PATH")]
    listings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse food listings.
    #[command(allow_negative_numbers = true)]
    Food(BrowseArgs),
    /// Browse shelter listings.
    #[command(allow_negative_numbers = true)]
    Shelter(BrowseArgs),
    /// Great-circle distance between two points, in km.
    #[command(allow_negative_numbers = true)]
    Distance {
        lat1: f64,
        lon1: f64,
        lat2: f64,
        lon2: f64,
    },
}

#[derive(Debug, Clone, Args)]
pub(crate) struct BrowseArgs {
    /// Your latitude. Without it the view behaves as if location is unavailable.
    #[arg(long, requires = "lon")]
    lat: Option<f64>,

    /// Your longitude.
    #[arg(long, requires = "lat")]
    lon: Option<f64>,

    /// Case-insensitive name filter.
    #[arg(long)]
    search: Option<String>,

    /// name, price-low, price-high, or distance.
    #[arg(long, default_value_t = SortMode::Name)]
    sort: SortMode,

    /// Only show listings within this many km.
    #[arg(long, value_name = "KM")]
    nearby: Option<f64>,

    /// Print the derived view as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let mut config = fsf_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(path) = cli.listings {
        config.listings_path = path;
    }

    match cli.command {
        Commands::Food(args) => {
            let file = fsf_core::load_listings(&config.listings_path)?;
            browse::run_browse(&config, file.food, &args).await?;
        }
        Commands::Shelter(args) => {
            let file = fsf_core::load_listings(&config.listings_path)?;
            browse::run_browse(&config, file.shelter, &args).await?;
        }
        Commands::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        } => {
            let from = fsf_core::Coordinate::new(lat1, lon1)?;
            let to = fsf_core::Coordinate::new(lat2, lon2)?;
            println!("{:.2} km", fsf_geo::distance_km(from, to));
        }
    }

    Ok(())
}
