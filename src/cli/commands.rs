//! CLI commands implementation.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;

use crate::config::{parse_bind_address, Settings, DEFAULT_BIND};
use crate::import::{load_countries, load_restaurants, LoadReport};
use crate::repository::{CountryRepository, RestaurantFilter, RestaurantRepository};
use crate::server;

#[derive(Parser)]
#[command(name = "dinefind")]
#[command(about = "Restaurant directory API and data tools")]
#[command(version)]
pub struct Cli {
    /// Data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and database
    Init,

    /// Start the API server
    Serve {
        /// Bind address: a port, a host, or host:port
        #[arg(long, default_value = DEFAULT_BIND)]
        bind: String,
    },

    /// Load datasets into the directory
    Load {
        #[command(subcommand)]
        command: LoadCommands,
    },

    /// Show directory status
    Status,
}

#[derive(Subcommand)]
enum LoadCommands {
    /// Load the country-code reference CSV
    Countries {
        /// Path to Country-Code.csv
        file: PathBuf,
    },

    /// Load the restaurant dataset CSV
    Restaurants {
        /// Path to the restaurant export, e.g. zomato.csv
        file: PathBuf,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::resolve(cli.data_dir);

    match cli.command {
        Commands::Init => cmd_init(&settings),
        Commands::Serve { bind } => cmd_serve(&settings, &bind).await,
        Commands::Load { command } => match command {
            LoadCommands::Countries { file } => cmd_load_countries(&settings, &file),
            LoadCommands::Restaurants { file } => cmd_load_restaurants(&settings, &file),
        },
        Commands::Status => cmd_status(&settings),
    }
}

fn cmd_init(settings: &Settings) -> anyhow::Result<()> {
    settings.ensure_data_dir()?;

    // Opening the repositories creates the schema.
    RestaurantRepository::new(&settings.database_path())?;
    CountryRepository::new(&settings.database_path())?;

    println!(
        "{} Initialized directory database at {}",
        style("✓").green(),
        settings.database_path().display()
    );
    Ok(())
}

async fn cmd_serve(settings: &Settings, bind: &str) -> anyhow::Result<()> {
    settings.ensure_data_dir()?;
    let (host, port) = parse_bind_address(bind)?;

    println!(
        "{} Starting dinefind server at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!("  Press Ctrl+C to stop");

    server::serve(settings, &host, port).await
}

fn cmd_load_countries(settings: &Settings, file: &Path) -> anyhow::Result<()> {
    settings.ensure_data_dir()?;
    let repo = CountryRepository::new(&settings.database_path())?;

    println!(
        "{} Loading countries from {}",
        style("→").cyan(),
        file.display()
    );
    let report = load_countries(&repo, file)?;
    print_report("countries", &report);
    Ok(())
}

fn cmd_load_restaurants(settings: &Settings, file: &Path) -> anyhow::Result<()> {
    settings.ensure_data_dir()?;
    let repo = RestaurantRepository::new(&settings.database_path())?;

    println!(
        "{} Loading restaurants from {}",
        style("→").cyan(),
        file.display()
    );
    let report = load_restaurants(&repo, file)?;
    print_report("restaurants", &report);
    Ok(())
}

fn print_report(what: &str, report: &LoadReport) {
    println!(
        "{} Loaded {} {}",
        style("✓").green(),
        report.loaded,
        what
    );
    if report.skipped > 0 {
        println!(
            "  {} Skipped {} malformed rows",
            style("!").yellow(),
            report.skipped
        );
    }
}

fn cmd_status(settings: &Settings) -> anyhow::Result<()> {
    let db_path = settings.database_path();
    if !db_path.is_file() {
        println!(
            "{} No database at {} — run `dinefind init` first",
            style("!").yellow(),
            db_path.display()
        );
        return Ok(());
    }

    let restaurants = RestaurantRepository::new(&db_path)?;
    let countries = CountryRepository::new(&db_path)?;

    println!("Database: {}", db_path.display());
    println!(
        "  Restaurants: {}",
        restaurants.count(&RestaurantFilter::default())?
    );
    println!("  Countries:   {}", countries.count()?);
    Ok(())
}
