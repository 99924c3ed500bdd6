// Dealer CLI - Command-line interface for the dealership inventory

mod display;

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dealer_core::config::{DEFAULT_INVENTORY_FILE, DEFAULT_SALES_FILE};
use dealer_core::{Car, CarChanges, DealerConfig, DealerManager};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Dealer - track cars for sale and the sales history
#[derive(Parser)]
#[command(name = "dealer")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Inventory file (JSON array of cars)
    #[arg(long, global = true, env = "DEALER_INVENTORY_FILE", default_value = DEFAULT_INVENTORY_FILE)]
    inventory_file: PathBuf,

    /// Sales history file (JSON array of sale records)
    #[arg(long, global = true, env = "DEALER_SALES_FILE", default_value = DEFAULT_SALES_FILE)]
    sales_file: PathBuf,

    /// Apply changes in memory only, without saving
    #[arg(long, global = true)]
    dry_run: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a car to the inventory
    Add {
        #[arg(long)]
        make: String,

        #[arg(long)]
        model: String,

        #[arg(long)]
        year: i32,

        #[arg(long, allow_negative_numbers = true)]
        price: f64,

        /// 17-character Vehicle Identification Number
        #[arg(long)]
        vin: String,

        /// Picture of the car (defaults to a placeholder)
        #[arg(long, default_value = "")]
        image_url: String,
    },
    /// List every car in stock
    List,
    /// Show one car by VIN
    Show {
        vin: String,
    },
    /// Search make, model and VIN (no query lists everything)
    Search {
        query: Option<String>,
    },
    /// Change the price, year or image of a car
    Edit {
        vin: String,

        #[arg(long, allow_negative_numbers = true)]
        price: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        year: Option<i32>,

        #[arg(long)]
        image_url: Option<String>,
    },
    /// Sell a car: remove it from stock and record the sale
    Sell {
        vin: String,
    },
    /// Show sales totals and history
    Report {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Which files a command touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Touched {
    Inventory,
    InventoryAndSales,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// RUST_LOG wins over the -v flag; logs go to stderr.
fn init_logging(verbose: u8) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = DealerConfig::with_paths(cli.inventory_file, cli.sales_file);
    tracing::debug!(
        inventory = %config.inventory_path.display(),
        sales = %config.sales_path.display(),
        "using data files"
    );
    let mut manager = DealerManager::open(config);

    let touched = match cli.command {
        Commands::Add {
            make,
            model,
            year,
            price,
            vin,
            image_url,
        } => handle_add(&mut manager, &make, &model, year, price, &vin, &image_url)?,
        Commands::List => {
            handle_list(&manager);
            None
        }
        Commands::Show { vin } => {
            handle_show(&manager, &vin)?;
            None
        }
        Commands::Search { query } => {
            handle_search(&manager, query.as_deref().unwrap_or(""));
            None
        }
        Commands::Edit {
            vin,
            price,
            year,
            image_url,
        } => handle_edit(&mut manager, &vin, CarChanges { price, year, image_url })?,
        Commands::Sell { vin } => handle_sell(&mut manager, &vin)?,
        Commands::Report { json } => {
            handle_report(&manager, json)?;
            None
        }
    };

    match touched {
        Some(_) if cli.dry_run => {
            println!("{}", "(dry run: changes not saved)".dimmed());
            Ok(())
        }
        Some(touched) => persist(&manager, touched),
        None => Ok(()),
    }
}

fn persist(manager: &DealerManager, touched: Touched) -> anyhow::Result<()> {
    match touched {
        Touched::Inventory => manager.save(),
        Touched::InventoryAndSales => manager.save_all(),
    }
    .context("changes were applied but could not be saved")
}

fn handle_add(
    manager: &mut DealerManager,
    make: &str,
    model: &str,
    year: i32,
    price: f64,
    vin: &str,
    image_url: &str,
) -> anyhow::Result<Option<Touched>> {
    let car = Car::new(make, model, year, price, vin, image_url)
        .map_err(|e| anyhow!("Could not create car: {}", e))?;
    let summary = car.to_string();

    manager.add(car)?;

    println!("{} Added: {}", "✓".green().bold(), summary);
    Ok(Some(Touched::Inventory))
}

fn handle_list(manager: &DealerManager) {
    let cars: Vec<&Car> = manager.inventory().iter().collect();
    match display::inventory_listing("Current Inventory", &cars) {
        Some(listing) => println!("{}", listing),
        None => println!("The inventory is currently empty."),
    }
}

fn handle_show(manager: &DealerManager, vin: &str) -> anyhow::Result<()> {
    let car = manager
        .find_by_vin(vin)
        .ok_or_else(|| anyhow!("Car with VIN {} not found", vin.trim().to_uppercase()))?;
    println!("{}", display::car_details(car));
    Ok(())
}

fn handle_search(manager: &DealerManager, query: &str) {
    let results = manager.search(query);
    let title = if query.trim().is_empty() {
        "Current Inventory".to_string()
    } else {
        format!("Search Results for '{}' ({} found)", query.trim(), results.len())
    };

    match display::inventory_listing(&title, &results) {
        Some(listing) => println!("{}", listing),
        None => println!("No cars found matching '{}'.", query.trim()),
    }
}

fn handle_edit(
    manager: &mut DealerManager,
    vin: &str,
    changes: CarChanges,
) -> anyhow::Result<Option<Touched>> {
    if changes.is_empty() {
        return Err(anyhow!(
            "Nothing to change. Pass at least one of --price, --year or --image-url"
        ));
    }

    let car = manager.edit(vin, &changes)?;
    println!("{} Updated: {}", "✓".green().bold(), car);
    Ok(Some(Touched::Inventory))
}

fn handle_sell(manager: &mut DealerManager, vin: &str) -> anyhow::Result<Option<Touched>> {
    let sale = manager.remove(vin)?;
    println!("{} Sold: {}", "✓".green().bold(), sale);
    Ok(Some(Touched::InventoryAndSales))
}

fn handle_report(manager: &DealerManager, json: bool) -> anyhow::Result<()> {
    let report = manager.sales_report();
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", display::sales_summary(&report));
    }
    Ok(())
}
