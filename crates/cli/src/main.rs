//! Cookie Courier CLI - Shipping schedule and quote tools.
//!
//! # Usage
//!
//! ```bash
//! # Shipment date and delivery window for an order placed today
//! courier-cli window --carrier UPS --service "UPS Ground"
//!
//! # Shipment dates for a week of order days
//! courier-cli schedule --from 2026-10-12 --days 7
//!
//! # Parcel for a cart of 10 cookies
//! courier-cli parcel --items 10
//!
//! # Live rates (sample rates without SHIPPO_API_TOKEN)
//! courier-cli quote --street1 "125 Ellison St" --city Paterson --state NJ --zip 07505 --items 12
//! ```
//!
//! # Commands
//!
//! - `window` - Compute a shipping window
//! - `schedule` - Print order day to shipment date mapping
//! - `parcel` - Derive the parcel for a cart size
//! - `quote` - Fetch rates from the carrier API

#![cfg_attr(not(test), forbid(unsafe_code))]

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "courier-cli")]
#[command(author, version, about = "Cookie Courier CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the shipment date and delivery window
    Window {
        /// Order date (default: today)
        #[arg(short, long)]
        today: Option<NaiveDate>,

        /// Carrier name, e.g. USPS
        #[arg(short, long, default_value = "")]
        carrier: String,

        /// Service level name, e.g. "Priority Mail"
        #[arg(short, long, default_value = "")]
        service: String,
    },
    /// Print the shipment date for a run of order days
    Schedule {
        /// First order date (default: today)
        #[arg(short, long)]
        from: Option<NaiveDate>,

        /// Number of consecutive days
        #[arg(short, long, default_value_t = 7)]
        days: u32,
    },
    /// Derive the parcel for a number of cookies
    Parcel {
        /// Number of cookies in the cart
        #[arg(short, long)]
        items: u32,
    },
    /// Fetch shipping rates for a destination
    Quote {
        #[arg(long, default_value = "")]
        name: String,

        #[arg(long)]
        street1: String,

        #[arg(long)]
        city: String,

        #[arg(long)]
        state: String,

        #[arg(long)]
        zip: String,

        #[arg(long, default_value = "US")]
        country: String,

        /// Number of cookies in the cart
        #[arg(short, long, default_value_t = 6)]
        items: u32,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Window {
            today,
            carrier,
            service,
        } => {
            commands::window::window(today.unwrap_or_else(commands::today), &carrier, &service);
        }
        Commands::Schedule { from, days } => {
            commands::window::schedule(from.unwrap_or_else(commands::today), days);
        }
        Commands::Parcel { items } => commands::parcel::parcel(items)?,
        Commands::Quote {
            name,
            street1,
            city,
            state,
            zip,
            country,
            items,
        } => {
            let destination = commands::quote::Destination {
                name,
                street1,
                city,
                state,
                zip,
                country,
            };
            commands::quote::quote(destination, items).await?;
        }
    }
    Ok(())
}
