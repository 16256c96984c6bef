//! CLI entry point for the map fee analyzer.
//!
//! Provides subcommands for listing classified locations, city statistics and
//! the cross-city comparison, and for managing the band thresholds.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use map_fee_analyzer::analyzers::comparison::{ComparisonReport, ComparisonSort, sort_comparison};
use map_fee_analyzer::coordinator::Coordinator;
use map_fee_analyzer::fetch::BasicClient;
use map_fee_analyzer::infra::fee_service::HttpFeeApi;
use map_fee_analyzer::output::{print_json, write_classified_csv};
use map_fee_analyzer::services::fee_api::{FeeApi, Scope};
use map_fee_analyzer::thresholds::{
    JsonFileStore, ThresholdConfig, ThresholdManager, ThresholdStore,
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "map_fee_analyzer")]
#[command(about = "Classify location fees against city and national averages", long_about = None)]
struct Cli {
    /// Base URL of the fee data service
    #[arg(long, env = "FEE_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    /// Where band thresholds are persisted
    #[arg(long, env = "FEE_SETTINGS_PATH", default_value = "map_fee_settings.json")]
    settings: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List locations with their fee band
    Locations {
        /// Only show locations in this city
        #[arg(short, long)]
        city: Option<String>,

        /// Also export the classified locations to this CSV file
        #[arg(long)]
        csv: Option<String>,
    },
    /// List cities with their location counts
    Cities,
    /// Show average fees for all cities or a single city
    Stats {
        #[arg(short, long)]
        city: Option<String>,
    },
    /// Compare average and annual fees across cities
    Compare {
        #[arg(short, long, value_enum, default_value_t = SortArg::None)]
        sort: SortArg,

        /// Print the rows as JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show or change the band thresholds
    Thresholds {
        #[command(subcommand)]
        action: ThresholdAction,
    },
}

#[derive(Subcommand)]
enum ThresholdAction {
    /// Print the active thresholds
    Show,
    /// Set new thresholds (fractions in (0, 1], e.g. 0.2 for 20%)
    Apply {
        #[arg(long)]
        high: f64,
        #[arg(long)]
        low: f64,
    },
    /// Restore the 20%/20% defaults
    Reset,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    None,
    Cost,
    City,
}

impl From<SortArg> for ComparisonSort {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::None => ComparisonSort::Preserve,
            SortArg::Cost => ComparisonSort::AnnualCostDesc,
            SortArg::City => ComparisonSort::City,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/map_fee_analyzer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("map_fee_analyzer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let thresholds = ThresholdManager::new(JsonFileStore::new(&cli.settings));
    let client = BasicClient::with_timeouts(Duration::from_secs(10), Duration::from_secs(30))?;
    let api = HttpFeeApi::new(client, &cli.api_url)?;
    let mut coordinator = Coordinator::new(api, thresholds);

    match cli.command {
        Commands::Locations { city, csv } => {
            coordinator.set_scope(Scope::from(city)).await?;
            show_locations(&coordinator);

            if let Some(path) = csv {
                write_classified_csv(&path, &coordinator.classified_locations())?;
                info!(path = %path, "Classified locations exported");
            }
        }
        Commands::Cities => {
            coordinator.refresh_cities().await?;
            for city in coordinator.cities() {
                info!(
                    city = %city.city,
                    avg_installation = city.avg_installation_fee,
                    avg_quarterly = city.avg_quarterly_fee,
                    "{}",
                    city.label()
                );
            }
        }
        Commands::Stats { city } => {
            let scope = Scope::from(city);
            if scope == Scope::All {
                coordinator.refresh_cities().await?;
            } else {
                coordinator.set_scope(scope).await?;
            }

            match coordinator.overall_stats() {
                Some(stats) => info!(
                    scope = %coordinator.scope(),
                    avg_installation = %format_kr(stats.avg_installation),
                    avg_quarterly = %format_kr(stats.avg_quarterly),
                    locations = stats.total_count,
                    "Statistics"
                ),
                None => warn!(scope = %coordinator.scope(), "No statistics available"),
            }
        }
        Commands::Compare { sort, json } => {
            coordinator.refresh_comparison().await?;
            let mut rows = coordinator.comparison_rows();
            sort_comparison(&mut rows, sort.into());

            if json {
                print_json(&ComparisonReport::new(rows))?;
            } else {
                for row in &rows {
                    info!(
                        city = %row.city,
                        avg_installation = %format_kr(row.avg_installation_fee),
                        avg_quarterly = %format_kr(row.avg_quarterly_fee),
                        annual_cost = %format_kr(row.annual_cost_rounded()),
                        "Comparison"
                    );
                }
            }
        }
        Commands::Thresholds { action } => {
            let config = match action {
                ThresholdAction::Show => coordinator.load_thresholds(),
                ThresholdAction::Apply { high, low } => {
                    coordinator.apply_thresholds(ThresholdConfig {
                        high_threshold: high,
                        low_threshold: low,
                    })?;
                    coordinator.thresholds()
                }
                ThresholdAction::Reset => coordinator.reset_thresholds(),
            };
            let (high_at, low_at) = config.preview();
            info!(
                high = config.high_threshold,
                low = config.low_threshold,
                "High above {high_at}% of average, low below {low_at}%"
            );
        }
    }

    Ok(())
}

/// Logs every classified location of the active scope.
fn show_locations<A: FeeApi, S: ThresholdStore>(coordinator: &Coordinator<A, S>) {
    let Some(reference) = coordinator.reference() else {
        warn!(scope = %coordinator.scope(), "No locations to classify");
        return;
    };

    info!(
        scope = %coordinator.scope(),
        locations = coordinator.locations().len(),
        avg_installation = %format_kr(reference.installation),
        avg_quarterly = %format_kr(reference.quarterly),
        "Reference averages"
    );

    for (location, band) in coordinator.classified_locations() {
        info!(
            name = location.name.as_deref().unwrap_or("N/A"),
            city = %location.city,
            address = %location.address(),
            installation = %format_kr(location.installation_fee),
            quarterly = %format_kr(location.quarterly_fee),
            band = band.label(),
            color = band.color(),
            "Location"
        );
    }
}

/// Formats an amount in whole kronor with space-separated thousands.
fn format_kr(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    let sign = if rounded < 0 { "-" } else { "" };
    format!("{sign}{grouped} kr")
}
