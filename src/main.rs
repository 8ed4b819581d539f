use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use cse_trends::{Granularity, ReturnMetric, SeriesConfig, Trends, TrendsError};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cse-trends", version, about = "CSE price-history aggregates and box-plot charts")]
struct Cli {
    /// Directory holding raw price-history exports
    #[arg(long = "data-dir", global = true, default_value = cse_trends::config::DEFAULT_RAW_DIR)]
    raw_dir: PathBuf,

    /// Cache directory (defaults to the platform cache dir)
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Directory charts are written to
    #[arg(long, global = true, default_value = cse_trends::config::DEFAULT_CHARTS_DIR)]
    charts_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct SeriesArgs {
    /// Series id (cse-aspi, usd-lkr)
    #[arg(long, default_value = "cse-aspi")]
    series: String,

    /// Aggregation period: day, month or year
    #[arg(long, default_value = "year")]
    granularity: Granularity,
}

#[derive(Subcommand)]
enum Command {
    /// Aggregate a series and cache the result
    Build(SeriesArgs),
    /// Render the box-plot chart of a series
    Render {
        #[command(flatten)]
        args: SeriesArgs,

        /// Plot returns converted to USD through the series' exchange rate
        #[arg(long)]
        usd: bool,
    },
    /// Delete the cache of a series so the next run re-parses raw files
    Invalidate {
        #[arg(long)]
        series: String,
    },
}

fn series_config(id: &str) -> Result<SeriesConfig, TrendsError> {
    SeriesConfig::by_id(id).ok_or_else(|| {
        TrendsError::InvalidArgument(format!(
            "unknown series '{}' (known: {})",
            id,
            SeriesConfig::known()
                .iter()
                .map(|s| s.id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut builder = Trends::builder()
        .raw_dir(&cli.raw_dir)
        .charts_dir(&cli.charts_dir);
    if let Some(dir) = &cli.cache_dir {
        builder = builder.cache_dir(dir);
    }
    let trends = builder.build()?;

    match cli.command {
        Command::Build(args) => {
            let series = series_config(&args.series)?;
            let path = trends.build(&series, args.granularity)?;
            println!("{}", path.display());
        }
        Command::Render { args, usd } => {
            let series = series_config(&args.series)?;
            let metric = if usd { ReturnMetric::Usd } else { ReturnMetric::Local };
            let path = trends.render(&series, args.granularity, metric)?;
            println!("{}", path.display());
        }
        Command::Invalidate { series } => {
            if trends.invalidate(&series)? {
                println!("removed cache for {}", series);
            } else {
                println!("no cache for {}", series);
            }
        }
    }

    Ok(())
}
