//! Command implementations for LSW CLI.
//!
//! Provides subcommands that fetch lake forecast data from the query
//! interface (or a saved payload) and print the derived analytics.

use clap::Subcommand;
use lsw_forecast::config::ClientConfig;
use std::num::NonZeroU32;

pub mod analyze;
pub mod report;
pub mod views;

#[derive(Subcommand)]
pub enum Command {
    /// Fetch the unified forecast for a lake and print every analytic view
    Forecast {
        /// Lake identifier
        #[arg(short = 'l', long)]
        lake_id: String,

        /// Forecast horizon (H1, H2 or H3)
        #[arg(long, default_value = "H1")]
        horizon: lsw_forecast::confidence::Horizon,

        /// Years to project past the last measurement
        #[arg(long, default_value = "3")]
        years: NonZeroU32,

        /// Print the analysis as JSON instead of a report
        #[arg(long)]
        json: bool,

        /// Also write the reconciled series to this CSV path
        #[arg(long)]
        csv: Option<String>,
    },

    /// Analyze a saved unified forecast payload (JSON file)
    Analyze {
        /// Path to the saved payload
        #[arg(short = 'i', long)]
        input: String,

        /// Override the payload's horizon (H1, H2 or H3)
        #[arg(long)]
        horizon: Option<lsw_forecast::confidence::Horizon>,

        /// Years to project past the last measurement
        #[arg(long, default_value = "3")]
        years: NonZeroU32,

        /// Print the analysis as JSON instead of a report
        #[arg(long)]
        json: bool,

        /// Also write the reconciled series to this CSV path
        #[arg(long)]
        csv: Option<String>,
    },

    /// Fetch yearly actuals and predictions for a lake and summarize them
    History {
        #[arg(short = 'l', long)]
        lake_id: String,

        /// Also write the reconciled series to this CSV path
        #[arg(long)]
        csv: Option<String>,
    },

    /// Fetch the trend analysis for a lake and recompute the projection
    Trend {
        #[arg(short = 'l', long)]
        lake_id: String,

        /// Years to project past the last measurement
        #[arg(long, default_value = "3")]
        years: NonZeroU32,
    },

    /// Fetch risk thresholds for a lake and classify its current value
    Risk {
        #[arg(short = 'l', long)]
        lake_id: String,
    },

    /// Fetch cloud-cover quality for a lake and rescore it
    Quality {
        #[arg(short = 'l', long)]
        lake_id: String,
    },

    /// Score per-scene cloud cover from a CSV file (date,cloud_percent)
    Scenes {
        #[arg(short = 'i', long)]
        input: String,
    },
}

pub async fn run(config: ClientConfig, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Forecast {
            lake_id,
            horizon,
            years,
            json,
            csv,
        } => {
            let output = analyze::OutputOptions { json, csv };
            analyze::run_forecast(config, &lake_id, horizon, years, &output).await
        }
        Command::Analyze {
            input,
            horizon,
            years,
            json,
            csv,
        } => {
            let output = analyze::OutputOptions { json, csv };
            analyze::run_analyze_file(&input, horizon, years, &output)
        }
        Command::History { lake_id, csv } => {
            views::run_history(config, &lake_id, csv.as_deref()).await
        }
        Command::Trend { lake_id, years } => views::run_trend(config, &lake_id, years).await,
        Command::Risk { lake_id } => views::run_risk(config, &lake_id).await,
        Command::Quality { lake_id } => views::run_quality(config, &lake_id).await,
        Command::Scenes { input } => views::run_scenes(&input),
    }
}
