mod commands;
mod output;
mod records;
mod sink;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gqe")]
#[command(version, about = "Geodata Quality Engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a record batch and build the quality reports
    Validate {
        /// Path to the records file (JSON array of flat objects)
        records: String,

        /// Path to a rule configuration file (YAML or TOML)
        #[arg(short, long)]
        config: Option<String>,

        /// Path to an administrative boundaries file (JSON)
        #[arg(short, long)]
        boundaries: Option<String>,

        /// Attribute used for the group-level report
        #[arg(short, long, default_value = "managing_unit")]
        group_by: String,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Directory to persist the report documents into
        #[arg(short, long)]
        out: Option<String>,

        /// Exit non-zero when the quality score falls below this value
        #[arg(long)]
        min_score: Option<f64>,
    },

    /// Check a rule configuration file without validating data
    Check {
        /// Path to the configuration file (YAML or TOML)
        config: String,
    },

    /// List the rule catalog
    Rules {
        /// Only rules of one dimension (e.g. "thematic")
        #[arg(short, long)]
        dimension: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    // Execute command
    match cli.command {
        Commands::Validate {
            records,
            config,
            boundaries,
            group_by,
            format,
            out,
            min_score,
        } => commands::validate::execute(
            &records,
            config.as_deref(),
            boundaries.as_deref(),
            &group_by,
            &format,
            out.as_deref(),
            min_score,
        ),

        Commands::Check { config } => commands::check::execute(&config),

        Commands::Rules { dimension } => commands::rules::execute(dimension.as_deref()),
    }
}
