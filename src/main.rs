use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exam_tracker::api::state::AppState;
use exam_tracker::calculate::countdown;
use exam_tracker::config::AppConfig;

#[derive(Parser)]
#[command(name = "exam-tracker")]
#[command(about = "Personal exam schedule tracker")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the schedule editor server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the duration column for a date
    Countdown {
        /// Target date (YYYY-MM-DD)
        date: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting exam-tracker v{}", env!("CARGO_PKG_VERSION"));

    let mut config = AppConfig::load_or_default(&cli.config);

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let addr = format!("{}:{}", config.server.host, config.server.port);
            let app = exam_tracker::api::build_router(AppState::new(config));
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Schedule editor: http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Countdown { date } => {
            let target = NaiveDate::parse_from_str(&date, "%Y-%m-%d").ok();
            if target.is_none() {
                eprintln!("Invalid date (expected YYYY-MM-DD): {}", date);
            }
            println!("{}", countdown(Local::now().date_naive(), target));
        }
    }

    Ok(())
}
