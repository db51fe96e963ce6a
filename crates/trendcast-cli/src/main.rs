//! Command-line interface for trendcast
//!
//! # Usage
//!
//! ```bash
//! # Optional keys for headlines and voice input
//! export NEWS_API_KEY="..."
//! export SPEECH_API_KEY="..."
//!
//! trendcast info AAPL
//! trendcast analyze RELIANCE.NS
//! trendcast chart MSFT --out charts/
//! trendcast serve --port 8080
//! ```

mod render;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;
use tracing::info;

use trendcast_market::{MarketConfig, Pipeline, RequestOutcome};
use trendcast_utils::Config;
use trendcast_web::{AppState, WebConfig};

#[derive(Parser, Debug)]
#[command(name = "trendcast")]
#[command(about = "Stock trends, indicators and naive forecasts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the last few daily bars
    Info {
        /// Ticker symbol; defaults to TRENDCAST_DEFAULT_TICKER or RELIANCE.NS
        ticker: Option<String>,
    },
    /// Indicators, forecast and headlines for a ticker
    Analyze {
        ticker: Option<String>,

        /// Calendar days to project
        #[arg(long, default_value_t = 5)]
        horizon: usize,
    },
    /// Write the trend chart as PNG
    Chart {
        ticker: Option<String>,

        /// Output directory; defaults to TRENDCAST_CHART_DIR or the working directory
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Run the web dashboard
    Serve {
        #[arg(long)]
        host: Option<IpAddr>,

        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn market_config(
    horizon: Option<usize>,
    chart_dir: Option<PathBuf>,
) -> anyhow::Result<MarketConfig> {
    let mut builder = MarketConfig::builder().with_env_keys();
    if let Some(days) = horizon {
        builder = builder.forecast_horizon_days(days);
    }
    if let Some(dir) = chart_dir {
        builder = builder.chart_dir(dir);
    }
    builder.build().context("invalid market configuration")
}

fn pick_ticker(ticker: Option<String>, config: &MarketConfig) -> String {
    ticker.unwrap_or_else(|| config.default_ticker.clone())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    let app = Config::from_env()?;
    trendcast_utils::init_tracing_with(&app);

    let cli = Cli::parse();
    info!(environment = %app.environment, "starting trendcast");

    match cli.command {
        Command::Info { ticker } => {
            let config = market_config(None, None)?;
            let ticker = pick_ticker(ticker, &config);
            let pipeline = Pipeline::from_config(config)?;
            println!("{}", pipeline.lookup(&ticker).await);
        }
        Command::Analyze { ticker, horizon } => {
            let config = market_config(Some(horizon), None)?;
            let ticker = pick_ticker(ticker, &config);
            let pipeline = Pipeline::from_config(config)?;

            match pipeline.run(&ticker).await? {
                RequestOutcome::Report(report) => print!("{}", render::report_text(&report)),
                RequestOutcome::NoData { message, .. } => println!("{message}"),
            }
        }
        Command::Chart { ticker, out } => {
            let config = market_config(None, out)?;
            let ticker = pick_ticker(ticker, &config);
            let pipeline = Pipeline::from_config(config)?;

            match pipeline.write_chart(&ticker).await? {
                Some(path) => println!("Chart written to {}", path.display()),
                None => println!("{}", trendcast_market::NO_DATA_MESSAGE),
            }
        }
        Command::Serve { host, port } => {
            let config = market_config(None, None)?;
            if app.is_production() && config.news_api_key.is_none() {
                tracing::warn!("NEWS_API_KEY is not set, headlines will be empty");
            }

            let mut web = WebConfig::from_env()?;
            if let Some(host) = host {
                web.host = host;
            }
            if let Some(port) = port {
                web.port = port;
            }

            let state = AppState::from_config(config)?;
            trendcast_web::serve(&web, state).await?;
        }
    }

    Ok(())
}
