//! onair CLI: current track, play history and the HTTP API

mod logging;
mod serve;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::debug;

use onair::error::OnAirError;
use onair_app::api::{self, ApiContext, ApiRequest};
use onair_app::config::{AppConfig, SourceConfig};
use onair_app::data::HistoryLog;
use onair_app::error::AppError;
use onair_app::providers::SourceChain;

#[derive(Parser)]
#[command(name = "onair", about = "Now-playing metadata for internet radio", version)]
struct Cli {
    /// Config file (default: ./onair.toml, then the user config dir, then /etc/onair)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level: error, warn, info, debug or trace
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the track on air now
    NowPlaying {
        /// Stream or playlist URL; the configured sources are used when omitted
        url: Option<String>,
    },
    /// Print recently played tracks
    History {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Record the current track in the history
    Save,
    /// Report the ICY capabilities of a stream
    Probe {
        /// Stream or playlist URL; defaults to the first configured stream
        url: Option<String>,
    },
    /// Serve the HTTP API
    Serve {
        /// Address to bind, e.g. 0.0.0.0:8080
        #[arg(long)]
        listen: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let (config, config_path) = match AppConfig::load(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => fail(e),
    };

    let log_level = cli.log_level.as_deref().or(config.log_level.as_deref());
    logging::init_logging(log_level);
    debug!(path = ?config_path, "Configuration loaded");

    if let Err(e) = run(cli.command, config) {
        fail(e);
    }
}

fn run(command: Command, mut config: AppConfig) -> Result<(), AppError> {
    match command {
        Command::NowPlaying { url } => {
            if let Some(url) = url {
                config.sources = vec![SourceConfig::Icy { url }];
            }
            let chain = SourceChain::from_config(&config)?;
            let track = chain
                .current_track()
                .unwrap_or_else(|e| config.station.fallback_for(&e));
            print_json(&serde_json::to_value(&track).map_err(decode_error)?);
        }
        Command::History { limit } => {
            let ctx = ApiContext::from_config(config)?;
            let mut req = ApiRequest::get();
            if let Some(limit) = limit {
                req = req.with_query("limit", limit.to_string());
            }
            print_body(api::track_history(&ctx, &req).body);
        }
        Command::Save => {
            let ctx = ApiContext::from_config(config)?;
            let resp = api::save_track(&ctx, &ApiRequest::new("POST"));
            let failed = resp.status_code >= 400;
            print_body(resp.body);
            if failed {
                process::exit(1);
            }
        }
        Command::Probe { url } => {
            let url = url
                .or_else(|| config.primary_stream_url().map(str::to_string))
                .ok_or_else(|| {
                    AppError::Config("No stream URL given and none configured".to_string())
                })?;
            let ctx = ApiContext::new(config, SourceChain::new(), Box::new(HistoryLog::in_memory()))?;
            print_json(&ctx.probe_report(&url));
        }
        Command::Serve { listen } => {
            let listen = listen.unwrap_or_else(|| config.server.listen.clone());
            let ctx = ApiContext::from_config(config)?;
            serve::run(ctx, &listen).map_err(AppError::Config)?;
        }
    }
    Ok(())
}

fn decode_error(e: serde_json::Error) -> AppError {
    OnAirError::Decode(e.to_string()).into()
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => fail(decode_error(e)),
    }
}

/// Pretty-print a JSON response body, or print it as is
fn print_body(body: String) {
    match serde_json::from_str::<Value>(&body) {
        Ok(value) => print_json(&value),
        Err(_) => println!("{}", body),
    }
}

fn fail(e: AppError) -> ! {
    eprintln!("Error: {}", e);
    process::exit(1);
}
