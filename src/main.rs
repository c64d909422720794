use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use tracing::debug;

use nearbyai::{HttpPipeline, NearbyAiConfig, Session, SidebarPanels, ToolAgent, logging, web};

#[derive(Parser)]
#[command(name = "nearbyai", version, about = "Nearby places, weather and transit suggestions")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true, env = "NEARBYAI_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask one question about the surroundings of a location
    Ask {
        #[arg(long, allow_hyphen_values = true)]
        lat: String,
        #[arg(long, allow_hyphen_values = true)]
        lon: String,
        /// Free-text request, e.g. "coffee shops"
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Serve the JSON API
    Serve {
        /// Overrides `server.port`
        #[arg(long)]
        port: Option<u16>,
    },
}

fn print_panels(panels: &SidebarPanels) {
    println!("🌤 Weather");
    println!("Alert: {}", panels.alert);
    println!("Temperature: {}", panels.temperature);
    println!("Wind: {}", panels.wind);
    println!();
    println!("📍 Places\n{}\n", panels.places);
    println!("⭐ Reviews\n{}\n", panels.reviews);
    println!("🚗 Transport\n{}\n", panels.transport);
}

async fn ask(config: &NearbyAiConfig, lat: &str, lon: &str, query: &str) -> Result<()> {
    let agent = ToolAgent::new(
        HttpPipeline::from_config(config).context("Failed to create provider clients")?,
    );

    let mut session = Session::new();
    session
        .set_location(lat, lon)
        .map_err(|e| anyhow!(e.user_message()))?;

    let mut shown = 0;
    let turn = session
        .submit(&agent, query, |partial| {
            let mut err = std::io::stderr();
            let _ = write!(err, "{}", &partial[shown..]);
            let _ = err.flush();
            shown = partial.len();
        })
        .await
        .map_err(|e| anyhow!(e.user_message()))?;
    eprintln!();

    debug!("Raw agent text: {:?}", turn.raw);
    print_panels(&turn.rendered.panels);
    println!("{}", turn.rendered.answer);
    Ok(())
}

async fn serve(config: &NearbyAiConfig, port: Option<u16>) -> Result<()> {
    let agent = ToolAgent::new(
        HttpPipeline::from_config(config).context("Failed to create provider clients")?,
    );
    web::run(port.unwrap_or(config.server.port), Arc::new(agent)).await
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = NearbyAiConfig::load_from_path(cli.config.clone())
        .context("Failed to load configuration")?;
    logging::init(&config.logging, cli.verbose)?;

    match cli.command {
        Command::Ask { lat, lon, query } => ask(&config, &lat, &lon, &query.join(" ")).await,
        Command::Serve { port } => serve(&config, port).await,
    }
}
