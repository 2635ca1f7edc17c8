mod avatar;
mod cli;
mod config;
mod description;
mod download;
mod error;
mod orchestrator;
mod render;
mod stock;
mod text;
mod ui;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use avatar::{AvatarApi, HeygenClient};
use cli::{Cli, Command};
use config::{RoomreelConfig, load_rooms};
use description::DescriptionClient;
use orchestrator::Pipeline;
use render::VideoRenderer;
use stock::StockVideoClient;
use text::AnthropicModel;
use ui::RunProgress;

fn init_tracing(verbose: bool) {
    let default = if verbose { "roomreel=debug" } else { "roomreel=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn description_client(config: &RoomreelConfig) -> Result<DescriptionClient<AnthropicModel>> {
    if config.text_model_api_key.is_empty() {
        info!("no text model key configured, descriptions use the template");
        return Ok(DescriptionClient::template_only());
    }
    let model = AnthropicModel::new(
        config.text_model_api_key.clone(),
        config.text_model.clone(),
        config.text_model_url.clone(),
    )?;
    Ok(DescriptionClient::new(Some(model), config.description_max_tokens))
}

fn heygen_client(config: &RoomreelConfig) -> Result<HeygenClient> {
    anyhow::ensure!(
        !config.heygen_api_key.is_empty(),
        "HEYGEN_API_KEY not found in environment or roomreel.toml"
    );
    Ok(HeygenClient::new(
        config.heygen_api_key.clone(),
        config.heygen_base_url.clone(),
        config.heygen_upload_url.clone(),
    )?)
}

fn stock_client(config: &RoomreelConfig) -> Result<StockVideoClient> {
    anyhow::ensure!(
        !config.pexels_api_key.is_empty(),
        "PEXELS_API_KEY not found in environment or roomreel.toml"
    );
    Ok(StockVideoClient::new(
        config.pexels_api_key.clone(),
        config.pexels_base_url.clone(),
    )?)
}

fn renderer(config: &RoomreelConfig) -> Result<VideoRenderer<HeygenClient>> {
    Ok(VideoRenderer::new(
        heygen_client(config)?,
        config.retry_policy(),
        config.poll_schedule(),
        config.output_dir.clone(),
    ))
}

async fn run(config: RoomreelConfig, file: Option<String>) -> Result<()> {
    config.validate()?;
    let rooms = match file {
        Some(path) => load_rooms(Path::new(&path)).with_context(|| format!("reading rooms from {path}"))?,
        None => config.rooms.clone(),
    };

    std::fs::create_dir_all(&config.downloads_dir)?;
    std::fs::create_dir_all(&config.output_dir)?;

    let pipeline = Pipeline {
        stock: stock_client(&config)?,
        descriptions: description_client(&config)?,
        renderer: renderer(&config)?,
        downloads_dir: config.downloads_dir.clone(),
        search_results: config.search_results,
    };

    let progress = RunProgress::start(rooms.len());
    let report = pipeline.run(&rooms, |result| progress.room_done(result)).await;
    progress.finish(&report);

    let report_path = config.output_dir.join("report.json");
    report.write_to(&report_path)?;
    info!(path = %report_path.display(), "run report written");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => RoomreelConfig::load_from(Path::new(path))?,
        None => RoomreelConfig::load()?,
    };
    if let Some(max_attempts) = cli.max_attempts {
        config.max_attempts = max_attempts;
    }
    if let Some(timeout) = cli.timeout {
        config.initial_timeout_secs = timeout;
    }

    match cli.command {
        Command::Run { file } => run(config, file).await?,
        Command::Describe {
            room_type,
            features,
        } => {
            let text = description_client(&config)?
                .generate(&room_type, &features)
                .await;
            println!("{text}");
        }
        Command::Search { query, count } => {
            let candidates = stock_client(&config)?.search(&query, count).await?;
            if candidates.is_empty() {
                println!("No videos found for {query}");
            }
            for c in candidates {
                match c.best_rendition().and_then(|r| Some((r, r.dimensions()?))) {
                    Some((best, (width, height))) => println!(
                        "{} ({}s) best {width}x{height}: {}",
                        c.url, c.duration, best.link
                    ),
                    None => println!("{} ({}s) no renditions", c.url, c.duration),
                }
            }
        }
        Command::Resources => {
            let renderer = renderer(&config)?;
            println!("avatar: {}", renderer.select_avatar().await?);
            println!("voice:  {}", renderer.select_voice().await?);
        }
        Command::Status { job_id } => {
            let report = heygen_client(&config)?.job_status(&job_id).await?;
            println!("{}", report.summary(&job_id));
        }
    }
    Ok(())
}
