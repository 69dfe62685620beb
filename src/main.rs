use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use seagrass_cover_rs::image_pipeline::config::{load_or_default, DEFAULT_CONFIG_PATH, DEFAULT_MAX_SIDE};
use seagrass_cover_rs::image_pipeline::{PipelineOptions, SeagrassPipeline};
use seagrass_cover_rs::logger;
use seagrass_cover_rs::server::{self, AppState, StorageDirs};

use tracing::info;

#[derive(Parser)]
#[command(name = "seagrass")]
#[command(about = "Seagrass coverage and blue-carbon estimates from quadrat photos", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single image and print the result as JSON
    Analyze {
        /// Quadrat photo (PNG or JPEG)
        image: PathBuf,

        /// Carbon model configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Write both overlay PNGs into this directory
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Longest side of the working raster
        #[arg(long, default_value_t = DEFAULT_MAX_SIDE)]
        max_side: u32,

        /// Skip the glint suppression filter
        #[arg(long)]
        no_glint_suppression: bool,

        /// Log per-stage timings
        #[arg(long)]
        timings: bool,

        /// Include the base64 overlay payloads in the printed JSON
        #[arg(long)]
        full_json: bool,
    },

    /// Serve the upload API over HTTP
    Serve {
        /// Listen address
        #[arg(long, default_value = "127.0.0.1:5000")]
        addr: SocketAddr,

        /// Carbon model configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Directory for received uploads
        #[arg(long, default_value = "uploads")]
        upload_dir: PathBuf,

        /// Directory for rendered overlays
        #[arg(long, default_value = "outputs")]
        output_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init();

    match Cli::parse().command {
        Commands::Analyze {
            image,
            config,
            out_dir,
            max_side,
            no_glint_suppression,
            timings,
            full_json,
        } => {
            let options = PipelineOptions::builder()
                .max_side(max_side)
                .suppress_glints(!no_glint_suppression)
                .build();
            let analyze = AnalyzeArgs {
                image,
                config,
                out_dir,
                options,
                timings,
                full_json,
            };
            // decoding and morphology are CPU bound, keep them off the runtime workers
            tokio::task::spawn_blocking(move || run_analyze(analyze))
                .await
                .context("analysis task panicked")?
        }
        Commands::Serve {
            addr,
            config,
            upload_dir,
            output_dir,
        } => {
            let carbon = load_or_default(&config);
            info!(
                quadrat_area_m2 = carbon.quadrat_area_m2(),
                carbon_density_g_per_m2 = carbon.carbon_density_g_per_m2(),
                "Carbon model configured"
            );
            let storage = StorageDirs::provision(&upload_dir, &output_dir)
                .context("failed to create storage directories")?;
            let state = AppState::new(SeagrassPipeline::new(carbon), storage);
            server::serve(addr, state).await
        }
    }
}

struct AnalyzeArgs {
    image: PathBuf,
    config: PathBuf,
    out_dir: Option<PathBuf>,
    options: PipelineOptions,
    timings: bool,
    full_json: bool,
}

fn run_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let carbon = load_or_default(&args.config);
    let pipeline = SeagrassPipeline::new(carbon).with_options(args.options);

    let input = std::fs::read(&args.image)
        .with_context(|| format!("failed to read {}", args.image.display()))?;
    let (result, timings) = pipeline
        .analyze_with_timings(&input)
        .with_context(|| format!("failed to analyze {}", args.image.display()))?;

    if args.timings {
        timings.log_summary();
    }

    if let Some(out_dir) = &args.out_dir {
        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("failed to create {}", out_dir.display()))?;
        let (seagrass, white) = result.write_overlays(out_dir, &file_stem(&args.image))?;
        info!(
            seagrass = %seagrass.display(),
            white = %white.display(),
            "Overlays written"
        );
    }

    let json = if args.full_json {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string_pretty(&result.summary())?
    };
    println!("{json}");
    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| server::sanitize_filename(&s.to_string_lossy()))
        .unwrap_or_else(|| "image".to_string())
}
