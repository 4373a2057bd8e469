//! Surroundedness tree generator.
//!
//! Loads a two-color image, builds its enclosure tree and writes:
//! - `log.txt`: region summaries, diagram preamble and diagram tree
//! - `result.png`: the input with every reported region outlined
//! - `report.json` (with `--json`): the full emit report
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Log level filter (default: info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: pretty)
//!
//! ## Usage
//!
//! ```bash
//! cargo run --features cli --bin surroundedness -- --input seth.png --out-dir out
//! ```

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, info_span};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use surroundedness_tree::raster::{draw_overlays, load_binary_image, save_image, RasterOptions};
use surroundedness_tree::{encode, RenderPolicyV1, TreeBuilder, TreeEmitter};

#[derive(Parser, Debug)]
#[command(name = "surroundedness")]
#[command(about = "Build the enclosure tree of a two-color image")]
struct Cli {
    /// Input image (PNG or JPEG).
    #[arg(long)]
    input: PathBuf,
    /// Output directory.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
    /// Render policy as JSON; missing fields use defaults.
    #[arg(long)]
    policy: Option<PathBuf>,
    /// Pixels with luma at or above this value are background.
    #[arg(long, default_value_t = 255)]
    threshold: u8,
    /// Also write report.json.
    #[arg(long, default_value_t = false)]
    json: bool,
}

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "surroundedness=info,surroundedness_tree=info".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .flatten_event(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_span_events(FmtSpan::CLOSE))
            .init();
    }
}

fn load_policy(path: Option<&PathBuf>) -> Result<RenderPolicyV1> {
    let Some(path) = path else {
        return Ok(RenderPolicyV1::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading policy {}", path.display()))?;
    RenderPolicyV1::from_json(&json).with_context(|| format!("parsing policy {}", path.display()))
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let _span = info_span!("run", input = %cli.input.display()).entered();

    let policy = load_policy(cli.policy.as_ref())?;
    let options = RasterOptions {
        background_threshold: cli.threshold,
    };

    let (grid, mut canvas) = load_binary_image(&cli.input, &options)
        .with_context(|| format!("loading {}", cli.input.display()))?;

    let start = Instant::now();
    let encoded = encode(&grid);
    let scan = TreeBuilder::scan(&encoded);
    info!(
        width = grid.width(),
        height = grid.height(),
        regions = scan.tree.len(),
        merges = scan.stats.merges,
        depth = scan.tree.height(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Enclosure tree built"
    );

    let report = TreeEmitter::new(policy).emit(&scan.tree);

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("creating {}", cli.out_dir.display()))?;

    let log_path = cli.out_dir.join("log.txt");
    fs::write(&log_path, report.log_document())
        .with_context(|| format!("writing {}", log_path.display()))?;

    draw_overlays(&mut canvas, &report.overlays);
    let image_path = cli.out_dir.join("result.png");
    save_image(&canvas, &image_path).with_context(|| format!("writing {}", image_path.display()))?;

    if cli.json {
        let json_path = cli.out_dir.join("report.json");
        fs::write(&json_path, report.to_json()?)
            .with_context(|| format!("writing {}", json_path.display()))?;
    }

    info!(
        records = report.records.len(),
        diagram_nodes = report.diagram.node_count,
        report_hash = %report.report_hash,
        out_dir = %cli.out_dir.display(),
        "Outputs written"
    );
    Ok(())
}
