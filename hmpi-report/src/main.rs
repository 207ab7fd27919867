//! Command-line reports over an uploaded groundwater dataset.
//!
//! Usage:
//!   hmpi-report summary <dataset.json> [--json]
//!   hmpi-report charts-csv <dataset.json> [-o charts.csv]
//!   hmpi-report heatmap <dataset.json> <output.(svg|png)> [--cell-px 40]
//!
//! Global options select the threshold table (`--thresholds`), the elevated
//! ratio and whether raw column names are kept as-is.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use hmpi_core::render::summary::{DatasetSummary, summarize};
use hmpi_core::render::{csv, format_value, svg};
use hmpi_core::{DatasetView, EngineConfig, SeverityTier, ThresholdTable, parse_dataset};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod raster;

#[derive(Parser)]
#[command(name = "hmpi-report")]
#[command(about = "Tier summaries, chart exports and heatmaps for heavy-metal datasets")]
struct Args {
    /// Engine configuration (JSON); flags below override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Threshold table as a JSON object of metric -> limit (mg/L)
    #[arg(long, global = true)]
    thresholds: Option<PathBuf>,

    /// Fraction of the limit above which a reading is Elevated
    #[arg(long, global = true)]
    elevated_ratio: Option<f64>,

    /// Keep column names as uploaded instead of mapping them to element symbols
    #[arg(long, global = true)]
    raw_metric_names: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Per-metric tier counts
    Summary {
        dataset: PathBuf,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Chart data, one row per sample
    ChartsCsv {
        dataset: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Samples x metrics heatmap as SVG or PNG (by extension)
    Heatmap {
        dataset: PathBuf,
        output: PathBuf,
        #[arg(long, default_value_t = 40.0)]
        cell_px: f64,
    },
}

impl Command {
    fn dataset(&self) -> &Path {
        match self {
            Command::Summary { dataset, .. }
            | Command::ChartsCsv { dataset, .. }
            | Command::Heatmap { dataset, .. } => dataset,
        }
    }
}

fn engine_config(args: &Args) -> anyhow::Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            EngineConfig::from_json(&text)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => EngineConfig::default(),
    };
    if let Some(path) = &args.thresholds {
        let text =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        config.thresholds = ThresholdTable::from_json(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
    }
    if let Some(ratio) = args.elevated_ratio {
        config.elevated_ratio = ratio;
    }
    if args.raw_metric_names {
        config.normalize_metric_names = false;
    }
    Ok(config)
}

fn load_view(path: &Path, config: &EngineConfig) -> anyhow::Result<DatasetView> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let samples = parse_dataset(&text, &config.ingest_options())
        .with_context(|| format!("parsing {}", path.display()))?;
    let view = DatasetView::project_with(&samples, &config.thresholds, config.classifier()?);
    info!(
        samples = view.len(),
        metrics = view.metrics().len(),
        "loaded {}",
        path.display()
    );
    Ok(view)
}

fn summary_text(s: &DatasetSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "samples: {}", s.samples);
    if let Some((lo, hi)) = s.pollution_index_range {
        let _ = writeln!(out, "HMPI range: {:.2} .. {:.2}", lo, hi);
    }
    let _ = writeln!(out, "samples exceeding a limit: {}", s.samples_exceeding);
    if s.metrics.is_empty() {
        return out;
    }
    let _ = writeln!(
        out,
        "\n{:<8} {:>10} {:>10} {:>6} {:>9} {:>9}",
        "metric", "limit", "max", "safe", "elevated", "exceeded"
    );
    for m in &s.metrics {
        let limit = m.limit.map_or_else(|| "-".to_string(), format_value);
        let _ = writeln!(
            out,
            "{:<8} {:>10} {:>10} {:>6} {:>9} {:>9}",
            m.metric.as_str(),
            limit,
            format_value(m.max),
            m.tiers.get(SeverityTier::Safe),
            m.tiers.get(SeverityTier::Elevated),
            m.tiers.get(SeverityTier::Exceeded)
        );
    }
    out
}

#[derive(Debug, PartialEq, Eq)]
enum ImageFormat {
    Svg,
    Png,
}

fn image_format(path: &Path) -> anyhow::Result<ImageFormat> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("svg") => Ok(ImageFormat::Svg),
        Some("png") => Ok(ImageFormat::Png),
        _ => bail!("output must end in .svg or .png: {}", path.display()),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = engine_config(&args)?;
    let view = load_view(args.command.dataset(), &config)?;

    match &args.command {
        Command::Summary { json, .. } => {
            let s = summarize(&view);
            if *json {
                println!("{}", serde_json::to_string_pretty(&s)?);
            } else {
                print!("{}", summary_text(&s));
            }
        }
        Command::ChartsCsv { output, .. } => {
            let text = csv::charts_csv(&view);
            match output {
                Some(path) => {
                    fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
                    info!("wrote {}", path.display());
                }
                None => print!("{text}"),
            }
        }
        Command::Heatmap {
            output, cell_px, ..
        } => {
            if !(cell_px.is_finite() && *cell_px > 0.0) {
                bail!("--cell-px must be positive");
            }
            let format = image_format(output)?;
            let (doc, w_px, h_px) = svg::heatmap_svg(&view, *cell_px);
            match format {
                ImageFormat::Svg => fs::write(output, doc)
                    .with_context(|| format!("writing {}", output.display()))?,
                ImageFormat::Png => {
                    let pixmap = raster::render_svg(&doc, w_px, h_px)?;
                    raster::write_png(&pixmap, output)?;
                }
            }
            info!(width = w_px, height = h_px, "wrote {}", output.display());
        }
    }
    Ok(())
}
