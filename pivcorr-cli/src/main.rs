use clap::Parser;
use pivcorr::image::io::load_gray_frame;
use pivcorr::{
    Calibration, CorrelationStrategy, Frame, OutlierPolicy, PeakFit, PivConfig, PivEngine, Roi,
    Spacing, VectorField,
};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "pivcorr CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum StrategyConfig {
    Normalized,
    Apodized,
}

impl From<StrategyConfig> for CorrelationStrategy {
    fn from(value: StrategyConfig) -> Self {
        match value {
            StrategyConfig::Normalized => CorrelationStrategy::Normalized,
            StrategyConfig::Apodized => CorrelationStrategy::Apodized,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum PeakFitConfig {
    Gaussian,
    Parabolic,
}

impl From<PeakFitConfig> for PeakFit {
    fn from(value: PeakFitConfig) -> Self {
        match value {
            PeakFitConfig::Gaussian => PeakFit::Gaussian,
            PeakFitConfig::Parabolic => PeakFit::Parabolic,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum OutlierPolicyConfig {
    Disabled,
    Mad,
    LocalMedian,
}

impl From<OutlierPolicyConfig> for OutlierPolicy {
    fn from(value: OutlierPolicyConfig) -> Self {
        match value {
            OutlierPolicyConfig::Disabled => OutlierPolicy::Disabled,
            OutlierPolicyConfig::Mad => OutlierPolicy::Mad,
            OutlierPolicyConfig::LocalMedian => OutlierPolicy::LocalMedian,
        }
    }
}

#[derive(Debug, Deserialize)]
struct StepJson {
    x: usize,
    y: usize,
}

#[derive(Debug, Deserialize)]
struct RoiJson {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct PivConfigJson {
    window_width: usize,
    window_height: usize,
    overlap: f32,
    /// Explicit step; overrides `overlap` when present.
    step: Option<StepJson>,
    search_range: usize,
    strategy: StrategyConfig,
    subpixel: bool,
    peak_fit: PeakFitConfig,
    outlier_policy: OutlierPolicyConfig,
    outlier_threshold: f32,
    min_correlation: f32,
    roi: Option<RoiJson>,
    normalize_intensity: bool,
    workers: usize,
    max_pairs_in_flight: usize,
}

impl Default for PivConfigJson {
    fn default() -> Self {
        let cfg = PivConfig::default();
        Self {
            window_width: cfg.window_width,
            window_height: cfg.window_height,
            overlap: 0.5,
            step: None,
            search_range: cfg.search_range,
            strategy: StrategyConfig::Normalized,
            subpixel: cfg.subpixel,
            peak_fit: PeakFitConfig::Gaussian,
            outlier_policy: OutlierPolicyConfig::Mad,
            outlier_threshold: cfg.outlier_threshold,
            min_correlation: cfg.min_correlation,
            roi: None,
            normalize_intensity: cfg.normalize_intensity,
            workers: cfg.workers,
            max_pairs_in_flight: cfg.max_pairs_in_flight,
        }
    }
}

impl From<PivConfigJson> for PivConfig {
    fn from(value: PivConfigJson) -> Self {
        let spacing = match value.step {
            Some(step) => Spacing::Step {
                x: step.x,
                y: step.y,
            },
            None => Spacing::Overlap(value.overlap),
        };
        PivConfig {
            window_width: value.window_width,
            window_height: value.window_height,
            spacing,
            search_range: value.search_range,
            strategy: value.strategy.into(),
            subpixel: value.subpixel,
            peak_fit: value.peak_fit.into(),
            outlier_policy: value.outlier_policy.into(),
            outlier_threshold: value.outlier_threshold,
            min_correlation: value.min_correlation,
            roi: value.roi.map(|roi| Roi {
                x: roi.x,
                y: roi.y,
                width: roi.width,
                height: roi.height,
            }),
            normalize_intensity: value.normalize_intensity,
            workers: value.workers,
            max_pairs_in_flight: value.max_pairs_in_flight,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    frames: Vec<String>,
    output_path: Option<String>,
    pixels_per_unit: Option<f32>,
    /// Soft deadline per pair in milliseconds.
    deadline_ms: Option<u64>,
    piv: PivConfigJson,
}

fn run_fields(
    engine: &PivEngine,
    frames: &[Frame],
    calibration: Option<Calibration>,
    deadline_ms: Option<u64>,
) -> pivcorr::PivResult<Vec<VectorField>> {
    match deadline_ms {
        Some(ms) => frames
            .windows(2)
            .map(|pair| {
                engine.process_pair_with_deadline(
                    &pair[0],
                    &pair[1],
                    calibration,
                    Duration::from_millis(ms),
                )
            })
            .collect(),
        None => engine.process_batch(frames, calibration),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("pivcorr=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.frames.len() < 2 {
        return Err("frames must list at least two image paths".into());
    }

    let frames = config
        .frames
        .iter()
        .map(load_gray_frame)
        .collect::<Result<Vec<_>, _>>()?;
    let calibration = config.pixels_per_unit.map(Calibration::new).transpose()?;
    let engine = PivEngine::new(config.piv.into())?;

    let mut fields = run_fields(&engine, &frames, calibration, config.deadline_ms)?;
    let json = if fields.len() == 1 {
        let field = fields.remove(0);
        serde_json::to_string_pretty(&field)?
    } else {
        serde_json::to_string_pretty(&fields)?
    };

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
