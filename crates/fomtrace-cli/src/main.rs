//! fomtrace - render a FOM execution trace as an SVG timeline.
//!
//! Reads a trace dump (file or stdin), lays tasks, queue waits and I/O
//! operations out on a shared time axis and writes the image.
//!
//! Settings come from, in increasing priority:
//! - built-in defaults
//! - `<config dir>/fomtrace/config.toml`, or the file given with `--config`
//! - command-line flags

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fomtrace_canvas::{DrawingSurface, RecordingSurface, SvgSurface};
use fomtrace_engine::{TraceConfig, TraceDriver, TraceSummary};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fomtrace")]
#[command(version, about = "Render a FOM execution trace as an SVG timeline")]
struct Args {
    /// Trace dump to read. Reads stdin when omitted or "-".
    input: Option<PathBuf>,

    /// TOML config file (default: <config dir>/fomtrace/config.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Image width, px
    #[arg(long)]
    width: Option<u32>,

    /// Image height, px
    #[arg(long)]
    height: Option<u32>,

    /// Number of localities
    #[arg(short, long)]
    localities: Option<usize>,

    /// Visible window, seconds
    #[arg(short, long)]
    duration: Option<f64>,

    /// Window start, e.g. 2016-03-24-09:18:46.359427942 (default: first record)
    #[arg(short, long)]
    start: Option<String>,

    /// Gridline step, milliseconds
    #[arg(long)]
    step: Option<u64>,

    /// Output SVG path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Task lanes per locality
    #[arg(long)]
    max_tasks: Option<usize>,

    /// Number of I/O lanes
    #[arg(long)]
    io_lanes: Option<usize>,

    /// Queue waits shorter than this many microseconds are not drawn
    #[arg(long)]
    queue_threshold: Option<f64>,

    /// Print run totals as JSON on stdout
    #[arg(long)]
    summary: bool,

    /// Process the trace without writing the image
    #[arg(long)]
    dry_run: bool,

    /// More log output (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn load_config(&self) -> Result<TraceConfig> {
        let mut config = match &self.config {
            Some(path) => TraceConfig::load(path)?,
            None => TraceConfig::load_default()?,
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(localities) = self.localities {
            config.localities = localities;
        }
        if let Some(duration) = self.duration {
            config.duration = duration;
        }
        if let Some(start) = &self.start {
            config.start = Some(start.clone());
        }
        if let Some(step) = self.step {
            config.step = step;
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if self.max_tasks.is_some() {
            config.max_tasks = self.max_tasks;
        }
        if let Some(io_lanes) = self.io_lanes {
            config.io_lanes = io_lanes;
        }
        if let Some(threshold) = self.queue_threshold {
            config.queue_wait_threshold_us = threshold;
        }
        config.validate()?;
        Ok(config)
    }

    fn open_input(&self) -> Result<Box<dyn BufRead>> {
        match &self.input {
            Some(path) if path.as_os_str() != "-" => {
                let file = File::open(path).with_context(|| format!("failed to open trace {}", path.display()))?;
                Ok(Box::new(BufReader::new(file)))
            }
            _ => Ok(Box::new(io::stdin().lock())),
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn process<S: DrawingSurface>(config: &TraceConfig, surface: S, input: Box<dyn BufRead>) -> Result<TraceSummary> {
    let mut driver = TraceDriver::new(config, surface)?;
    driver.run(input).context("trace processing stopped")?;
    let (_, summary) = driver.finish()?;
    Ok(summary)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = args.load_config().context("invalid configuration")?;
    let input = args.open_input()?;

    tracing::info!(
        width = config.width,
        height = config.height,
        localities = config.localities,
        duration = config.duration,
        output = %config.output.display(),
        dry_run = args.dry_run,
        "Rendering trace"
    );

    let summary = if args.dry_run {
        process(&config, RecordingSurface::new(), input)?
    } else {
        let surface = SvgSurface::new(&config.output, f64::from(config.width), f64::from(config.height));
        process(&config, surface, input)?
    };

    if summary.tasks_without_lane > 0 || summary.io_dropped > 0 {
        tracing::warn!(
            tasks = summary.tasks_without_lane,
            io = summary.io_dropped,
            "Some shapes were not drawn for lack of lanes; raise max_tasks or io_lanes"
        );
    }
    if args.summary {
        println!("{}", summary.to_json()?);
    }
    Ok(())
}
