//! edgelab: apply Sobel, Laplacian or Canny edge detection to an image.
//!
//! Reads an image file, runs the selected detector with the given
//! parameters and prints a diagnostics report. Optionally writes the edge
//! map and a side-by-side comparison of the original and the result.
//!
//! # Usage
//!
//! ```text
//! edgelab canny --low 50 --high 150 photo.jpg -o edges.png
//! edgelab sobel --kernel-size 5 --direction x photo.jpg --side-by-side cmp.png
//! edgelab run --params '{"algorithm": "laplacian", "kernel_size": 3}' photo.jpg
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod compose;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand, ValueEnum};
use edgelab_detect::diagnostics::duration_ms;
use edgelab_detect::types::{MAX_SIGMA, MIN_SIGMA};
use edgelab_detect::{
    AlgorithmParams, CannyParams, Clock, DetectionDiagnostics, LaplacianParams, SobelDirection,
    SobelParams,
};

/// Interactive-style edge detection from the command line.
#[derive(Parser)]
#[command(name = "edgelab", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    /// `RUST_LOG` takes precedence when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Sobel gradient magnitude.
    Sobel {
        /// Sobel aperture size (1, 3, 5 or 7).
        #[arg(long, default_value_t = SobelParams::DEFAULT_KERNEL_SIZE, value_parser = clap::value_parser!(u32).range(1..=7))]
        kernel_size: u32,

        /// Gradient direction.
        #[arg(long, value_enum, default_value_t = Direction::Both)]
        direction: Direction,

        #[command(flatten)]
        io: IoArgs,
    },
    /// Absolute Laplacian response.
    Laplacian {
        /// Laplacian aperture size (1, 3, 5 or 7).
        #[arg(long, default_value_t = LaplacianParams::DEFAULT_KERNEL_SIZE, value_parser = clap::value_parser!(u32).range(1..=7))]
        kernel_size: u32,

        #[command(flatten)]
        io: IoArgs,
    },
    /// Binary Canny edge map.
    Canny {
        /// Lower hysteresis threshold.
        #[arg(long, default_value_t = CannyParams::DEFAULT_LOW_THRESHOLD, value_parser = clap::value_parser!(u32).range(0..=500))]
        low: u32,

        /// Upper hysteresis threshold.
        #[arg(long, default_value_t = CannyParams::DEFAULT_HIGH_THRESHOLD, value_parser = clap::value_parser!(u32).range(0..=500))]
        high: u32,

        /// Gaussian kernel size (3, 5 or 7).
        #[arg(long, default_value_t = CannyParams::DEFAULT_BLUR_KERNEL_SIZE, value_parser = clap::value_parser!(u32).range(3..=7))]
        blur_kernel_size: u32,

        /// Gaussian sigma (0.1 to 5.0).
        #[arg(long, default_value_t = CannyParams::DEFAULT_SIGMA, value_parser = parse_sigma)]
        sigma: f32,

        /// Use the Euclidean gradient magnitude instead of |gx| + |gy|.
        #[arg(long)]
        l2_gradient: bool,

        #[command(flatten)]
        io: IoArgs,
    },
    /// Run whichever algorithm a JSON parameter set selects.
    Run {
        /// Full parameter set as JSON, e.g.
        /// `{"algorithm": "sobel", "kernel_size": 3, "direction": "both"}`.
        /// Omitted fields take their defaults.
        #[arg(long)]
        params: String,

        #[command(flatten)]
        io: IoArgs,
    },
}

/// Input and output options shared by every subcommand.
#[derive(Args)]
struct IoArgs {
    /// Path to the input image (PNG, JPEG, BMP, WebP). Alpha is discarded.
    input: PathBuf,

    /// Write the edge map to this path (format from the extension).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the original and the result side by side to this path.
    #[arg(long, value_name = "PATH")]
    side_by_side: Option<PathBuf>,

    /// Output diagnostics as JSON instead of a human-readable report.
    #[arg(long)]
    json: bool,

    /// Number of runs for timing.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    runs: usize,
}

/// Sobel direction selection.
#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
enum Direction {
    /// Blend of both derivatives.
    Both,
    /// Horizontal derivative.
    X,
    /// Vertical derivative.
    Y,
}

impl From<Direction> for SobelDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Both => Self::Both,
            Direction::X => Self::X,
            Direction::Y => Self::Y,
        }
    }
}

impl Command {
    /// Split the subcommand into the detector parameters and the I/O options.
    fn into_parts(self) -> Result<(AlgorithmParams, IoArgs), String> {
        Ok(match self {
            Self::Sobel {
                kernel_size,
                direction,
                io,
            } => (
                SobelParams {
                    kernel_size,
                    direction: direction.into(),
                }
                .into(),
                io,
            ),
            Self::Laplacian { kernel_size, io } => (LaplacianParams { kernel_size }.into(), io),
            Self::Canny {
                low,
                high,
                blur_kernel_size,
                sigma,
                l2_gradient,
                io,
            } => (
                CannyParams {
                    low_threshold: low,
                    high_threshold: high,
                    blur_kernel_size,
                    sigma,
                    l2_gradient,
                }
                .into(),
                io,
            ),
            Self::Run { params, io } => {
                let params = serde_json::from_str(&params)
                    .map_err(|e| format!("Error parsing --params: {e}"))?;
                (params, io)
            }
        })
    }
}

/// Parse `--sigma`, bounded like the other numeric flags.
fn parse_sigma(value: &str) -> Result<f32, String> {
    let sigma: f32 = value
        .parse()
        .map_err(|e| format!("`{value}` is not a number: {e}"))?;
    if (MIN_SIGMA..=MAX_SIGMA).contains(&sigma) {
        Ok(sigma)
    } else {
        Err(format!("{sigma} is not in {MIN_SIGMA}..={MAX_SIGMA}"))
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (params, io) = match cli.command.into_parts() {
        Ok(parts) => parts,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    match run(&params, &io) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(params: &AlgorithmParams, io: &IoArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Reject bad parameters before touching the file system.
    params.validate()?;

    let image_bytes = std::fs::read(&io.input)
        .map_err(|e| format!("reading {}: {e}", io.input.display()))?;
    log::info!("Image: {} ({} bytes)", io.input.display(), image_bytes.len());
    let original = edgelab_detect::decode_rgb(&image_bytes)?;
    log::info!("Params: {params:?}");

    let mut all_diagnostics = Vec::with_capacity(io.runs);
    let mut output = None;
    for run in 0..io.runs {
        if io.runs > 1 {
            log::info!("Run {}/{}", run + 1, io.runs);
        }
        let (edges, diagnostics) =
            edgelab_detect::detect_with_diagnostics(&original, params, &StdClock)?;

        if io.json {
            println!("{}", serde_json::to_string_pretty(&diagnostics)?);
        } else {
            println!("{}", diagnostics.report());
        }
        all_diagnostics.push(diagnostics);
        output = Some(edges);
    }

    if io.runs > 1 {
        print_multi_run_summary(&all_diagnostics);
    }

    let Some(edges) = output else {
        return Ok(());
    };

    if let Some(ref path) = io.output {
        edges.save(path)?;
        log::info!("Edge map written to {}", path.display());
    }

    if let Some(ref path) = io.side_by_side {
        compose::side_by_side(&original, &edges).save(path)?;
        log::info!("Comparison written to {}", path.display());
    }

    Ok(())
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}

/// Print aggregated timing across multiple runs.
#[allow(clippy::cast_precision_loss)]
fn print_multi_run_summary(all_diagnostics: &[DetectionDiagnostics]) {
    let durations: Vec<f64> = all_diagnostics
        .iter()
        .map(|d| duration_ms(d.duration))
        .collect();
    if durations.is_empty() {
        println!("Warning: no diagnostics to summarize");
        return;
    }

    let min = durations.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max = durations.iter().copied().reduce(f64::max).unwrap_or(0.0);
    let mean = durations.iter().sum::<f64>() / durations.len() as f64;

    println!();
    println!("Summary ({} runs)\n{}", durations.len(), "=".repeat(60));
    println!("Duration: min={min:.3}ms  mean={mean:.3}ms  max={max:.3}ms");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parts(args: &[&str]) -> (AlgorithmParams, IoArgs) {
        Cli::try_parse_from(args)
            .unwrap()
            .command
            .into_parts()
            .unwrap()
    }

    #[test]
    fn canny_defaults_match_core_defaults() {
        let (params, io) = parts(&["edgelab", "canny", "in.png"]);
        assert_eq!(params, AlgorithmParams::Canny(CannyParams::default()));
        assert_eq!(io.input, PathBuf::from("in.png"));
        assert_eq!(io.runs, 1);
        assert!(io.output.is_none());
    }

    #[test]
    fn sobel_flags_map_to_params() {
        let (params, io) = parts(&[
            "edgelab",
            "sobel",
            "--kernel-size",
            "5",
            "--direction",
            "y",
            "in.png",
            "-o",
            "out.png",
        ]);
        assert_eq!(
            params,
            AlgorithmParams::Sobel(SobelParams {
                kernel_size: 5,
                direction: SobelDirection::Y,
            })
        );
        assert_eq!(io.output, Some(PathBuf::from("out.png")));
    }

    #[test]
    fn even_kernel_passes_cli_but_fails_validation() {
        let (params, _) = parts(&["edgelab", "laplacian", "--kernel-size", "4", "in.png"]);
        assert!(params.validate().is_err());
    }

    #[test]
    fn threshold_above_range_rejected_by_cli() {
        let result = Cli::try_parse_from(["edgelab", "canny", "--high", "501", "in.png"]);
        assert!(result.is_err());
    }

    #[test]
    fn sigma_outside_range_rejected_by_cli() {
        for sigma in ["0.05", "5.5", "nan", "abc"] {
            let result = Cli::try_parse_from(["edgelab", "canny", "--sigma", sigma, "in.png"]);
            assert!(result.is_err(), "sigma {sigma} accepted");
        }
        let (params, _) = parts(&["edgelab", "canny", "--sigma", "5.0", "in.png"]);
        let AlgorithmParams::Canny(canny) = params else {
            unreachable!("canny subcommand yields canny params");
        };
        assert!((canny.sigma - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn run_parses_json_params() {
        let (params, _) = parts(&[
            "edgelab",
            "run",
            "--params",
            r#"{"algorithm": "laplacian", "kernel_size": 7}"#,
            "in.png",
        ]);
        assert_eq!(
            params,
            AlgorithmParams::Laplacian(LaplacianParams { kernel_size: 7 })
        );
    }

    #[test]
    fn run_rejects_malformed_json() {
        let result = Cli::try_parse_from(["edgelab", "run", "--params", "{", "in.png"])
            .unwrap()
            .command
            .into_parts();
        assert!(result.is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
