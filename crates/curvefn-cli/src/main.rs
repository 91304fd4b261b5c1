//! curvefn CLI - evaluate and sample single-variable expressions

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use curvefn::prelude::*;
use curvefn::{ColumnSelector, LogBase, NonFinite, SqrtDomain};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "curvefn")]
#[command(author, version, about = "Evaluate and sample single-variable math expressions")]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error); RUST_LOG overrides.
    /// Defaults to warn, or error for `check`, which prints diagnostics itself
    #[arg(long, global = true)]
    log_level: Option<tracing::Level>,

    /// Take sqrt of the absolute value instead of returning NaN for negatives
    #[arg(long, global = true)]
    sqrt_abs: bool,

    /// Make log base 10 (ln stays natural)
    #[arg(long, global = true)]
    common_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression at the given x values and print x,y rows
    #[command(allow_negative_numbers = true)]
    Eval {
        /// Expression in x, e.g. "3sin(x)+x^2"
        #[arg(allow_hyphen_values = true)]
        expression: String,

        /// x values
        xs: Vec<f64>,

        /// Read x values from a CSV file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Column holding the x values (0-based index or header name)
        #[arg(short, long, default_value = "0")]
        column: String,

        /// The input file has a header row
        #[arg(long)]
        header: bool,
    },

    /// Sample an expression over a window and write CSV
    #[command(allow_negative_numbers = true)]
    Sample {
        /// Expression in x
        #[arg(allow_hyphen_values = true)]
        expression: String,

        /// Window start
        #[arg(long, default_value_t = -10.0)]
        from: f64,

        /// Window end
        #[arg(long, default_value_t = 10.0)]
        to: f64,

        /// Grid intervals (uniform) or subdivisions of pi (pi grid)
        #[arg(short, long, default_value_t = 100)]
        resolution: usize,

        /// Grid placement
        #[arg(long, value_enum, default_value_t = GridArg::Uniform)]
        grid: GridArg,

        /// Refine gaps longer than LEN
        #[arg(long, value_name = "LEN", conflicts_with = "segments")]
        adaptive: Option<f64>,

        /// Split into continuous segments and write segment,x,y rows
        #[arg(long)]
        segments: bool,

        /// Jumps longer than LEN start a new segment
        #[arg(long, value_name = "LEN", default_value_t = 10.0)]
        max_draw: f64,

        /// Gaps longer than LEN are subdivided when segmenting
        #[arg(long, value_name = "LEN", default_value_t = 1.0)]
        max_segment: f64,

        /// Clamp finite values, e.g. --clamp=-5,5
        #[arg(long, value_name = "MIN,MAX", value_parser = parse_clamp, allow_hyphen_values = true)]
        clamp: Option<(f64, f64)>,

        /// Replace values near x = 0 with ±100
        #[arg(long)]
        guard_zero: bool,

        /// Output CSV file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        format: FormatArgs,
    },

    /// Build a lookup table and write one value per row
    Lut {
        /// Expression in x
        #[arg(allow_hyphen_values = true)]
        expression: String,

        /// Number of entries
        #[arg(long, default_value_t = 8192)]
        size: usize,

        /// Width of the window, centred on zero
        #[arg(long, default_value_t = 30.0)]
        range: f64,

        /// Output CSV file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        format: FormatArgs,
    },

    /// Print diagnostics; exits non-zero if there are any
    Check {
        /// Expression in x
        #[arg(allow_hyphen_values = true)]
        expression: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum GridArg {
    Uniform,
    Pi,
}

impl From<GridArg> for SampleGrid {
    fn from(grid: GridArg) -> Self {
        match grid {
            GridArg::Uniform => SampleGrid::Uniform,
            GridArg::Pi => SampleGrid::PiAligned,
        }
    }
}

/// CSV formatting flags shared by the writing subcommands
#[derive(clap::Args)]
struct FormatArgs {
    /// Omit the header row
    #[arg(long)]
    no_header: bool,

    /// Digits after the decimal point
    #[arg(long)]
    precision: Option<usize>,

    /// Drop rows with NaN or infinite values
    #[arg(long)]
    skip_invalid: bool,
}

impl FormatArgs {
    fn write_options(&self) -> CsvWriteOptions {
        CsvWriteOptions {
            write_header: !self.no_header,
            precision: self.precision,
            non_finite: if self.skip_invalid {
                NonFinite::Skip
            } else {
                NonFinite::Literal
            },
            ..Default::default()
        }
    }
}

impl Cli {
    fn log_level(&self) -> tracing::Level {
        match (self.log_level, &self.command) {
            (Some(level), _) => level,
            (None, Commands::Check { .. }) => tracing::Level::ERROR,
            (None, _) => tracing::Level::WARN,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_level().as_str())),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let policy = numeric_policy(cli.sqrt_abs, cli.common_log);

    match cli.command {
        Commands::Eval {
            expression,
            xs,
            input,
            column,
            header,
        } => eval(&expression, policy, xs, input.as_deref(), &column, header),
        Commands::Sample {
            expression,
            from,
            to,
            resolution,
            grid,
            adaptive,
            segments,
            max_draw,
            max_segment,
            clamp,
            guard_zero,
            output,
            format,
        } => {
            let sample_options = SampleOptions {
                x_min: from,
                x_max: to,
                resolution,
                grid: grid.into(),
                clamp,
                near_zero: guard_zero.then(NearZeroGuard::default),
            };
            let mode = if segments {
                SampleMode::Segments {
                    max_segment_length: max_segment,
                    max_draw_length: max_draw,
                }
            } else if let Some(length) = adaptive {
                SampleMode::Adaptive(length)
            } else {
                SampleMode::Grid
            };
            sample_cmd(
                &expression,
                policy,
                sample_options,
                mode,
                output.as_deref(),
                &format.write_options(),
            )
        }
        Commands::Lut {
            expression,
            size,
            range,
            output,
            format,
        } => lut(
            &expression,
            policy,
            LutOptions {
                size,
                range,
                ..Default::default()
            },
            output.as_deref(),
            &format.write_options(),
        ),
        Commands::Check { expression } => check(&expression, policy),
    }
}

fn numeric_policy(sqrt_abs: bool, common_log: bool) -> NumericPolicy {
    NumericPolicy::strict()
        .with_sqrt(if sqrt_abs {
            SqrtDomain::Absolute
        } else {
            SqrtDomain::Strict
        })
        .with_log(if common_log {
            LogBase::Common
        } else {
            LogBase::Natural
        })
}

/// Parse `MIN,MAX`
fn parse_clamp(s: &str) -> std::result::Result<(f64, f64), String> {
    let (min, max) = s
        .split_once(',')
        .ok_or_else(|| format!("expected MIN,MAX, got '{}'", s))?;
    let min: f64 = min
        .trim()
        .parse()
        .map_err(|_| format!("invalid minimum '{}'", min))?;
    let max: f64 = max
        .trim()
        .parse()
        .map_err(|_| format!("invalid maximum '{}'", max))?;
    if min > max {
        return Err(format!("minimum {} is greater than maximum {}", min, max));
    }
    Ok((min, max))
}

/// A header name, or a 0-based index if it parses as one
fn parse_column(column: &str) -> ColumnSelector {
    match column.parse::<usize>() {
        Ok(index) => ColumnSelector::Index(index),
        Err(_) => ColumnSelector::Name(column.to_string()),
    }
}

enum SampleMode {
    Grid,
    Adaptive(f64),
    Segments {
        max_segment_length: f64,
        max_draw_length: f64,
    },
}

fn eval(
    expression: &str,
    policy: NumericPolicy,
    mut xs: Vec<f64>,
    input: Option<&Path>,
    column: &str,
    header: bool,
) -> Result<()> {
    if let Some(path) = input {
        let options = CsvReadOptions {
            has_header: header,
            column: parse_column(column),
            ..Default::default()
        };
        let read = CsvReader::read_file(path, &options)
            .with_context(|| format!("Failed to read '{}'", path.display()))?;
        xs.extend(read);
    }

    if xs.is_empty() {
        bail!("No x values given; pass them as arguments or with --input");
    }

    let f = compile_with_policy(expression, policy);
    let ys = f.evaluate_many(&xs);

    CsvWriter::write_points(
        xs.into_iter().zip(ys),
        io::stdout().lock(),
        &CsvWriteOptions::default(),
    )
    .context("Failed to write to stdout")?;

    Ok(())
}

fn sample_cmd(
    expression: &str,
    policy: NumericPolicy,
    options: SampleOptions,
    mode: SampleMode,
    output: Option<&Path>,
    write_options: &CsvWriteOptions,
) -> Result<()> {
    let f = compile_with_policy(expression, policy);

    match mode {
        SampleMode::Grid => {
            let set = f.sample(&options).context("Invalid sampling options")?;
            write_curve(&set, output, write_options)
        }
        SampleMode::Adaptive(length) => {
            let set = f
                .sample_adaptive(&options, length)
                .context("Invalid sampling options")?;
            write_curve(&set, output, write_options)
        }
        SampleMode::Segments {
            max_segment_length,
            max_draw_length,
        } => {
            let set = f
                .segment(&SegmentOptions {
                    sample: options,
                    max_segment_length,
                    max_draw_length,
                })
                .context("Invalid sampling options")?;
            write_curve(&set, output, write_options)
        }
    }
}

fn lut(
    expression: &str,
    policy: NumericPolicy,
    options: LutOptions,
    output: Option<&Path>,
    write_options: &CsvWriteOptions,
) -> Result<()> {
    let f = compile_with_policy(expression, policy);
    let table = f.build_lut(&options).context("Invalid lookup table options")?;
    write_curve(&table, output, write_options)
}

fn write_curve<C: CurveCsvExt>(
    curve: &C,
    output: Option<&Path>,
    options: &CsvWriteOptions,
) -> Result<()> {
    if let Some(path) = output {
        let rows = curve
            .save_csv(path, options)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        eprintln!("Wrote {} rows to '{}'", rows, path.display());
    } else {
        let mut stdout = io::stdout().lock();
        curve
            .write_csv(&mut stdout, options)
            .context("Failed to write to stdout")?;
        stdout.flush().context("Failed to write to stdout")?;
    }
    Ok(())
}

fn check(expression: &str, policy: NumericPolicy) -> Result<()> {
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let f = CompiledExpression::compile_with_sink(expression, policy, &mut diagnostics);

    if diagnostics.is_empty() {
        println!("{}: ok", f.source());
        return Ok(());
    }

    println!("{}", f.source());
    for diagnostic in &diagnostics {
        println!("  {}", diagnostic);
    }
    if f.is_degenerate() {
        println!("  expression always evaluates to 0");
    }

    bail!("{} diagnostic(s) in '{}'", diagnostics.len(), f.source())
}
