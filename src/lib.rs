//! Quantclass: image preprocessing and label ranking for quantized
//! image classifiers.
//!
//! A quantized classifier takes a fixed-size `u8` RGB tensor and returns one
//! `u8` confidence per class. Quantclass handles both ends of that contract:
//! packing an arbitrary image into the input tensor, and turning the output
//! tensor into a ranked list of labels. Running the model itself is left to
//! an external runtime behind the [`pipeline::InferenceEngine`] trait.
//!
//! # Modules
//!
//! - [`tensor`]: Tensor shapes, element types and byte buffers
//! - [`preprocess`]: Image to input tensor conversion
//! - [`rank`]: Output tensor to ranked labels
//! - [`labels`]: Label file parsing
//! - [`model`]: Model descriptors (JSON / YAML)
//! - [`check`]: Descriptor and label consistency checks
//! - [`pipeline`]: End-to-end classification and stale-result guarding
//! - [`error`]: Error types for quantclass operations

pub mod check;
pub mod error;
pub mod labels;
pub mod model;
pub mod pipeline;
pub mod preprocess;
pub mod rank;
pub mod tensor;

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::{debug, info};

pub use error::QuantclassError;
pub use labels::LabelList;
pub use model::ModelDescriptor;
pub use pipeline::{Classifier, InferenceEngine};
pub use preprocess::preprocess;
pub use rank::rank;

use preprocess::{PreprocessOptions, ResizeFilter};
use tensor::{OutputTensorBytes, TensorShape};

/// The quantclass CLI application.
#[derive(Parser)]
#[command(name = "quantclass")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert an image (or a directory of images) into raw input tensors.
    Preprocess(PreprocessArgs),
    /// Rank raw output scores against a label file.
    Rank(RankArgs),
    /// Check a model descriptor against its label file.
    Check(CheckArgs),
}

/// Arguments for the preprocess subcommand.
#[derive(clap::Args)]
struct PreprocessArgs {
    /// Input image file or directory.
    input: PathBuf,

    /// Output tensor file (or directory when the input is a directory).
    #[arg(short, long)]
    output: PathBuf,

    /// Model descriptor supplying the input shape.
    #[arg(long)]
    model: Option<PathBuf>,

    /// Target height in pixels (overrides the descriptor).
    #[arg(long)]
    height: Option<usize>,

    /// Target width in pixels (overrides the descriptor).
    #[arg(long)]
    width: Option<usize>,

    /// Resampling filter.
    #[arg(long, value_enum, default_value_t = ResizeFilter::Bilinear)]
    filter: ResizeFilter,
}

/// Arguments for the rank subcommand.
#[derive(clap::Args)]
struct RankArgs {
    /// Raw output tensor file (one byte per class).
    scores: PathBuf,

    /// Label file, one label per line.
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Model descriptor supplying the label file and default top-k.
    #[arg(long)]
    model: Option<PathBuf>,

    /// Number of labels to report.
    #[arg(long)]
    top_k: Option<usize>,

    /// Output format ('text', 'json', or 'csv').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the check subcommand.
#[derive(clap::Args)]
struct CheckArgs {
    /// Model descriptor (.json, .yaml or .yml).
    #[arg(long)]
    model: PathBuf,

    /// Label file (defaults to the one named by the descriptor).
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Run the quantclass CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), QuantclassError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Preprocess(args)) => run_preprocess(args),
        Some(Commands::Rank(args)) => run_rank(args),
        Some(Commands::Check(args)) => run_check(args),
        None => {
            println!("quantclass {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Image preprocessing and label ranking for quantized classifiers.");
            println!();
            println!("Run 'quantclass --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the preprocess subcommand.
fn run_preprocess(args: PreprocessArgs) -> Result<(), QuantclassError> {
    let base = match &args.model {
        Some(path) => ModelDescriptor::read(path)?.input.shape,
        None => TensorShape::default(),
    };
    let shape = TensorShape::rgb(
        args.height.unwrap_or(base.height()),
        args.width.unwrap_or(base.width()),
    )?;
    let opts = PreprocessOptions {
        filter: args.filter,
    };

    if args.input.is_dir() {
        let files = preprocess::collect_image_files(&args.input)?;
        info!(
            "preprocessing {} image(s) under {}",
            files.len(),
            args.input.display()
        );

        for file in &files {
            let rel = file.strip_prefix(&args.input).unwrap_or(file.as_path());
            let mut name = OsString::from(rel.as_os_str());
            name.push(".u8");
            let target = args.output.join(name);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            preprocess_file(file, &target, &shape, &opts)?;
        }

        println!(
            "Preprocessed {} image(s) to {} ({} bytes each, shape {})",
            files.len(),
            args.output.display(),
            shape.element_count(),
            shape
        );
    } else {
        preprocess_file(&args.input, &args.output, &shape, &opts)?;
        println!(
            "Wrote {} bytes (shape {}) to {}",
            shape.element_count(),
            shape,
            args.output.display()
        );
    }

    Ok(())
}

fn preprocess_file(
    input: &Path,
    output: &Path,
    shape: &TensorShape,
    opts: &PreprocessOptions,
) -> Result<(), QuantclassError> {
    let (width, height) = preprocess::probe_dimensions(input)?;
    if width == 0 || height == 0 {
        return Err(QuantclassError::EmptyImage { width, height });
    }

    let image = preprocess::load_image(input)?;
    let tensor = preprocess::preprocess_with(&image, shape, opts)?;
    fs::write(output, tensor.as_bytes())?;
    debug!("{} -> {}", input.display(), output.display());
    Ok(())
}

/// Execute the rank subcommand.
fn run_rank(args: RankArgs) -> Result<(), QuantclassError> {
    let descriptor = args.model.as_deref().map(ModelDescriptor::read).transpose()?;

    let labels_path = args
        .labels
        .clone()
        .or_else(|| descriptor.as_ref().and_then(|d| d.labels.clone()))
        .ok_or_else(|| {
            QuantclassError::MissingArgument(
                "no label file (pass --labels or a --model that names one)".to_string(),
            )
        })?;
    let labels = LabelList::read(&labels_path)?;
    let top_k = args
        .top_k
        .or_else(|| descriptor.as_ref().map(|d| d.top_k))
        .unwrap_or(model::DEFAULT_TOP_K);

    let scores = OutputTensorBytes::new(fs::read(&args.scores)?);
    let ranked = rank::rank(&scores, &labels, top_k)?;

    match args.output.as_str() {
        "text" => print!("{}", ranked),
        "json" => println!("{}", serde_json::to_string_pretty(&ranked)?),
        "csv" => ranked.write_csv(std::io::stdout().lock())?,
        other => {
            return Err(QuantclassError::UnsupportedFormat(format!(
                "'{}' (supported: text, json, csv)",
                other
            )));
        }
    }

    Ok(())
}

/// Execute the check subcommand.
fn run_check(args: CheckArgs) -> Result<(), QuantclassError> {
    let descriptor = ModelDescriptor::read(&args.model)?;

    let labels = match args.labels.as_ref().or(descriptor.labels.as_ref()) {
        Some(path) => Some(LabelList::read(path)?),
        None => None,
    };

    let opts = check::CheckOptions {
        strict: args.strict,
    };
    let report = check::check_configuration(&descriptor, labels.as_ref(), &opts);

    match args.output.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print!("{}", report),
    }

    if report.passed() {
        Ok(())
    } else {
        Err(QuantclassError::CheckFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    }
}
