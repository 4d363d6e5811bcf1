//! Command-line entry point for the foodlens image classifier.
//!
//! # Commands
//!
//! - `foodlens train --images <DIR> --model <DIR>` - Train on a folder
//!   of labeled images and save a model bundle
//! - `foodlens predict --model <DIR> --image <FILE>` - Classify one
//!   image against a saved bundle

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vision_dataset::TestFraction;
use vision_infer::DEFAULT_CONFIDENCE_THRESHOLD;
use vision_models::{load_manifest, FitOptions, SoftmaxClassifier};
use vision_training::{Trainer, TrainerConfig};
use vision_types::{ImageGeometry, RejectionReason};

/// Food image classification: train on labeled folders, predict with a
/// confidence gate.
#[derive(Parser)]
#[command(name = "foodlens")]
#[command(about = "Train and query the foodlens image classifier", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a classifier on a class-per-directory image folder
    Train {
        /// Root directory of labeled images (one subdirectory per class)
        #[arg(long)]
        images: PathBuf,

        /// Output directory for the model bundle
        #[arg(long)]
        model: PathBuf,

        /// Held-out fraction for evaluation, in (0, 1)
        #[arg(long, default_value_t = 0.2)]
        test_fraction: f32,

        /// Seed for the train/test partition
        #[arg(long, default_value_t = 1)]
        split_seed: u64,

        /// Seed for the pre-split shuffle (random when omitted)
        #[arg(long)]
        shuffle_seed: Option<u64>,

        /// Square input size in pixels
        #[arg(long, default_value_t = 64)]
        size: u32,

        /// Maximum training epochs
        #[arg(long, default_value_t = 40)]
        epochs: usize,

        /// Mini-batch size
        #[arg(long, default_value_t = 32)]
        batch_size: usize,

        /// Optimizer learning rate
        #[arg(long, default_value_t = 1e-3)]
        learning_rate: f64,
    },

    /// Classify one image against a saved model bundle
    Predict {
        /// Model bundle directory
        #[arg(long)]
        model: PathBuf,

        /// Image file to classify
        #[arg(long)]
        image: PathBuf,

        /// Minimum confidence to accept a prediction, in [0, 1]
        #[arg(long, default_value_t = DEFAULT_CONFIDENCE_THRESHOLD)]
        threshold: f32,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Train {
            images,
            model,
            test_fraction,
            split_seed,
            shuffle_seed,
            size,
            epochs,
            batch_size,
            learning_rate,
        } => train(TrainArgs {
            images,
            model,
            test_fraction,
            split_seed,
            shuffle_seed,
            size,
            epochs,
            batch_size,
            learning_rate,
        }),
        Commands::Predict {
            model,
            image,
            threshold,
        } => predict(&model, &image, threshold),
    }
}

struct TrainArgs {
    images: PathBuf,
    model: PathBuf,
    test_fraction: f32,
    split_seed: u64,
    shuffle_seed: Option<u64>,
    size: u32,
    epochs: usize,
    batch_size: usize,
    learning_rate: f64,
}

fn train(args: TrainArgs) -> Result<()> {
    let Some(fraction) = TestFraction::try_new(args.test_fraction) else {
        bail!(
            "test fraction must be strictly between 0 and 1, got {}",
            args.test_fraction
        );
    };

    let geometry = ImageGeometry::square(args.size);
    let mut config = TrainerConfig::default()
        .with_geometry(geometry)
        .with_test_fraction(fraction)
        .with_split_seed(args.split_seed);
    if let Some(seed) = args.shuffle_seed {
        config = config.with_shuffle_seed(seed);
    }

    let options = FitOptions::default()
        .with_epochs(args.epochs)
        .with_batch_size(args.batch_size)
        .with_learning_rate(args.learning_rate);
    let backend = SoftmaxClassifier::new(geometry, options);

    let trainer = Trainer::new(backend, config).context("trainer configuration rejected")?;
    let report = trainer
        .train(&args.images, &args.model)
        .context("training failed")?;

    println!("{}", report.summary());
    println!("model saved to {}", args.model.display());
    Ok(())
}

fn predict(model: &Path, image: &Path, threshold: f32) -> Result<()> {
    // The bundle fixes the input geometry; read it before building the
    // backend so the weights load against matching dimensions.
    let manifest = match load_manifest(model) {
        Ok(manifest) => manifest,
        Err(e) => {
            println!("no usable model at {}: {e}", model.display());
            println!("train one first with `foodlens train`");
            return Ok(());
        }
    };

    let backend = SoftmaxClassifier::new(manifest.geometry, FitOptions::default());
    let result = vision_infer::predict(backend, model, image, threshold)
        .context("prediction failed")?;

    match (&result.predicted_label, result.reason) {
        (Some(label), _) => {
            println!("{label} ({:.1}% confidence)", result.confidence * 100.0);
        }
        (None, Some(RejectionReason::BelowThreshold)) => {
            println!("no prediction: confidence below {threshold}");
        }
        (None, _) => {
            println!("no prediction: model unavailable");
        }
    }
    Ok(())
}
