//! End-to-end training pipeline.

use std::path::Path;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};
use vision_dataset::{load_examples, split_dataset, ClassBreakdown};
use vision_models::{save_bundle, ClassifierBackend, ImagePreprocessor};
use vision_types::{LabelEncoder, LabeledImage, TrainingSample};

use crate::config::TrainerConfig;
use crate::error::{Result, TrainError};
use crate::metrics::{ConfusionMatrix, EvaluationReport};

/// Runs a full training pass against a classifier backend.
///
/// One [`train`](Self::train) call takes a folder of labeled images all
/// the way to a saved model bundle:
///
/// 1. load examples from the class-per-directory layout
/// 2. shuffle, so directory order never leaks into the split
/// 3. fit the label encoder and attach keys
/// 4. decode and normalize every image, skipping undecodable files
/// 5. partition into train and test with the seeded split
/// 6. fit the backend, with the held-out set steering early stopping
/// 7. evaluate on the held-out set
/// 8. write the bundle
///
/// # Example
///
/// ```ignore
/// use vision_models::{FitOptions, SoftmaxClassifier};
/// use vision_training::{Trainer, TrainerConfig};
///
/// let config = TrainerConfig::default();
/// let backend = SoftmaxClassifier::new(config.geometry, FitOptions::default());
/// let trainer = Trainer::new(backend, config)?;
///
/// let report = trainer.train("data/food".as_ref(), "models/food".as_ref())?;
/// println!("{}", report.summary());
/// ```
#[derive(Debug, Clone)]
pub struct Trainer<C: ClassifierBackend> {
    backend: C,
    config: TrainerConfig,
}

impl<C: ClassifierBackend> Trainer<C> {
    /// Creates a trainer.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::InvalidConfig`] if the configured geometry
    /// has a zero dimension.
    pub fn new(backend: C, config: TrainerConfig) -> Result<Self> {
        if !config.is_valid() {
            return Err(TrainError::invalid_config(format!(
                "geometry dimensions must be positive, got {}",
                config.geometry
            )));
        }
        Ok(Self { backend, config })
    }

    /// Returns the trainer configuration.
    #[must_use]
    pub const fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Returns the backend.
    #[must_use]
    pub const fn backend(&self) -> &C {
        &self.backend
    }

    /// Trains on the images under `images_root` and saves a bundle to
    /// `bundle_path`.
    ///
    /// The returned report describes accuracy on the held-out test set.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset is unusable (missing, empty,
    /// fewer than two classes, or a class lost every example to decode
    /// failures), or if fitting, evaluation, or bundle persistence
    /// fails. Individual undecodable images are skipped with a warning,
    /// not errors.
    pub fn train(&self, images_root: &Path, bundle_path: &Path) -> Result<EvaluationReport> {
        let mut examples = load_examples(images_root)?;
        if examples.is_empty() {
            return Err(TrainError::empty_dataset(images_root.display().to_string()));
        }

        let loaded = ClassBreakdown::from_examples(&examples);
        info!(
            classes = loaded.num_classes(),
            examples = loaded.total_examples(),
            "loaded dataset"
        );
        if loaded.num_classes() < 2 {
            return Err(TrainError::InsufficientClasses(loaded.num_classes()));
        }

        let mut rng = self
            .config
            .shuffle_seed
            .map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);
        examples.shuffle(&mut rng);

        let encoder = LabelEncoder::fit(&examples);
        let encoded = encoder.encode_examples(examples);

        let preprocessor = ImagePreprocessor::new(self.config.geometry)?;
        let mut samples = Vec::with_capacity(encoded.len());
        let mut usable = Vec::with_capacity(encoded.len());
        for example in encoded {
            match preprocessor.process(&example.path) {
                Ok(image) => {
                    usable.push(LabeledImage::new(example.path, example.label));
                    samples.push(TrainingSample::new(image, example.label_key));
                }
                Err(e) => {
                    warn!(path = %example.path.display(), error = %e, "skipping undecodable image");
                }
            }
        }

        let emptied = loaded.missing_from(&ClassBreakdown::from_examples(&usable));
        if !emptied.is_empty() {
            return Err(TrainError::class_emptied(&emptied));
        }
        if samples.is_empty() {
            return Err(TrainError::empty_dataset(
                "every image failed to decode".to_string(),
            ));
        }

        let (train, test) = split_dataset(&samples, self.config.test_fraction, self.config.split_seed);
        info!(
            train = train.len(),
            test = test.len(),
            seed = self.config.split_seed,
            "partitioned dataset"
        );

        // The held-out set doubles as the validation set for early
        // stopping; the backend never trains on it.
        let fitted = self.backend.fit(&train, &test, encoder.len())?;

        let report = evaluate(&self.backend, &fitted, &test, &encoder)?;
        info!(
            macro_accuracy = report.macro_accuracy,
            micro_accuracy = report.micro_accuracy,
            "evaluation complete"
        );

        save_bundle(
            &self.backend,
            &fitted,
            self.config.geometry,
            &encoder,
            bundle_path,
        )?;

        Ok(report)
    }
}

/// Scores every held-out sample and builds the evaluation report.
fn evaluate<C: ClassifierBackend>(
    backend: &C,
    fitted: &C::Fitted,
    test: &[TrainingSample],
    encoder: &LabelEncoder,
) -> Result<EvaluationReport> {
    let mut confusion = ConfusionMatrix::new(encoder.labels().to_vec());
    for sample in test {
        let scores = backend.infer(fitted, &sample.image)?;
        if let Some((predicted, _)) = scores.argmax() {
            confusion.record(sample.label_key, predicted);
        }
    }
    Ok(EvaluationReport::from_confusion(confusion, test.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use serde::{Deserialize, Serialize};
    use std::fs;
    use vision_dataset::TestFraction;
    use vision_models::{
        load_manifest, FitOptions, ModelError, SoftmaxClassifier, MANIFEST_FILE,
    };
    use vision_types::{ImageGeometry, PreprocessedImage, ScoreVector};

    /// Nearest-centroid backend over mean brightness. Fast and fully
    /// deterministic, so pipeline tests stay independent of optimizer
    /// behavior.
    #[derive(Debug)]
    struct MeanClassifier;

    #[derive(Serialize, Deserialize)]
    struct MeanFitted {
        centroids: Vec<f32>,
    }

    fn brightness(image: &PreprocessedImage) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let len = image.len().max(1) as f32;
        image.data().iter().sum::<f32>() / len
    }

    impl ClassifierBackend for MeanClassifier {
        type Fitted = MeanFitted;

        fn id(&self) -> &'static str {
            "mean-test"
        }

        fn fit(
            &self,
            train: &[TrainingSample],
            _validation: &[TrainingSample],
            num_classes: usize,
        ) -> vision_models::Result<MeanFitted> {
            let mut sums = vec![0.0_f32; num_classes];
            let mut counts = vec![0_usize; num_classes];
            for sample in train {
                sums[sample.label_key] += brightness(&sample.image);
                counts[sample.label_key] += 1;
            }
            #[allow(clippy::cast_precision_loss)]
            let centroids = sums
                .iter()
                .zip(&counts)
                .map(|(&sum, &count)| if count == 0 { 0.0 } else { sum / count as f32 })
                .collect();
            Ok(MeanFitted { centroids })
        }

        fn infer(
            &self,
            fitted: &MeanFitted,
            image: &PreprocessedImage,
        ) -> vision_models::Result<ScoreVector> {
            let value = brightness(image);
            let raw: Vec<f32> = fitted
                .centroids
                .iter()
                .map(|&c| 1.0 / ((c - value).abs() + 1e-3))
                .collect();
            let sum: f32 = raw.iter().sum();
            Ok(ScoreVector::new(raw.iter().map(|&r| r / sum).collect()))
        }

        fn save(&self, fitted: &MeanFitted, dir: &Path) -> vision_models::Result<()> {
            let json = serde_json::to_string(fitted)?;
            fs::write(dir.join("centroids.json"), json)?;
            Ok(())
        }

        fn load(&self, dir: &Path, num_classes: usize) -> vision_models::Result<MeanFitted> {
            let json = fs::read_to_string(dir.join("centroids.json"))?;
            let fitted: MeanFitted = serde_json::from_str(&json)?;
            if fitted.centroids.len() != num_classes {
                return Err(ModelError::incompatible_bundle(
                    format!("{num_classes} classes"),
                    format!("{} classes", fitted.centroids.len()),
                ));
            }
            Ok(fitted)
        }
    }

    fn write_class(root: &Path, label: &str, count: usize, color: [u8; 3]) {
        let dir = root.join(label);
        fs::create_dir_all(&dir).unwrap();
        for i in 0..count {
            let image = RgbImage::from_pixel(8, 8, Rgb(color));
            image.save(dir.join(format!("{i}.png"))).unwrap();
        }
    }

    fn test_config() -> TrainerConfig {
        TrainerConfig::default()
            .with_geometry(ImageGeometry::square(4))
            .with_shuffle_seed(11)
    }

    #[test]
    fn train_end_to_end() {
        let data = tempfile::tempdir().unwrap();
        write_class(data.path(), "bright", 10, [250, 250, 250]);
        write_class(data.path(), "dark", 10, [5, 5, 5]);

        let models = tempfile::tempdir().unwrap();
        let bundle = models.path().join("food");

        let trainer = Trainer::new(MeanClassifier, test_config()).unwrap();
        let report = trainer.train(data.path(), &bundle).unwrap();

        assert_eq!(report.test_samples, 4);
        assert!((report.micro_accuracy - 1.0).abs() < 1e-6);
        assert!((report.macro_accuracy - 1.0).abs() < 1e-6);

        assert!(bundle.join(MANIFEST_FILE).exists());
        let manifest = load_manifest(&bundle).unwrap();
        assert_eq!(manifest.backend_id, "mean-test");
        assert_eq!(manifest.encoder.labels(), ["bright", "dark"]);
    }

    #[test]
    fn train_three_classes_shapes_confusion_matrix() {
        let data = tempfile::tempdir().unwrap();
        write_class(data.path(), "hotdog", 6, [250, 250, 250]);
        write_class(data.path(), "pizza", 6, [128, 128, 128]);
        write_class(data.path(), "sushi", 6, [5, 5, 5]);

        let models = tempfile::tempdir().unwrap();
        let trainer = Trainer::new(MeanClassifier, test_config()).unwrap();
        let report = trainer.train(data.path(), &models.path().join("m")).unwrap();

        assert!((0.0..=1.0).contains(&report.macro_accuracy));
        assert!((0.0..=1.0).contains(&report.micro_accuracy));
        assert_eq!(report.confusion.num_classes(), 3);
        assert_eq!(report.confusion.total(), report.test_samples);
        assert_eq!(
            report.confusion.labels(),
            ["hotdog", "pizza", "sushi"]
        );
    }

    #[test]
    fn train_missing_root() {
        let models = tempfile::tempdir().unwrap();
        let trainer = Trainer::new(MeanClassifier, test_config()).unwrap();

        let err = trainer
            .train(Path::new("/definitely/missing"), &models.path().join("m"))
            .unwrap_err();
        assert!(matches!(err, TrainError::Dataset(_)));
    }

    #[test]
    fn train_empty_dataset() {
        let data = tempfile::tempdir().unwrap();
        let models = tempfile::tempdir().unwrap();
        let trainer = Trainer::new(MeanClassifier, test_config()).unwrap();

        let err = trainer
            .train(data.path(), &models.path().join("m"))
            .unwrap_err();
        assert!(matches!(err, TrainError::EmptyDataset(_)));
    }

    #[test]
    fn train_single_class() {
        let data = tempfile::tempdir().unwrap();
        write_class(data.path(), "bright", 5, [250, 250, 250]);

        let models = tempfile::tempdir().unwrap();
        let trainer = Trainer::new(MeanClassifier, test_config()).unwrap();

        let err = trainer
            .train(data.path(), &models.path().join("m"))
            .unwrap_err();
        assert!(matches!(err, TrainError::InsufficientClasses(1)));
    }

    #[test]
    fn train_skips_undecodable_images() {
        let data = tempfile::tempdir().unwrap();
        write_class(data.path(), "bright", 6, [250, 250, 250]);
        write_class(data.path(), "dark", 6, [5, 5, 5]);
        fs::write(data.path().join("bright/broken.png"), b"not an image").unwrap();

        let models = tempfile::tempdir().unwrap();
        let trainer = Trainer::new(MeanClassifier, test_config()).unwrap();

        let report = trainer.train(data.path(), &models.path().join("m")).unwrap();
        assert!(report.test_samples > 0);
    }

    #[test]
    fn train_errors_when_class_loses_every_example() {
        let data = tempfile::tempdir().unwrap();
        write_class(data.path(), "bright", 5, [250, 250, 250]);
        write_class(data.path(), "dark", 5, [5, 5, 5]);

        let junk = data.path().join("junk");
        fs::create_dir_all(&junk).unwrap();
        fs::write(junk.join("a.png"), b"garbage").unwrap();
        fs::write(junk.join("b.png"), b"more garbage").unwrap();

        let models = tempfile::tempdir().unwrap();
        let trainer = Trainer::new(MeanClassifier, test_config()).unwrap();

        let err = trainer
            .train(data.path(), &models.path().join("m"))
            .unwrap_err();
        match err {
            TrainError::ClassEmptied(labels) => assert_eq!(labels, "junk"),
            other => panic!("expected ClassEmptied, got {other}"),
        }
    }

    #[test]
    fn train_is_deterministic_with_pinned_seeds() {
        let data = tempfile::tempdir().unwrap();
        write_class(data.path(), "bright", 8, [250, 250, 250]);
        write_class(data.path(), "dark", 8, [5, 5, 5]);

        let models = tempfile::tempdir().unwrap();
        let trainer = Trainer::new(MeanClassifier, test_config()).unwrap();

        let first = trainer.train(data.path(), &models.path().join("a")).unwrap();
        let second = trainer.train(data.path(), &models.path().join("b")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn train_respects_test_fraction() {
        let data = tempfile::tempdir().unwrap();
        write_class(data.path(), "bright", 10, [250, 250, 250]);
        write_class(data.path(), "dark", 10, [5, 5, 5]);

        let models = tempfile::tempdir().unwrap();
        let config = test_config().with_test_fraction(TestFraction::new(0.5));
        let trainer = Trainer::new(MeanClassifier, config).unwrap();

        let report = trainer.train(data.path(), &models.path().join("m")).unwrap();
        assert_eq!(report.test_samples, 10);
    }

    #[test]
    fn trainer_rejects_invalid_geometry() {
        let config = TrainerConfig::default().with_geometry(ImageGeometry::new(0, 4, 3));
        let err = Trainer::new(MeanClassifier, config).unwrap_err();
        assert!(matches!(err, TrainError::InvalidConfig(_)));
    }

    #[test]
    fn train_with_softmax_backend() {
        let data = tempfile::tempdir().unwrap();
        write_class(data.path(), "bright", 8, [250, 250, 250]);
        write_class(data.path(), "dark", 8, [5, 5, 5]);

        let models = tempfile::tempdir().unwrap();
        let bundle = models.path().join("food");

        let config = TrainerConfig::default()
            .with_geometry(ImageGeometry::square(2))
            .with_shuffle_seed(3);
        let options = FitOptions::default()
            .with_epochs(25)
            .with_batch_size(4)
            .with_learning_rate(1e-2);
        let backend = SoftmaxClassifier::new(config.geometry, options).with_hidden(8);

        let trainer = Trainer::new(backend, config).unwrap();
        let report = trainer.train(data.path(), &bundle).unwrap();

        assert!(report.test_samples > 0);
        assert!(report.micro_accuracy >= 0.5);
        assert!(load_manifest(&bundle).is_ok());
    }
}
