//! Bundle-backed prediction.

use std::path::Path;

use tracing::{debug, warn};
use vision_models::{load_bundle, ClassifierBackend, ImagePreprocessor};
use vision_types::{LabelEncoder, PredictionResult};

use crate::error::{InferError, Result};
use crate::gate::{apply_gate, ConfidenceThreshold};

/// Everything inference needs from a loaded bundle.
#[derive(Debug)]
struct LoadedModel<F> {
    fitted: F,
    encoder: LabelEncoder,
    preprocessor: ImagePreprocessor,
}

/// A predictor holding at most one loaded model.
///
/// Missing models are a first-class state: a predictor constructed with
/// [`unloaded`](Self::unloaded), or the free [`predict`] helper pointed
/// at a nonexistent bundle, answers every request with the
/// model-unavailable result instead of failing.
///
/// # Example
///
/// ```ignore
/// use vision_infer::{Predictor, ConfidenceThreshold, DEFAULT_CONFIDENCE_THRESHOLD};
/// use vision_models::{FitOptions, SoftmaxClassifier};
/// use vision_types::ImageGeometry;
///
/// let backend = SoftmaxClassifier::new(ImageGeometry::square(64), FitOptions::default());
/// let predictor = Predictor::load(backend, "models/food".as_ref())?;
///
/// let result = predictor.predict("photo.jpg".as_ref(), DEFAULT_CONFIDENCE_THRESHOLD)?;
/// match result.predicted_label {
///     Some(label) => println!("{label} ({:.0}%)", result.confidence * 100.0),
///     None => println!("not confident enough"),
/// }
/// ```
#[derive(Debug)]
pub struct Predictor<C: ClassifierBackend> {
    backend: C,
    loaded: Option<LoadedModel<C::Fitted>>,
}

impl<C: ClassifierBackend> Predictor<C> {
    /// Loads a predictor from a bundle directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundle is missing, incompatible, or
    /// written by a different backend. Callers that want missing models
    /// treated as a rejection use the free [`predict`] function.
    pub fn load(backend: C, bundle_path: &Path) -> Result<Self> {
        let (fitted, manifest) = load_bundle(&backend, bundle_path)?;
        let preprocessor = ImagePreprocessor::new(manifest.geometry)?;
        Ok(Self {
            backend,
            loaded: Some(LoadedModel {
                fitted,
                encoder: manifest.encoder,
                preprocessor,
            }),
        })
    }

    /// Creates a predictor with no model.
    #[must_use]
    pub const fn unloaded(backend: C) -> Self {
        Self {
            backend,
            loaded: None,
        }
    }

    /// Returns `true` if a model is loaded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Returns the loaded model's labels in key order, if any.
    #[must_use]
    pub fn labels(&self) -> Option<&[String]> {
        self.loaded.as_ref().map(|m| m.encoder.labels())
    }

    /// Classifies one image file, gated by `threshold`.
    ///
    /// With no model loaded the result is the model-unavailable
    /// rejection, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`InferError::InvalidThreshold`] for a threshold outside
    /// `[0, 1]`, and a model error if the image cannot be decoded or
    /// scored.
    pub fn predict(&self, image_path: &Path, threshold: f32) -> Result<PredictionResult> {
        let threshold =
            ConfidenceThreshold::try_new(threshold).ok_or(InferError::InvalidThreshold(threshold))?;

        let Some(model) = &self.loaded else {
            debug!(image = %image_path.display(), "no model loaded");
            return Ok(PredictionResult::model_unavailable());
        };

        let image = model.preprocessor.process(image_path)?;
        let scores = self.backend.infer(&model.fitted, &image)?;
        let result = apply_gate(&scores, &model.encoder, threshold);

        debug!(
            image = %image_path.display(),
            accepted = result.accepted,
            confidence = result.confidence,
            label = result.predicted_label.as_deref().unwrap_or("-"),
            "prediction"
        );
        Ok(result)
    }
}

/// One-shot prediction against a bundle on disk.
///
/// Loads the bundle, classifies the image, and drops the model. A bundle
/// that cannot be loaded yields the model-unavailable result with a
/// warning; image decode failures remain errors since the caller
/// explicitly named the file.
///
/// # Errors
///
/// Returns [`InferError::InvalidThreshold`] for an out-of-range
/// threshold, and a model error if the image cannot be decoded or
/// scored.
pub fn predict<C: ClassifierBackend>(
    backend: C,
    bundle_path: &Path,
    image_path: &Path,
    threshold: f32,
) -> Result<PredictionResult> {
    if ConfidenceThreshold::try_new(threshold).is_none() {
        return Err(InferError::InvalidThreshold(threshold));
    }

    let predictor = match Predictor::load(backend, bundle_path) {
        Ok(predictor) => predictor,
        Err(e) => {
            warn!(bundle = %bundle_path.display(), error = %e, "model unavailable");
            return Ok(PredictionResult::model_unavailable());
        }
    };
    predictor.predict(image_path, threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::path::PathBuf;
    use vision_models::{save_bundle, FitOptions, SoftmaxClassifier};
    use vision_types::{
        ImageGeometry, LabeledImage, PreprocessedImage, RejectionReason, TrainingSample,
    };

    const GEOMETRY: ImageGeometry = ImageGeometry::new(2, 2, 3);

    fn backend() -> SoftmaxClassifier {
        let options = FitOptions::default()
            .with_epochs(30)
            .with_batch_size(4)
            .with_learning_rate(1e-2)
            .with_early_stopping_patience(0);
        SoftmaxClassifier::new(GEOMETRY, options).with_hidden(8)
    }

    fn encoder() -> LabelEncoder {
        LabelEncoder::fit(&[
            LabeledImage::new("a.png", "bright"),
            LabeledImage::new("b.png", "dark"),
        ])
    }

    /// Fits bright-vs-dark and saves a bundle under the given root.
    fn write_bundle(root: &Path) -> PathBuf {
        let mut samples = Vec::new();
        for i in 0..8 {
            #[allow(clippy::cast_precision_loss)]
            let jitter = (i % 4) as f32 * 0.01;
            samples.push(TrainingSample::new(
                PreprocessedImage::new(vec![0.9 - jitter; 12], GEOMETRY),
                0,
            ));
            samples.push(TrainingSample::new(
                PreprocessedImage::new(vec![0.1 + jitter; 12], GEOMETRY),
                1,
            ));
        }

        let backend = backend();
        let fitted = backend.fit(&samples, &[], 2).unwrap();
        let path = root.join("model");
        save_bundle(&backend, &fitted, GEOMETRY, &encoder(), &path).unwrap();
        path
    }

    fn write_png(dir: &Path, name: &str, color: [u8; 3]) -> PathBuf {
        let image = RgbImage::from_pixel(8, 8, Rgb(color));
        let path = dir.join(name);
        image.save(&path).unwrap();
        path
    }

    #[test]
    fn predictor_loads_and_classifies() {
        let root = tempfile::tempdir().unwrap();
        let bundle = write_bundle(root.path());
        let image = write_png(root.path(), "white.png", [240, 240, 240]);

        let predictor = Predictor::load(backend(), &bundle).unwrap();
        assert!(predictor.is_loaded());
        assert_eq!(predictor.labels().unwrap(), ["bright", "dark"]);

        let result = predictor.predict(&image, 0.5).unwrap();
        assert!(result.accepted);
        assert_eq!(result.predicted_label.as_deref(), Some("bright"));
    }

    #[test]
    fn predictor_rejects_at_high_threshold() {
        let root = tempfile::tempdir().unwrap();
        let bundle = write_bundle(root.path());
        // Mid-gray sits between the classes, so confidence stays low.
        let image = write_png(root.path(), "gray.png", [128, 128, 128]);

        let predictor = Predictor::load(backend(), &bundle).unwrap();
        let result = predictor.predict(&image, 0.99).unwrap();

        assert!(!result.accepted);
        assert_eq!(result.reason, Some(RejectionReason::BelowThreshold));
    }

    #[test]
    fn predictor_invalid_threshold() {
        let predictor = Predictor::unloaded(backend());
        let err = predictor.predict(Path::new("x.png"), 1.5).unwrap_err();
        assert!(matches!(err, InferError::InvalidThreshold(_)));
    }

    #[test]
    fn predictor_unloaded_is_model_unavailable() {
        let predictor = Predictor::unloaded(backend());
        assert!(!predictor.is_loaded());
        assert!(predictor.labels().is_none());

        let result = predictor.predict(Path::new("x.png"), 0.75).unwrap();
        assert!(result.is_model_unavailable());
    }

    #[test]
    fn predictor_decode_failure_is_error() {
        let root = tempfile::tempdir().unwrap();
        let bundle = write_bundle(root.path());
        let bad = root.path().join("bad.png");
        std::fs::write(&bad, b"not an image").unwrap();

        let predictor = Predictor::load(backend(), &bundle).unwrap();
        assert!(predictor.predict(&bad, 0.75).is_err());
    }

    #[test]
    fn one_shot_predict() {
        let root = tempfile::tempdir().unwrap();
        let bundle = write_bundle(root.path());
        let image = write_png(root.path(), "black.png", [10, 10, 10]);

        let result = predict(backend(), &bundle, &image, 0.5).unwrap();
        assert!(result.accepted);
        assert_eq!(result.predicted_label.as_deref(), Some("dark"));
    }

    #[test]
    fn one_shot_missing_bundle_is_model_unavailable() {
        let root = tempfile::tempdir().unwrap();
        let image = write_png(root.path(), "x.png", [10, 10, 10]);

        let result = predict(backend(), Path::new("/nope/model"), &image, 0.75).unwrap();
        assert!(result.is_model_unavailable());
    }

    #[test]
    fn one_shot_invalid_threshold_checked_before_load() {
        let err = predict(backend(), Path::new("/nope"), Path::new("x.png"), -0.5).unwrap_err();
        assert!(matches!(err, InferError::InvalidThreshold(_)));
    }
}
