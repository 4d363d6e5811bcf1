//! Softmax classifier backend built on Burn.

use std::path::Path;

use burn::module::{AutodiffModule, Module};
use burn::nn;
use burn::nn::loss::CrossEntropyLossConfig;
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::prelude::Backend;
use burn::record::{BinFileRecorder, FullPrecisionSettings, Recorder};
use burn::tensor::activation::{relu, softmax};
use burn::tensor::{Int, Tensor, TensorData};
use burn_autodiff::Autodiff;
use burn_ndarray::NdArray;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vision_types::{ImageGeometry, PreprocessedImage, ScoreVector, TrainingSample};

use crate::backend::{ClassifierBackend, FitOptions};
use crate::error::{ModelError, Result};

/// CPU backend used for inference.
pub type InferenceBackend = NdArray<f32>;

/// Autodiff wrapper used during fitting.
pub type TrainBackend = Autodiff<InferenceBackend>;

/// Weight file name inside a bundle directory.
const WEIGHTS_FILE: &str = "weights.bin";

/// Network shape file name inside a bundle directory.
const NETWORK_FILE: &str = "network.json";

/// Layer dimensions of a fitted network, persisted alongside the weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkShape {
    /// Flattened input length (channels * height * width).
    pub input_dim: usize,

    /// Hidden layer width.
    pub hidden: usize,

    /// Number of output classes.
    pub num_classes: usize,
}

/// Two-layer feedforward network: Input -> Linear -> `ReLU` -> Linear.
///
/// The forward pass emits raw logits; [`SoftmaxClassifier::infer`]
/// applies the softmax so stored weights stay loss-function agnostic.
#[derive(Debug, Module)]
pub struct SoftmaxModel<B: Backend> {
    linear1: nn::Linear<B>,
    linear2: nn::Linear<B>,
}

impl<B: Backend> SoftmaxModel<B> {
    fn new(shape: NetworkShape, device: &B::Device) -> Self {
        let linear1 = nn::LinearConfig::new(shape.input_dim, shape.hidden).init(device);
        let linear2 = nn::LinearConfig::new(shape.hidden, shape.num_classes).init(device);
        Self { linear1, linear2 }
    }

    fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.linear1.forward(input);
        let x = relu(x);
        self.linear2.forward(x)
    }
}

/// A fitted softmax model ready for inference.
#[derive(Debug)]
pub struct FittedSoftmax {
    model: SoftmaxModel<InferenceBackend>,
    shape: NetworkShape,
}

impl FittedSoftmax {
    /// Returns the network shape.
    #[must_use]
    pub const fn shape(&self) -> NetworkShape {
        self.shape
    }
}

/// Multiclass classifier backend trained with cross-entropy and Adam.
///
/// # Example
///
/// ```
/// use vision_models::{FitOptions, SoftmaxClassifier};
/// use vision_types::ImageGeometry;
///
/// let backend = SoftmaxClassifier::new(ImageGeometry::square(64), FitOptions::default());
/// assert_eq!(backend.hidden(), 128);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftmaxClassifier {
    geometry: ImageGeometry,
    hidden: usize,
    options: FitOptions,
}

impl SoftmaxClassifier {
    /// Default hidden layer width.
    pub const DEFAULT_HIDDEN: usize = 128;

    /// Creates a backend for the given input geometry.
    #[must_use]
    pub const fn new(geometry: ImageGeometry, options: FitOptions) -> Self {
        Self {
            geometry,
            hidden: Self::DEFAULT_HIDDEN,
            options,
        }
    }

    /// Sets the hidden layer width.
    #[must_use]
    pub const fn with_hidden(mut self, hidden: usize) -> Self {
        self.hidden = hidden;
        self
    }

    /// Returns the input geometry.
    #[must_use]
    pub const fn geometry(&self) -> ImageGeometry {
        self.geometry
    }

    /// Returns the hidden layer width.
    #[must_use]
    pub const fn hidden(&self) -> usize {
        self.hidden
    }

    /// Returns the fit options.
    #[must_use]
    pub const fn options(&self) -> FitOptions {
        self.options
    }

    fn validate_fit_inputs(&self, train: &[TrainingSample], num_classes: usize) -> Result<()> {
        if !self.options.is_valid() {
            return Err(ModelError::invalid_config(
                "epochs, batch size, and learning rate must be positive",
            ));
        }
        if self.hidden == 0 {
            return Err(ModelError::invalid_config("hidden width must be positive"));
        }
        if num_classes < 2 {
            return Err(ModelError::fit(format!(
                "need at least 2 classes, got {num_classes}"
            )));
        }
        if train.is_empty() {
            return Err(ModelError::fit("training set is empty"));
        }
        let input_dim = self.geometry.buffer_len();
        if let Some(bad) = train.iter().find(|s| s.image.len() != input_dim) {
            return Err(ModelError::fit(format!(
                "sample buffer length {} does not match geometry {}",
                bad.image.len(),
                self.geometry
            )));
        }
        Ok(())
    }

    fn validation_loss(
        model: &SoftmaxModel<InferenceBackend>,
        validation: &[TrainingSample],
        input_dim: usize,
        device: &<InferenceBackend as Backend>::Device,
    ) -> f32 {
        let loss_fn = CrossEntropyLossConfig::new().init(device);
        let (images, targets) = batch_tensors::<InferenceBackend>(validation, input_dim, device);
        loss_fn.forward(model.forward(images), targets).into_scalar()
    }
}

/// Flattens a batch of samples into backend tensors.
fn batch_tensors<B: Backend>(
    samples: &[TrainingSample],
    input_dim: usize,
    device: &B::Device,
) -> (Tensor<B, 2>, Tensor<B, 1, Int>) {
    let count = samples.len();
    let mut flat = Vec::with_capacity(count * input_dim);
    let mut keys = Vec::with_capacity(count);
    for sample in samples {
        flat.extend_from_slice(sample.image.data());
        #[allow(clippy::cast_possible_wrap)]
        keys.push(sample.label_key as i64);
    }

    let images = Tensor::from_data(TensorData::new(flat, [count, input_dim]), device);
    let targets = Tensor::from_data(TensorData::new(keys, [count]), device);
    (images, targets)
}

impl ClassifierBackend for SoftmaxClassifier {
    type Fitted = FittedSoftmax;

    fn id(&self) -> &'static str {
        "softmax-v1"
    }

    fn fit(
        &self,
        train: &[TrainingSample],
        validation: &[TrainingSample],
        num_classes: usize,
    ) -> Result<FittedSoftmax> {
        self.validate_fit_inputs(train, num_classes)?;

        let shape = NetworkShape {
            input_dim: self.geometry.buffer_len(),
            hidden: self.hidden,
            num_classes,
        };

        let device = <TrainBackend as Backend>::Device::default();
        let inner_device = <InferenceBackend as Backend>::Device::default();
        let mut model = SoftmaxModel::<TrainBackend>::new(shape, &device);
        let mut optimizer = AdamConfig::new().init();
        let loss_fn = CrossEntropyLossConfig::new().init(&device);

        info!(
            train = train.len(),
            validation = validation.len(),
            num_classes,
            epochs = self.options.epochs,
            batch_size = self.options.batch_size,
            "fitting softmax classifier"
        );

        let mut best: Option<(f32, SoftmaxModel<InferenceBackend>)> = None;
        let mut epochs_without_improvement = 0_usize;

        for epoch in 0..self.options.epochs {
            let mut epoch_loss = 0.0_f32;
            let mut batches = 0_usize;

            for chunk in train.chunks(self.options.batch_size) {
                let (images, targets) = batch_tensors::<TrainBackend>(chunk, shape.input_dim, &device);
                let loss = loss_fn.forward(model.forward(images), targets);
                epoch_loss += loss.clone().into_scalar();
                batches += 1;

                let grads = GradientsParams::from_grads(loss.backward(), &model);
                model = optimizer.step(self.options.learning_rate, model, grads);
            }

            #[allow(clippy::cast_precision_loss)]
            let train_loss = epoch_loss / batches.max(1) as f32;

            if validation.is_empty() {
                debug!(epoch, train_loss, "epoch complete");
                continue;
            }

            let candidate = model.valid();
            let val_loss =
                Self::validation_loss(&candidate, validation, shape.input_dim, &inner_device);
            debug!(epoch, train_loss, val_loss, "epoch complete");

            let improved = best.as_ref().map_or(true, |(top, _)| val_loss < *top);
            if improved {
                best = Some((val_loss, candidate));
                epochs_without_improvement = 0;
            } else {
                epochs_without_improvement += 1;
                if self.options.early_stopping_patience > 0
                    && epochs_without_improvement >= self.options.early_stopping_patience
                {
                    info!(epoch, "early stopping, validation loss stopped improving");
                    break;
                }
            }
        }

        let fitted = match best {
            Some((val_loss, model)) => {
                info!(best_val_loss = val_loss, "fit complete");
                model
            }
            None => model.valid(),
        };

        Ok(FittedSoftmax {
            model: fitted,
            shape,
        })
    }

    fn infer(&self, fitted: &FittedSoftmax, image: &PreprocessedImage) -> Result<ScoreVector> {
        if image.len() != fitted.shape.input_dim {
            return Err(ModelError::inference(format!(
                "image buffer length {} does not match model input {}",
                image.len(),
                fitted.shape.input_dim
            )));
        }

        let device = <InferenceBackend as Backend>::Device::default();
        let input = Tensor::<InferenceBackend, 2>::from_data(
            TensorData::new(image.data().to_vec(), [1, fitted.shape.input_dim]),
            &device,
        );

        let probabilities = softmax(fitted.model.forward(input), 1);
        let scores = probabilities
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| ModelError::inference(format!("{e:?}")))?;

        Ok(ScoreVector::new(scores))
    }

    fn save(&self, fitted: &FittedSoftmax, dir: &Path) -> Result<()> {
        let network = serde_json::to_string_pretty(&fitted.shape)?;
        std::fs::write(dir.join(NETWORK_FILE), network)?;

        let recorder = BinFileRecorder::<FullPrecisionSettings>::new();
        recorder
            .record(fitted.model.clone().into_record(), dir.join(WEIGHTS_FILE))
            .map_err(|e| ModelError::save_bundle(dir.display().to_string(), e.to_string()))?;

        Ok(())
    }

    fn load(&self, dir: &Path, num_classes: usize) -> Result<FittedSoftmax> {
        let network = std::fs::read_to_string(dir.join(NETWORK_FILE))
            .map_err(|e| ModelError::load_bundle(dir.display().to_string(), e.to_string()))?;
        let shape: NetworkShape = serde_json::from_str(&network)?;

        if shape.num_classes != num_classes {
            return Err(ModelError::incompatible_bundle(
                format!("{num_classes} classes"),
                format!("{} classes", shape.num_classes),
            ));
        }
        if shape.input_dim != self.geometry.buffer_len() {
            return Err(ModelError::incompatible_bundle(
                format!("input dim {}", self.geometry.buffer_len()),
                format!("input dim {}", shape.input_dim),
            ));
        }

        let device = <InferenceBackend as Backend>::Device::default();
        let recorder = BinFileRecorder::<FullPrecisionSettings>::new();
        let model = SoftmaxModel::<InferenceBackend>::new(shape, &device)
            .load_file(dir.join(WEIGHTS_FILE), &recorder, &device)
            .map_err(|e| ModelError::load_bundle(dir.display().to_string(), e.to_string()))?;

        Ok(FittedSoftmax { model, shape })
    }
}
