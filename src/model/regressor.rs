//! Multi-output regressor
//!
//! Architecture: Input(4) → [Linear → ReLU] × hidden_dims.len() → Linear(3)
//!
//! With no hidden layers this is ordinary multi-output linear regression.

use std::path::PathBuf;

use burn::module::Module;
use burn::nn::{Linear, LinearConfig};
use burn::record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder};
use burn::tensor::activation::relu;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use super::Regressor;
use crate::{ModelConfig, NpkError, Result, FEATURE_COUNT, NUTRIENT_COUNT};

/// Path burn writes a record to: the given path with an `.mpk` extension
pub fn record_file(path: &str) -> PathBuf {
    let mut file = PathBuf::from(path);
    file.set_extension("mpk");
    file
}

/// A single hidden layer block: Linear → ReLU
#[derive(Module, Debug)]
pub struct HiddenBlock<B: Backend> {
    linear: Linear<B>,
}

impl<B: Backend> HiddenBlock<B> {
    pub fn new(device: &B::Device, in_dim: usize, out_dim: usize) -> Self {
        HiddenBlock {
            linear: LinearConfig::new(in_dim, out_dim).init(device),
        }
    }

    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        relu(self.linear.forward(x))
    }
}

/// Regressor from [temperature, humidity, ph, rainfall] to [N, P, K]
#[derive(Module, Debug)]
pub struct NutrientRegressor<B: Backend> {
    hidden: Vec<HiddenBlock<B>>,
    head: Linear<B>,
}

impl<B: Backend> NutrientRegressor<B> {
    /// Create a freshly initialised model
    pub fn new(device: &B::Device, config: &ModelConfig) -> Self {
        let mut hidden = Vec::with_capacity(config.hidden_dims.len());
        let mut in_dim = FEATURE_COUNT;
        for &out_dim in &config.hidden_dims {
            hidden.push(HiddenBlock::new(device, in_dim, out_dim));
            in_dim = out_dim;
        }

        NutrientRegressor {
            hidden,
            head: LinearConfig::new(in_dim, NUTRIENT_COUNT).init(device),
        }
    }

    /// Forward pass: [batch, 4] → [batch, 3]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self
            .hidden
            .iter()
            .fold(features, |x, block| block.forward(x));
        self.head.forward(x)
    }

    /// Save model to file
    pub fn save(&self, path: &str) -> Result<()>
    where
        B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
        B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
    {
        let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        recorder
            .record(self.clone().into_record(), path.into())
            .map_err(|e| NpkError::Io(std::io::Error::other(e.to_string())))
    }

    /// Load model from file
    pub fn load(device: &B::Device, path: &str, config: &ModelConfig) -> Result<Self>
    where
        B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
        B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
    {
        let file = record_file(path);
        if !file.exists() {
            return Err(NpkError::NoModel(file.display().to_string()));
        }

        let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        let record = recorder
            .load(path.into(), device)
            .map_err(|e| NpkError::ModelLoad(format!("{}: {}", file.display(), e)))?;

        let model = Self::new(device, config);
        Ok(model.load_record(record))
    }
}

/// A loaded model bound to the device it runs on
pub struct ModelHandle<B: Backend> {
    model: NutrientRegressor<B>,
    device: B::Device,
}

impl<B: Backend> ModelHandle<B> {
    pub fn new(model: NutrientRegressor<B>, device: B::Device) -> Self {
        ModelHandle { model, device }
    }

    /// Load the model record at `path`
    pub fn load(path: &str, config: &ModelConfig, device: B::Device) -> Result<Self>
    where
        B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
        B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
    {
        let model = NutrientRegressor::load(&device, path, config)?;
        log::debug!("Loaded model from {}", record_file(path).display());
        Ok(Self::new(model, device))
    }
}

impl<B: Backend> Regressor for ModelHandle<B> {
    fn predict(&self, rows: &[[f32; FEATURE_COUNT]]) -> Result<Vec<Vec<f32>>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let flat: Vec<f32> = rows.iter().flatten().copied().collect();
        let input = Tensor::<B, 1>::from_floats(flat.as_slice(), &self.device)
            .reshape([rows.len(), FEATURE_COUNT]);

        let output = self.model.forward(input);
        let [_, cols] = output.dims();
        if cols == 0 {
            return Err(NpkError::Prediction("model produced no output columns".to_string()));
        }

        let values = output
            .into_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| NpkError::Prediction(format!("{:?}", e)))?;

        Ok(values.chunks(cols).map(<[f32]>::to_vec).collect())
    }
}
