//! Nutrient regression model
//!
//! - `NutrientRegressor`: MLP (or plain linear) regressor from the four
//!   climate features to nitrogen, phosphorus and potassium
//! - `Regressor`: the prediction seam the predictor runs against

pub mod regressor;

pub use regressor::{ModelHandle, NutrientRegressor};

use crate::{Result, FEATURE_COUNT};

/// CPU backend used by the command-line tool
pub type InferenceBackend = burn::backend::NdArray<f32>;

/// Anything that maps rows of features to rows of outputs
pub trait Regressor {
    /// Predict one output row per input row
    fn predict(&self, rows: &[[f32; FEATURE_COUNT]]) -> Result<Vec<Vec<f32>>>;
}
