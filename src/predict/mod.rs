//! Prediction and inference
//!
//! Parse raw readings, run the model and shape the printed result.

pub mod inference;

pub use inference::{PredictionOutcome, Predictor, ARGUMENT_COUNT_ERROR, INVALID_INPUT_ERROR};
