//! Soil nutrient prediction
//!
//! Loads a trained regression model and predicts nitrogen, phosphorus and
//! potassium levels from temperature, humidity, pH and rainfall readings.

pub mod model;
pub mod predict;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of input features the model expects
pub const FEATURE_COUNT: usize = 4;

/// Number of output columns mapped to nutrients
pub const NUTRIENT_COUNT: usize = 3;

/// Input feature order the model was trained on
pub const FEATURE_ORDER: [&str; FEATURE_COUNT] = ["temperature", "humidity", "ph", "rainfall"];

/// Climate and soil readings for a single location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoilConditions {
    pub temperature: f64,
    pub humidity: f64,
    pub ph: f64,
    pub rainfall: f64,
}

impl SoilConditions {
    /// Parse raw text values. Returns None if any value is not a number.
    ///
    /// No range checks are applied: negative rainfall or a pH of 40 are
    /// passed to the model as-is.
    pub fn parse(temperature: &str, humidity: &str, ph: &str, rainfall: &str) -> Option<Self> {
        Some(SoilConditions {
            temperature: parse_value(temperature)?,
            humidity: parse_value(humidity)?,
            ph: parse_value(ph)?,
            rainfall: parse_value(rainfall)?,
        })
    }

    /// Feature row in model order: [temperature, humidity, ph, rainfall]
    pub fn to_features(&self) -> [f32; FEATURE_COUNT] {
        [
            self.temperature as f32,
            self.humidity as f32,
            self.ph as f32,
            self.rainfall as f32,
        ]
    }
}

fn parse_value(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

/// Predicted nutrient levels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NutrientPrediction {
    pub nitrogen: f32,
    pub phosphorus: f32,
    pub potassium: f32,
}

impl NutrientPrediction {
    /// Take the first three columns of a model output row, unmodified
    pub fn from_row(row: &[f32]) -> Result<Self> {
        match row {
            [nitrogen, phosphorus, potassium, ..] => Ok(NutrientPrediction {
                nitrogen: *nitrogen,
                phosphorus: *phosphorus,
                potassium: *potassium,
            }),
            _ => Err(NpkError::Prediction(format!(
                "expected at least {} output columns, got {}",
                NUTRIENT_COUNT,
                row.len()
            ))),
        }
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum NpkError {
    #[error("Model file not found: {0}")]
    NoModel(String),

    #[error("Failed to load model: {0}")]
    ModelLoad(String),

    #[error("Prediction failed: {0}")]
    Prediction(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NpkError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: ModelConfig,
    pub data: DataConfig,
}

/// Regressor architecture; must match the saved model record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Hidden layer widths. Empty means plain linear regression.
    pub hidden_dims: Vec<usize>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            hidden_dims: vec![64, 32],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Model record path without extension (burn appends `.mpk`)
    pub model_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            model_path: "best_model".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NpkError::Config(format!("Failed to read config file {}: {}", path, e)))?;
        toml::from_str(&content)
            .map_err(|e| NpkError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| NpkError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
