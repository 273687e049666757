//! Model inference for nutrient predictions

use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;

use crate::model::Regressor;
use crate::{NpkError, NutrientPrediction, Result, SoilConditions, FEATURE_ORDER};

/// Reported when fewer or more than four values are given
pub const ARGUMENT_COUNT_ERROR: &str =
    "Four parameters required: temperature, humidity, ph, rainfall";

/// Reported when a value does not parse as a number
pub const INVALID_INPUT_ERROR: &str = "Invalid input values";

/// Result printed by the command-line tool
///
/// Serializes either as `{"nitrogen": .., "phosphorus": .., "potassium": ..}`
/// or as `{"error": ".."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictionOutcome {
    Nutrients(NutrientPrediction),
    Error { error: String },
}

impl PredictionOutcome {
    pub fn error(message: impl Into<String>) -> Self {
        PredictionOutcome::Error {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, PredictionOutcome::Error { .. })
    }

    /// Single-line JSON rendering with `", "` and `": "` separators
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
        self.serialize(&mut serializer)?;
        String::from_utf8(buf).map_err(|e| io::Error::other(e).into())
    }
}

/// Compact single-line output with a space after every `,` and `:`
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Predictor for nutrient levels
pub struct Predictor<M> {
    model: M,
}

impl<M: Regressor> Predictor<M> {
    /// Create a new predictor
    pub fn new(model: M) -> Self {
        Predictor { model }
    }

    /// Predict from raw text values
    ///
    /// Unparseable values are reported as an error outcome rather than an
    /// `Err`; model failures are returned as `Err`.
    pub fn predict(
        &self,
        temperature: &str,
        humidity: &str,
        ph: &str,
        rainfall: &str,
    ) -> Result<PredictionOutcome> {
        let Some(conditions) = SoilConditions::parse(temperature, humidity, ph, rainfall) else {
            log::debug!(
                "Rejected input: temperature={:?} humidity={:?} ph={:?} rainfall={:?}",
                temperature,
                humidity,
                ph,
                rainfall
            );
            return Ok(PredictionOutcome::error(INVALID_INPUT_ERROR));
        };

        self.predict_conditions(&conditions)
            .map(PredictionOutcome::Nutrients)
    }

    /// Predict nutrient levels for parsed readings
    pub fn predict_conditions(&self, conditions: &SoilConditions) -> Result<NutrientPrediction> {
        let features = conditions.to_features();
        log::debug!("Features {:?}: {:?}", FEATURE_ORDER, features);

        let rows = self.model.predict(&[features])?;
        let first = rows
            .first()
            .ok_or_else(|| NpkError::Prediction("model returned no output rows".to_string()))?;
        log::debug!("Model output: {:?}", first);

        NutrientPrediction::from_row(first)
    }

    /// Get the underlying model
    pub fn model(&self) -> &M {
        &self.model
    }
}
