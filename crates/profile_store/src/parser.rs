//! Record parsing
//!
//! Supports JSON (the historical calibration format) and TOML.

use contracts::{CalibrationProfile, ContractError};

/// Calibration record format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    /// JSON format (historical default)
    Json,
    /// TOML format
    Toml,
}

impl RecordFormat {
    /// Infer the format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Parse a JSON calibration record
pub fn parse_json(content: &str) -> Result<CalibrationProfile, ContractError> {
    serde_json::from_str(content).map_err(|e| ContractError::PersistenceParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse a TOML calibration record
pub fn parse_toml(content: &str) -> Result<CalibrationProfile, ContractError> {
    toml::from_str(content).map_err(|e| ContractError::PersistenceParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse a record in the given format
pub fn parse(content: &str, format: RecordFormat) -> Result<CalibrationProfile, ContractError> {
    match format {
        RecordFormat::Json => parse_json(content),
        RecordFormat::Toml => parse_toml(content),
    }
}
