//! # Profile Store
//!
//! Calibration profile persistence.
//!
//! Responsibilities:
//! - Serialize a [`CalibrationProfile`] to a versioned JSON/TOML record
//! - Parse records back, tolerating unknown extra fields
//! - Validate profile invariants so callers never receive an invalid profile
//!
//! Round-trip guarantee: for every valid profile `P`,
//! `load(save(P)) == P` bit-exactly.
//!
//! # Example
//!
//! ```no_run
//! use contracts::CalibrationProfile;
//! use profile_store::ProfileStore;
//! use std::path::Path;
//!
//! let profile = CalibrationProfile::defaults();
//! ProfileStore::save(&profile, Path::new("calibration.json")).unwrap();
//! let reloaded = ProfileStore::load(Path::new("calibration.json")).unwrap();
//! assert_eq!(profile, reloaded);
//! ```

mod parser;

pub use parser::RecordFormat;

use contracts::{CalibrationProfile, ContractError};
use std::path::Path;

/// Profile persistence front end
///
/// Provides static methods to save/load profiles from files or strings.
pub struct ProfileStore;

impl ProfileStore {
    /// Load a profile from a file path
    ///
    /// Detects the format from the file extension (.json / .toml).
    ///
    /// # Errors
    /// - [`ContractError::PersistenceIo`] when the path is unreadable
    /// - [`ContractError::PersistenceParse`] when the record is malformed,
    ///   misses a required field, carries an unknown version, or violates a
    ///   profile invariant
    pub fn load(path: &Path) -> Result<CalibrationProfile, ContractError> {
        let format = Self::detect_format(path)?;
        let content = std::fs::read_to_string(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load a profile from a string
    ///
    /// # Errors
    /// Parse or invariant-validation failure, as [`ProfileStore::load`].
    pub fn load_from_str(
        content: &str,
        format: RecordFormat,
    ) -> Result<CalibrationProfile, ContractError> {
        let profile = parser::parse(content, format)?;
        profile.validate().map_err(|e| ContractError::PersistenceParse {
            message: format!("record violates a profile invariant: {e}"),
            source: Some(Box::new(e)),
        })?;
        Ok(profile)
    }

    /// Save a profile to a file path, format detected from the extension
    ///
    /// # Errors
    /// - [`ContractError::PersistenceParse`] when the extension is unsupported
    /// - [`ContractError::PersistenceIo`] when the file cannot be written
    pub fn save(profile: &CalibrationProfile, path: &Path) -> Result<(), ContractError> {
        let format = Self::detect_format(path)?;
        let content = match format {
            RecordFormat::Json => Self::to_json(profile)?,
            RecordFormat::Toml => Self::to_toml(profile)?,
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Serialize a profile to a pretty JSON record
    pub fn to_json(profile: &CalibrationProfile) -> Result<String, ContractError> {
        serde_json::to_string_pretty(profile)
            .map_err(|e| ContractError::persistence_parse(format!("JSON serialize error: {e}")))
    }

    /// Serialize a profile to a TOML record
    pub fn to_toml(profile: &CalibrationProfile) -> Result<String, ContractError> {
        toml::to_string_pretty(profile)
            .map_err(|e| ContractError::persistence_parse(format!("TOML serialize error: {e}")))
    }
}

impl ProfileStore {
    /// Infer the record format from a file extension
    fn detect_format(path: &Path) -> Result<RecordFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::persistence_parse("cannot determine record format from extension")
        })?;

        RecordFormat::from_extension(ext).ok_or_else(|| {
            ContractError::persistence_parse(format!("unsupported record format: .{ext}"))
        })
    }
}
