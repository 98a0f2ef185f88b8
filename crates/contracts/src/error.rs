//! Layered error definitions
//!
//! Categorized by source: hardware / profile / persistence / sink / session

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Hardware Errors =====
    /// No physical depth device found - callers degrade to the synthetic source
    #[error("depth hardware unavailable for '{device}': {message}")]
    HardwareUnavailable { device: String, message: String },

    /// A second live source was requested for an already-claimed device.
    /// Fatal precondition violation; must be prevented, never recovered from.
    #[error("device '{device}' is already claimed by a live depth source")]
    HardwareExclusivity { device: String },

    // ===== Profile Errors =====
    /// A mutation or loaded record violates a profile invariant
    #[error("invalid profile field '{field}': {message}")]
    InvalidProfileField { field: String, message: String },

    // ===== Persistence Errors =====
    /// Profile record unreadable or unwritable
    #[error("profile io error: {0}")]
    PersistenceIo(#[from] std::io::Error),

    /// Profile record malformed, missing a required field, or wrong version
    #[error("profile parse error: {message}")]
    PersistenceParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ===== Sink Errors =====
    /// Sink publish error
    #[error("sink '{sink}' publish error: {message}")]
    SinkPublish { sink: String, message: String },

    // ===== Session Errors =====
    /// Invalid session transition or session-level failure
    #[error("session error: {message}")]
    Session { message: String },
}

impl ContractError {
    /// Create a hardware-unavailable error
    pub fn hardware_unavailable(device: impl Into<String>, message: impl Into<String>) -> Self {
        Self::HardwareUnavailable {
            device: device.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-profile-field error
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidProfileField {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a persistence parse error
    pub fn persistence_parse(message: impl Into<String>) -> Self {
        Self::PersistenceParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create a sink publish error
    pub fn sink_publish(sink: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkPublish {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Create a session error
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session {
            message: message.into(),
        }
    }
}
