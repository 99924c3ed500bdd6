//! Error types for the dealer core.

use std::path::PathBuf;

/// A single business rule broken by a vehicle field.
///
/// Messages are written for end users; the CLI prints them as-is.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },

    #[error("Year must be between {min} and {max}, got {year}")]
    YearOutOfRange { year: i64, min: i32, max: i32 },

    #[error("Price must be a positive number, got {0}")]
    NonPositivePrice(f64),

    #[error("VIN must be 17 characters long, got {0}")]
    VinLength(usize),

    #[error("VIN may only contain letters and digits: '{0}'")]
    VinCharacters(String),
}

/// Errors surfaced by the inventory and sales manager.
#[derive(Debug, thiserror::Error)]
pub enum DealerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Car with VIN {0} already exists")]
    Duplicate(String),

    #[error("Car with VIN {0} not found")]
    NotFound(String),

    #[error("Could not access {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl DealerError {
    /// True when the failure came from the filesystem rather than the data.
    pub fn is_io(&self) -> bool {
        matches!(self, DealerError::Persistence { .. })
    }
}

pub type Result<T, E = DealerError> = std::result::Result<T, E>;
