use thiserror::Error;
use tracing::error;

/// Error types for the compute module
#[derive(Error, Debug)]
pub enum ComputeError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A referenced record does not exist (or belongs to another organization)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Scenario settings outside the supported range
    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    /// Adjustment with an inconsistent month range
    #[error("Invalid adjustment: {0}")]
    InvalidAdjustment(String),

    /// Caller supplied arguments that cannot be served
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Error from decimal operations
    #[error("Decimal error: {0}")]
    Decimal(String),

    /// Error from the transaction source
    #[error("Transaction source error: {0}")]
    Source(String),

    /// Error from Polars DataFrame operations
    #[error("DataFrame error: {0}")]
    DataFrame(String),
}

// Implement From<polars::error::PolarsError> for ComputeError
impl From<polars::error::PolarsError> for ComputeError {
    fn from(error: polars::error::PolarsError) -> Self {
        let compute_error = match error {
            polars::error::PolarsError::ShapeMismatch(_) => {
                let err = ComputeError::DataFrame(format!("Shape mismatch: {}", error));
                error!(?err, "DataFrame error: Shape mismatch");
                err
            }
            polars::error::PolarsError::SchemaMismatch(_) => {
                let err = ComputeError::DataFrame(format!("Schema mismatch: {}", error));
                error!(?err, "DataFrame error: Schema mismatch");
                err
            }
            polars::error::PolarsError::IO { .. } => {
                let err = ComputeError::DataFrame(format!("IO error: {}", error));
                error!(?err, "DataFrame error: IO");
                err
            }
            _ => {
                let err = ComputeError::DataFrame(error.to_string());
                error!(?err, "DataFrame error");
                err
            }
        };
        compute_error
    }
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
