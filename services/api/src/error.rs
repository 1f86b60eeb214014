//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service.

use crate::config::ConfigError;
use crate::pdf::PdfError;
use ancient_eats_core::ports::{PaymentError, SessionError, StorageError};

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from the session state layer.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Represents an error from the durable state store.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Represents an error from the payment bridge.
    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    /// Represents a failure while assembling a promo document.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
