//! Error types for the proxy engine
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Generation-time failures (`UnsupportedContract`, `Generation`) are
//! permanent: nothing retries them and no cache entry is ever created for a
//! failed contract. `HandlerInvocation` is raised after the write committed.

use std::io;
use thiserror::Error;

/// Result type alias for proxy operations
pub type ProxyResult<T> = std::result::Result<T, ProxyError>;

/// Error a change handler may return to abort dispatch.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type returned by change handlers
pub type HandlerResult = std::result::Result<(), HandlerError>;

/// Error types for the proxy engine
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The contract has no usable or synthesizable notification carrier
    #[error("Unsupported contract {contract}: {reason}")]
    UnsupportedContract {
        /// Contract name
        contract: String,
        /// Why the contract was rejected
        reason: String,
    },

    /// Type synthesis failed
    #[error("Failed to synthesize proxy for {contract}: {reason}")]
    Generation {
        /// Contract name
        contract: String,
        /// Why synthesis failed
        reason: String,
    },

    /// A change handler failed; the write had already been applied
    #[error("Change handler failed for property '{property}': {source}")]
    HandlerInvocation {
        /// Property whose write triggered the dispatch
        property: String,
        /// The handler's own error
        #[source]
        source: HandlerError,
    },

    /// No property with this name on the proxy
    #[error("Unknown property '{0}'")]
    UnknownProperty(String),

    /// Property has no getter
    #[error("Property '{0}' is not readable")]
    NotReadable(String),

    /// Property has no setter
    #[error("Property '{0}' is not writable")]
    NotWritable(String),

    /// No event carrier with this name on the proxy
    #[error("Unknown event '{0}'")]
    UnknownEvent(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error while loading configuration
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ProxyError {
    /// Build an `UnsupportedContract` error
    pub fn unsupported(contract: impl Into<String>, reason: impl Into<String>) -> Self {
        ProxyError::UnsupportedContract {
            contract: contract.into(),
            reason: reason.into(),
        }
    }

    /// Build a `Generation` error
    pub fn generation(contract: impl Into<String>, reason: impl Into<String>) -> Self {
        ProxyError::Generation {
            contract: contract.into(),
            reason: reason.into(),
        }
    }

    /// True for failures raised while introspecting or synthesizing a type.
    pub fn is_generation_time(&self) -> bool {
        matches!(
            self,
            ProxyError::UnsupportedContract { .. } | ProxyError::Generation { .. }
        )
    }
}
