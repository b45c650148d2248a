//! Descriptor construction errors.
//!
//! Building a descriptor can fail in exactly one way: a required input was
//! absent or malformed. That is a programmer error in the producer, so it is
//! reported immediately and never defaulted.

use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Result alias for descriptor construction.
pub type Result<T> = std::result::Result<T, DescriptorError>;

/// Error raised while constructing a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("invalid argument `{argument}`: {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
    },
}

impl DescriptorError {
    /// A required argument was not supplied.
    pub fn missing(argument: &'static str) -> Self {
        DescriptorError::InvalidArgument {
            argument,
            reason: "value is required".to_string(),
        }
    }

    /// An argument was supplied but is not acceptable.
    pub fn invalid(argument: &'static str, reason: impl Into<String>) -> Self {
        DescriptorError::InvalidArgument {
            argument,
            reason: reason.into(),
        }
    }

    /// Name of the offending argument.
    pub fn argument(&self) -> &'static str {
        match self {
            DescriptorError::InvalidArgument { argument, .. } => argument,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            DescriptorError::InvalidArgument { argument, reason } => {
                Diagnostic::error(format!("invalid descriptor argument `{}`", argument))
                    .with_context(reason.clone())
                    .with_suggestion(format!(
                        "Check the declaration that supplies `{}`",
                        argument
                    ))
            }
        }
    }
}
