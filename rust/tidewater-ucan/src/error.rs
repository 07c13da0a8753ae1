use crate::crypto::KeyType;
use thiserror::Error;

/// Structural failures raised by the token and identifier codecs.
///
/// Semantic invalidity — a signature that does not verify, a broken
/// delegation chain, an expired window — is never an error; those
/// outcomes are ordinary values (see [`crate::chain::Validation`]).
#[derive(Error, Debug)]
pub enum UcanError {
    #[error("No registered support for key algorithm '{0}'")]
    UnsupportedAlgorithm(KeyType),

    #[error("Malformed identifier: {0}")]
    MalformedIdentifier(String),

    #[error("Malformed token at proof depth {depth}: {reason}")]
    MalformedToken { depth: usize, reason: String },

    #[error("Could not serialize token: {0}")]
    Serialization(#[from] serde_json::Error),
}
