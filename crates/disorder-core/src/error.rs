//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unknown tier: {0}")]
    UnknownTier(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised while turning raw input into sequences.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("Empty FASTA input")]
    EmptyInput,

    #[error("Sequence data found before header at line {0}")]
    DataBeforeHeader(usize),

    #[error("Sequence {0} has no sequence data")]
    MissingData(String),

    #[error("No valid sequences found in FASTA input")]
    NoSequences,

    #[error("Invalid amino acid characters: {0}")]
    InvalidResidues(String),

    #[error("Sequence contains no valid amino acids")]
    NoResidues,
}

/// API key repository errors.
#[derive(Debug, Error)]
pub enum ApiKeyError {
    #[error("Storage unavailable: {0}")]
    Storage(String),

    #[error("API key not found")]
    NotFound,
}
