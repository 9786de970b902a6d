//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They are
//! distinct from data-source and I/O errors.

/// Domain-level errors for journey construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Journey has no legs
    #[error("journey must have at least one leg")]
    EmptyJourney,

    /// Consecutive legs don't meet at the same stop
    #[error("leg ending at {ends_at} does not connect to leg starting at {starts_at}")]
    LegsNotContiguous { ends_at: String, starts_at: String },
}
