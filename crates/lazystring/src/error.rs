//! Error types for tree resolution.

use thiserror::Error;

/// Errors surfaced while forcing a lazy string tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The fallback signal: a context producer declares that the context it
    /// was given is unusable and carries the literal text to substitute.
    /// Caught at the context-node boundary, where the carried text becomes
    /// the node's resolved value. Returned from a plain lazy producer it is
    /// an ordinary failure and propagates.
    #[error("insufficient context (fallback: {0:?})")]
    InsufficientContext(String),

    /// A leaf or context producer failed. The engine never catches this;
    /// it propagates unchanged to whoever forced the tree.
    #[error("producer error: {0}")]
    Producer(String),

    /// A context side transitively required the value of the node being
    /// resolved. Resolution aborts rather than recursing forever.
    #[error("cyclic context dependency")]
    CyclicContext,
}

/// Result alias for resolution operations.
pub type ResolveResult<T> = Result<T, ResolveError>;
