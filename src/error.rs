//! Error reporting for the evictkit library.
//!
//! Almost nothing in this crate can fail: a missing key is an ordinary
//! `None`, and a zero-capacity engine silently drops writes. The two
//! failure classes that remain share one type, [`CacheError`], tagged with
//! an [`ErrorKind`]:
//!
//! - [`ErrorKind::InvalidConfig`]: a fallible constructor rejected its
//!   parameters (for example an LFU aging threshold of 0, which would make
//!   the decay step a no-op while still rebuilding the bucket index on
//!   every access).
//! - [`ErrorKind::BrokenInvariant`]: a diagnostic `check_invariants` walk
//!   found the engine's bookkeeping out of sync. These methods exist for
//!   tests and debugging; under correct use they never fire.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::error::ErrorKind;
//! use evictkit::policy::lfu::LfuCache;
//!
//! let err = LfuCache::<u64, u64>::try_with_max_average(100, 0).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::InvalidConfig);
//! assert!(err.to_string().contains("max_average"));
//! ```

use std::fmt;

/// Classifies a [`CacheError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A constructor was handed parameters it cannot build a cache from.
    InvalidConfig,
    /// A diagnostic check found internal bookkeeping out of sync.
    BrokenInvariant,
}

impl ErrorKind {
    fn label(self) -> &'static str {
        match self {
            ErrorKind::InvalidConfig => "invalid configuration",
            ErrorKind::BrokenInvariant => "broken invariant",
        }
    }
}

/// Error raised by fallible constructors and diagnostic checks.
///
/// Carries a [`kind`](CacheError::kind) for programmatic matching and a
/// [`detail`](CacheError::detail) string naming the offending parameter or
/// the bookkeeping that diverged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheError {
    kind: ErrorKind,
    detail: String,
}

impl CacheError {
    /// Builds an [`ErrorKind::InvalidConfig`] error.
    pub fn config(detail: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidConfig,
            detail: detail.into(),
        }
    }

    /// Builds an [`ErrorKind::BrokenInvariant`] error.
    pub fn invariant(detail: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::BrokenInvariant,
            detail: detail.into(),
        }
    }

    /// Returns which failure class this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the description of what was rejected or found broken.
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.label(), self.detail)
    }
}

impl std::error::Error for CacheError {}
