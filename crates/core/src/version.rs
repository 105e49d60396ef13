//! Record versioning for optimistic concurrency.

use crate::error::{DomainError, DomainResult};

/// A record carrying a store-assigned revision.
///
/// The revision is the optimistic-concurrency token: stores bump it on every
/// write, and a compare-and-swap write only succeeds when the caller's copy
/// still carries the stored revision.
pub trait Versioned {
    /// Revision of the snapshot as last read from the store.
    fn version(&self) -> u64;
}

/// Optimistic concurrency expectation for a record write.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking (last write wins).
    Any,
    /// Require the stored record to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    pub fn check(self, actual: u64) -> DomainResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!(
                "optimistic concurrency check failed (expected: {self:?}, actual: {actual})"
            )))
        }
    }
}
