//! Validation Report - accumulated outcome of validating many entries

use std::iter::Sum;

use serde::{Deserialize, Serialize};

/// Counts of validated entries plus collected warnings and failures.
///
/// Reports form a monoid under [`ValidationReport::combine`]: the operation is
/// associative and [`ValidationReport::new`] is its identity. Partial reports
/// from parallel chunks can therefore be merged in any grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    validated_entries: usize,
    warnings: Vec<String>,
    failures: Vec<String>,
}

impl ValidationReport {
    /// The empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            validated_entries: 0,
            warnings: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Report for `count` entries that passed.
    #[must_use]
    pub const fn passed(count: usize) -> Self {
        Self {
            validated_entries: count,
            warnings: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Report carrying one failure.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            validated_entries: 0,
            warnings: Vec::new(),
            failures: vec![message.into()],
        }
    }

    /// Report carrying one warning.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            validated_entries: 0,
            warnings: vec![message.into()],
            failures: Vec::new(),
        }
    }

    /// Merge two reports: counts add, messages concatenate in order.
    #[must_use]
    pub fn combine(mut self, other: Self) -> Self {
        self.validated_entries += other.validated_entries;
        self.warnings.extend(other.warnings);
        self.failures.extend(other.failures);
        self
    }

    /// Record one passed entry.
    pub fn add_passed(&mut self) {
        self.validated_entries += 1;
    }

    /// Record a failure.
    pub fn add_failure(&mut self, message: impl Into<String>) {
        self.failures.push(message.into());
    }

    /// Record a warning.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Number of entries that passed.
    #[must_use]
    pub const fn validated_entries(&self) -> usize {
        self.validated_entries
    }

    /// Collected warnings; never block submission.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Collected failures.
    #[must_use]
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// Whether there are no failures.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    /// Whether there are warnings.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl Sum for ValidationReport {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::new(), Self::combine)
    }
}
