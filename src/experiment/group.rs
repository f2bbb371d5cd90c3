//! Experimental groups and their biological replicates

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Condition;
use crate::{Error, Result};

/// Opaque identifier of an experimental group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub u64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group-{}", self.0)
    }
}

/// Opaque identifier of a biological replicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReplicateId(pub u64);

impl fmt::Display for ReplicateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "replicate-{}", self.0)
    }
}

/// One biological repetition unit within an experimental group.
///
/// The label is unique inside its owning group only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BiologicalReplicate {
    id: ReplicateId,
    label: String,
}

impl BiologicalReplicate {
    /// Create a replicate.
    #[must_use]
    pub fn new(id: ReplicateId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }

    /// Get the replicate ID.
    #[must_use]
    pub const fn id(&self) -> ReplicateId {
        self.id
    }

    /// Get the replicate label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Experimental Group: a bucket of biological replicates sharing one condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentalGroup {
    id: GroupId,
    name: Option<String>,
    condition: Condition,
    biological_replicates: Vec<BiologicalReplicate>,
    sample_size: u32,
}

impl ExperimentalGroup {
    /// Create a group; the sample size defaults to the replicate count.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the group has no replicates or two
    /// replicates share a label.
    pub fn new(
        id: GroupId,
        condition: Condition,
        biological_replicates: Vec<BiologicalReplicate>,
    ) -> Result<Self> {
        Self::builder(id, condition)
            .biological_replicates(biological_replicates)
            .build()
    }

    /// Create a builder for constructing a group with optional fields.
    #[must_use]
    pub fn builder(id: GroupId, condition: Condition) -> ExperimentalGroupBuilder {
        ExperimentalGroupBuilder::new(id, condition)
    }

    /// Get the group ID.
    #[must_use]
    pub const fn id(&self) -> GroupId {
        self.id
    }

    /// Get the display name, if one was given.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Get the condition.
    #[must_use]
    pub const fn condition(&self) -> &Condition {
        &self.condition
    }

    /// Get the biological replicates in their defined order.
    #[must_use]
    pub fn biological_replicates(&self) -> &[BiologicalReplicate] {
        &self.biological_replicates
    }

    /// Get the planned sample size.
    #[must_use]
    pub const fn sample_size(&self) -> u32 {
        self.sample_size
    }

    /// Find a replicate of this group by label.
    #[must_use]
    pub fn replicate_by_label(&self, label: &str) -> Option<&BiologicalReplicate> {
        self.biological_replicates
            .iter()
            .find(|replicate| replicate.label == label)
    }
}

/// Builder for `ExperimentalGroup`.
#[derive(Debug)]
pub struct ExperimentalGroupBuilder {
    id: GroupId,
    name: Option<String>,
    condition: Condition,
    biological_replicates: Vec<BiologicalReplicate>,
    sample_size: Option<u32>,
}

impl ExperimentalGroupBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub const fn new(id: GroupId, condition: Condition) -> Self {
        Self {
            id,
            name: None,
            condition,
            biological_replicates: Vec::new(),
            sample_size: None,
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the replicates.
    #[must_use]
    pub fn biological_replicates(mut self, replicates: Vec<BiologicalReplicate>) -> Self {
        self.biological_replicates = replicates;
        self
    }

    /// Set an explicit sample size.
    #[must_use]
    pub const fn sample_size(mut self, sample_size: u32) -> Self {
        self.sample_size = Some(sample_size);
        self
    }

    /// Build the `ExperimentalGroup`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the sample size would be zero or two
    /// replicates share a label.
    pub fn build(self) -> Result<ExperimentalGroup> {
        for (i, replicate) in self.biological_replicates.iter().enumerate() {
            if self.biological_replicates[..i]
                .iter()
                .any(|seen| seen.label == replicate.label)
            {
                return Err(Error::InvalidInput(format!(
                    "replicate label '{}' used twice in {}",
                    replicate.label, self.id
                )));
            }
        }
        let replicate_count = u32::try_from(self.biological_replicates.len())
            .map_err(|_| Error::InvalidInput(format!("too many replicates in {}", self.id)))?;
        let sample_size = self.sample_size.unwrap_or(replicate_count);
        if sample_size == 0 {
            return Err(Error::InvalidInput(format!(
                "{} must have a sample size of at least 1",
                self.id
            )));
        }
        Ok(ExperimentalGroup {
            id: self.id,
            name: self.name,
            condition: self.condition,
            biological_replicates: self.biological_replicates,
            sample_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::{ExperimentalValue, VariableLevel};

    fn condition() -> Condition {
        Condition::new(vec![VariableLevel::new(
            "genotype",
            ExperimentalValue::new("wt"),
        )])
        .unwrap()
    }

    #[test]
    fn test_group_sample_size_defaults_to_replicates() {
        let group = ExperimentalGroup::new(
            GroupId(1),
            condition(),
            vec![
                BiologicalReplicate::new(ReplicateId(1), "R1"),
                BiologicalReplicate::new(ReplicateId(2), "R2"),
            ],
        )
        .unwrap();
        assert_eq!(group.sample_size(), 2);
        assert_eq!(group.replicate_by_label("R2").unwrap().id(), ReplicateId(2));
    }

    #[test]
    fn test_group_rejects_empty_sample_size() {
        let result = ExperimentalGroup::new(GroupId(1), condition(), vec![]);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_group_rejects_duplicate_replicate_label() {
        let result = ExperimentalGroup::new(
            GroupId(1),
            condition(),
            vec![
                BiologicalReplicate::new(ReplicateId(1), "R1"),
                BiologicalReplicate::new(ReplicateId(2), "R1"),
            ],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_group_builder_name() {
        let group = ExperimentalGroup::builder(GroupId(7), condition())
            .name("control")
            .sample_size(3)
            .build()
            .unwrap();
        assert_eq!(group.name(), Some("control"));
        assert_eq!(group.sample_size(), 3);
    }
}
