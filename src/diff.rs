//! Batch Diff Engine
//!
//! Compares the rows of a batch as loaded with the rows as edited and splits
//! the edit into samples to register, samples to update and samples to
//! delete. Identity is the persisted [`SampleId`]; content comparison ignores
//! identity and the display code.
//!
//! ```rust
//! use batchgrid::diff::diff;
//! use batchgrid::experiment::{RowRecord, SampleId};
//!
//! let original = vec![RowRecord::builder().sample_id(SampleId::new("s1")).sample_name("a").build()];
//! let mut edited = original.clone();
//! edited.push(RowRecord::builder().sample_name("b").build());
//!
//! let diff = diff(&original, &edited);
//! assert_eq!(diff.added().len(), 1);
//! assert!(diff.changed().is_empty());
//! assert!(diff.removed().is_empty());
//! ```

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::experiment::{RowRecord, SampleId};

/// Added, changed and removed rows of one edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diff {
    added: Vec<RowRecord>,
    changed: Vec<RowRecord>,
    removed: Vec<SampleId>,
}

impl Diff {
    /// New rows, without identity, in edit order.
    #[must_use]
    pub fn added(&self) -> &[RowRecord] {
        &self.added
    }

    /// Persisted rows whose content changed, in edit order.
    #[must_use]
    pub fn changed(&self) -> &[RowRecord] {
        &self.changed
    }

    /// Identities of persisted rows no longer present, in original order.
    #[must_use]
    pub fn removed(&self) -> &[SampleId] {
        &self.removed
    }

    /// Whether the edit changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.changed.is_empty() && self.removed.is_empty()
    }

    /// Split into `(added, changed, removed)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<RowRecord>, Vec<RowRecord>, Vec<SampleId>) {
        (self.added, self.changed, self.removed)
    }
}

/// Compute the diff between `original` and `edited`. Never fails.
///
/// Edited rows carrying an identity the original does not know are dropped.
#[must_use]
pub fn diff(original: &[RowRecord], edited: &[RowRecord]) -> Diff {
    let by_id: FxHashMap<&SampleId, &RowRecord> = original
        .iter()
        .filter_map(|row| row.sample_id().map(|id| (id, row)))
        .collect();
    let edited_ids: FxHashSet<&SampleId> = edited.iter().filter_map(RowRecord::sample_id).collect();

    let mut result = Diff::default();
    for row in edited {
        let Some(id) = row.sample_id() else {
            result.added.push(row.clone());
            continue;
        };
        match by_id.get(id) {
            Some(before) if before.same_content(row) => {}
            Some(_) => result.changed.push(row.clone()),
            None => warn!(sample_id = %id, "edited row has an unknown sample id, ignoring it"),
        }
    }
    result.removed = original
        .iter()
        .filter_map(RowRecord::sample_id)
        .filter(|id| !edited_ids.contains(id))
        .cloned()
        .collect();

    debug!(
        added = result.added.len(),
        changed = result.changed.len(),
        removed = result.removed.len(),
        "computed batch diff"
    );
    result
}
