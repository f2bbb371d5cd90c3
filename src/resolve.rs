//! Reference resolution for raw grid cells
//!
//! Every lookup is total: a cell value either resolves to exactly one domain
//! object, matches several ([`Resolution::Ambiguous`]) or matches none
//! ([`Resolution::Unresolved`]). Blank input is always unresolved. Callers turn
//! the non-resolved outcomes into validation verdicts.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::canonical;
use crate::experiment::{
    extract_curie, AnalysisMethod, BiologicalReplicate, ExperimentalGroup, OntologyTerm,
};

/// Outcome of resolving one raw cell value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    /// Exactly one match
    Resolved(T),
    /// More than one candidate matched
    Ambiguous,
    /// Blank input, or no candidate matched
    Unresolved,
}

impl<T> Resolution<T> {
    /// Get the resolved value, dropping the failure kind.
    #[must_use]
    pub fn resolved(self) -> Option<T> {
        match self {
            Self::Resolved(value) => Some(value),
            Self::Ambiguous | Self::Unresolved => None,
        }
    }

    /// Whether a value was found.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Map the resolved value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolution<U> {
        match self {
            Self::Resolved(value) => Resolution::Resolved(f(value)),
            Self::Ambiguous => Resolution::Ambiguous,
            Self::Unresolved => Resolution::Unresolved,
        }
    }

    fn from_matches(mut matches: impl Iterator<Item = T>) -> Self {
        match (matches.next(), matches.next()) {
            (Some(value), None) => Self::Resolved(value),
            (Some(_), Some(_)) => Self::Ambiguous,
            (None, _) => Self::Unresolved,
        }
    }
}

/// How a replicate label is resolved when the row has no experimental group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplicatePolicy {
    /// Without a group the replicate stays unresolved.
    #[default]
    RequireGroup,
    /// Take the first replicate with that label in group order.
    ///
    /// May bind a replicate of the wrong group; every use is logged.
    FirstMatchAcrossGroups,
}

/// Resolve a canonical condition string to its experimental group.
#[must_use]
pub fn experimental_group(
    text: &str,
    groups: &[Arc<ExperimentalGroup>],
) -> Resolution<Arc<ExperimentalGroup>> {
    if text.trim().is_empty() {
        return Resolution::Unresolved;
    }
    let resolution = Resolution::from_matches(canonical::matching(text, groups).map(Arc::clone));
    match &resolution {
        Resolution::Resolved(group) => debug!(condition = text, group = %group.id(), "resolved group"),
        Resolution::Ambiguous => {
            warn!(condition = text, "condition matches more than one experimental group");
        }
        Resolution::Unresolved => debug!(condition = text, "no group for condition"),
    }
    resolution
}

/// Resolve a replicate label.
///
/// With a group, only that group's replicates are searched. Without one the
/// `policy` decides.
#[must_use]
pub fn biological_replicate(
    label: &str,
    group: Option<&ExperimentalGroup>,
    all_groups: &[Arc<ExperimentalGroup>],
    policy: ReplicatePolicy,
) -> Resolution<BiologicalReplicate> {
    if label.trim().is_empty() {
        return Resolution::Unresolved;
    }
    if let Some(group) = group {
        return group
            .replicate_by_label(label)
            .cloned()
            .map_or(Resolution::Unresolved, Resolution::Resolved);
    }
    match policy {
        ReplicatePolicy::RequireGroup => Resolution::Unresolved,
        ReplicatePolicy::FirstMatchAcrossGroups => {
            let found = all_groups
                .iter()
                .find_map(|g| g.replicate_by_label(label).map(|r| (g.id(), r.clone())));
            match found {
                Some((group_id, replicate)) => {
                    warn!(
                        replicate = label,
                        group = %group_id,
                        "replicate bound without a selected group"
                    );
                    Resolution::Resolved(replicate)
                }
                None => Resolution::Unresolved,
            }
        }
    }
}

/// Resolve an ontology term by exact label, or by CURIE when the text has the
/// `"label [CURIE]"` display form.
#[must_use]
pub fn ontology_term(text: &str, candidates: &[OntologyTerm]) -> Resolution<OntologyTerm> {
    let text = text.trim();
    if text.is_empty() {
        return Resolution::Unresolved;
    }
    let by_label =
        Resolution::from_matches(candidates.iter().filter(|term| term.label() == text).cloned());
    if !matches!(by_label, Resolution::Unresolved) {
        return by_label;
    }
    extract_curie(text).map_or(Resolution::Unresolved, |curie| {
        Resolution::from_matches(
            candidates
                .iter()
                .filter(|term| term.curie() == Some(curie.as_str()))
                .cloned(),
        )
    })
}

/// Resolve an analysis method by its exact label.
#[must_use]
pub fn analysis_method(text: &str) -> Resolution<AnalysisMethod> {
    AnalysisMethod::for_label(text).map_or(Resolution::Unresolved, Resolution::Resolved)
}
