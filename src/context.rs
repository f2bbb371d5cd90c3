//! Batch Context - the reference data a batch is edited against

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::canonical;
use crate::experiment::{ExperimentId, ExperimentalGroup, OntologyAxis, OntologyTerm};

/// Experimental groups and ontology candidates of one experiment.
///
/// Drop-down options of the grid and prefill input both come from here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchContext {
    experiment_id: ExperimentId,
    groups: Vec<Arc<ExperimentalGroup>>,
    species: Vec<OntologyTerm>,
    specimens: Vec<OntologyTerm>,
    analytes: Vec<OntologyTerm>,
}

impl BatchContext {
    /// Create a context with no ontology candidates.
    #[must_use]
    pub fn new(experiment_id: ExperimentId, groups: Vec<Arc<ExperimentalGroup>>) -> Self {
        Self {
            experiment_id,
            groups,
            species: Vec::new(),
            specimens: Vec::new(),
            analytes: Vec::new(),
        }
    }

    /// Set the candidates of one ontology axis.
    #[must_use]
    pub fn with_terms(mut self, axis: OntologyAxis, terms: Vec<OntologyTerm>) -> Self {
        match axis {
            OntologyAxis::Species => self.species = terms,
            OntologyAxis::Specimen => self.specimens = terms,
            OntologyAxis::Analyte => self.analytes = terms,
        }
        self
    }

    /// Get the experiment ID.
    #[must_use]
    pub const fn experiment_id(&self) -> &ExperimentId {
        &self.experiment_id
    }

    /// Get the experimental groups.
    #[must_use]
    pub fn groups(&self) -> &[Arc<ExperimentalGroup>] {
        &self.groups
    }

    /// Get the candidates of one ontology axis.
    #[must_use]
    pub fn terms(&self, axis: OntologyAxis) -> &[OntologyTerm] {
        match axis {
            OntologyAxis::Species => &self.species,
            OntologyAxis::Specimen => &self.specimens,
            OntologyAxis::Analyte => &self.analytes,
        }
    }

    /// Canonical condition strings in group order.
    #[must_use]
    pub fn condition_options(&self) -> Vec<String> {
        self.groups
            .iter()
            .map(|group| canonical::format(group.condition()))
            .collect()
    }

    /// Accepted cell texts for an ontology axis: each label and its
    /// `"label [CURIE]"` form. A label shared by several candidates is only
    /// offered in the display form.
    #[must_use]
    pub fn term_options(&self, axis: OntologyAxis) -> Vec<String> {
        self.terms(axis)
            .iter()
            .flat_map(|term| {
                let display = term.to_string();
                if display == term.label() || self.label_is_shared(axis, term.label()) {
                    vec![display]
                } else {
                    vec![term.label().to_string(), display]
                }
            })
            .collect()
    }

    /// Cell text identifying `term` among the candidates of `axis`: the label,
    /// or the display form when the label alone is ambiguous.
    #[must_use]
    pub fn term_text(&self, axis: OntologyAxis, term: &OntologyTerm) -> String {
        if self.label_is_shared(axis, term.label()) {
            term.to_string()
        } else {
            term.label().to_string()
        }
    }

    fn label_is_shared(&self, axis: OntologyAxis, label: &str) -> bool {
        self.terms(axis)
            .iter()
            .filter(|term| term.label() == label)
            .nth(1)
            .is_some()
    }
}
