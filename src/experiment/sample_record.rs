//! Row Record - one sample as edited in the batch grid

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{
    AnalysisMethod, BiologicalReplicate, ExperimentalGroup, OntologyAxis, OntologyTerm,
    SampleCode, SampleId,
};

/// Row Record: the editable state of one sample.
///
/// Every field may be unset while a row is under construction. Rows without
/// a `sample_id` are new; rows with one mirror a persisted sample.
///
/// Equality compares every field except `sample_id`. Use
/// [`RowRecord::same_content`] to also ignore the display code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RowRecord {
    sample_id: Option<SampleId>,
    sample_code: Option<SampleCode>,
    analysis_method: Option<AnalysisMethod>,
    sample_name: Option<String>,
    biological_replicate: Option<BiologicalReplicate>,
    experimental_group: Option<Arc<ExperimentalGroup>>,
    species: Option<OntologyTerm>,
    specimen: Option<OntologyTerm>,
    analyte: Option<OntologyTerm>,
    comment: Option<String>,
}

impl RowRecord {
    /// Create an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder.
    #[must_use]
    pub fn builder() -> RowRecordBuilder {
        RowRecordBuilder::default()
    }

    /// Get the persisted identity, if any.
    #[must_use]
    pub const fn sample_id(&self) -> Option<&SampleId> {
        self.sample_id.as_ref()
    }

    /// Get the display code, if any.
    #[must_use]
    pub const fn sample_code(&self) -> Option<&SampleCode> {
        self.sample_code.as_ref()
    }

    /// Get the analysis method.
    #[must_use]
    pub const fn analysis_method(&self) -> Option<AnalysisMethod> {
        self.analysis_method
    }

    /// Get the sample name (the user's label).
    #[must_use]
    pub fn sample_name(&self) -> Option<&str> {
        self.sample_name.as_deref()
    }

    /// Get the biological replicate.
    #[must_use]
    pub const fn biological_replicate(&self) -> Option<&BiologicalReplicate> {
        self.biological_replicate.as_ref()
    }

    /// Get the experimental group.
    #[must_use]
    pub fn experimental_group(&self) -> Option<&Arc<ExperimentalGroup>> {
        self.experimental_group.as_ref()
    }

    /// Get the species.
    #[must_use]
    pub const fn species(&self) -> Option<&OntologyTerm> {
        self.species.as_ref()
    }

    /// Get the specimen.
    #[must_use]
    pub const fn specimen(&self) -> Option<&OntologyTerm> {
        self.specimen.as_ref()
    }

    /// Get the analyte.
    #[must_use]
    pub const fn analyte(&self) -> Option<&OntologyTerm> {
        self.analyte.as_ref()
    }

    /// Get the term set on an ontology axis.
    #[must_use]
    pub const fn term(&self, axis: OntologyAxis) -> Option<&OntologyTerm> {
        match axis {
            OntologyAxis::Species => self.species.as_ref(),
            OntologyAxis::Specimen => self.specimen.as_ref(),
            OntologyAxis::Analyte => self.analyte.as_ref(),
        }
    }

    /// Get the customer comment.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Whether this row mirrors a persisted sample.
    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        self.sample_id.is_some()
    }

    /// Compare everything except identity and display code.
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        self.analysis_method == other.analysis_method
            && self.sample_name == other.sample_name
            && self.biological_replicate == other.biological_replicate
            && self.experimental_group == other.experimental_group
            && self.species == other.species
            && self.specimen == other.specimen
            && self.analyte == other.analyte
            && self.comment == other.comment
    }

    /// Set the analysis method.
    pub fn set_analysis_method(&mut self, method: Option<AnalysisMethod>) {
        self.analysis_method = method;
    }

    /// Set the sample name.
    pub fn set_sample_name(&mut self, name: Option<String>) {
        self.sample_name = name;
    }

    /// Set the biological replicate.
    pub fn set_biological_replicate(&mut self, replicate: Option<BiologicalReplicate>) {
        self.biological_replicate = replicate;
    }

    /// Set the experimental group.
    pub fn set_experimental_group(&mut self, group: Option<Arc<ExperimentalGroup>>) {
        self.experimental_group = group;
    }

    /// Set the term on an ontology axis.
    pub fn set_term(&mut self, axis: OntologyAxis, term: Option<OntologyTerm>) {
        match axis {
            OntologyAxis::Species => self.species = term,
            OntologyAxis::Specimen => self.specimen = term,
            OntologyAxis::Analyte => self.analyte = term,
        }
    }

    /// Set the customer comment.
    pub fn set_comment(&mut self, comment: Option<String>) {
        self.comment = comment;
    }
}

impl PartialEq for RowRecord {
    fn eq(&self, other: &Self) -> bool {
        self.sample_code == other.sample_code && self.same_content(other)
    }
}

impl Eq for RowRecord {}

/// Builder for `RowRecord`.
#[derive(Debug, Default)]
pub struct RowRecordBuilder {
    record: RowRecord,
}

impl RowRecordBuilder {
    /// Set the persisted identity.
    #[must_use]
    pub fn sample_id(mut self, id: SampleId) -> Self {
        self.record.sample_id = Some(id);
        self
    }

    /// Set the display code.
    #[must_use]
    pub fn sample_code(mut self, code: SampleCode) -> Self {
        self.record.sample_code = Some(code);
        self
    }

    /// Set the analysis method.
    #[must_use]
    pub const fn analysis_method(mut self, method: AnalysisMethod) -> Self {
        self.record.analysis_method = Some(method);
        self
    }

    /// Set the sample name.
    #[must_use]
    pub fn sample_name(mut self, name: impl Into<String>) -> Self {
        self.record.sample_name = Some(name.into());
        self
    }

    /// Set the biological replicate.
    #[must_use]
    pub fn biological_replicate(mut self, replicate: BiologicalReplicate) -> Self {
        self.record.biological_replicate = Some(replicate);
        self
    }

    /// Set the experimental group.
    #[must_use]
    pub fn experimental_group(mut self, group: Arc<ExperimentalGroup>) -> Self {
        self.record.experimental_group = Some(group);
        self
    }

    /// Set the species.
    #[must_use]
    pub fn species(mut self, term: OntologyTerm) -> Self {
        self.record.species = Some(term);
        self
    }

    /// Set the specimen.
    #[must_use]
    pub fn specimen(mut self, term: OntologyTerm) -> Self {
        self.record.specimen = Some(term);
        self
    }

    /// Set the analyte.
    #[must_use]
    pub fn analyte(mut self, term: OntologyTerm) -> Self {
        self.record.analyte = Some(term);
        self
    }

    /// Set the customer comment.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.record.comment = Some(comment.into());
        self
    }

    /// Build the `RowRecord`.
    #[must_use]
    pub fn build(self) -> RowRecord {
        self.record
    }
}
