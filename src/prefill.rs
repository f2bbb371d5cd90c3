//! Full-factorial prefill of a new batch
//!
//! One row per (experimental group, biological replicate). Ontology columns
//! are preset only when the experiment offers exactly one candidate.

use std::sync::Arc;

use tracing::debug;

use crate::context::BatchContext;
use crate::experiment::{ExperimentalGroup, OntologyAxis, OntologyTerm, RowRecord};

/// Generate prefilled rows.
///
/// Groups keep their order; replicates within a group are sorted by label.
/// The output depends only on the input.
#[must_use]
pub fn prefill(
    groups: &[Arc<ExperimentalGroup>],
    species: &[OntologyTerm],
    specimens: &[OntologyTerm],
    analytes: &[OntologyTerm],
) -> Vec<RowRecord> {
    let preset = |candidates: &[OntologyTerm]| match candidates {
        [only] => Some(only.clone()),
        _ => None,
    };
    let species = preset(species);
    let specimen = preset(specimens);
    let analyte = preset(analytes);

    let mut rows = Vec::new();
    for group in groups {
        let mut replicates: Vec<_> = group.biological_replicates().iter().collect();
        replicates.sort_by(|a, b| a.label().cmp(b.label()));
        for replicate in replicates {
            let mut row = RowRecord::new();
            row.set_experimental_group(Some(Arc::clone(group)));
            row.set_biological_replicate(Some(replicate.clone()));
            row.set_term(OntologyAxis::Species, species.clone());
            row.set_term(OntologyAxis::Specimen, specimen.clone());
            row.set_term(OntologyAxis::Analyte, analyte.clone());
            rows.push(row);
        }
    }
    debug!(groups = groups.len(), rows = rows.len(), "prefilled batch");
    rows
}

/// Generate prefilled rows for everything a context offers.
#[must_use]
pub fn prefill_context(context: &BatchContext) -> Vec<RowRecord> {
    prefill(
        context.groups(),
        context.terms(OntologyAxis::Species),
        context.terms(OntologyAxis::Specimen),
        context.terms(OntologyAxis::Analyte),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::{
        BiologicalReplicate, Condition, ExperimentalValue, GroupId, ReplicateId, VariableLevel,
    };

    fn group(id: u64, labels: &[&str]) -> Arc<ExperimentalGroup> {
        let condition = Condition::new(vec![VariableLevel::new(
            "dose",
            ExperimentalValue::with_unit(id.to_string(), "mg"),
        )])
        .unwrap();
        let replicates = labels
            .iter()
            .zip(1..)
            .map(|(label, n)| BiologicalReplicate::new(ReplicateId(id * 10 + n), *label))
            .collect();
        Arc::new(ExperimentalGroup::new(GroupId(id), condition, replicates).unwrap())
    }

    #[test]
    fn test_one_row_per_replicate_sorted() {
        let groups = vec![group(1, &["R2", "R1"]), group(2, &["R1"])];
        let rows = prefill(&groups, &[], &[], &[]);
        let pairs: Vec<(GroupId, &str)> = rows
            .iter()
            .map(|r| {
                (
                    r.experimental_group().unwrap().id(),
                    r.biological_replicate().unwrap().label(),
                )
            })
            .collect();
        assert_eq!(
            pairs,
            vec![(GroupId(1), "R1"), (GroupId(1), "R2"), (GroupId(2), "R1")]
        );
        assert!(rows.iter().all(|r| r.sample_id().is_none()));
    }

    #[test]
    fn test_single_candidate_is_preset() {
        let groups = vec![group(1, &["R1"])];
        let human = OntologyTerm::new("Homo sapiens", "NCBITaxon:9606");
        let specimens = vec![
            OntologyTerm::new("blood", "UBERON:0000178"),
            OntologyTerm::new("liver", "UBERON:0002107"),
        ];
        let rows = prefill(&groups, &[human.clone()], &specimens, &[]);
        assert_eq!(rows[0].species(), Some(&human));
        assert_eq!(rows[0].specimen(), None);
        assert_eq!(rows[0].analyte(), None);
    }

    #[test]
    fn test_prefill_is_deterministic() {
        let groups = vec![group(1, &["b", "a", "c"]), group(2, &["z"])];
        assert_eq!(prefill(&groups, &[], &[], &[]), prefill(&groups, &[], &[], &[]));
    }
}
