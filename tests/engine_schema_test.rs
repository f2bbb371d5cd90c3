//! Domain schema tests: conditions, groups, ontology terms, row records and
//! the engine configuration.

use std::sync::Arc;

use batchgrid::experiment::{
    extract_curie, AnalysisMethod, BiologicalReplicate, Condition, ExperimentalGroup,
    ExperimentalValue, GroupId, OntologyAxis, OntologyTerm, ReplicateId, RowRecord, SampleCode,
    SampleId, VariableLevel,
};
use batchgrid::{EngineConfig, Error, ReplicatePolicy};

fn level(name: &str, literal: &str) -> VariableLevel {
    VariableLevel::new(name, ExperimentalValue::new(literal))
}

// =============================================================================
// Condition Tests
// =============================================================================

#[test]
fn test_condition_equality_ignores_order() {
    let a = Condition::new(vec![level("genotype", "wt"), level("time", "2h")]).unwrap();
    let b = Condition::new(vec![level("time", "2h"), level("genotype", "wt")]).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.levels()[0].variable_name(), "genotype");
}

#[test]
fn test_condition_rejects_repeated_variable() {
    let result = Condition::new(vec![level("genotype", "wt"), level("genotype", "ko")]);
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[test]
fn test_condition_deserialization_validates() {
    let json = r#"[
        {"variable_name": "genotype", "value": {"literal": "wt", "unit": null}},
        {"variable_name": "genotype", "value": {"literal": "ko", "unit": null}}
    ]"#;
    assert!(serde_json::from_str::<Condition>(json).is_err());
}

// =============================================================================
// ExperimentalGroup Tests
// =============================================================================

#[test]
fn test_group_builder() {
    let group = ExperimentalGroup::builder(
        GroupId(4),
        Condition::new(vec![level("diet", "high fat")]).unwrap(),
    )
    .name("HFD")
    .biological_replicates(vec![
        BiologicalReplicate::new(ReplicateId(1), "M1"),
        BiologicalReplicate::new(ReplicateId(2), "M2"),
    ])
    .sample_size(6)
    .build()
    .unwrap();

    assert_eq!(group.name(), Some("HFD"));
    assert_eq!(group.sample_size(), 6);
    assert_eq!(group.replicate_by_label("M2").map(BiologicalReplicate::id), Some(ReplicateId(2)));
    assert!(group.replicate_by_label("M3").is_none());
    assert_eq!(group.id().to_string(), "group-4");
}

#[test]
fn test_group_rejects_duplicate_replicate_labels() {
    let result = ExperimentalGroup::new(
        GroupId(1),
        Condition::new(vec![level("diet", "chow")]).unwrap(),
        vec![
            BiologicalReplicate::new(ReplicateId(1), "M1"),
            BiologicalReplicate::new(ReplicateId(2), "M1"),
        ],
    );
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

// =============================================================================
// Ontology and Analysis Tests
// =============================================================================

#[test]
fn test_ontology_term_display_and_curie() {
    let term = OntologyTerm::new("Homo sapiens", "NCBITaxon:9606");
    let shown = term.to_string();
    assert_eq!(shown, "Homo sapiens [NCBITaxon:9606]");
    assert_eq!(extract_curie(&shown).as_deref(), Some("NCBITaxon:9606"));
    assert_eq!(OntologyTerm::from_label("blood").to_string(), "blood");
    assert_eq!(extract_curie("blood []"), None);
    assert_eq!(OntologyAxis::Specimen.to_string(), "specimen");
}

#[test]
fn test_analysis_method_lookups() {
    for method in AnalysisMethod::ALL {
        assert_eq!(AnalysisMethod::for_label(method.label()), Some(method));
        assert_eq!(AnalysisMethod::for_abbreviation(method.abbreviation()), Some(method));
    }
    let labels = AnalysisMethod::sorted_labels();
    assert!(labels.windows(2).all(|pair| pair[0] <= pair[1]));
}

// =============================================================================
// RowRecord Tests
// =============================================================================

fn record(id: &str, code: &str) -> RowRecord {
    let group = ExperimentalGroup::new(
        GroupId(1),
        Condition::new(vec![level("genotype", "wt")]).unwrap(),
        vec![BiologicalReplicate::new(ReplicateId(1), "R1")],
    )
    .unwrap();
    RowRecord::builder()
        .sample_id(SampleId::new(id))
        .sample_code(SampleCode::new(code))
        .analysis_method(AnalysisMethod::Wgs)
        .sample_name("tumour-1")
        .experimental_group(Arc::new(group))
        .biological_replicate(BiologicalReplicate::new(ReplicateId(1), "R1"))
        .species(OntologyTerm::new("Homo sapiens", "NCBITaxon:9606"))
        .build()
}

#[test]
fn test_record_equality_ignores_identity_only() {
    assert_eq!(record("1", "QA001"), record("2", "QA001"));
    // display code differs: records differ, content does not
    assert_ne!(record("1", "QA001"), record("1", "QA002"));
    assert!(record("1", "QA001").same_content(&record("1", "QA002")));
}

#[test]
fn test_record_serialization() {
    let original = record("1", "QA001");
    let json = serde_json::to_string(&original).expect("serialization failed");
    let restored: RowRecord = serde_json::from_str(&json).expect("deserialization failed");
    assert_eq!(restored, original);
    assert_eq!(restored.sample_id(), original.sample_id());
    assert!(restored.is_persisted());
}

// =============================================================================
// EngineConfig Tests
// =============================================================================

#[test]
fn test_config_defaults() {
    let config = EngineConfig::from_json_str("{}").unwrap();
    assert_eq!(config, EngineConfig::default());
    assert_eq!(config.initial_row_count(), 2);
    assert_eq!(config.replicate_policy(), ReplicatePolicy::RequireGroup);
    assert_eq!(config.row_validation_timeout().as_millis(), 60_000);
    assert_eq!(config.batch_validation_timeout().as_millis(), 300_000);
    assert_eq!(config.parallel_chunk_size(), 64);
}

#[test]
fn test_config_policy_and_rejections() {
    let config =
        EngineConfig::from_json_str(r#"{"replicate_policy": "first_match_across_groups"}"#)
            .unwrap();
    assert_eq!(config.replicate_policy(), ReplicatePolicy::FirstMatchAcrossGroups);

    assert!(matches!(
        EngineConfig::from_json_str(r#"{"parallel_chunk_size": 0}"#),
        Err(Error::Config(_))
    ));
    assert!(matches!(
        EngineConfig::from_json_str(r#"{"colour": "red"}"#),
        Err(Error::Json(_))
    ));
}
