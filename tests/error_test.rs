//! Tests for error types

use batchgrid::Error;

#[test]
fn test_invalid_input_error() {
    let error = Error::InvalidInput("row 3 has no sample id".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid input"));
    assert!(error_str.contains("row 3 has no sample id"));
}

#[test]
fn test_missing_header_error() {
    let error_str = format!("{}", Error::MissingHeader);
    assert!(error_str.contains("No header row found"));
    assert!(error_str.contains("must name its columns"));
}

#[test]
fn test_domain_inference_error() {
    let error = Error::DomainInference {
        columns: "qbic sample id, colour".to_string(),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("Cannot infer metadata domain"));
    assert!(error_str.contains("qbic sample id, colour"));
    assert!(error_str.contains("sequencing or proteomics"));
}

#[test]
fn test_validation_timeout_error() {
    let error = Error::ValidationTimeout { millis: 60_000 };
    let error_str = format!("{error}");
    assert!(error_str.contains("timed out after 60000 ms"));
    assert!(error_str.contains("No rows were accepted"));
}

#[test]
fn test_validation_task_error() {
    let error = Error::ValidationTask("task 4 panicked".to_string());
    assert!(format!("{error}").contains("Validation task failed: task 4 panicked"));
}

#[test]
fn test_not_found_error() {
    let error = Error::NotFound("experiment E9".to_string());
    assert_eq!(format!("{error}"), "Not found: experiment E9");
}

#[test]
fn test_source_error() {
    let error = Error::Source("connection reset".to_string());
    assert_eq!(format!("{error}"), "Source error: connection reset");
}

#[test]
fn test_config_error() {
    let error = Error::Config("parallel_chunk_size must be at least 1".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Configuration error"));
    assert!(error_str.contains("parallel_chunk_size"));
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "upload.tsv");
    let error: Error = io_error.into();
    let error_str = format!("{error}");
    assert!(error_str.contains("IO error"));
    assert!(error_str.contains("upload.tsv"));
}

#[test]
fn test_json_error_conversion() {
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: Error = json_error.into();
    assert!(format!("{error}").contains("JSON error"));
}

#[test]
fn test_other_error() {
    let error = Error::Other("custom error".to_string());
    assert_eq!(format!("{error}"), "custom error");
}

#[test]
fn test_error_debug() {
    let error = Error::ValidationTimeout { millis: 5 };
    let debug_str = format!("{error:?}");
    assert!(debug_str.contains("ValidationTimeout"));
}
