//! Metadata upload validation
//!
//! Uploads are tab-delimited sheets. Measurement sheets are checked per
//! inferred [`MetadataDomain`]; every row needs reference lookups, so rows are
//! validated concurrently and joined under a batch timeout. A timeout fails
//! the whole upload; there is no partial acceptance.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use batchgrid::config::EngineConfig;
//! use batchgrid::source::MemoryStore;
//! use batchgrid::upload::{validate_measurement_upload, Sheet};
//!
//! # async fn example(text: &str) -> batchgrid::Result<()> {
//! let sheet = Sheet::parse(text)?;
//! let report = validate_measurement_upload(&sheet, Arc::new(MemoryStore::new()), &EngineConfig::default()).await?;
//! println!("{}: {} failures", report.domain(), report.summary().failures().len());
//! # Ok(())
//! # }
//! ```

pub mod domain;
pub mod measurement;
pub mod sample;
pub mod tsv;

pub use domain::{infer_domain, require_domain, MetadataDomain};
pub use measurement::{MeasurementMetadata, MeasurementValidator, Precheck, EMPTY_ROW};
pub use sample::{SampleSheetRow, SampleSheetValidator};
pub use tsv::{normalize_column, Sheet, SheetRow};

use serde::{Deserialize, Serialize};
#[cfg(feature = "tokio")]
use std::sync::Arc;
#[cfg(feature = "tokio")]
use tracing::info;

#[cfg(feature = "tokio")]
use crate::config::EngineConfig;
use crate::experiment::RowRecord;
#[cfg(feature = "tokio")]
use crate::source::MeasurementReferenceCheck;
use crate::source::OntologyTermSource;
use crate::validation::ValidationReport;
#[cfg(feature = "tokio")]
use crate::Error;
use crate::Result;

/// Failure reported for a sheet without data rows.
pub const EMPTY_SHEET: &str = "The metadata sheet seems to be empty";

/// Validation result of a measurement upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReport {
    domain: MetadataDomain,
    rows: Vec<ValidationReport>,
    summary: ValidationReport,
}

impl UploadReport {
    fn new(domain: MetadataDomain, rows: Vec<ValidationReport>, has_no_data: bool) -> Self {
        let summary = if has_no_data {
            ValidationReport::failure(EMPTY_SHEET)
        } else {
            rows.iter().cloned().sum()
        };
        Self {
            domain,
            rows,
            summary,
        }
    }

    /// Inferred domain.
    #[must_use]
    pub const fn domain(&self) -> MetadataDomain {
        self.domain
    }

    /// Per-row reports, in sheet order.
    #[must_use]
    pub fn rows(&self) -> &[ValidationReport] {
        &self.rows
    }

    /// All row reports combined.
    #[must_use]
    pub const fn summary(&self) -> &ValidationReport {
        &self.summary
    }

    /// Whether the upload can be accepted.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.summary.is_valid()
    }
}

/// Validate a measurement sheet, one concurrent task per row.
///
/// # Errors
///
/// - `Error::DomainInference` if the header matches no single domain
/// - `Error::ValidationTimeout` if a row or the whole batch exceeds its
///   configured timeout
/// - `Error::ValidationTask` if a row task panicked
/// - lookup errors of `references`
#[cfg(feature = "tokio")]
pub async fn validate_measurement_upload<C>(
    sheet: &Sheet,
    references: Arc<C>,
    config: &EngineConfig,
) -> Result<UploadReport>
where
    C: MeasurementReferenceCheck + 'static,
{
    use tokio::task::JoinSet;
    use tokio::time::timeout;

    let validator = Arc::new(MeasurementValidator::for_sheet(sheet)?);
    let domain = validator.domain();
    let row_timeout = config.row_validation_timeout();
    let batch_timeout = config.batch_validation_timeout();

    let mut tasks = JoinSet::new();
    for (index, row) in sheet.rows().iter().cloned().enumerate() {
        let validator = Arc::clone(&validator);
        let references = Arc::clone(&references);
        tasks.spawn(async move {
            let report = timeout(row_timeout, validator.validate_row(&row, references.as_ref()))
                .await
                .map_err(|_| Error::ValidationTimeout {
                    millis: millis(row_timeout),
                })??;
            Ok::<_, Error>((index, report))
        });
    }

    let joined = timeout(batch_timeout, async {
        let mut rows = vec![ValidationReport::new(); sheet.rows().len()];
        while let Some(joined) = tasks.join_next().await {
            let (index, report) = joined.map_err(|e| Error::ValidationTask(e.to_string()))??;
            rows[index] = report;
        }
        Ok::<_, Error>(rows)
    })
    .await;
    let rows = match joined {
        Ok(rows) => rows?,
        Err(_) => {
            tasks.abort_all();
            return Err(Error::ValidationTimeout {
                millis: millis(batch_timeout),
            });
        }
    };

    let report = UploadReport::new(domain, rows, sheet.has_no_data());
    info!(
        %domain,
        rows = report.rows().len(),
        validated = report.summary().validated_entries(),
        failures = report.summary().failures().len(),
        warnings = report.summary().warnings().len(),
        "validated measurement upload"
    );
    Ok(report)
}

#[cfg(feature = "tokio")]
fn millis(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Validate every row of a sample sheet.
///
/// With `update` set, the sheet must carry a sample code column and every
/// row has to name a sample known to `validator`.
///
/// # Errors
///
/// Returns `Error::InvalidInput` for a missing column; propagates term
/// lookup errors.
pub async fn validate_sample_sheet<T: OntologyTermSource>(
    sheet: &Sheet,
    validator: &SampleSheetValidator,
    terms: &T,
    update: bool,
) -> Result<Vec<(ValidationReport, RowRecord)>> {
    let rows = SampleSheetRow::from_sheet(sheet, update)?;
    let mut validated = Vec::with_capacity(rows.len());
    for row in &rows {
        let result = if update {
            validator.validate_existing(row, terms).await?
        } else {
            validator.validate_new(row, terms).await?
        };
        validated.push(result);
    }
    Ok(validated)
}
