//! Measurement metadata row validation

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{self, MetadataDomain};
use super::tsv::{Sheet, SheetRow};
use crate::experiment::SampleCode;
use crate::source::MeasurementReferenceCheck;
use crate::validation::ValidationReport;
use crate::{Error, Result};

/// Pattern of a ROR organisation URL.
pub const ROR_PATTERN: &str = r"^https://ror.org/0[a-z|0-9]{6}[0-9]{2}$";

/// Warning reported for a row without content.
pub const EMPTY_ROW: &str = "Empty row provided.";

/// Reference fields of one row, extracted once the mandatory checks passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementMetadata {
    sample_codes: Vec<SampleCode>,
    organisation_id: String,
    instrument: String,
}

impl MeasurementMetadata {
    /// Referenced sample codes.
    #[must_use]
    pub fn sample_codes(&self) -> &[SampleCode] {
        &self.sample_codes
    }

    /// ROR URL of the measuring organisation.
    #[must_use]
    pub fn organisation_id(&self) -> &str {
        &self.organisation_id
    }

    /// Instrument CURIE.
    #[must_use]
    pub fn instrument(&self) -> &str {
        &self.instrument
    }
}

/// Result of the checks that need no lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precheck {
    /// Row is done: blank, too short, or missing mandatory metadata
    Finished(ValidationReport),
    /// Mandatory data present; references still to be looked up
    Lookup {
        /// Checks passed so far
        report: ValidationReport,
        /// Fields to look up
        metadata: MeasurementMetadata,
    },
}

/// Validates the data rows of one measurement sheet.
#[derive(Debug, Clone)]
pub struct MeasurementValidator {
    domain: MetadataDomain,
    required_len: usize,
    sample_column: usize,
    organisation_column: usize,
    instrument_column: usize,
    mandatory: Vec<(usize, &'static str)>,
    ror: Regex,
}

impl MeasurementValidator {
    /// Create a validator for a sheet, inferring its domain from the header.
    ///
    /// # Errors
    ///
    /// Returns `Error::DomainInference` if the header matches no single
    /// domain.
    pub fn for_sheet(sheet: &Sheet) -> Result<Self> {
        let domain = domain::require_domain(sheet.header())?;
        let index = |name: &str| {
            sheet
                .column_index(name)
                .ok_or_else(|| Error::DomainInference {
                    columns: sheet.header().join(", "),
                })
        };
        let mandatory = domain
            .mandatory()
            .iter()
            .map(|&(column, label)| index(column).map(|i| (i, label)))
            .collect::<Result<Vec<_>>>()?;
        let ror = Regex::new(ROR_PATTERN).map_err(|e| Error::Other(e.to_string()))?;
        let sample_column = index(domain::SAMPLE_ID)?;
        let organisation_column = index(domain::ORGANISATION_ID)?;
        let instrument_column = index(domain::INSTRUMENT)?;
        // optional trailing columns may be left out of a row
        let required_len = mandatory
            .iter()
            .map(|&(i, _)| i)
            .chain([sample_column, organisation_column, instrument_column])
            .max()
            .map_or(0, |last| last + 1);
        Ok(Self {
            domain,
            required_len,
            sample_column,
            organisation_column,
            instrument_column,
            mandatory,
            ror,
        })
    }

    /// The inferred domain.
    #[must_use]
    pub const fn domain(&self) -> MetadataDomain {
        self.domain
    }

    /// Run the checks that need no lookups.
    ///
    /// Mandatory failures finish the row; nothing else is checked then.
    #[must_use]
    pub fn precheck(&self, row: &SheetRow) -> Precheck {
        if row.is_blank() {
            return Precheck::Finished(ValidationReport::warning(EMPTY_ROW));
        }
        if row.cells().len() < self.required_len {
            return Precheck::Finished(ValidationReport::failure(format!(
                "Not enough columns provided for row: \"{}\"",
                row.raw()
            )));
        }

        let mut report = ValidationReport::new();
        let sample_codes: Vec<SampleCode> = row
            .cell(self.sample_column)
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(SampleCode::new)
            .collect();
        if sample_codes.is_empty() {
            report.add_failure("Sample id: missing sample id reference");
        } else {
            report.add_passed();
        }
        for (column, label) in &self.mandatory {
            if row.cell(*column).is_empty() {
                report.add_failure(format!("{label}: missing mandatory metadata"));
            } else {
                report.add_passed();
            }
        }
        if !report.is_valid() {
            debug!(line = row.line(), "row misses mandatory metadata");
            return Precheck::Finished(report);
        }
        Precheck::Lookup {
            report,
            metadata: MeasurementMetadata {
                sample_codes,
                organisation_id: row.cell(self.organisation_column).to_string(),
                instrument: row.cell(self.instrument_column).to_string(),
            },
        }
    }

    /// Whether an organisation id is a ROR URL.
    #[must_use]
    pub fn is_ror_id(&self, organisation_id: &str) -> bool {
        self.ror.is_match(organisation_id)
    }

    /// Validate one row completely.
    ///
    /// # Errors
    ///
    /// Propagates lookup errors.
    pub async fn validate_row<C>(&self, row: &SheetRow, references: &C) -> Result<ValidationReport>
    where
        C: MeasurementReferenceCheck,
    {
        let (mut report, metadata) = match self.precheck(row) {
            Precheck::Finished(report) => return Ok(report),
            Precheck::Lookup { report, metadata } => (report, metadata),
        };
        for code in &metadata.sample_codes {
            if references.sample_exists(code).await? {
                report.add_passed();
            } else {
                report.add_failure(format!("Unknown sample with sample id \"{code}\""));
            }
        }
        if self.is_ror_id(&metadata.organisation_id) {
            report.add_passed();
        } else {
            report.add_failure(format!(
                "The organisation ID does not seem to be a ROR ID: \"{}\"",
                metadata.organisation_id
            ));
        }
        if references.instrument_exists(&metadata.instrument).await? {
            report.add_passed();
        } else {
            report.add_failure(format!(
                "Unknown instrument id: \"{}\"",
                metadata.instrument
            ));
        }
        debug!(line = row.line(), valid = report.is_valid(), "validated measurement row");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryStore;

    fn proteomics_sheet(rows: &[&str]) -> Sheet {
        let header = MetadataDomain::Proteomics.properties().join("\t");
        let mut text = header;
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        Sheet::parse(&text).unwrap()
    }

    /// A full proteomics row; cells in property order.
    fn proteomics_row(samples: &str, organisation: &str, instrument: &str) -> String {
        [
            samples,
            organisation,
            "Core facility",
            instrument,
            "pool-1",
            "fraction-1",
            "in-gel",
            "trypsin",
            "none",
            "2",
            "C18",
            "DDA",
            "LFQ",
            "none",
            "",
        ]
        .join("\t")
    }

    fn store() -> MemoryStore {
        let store = MemoryStore::new();
        store.add_sample_code(SampleCode::new("QTEST001AE"));
        store.add_sample_code(SampleCode::new("QTEST002AM"));
        store.add_instrument("EFO:0008637");
        store
    }

    #[test]
    fn test_ror_pattern() {
        let sheet = proteomics_sheet(&[]);
        let validator = MeasurementValidator::for_sheet(&sheet).unwrap();
        assert!(validator.is_ror_id("https://ror.org/03a1kwz48"));
        assert!(!validator.is_ror_id("https://ror.org/13a1kwz48"));
        assert!(!validator.is_ror_id("ror.org/03a1kwz48"));
    }

    #[test]
    fn test_blank_row_warns() {
        let sheet = proteomics_sheet(&["\t\t"]);
        let validator = MeasurementValidator::for_sheet(&sheet).unwrap();
        let Precheck::Finished(report) = validator.precheck(&sheet.rows()[0]) else {
            panic!("blank rows need no lookup");
        };
        assert!(report.is_valid());
        assert_eq!(report.warnings(), [EMPTY_ROW]);
    }

    #[test]
    fn test_short_row_fails() {
        let sheet = proteomics_sheet(&["QTEST001AE\thttps://ror.org/03a1kwz48"]);
        let validator = MeasurementValidator::for_sheet(&sheet).unwrap();
        let Precheck::Finished(report) = validator.precheck(&sheet.rows()[0]) else {
            panic!("short rows need no lookup");
        };
        assert_eq!(
            report.failures(),
            ["Not enough columns provided for row: \"QTEST001AE\thttps://ror.org/03a1kwz48\""]
        );
    }

    #[test]
    fn test_optional_trailing_columns_may_be_omitted() {
        let full = proteomics_row("QTEST001AE", "https://ror.org/03a1kwz48", "EFO:0008637");
        // keep everything up to and including "lc column"
        let cut: Vec<&str> = full.split('\t').take(11).collect();
        let sheet = proteomics_sheet(&[&cut.join("\t"), &cut[..10].join("\t")]);
        let validator = MeasurementValidator::for_sheet(&sheet).unwrap();
        assert!(matches!(
            validator.precheck(&sheet.rows()[0]),
            Precheck::Lookup { .. }
        ));
        assert!(matches!(
            validator.precheck(&sheet.rows()[1]),
            Precheck::Finished(report) if !report.is_valid()
        ));
    }

    #[test]
    fn test_missing_mandatory_short_circuits() {
        let row = proteomics_row("QTEST001AE", "", "EFO:0008637");
        let sheet = proteomics_sheet(&[&row]);
        let validator = MeasurementValidator::for_sheet(&sheet).unwrap();
        let Precheck::Finished(report) = validator.precheck(&sheet.rows()[0]) else {
            panic!("mandatory failure must finish the row");
        };
        assert_eq!(report.failures(), ["Organisation: missing mandatory metadata"]);
        assert_eq!(report.validated_entries(), 6);
    }

    #[tokio::test]
    async fn test_valid_row() {
        let row = proteomics_row("QTEST001AE, QTEST002AM", "https://ror.org/03a1kwz48", "EFO:0008637");
        let sheet = proteomics_sheet(&[&row]);
        let validator = MeasurementValidator::for_sheet(&sheet).unwrap();
        let report = validator
            .validate_row(&sheet.rows()[0], &store())
            .await
            .unwrap();
        assert!(report.is_valid(), "{:?}", report.failures());
        // 7 mandatory + 2 samples + organisation + instrument
        assert_eq!(report.validated_entries(), 11);
    }

    #[tokio::test]
    async fn test_unknown_references() {
        let row = proteomics_row("QTEST999XX", "https://example.org/x", "EFO:0000000");
        let sheet = proteomics_sheet(&[&row]);
        let validator = MeasurementValidator::for_sheet(&sheet).unwrap();
        let report = validator
            .validate_row(&sheet.rows()[0], &store())
            .await
            .unwrap();
        assert_eq!(
            report.failures(),
            [
                "Unknown sample with sample id \"QTEST999XX\"",
                "The organisation ID does not seem to be a ROR ID: \"https://example.org/x\"",
                "Unknown instrument id: \"EFO:0000000\"",
            ]
        );
    }
}
