//! Metadata domain inference from an upload header

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::tsv::normalize_column;
use crate::{Error, Result};

/// Measurement metadata schema an upload belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataDomain {
    /// Next-generation sequencing measurements
    Sequencing,
    /// Mass-spectrometry proteomics measurements
    Proteomics,
}

/// Column holding the comma-separated sample codes.
pub const SAMPLE_ID: &str = "qbic sample id";
/// Column holding the ROR id of the measuring organisation.
pub const ORGANISATION_ID: &str = "organisation id";
/// Column holding the instrument CURIE.
pub const INSTRUMENT: &str = "instrument";

const SEQUENCING_PROPERTIES: &[&str] = &[
    SAMPLE_ID,
    ORGANISATION_ID,
    "facility",
    INSTRUMENT,
    "sequencing read type",
    "library kit",
    "flow cell",
    "sequencing run protocol",
    "sample pool group",
    "index i7",
    "index i5",
    "comment",
];

const PROTEOMICS_PROPERTIES: &[&str] = &[
    SAMPLE_ID,
    ORGANISATION_ID,
    "facility",
    INSTRUMENT,
    "sample pool group",
    "cycle/fraction name",
    "digestion method",
    "digestion enzyme",
    "enrichment method",
    "injection volume (ul)",
    "lc column",
    "lcms method",
    "labeling type",
    "label",
    "comment",
];

/// Mandatory column and the label used in its failure message.
const SEQUENCING_MANDATORY: &[(&str, &str)] = &[
    (ORGANISATION_ID, "Organisation"),
    ("facility", "Facility"),
    (INSTRUMENT, "Instrument"),
    ("sequencing read type", "Sequencing Read Type"),
];

const PROTEOMICS_MANDATORY: &[(&str, &str)] = &[
    (ORGANISATION_ID, "Organisation"),
    ("facility", "Facility"),
    (INSTRUMENT, "Instrument"),
    ("digestion method", "Digestion Method"),
    ("digestion enzyme", "Digestion Enzyme"),
    ("lc column", "LC Column"),
];

impl MetadataDomain {
    /// All domains.
    pub const ALL: [Self; 2] = [Self::Sequencing, Self::Proteomics];

    /// Lower-case property names the header must contain.
    #[must_use]
    pub const fn properties(self) -> &'static [&'static str] {
        match self {
            Self::Sequencing => SEQUENCING_PROPERTIES,
            Self::Proteomics => PROTEOMICS_PROPERTIES,
        }
    }

    /// Mandatory columns besides the sample id, with their message labels.
    #[must_use]
    pub const fn mandatory(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Sequencing => SEQUENCING_MANDATORY,
            Self::Proteomics => PROTEOMICS_MANDATORY,
        }
    }

    /// Whether a header provides every property of this domain.
    #[must_use]
    pub fn matches<S: AsRef<str>>(self, header: &[S]) -> bool {
        let present: Vec<String> = header
            .iter()
            .map(|column| normalize_column(column.as_ref()))
            .collect();
        self.properties()
            .iter()
            .all(|property| present.iter().any(|column| column == property))
    }
}

impl fmt::Display for MetadataDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequencing => f.write_str("sequencing"),
            Self::Proteomics => f.write_str("proteomics"),
        }
    }
}

/// Infer the domain of an upload from its header.
///
/// `None` if no domain or more than one domain matches.
///
/// ```
/// use batchgrid::upload::{infer_domain, MetadataDomain};
///
/// let header = MetadataDomain::Proteomics.properties();
/// assert_eq!(infer_domain(header), Some(MetadataDomain::Proteomics));
/// assert_eq!(infer_domain(&["foo", "bar"]), None);
/// ```
#[must_use]
pub fn infer_domain<S: AsRef<str>>(header: &[S]) -> Option<MetadataDomain> {
    let mut matching = MetadataDomain::ALL
        .into_iter()
        .filter(|domain| domain.matches(header));
    match (matching.next(), matching.next()) {
        (Some(domain), None) => {
            debug!(%domain, "inferred metadata domain");
            Some(domain)
        }
        _ => None,
    }
}

/// Infer the domain, failing the upload when it cannot be determined.
///
/// # Errors
///
/// Returns `Error::DomainInference` listing the observed header.
pub fn require_domain<S: AsRef<str>>(header: &[S]) -> Result<MetadataDomain> {
    infer_domain(header).ok_or_else(|| Error::DomainInference {
        columns: header
            .iter()
            .map(|column| column.as_ref().trim())
            .collect::<Vec<_>>()
            .join(", "),
    })
}
