//! Ontology terms for the species, specimen and analyte columns

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Greedy match from the first `[` to the last `]`.
static BRACKETED: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| Regex::new(r"\[.*\]"));

/// Which sample property an ontology term describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OntologyAxis {
    /// Organism the sample was taken from
    Species,
    /// Tissue or material of the sample
    Specimen,
    /// Molecule class to be measured
    Analyte,
}

impl OntologyAxis {
    /// All axes in grid column order.
    pub const ALL: [Self; 3] = [Self::Species, Self::Specimen, Self::Analyte];

    /// Lower-case name used in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Species => "species",
            Self::Specimen => "specimen",
            Self::Analyte => "analyte",
        }
    }
}

impl fmt::Display for OntologyAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ontology class, identified by its CURIE (e.g. `NCBITaxon:9606`).
///
/// Terms imported from raw text may lack a CURIE.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OntologyTerm {
    label: String,
    curie: Option<String>,
}

impl OntologyTerm {
    /// Create a term with label and CURIE.
    #[must_use]
    pub fn new(label: impl Into<String>, curie: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            curie: Some(curie.into()),
        }
    }

    /// Create a free-form term from a label only.
    #[must_use]
    pub fn from_label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            curie: None,
        }
    }

    /// Get the label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the CURIE, if known.
    #[must_use]
    pub fn curie(&self) -> Option<&str> {
        self.curie.as_deref()
    }
}

impl fmt::Display for OntologyTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.curie {
            Some(curie) => write!(f, "{} [{curie}]", self.label),
            None => f.write_str(&self.label),
        }
    }
}

/// Extract the CURIE from a `"label [CURIE]"` display string.
///
/// Takes the text from the first `[` to the last `]` and drops every bracket
/// in it, so nested or repeated brackets collapse. Returns `None` when no
/// bracketed part exists or it is blank.
///
/// ```
/// use batchgrid::experiment::extract_curie;
///
/// assert_eq!(extract_curie("Homo sapiens [NCBITaxon:9606]").as_deref(), Some("NCBITaxon:9606"));
/// assert_eq!(extract_curie("Homo sapiens"), None);
/// ```
#[must_use]
pub fn extract_curie(text: &str) -> Option<String> {
    let bracketed = BRACKETED.as_ref().ok()?.find(text)?.as_str();
    let curie = bracketed.replace(['[', ']'], "");
    let curie = curie.trim();
    (!curie.is_empty()).then(|| curie.to_string())
}
