//! Analysis methods offered by the partner labs

use std::fmt;

use serde::{Deserialize, Serialize};

/// Analysis method: a closed portfolio of what can be done with a sample.
///
/// Each method carries a short abbreviation (used in sample sheets), a label
/// (shown in the grid drop-down) and a description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum AnalysisMethod {
    // NGS
    SixteenS,
    CustomAmplicon,
    Metatranscriptomics,
    Metagenomic,
    Wgs,
    Wes,
    AtacSeq,
    RnaSeq,
    ScAtacSeq,
    ScRnaSeq,
    ScAmpliconSeq,
    OntMetagenomic,
    OntWgs,
    OntRna,
    OntAmplicon,
    PacbioHifi,
    PacbioIsoseq,
    IsolationOnly,
    QcOnly,
    SeqOnly,
    // Proteomics
    Proteomics,
    PhosphoProteomics,
    Peptidomics,
    Interactors,
    Ptms,
    // Metabolomics
    UntargetedMx,
    TargetedAa,
    TargetedNucleotides,
    TargetedCetoAcids,
    TargetedAllMx,
}

impl AnalysisMethod {
    /// Every method, in portfolio order.
    pub const ALL: [Self; 30] = [
        Self::SixteenS,
        Self::CustomAmplicon,
        Self::Metatranscriptomics,
        Self::Metagenomic,
        Self::Wgs,
        Self::Wes,
        Self::AtacSeq,
        Self::RnaSeq,
        Self::ScAtacSeq,
        Self::ScRnaSeq,
        Self::ScAmpliconSeq,
        Self::OntMetagenomic,
        Self::OntWgs,
        Self::OntRna,
        Self::OntAmplicon,
        Self::PacbioHifi,
        Self::PacbioIsoseq,
        Self::IsolationOnly,
        Self::QcOnly,
        Self::SeqOnly,
        Self::Proteomics,
        Self::PhosphoProteomics,
        Self::Peptidomics,
        Self::Interactors,
        Self::Ptms,
        Self::UntargetedMx,
        Self::TargetedAa,
        Self::TargetedNucleotides,
        Self::TargetedCetoAcids,
        Self::TargetedAllMx,
    ];

    /// Fixed abbreviation, e.g. `WES`.
    #[must_use]
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::SixteenS => "16S",
            Self::CustomAmplicon => "CUSTOM-AMPLICON",
            Self::Metatranscriptomics => "METATRANSCRIPTOMICS",
            Self::Metagenomic => "METAGENOMIC",
            Self::Wgs => "WGS",
            Self::Wes => "WES",
            Self::AtacSeq => "ATAC-SEQ",
            Self::RnaSeq => "RNA-SEQ",
            Self::ScAtacSeq => "SC-ATAC-SEQ",
            Self::ScRnaSeq => "SC-RNA-SEQ",
            Self::ScAmpliconSeq => "SC-AMPLICON-SEQ",
            Self::OntMetagenomic => "ONT-METAGENOMIC",
            Self::OntWgs => "ONT-WGS",
            Self::OntRna => "ONT-RNA",
            Self::OntAmplicon => "ONT-AMPLICON",
            Self::PacbioHifi => "PACBIO-HIFI",
            Self::PacbioIsoseq => "PACBIO-ISOSEQ",
            Self::IsolationOnly => "ISOLATION-ONLY",
            Self::QcOnly => "QC-ONLY",
            Self::SeqOnly => "SEQ-ONLY",
            Self::Proteomics => "PROTEOMICS",
            Self::PhosphoProteomics => "PHOSPHO",
            Self::Peptidomics => "PEPTIDOMICS",
            Self::Interactors => "INTERACTORS",
            Self::Ptms => "PTMS",
            Self::UntargetedMx => "UNTARGETED-MX",
            Self::TargetedAa => "TARGETED-AA",
            Self::TargetedNucleotides => "TARGETED-NUCLEOTIDES",
            Self::TargetedCetoAcids => "TARGETED-CETO-ACIDS",
            Self::TargetedAllMx => "TARGETED-ALL-MX",
        }
    }

    /// Short label, e.g. `Exome sequencing`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SixteenS => "16S amplicon sequencing",
            Self::CustomAmplicon => "Custom amplicon sequencing",
            Self::Metatranscriptomics => "Metatranscriptomics",
            Self::Metagenomic => "Metagenomics",
            Self::Wgs => "Genome sequencing",
            Self::Wes => "Exome sequencing",
            Self::AtacSeq => "ATAC sequencing",
            Self::RnaSeq => "RNA sequencing",
            Self::ScAtacSeq => "Single-cell ATAC sequencing",
            Self::ScRnaSeq => "Single-cell RNA sequencing",
            Self::ScAmpliconSeq => "Single-cell amplicon sequencing",
            Self::OntMetagenomic => "Nanopore metagenomics",
            Self::OntWgs => "Nanopore genome sequencing",
            Self::OntRna => "Nanopore RNA sequencing",
            Self::OntAmplicon => "Nanopore amplicon sequencing",
            Self::PacbioHifi => "PacBio HiFi",
            Self::PacbioIsoseq => "PacBio IsoSeq",
            Self::IsolationOnly => "Isolation only",
            Self::QcOnly => "QC only",
            Self::SeqOnly => "Sequencing only",
            Self::Proteomics => "Proteomics",
            Self::PhosphoProteomics => "Phosphoproteomics",
            Self::Peptidomics => "Peptidomics",
            Self::Interactors => "Interactors",
            Self::Ptms => "Posttransductional mutations",
            Self::UntargetedMx => "Untargeted metabolomics",
            Self::TargetedAa => "Targeted amino acids",
            Self::TargetedNucleotides => "Targeted nucleotides",
            Self::TargetedCetoAcids => "Targeted ceto acids",
            Self::TargetedAllMx => "Targeted all metabolites",
        }
    }

    /// Written description; empty for the non-NGS methods.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::SixteenS => "Amplicon sequencing targeting the V4 region of the 16S rRNA gene",
            Self::CustomAmplicon => "Amplicon sequencing from DNA using custom primers",
            Self::Metatranscriptomics => {
                "Sequencing of the total RNA content in a community present in a sample"
            }
            Self::Metagenomic => {
                "Sequencing of the entire genetic content in a community present in a sample"
            }
            Self::Wgs => "Sequencing of the entire genome of an organism",
            Self::Wes => "Sequencing of all exons of protein-coding genes of an organism",
            Self::AtacSeq => "Assay for transposase-accessible chromatin with sequencing",
            Self::RnaSeq => "Detection and quantitative analysis of RNA in a sample",
            Self::ScAtacSeq => {
                "Assay for transposase-accessible chromatin with sequencing at single-cell resolution"
            }
            Self::ScRnaSeq => "RNA sequencing at single-cell resolution",
            Self::ScAmpliconSeq => "Amplicon sequencing at single-cell resolution",
            Self::OntMetagenomic => {
                "Sequencing of the entire genetic content in a community present in a sample with Nanopore technology"
            }
            Self::OntWgs => {
                "Sequencing of the entire genome of an organism with Nanopore technology"
            }
            Self::OntRna => {
                "Detection and quantitative analysis of RNA in a sample with Nanopore technology"
            }
            Self::OntAmplicon => "Amplicon sequencing with Nanopore technology",
            Self::PacbioHifi => {
                "Sequencing of the entire genome of an organism with PacBio technology"
            }
            Self::PacbioIsoseq => {
                "Detection and quantitative analysis of RNA in a sample with PacBio technology"
            }
            Self::IsolationOnly => "DNA and RNA isolation only, no sequencing",
            Self::QcOnly => "Quality control only, no sequencing",
            Self::SeqOnly => "Processing of ready-to-sequence pools",
            _ => "",
        }
    }

    /// Look up a method by its exact (case-sensitive) label.
    #[must_use]
    pub fn for_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.label() == label)
    }

    /// Look up a method by its exact abbreviation.
    #[must_use]
    pub fn for_abbreviation(abbreviation: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|method| method.abbreviation() == abbreviation)
    }

    /// All labels sorted lexicographically, as offered in the drop-down.
    #[must_use]
    pub fn sorted_labels() -> Vec<&'static str> {
        let mut labels: Vec<&'static str> = Self::ALL.iter().map(|m| m.label()).collect();
        labels.sort_unstable();
        labels
    }
}

impl fmt::Display for AnalysisMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
