use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::SubmissionError;

/// Destination field of the enrichment schema. Serialises to the server's key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TargetField {
    #[serde(rename = "company name")]
    CompanyName,
    #[serde(rename = "country")]
    Country,
    #[serde(rename = "sector")]
    Sector,
    #[serde(rename = "description")]
    Description,
    #[serde(rename = "linkedin")]
    Linkedin,
    #[serde(rename = "siren")]
    Siren,
    #[serde(rename = "siret")]
    Siret,
    #[serde(rename = "vat")]
    Vat,
    #[serde(rename = "ignore")]
    Ignore,
}

impl TargetField {
    pub const fn key(self) -> &'static str {
        match self {
            TargetField::CompanyName => "company name",
            TargetField::Country => "country",
            TargetField::Sector => "sector",
            TargetField::Description => "description",
            TargetField::Linkedin => "linkedin",
            TargetField::Siren => "siren",
            TargetField::Siret => "siret",
            TargetField::Vat => "vat",
            TargetField::Ignore => "ignore",
        }
    }

    pub fn is_ignore(self) -> bool {
        self == TargetField::Ignore
    }

    pub fn entry(self) -> &'static ColumnCatalogEntry {
        CATALOG
            .iter()
            .find(|entry| entry.target == self)
            .unwrap_or(&CATALOG[CATALOG.len() - 1])
    }
}

impl fmt::Display for TargetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TargetField {
    type Err = SubmissionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        CATALOG
            .iter()
            .map(|entry| entry.target)
            .find(|target| target.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SubmissionError::UnknownTarget(raw.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnCatalogEntry {
    pub target: TargetField,
    pub display_label: &'static str,
    pub required: bool,
}

/// Target schema in display order; `ignore` is always last.
pub const CATALOG: &[ColumnCatalogEntry] = &[
    ColumnCatalogEntry {
        target: TargetField::CompanyName,
        display_label: "Nom de l'entreprise (requis)",
        required: true,
    },
    ColumnCatalogEntry {
        target: TargetField::Country,
        display_label: "Pays",
        required: false,
    },
    ColumnCatalogEntry {
        target: TargetField::Sector,
        display_label: "Secteur",
        required: false,
    },
    ColumnCatalogEntry {
        target: TargetField::Description,
        display_label: "Description",
        required: false,
    },
    ColumnCatalogEntry {
        target: TargetField::Linkedin,
        display_label: "LinkedIn URL",
        required: false,
    },
    ColumnCatalogEntry {
        target: TargetField::Siren,
        display_label: "SIREN",
        required: false,
    },
    ColumnCatalogEntry {
        target: TargetField::Siret,
        display_label: "SIRET",
        required: false,
    },
    ColumnCatalogEntry {
        target: TargetField::Vat,
        display_label: "VAT/TVA",
        required: false,
    },
    ColumnCatalogEntry {
        target: TargetField::Ignore,
        display_label: "--- Ignorer ---",
        required: false,
    },
];
