use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::wire::EnrichRequest;
use crate::{JobId, TargetField};

/// Keyword groups tried in order against the lower-cased column name.
const KEYWORD_GROUPS: &[(&[&str], TargetField)] = &[
    (&["country", "pays"], TargetField::Country),
    (&["sector", "secteur", "industry"], TargetField::Sector),
    (&["description", "about"], TargetField::Description),
    (&["linkedin"], TargetField::Linkedin),
    (&["siren"], TargetField::Siren),
    (&["siret"], TargetField::Siret),
    (&["vat", "tva"], TargetField::Vat),
];

/// Resolver suggestion for one uploaded column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingCandidate {
    pub source_column: String,
    pub default_target: TargetField,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub source_column: String,
    pub target_column: TargetField,
}

impl ColumnMapping {
    pub fn new(source_column: impl Into<String>, target_column: TargetField) -> Self {
        Self {
            source_column: source_column.into(),
            target_column,
        }
    }
}

impl From<MappingCandidate> for ColumnMapping {
    fn from(candidate: MappingCandidate) -> Self {
        Self {
            source_column: candidate.source_column,
            target_column: candidate.default_target,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("at least one column must be mapped to \"company name\"")]
    MissingCompanyName,
    #[error("unknown target column {0:?}")]
    UnknownTarget(String),
    #[error("no uploaded column named {0:?}")]
    UnknownSourceColumn(String),
    #[error("no uploaded job to submit")]
    NoActiveJob,
    #[error("job {0} was already submitted")]
    AlreadySubmitted(JobId),
}

/// A validated enrichment request plus the user choices it had to drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub request: EnrichRequest,
    pub dropped_duplicates: Vec<ColumnMapping>,
}

/// Greedy single pass over `source_columns`: each non-ignore target is handed
/// out at most once, to the first column that claims it.
pub fn resolve(
    source_columns: &[String],
    detected_company_column: Option<&str>,
    detected_context_columns: &[String],
) -> Vec<MappingCandidate> {
    let mut assigned = BTreeSet::new();
    source_columns
        .iter()
        .map(|column| {
            let target = default_target(
                column,
                detected_company_column,
                detected_context_columns,
                &assigned,
            );
            if !target.is_ignore() {
                assigned.insert(target);
            }
            MappingCandidate {
                source_column: column.clone(),
                default_target: target,
            }
        })
        .collect()
}

fn default_target(
    column: &str,
    detected_company_column: Option<&str>,
    detected_context_columns: &[String],
    assigned: &BTreeSet<TargetField>,
) -> TargetField {
    if detected_company_column == Some(column) && !assigned.contains(&TargetField::CompanyName) {
        return TargetField::CompanyName;
    }
    if detected_context_columns.iter().any(|c| c == column) {
        return keyword_target(column, assigned).unwrap_or(TargetField::Ignore);
    }
    TargetField::Ignore
}

fn keyword_target(column: &str, assigned: &BTreeSet<TargetField>) -> Option<TargetField> {
    let lowered = column.to_lowercase();
    KEYWORD_GROUPS
        .iter()
        .find(|(keywords, target)| {
            !assigned.contains(target) && keywords.iter().any(|kw| lowered.contains(kw))
        })
        .map(|(_, target)| *target)
}

/// Replace the default target of named columns with the user's choice.
pub fn apply_overrides(
    candidates: &[MappingCandidate],
    overrides: &[(String, TargetField)],
) -> Result<Vec<ColumnMapping>, SubmissionError> {
    let mut choices: Vec<ColumnMapping> =
        candidates.iter().cloned().map(ColumnMapping::from).collect();
    for (source, target) in overrides {
        let choice = choices
            .iter_mut()
            .find(|choice| &choice.source_column == source)
            .ok_or_else(|| SubmissionError::UnknownSourceColumn(source.clone()))?;
        choice.target_column = *target;
    }
    Ok(choices)
}

/// Validate user choices for submission.
///
/// `ignore` entries are dropped. A target chosen twice keeps its first
/// column; later ones are reported in `dropped_duplicates`. Fails only when
/// no column targets `company name`.
pub fn build_submission(
    job_id: &str,
    choices: &[ColumnMapping],
) -> Result<Submission, SubmissionError> {
    let mut taken = BTreeSet::new();
    let mut column_mappings = Vec::new();
    let mut dropped_duplicates = Vec::new();

    for choice in choices.iter().filter(|c| !c.target_column.is_ignore()) {
        if taken.insert(choice.target_column) {
            column_mappings.push(choice.clone());
        } else {
            dropped_duplicates.push(choice.clone());
        }
    }

    if !taken.contains(&TargetField::CompanyName) {
        return Err(SubmissionError::MissingCompanyName);
    }

    Ok(Submission {
        request: EnrichRequest {
            job_id: job_id.to_string(),
            column_mappings,
        },
        dropped_duplicates,
    })
}
