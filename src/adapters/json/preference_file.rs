//! Preference File Adapter
//!
//! Reads pairwise comparison edits:
//!
//! ```json
//! {
//!   "main": [{"a": "Comfort", "b": "Health", "value": 3}],
//!   "sub": {"Comfort": [{"a": "Temperature", "b": "Noise", "value": 2}]}
//! }
//! ```
//!
//! Group names are matched case-insensitively.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::ahp::{MainCriterion, PairwiseEdit, PreferenceSet};
use crate::domain::foundation::{DomainError, ErrorCode};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PreferenceDocument {
    main: Vec<PairwiseEdit>,
    sub: BTreeMap<String, Vec<PairwiseEdit>>,
}

/// Preference document on disk
#[derive(Debug, Clone)]
pub struct PreferenceFile {
    path: PathBuf,
}

impl PreferenceFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self) -> Result<PreferenceSet, DomainError> {
        let json = fs::read_to_string(&self.path).map_err(|e| {
            DomainError::new(ErrorCode::SourceUnavailable, e.to_string())
                .with_detail("path", self.path.display().to_string())
        })?;
        let preferences = Self::parse(&json)
            .map_err(|e| e.with_detail("path", self.path.display().to_string()))?;

        tracing::debug!(
            path = %self.path.display(),
            main_edits = preferences.main.len(),
            groups = preferences.sub.len(),
            "Loaded preferences"
        );
        Ok(preferences)
    }

    /// Parses a preference document, resolving group names.
    pub fn parse(json: &str) -> Result<PreferenceSet, DomainError> {
        let doc: PreferenceDocument = serde_json::from_str(json)
            .map_err(|e| DomainError::new(ErrorCode::InvalidInput, e.to_string()))?;

        let sub = doc
            .sub
            .into_iter()
            .map(|(group, edits)| {
                group
                    .parse::<MainCriterion>()
                    .map(|main| (main, edits))
                    .map_err(DomainError::from)
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        Ok(PreferenceSet {
            main: doc.main,
            sub,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_main_and_group_edits() {
        let prefs = PreferenceFile::parse(
            r#"{
                "main": [{"a": "Comfort", "b": "Health", "value": 3}],
                "sub": {"usability": [{"a": "SeatingCapacity", "b": "Equipment", "value": 0.5}]}
            }"#,
        )
        .unwrap();

        assert_eq!(prefs.main, vec![PairwiseEdit::new("Comfort", "Health", 3.0)]);
        assert_eq!(prefs.sub[&MainCriterion::Usability][0].value, 0.5);
    }

    #[test]
    fn empty_document_is_empty_set() {
        assert!(PreferenceFile::parse("{}").unwrap().is_empty());
    }

    #[test]
    fn unknown_group_is_rejected() {
        let err = PreferenceFile::parse(r#"{"sub": {"Budget": []}}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::CriterionNotFound);
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let err = PreferenceFile::new(&path).load().unwrap_err();
        assert_eq!(err.code, ErrorCode::SourceUnavailable);
        assert_eq!(err.details.get("path"), Some(&path.display().to_string()));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, r#"{"main": [{"a": "Health", "b": "Usability", "value": 5}]}"#)
            .unwrap();

        let prefs = PreferenceFile::new(&path).load().unwrap();
        assert_eq!(prefs.main.len(), 1);
    }
}
