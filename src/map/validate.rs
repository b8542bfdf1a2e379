use std::collections::BTreeSet;
use std::fmt;

use crate::error::{AppError, AppResult};

use super::state::MapViewState;

/// A referential problem the reducer accepted without complaint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    DuplicateLayerId { id: String },
    MissingSource { layer: String, source: String },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateLayerId { id } => write!(f, "duplicate layer id '{id}'"),
            Self::MissingSource { layer, source } => {
                write!(f, "layer '{layer}' references undeclared source '{source}'")
            }
        }
    }
}

impl MapViewState {
    /// Lists duplicate layer ids (reported once per id) and layers whose
    /// source is not declared, in draw order.
    pub fn integrity_issues(&self) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();
        let mut seen = BTreeSet::new();
        let mut reported = BTreeSet::new();

        for layer in &self.layers {
            if !seen.insert(layer.id.as_str()) && reported.insert(layer.id.as_str()) {
                issues.push(IntegrityIssue::DuplicateLayerId {
                    id: layer.id.clone(),
                });
            }
            if !self.sources.contains_key(&layer.source) {
                issues.push(IntegrityIssue::MissingSource {
                    layer: layer.id.clone(),
                    source: layer.source.clone(),
                });
            }
        }
        issues
    }

    /// Opt-in strict check; the reducer itself stays permissive.
    pub fn validate(&self) -> AppResult<()> {
        let issues = self.integrity_issues();
        if issues.is_empty() {
            return Ok(());
        }
        let message = issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(AppError::validation(message))
    }
}
