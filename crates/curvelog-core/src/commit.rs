use crate::hash::commit_hash;
use crate::types::{CommitType, CurveState, FeatureName, Metrics};
use serde::Serialize;

/// An immutable history entry: one edit of one feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    pub state: CurveState,
    pub metrics: Metrics,
    pub feature_name: FeatureName,
    pub commit_type: CommitType,
    pub description: String,
    /// RFC 3339 UTC creation timestamp.
    pub time: String,
    pub hash: String,
    /// Origin commits are considered reviewed; edits start unreviewed.
    pub reviewed: bool,
}

/// Parameters for creating a commit.
pub struct CommitParams<'a> {
    pub state: CurveState,
    pub metrics: &'a Metrics,
    pub feature_name: &'a str,
    pub commit_type: CommitType,
    pub description: &'a str,
}

fn now_rfc3339() -> String {
    let now = time::OffsetDateTime::now_utc();
    now.format(&time::format_description::well_known::Rfc3339)
        .expect("RFC3339 formatting should not fail")
}

impl Commit {
    /// Create a commit stamped with the current time.
    pub fn new(params: CommitParams<'_>) -> Self {
        Self::at(params, now_rfc3339())
    }

    /// Create a commit with an explicit timestamp.
    pub fn at(params: CommitParams<'_>, time: String) -> Self {
        let hash = commit_hash(params.commit_type.as_str(), params.description, &time);
        let reviewed = params.commit_type.is_original();
        Self {
            state: params.state,
            metrics: params.metrics.clone(),
            feature_name: params.feature_name.to_string(),
            commit_type: params.commit_type,
            description: params.description.to_string(),
            time,
            hash,
            reviewed,
        }
    }

    pub fn is_original(&self) -> bool {
        self.commit_type.is_original()
    }

    pub fn summary(&self, index: usize, is_head: bool) -> CommitSummary {
        CommitSummary {
            index,
            hash: self.hash.clone(),
            commit_type: self.commit_type.clone(),
            feature_name: self.feature_name.clone(),
            description: self.description.clone(),
            time: self.time.clone(),
            reviewed: self.reviewed,
            is_head,
        }
    }
}

/// Display row for a history panel; carries no curve data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitSummary {
    pub index: usize,
    pub hash: String,
    #[serde(rename = "type")]
    pub commit_type: CommitType,
    pub feature_name: String,
    pub description: String,
    pub time: String,
    pub reviewed: bool,
    pub is_head: bool,
}
