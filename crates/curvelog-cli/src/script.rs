//! Replay script format.
//!
//! ```json
//! {"steps": [
//!   {"op": "select", "feature": "Age", "ys": [0.1, 0.2, 0.3]},
//!   {"op": "edit", "ys": [0.1, 0.4, 0.3]},
//!   {"op": "commit", "type": "in-place", "description": "raised bin 2"},
//!   {"op": "undo"},
//!   {"op": "redo"},
//!   {"op": "checkout", "index": 0}
//! ]}
//! ```

use curvelog_core::{AdditiveData, CommitType, CurveState, EffectScope, Metrics, Node, PointData, Segment};
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Script {
    pub steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Switch to a feature, creating its origin commit on first use.
    Select {
        feature: String,
        ys: Vec<f64>,
        #[serde(default)]
        metrics: Metrics,
    },
    /// Start or update an uncommitted edit.
    Edit { ys: Vec<f64> },
    Cancel,
    Commit {
        #[serde(rename = "type")]
        commit_type: CommitType,
        #[serde(default)]
        description: String,
    },
    Undo,
    Redo,
    Checkout { index: usize },
    Scope { scope: EffectScope },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Select { .. } => "select",
            Step::Edit { .. } => "edit",
            Step::Cancel => "cancel",
            Step::Commit { .. } => "commit",
            Step::Undo => "undo",
            Step::Redo => "redo",
            Step::Checkout { .. } => "checkout",
            Step::Scope { .. } => "scope",
        }
    }
}

pub fn load(path: &Path) -> anyhow::Result<Script> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading script: {}", path.display()))?;
    parse(&content).with_context(|| format!("parsing script: {}", path.display()))
}

pub fn parse(content: &str) -> anyhow::Result<Script> {
    serde_json::from_str(content).context("invalid replay script")
}

/// Nodes at x = 0, 1, 2, ... linked left to right.
pub fn points_from_ys(ys: &[f64]) -> PointData {
    ys.iter()
        .enumerate()
        .map(|(i, &y)| {
            let id = i as u32;
            let node = Node {
                id,
                x: i as f64,
                y,
                left_point_id: id.checked_sub(1),
                right_point_id: (i + 1 < ys.len()).then_some(id + 1),
            };
            (id, node)
        })
        .collect()
}

/// Step-function segments: one flat segment per bin.
pub fn segments_from_ys(ys: &[f64]) -> AdditiveData {
    ys.iter()
        .enumerate()
        .map(|(i, &y)| Segment {
            x1: i as f64,
            y1: y,
            x2: (i + 1) as f64,
            y2: y,
            id: format!("path-{i}-{}-r", i + 1),
            pos: "r".to_string(),
        })
        .collect()
}

pub fn curve_from_ys(ys: &[f64]) -> CurveState {
    CurveState::new(points_from_ys(ys), segments_from_ys(ys))
}
