use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Feature name (a model input dimension, e.g. "Age").
pub type FeatureName = String;

/// Node identifier inside a feature's point data.
pub type NodeId = u32;

// ── Commit classification ──

/// Edit kind recorded on a commit.
///
/// Serialized as the kebab-case tag string used by the editor's history panel
/// (`"original"`, `"equal-width-bin-edit"`, ...). Unknown tags round-trip
/// through [`CommitType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CommitType {
    /// First commit of a feature's history. Never undoable past.
    Original,
    /// Re-binning into equal-width bins; changes the bin definition.
    EqualWidthBinEdit,
    Increasing,
    Decreasing,
    Interpolation,
    Regression,
    Align,
    Delete,
    Merge,
    InPlace,
    Other(String),
}

impl CommitType {
    pub fn as_str(&self) -> &str {
        match self {
            CommitType::Original => "original",
            CommitType::EqualWidthBinEdit => "equal-width-bin-edit",
            CommitType::Increasing => "increasing",
            CommitType::Decreasing => "decreasing",
            CommitType::Interpolation => "interpolation",
            CommitType::Regression => "regression",
            CommitType::Align => "align",
            CommitType::Delete => "delete",
            CommitType::Merge => "merge",
            CommitType::InPlace => "in-place",
            CommitType::Other(s) => s,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "original" => CommitType::Original,
            "equal-width-bin-edit" => CommitType::EqualWidthBinEdit,
            "increasing" => CommitType::Increasing,
            "decreasing" => CommitType::Decreasing,
            "interpolation" => CommitType::Interpolation,
            "regression" => CommitType::Regression,
            "align" => CommitType::Align,
            "delete" => CommitType::Delete,
            "merge" => CommitType::Merge,
            "in-place" => CommitType::InPlace,
            other => CommitType::Other(other.to_string()),
        }
    }

    pub fn is_original(&self) -> bool {
        matches!(self, CommitType::Original)
    }

    /// Whether applying or reverting this commit changes the bin definition,
    /// so the binning engine has to be resynced.
    pub fn changes_binning(&self) -> bool {
        matches!(self, CommitType::EqualWidthBinEdit)
    }
}

impl From<String> for CommitType {
    fn from(s: String) -> Self {
        CommitType::parse(&s)
    }
}

impl From<CommitType> for String {
    fn from(t: CommitType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Curve data ──

/// One editable node of a shape function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_point_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_point_id: Option<NodeId>,
}

/// Per-bin editable curve data, keyed by node id.
pub type PointData = BTreeMap<NodeId, Node>;

/// One drawn segment of the additive contribution curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub id: String,
    #[serde(default)]
    pub pos: String,
}

/// Additive contribution of a feature, in drawing order.
pub type AdditiveData = Vec<Segment>;

/// Shared snapshot of a feature's curve. Commits and the working state hold
/// the same `Arc`s; edits replace them rather than mutating in place.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveState {
    pub point_data: Arc<PointData>,
    pub additive_data: Arc<AdditiveData>,
}

impl CurveState {
    pub fn new(point_data: PointData, additive_data: AdditiveData) -> Self {
        Self {
            point_data: Arc::new(point_data),
            additive_data: Arc::new(additive_data),
        }
    }
}

// ── Metrics ──

/// Named metric values for one slot, e.g. `{"accuracy": 0.84, "auc": 0.91}`.
pub type MetricValues = BTreeMap<String, f64>;

/// Bar-chart metrics for the original model, the last edit and the current edit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarData {
    #[serde(default)]
    pub original: MetricValues,
    #[serde(default)]
    pub last: MetricValues,
    #[serde(default)]
    pub current: MetricValues,
}

/// Binary confusion matrix, `[tn, fp, fn, tp]`.
pub type ConfusionMatrix = [f64; 4];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfusionMatrixData {
    #[serde(default)]
    pub original: Option<ConfusionMatrix>,
    #[serde(default)]
    pub last: Option<ConfusionMatrix>,
    #[serde(default)]
    pub current: Option<ConfusionMatrix>,
}

/// Metrics captured on every commit. `Clone` is the structural deep copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(default)]
    pub bar_data: BarData,
    #[serde(default)]
    pub confusion_matrix_data: ConfusionMatrixData,
}

/// Which data the displayed metrics are computed over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectScope {
    /// Whole dataset; cached commit metrics are shown as-is.
    #[default]
    Global,
    /// Samples under the current node selection.
    Selected,
    /// A user-chosen data slice; recomputed live by the binning engine.
    Slice,
}

/// Instruction attached to a metrics-store refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricsAction {
    #[default]
    NoAction,
    Overwrite,
    Nullify,
    Last,
}

/// Bin-definition request modes understood by the binning engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EbmMode {
    Current,
    OriginalOnly,
    LastOnly,
    CurrentOnly,
}

impl fmt::Display for EbmMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EbmMode::Current => "current",
            EbmMode::OriginalOnly => "original-only",
            EbmMode::LastOnly => "last-only",
            EbmMode::CurrentOnly => "current-only",
        };
        f.write_str(s)
    }
}
