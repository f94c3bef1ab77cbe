//! Metrics store and its reconciliation with the displayed commit.

use crate::collab::Collaborators;
use curvelog_core::error::Result;
use curvelog_core::{
    BarData, ConfusionMatrixData, EbmMode, EffectScope, MetricValues, Metrics, MetricsAction,
    PointData,
};

/// Metrics currently shown next to the graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsStore {
    pub bar_data: BarData,
    pub confusion_matrix_data: ConfusionMatrixData,
    pub scope: EffectScope,
    pub action: MetricsAction,
}

impl MetricsStore {
    pub fn new(scope: EffectScope) -> Self {
        Self {
            scope,
            ..Default::default()
        }
    }

    /// Structural copy of the displayed metrics, as captured on push.
    pub fn snapshot(&self) -> Metrics {
        Metrics {
            bar_data: self.bar_data.clone(),
            confusion_matrix_data: self.confusion_matrix_data.clone(),
        }
    }

    /// Replace the displayed metrics with a commit's copy.
    pub fn load(&mut self, metrics: &Metrics, action: MetricsAction) {
        self.bar_data = metrics.bar_data.clone();
        self.confusion_matrix_data = metrics.confusion_matrix_data.clone();
        self.action = action;
    }

    /// Write engine output for one slice mode into its bar slot.
    pub fn fill_slot(&mut self, mode: EbmMode, values: MetricValues) {
        match mode {
            EbmMode::OriginalOnly => self.bar_data.original = values,
            EbmMode::LastOnly => self.bar_data.last = values,
            EbmMode::CurrentOnly => self.bar_data.current = values,
            EbmMode::Current => {}
        }
    }

    /// Show the global metrics of the displayed commit.
    pub fn show_global(&mut self, metrics: &Metrics) {
        self.load(metrics, MetricsAction::Overwrite);
        self.scope = EffectScope::Global;
    }
}

/// Point data a slice recompute runs against, resolved before any mutation.
pub(crate) struct SliceViews<'a> {
    /// Point data of the feature's origin commit.
    pub origin: &'a PointData,
    /// Second-to-last log entry, if the log will hold more than one.
    pub last: Option<&'a PointData>,
    /// Tail log entry.
    pub current: &'a PointData,
}

/// Engine output of a slice recompute.
#[derive(Debug)]
pub(crate) struct SliceMetrics {
    original: MetricValues,
    last: Option<MetricValues>,
    current: MetricValues,
}

pub(crate) async fn recompute_slice(
    collab: &Collaborators<'_>,
    views: SliceViews<'_>,
) -> Result<SliceMetrics> {
    let original = collab.set_ebm(EbmMode::OriginalOnly, views.origin).await?;
    let last = match views.last {
        Some(points) => Some(collab.set_ebm(EbmMode::LastOnly, points).await?),
        None => None,
    };
    let current = collab.set_ebm(EbmMode::CurrentOnly, views.current).await?;
    Ok(SliceMetrics {
        original,
        last,
        current,
    })
}

/// Refresh the store after undo/redo settled on a commit with `metrics`.
///
/// The commit's metrics are always loaded first; the active scope then
/// decides what is displayed on top of them.
pub(crate) fn reconcile(store: &mut MetricsStore, metrics: &Metrics, slice: Option<SliceMetrics>) {
    store.load(metrics, MetricsAction::NoAction);
    match store.scope {
        EffectScope::Global => store.action = MetricsAction::Overwrite,
        // The pending selection was cancelled, so selection metrics no longer apply.
        EffectScope::Selected => store.action = MetricsAction::Nullify,
        EffectScope::Slice => {
            let Some(slice) = slice else {
                return;
            };
            store.fill_slot(EbmMode::OriginalOnly, slice.original);
            store.fill_slot(EbmMode::CurrentOnly, slice.current);
            match slice.last {
                Some(last) => {
                    store.fill_slot(EbmMode::LastOnly, last);
                    store.action = MetricsAction::Overwrite;
                }
                None => {
                    // Single-entry log: nothing precedes the current commit.
                    store.bar_data.last = store.bar_data.current.clone();
                    store.action = MetricsAction::Last;
                }
            }
        }
    }
}
