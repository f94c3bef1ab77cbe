//! Interfaces to the collaborators a session drives but does not own: the
//! selection/brush layer, the drawing canvas, and the binning engine.

use crate::metrics::MetricsStore;
use crate::state::WorkingState;
use curvelog_core::error::Result;
use curvelog_core::{EbmMode, EffectScope, HistoryError, MetricValues, MetricsAction, PointData};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Node selection / brush interaction.
pub trait Selection: Send + Sync {
    /// Cancel any in-progress selection and reset dependent panels.
    fn quit_selection(&self);
}

/// Drawing surface for the shape-function graph.
pub trait Canvas: Send + Sync {
    /// Redraw the reference layer from `state.additive_data_last_edit`.
    fn draw_last_edit(&self, state: &WorkingState);

    /// Redraw the primary layer from the live curve.
    fn redraw_original(&self, state: &WorkingState);

    /// The metrics store was refreshed.
    fn refresh_metrics(&self, _metrics: &MetricsStore) {}
}

/// The model-binning engine. Recomputes bin definitions (and the metrics that
/// depend on them) from a feature's point data.
#[async_trait::async_trait]
pub trait BinningEngine: Send + Sync {
    async fn set_ebm(&self, mode: EbmMode, point_data: &PointData) -> anyhow::Result<MetricValues>;
}

/// Borrowed collaborators for one navigation call.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub selection: &'a dyn Selection,
    pub canvas: &'a dyn Canvas,
    pub engine: &'a dyn BinningEngine,
}

impl<'a> Collaborators<'a> {
    pub(crate) async fn set_ebm(
        &self,
        mode: EbmMode,
        point_data: &PointData,
    ) -> Result<MetricValues> {
        self.engine
            .set_ebm(mode, point_data)
            .await
            .map_err(|source| HistoryError::ComputationFailed { mode, source })
    }
}

// ── Test doubles ──

/// Counts `quit_selection` calls.
#[derive(Default)]
pub struct RecordingSelection {
    quits: AtomicUsize,
}

impl RecordingSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quit_count(&self) -> usize {
        self.quits.load(Ordering::SeqCst)
    }
}

impl Selection for RecordingSelection {
    fn quit_selection(&self) {
        self.quits.fetch_add(1, Ordering::SeqCst);
    }
}

/// One recorded canvas request.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasCall {
    DrawLastEdit { segments: Option<usize> },
    RedrawOriginal { segments: usize },
    RefreshMetrics { scope: EffectScope, action: MetricsAction },
}

/// Collects canvas requests in memory (for testing).
#[derive(Default)]
pub struct RecordingCanvas {
    calls: Mutex<Vec<CanvasCall>>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<CanvasCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl Canvas for RecordingCanvas {
    fn draw_last_edit(&self, state: &WorkingState) {
        self.calls.lock().unwrap().push(CanvasCall::DrawLastEdit {
            segments: state.additive_data_last_edit.as_ref().map(|d| d.len()),
        });
    }

    fn redraw_original(&self, state: &WorkingState) {
        self.calls.lock().unwrap().push(CanvasCall::RedrawOriginal {
            segments: state.additive_data.len(),
        });
    }

    fn refresh_metrics(&self, metrics: &MetricsStore) {
        self.calls.lock().unwrap().push(CanvasCall::RefreshMetrics {
            scope: metrics.scope,
            action: metrics.action,
        });
    }
}

/// Mock binning engine. Records every call and answers with metrics derived
/// from the point data: `nodes` (node count) and `mean_y`.
#[derive(Default)]
pub struct MockEngine {
    calls: Mutex<Vec<(EbmMode, usize)>>,
    fail_on: Mutex<Option<EbmMode>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call in `mode` fail until cleared with `None`.
    pub fn fail_on(&self, mode: Option<EbmMode>) {
        *self.fail_on.lock().unwrap() = mode;
    }

    /// `(mode, node count)` per call, in call order.
    pub fn calls(&self) -> Vec<(EbmMode, usize)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn modes(&self) -> Vec<EbmMode> {
        self.calls().into_iter().map(|(mode, _)| mode).collect()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

/// Metrics a [`MockEngine`] reports for `point_data`.
pub fn mock_metrics(point_data: &PointData) -> MetricValues {
    let n = point_data.len();
    let mean_y = if n == 0 {
        0.0
    } else {
        point_data.values().map(|node| node.y).sum::<f64>() / n as f64
    };
    MetricValues::from([("nodes".to_string(), n as f64), ("mean_y".to_string(), mean_y)])
}

#[async_trait::async_trait]
impl BinningEngine for MockEngine {
    async fn set_ebm(&self, mode: EbmMode, point_data: &PointData) -> anyhow::Result<MetricValues> {
        if *self.fail_on.lock().unwrap() == Some(mode) {
            anyhow::bail!("mock engine failure in {mode} mode");
        }
        self.calls.lock().unwrap().push((mode, point_data.len()));
        Ok(mock_metrics(point_data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curvelog_core::Node;

    fn points(ys: &[f64]) -> PointData {
        ys.iter()
            .enumerate()
            .map(|(i, y)| {
                (
                    i as u32,
                    Node {
                        id: i as u32,
                        x: i as f64,
                        y: *y,
                        left_point_id: None,
                        right_point_id: None,
                    },
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn mock_engine_records_calls_and_derives_metrics() {
        let engine = MockEngine::new();
        let values = engine
            .set_ebm(EbmMode::CurrentOnly, &points(&[1.0, 3.0]))
            .await
            .unwrap();
        assert_eq!(values["nodes"], 2.0);
        assert_eq!(values["mean_y"], 2.0);
        assert_eq!(engine.calls(), vec![(EbmMode::CurrentOnly, 2)]);
    }

    #[tokio::test]
    async fn engine_failure_maps_to_computation_failed() {
        let engine = MockEngine::new();
        engine.fail_on(Some(EbmMode::LastOnly));
        let selection = RecordingSelection::new();
        let canvas = RecordingCanvas::new();
        let collab = Collaborators {
            selection: &selection,
            canvas: &canvas,
            engine: &engine,
        };

        let err = collab
            .set_ebm(EbmMode::LastOnly, &points(&[0.0]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            HistoryError::ComputationFailed {
                mode: EbmMode::LastOnly,
                ..
            }
        ));
        assert!(engine.calls().is_empty());

        collab.set_ebm(EbmMode::Current, &points(&[0.0])).await.unwrap();
        assert_eq!(engine.modes(), vec![EbmMode::Current]);
    }
}
