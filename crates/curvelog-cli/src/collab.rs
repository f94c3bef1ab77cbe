//! Headless collaborators used by `curvelog replay`: everything a GUI would
//! draw is reported through `tracing` instead.

use curvelog_core::{EbmMode, MetricValues, PointData};
use curvelog_history::{BinningEngine, Canvas, MetricsStore, Selection, WorkingState};
use tracing::{debug, info};

pub struct TraceSelection;

impl Selection for TraceSelection {
    fn quit_selection(&self) {
        debug!("selection cleared");
    }
}

pub struct TraceCanvas;

impl Canvas for TraceCanvas {
    fn draw_last_edit(&self, state: &WorkingState) {
        debug!(
            segments = state.additive_data_last_edit.as_ref().map_or(0, |d| d.len()),
            "draw last edit"
        );
    }

    fn redraw_original(&self, state: &WorkingState) {
        debug!(
            nodes = state.point_data.len(),
            segments = state.additive_data.len(),
            "redraw graph"
        );
    }

    fn refresh_metrics(&self, metrics: &MetricsStore) {
        debug!(scope = ?metrics.scope, action = ?metrics.action, "refresh metrics");
    }
}

/// Deterministic stand-in for the model engine: reports the bin count and
/// the mean score of the supplied nodes.
pub struct ReplayEngine;

#[async_trait::async_trait]
impl BinningEngine for ReplayEngine {
    async fn set_ebm(&self, mode: EbmMode, point_data: &PointData) -> anyhow::Result<MetricValues> {
        let bins = point_data.len();
        let mean = if bins == 0 {
            0.0
        } else {
            point_data.values().map(|n| n.y).sum::<f64>() / bins as f64
        };
        info!(%mode, bins, mean, "binning engine recompute");
        Ok(MetricValues::from([
            ("bins".to_string(), bins as f64),
            ("mean_score".to_string(), mean),
        ]))
    }
}
