use curvelog_core::{AdditiveData, CurveState, PointData};
use std::sync::Arc;

/// Live editor state for the active feature.
///
/// `point_data`/`additive_data` are shared with the commit they were loaded
/// from. The `*_buffer` fields hold an uncommitted edit; any history
/// navigation drops them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkingState {
    pub point_data: Arc<PointData>,
    pub additive_data: Arc<AdditiveData>,
    pub point_data_buffer: Option<PointData>,
    pub additive_data_buffer: Option<AdditiveData>,
    /// Curve of the previous same-feature commit, drawn as a reference layer.
    pub additive_data_last_edit: Option<Arc<AdditiveData>>,
    /// Saved `additive_data_last_edit`, restored when an edit is cancelled.
    pub additive_data_last_last_edit: Option<Arc<AdditiveData>>,
}

impl WorkingState {
    pub fn from_curve(curve: &CurveState) -> Self {
        Self {
            point_data: Arc::clone(&curve.point_data),
            additive_data: Arc::clone(&curve.additive_data),
            ..Default::default()
        }
    }

    /// Shared snapshot of the live curve.
    pub fn curve(&self) -> CurveState {
        CurveState {
            point_data: Arc::clone(&self.point_data),
            additive_data: Arc::clone(&self.additive_data),
        }
    }

    /// Overwrite the live curve with a commit's snapshot and drop any
    /// uncommitted edit.
    pub fn load(&mut self, curve: &CurveState) {
        self.point_data = Arc::clone(&curve.point_data);
        self.additive_data = Arc::clone(&curve.additive_data);
        self.clear_buffers();
    }

    pub fn clear_buffers(&mut self) {
        self.point_data_buffer = None;
        self.additive_data_buffer = None;
    }

    pub fn has_pending_edit(&self) -> bool {
        self.point_data_buffer.is_some() || self.additive_data_buffer.is_some()
    }

    /// Set both reference layers to the same curve.
    pub fn set_reference(&mut self, reference: Option<Arc<AdditiveData>>) {
        self.additive_data_last_last_edit = reference.clone();
        self.additive_data_last_edit = reference;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curvelog_core::Segment;

    fn segment(y: f64) -> Segment {
        Segment {
            x1: 0.0,
            y1: y,
            x2: 1.0,
            y2: y,
            id: "path-0-1-0".into(),
            pos: "r".into(),
        }
    }

    #[test]
    fn load_shares_arcs_and_drops_buffers() {
        let curve = CurveState::new(PointData::new(), vec![segment(0.3)]);
        let mut ws = WorkingState {
            point_data_buffer: Some(PointData::new()),
            additive_data_buffer: Some(vec![segment(9.0)]),
            ..Default::default()
        };
        assert!(ws.has_pending_edit());

        ws.load(&curve);
        assert!(!ws.has_pending_edit());
        assert!(Arc::ptr_eq(&ws.additive_data, &curve.additive_data));
    }

    #[test]
    fn set_reference_fills_both_layers() {
        let mut ws = WorkingState::default();
        let reference = Arc::new(vec![segment(1.0)]);
        ws.set_reference(Some(Arc::clone(&reference)));
        assert_eq!(ws.additive_data_last_edit.as_deref(), Some(&*reference));
        assert_eq!(ws.additive_data_last_last_edit.as_deref(), Some(&*reference));

        ws.set_reference(None);
        assert!(ws.additive_data_last_edit.is_none());
        assert!(ws.additive_data_last_last_edit.is_none());
    }
}
