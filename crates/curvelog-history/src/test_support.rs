use curvelog_core::{AdditiveData, CurveState, Metrics, Node, PointData, Segment};

/// Point data with one node per `y`, x = index.
pub(crate) fn points(ys: &[f64]) -> PointData {
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

/// Flat segments, one per `y`.
pub(crate) fn segments(ys: &[f64]) -> AdditiveData {
    ys.iter()
        .enumerate()
        .map(|(i, &y)| Segment {
            x1: i as f64,
            y1: y,
            x2: (i + 1) as f64,
            y2: y,
            id: format!("path-{i}-{}-r", i + 1),
            pos: "r".into(),
        })
        .collect()
}

pub(crate) fn curve(ys: &[f64]) -> CurveState {
    CurveState::new(points(ys), segments(ys))
}

pub(crate) fn metrics_with(accuracy: f64) -> Metrics {
    let mut m = Metrics::default();
    m.bar_data.original.insert("accuracy".into(), accuracy);
    m.bar_data.current.insert("accuracy".into(), accuracy);
    m
}
