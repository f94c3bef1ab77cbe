//! Property tests for undo/redo over interleaved feature histories.

use curvelog_core::{CommitType, CurveState, EffectScope, Metrics, Node, PointData, Segment};
use curvelog_history::collab::{MockEngine, RecordingCanvas, RecordingSelection};
use curvelog_history::{Collaborators, EditorSession, SessionConfig};
use proptest::prelude::*;

const FEATURES: [&str; 3] = ["Age", "BMI", "Glucose"];

#[derive(Debug, Clone)]
enum Op {
    Edit { y: i8, bins: u8 },
    Rebin { bins: u8 },
    Undo,
    Redo,
    Switch(usize),
    Checkout(prop::sample::Index),
    Scope(EffectScope),
}

/// What an op did to the displayed commit.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Effect {
    /// Working state left as it was.
    Unchanged,
    /// Working state rematerialized from HEAD by a navigation.
    Settled,
    /// HEAD moved to an arbitrary commit for preview.
    Previewed,
}

fn scope_strategy() -> impl Strategy<Value = EffectScope> {
    prop_oneof![
        Just(EffectScope::Global),
        Just(EffectScope::Selected),
        Just(EffectScope::Slice),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (any::<i8>(), 1u8..6).prop_map(|(y, bins)| Op::Edit { y, bins }),
        1 => (1u8..8).prop_map(|bins| Op::Rebin { bins }),
        3 => Just(Op::Undo),
        2 => Just(Op::Redo),
        1 => (0..FEATURES.len()).prop_map(Op::Switch),
        1 => any::<prop::sample::Index>().prop_map(Op::Checkout),
        1 => scope_strategy().prop_map(Op::Scope),
    ]
}

fn points(y: f64, bins: u8) -> PointData {
    (0..bins as u32)
        .map(|id| {
            let node = Node {
                id,
                x: id as f64,
                y,
                left_point_id: None,
                right_point_id: None,
            };
            (id, node)
        })
        .collect()
}

fn segments(y: f64, bins: u8) -> Vec<Segment> {
    (0..bins)
        .map(|i| Segment {
            x1: i as f64,
            y1: y,
            x2: i as f64 + 1.0,
            y2: y,
            id: format!("path-{i}"),
            pos: "r".into(),
        })
        .collect()
}

fn origin(feature_index: usize) -> CurveState {
    let y = feature_index as f64 * 10.0;
    CurveState::new(points(y, 3), segments(y, 3))
}

struct Harness {
    selection: RecordingSelection,
    canvas: RecordingCanvas,
    engine: MockEngine,
}

impl Harness {
    fn new() -> Self {
        Self {
            selection: RecordingSelection::new(),
            canvas: RecordingCanvas::new(),
            engine: MockEngine::new(),
        }
    }

    fn collab(&self) -> Collaborators<'_> {
        Collaborators {
            selection: &self.selection,
            canvas: &self.canvas,
            engine: &self.engine,
        }
    }
}

fn block_on<F: std::future::Future>(fut: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(fut)
}

/// Reference curve a settled navigation must show: the nearest earlier
/// commit of the active feature before HEAD.
fn expected_reference(session: &EditorSession) -> Option<Vec<Segment>> {
    let head = session.cursor().head;
    session
        .log()
        .previous_for_feature(session.active_feature(), head)
        .and_then(|i| session.log().get(i))
        .map(|c| (*c.state.additive_data).clone())
}

fn assert_reference_matches(session: &EditorSession) {
    let actual = session
        .working_state()
        .additive_data_last_edit
        .as_deref()
        .cloned();
    assert_eq!(actual, expected_reference(session));
    assert_eq!(
        session.working_state().additive_data_last_edit,
        session.working_state().additive_data_last_last_edit
    );
}

/// A checked-out origin has no predecessor, so its own curve is the reference.
fn assert_checkout_reference(session: &EditorSession) {
    let head = session.log().get(session.cursor().head).unwrap();
    let actual = session
        .working_state()
        .additive_data_last_edit
        .as_deref()
        .cloned();
    if head.is_original() {
        assert_eq!(actual, Some((*head.state.additive_data).clone()));
    } else {
        assert_eq!(actual, expected_reference(session));
    }
    assert_eq!(session.active_feature(), head.feature_name);
    assert_eq!(
        session.cursor().preview_history,
        session.cursor().head + 1 != session.log().len()
    );
}

async fn apply(session: &mut EditorSession, h: &Harness, op: &Op) -> Effect {
    match op {
        Op::Edit { y, bins } => {
            let y = *y as f64 / 10.0;
            session.begin_edit(points(y, *bins), segments(y, *bins));
            session.commit_edit(CommitType::InPlace, "edit").unwrap();
            Effect::Unchanged
        }
        Op::Rebin { bins } => {
            session.begin_edit(points(0.0, *bins), segments(0.0, *bins));
            session
                .commit_edit(CommitType::EqualWidthBinEdit, "rebin")
                .unwrap();
            Effect::Unchanged
        }
        Op::Undo => {
            if session.undo(&h.collab()).await.unwrap() {
                assert_reference_matches(session);
                Effect::Settled
            } else {
                Effect::Unchanged
            }
        }
        Op::Redo => {
            if session.can_redo() {
                session.redo(&h.collab()).await.unwrap();
                assert_reference_matches(session);
                Effect::Settled
            } else {
                Effect::Unchanged
            }
        }
        Op::Switch(i) => {
            let restored = session
                .select_feature(FEATURES[*i], origin(*i), Metrics::default(), &h.collab())
                .await
                .unwrap();
            if restored {
                assert_reference_matches(session);
            }
            Effect::Settled
        }
        Op::Checkout(index) => {
            let index = index.index(session.log().len());
            session.checkout_to(index, &h.collab()).unwrap();
            assert_eq!(session.cursor().head, index);
            assert_checkout_reference(session);
            Effect::Previewed
        }
        Op::Scope(scope) => {
            session.set_scope(*scope);
            Effect::Unchanged
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn redo_inverts_undo(ops in prop::collection::vec(op_strategy(), 0..40)) {
        block_on(async {
            let h = Harness::new();
            let mut session = EditorSession::new(SessionConfig::default());
            session
                .select_feature(FEATURES[0], origin(0), Metrics::default(), &h.collab())
                .await
                .unwrap();
            // Edits made while previewing an older commit keep that
            // commit's reference layer until the next navigation.
            let mut settled = true;
            for op in &ops {
                match apply(&mut session, &h, op).await {
                    Effect::Unchanged => {}
                    Effect::Settled => settled = true,
                    Effect::Previewed => settled = false,
                }
            }

            let before = session.clone();
            let at_tail = before.cursor().head + 1 == before.log().len();
            if session.undo(&h.collab()).await.unwrap() {
                session.redo(&h.collab()).await.unwrap();
                assert_eq!(session.log(), before.log());
                assert_eq!(session.redo_buffer(), before.redo_buffer());
                assert_eq!(session.active_feature(), before.active_feature());
                assert_eq!(session.cursor().head, session.log().len() - 1);
                assert!(!session.cursor().preview_history);
                if settled && at_tail {
                    assert_eq!(session.cursor(), before.cursor());
                    assert_eq!(session.working_state(), before.working_state());
                }
            } else {
                assert_eq!(session.log(), before.log());
                assert_eq!(session.redo_buffer(), before.redo_buffer());
            }
        });
    }

    #[test]
    fn undo_never_removes_an_origin(ops in prop::collection::vec(op_strategy(), 0..60)) {
        block_on(async {
            let h = Harness::new();
            let mut session = EditorSession::new(SessionConfig::default());
            let mut selected = std::collections::BTreeSet::new();
            session
                .select_feature(FEATURES[0], origin(0), Metrics::default(), &h.collab())
                .await
                .unwrap();
            selected.insert(FEATURES[0]);

            for op in &ops {
                if let Op::Switch(i) = op {
                    selected.insert(FEATURES[*i]);
                }
                apply(&mut session, &h, op).await;

                for feature in &selected {
                    let origins = session
                        .log()
                        .iter()
                        .filter(|c| c.feature_name == *feature && c.is_original())
                        .count();
                    assert_eq!(origins, 1, "feature {feature} lost its origin");
                    let first = session.log().origin_for_feature(feature).unwrap();
                    assert!(session.log().get(first).unwrap().is_original());
                }
                assert!(session.redo_buffer().peek().map_or(true, |c| !c.is_original()));
            }
        });
    }

    #[test]
    fn push_moves_head_to_tail(ops in prop::collection::vec(op_strategy(), 0..30), y in any::<i8>()) {
        block_on(async {
            let h = Harness::new();
            let mut session = EditorSession::new(SessionConfig::default());
            session
                .select_feature(FEATURES[0], origin(0), Metrics::default(), &h.collab())
                .await
                .unwrap();
            for op in &ops {
                apply(&mut session, &h, op).await;
            }

            apply(&mut session, &h, &Op::Edit { y, bins: 2 }).await;
            assert_eq!(session.cursor().head, session.log().len() - 1);
            assert!(!session.cursor().preview_history);
            assert!(!session.can_redo());
        });
    }
}
