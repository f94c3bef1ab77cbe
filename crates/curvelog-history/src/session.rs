use crate::collab::{Canvas, Collaborators};
use crate::config::SessionConfig;
use crate::cursor::HistoryCursor;
use crate::log::{CommitLog, RedoBuffer};
use crate::metrics::MetricsStore;
use crate::state::WorkingState;
use curvelog_core::commit::CommitSummary;
use curvelog_core::error::Result;
use curvelog_core::{
    AdditiveData, Commit, CommitParams, CommitType, CurveState, EffectScope, HistoryError,
    Metrics, PointData,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Description recorded on a feature's origin commit.
pub const ORIGINAL_DESCRIPTION: &str = "Original graph";

/// One editor session: the shared commit log plus everything derived from
/// the commit currently on display.
#[derive(Debug, Clone)]
pub struct EditorSession {
    pub(crate) config: SessionConfig,
    pub(crate) log: CommitLog,
    pub(crate) redo: RedoBuffer,
    pub(crate) cursor: HistoryCursor,
    pub(crate) working: WorkingState,
    pub(crate) metrics: MetricsStore,
    pub(crate) active_feature: String,
}

impl EditorSession {
    pub fn new(config: SessionConfig) -> Self {
        let metrics = MetricsStore::new(config.default_scope);
        Self {
            config,
            log: CommitLog::new(),
            redo: RedoBuffer::new(),
            cursor: HistoryCursor::default(),
            working: WorkingState::default(),
            metrics,
            active_feature: String::new(),
        }
    }

    // ── Accessors ──

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn log(&self) -> &CommitLog {
        &self.log
    }

    pub fn redo_buffer(&self) -> &RedoBuffer {
        &self.redo
    }

    pub fn cursor(&self) -> HistoryCursor {
        self.cursor
    }

    pub fn working_state(&self) -> &WorkingState {
        &self.working
    }

    pub fn metrics(&self) -> &MetricsStore {
        &self.metrics
    }

    /// The edit layer updates displayed metrics between commits.
    pub fn metrics_mut(&mut self) -> &mut MetricsStore {
        &mut self.metrics
    }

    pub fn active_feature(&self) -> &str {
        &self.active_feature
    }

    pub fn set_scope(&mut self, scope: EffectScope) {
        self.metrics.scope = scope;
    }

    /// Whether the undo control should be enabled.
    pub fn can_undo(&self) -> bool {
        self.log
            .last()
            .is_some_and(|c| !c.is_original() && c.feature_name == self.active_feature)
    }

    /// Whether the redo control should be enabled.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Rows for a history panel, oldest first.
    pub fn history(&self) -> Vec<CommitSummary> {
        self.log
            .iter()
            .enumerate()
            .map(|(i, c)| c.summary(i, i == self.cursor.head))
            .collect()
    }

    // ── Commit ──

    /// Record the live curve and displayed metrics as a new commit for the
    /// active feature. HEAD moves to the new tail.
    ///
    /// Only an origin commit may start a feature's history; an edit for a
    /// feature with no commits is an `InvariantViolation`.
    pub fn push(&mut self, commit_type: CommitType, description: &str) -> Result<String> {
        self.check_push(&commit_type)?;
        let metrics = self.metrics.snapshot();
        let commit = Commit::new(CommitParams {
            state: self.working.curve(),
            metrics: &metrics,
            feature_name: &self.active_feature,
            commit_type,
            description,
        });
        let hash = commit.hash.clone();

        if self.config.clear_redo_on_push && !self.redo.is_empty() {
            debug!(discarded = self.redo.len(), "push discards redo buffer");
            self.redo.clear();
        }

        debug!(
            feature = %commit.feature_name,
            commit_type = %commit.commit_type,
            hash = %hash,
            "push commit"
        );
        self.log.push(commit);
        self.cursor.reset_to_tail(self.log.len());
        Ok(hash)
    }

    fn check_push(&self, commit_type: &CommitType) -> Result<()> {
        if self.active_feature.is_empty() {
            return Err(HistoryError::InvariantViolation(
                "no active feature to commit to".into(),
            ));
        }
        if !commit_type.is_original() && self.log.last_for_feature(&self.active_feature).is_none()
        {
            return Err(HistoryError::InvariantViolation(format!(
                "feature {} has no origin commit",
                self.active_feature
            )));
        }
        Ok(())
    }

    // ── Edit lifecycle ──

    /// Start (or update) an uncommitted edit. On the first call the
    /// pre-edit curve becomes the last-edit reference.
    pub fn begin_edit(&mut self, point_data: PointData, additive_data: AdditiveData) {
        if !self.working.has_pending_edit() {
            self.working.additive_data_last_last_edit = self.working.additive_data_last_edit.take();
            self.working.additive_data_last_edit = Some(Arc::clone(&self.working.additive_data));
        }
        self.working.point_data_buffer = Some(point_data);
        self.working.additive_data_buffer = Some(additive_data);
    }

    /// Drop the pending edit and restore the previous reference layer.
    /// Returns `false` if there was nothing to cancel.
    pub fn cancel_edit(&mut self, canvas: &dyn Canvas) -> bool {
        if !self.working.has_pending_edit() {
            return false;
        }
        self.working.clear_buffers();
        self.working.additive_data_last_edit = self.working.additive_data_last_last_edit.clone();
        canvas.draw_last_edit(&self.working);
        canvas.redraw_original(&self.working);
        true
    }

    /// Apply the pending edit to the live curve and push it.
    pub fn commit_edit(&mut self, commit_type: CommitType, description: &str) -> Result<String> {
        self.check_push(&commit_type)?;
        let (Some(point_data), Some(additive_data)) = (
            self.working.point_data_buffer.take(),
            self.working.additive_data_buffer.take(),
        ) else {
            self.working.clear_buffers();
            return Err(HistoryError::NotFound("no pending edit to commit".into()));
        };
        self.working.point_data = Arc::new(point_data);
        self.working.additive_data = Arc::new(additive_data);
        self.working.additive_data_last_last_edit = self.working.additive_data_last_edit.clone();
        self.push(commit_type, description)
    }

    // ── Feature selection ──

    /// Make `feature` the active feature. Restores its most recent commit if
    /// it has history; otherwise installs `origin` and pushes an origin
    /// commit. Returns whether existing history was restored.
    pub async fn select_feature(
        &mut self,
        feature: &str,
        origin: CurveState,
        origin_metrics: Metrics,
        collab: &Collaborators<'_>,
    ) -> Result<bool> {
        if feature.is_empty() {
            return Err(HistoryError::NotFound("empty feature name".into()));
        }
        let previous = std::mem::replace(&mut self.active_feature, feature.to_string());
        match self.try_restore_last_edit(collab).await {
            Ok(true) => return Ok(true),
            Ok(false) => {}
            Err(e) => {
                self.active_feature = previous;
                return Err(e);
            }
        }

        self.working = WorkingState::from_curve(&origin);
        self.metrics.show_global(&origin_metrics);
        self.push(CommitType::Original, ORIGINAL_DESCRIPTION)?;
        info!(feature, "new feature history");

        collab.canvas.refresh_metrics(&self.metrics);
        collab.canvas.redraw_original(&self.working);
        Ok(false)
    }
}
