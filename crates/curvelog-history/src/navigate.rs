//! Undo, redo, restore, and checkout.
//!
//! Every operation resolves its target and runs all binning-engine requests
//! before mutating the session. Once the engine has answered, the changes
//! are applied in a fixed order: log, working state, metrics, redraw.

use crate::collab::{Canvas, Collaborators};
use crate::metrics::{reconcile, recompute_slice, SliceViews};
use crate::session::EditorSession;
use curvelog_core::error::Result;
use curvelog_core::{Commit, EbmMode, EffectScope, HistoryError, PointData};
use std::sync::Arc;
use tracing::{debug, info, warn};

impl EditorSession {
    /// Step back to the previous commit of the active feature.
    ///
    /// Returns `Ok(false)` without touching the session when the log is
    /// empty, the tail is an origin commit, or the tail belongs to another
    /// feature.
    pub async fn undo(&mut self, collab: &Collaborators<'_>) -> Result<bool> {
        let Some(tail) = self.log.last() else {
            debug!("undo: empty log");
            return Ok(false);
        };
        if tail.is_original() {
            debug!(feature = %tail.feature_name, "undo: already at origin");
            return Ok(false);
        }
        if tail.feature_name != self.active_feature {
            debug!(
                tail_feature = %tail.feature_name,
                active_feature = %self.active_feature,
                "undo: tail belongs to another feature"
            );
            return Ok(false);
        }

        let len = self.log.len();
        let Some(target_index) = self.log.previous_for_feature(&self.active_feature, len - 1)
        else {
            warn!(hash = %tail.hash, feature = %tail.feature_name, "edit commit without origin");
            return Err(HistoryError::InvariantViolation(format!(
                "commit {} of feature {} has no earlier commit to undo to",
                tail.hash, tail.feature_name
            )));
        };
        let popped_changes_binning = tail.commit_type.changes_binning();
        let target = self.commit_at(target_index)?;

        collab.selection.quit_selection();

        if popped_changes_binning {
            collab
                .set_ebm(EbmMode::Current, &target.state.point_data)
                .await?;
        }
        let slice = if self.metrics.scope == EffectScope::Slice {
            // The log after the pop: its tail is entry len - 2.
            let current: &PointData = &self.commit_ref(len - 2)?.state.point_data;
            let views = self.slice_views(&self.active_feature, len - 1, current)?;
            Some(recompute_slice(collab, views).await?)
        } else {
            None
        };

        self.cursor.head = target_index;
        // Skipping over other features' commits leaves HEAD behind the tail.
        self.cursor.preview_history = target_index != len - 2;
        if let Some(popped) = self.log.pop() {
            self.redo.push(popped);
        }
        self.materialize(target_index, &target, collab.canvas);
        reconcile(&mut self.metrics, &target.metrics, slice);
        collab.canvas.refresh_metrics(&self.metrics);
        collab.canvas.redraw_original(&self.working);

        info!(
            feature = %self.active_feature,
            head = target_index,
            redo_depth = self.redo.len(),
            "undo"
        );
        Ok(true)
    }

    /// Re-apply the most recently undone commit.
    pub async fn redo(&mut self, collab: &Collaborators<'_>) -> Result<()> {
        let commit = self.redo.peek().cloned().ok_or(HistoryError::NothingToRedo)?;

        collab.selection.quit_selection();

        if commit.commit_type.changes_binning() {
            collab
                .set_ebm(EbmMode::Current, &commit.state.point_data)
                .await?;
        }
        let slice = if self.metrics.scope == EffectScope::Slice {
            let views = self.slice_views(
                &commit.feature_name,
                self.log.len() + 1,
                &commit.state.point_data,
            )?;
            Some(recompute_slice(collab, views).await?)
        } else {
            None
        };

        let index = self.log.len();
        self.cursor.head = index;
        self.cursor.preview_history = false;
        if let Some(redone) = self.redo.pop() {
            self.log.push(redone);
        }
        self.active_feature = commit.feature_name.clone();
        self.materialize(index, &commit, collab.canvas);
        reconcile(&mut self.metrics, &commit.metrics, slice);
        collab.canvas.refresh_metrics(&self.metrics);
        collab.canvas.redraw_original(&self.working);

        info!(
            feature = %self.active_feature,
            head = index,
            redo_depth = self.redo.len(),
            "redo"
        );
        Ok(())
    }

    /// Materialize the most recent commit of the active feature, e.g. after
    /// switching features. Returns `Ok(false)` if the feature has no history.
    pub async fn try_restore_last_edit(&mut self, collab: &Collaborators<'_>) -> Result<bool> {
        let Some(index) = self.log.last_for_feature(&self.active_feature) else {
            debug!(feature = %self.active_feature, "no history to restore");
            return Ok(false);
        };
        let commit = self.commit_at(index)?;

        collab
            .set_ebm(EbmMode::Current, &commit.state.point_data)
            .await?;

        self.cursor.head = index;
        self.cursor.preview_history = !self.cursor.is_at_tail(self.log.len());
        self.materialize(index, &commit, collab.canvas);
        self.metrics.show_global(&commit.metrics);
        collab.canvas.refresh_metrics(&self.metrics);
        collab.canvas.redraw_original(&self.working);

        info!(feature = %self.active_feature, head = index, "restored last edit");
        Ok(true)
    }

    /// Materialize the commit HEAD points at. Read-only preview: metrics
    /// always show the commit's global values.
    pub fn checkout(&mut self, collab: &Collaborators<'_>) -> Result<()> {
        let index = self.cursor.head;
        let commit = self.commit_at(index)?;

        self.active_feature = commit.feature_name.clone();
        if commit.is_original() {
            // No predecessor: the reference layer coincides with the curve.
            self.working.load(&commit.state);
            self.working
                .set_reference(Some(Arc::clone(&commit.state.additive_data)));
            collab.canvas.draw_last_edit(&self.working);
        } else {
            self.materialize(index, &commit, collab.canvas);
        }
        self.metrics.show_global(&commit.metrics);
        collab.canvas.refresh_metrics(&self.metrics);
        collab.canvas.redraw_original(&self.working);

        debug!(head = index, preview = self.cursor.preview_history, "checkout");
        Ok(())
    }

    /// Move HEAD to `index` and check it out.
    pub fn checkout_to(&mut self, index: usize, collab: &Collaborators<'_>) -> Result<()> {
        if index >= self.log.len() {
            return Err(HistoryError::NotFound(format!(
                "no commit at index {index} (log has {} entries)",
                self.log.len()
            )));
        }
        self.cursor.head = index;
        self.cursor.preview_history = !self.cursor.is_at_tail(self.log.len());
        self.checkout(collab)
    }

    // ── Helpers ──

    fn commit_ref(&self, index: usize) -> Result<&Commit> {
        self.log.get(index).ok_or_else(|| {
            HistoryError::NotFound(format!(
                "no commit at index {index} (log has {} entries)",
                self.log.len()
            ))
        })
    }

    fn commit_at(&self, index: usize) -> Result<Commit> {
        self.commit_ref(index).cloned()
    }

    /// Load `commit` (at log position `index`) into the working state and
    /// point both reference layers at the previous commit of its feature.
    fn materialize(&mut self, index: usize, commit: &Commit, canvas: &dyn Canvas) {
        self.working.load(&commit.state);
        let reference = self
            .log
            .previous_for_feature(&commit.feature_name, index)
            .and_then(|i| self.log.get(i))
            .map(|c| Arc::clone(&c.state.additive_data));
        let has_reference = reference.is_some();
        self.working.set_reference(reference);
        if has_reference {
            canvas.draw_last_edit(&self.working);
        }
    }

    /// Slice views for a log that will hold `visible_len` entries once the
    /// navigation is applied, with `current` as its tail.
    fn slice_views<'a>(
        &'a self,
        feature: &str,
        visible_len: usize,
        current: &'a PointData,
    ) -> Result<SliceViews<'a>> {
        let origin_index = self
            .log
            .origin_for_feature(feature)
            .filter(|&i| i < visible_len)
            .ok_or_else(|| {
                HistoryError::InvariantViolation(format!("feature {feature} has no origin commit"))
            })?;
        let origin: &PointData = &self.commit_ref(origin_index)?.state.point_data;
        let last = if visible_len > 1 {
            Some(&*self.commit_ref(visible_len - 2)?.state.point_data)
        } else {
            None
        };
        Ok(SliceViews {
            origin,
            last,
            current,
        })
    }
}
