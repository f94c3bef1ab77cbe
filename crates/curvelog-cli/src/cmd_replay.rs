use crate::collab::{ReplayEngine, TraceCanvas, TraceSelection};
use crate::script::{self, Script, Step};
use anyhow::Context;
use curvelog_core::commit::CommitSummary;
use curvelog_history::{Collaborators, EditorSession, SessionConfig};
use std::path::Path;
use tracing::info;

pub struct ReplayParams<'a> {
    pub script: &'a Path,
    pub config: Option<&'a Path>,
    pub json: bool,
}

pub async fn execute(params: &ReplayParams<'_>) -> anyhow::Result<()> {
    let config = match params.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    let script = script::load(params.script)?;
    let session = run_script(&script, config).await?;

    if params.json {
        for row in session.history().iter().rev() {
            println!("{}", serde_json::to_string(row)?);
        }
        return Ok(());
    }

    let rows = session.history();
    if rows.is_empty() {
        println!("History is empty.");
        return Ok(());
    }
    for row in rows.iter().rev() {
        print_row(row);
    }
    let cursor = session.cursor();
    println!(
        "\nHEAD at {}{} | {} commits | {} undone",
        cursor.head,
        if cursor.preview_history { " (preview)" } else { "" },
        rows.len(),
        session.redo_buffer().len()
    );
    Ok(())
}

/// Apply every step of `script` to a fresh session.
pub async fn run_script(script: &Script, config: SessionConfig) -> anyhow::Result<EditorSession> {
    let collab = Collaborators {
        selection: &TraceSelection,
        canvas: &TraceCanvas,
        engine: &ReplayEngine,
    };
    let mut session = EditorSession::new(config);

    for (i, step) in script.steps.iter().enumerate() {
        run_step(&mut session, step, &collab)
            .await
            .with_context(|| format!("step {i} ({}) failed", step.name()))?;
    }
    Ok(session)
}

async fn run_step(
    session: &mut EditorSession,
    step: &Step,
    collab: &Collaborators<'_>,
) -> anyhow::Result<()> {
    match step {
        Step::Select {
            feature,
            ys,
            metrics,
        } => {
            let restored = session
                .select_feature(feature, script::curve_from_ys(ys), metrics.clone(), collab)
                .await?;
            info!(feature = %feature, restored, "select");
        }
        Step::Edit { ys } => {
            session.begin_edit(script::points_from_ys(ys), script::segments_from_ys(ys));
        }
        Step::Cancel => {
            if !session.cancel_edit(collab.canvas) {
                info!("cancel: no pending edit");
            }
        }
        Step::Commit {
            commit_type,
            description,
        } => {
            session.commit_edit(commit_type.clone(), description)?;
        }
        Step::Undo => {
            if !session.undo(collab).await? {
                info!("undo: nothing to undo for the active feature");
            }
        }
        Step::Redo => session.redo(collab).await?,
        Step::Checkout { index } => session.checkout_to(*index, collab)?,
        Step::Scope { scope } => session.set_scope(*scope),
    }
    Ok(())
}

fn print_row(row: &CommitSummary) {
    let marker = if row.is_head { "*" } else { " " };
    let short_hash = &row.hash[..row.hash.len().min(12)];
    let reviewed = if row.reviewed { "" } else { " [unreviewed]" };
    println!(
        "{marker} {:>3}  {}  {:<22} {:<12} {}  {short_hash}{reviewed}",
        row.index,
        row.time,
        row.commit_type.as_str(),
        row.feature_name,
        row.description,
    );
}
