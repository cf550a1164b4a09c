//! Session index commands

use std::path::Path;

use colored::*;
use retrace_core::error::RetraceResult;
use retrace_core::timeline::{SessionStatus, SessionSummary};

use super::CommandContext;

/// List sessions, newest first
pub async fn list(ctx: &CommandContext) -> RetraceResult<()> {
    let manager = ctx.manager().await?;
    let summaries = manager.summaries();

    if ctx.json {
        return ctx.print_json(&summaries);
    }

    ctx.console.print_header("Sessions");
    if summaries.is_empty() {
        println!("  No sessions recorded in {}", ctx.config.storage.directory.display());
        return Ok(());
    }

    for summary in &summaries {
        print_summary_line(summary);
    }
    println!();
    println!("  {} sessions", summaries.len());
    Ok(())
}

fn print_summary_line(summary: &SessionSummary) {
    let status = match summary.status {
        SessionStatus::Recording => summary.status.to_string().yellow(),
        SessionStatus::Replaying => summary.status.to_string().cyan(),
        SessionStatus::Stopped => summary.status.to_string().dimmed(),
    };
    println!(
        "  {}  {:<24} {:>8} ticks  {}  {}",
        summary.id.short().bold(),
        summary.name,
        summary.total_ticks,
        summary.start_time.format("%Y-%m-%d %H:%M:%S"),
        status
    );
}

/// Show one session's metadata
pub async fn show(ctx: &CommandContext, session: &str) -> RetraceResult<()> {
    let manager = ctx.manager().await?;
    let id = manager.resolve_id(session)?;
    let (summary, metadata, first, last) = manager.with_session(&id, |s| {
        (
            s.summary(),
            s.metadata.clone(),
            s.snapshots.first_tick(),
            s.snapshots.last_tick(),
        )
    })?;

    if ctx.json {
        return ctx.print_json(&summary);
    }

    ctx.console.print_header(&format!("Session {}", summary.name));
    ctx.console.print_field("id", &summary.id);
    ctx.console.print_field("status", summary.status);
    ctx.console.print_field("ticks", summary.total_ticks);
    if let (Some(first), Some(last)) = (first, last) {
        ctx.console.print_field("recorded", format!("{}..={}", first, last));
    }
    ctx.console.print_field("started", summary.start_time.to_rfc3339());
    if let Some(end) = summary.end_time {
        let elapsed = end - summary.start_time;
        ctx.console.print_field(
            "ended",
            format!("{} ({} ms)", end.to_rfc3339(), elapsed.num_milliseconds()),
        );
    }
    if let Some(project) = &metadata.project_path {
        ctx.console.print_field("project", project.display());
    }
    if let Some(entry) = &metadata.entry_point {
        ctx.console.print_field("entry point", entry);
    }
    if let Some(runtime) = &metadata.runtime_version {
        ctx.console.print_field("runtime", runtime);
    }
    Ok(())
}

/// Delete a session
pub async fn delete(ctx: &CommandContext, session: &str) -> RetraceResult<()> {
    let manager = ctx.manager().await?;
    let id = manager.resolve_id(session)?;
    manager.delete_session(&id).await?;

    if ctx.json {
        return ctx.print_json(&serde_json::json!({ "deleted": id }));
    }
    ctx.console.success(&format!("Deleted session {}", id));
    Ok(())
}

/// Export a session to a standalone artifact
pub async fn export(
    ctx: &CommandContext,
    session: &str,
    output_dir: Option<&Path>,
) -> RetraceResult<()> {
    let manager = ctx.manager().await?;
    let id = manager.resolve_id(session)?;
    let path = match output_dir {
        Some(dir) => manager.export_session_to(&id, dir).await?,
        None => manager.export_session(&id).await?,
    };

    if ctx.json {
        return ctx.print_json(&serde_json::json!({ "session_id": id, "path": path }));
    }
    ctx.console
        .success(&format!("Exported {} to {}", id, path.display()));
    Ok(())
}

/// Import an artifact as a new session
pub async fn import(ctx: &CommandContext, path: &Path) -> RetraceResult<()> {
    let manager = ctx.manager().await?;
    let session = manager.import_session(path).await?;

    if ctx.json {
        return ctx.print_json(&session.summary());
    }
    ctx.console.success(&format!(
        "Imported {} as session {} ({} ticks)",
        path.display(),
        session.id,
        session.total_ticks
    ));
    Ok(())
}
