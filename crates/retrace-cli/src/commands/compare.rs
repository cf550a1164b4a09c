//! Comparison commands: diff and regression search

use colored::*;
use retrace_core::compare::{ChangeKind, CompareOptions};
use retrace_core::error::RetraceResult;

use super::CommandContext;

/// Tick-by-tick differences between two sessions
pub async fn diff(ctx: &CommandContext, a: &str, b: &str, all: bool) -> RetraceResult<()> {
    let manager = ctx.manager().await?;
    let first = manager.resolve_id(a)?;
    let second = manager.resolve_id(b)?;

    let options = if all {
        CompareOptions::all()
    } else {
        CompareOptions::default()
    };
    let diffs = manager.compare_executions_with(&first, &second, &options)?;

    if ctx.json {
        return ctx.print_json(&diffs);
    }

    ctx.console
        .print_header(&format!("{} vs {}", first.short(), second.short()));
    if diffs.is_empty() {
        ctx.console.success("No differences");
        return Ok(());
    }

    for diff in &diffs {
        println!("  {}", diff.summary().bold());
        for change in &diff.changes {
            let tag = match change.kind {
                ChangeKind::Variable => "var".blue(),
                ChangeKind::Callstack => "stack".magenta(),
                ChangeKind::Async => "async".cyan(),
                ChangeKind::Network => "net".yellow(),
            };
            println!("    {:<6} {}", tag, change.description);
        }
    }
    println!();
    println!("  {} ticks differ", diffs.len());
    Ok(())
}

/// First tick at which the failing run departs from the working run
pub async fn regress(ctx: &CommandContext, working: &str, failing: &str) -> RetraceResult<()> {
    let manager = ctx.manager().await?;
    let working = manager.resolve_id(working)?;
    let failing = manager.resolve_id(failing)?;

    let point = manager.locate_regression(&working, &failing)?;

    if ctx.json {
        return ctx.print_json(&point);
    }

    match point {
        Some(point) => {
            ctx.console.warn(&point.summary());
            for change in &point.changes {
                println!("    {}", change.description);
            }
        }
        None => ctx
            .console
            .success("No divergence within the ticks both runs recorded"),
    }
    Ok(())
}
