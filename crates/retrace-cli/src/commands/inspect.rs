//! Navigation commands: jump, range, variable history

use colored::*;
use retrace_core::error::RetraceResult;
use retrace_core::timeline::{ExecutionSnapshot, Tick};

use super::CommandContext;

/// Show the state at a tick, or the nearest recorded one
pub async fn jump(ctx: &CommandContext, session: &str, tick: Tick) -> RetraceResult<()> {
    let manager = ctx.manager().await?;
    let id = manager.resolve_id(session)?;

    let Some(snapshot) = manager.jump_to_tick(&id, tick)? else {
        ctx.console.warn(&format!("Session {} has no snapshots", id));
        return Ok(());
    };

    if ctx.json {
        return ctx.print_json(&snapshot);
    }
    if snapshot.tick != tick {
        ctx.console.warn(&format!(
            "Tick {} was not recorded, showing nearest tick {}",
            tick, snapshot.tick
        ));
    }
    print_snapshot(ctx, &snapshot);
    Ok(())
}

/// One line per tick within `from..=to`
pub async fn range(
    ctx: &CommandContext,
    session: &str,
    from: Tick,
    to: Tick,
) -> RetraceResult<()> {
    let manager = ctx.manager().await?;
    let id = manager.resolve_id(session)?;
    let snapshots = manager.snapshot_range(&id, from, to)?;

    if ctx.json {
        return ctx.print_json(&snapshots);
    }

    ctx.console
        .print_header(&format!("Ticks {}..={} of {}", from, to, id.short()));
    for snapshot in &snapshots {
        let location = snapshot
            .current_frame()
            .map(|f| format!("{} {}", f.function_name, f.location()))
            .unwrap_or_else(|| "<no frame>".to_string());
        println!(
            "  {:>6}  {:<40} {} vars, depth {}",
            snapshot.tick.to_string().bold(),
            location,
            snapshot.variables.len(),
            snapshot.depth()
        );
    }
    if snapshots.is_empty() {
        println!("  No ticks recorded in this range");
    }
    Ok(())
}

/// Every tick at which a variable changed
pub async fn changes(ctx: &CommandContext, session: &str, variable: &str) -> RetraceResult<()> {
    let manager = ctx.manager().await?;
    let id = manager.resolve_id(session)?;
    let changes = manager.find_variable_changes(&id, variable)?;

    if ctx.json {
        return ctx.print_json(&changes);
    }

    ctx.console
        .print_header(&format!("Changes of '{}' in {}", variable, id.short()));
    if changes.is_empty() {
        println!("  No changes recorded");
        return Ok(());
    }
    for change in &changes {
        println!(
            "  tick {:>6}  {} {} {}",
            change.tick,
            change.before.to_string().red(),
            "→".dimmed(),
            change.after.to_string().green()
        );
    }
    Ok(())
}

fn print_snapshot(ctx: &CommandContext, snapshot: &ExecutionSnapshot) {
    ctx.console.print_header(&format!("Tick {}", snapshot.tick));
    ctx.console.print_field("captured", snapshot.timestamp.to_rfc3339());
    ctx.console.print_field("heap", format!("{} bytes", snapshot.heap_used));
    if let Some(phase) = &snapshot.event_loop_phase {
        ctx.console.print_field("phase", phase);
    }

    println!();
    println!("  {}", "Call stack".bold());
    for frame in &snapshot.call_stack {
        let marker = if frame.is_async { " (async)" } else { "" };
        println!(
            "    {} {}{}",
            frame.function_name.cyan(),
            frame.location().dimmed(),
            marker
        );
    }

    println!();
    println!("  {}", "Variables".bold());
    for variable in &snapshot.variables {
        let overridden = match &variable.previous_value {
            Some(previous) => format!(" (was {})", previous).yellow().to_string(),
            None => String::new(),
        };
        println!(
            "    {} {} = {}{}",
            variable.name.bold(),
            format!(": {}", variable.type_tag).dimmed(),
            variable.value,
            overridden
        );
    }

    if !snapshot.console_output.is_empty() {
        println!();
        println!("  {}", "Console".bold());
        for entry in &snapshot.console_output {
            println!("    [{:?}] {}", entry.level, entry.message);
        }
    }

    if !snapshot.async_operations.is_empty() || !snapshot.network_requests.is_empty() {
        println!();
        ctx.console
            .print_field("async ops", snapshot.async_operations.len());
        ctx.console
            .print_field("requests", snapshot.network_requests.len());
        ctx.console
            .print_field("file ops", snapshot.file_operations.len());
    }
}
