//! Paced replay command

use std::sync::Arc;

use colored::*;
use indicatif::ProgressBar;
use retrace_core::error::{RetraceError, RetraceResult};
use retrace_core::replay::{ReplayEngine, ReplayEvent, ReplayOptions, VariableOverride};
use retrace_core::timeline::Value;

use super::CommandContext;
use crate::args::ReplayArgs;

/// Replay a session, printing breakpoints and watches as they occur.
///
/// Ctrl-C cancels at the next tick boundary. Overrides change the loaded
/// copy of the session only; nothing is written back to storage.
pub async fn run(ctx: &CommandContext, args: ReplayArgs) -> RetraceResult<()> {
    let manager = ctx.manager().await?;
    let id = manager.resolve_id(&args.session)?;
    let options = build_options(&args)?;

    let engine = ReplayEngine::new(Arc::clone(&manager), ctx.config.replay.clone());
    let mut handle = engine.replay(&id, options)?;

    let cancel = handle.cancellation_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let mut progress: Option<ProgressBar> = None;
    while let Some(event) = handle.next_event().await {
        if ctx.json {
            println!("{}", serde_json::to_string(&event)?);
            continue;
        }

        match event {
            ReplayEvent::Started { total_ticks, .. } => {
                progress = Some(ctx.console.progress_bar(total_ticks));
            }
            ReplayEvent::BreakpointHit { tick } => {
                emit(&progress, format!("{} breakpoint at tick {}", "●".red(), tick));
            }
            ReplayEvent::WatchUpdate { tick, variable } => {
                emit(
                    &progress,
                    format!(
                        "  {:>6}  {} = {}",
                        tick,
                        variable.name.bold(),
                        variable.value
                    ),
                );
            }
            ReplayEvent::Tick { snapshot } => {
                if args.ticks {
                    let location = snapshot
                        .current_frame()
                        .map(|f| f.location())
                        .unwrap_or_default();
                    emit(&progress, format!("  {:>6}  {}", snapshot.tick, location.dimmed()));
                }
                if let Some(pb) = &progress {
                    pb.inc(1);
                }
            }
            ReplayEvent::Completed { ticks_replayed } => {
                if let Some(pb) = progress.take() {
                    pb.finish_and_clear();
                }
                ctx.console
                    .success(&format!("Replayed {} ticks of {}", ticks_replayed, id.short()));
            }
            ReplayEvent::Cancelled { ticks_replayed } => {
                if let Some(pb) = progress.take() {
                    pb.abandon();
                }
                ctx.console.warn(&format!(
                    "Replay cancelled after {} ticks",
                    ticks_replayed
                ));
            }
        }
    }

    interrupt.abort();
    let outcome = handle.finish().await?;
    tracing::debug!("Replay outcome: {:?}", outcome);
    Ok(())
}

fn emit(progress: &Option<ProgressBar>, line: String) {
    match progress {
        Some(pb) => pb.println(line),
        None => println!("{}", line),
    }
}

fn build_options(args: &ReplayArgs) -> RetraceResult<ReplayOptions> {
    let mut options = ReplayOptions::new().with_speed(args.speed);
    options.breakpoints.extend(args.breakpoints.iter().copied());
    options.watch_expressions = args.watches.clone();
    for raw in &args.overrides {
        options.modify_variables.push(parse_override(raw)?);
    }
    options.validate()?;
    Ok(options)
}

/// Parse `TICK:NAME=VALUE`. VALUE is read as JSON, falling back to a string.
fn parse_override(raw: &str) -> RetraceResult<VariableOverride> {
    let invalid = || {
        RetraceError::invalid_input_field(
            format!("expected TICK:NAME=VALUE, got '{}'", raw),
            "set",
        )
    };

    let (tick, rest) = raw.split_once(':').ok_or_else(invalid)?;
    let (name, value) = rest.split_once('=').ok_or_else(invalid)?;
    let tick = tick.trim().parse().map_err(|_| invalid())?;
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid());
    }

    let value = serde_json::from_str::<serde_json::Value>(value)
        .map(Value::from)
        .unwrap_or_else(|_| Value::from(value));
    Ok(VariableOverride::new(tick, name, value))
}
