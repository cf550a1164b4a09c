//! Record a session from a stream of snapshot drafts

use std::path::Path;

use retrace_core::error::{RetraceError, RetraceResult};
use retrace_core::session::SessionManager;
use retrace_core::timeline::SnapshotDraft;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use super::CommandContext;
use crate::args::RecordArgs;

/// Ingest one JSON snapshot draft per line as a new recording.
///
/// Blank lines are skipped. A malformed line stops the recording; the ticks
/// captured before it are kept and persisted.
pub async fn run(ctx: &CommandContext, args: RecordArgs) -> RetraceResult<()> {
    let manager = ctx.manager().await?;
    let session = manager.start_recording(&args.name, &args.project, &args.entry)?;
    ctx.console
        .info(&format!("Recording session {} from {}", session.id, args.input.display()));

    let ingested = if args.input == Path::new("-") {
        ingest(&manager, BufReader::new(tokio::io::stdin())).await
    } else {
        match tokio::fs::File::open(&args.input).await {
            Ok(file) => ingest(&manager, BufReader::new(file)).await,
            Err(e) => Err(RetraceError::io_with_path(
                format!("Failed to open input: {}", e),
                &args.input,
            )),
        }
    };

    let stopped = manager.stop_recording().await;
    let captured = ingested?;

    match stopped {
        Some(session) if ctx.json => ctx.print_json(&session.summary()),
        Some(session) => {
            ctx.console.success(&format!(
                "Recorded {} ticks into session {}",
                captured, session.id
            ));
            Ok(())
        }
        None => Err(RetraceError::NoActiveSession),
    }
}

async fn ingest<R>(manager: &SessionManager, reader: R) -> RetraceResult<u64>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut line_number = 0;
    let mut captured = 0;

    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        if line.trim().is_empty() {
            continue;
        }
        let draft: SnapshotDraft = serde_json::from_str(&line).map_err(|e| {
            RetraceError::invalid_input(format!("line {}: {}", line_number, e))
        })?;
        manager.capture_snapshot(draft)?;
        captured += 1;
    }

    Ok(captured)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_ingest_skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let manager = SessionManager::in_memory(dir.path());
        manager.start_recording("t", ".", "main").unwrap();

        let input = "{\"variables\": [{\"name\": \"x\", \"value\": {\"kind\": \"int\", \"value\": 1}, \"type\": \"integer\"}]}\n\n{}\n";
        let captured = ingest(&manager, BufReader::new(input.as_bytes()))
            .await
            .unwrap();
        assert_eq!(captured, 2);

        let session = manager.stop_recording().await.unwrap();
        assert_eq!(session.total_ticks, 2);
        assert!(session.snapshot(1).unwrap().variable("x").is_some());
    }

    #[tokio::test]
    async fn test_ingest_reports_bad_line() {
        let dir = TempDir::new().unwrap();
        let manager = SessionManager::in_memory(dir.path());
        manager.start_recording("t", ".", "main").unwrap();

        let err = ingest(&manager, BufReader::new("{}\nnot json\n".as_bytes()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("line 2"));

        let session = manager.stop_recording().await.unwrap();
        assert_eq!(session.total_ticks, 1);
    }
}
