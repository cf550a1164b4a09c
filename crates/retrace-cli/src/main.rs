//! Retrace CLI application
//!
//! Operator front end for recorded sessions.
//!
//! ```bash
//! retrace list                         # sessions, newest first
//! retrace record trace.jsonl -n login  # ingest snapshot drafts
//! retrace jump <id> 42                 # state at a tick
//! retrace replay <id> --watch count    # paced replay
//! retrace diff <a> <b>                 # tick-by-tick differences
//! retrace regress <working> <failing>  # first divergent tick
//! ```

mod args;
mod commands;
mod console;
mod logging;
mod router;

use clap::Parser;
use retrace_core::error::UnifiedError;

use crate::args::Cli;
use crate::console::CliConsole;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let console = CliConsole::new(cli.verbose);

    if let Err(e) = router::route(cli).await {
        console.error(&format!("[{}] {}", e.error_code(), e));
        std::process::exit(1);
    }
}
