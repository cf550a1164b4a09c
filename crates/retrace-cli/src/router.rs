//! Command routing logic for CLI

use retrace_core::config::{RetraceConfig, load_config};
use retrace_core::error::RetraceResult;

use crate::args::{Cli, Commands};
use crate::commands::{self, CommandContext};
use crate::logging;

/// Load configuration, install logging and run the selected command
pub async fn route(cli: Cli) -> RetraceResult<()> {
    let config = build_config(&cli)?;
    logging::init(&config.logging, cli.verbose);
    tracing::debug!("Using session storage at {}", config.storage.directory.display());

    let ctx = CommandContext::new(config, cli.verbose, cli.json);

    match cli.command {
        Commands::List => commands::session::list(&ctx).await,
        Commands::Show { session } => commands::session::show(&ctx, &session).await,
        Commands::Delete { session } => commands::session::delete(&ctx, &session).await,
        Commands::Export {
            session,
            output_dir,
        } => commands::session::export(&ctx, &session, output_dir.as_deref()).await,
        Commands::Import { path } => commands::session::import(&ctx, &path).await,
        Commands::Jump { session, tick } => commands::inspect::jump(&ctx, &session, tick).await,
        Commands::Range { session, from, to } => {
            commands::inspect::range(&ctx, &session, from, to).await
        }
        Commands::Changes { session, variable } => {
            commands::inspect::changes(&ctx, &session, &variable).await
        }
        Commands::Diff { a, b, all } => commands::compare::diff(&ctx, &a, &b, all).await,
        Commands::Regress { working, failing } => {
            commands::compare::regress(&ctx, &working, &failing).await
        }
        Commands::Replay(args) => commands::replay::run(&ctx, args).await,
        Commands::Record(args) => commands::record::run(&ctx, args).await,
    }
}

fn build_config(cli: &Cli) -> RetraceResult<RetraceConfig> {
    let mut config = load_config(Some(cli.config_file.as_path()))?;
    if let Some(dir) = &cli.storage_dir {
        config.storage.directory = dir.clone();
    }
    Ok(config)
}
