use crate::config::Config;
use crate::store::FileTemplateStore;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use labelforge_editor::{Command, EditSession, EditorOptions, SessionOptions};
use labelforge_services::TracingNotifier;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Template id (file stem under the templates directory)
    pub template_id: String,

    /// JSON file holding an array of editor commands
    pub commands: PathBuf,

    /// Apply the commands without saving the result
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn apply(args: ApplyArgs, cwd: &Path, config: &Config) -> Result<()> {
    let raw = tokio::fs::read_to_string(cwd.join(&args.commands))
        .await
        .with_context(|| format!("Failed to read {}", args.commands.display()))?;
    let commands: Vec<Command> = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid command list in {}", args.commands.display()))?;

    let store = FileTemplateStore::new(config.templates_dir(cwd));
    let path = store.path_for(&args.template_id)?;
    let notifier = TracingNotifier;
    let options = SessionOptions {
        editor: EditorOptions {
            undo_depth: config.undo_depth,
        },
        ..SessionOptions::default()
    };

    let mut session = EditSession::open(&args.template_id, &store, &notifier, options).await;
    let total = commands.len();
    let mut changed = 0;
    for command in commands {
        let kind = command.kind();
        if session.dispatch(command) {
            changed += 1;
        } else {
            info!(command = kind, "Command left the template unchanged");
        }
    }

    println!(
        "  {} {}/{} command(s) changed {}",
        "✓".green(),
        changed,
        total,
        args.template_id.bright_white()
    );

    if args.dry_run {
        println!("{}", session.editor().to_json()?);
    } else {
        session.save().await?;
        println!("  {} Saved {}", "✓".green(), path.display());
    }
    session.close();
    Ok(())
}
