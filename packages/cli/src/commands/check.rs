use crate::config::Config;
use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use labelforge_linter::{lint_source, Diagnostic, DiagnosticLevel, LintOptions};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Template files or directories (defaults to the configured templates directory)
    pub paths: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Treat warnings as errors
    #[arg(long)]
    pub deny_warnings: bool,
}

#[derive(Debug, serde::Serialize)]
struct FileReport {
    path: String,
    diagnostics: Vec<Diagnostic>,
}

pub fn check(args: CheckArgs, cwd: &Path, config: &Config) -> Result<()> {
    let roots = if args.paths.is_empty() {
        vec![config.templates_dir(cwd)]
    } else {
        args.paths.iter().map(|p| cwd.join(p)).collect()
    };

    let files = collect_template_files(&roots);
    if files.is_empty() {
        bail!("No template files found");
    }

    let mut reports = Vec::new();
    for path in &files {
        let raw = std::fs::read_to_string(path)?;
        let diagnostics = lint_source(&raw, LintOptions::default());
        debug!(path = %path.display(), count = diagnostics.len(), "Checked template");
        reports.push(FileReport {
            path: path.display().to_string(),
            diagnostics,
        });
    }

    let errors = count_at(&reports, DiagnosticLevel::Error);
    let warnings = count_at(&reports, DiagnosticLevel::Warning);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Text => print_text(&reports, errors, warnings),
    }

    if errors > 0 || (args.deny_warnings && warnings > 0) {
        bail!("Found {} error(s) and {} warning(s)", errors, warnings);
    }
    Ok(())
}

/// Every `*.json` file under the given roots, in a stable order
pub(crate) fn collect_template_files(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = roots
        .iter()
        .flat_map(|root| WalkDir::new(root).into_iter().filter_map(|e| e.ok()))
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    files.dedup();
    files
}

fn count_at(reports: &[FileReport], level: DiagnosticLevel) -> usize {
    reports
        .iter()
        .flat_map(|r| &r.diagnostics)
        .filter(|d| d.level == level)
        .count()
}

fn print_text(reports: &[FileReport], errors: usize, warnings: usize) {
    for report in reports {
        if report.diagnostics.is_empty() {
            println!("  {} {}", "✓".green(), report.path);
            continue;
        }

        println!("  {} {}", "✗".red(), report.path.bright_white());
        for diagnostic in &report.diagnostics {
            let level = match diagnostic.level {
                DiagnosticLevel::Error => "error".red().bold(),
                DiagnosticLevel::Warning => "warning".yellow().bold(),
                DiagnosticLevel::Info => "info".blue().bold(),
            };
            let location = diagnostic
                .element_id
                .as_ref()
                .map(|id| format!(" [{}]", id))
                .unwrap_or_default();
            println!(
                "      {}{}: {} ({})",
                level,
                location,
                diagnostic.message,
                diagnostic.rule.dimmed()
            );
            if let Some(suggestion) = &diagnostic.suggestion {
                println!("        {} {}", "help:".cyan(), suggestion);
            }
        }
    }

    println!();
    println!(
        "{} file(s) checked, {} error(s), {} warning(s)",
        reports.len(),
        errors,
        warnings
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_collects_json_recursively() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("a.json"), "[]").unwrap();
        fs::write(dir.path().join("nested/b.json"), "[]").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let files = collect_template_files(&[dir.path().to_path_buf()]);
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.extension().unwrap() == "json"));
    }

    #[test]
    fn test_broken_template_fails_check() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.json"), "{ nope").unwrap();

        let args = CheckArgs {
            paths: vec![PathBuf::from("broken.json")],
            format: OutputFormat::Json,
            deny_warnings: false,
        };
        assert!(check(args, dir.path(), &Config::default()).is_err());
    }

    #[test]
    fn test_valid_template_passes_check() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("ok.json"),
            r#"[{"id":"__body","type":"__body","name":"Body","styles":{},"content":[]}]"#,
        )
        .unwrap();

        let args = CheckArgs {
            paths: vec![],
            format: OutputFormat::Text,
            deny_warnings: false,
        };
        let config = Config {
            templates_dir: ".".into(),
            ..Config::default()
        };
        assert!(check(args, dir.path(), &config).is_ok());
    }
}
