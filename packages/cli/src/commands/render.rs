use super::read_template;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use labelforge_editor::EditorState;
use labelforge_render::{render_tree, RenderContext, RenderMode, VNode};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Template document to render
    pub template: PathBuf,

    /// Render mode (edit, preview, live); defaults to the configured mode
    #[arg(short, long)]
    pub mode: Option<RenderMode>,

    /// Write HTML here instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

pub fn render(args: RenderArgs, cwd: &Path, config: &Config) -> Result<()> {
    let template_path = cwd.join(&args.template);
    let mode = args.mode.unwrap_or(config.default_mode);
    let html = render_html(&template_path, mode)?;

    match args.out {
        Some(out) => {
            let out = cwd.join(out);
            if let Some(parent) = out.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&out, &html)?;
            info!(mode = %mode, out = %out.display(), "Rendered template");
            println!("  {} {} → {}", "✓".green(), args.template.display(), out.display());
        }
        None => println!("{html}"),
    }
    Ok(())
}

pub(crate) fn render_html(path: &Path, mode: RenderMode) -> Result<String> {
    let state = EditorState::with_elements(read_template(path)?);
    let ctx = RenderContext::with_mode(&state, mode);
    Ok(render_tree(&ctx).iter().map(VNode::to_html).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = r#"[{"id":"__body","type":"__body","name":"Body","styles":{},"content":[
        {"id":"t","type":"text","name":"Text","styles":{},"content":{"innerText":"Hello <world>"}}
    ]}]"#;

    #[test]
    fn test_render_writes_html_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("t.json"), TEMPLATE).unwrap();

        let args = RenderArgs {
            template: "t.json".into(),
            mode: Some(RenderMode::Preview),
            out: Some("out/t.html".into()),
        };
        render(args, dir.path(), &Config::default()).unwrap();

        let html = fs::read_to_string(dir.path().join("out/t.html")).unwrap();
        assert!(html.contains("Hello &lt;world&gt;"));
        assert!(!html.contains("data-frame-for"));
    }

    #[test]
    fn test_edit_mode_has_chrome() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.json");
        fs::write(&path, TEMPLATE).unwrap();

        let html = render_html(&path, RenderMode::Edit).unwrap();
        assert!(html.contains("data-frame-for=\"t\""));
    }
}
