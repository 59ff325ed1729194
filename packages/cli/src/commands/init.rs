use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use labelforge_model::{
    serialize, CheckboxContent, Element, ElementContent, ElementType, IdGenerator, TextContent,
};
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Templates directory
    #[arg(short, long, default_value = "templates")]
    pub templates_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Labelforge project...".bright_blue().bold());

    let templates_dir = cwd.join(&args.templates_dir);
    if !templates_dir.exists() {
        fs::create_dir_all(&templates_dir)?;
        println!("  {} Created {}/", "✓".green(), args.templates_dir);
    }

    let example_file = templates_dir.join("example.json");
    if !example_file.exists() {
        fs::write(&example_file, serialize(&example_template())?)?;
        println!("  {} Created example.json", "✓".green());
    }

    let config = Config {
        templates_dir: args.templates_dir.clone(),
        ..Config::default()
    };
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}/example.json", args.templates_dir);
    println!("  2. Run: labelforge check");
    println!("  3. Run: labelforge render {}/example.json", args.templates_dir);

    Ok(())
}

/// A small labelling task: an instruction and a question to answer
fn example_template() -> Vec<Element> {
    let mut ids = IdGenerator::new("example");

    let instruction = Element::new(ids.new_id(), ElementType::Text)
        .with_name("Instruction")
        .with_style("fontSize", "18px")
        .with_content(ElementContent::Text(TextContent {
            inner_text: "Which animals appear in the image?".into(),
            ..Default::default()
        }));
    let image = Element::new(ids.new_id(), ElementType::Image).with_name("Image");
    let question = Element::new(ids.new_id(), ElementType::Checkbox)
        .with_name("Animals")
        .with_content(ElementContent::Checkbox(CheckboxContent {
            title: "Animals present".into(),
            checkboxes: vec!["cat".into(), "dog".into(), "bird".into()],
            ..Default::default()
        }));

    let column = Element::new(ids.new_id(), ElementType::Container)
        .with_children(vec![instruction, image, question]);
    vec![Element::root().with_children(vec![column])]
}
