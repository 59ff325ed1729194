use super::read_template;
use anyhow::Result;
use clap::Args;
use labelforge_editor::collect_responses;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ResponsesArgs {
    /// Filled-in template document
    pub template: PathBuf,

    /// Leave out answers the annotator left blank
    #[arg(long)]
    pub skip_empty: bool,
}

pub fn responses(args: ResponsesArgs, cwd: &Path) -> Result<()> {
    println!("{}", responses_json(&cwd.join(&args.template), args.skip_empty)?);
    Ok(())
}

fn responses_json(path: &Path, skip_empty: bool) -> Result<String> {
    let mut responses = collect_responses(&read_template(path)?);
    if skip_empty {
        responses.retain(|r| !r.value.is_empty());
    }
    Ok(serde_json::to_string_pretty(&responses)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_responses_are_exported_in_document_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filled.json");
        let template = json!([{
            "id": "__body", "type": "__body", "name": "Body", "styles": {},
            "content": [
                { "id": "q", "type": "input-text", "name": "Name", "styles": {}, "content": { "value": "Ada" } },
                { "id": "c", "type": "checkbox", "name": "Pets", "styles": {},
                  "content": { "checkboxes": ["cat", "dog"], "selectedCheckbox": [] } }
            ]
        }]);
        std::fs::write(&path, template.to_string()).unwrap();

        let all: Value = serde_json::from_str(&responses_json(&path, false).unwrap()).unwrap();
        assert_eq!(all[0]["elementId"], "q");
        assert_eq!(all[0]["value"], json!({ "kind": "text", "value": "Ada" }));
        assert_eq!(all[1]["value"]["kind"], "choices");

        let answered: Value = serde_json::from_str(&responses_json(&path, true).unwrap()).unwrap();
        assert_eq!(answered.as_array().unwrap().len(), 1);
    }
}
