//! Template store over a directory of `<id>.json` files

use chrono::{DateTime, Utc};
use labelforge_services::{ServiceError, ServiceResult, TemplateDraft, TemplateRecord, TemplateStore};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct FileTemplateStore {
    dir: PathBuf,
}

impl FileTemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Document path of `id`. Ids that could leave the templates directory
    /// are rejected.
    pub fn path_for(&self, id: &str) -> ServiceResult<PathBuf> {
        let escapes = id.is_empty()
            || id == "."
            || id == ".."
            || id.contains(['/', '\\'])
            || Path::new(id).is_absolute();
        if escapes {
            return Err(ServiceError::Storage(format!("invalid template id '{id}'")));
        }
        Ok(self.dir.join(format!("{id}.json")))
    }
}

fn storage_error(path: &Path, error: std::io::Error) -> ServiceError {
    ServiceError::Storage(format!("{}: {}", path.display(), error))
}

impl TemplateStore for FileTemplateStore {
    async fn load(&self, id: &str) -> ServiceResult<Option<TemplateRecord>> {
        let path = self.path_for(id)?;
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage_error(&path, e)),
        };
        let updated_at = tokio::fs::metadata(&path)
            .await
            .and_then(|meta| meta.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        debug!(path = %path.display(), "Loaded template file");
        Ok(Some(TemplateRecord {
            id: id.to_string(),
            name: id.to_string(),
            content,
            updated_at,
        }))
    }

    async fn save(&self, id: &str, draft: TemplateDraft) -> ServiceResult<TemplateRecord> {
        let path = self.path_for(id)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| storage_error(&self.dir, e))?;
        tokio::fs::write(&path, &draft.content)
            .await
            .map_err(|e| storage_error(&path, e))?;

        debug!(path = %path.display(), "Wrote template file");
        Ok(TemplateRecord {
            id: id.to_string(),
            name: draft.name,
            content: draft.content,
            updated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTemplateStore::new(dir.path());
        assert!(store.load("nothing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTemplateStore::new(dir.path().join("nested"));
        let draft = TemplateDraft {
            name: "survey".into(),
            content: "[]".into(),
        };

        store.save("survey", draft).await.unwrap();
        let record = store.load("survey").await.unwrap().unwrap();
        assert_eq!(record.content, "[]");
        assert!(store.path_for("survey").unwrap().ends_with("nested/survey.json"));
    }

    #[tokio::test]
    async fn test_ids_cannot_escape_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTemplateStore::new(dir.path().join("templates"));
        let draft = || TemplateDraft {
            name: "x".into(),
            content: "[]".into(),
        };

        for id in ["../x", "a/b", "..\\x", "", ".."] {
            assert!(store.path_for(id).is_err(), "{id:?} should be rejected");
            assert!(store.save(id, draft()).await.is_err());
            assert!(store.load(id).await.is_err());
        }
        assert!(!dir.path().join("x.json").exists());
        assert!(store.path_for("survey-2").is_ok());
    }
}
