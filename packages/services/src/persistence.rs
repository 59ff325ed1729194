//! Template persistence

use crate::error::{ServiceError, ServiceResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use tokio::sync::Mutex;
use tracing::debug;

/// A stored template. `content` is the serialized element tree, opaque to
/// the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRecord {
    pub id: String,
    pub name: String,
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

/// Fields written on save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDraft {
    pub name: String,
    pub content: String,
}

/// Key-value document store reachable by template id
pub trait TemplateStore: Send + Sync {
    /// Load a template; `Ok(None)` when no template has that id
    fn load(&self, id: &str) -> impl Future<Output = ServiceResult<Option<TemplateRecord>>> + Send;

    /// Create or overwrite a template
    fn save(
        &self,
        id: &str,
        draft: TemplateDraft,
    ) -> impl Future<Output = ServiceResult<TemplateRecord>> + Send;
}

/// Template store backed by a map, for tests and offline tooling
#[derive(Debug, Default)]
pub struct MemoryTemplateStore {
    records: Mutex<HashMap<String, TemplateRecord>>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a template with raw content, bypassing validation
    pub async fn insert_raw(&self, id: &str, name: &str, content: &str) {
        self.records.lock().await.insert(
            id.to_string(),
            TemplateRecord {
                id: id.to_string(),
                name: name.to_string(),
                content: content.to_string(),
                updated_at: Utc::now(),
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

impl TemplateStore for MemoryTemplateStore {
    async fn load(&self, id: &str) -> ServiceResult<Option<TemplateRecord>> {
        Ok(self.records.lock().await.get(id).cloned())
    }

    async fn save(&self, id: &str, draft: TemplateDraft) -> ServiceResult<TemplateRecord> {
        if id.trim().is_empty() {
            return Err(ServiceError::Storage("template id must not be empty".into()));
        }

        let record = TemplateRecord {
            id: id.to_string(),
            name: draft.name,
            content: draft.content,
            updated_at: Utc::now(),
        };
        debug!(template_id = %id, bytes = record.content.len(), "Saved template");
        self.records.lock().await.insert(id.to_string(), record.clone());
        Ok(record)
    }
}
