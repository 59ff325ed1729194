//! File/blob upload

use crate::error::{ServiceError, ServiceResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use tokio::sync::Mutex;

/// A file picked or recorded by the user
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub url: String,
}

pub trait UploadService: Send + Sync {
    fn upload(&self, file: FileUpload) -> impl Future<Output = ServiceResult<UploadedFile>> + Send;
}

/// Keeps uploads in memory and hands out `memory://` urls
#[derive(Debug, Default)]
pub struct MemoryUploadService {
    files: Mutex<HashMap<String, FileUpload>>,
}

impl MemoryUploadService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, url: &str) -> Option<FileUpload> {
        self.files.lock().await.get(url).cloned()
    }
}

impl UploadService for MemoryUploadService {
    async fn upload(&self, file: FileUpload) -> ServiceResult<UploadedFile> {
        if file.bytes.is_empty() {
            return Err(ServiceError::Upload(format!("{} is empty", file.file_name)));
        }

        let mut files = self.files.lock().await;
        let url = format!("memory://uploads/{}/{}", files.len() + 1, file.file_name);
        files.insert(url.clone(), file);
        Ok(UploadedFile { url })
    }
}
