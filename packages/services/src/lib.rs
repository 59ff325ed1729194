//! # Labelforge Services
//!
//! Interfaces of the collaborators the template editor talks to, and
//! in-memory implementations used by tests and the CLI.
//!
//! | Collaborator | Trait | In-memory |
//! |---|---|---|
//! | Document persistence | [`TemplateStore`] | [`MemoryTemplateStore`] |
//! | File/blob upload | [`UploadService`] | [`MemoryUploadService`] |
//! | AI translation/transcription | [`AiTextService`] | [`CannedAiService`] |
//! | User notifications | [`Notifier`] | [`RecordingNotifier`] |
//!
//! Every async method returns a `Send` future so callers may run requests on
//! any executor. Timeouts are the implementation's business.

mod ai;
mod error;
mod notify;
mod persistence;
mod upload;

pub use ai::{AiTextService, CannedAiService, Transcript, TranscriptionRequest, Translation, TranslationRequest};
pub use error::{ServiceError, ServiceResult};
pub use notify::{Notification, NotificationLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use persistence::{MemoryTemplateStore, TemplateDraft, TemplateRecord, TemplateStore};
pub use upload::{FileUpload, MemoryUploadService, UploadService, UploadedFile};
