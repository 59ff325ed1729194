//! # Edit Session
//!
//! One user editing one template: loads it from the [`TemplateStore`], keeps
//! an [`Editor`] over it, runs the I/O-backed element flows, and saves it back.
//!
//! I/O never happens inside the reducer. Each flow is split in two:
//!
//! ```text
//! begin_upload(id) ──▶ RequestTicket ──(caller awaits the service)──▶ complete_upload(ticket, result)
//! ```
//!
//! `complete_*` applies the result with a single `UPDATE_ELEMENT`. Results
//! that arrive after the session closed, for unknown tickets, or for elements
//! deleted in the meantime are dropped. Service failures become
//! notifications and leave the tree untouched.

use crate::editor::{Editor, EditorOptions};
use crate::errors::{EditorError, EditorResult};
use crate::state::{Command, EditorState};
use labelforge_model::{
    deserialize_lenient, find_element, get_template_seed, Element, ElementContent, ElementId,
    ElementType, IdGenerator,
};
use labelforge_services::{
    AiTextService, FileUpload, Notification, Notifier, ServiceResult, TemplateDraft,
    TemplateRecord, TemplateStore, Transcript, TranscriptionRequest, Translation,
    TranslationRequest, UploadService, UploadedFile,
};
use tracing::{debug, info, warn};

/// Name given to templates that do not exist yet
pub const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub editor: EditorOptions,
    /// Model used for translation unless the element names one
    pub translation_model: String,
    pub transcription_model: String,
    pub api_key: String,
    /// Language assumed when an element does not name one
    pub default_language: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            editor: EditorOptions::default(),
            translation_model: "gpt-4o-mini".to_string(),
            transcription_model: "whisper-1".to_string(),
            api_key: String::new(),
            default_language: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Upload,
    Translation,
    Transcription,
}

/// An in-flight side-effect request for one element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub id: u64,
    pub element_id: ElementId,
    pub kind: RequestKind,
}

pub struct EditSession<'s, S, N> {
    template_id: String,
    name: String,
    editor: Editor,
    ids: IdGenerator,
    store: &'s S,
    notifier: &'s N,
    options: SessionOptions,
    pending: Vec<RequestTicket>,
    next_ticket: u64,
    closed: bool,
}

impl<'s, S: TemplateStore, N: Notifier> EditSession<'s, S, N> {
    /// Open `template_id` for editing.
    ///
    /// A missing template opens as an empty root. An unreadable or
    /// unreachable one does too, and the user is notified.
    pub async fn open(
        template_id: &str,
        store: &'s S,
        notifier: &'s N,
        options: SessionOptions,
    ) -> Self {
        let (name, elements) = match store.load(template_id).await {
            Ok(Some(record)) => {
                let loaded = deserialize_lenient(&record.content);
                if let Some(error) = loaded.error {
                    notifier.notify(Notification::error(
                        "Template could not be read",
                        error.to_string(),
                    ));
                }
                (record.name, loaded.elements)
            }
            Ok(None) => {
                info!(template_id, "Template not found, starting a new one");
                (UNTITLED.to_string(), Vec::new())
            }
            Err(error) => {
                warn!(template_id, error = %error, "Failed to load template");
                notifier.notify(Notification::error(
                    "Could not load template",
                    error.to_string(),
                ));
                (UNTITLED.to_string(), Vec::new())
            }
        };

        let editor = Editor::with_elements(elements, options.editor);
        let ids = IdGenerator::resume(get_template_seed(template_id), editor.elements());

        Self {
            template_id: template_id.to_string(),
            name,
            editor,
            ids,
            store,
            notifier,
            options,
            pending: Vec::new(),
            next_ticket: 1,
            closed: false,
        }
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn state(&self) -> &EditorState {
        self.editor.state()
    }

    pub fn dispatch(&mut self, command: Command) -> bool {
        self.editor.dispatch(command)
    }

    /// A fresh element of `element_type` with a newly minted id
    pub fn new_element(&mut self, element_type: ElementType) -> Element {
        Element::new(self.ids.new_id(), element_type)
    }

    pub fn pending(&self) -> &[RequestTicket] {
        &self.pending
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Stop accepting results; in-flight requests are forgotten
    pub fn close(&mut self) {
        if !self.pending.is_empty() {
            debug!(pending = self.pending.len(), "Closing session with requests in flight");
        }
        self.pending.clear();
        self.closed = true;
    }

    /// Serialize the tree and write it to the store
    pub async fn save(&mut self) -> EditorResult<TemplateRecord> {
        self.ensure_open()?;
        let draft = TemplateDraft {
            name: self.name.clone(),
            content: self.editor.to_json()?,
        };

        match self.store.save(&self.template_id, draft).await {
            Ok(record) => {
                info!(template_id = %self.template_id, "Template saved");
                self.notifier
                    .notify(Notification::success("Template saved", record.name.clone()));
                Ok(record)
            }
            Err(error) => {
                warn!(template_id = %self.template_id, error = %error, "Failed to save template");
                self.notifier
                    .notify(Notification::error("Could not save template", error.to_string()));
                Err(error.into())
            }
        }
    }

    /// Start an upload whose url will become the `src` of `element_id`
    pub fn begin_upload(&mut self, element_id: &ElementId) -> EditorResult<RequestTicket> {
        self.ensure_open()?;
        let element = self.element(element_id)?;
        match element.content {
            ElementContent::Media(_) | ElementContent::Recording(_) => {}
            _ => return Err(unsupported(element_id, "upload")),
        }
        Ok(self.issue(element_id, RequestKind::Upload))
    }

    pub fn complete_upload(
        &mut self,
        ticket: &RequestTicket,
        result: ServiceResult<UploadedFile>,
    ) -> bool {
        let Some((mut element, file)) =
            self.settle(ticket, RequestKind::Upload, result, "Upload failed")
        else {
            return false;
        };
        match &mut element.content {
            ElementContent::Media(media) => media.src = file.url,
            ElementContent::Recording(recording) => recording.src = file.url,
            _ => return false,
        }
        self.apply(element, "Upload complete")
    }

    /// Start translating the text of a dynamic-text element's translation
    /// target into the element's target language
    pub fn begin_translation(
        &mut self,
        element_id: &ElementId,
    ) -> EditorResult<(RequestTicket, TranslationRequest)> {
        self.ensure_open()?;
        let element = self.element(element_id)?;
        let ElementContent::DynamicText(content) = &element.content else {
            return Err(unsupported(element_id, "translation"));
        };

        let target_id = content
            .translation_target
            .as_deref()
            .map(ElementId::from)
            .ok_or_else(|| missing(element_id, "translationTarget"))?;
        let target_language = content
            .target_language
            .clone()
            .ok_or_else(|| missing(element_id, "targetLanguage"))?;

        // Soft reference: the source may have been deleted since it was set.
        let source = find_element(self.editor.elements(), &target_id)
            .ok_or_else(|| EditorError::ElementNotFound(target_id.clone()))?;
        let text = match &source.content {
            ElementContent::Text(text) => text.inner_text.clone(),
            ElementContent::DynamicText(text) => text.inner_text.clone(),
            ElementContent::Link(link) => link.inner_text.clone(),
            ElementContent::InputText(input) => input.value.clone(),
            _ => return Err(unsupported(&target_id, "translation source")),
        };

        let request = TranslationRequest {
            text,
            source_lang: content
                .source_language
                .clone()
                .unwrap_or_else(|| self.options.default_language.clone()),
            target_lang: target_language,
            model: content
                .model
                .clone()
                .unwrap_or_else(|| self.options.translation_model.clone()),
            api_key: self.options.api_key.clone(),
        };
        Ok((self.issue(element_id, RequestKind::Translation), request))
    }

    pub fn complete_translation(
        &mut self,
        ticket: &RequestTicket,
        result: ServiceResult<Translation>,
    ) -> bool {
        let Some((mut element, translation)) =
            self.settle(ticket, RequestKind::Translation, result, "Translation failed")
        else {
            return false;
        };
        match &mut element.content {
            ElementContent::DynamicText(content) => content.inner_text = translation.translation,
            _ => return false,
        }
        self.apply(element, "Translation ready")
    }

    /// Start transcribing the recorded or linked audio/video of `element_id`
    pub fn begin_transcription(
        &mut self,
        element_id: &ElementId,
    ) -> EditorResult<(RequestTicket, TranscriptionRequest)> {
        self.ensure_open()?;
        let element = self.element(element_id)?;
        let (src, language) = match (&element.element_type, &element.content) {
            (_, ElementContent::Recording(recording)) => {
                (recording.src.clone(), recording.language.clone())
            }
            (
                ElementType::Audio
                | ElementType::DynamicAudio
                | ElementType::Video
                | ElementType::DynamicVideo,
                ElementContent::Media(media),
            ) => (media.src.clone(), None),
            _ => return Err(unsupported(element_id, "transcription")),
        };
        if src.is_empty() {
            return Err(missing(element_id, "src"));
        }

        let request = TranscriptionRequest {
            audio_url: src,
            model: self.options.transcription_model.clone(),
            api_key: self.options.api_key.clone(),
            language: language.unwrap_or_else(|| self.options.default_language.clone()),
        };
        Ok((self.issue(element_id, RequestKind::Transcription), request))
    }

    pub fn complete_transcription(
        &mut self,
        ticket: &RequestTicket,
        result: ServiceResult<Transcript>,
    ) -> bool {
        let Some((mut element, transcript)) =
            self.settle(ticket, RequestKind::Transcription, result, "Transcription failed")
        else {
            return false;
        };
        match &mut element.content {
            ElementContent::Media(media) => media.transcript = Some(transcript.transcript),
            ElementContent::Recording(recording) => {
                recording.transcript = Some(transcript.transcript)
            }
            _ => return false,
        }
        self.apply(element, "Transcript ready")
    }

    /// Upload `file` and put its url into `element_id`
    pub async fn upload_media<U: UploadService>(
        &mut self,
        uploads: &U,
        element_id: &ElementId,
        file: FileUpload,
    ) -> EditorResult<bool> {
        let ticket = self.begin_upload(element_id)?;
        let result = uploads.upload(file).await;
        Ok(self.complete_upload(&ticket, result))
    }

    pub async fn translate_element<A: AiTextService>(
        &mut self,
        ai: &A,
        element_id: &ElementId,
    ) -> EditorResult<bool> {
        let (ticket, request) = self.begin_translation(element_id)?;
        let result = ai.translate(request).await;
        Ok(self.complete_translation(&ticket, result))
    }

    pub async fn transcribe_element<A: AiTextService>(
        &mut self,
        ai: &A,
        element_id: &ElementId,
    ) -> EditorResult<bool> {
        let (ticket, request) = self.begin_transcription(element_id)?;
        let result = ai.transcribe(request).await;
        Ok(self.complete_transcription(&ticket, result))
    }

    fn ensure_open(&self) -> EditorResult<()> {
        if self.closed {
            Err(EditorError::SessionClosed)
        } else {
            Ok(())
        }
    }

    fn element(&self, id: &ElementId) -> EditorResult<&Element> {
        find_element(self.editor.elements(), id).ok_or_else(|| EditorError::ElementNotFound(id.clone()))
    }

    fn issue(&mut self, element_id: &ElementId, kind: RequestKind) -> RequestTicket {
        let ticket = RequestTicket {
            id: self.next_ticket,
            element_id: element_id.clone(),
            kind,
        };
        self.next_ticket += 1;
        self.pending.push(ticket.clone());
        debug!(ticket = ticket.id, element = %element_id, ?kind, "Request started");
        ticket
    }

    /// Retire `ticket` and resolve its element. `None` when the result must
    /// be dropped.
    fn settle<T>(
        &mut self,
        ticket: &RequestTicket,
        kind: RequestKind,
        result: ServiceResult<T>,
        failure_title: &str,
    ) -> Option<(Element, T)> {
        if self.closed {
            debug!(ticket = ticket.id, "Dropping result for a closed session");
            return None;
        }
        if ticket.kind != kind {
            debug!(
                ticket = ticket.id,
                expected = ?kind,
                got = ?ticket.kind,
                "Ticket is for another kind of request"
            );
            return None;
        }
        let index = self.pending.iter().position(|t| t == ticket)?;
        self.pending.remove(index);

        let value = match result {
            Ok(value) => value,
            Err(error) => {
                warn!(ticket = ticket.id, error = %error, "Request failed");
                self.notifier
                    .notify(Notification::error(failure_title, error.to_string()));
                return None;
            }
        };

        match find_element(self.editor.elements(), &ticket.element_id) {
            Some(element) => Some((element.clone(), value)),
            None => {
                debug!(element = %ticket.element_id, "Element deleted while request was in flight");
                None
            }
        }
    }

    fn apply(&mut self, element: Element, message: &str) -> bool {
        let changed = self.editor.dispatch(Command::update(element));
        if changed {
            self.notifier.notify(Notification::success(message, self.name.clone()));
        }
        changed
    }
}

fn unsupported(element_id: &ElementId, action: &'static str) -> EditorError {
    EditorError::Unsupported {
        element_id: element_id.clone(),
        action,
    }
}

fn missing(element_id: &ElementId, field: &'static str) -> EditorError {
    EditorError::MissingField {
        element_id: element_id.clone(),
        field,
    }
}
