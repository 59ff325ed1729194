//! Edit sessions against the in-memory services

use labelforge_editor::{Command, EditSession, EditorError, RequestKind, SessionOptions, UNTITLED};
use labelforge_model::{
    deserialize, find_element, DynamicTextContent, Element, ElementContent, ElementId,
    ElementType, MediaContent, RecordingContent, TextContent,
};
use labelforge_services::{
    CannedAiService, FileUpload, MemoryTemplateStore, MemoryUploadService, NotificationLevel,
    RecordingNotifier, ServiceError, TemplateStore, Transcript, UploadedFile,
};

const TEMPLATE: &str = r#"[
  {"id":"__body","type":"__body","name":"Body","styles":{},"content":[
    {"id":"q","type":"text","name":"Question","styles":{},"content":{"innerText":"Hello"}},
    {"id":"q-es","type":"dynamic-text","name":"Question (es)","styles":{},
     "content":{"innerText":"","translationTarget":"q","targetLanguage":"es"}},
    {"id":"img","type":"image","name":"Image","styles":{},"content":{"src":""}},
    {"id":"rec","type":"input-record-audio","name":"Answer","styles":{},
     "content":{"src":"memory://rec.webm","language":"en"}}
  ]}
]"#;

async fn seeded_store() -> MemoryTemplateStore {
    let store = MemoryTemplateStore::new();
    store.insert_raw("t1", "Animals", TEMPLATE).await;
    store
}

fn content_of<'a>(session: &'a EditSession<'_, MemoryTemplateStore, RecordingNotifier>, id: &str) -> &'a ElementContent {
    &find_element(session.editor().elements(), &ElementId::from(id))
        .unwrap()
        .content
}

#[tokio::test]
async fn test_open_missing_template_starts_empty() {
    let store = MemoryTemplateStore::new();
    let notifier = RecordingNotifier::new();
    let session = EditSession::open("new", &store, &notifier, SessionOptions::default()).await;

    assert_eq!(session.name(), UNTITLED);
    assert_eq!(session.editor().elements(), &[Element::root()]);
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn test_open_corrupt_template_notifies_and_starts_empty() {
    let store = MemoryTemplateStore::new();
    store.insert_raw("broken", "Broken", "{\"not\": \"a list\"}").await;
    let notifier = RecordingNotifier::new();

    let session = EditSession::open("broken", &store, &notifier, SessionOptions::default()).await;

    assert_eq!(session.name(), "Broken");
    assert_eq!(session.editor().elements(), &[Element::root()]);
    assert_eq!(notifier.errors().len(), 1);
}

#[tokio::test]
async fn test_edit_and_save_roundtrip() {
    let store = seeded_store().await;
    let notifier = RecordingNotifier::new();
    let mut session = EditSession::open("t1", &store, &notifier, SessionOptions::default()).await;

    let element = session.new_element(ElementType::Link);
    assert!(find_element(session.editor().elements(), &element.id).is_none());
    assert!(session.dispatch(Command::add("__body", element.clone())));

    let record = session.save().await.unwrap();
    assert_eq!(record.name, "Animals");

    let stored = store.load("t1").await.unwrap().unwrap();
    let tree = deserialize(&stored.content).unwrap();
    assert!(find_element(&tree, &element.id).is_some());
    assert_eq!(notifier.sent().last().unwrap().level, NotificationLevel::Success);
}

#[tokio::test]
async fn test_new_ids_do_not_collide_after_reopen() {
    let store = MemoryTemplateStore::new();
    let notifier = RecordingNotifier::new();

    let mut first = EditSession::open("t", &store, &notifier, SessionOptions::default()).await;
    let a = first.new_element(ElementType::Text);
    first.dispatch(Command::add("__body", a.clone()));
    first.save().await.unwrap();

    let mut second = EditSession::open("t", &store, &notifier, SessionOptions::default()).await;
    let b = second.new_element(ElementType::Text);
    assert_ne!(a.id, b.id);
    assert!(second.dispatch(Command::add("__body", b)));
}

#[tokio::test]
async fn test_upload_fills_src() {
    let store = seeded_store().await;
    let notifier = RecordingNotifier::new();
    let uploads = MemoryUploadService::new();
    let mut session = EditSession::open("t1", &store, &notifier, SessionOptions::default()).await;

    let applied = session
        .upload_media(&uploads, &"img".into(), FileUpload::new("cat.png", "image/png", vec![1]))
        .await
        .unwrap();

    assert!(applied);
    match content_of(&session, "img") {
        ElementContent::Media(MediaContent { src, .. }) => {
            assert!(src.starts_with("memory://"));
            assert!(uploads.get(src).await.is_some());
        }
        other => panic!("Expected media content, got {other:?}"),
    }
    assert!(session.pending().is_empty());
}

#[tokio::test]
async fn test_upload_rejects_non_media_elements() {
    let store = seeded_store().await;
    let notifier = RecordingNotifier::new();
    let mut session = EditSession::open("t1", &store, &notifier, SessionOptions::default()).await;

    assert!(matches!(
        session.begin_upload(&"q".into()),
        Err(EditorError::Unsupported { action: "upload", .. })
    ));
    assert!(matches!(
        session.begin_upload(&"ghost".into()),
        Err(EditorError::ElementNotFound(_))
    ));
}

#[tokio::test]
async fn test_failed_upload_notifies_and_keeps_tree() {
    let store = seeded_store().await;
    let notifier = RecordingNotifier::new();
    let mut session = EditSession::open("t1", &store, &notifier, SessionOptions::default()).await;
    let before = session.editor().elements().to_vec();

    let ticket = session.begin_upload(&"img".into()).unwrap();
    let applied = session.complete_upload(&ticket, Err(ServiceError::Upload("quota".into())));

    assert!(!applied);
    assert_eq!(session.editor().elements(), before.as_slice());
    assert_eq!(notifier.errors()[0].title, "Upload failed");
}

#[tokio::test]
async fn test_completion_for_deleted_element_is_ignored() {
    let store = seeded_store().await;
    let notifier = RecordingNotifier::new();
    let mut session = EditSession::open("t1", &store, &notifier, SessionOptions::default()).await;

    let ticket = session.begin_upload(&"img".into()).unwrap();
    assert_eq!(ticket.kind, RequestKind::Upload);
    session.dispatch(Command::delete("img"));

    let applied = session.complete_upload(
        &ticket,
        Ok(UploadedFile {
            url: "memory://late.png".into(),
        }),
    );
    assert!(!applied);
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn test_completion_after_close_and_duplicate_completion_are_ignored() {
    let store = seeded_store().await;
    let notifier = RecordingNotifier::new();
    let mut session = EditSession::open("t1", &store, &notifier, SessionOptions::default()).await;
    let done = || {
        Ok(UploadedFile {
            url: "memory://x.png".into(),
        })
    };

    let ticket = session.begin_upload(&"img".into()).unwrap();
    assert!(session.complete_upload(&ticket, done()));
    assert!(!session.complete_upload(&ticket, done()));

    let ticket = session.begin_upload(&"img".into()).unwrap();
    session.close();
    assert!(!session.complete_upload(&ticket, done()));
    assert!(matches!(session.save().await, Err(EditorError::SessionClosed)));
}

#[tokio::test]
async fn test_translation_fills_dynamic_text() {
    let store = seeded_store().await;
    let notifier = RecordingNotifier::new();
    let ai = CannedAiService::new().with_translation("Hello", "es", "Hola");
    let mut session = EditSession::open("t1", &store, &notifier, SessionOptions::default()).await;

    let (_, request) = session.begin_translation(&"q-es".into()).unwrap();
    assert_eq!(request.text, "Hello");
    assert_eq!(request.source_lang, "en");
    assert_eq!(request.target_lang, "es");

    assert!(session.translate_element(&ai, &"q-es".into()).await.unwrap());
    match content_of(&session, "q-es") {
        ElementContent::DynamicText(DynamicTextContent { inner_text, .. }) => {
            assert_eq!(inner_text, "Hola")
        }
        other => panic!("Expected dynamic text, got {other:?}"),
    }
}

#[tokio::test]
async fn test_translation_with_stale_target_is_an_error_not_a_crash() {
    let store = seeded_store().await;
    let notifier = RecordingNotifier::new();
    let mut session = EditSession::open("t1", &store, &notifier, SessionOptions::default()).await;

    session.dispatch(Command::delete("q"));
    assert!(matches!(
        session.begin_translation(&"q-es".into()),
        Err(EditorError::ElementNotFound(id)) if id == "q"
    ));

    // The dangling reference itself is kept.
    match content_of(&session, "q-es") {
        ElementContent::DynamicText(content) => {
            assert_eq!(content.translation_target.as_deref(), Some("q"))
        }
        other => panic!("Expected dynamic text, got {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_translation_notifies() {
    let store = seeded_store().await;
    let notifier = RecordingNotifier::new();
    let ai = CannedAiService::new();
    let mut session = EditSession::open("t1", &store, &notifier, SessionOptions::default()).await;

    assert!(!session.translate_element(&ai, &"q-es".into()).await.unwrap());
    assert_eq!(notifier.errors()[0].title, "Translation failed");
}

#[tokio::test]
async fn test_transcription_fills_transcript() {
    let store = seeded_store().await;
    let notifier = RecordingNotifier::new();
    let ai = CannedAiService::new().with_transcript("memory://rec.webm", "two dogs");
    let mut session = EditSession::open("t1", &store, &notifier, SessionOptions::default()).await;

    assert!(session.transcribe_element(&ai, &"rec".into()).await.unwrap());
    match content_of(&session, "rec") {
        ElementContent::Recording(RecordingContent { transcript, .. }) => {
            assert_eq!(transcript.as_deref(), Some("two dogs"))
        }
        other => panic!("Expected recording content, got {other:?}"),
    }
}

#[tokio::test]
async fn test_transcription_needs_a_source() {
    let store = seeded_store().await;
    let notifier = RecordingNotifier::new();
    let mut session = EditSession::open("t1", &store, &notifier, SessionOptions::default()).await;

    assert!(matches!(
        session.begin_transcription(&"img".into()),
        Err(EditorError::Unsupported { .. })
    ));

    let silent = session.new_element(ElementType::RecordAudio);
    let silent_id = silent.id.clone();
    session.dispatch(Command::add("__body", silent));
    assert!(matches!(
        session.begin_transcription(&silent_id),
        Err(EditorError::MissingField { field: "src", .. })
    ));

    let text = Element::new("t", ElementType::Text).with_content(ElementContent::Text(TextContent::default()));
    session.dispatch(Command::add("__body", text));
    assert!(session.begin_transcription(&"t".into()).is_err());
}

#[tokio::test]
async fn test_ticket_only_completes_its_own_kind_of_request() {
    let store = seeded_store().await;
    let notifier = RecordingNotifier::new();
    let mut session = EditSession::open("t1", &store, &notifier, SessionOptions::default()).await;

    let (ticket, _) = session.begin_transcription(&"rec".into()).unwrap();
    assert_eq!(ticket.kind, RequestKind::Transcription);

    let wrong = UploadedFile {
        url: "memory://uploads/1/other.webm".into(),
    };
    assert!(!session.complete_upload(&ticket, Ok(wrong)));
    match content_of(&session, "rec") {
        ElementContent::Recording(recording) => assert_eq!(recording.src, "memory://rec.webm"),
        other => panic!("Expected recording content, got {other:?}"),
    }
    assert_eq!(session.pending().len(), 1);

    let transcript = Transcript {
        transcript: "a dog barking".into(),
    };
    assert!(session.complete_transcription(&ticket, Ok(transcript)));
    assert!(session.pending().is_empty());
}
