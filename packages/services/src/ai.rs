//! AI text provider: translation and transcription

use crate::error::{ServiceError, ServiceResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
    pub model: String,
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub translation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionRequest {
    pub audio_url: String,
    pub model: String,
    pub api_key: String,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub transcript: String,
}

pub trait AiTextService: Send + Sync {
    fn translate(
        &self,
        request: TranslationRequest,
    ) -> impl Future<Output = ServiceResult<Translation>> + Send;

    fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> impl Future<Output = ServiceResult<Transcript>> + Send;
}

/// Deterministic provider: translations are looked up in a phrase table,
/// transcripts by audio url.
#[derive(Debug, Default, Clone)]
pub struct CannedAiService {
    phrases: HashMap<(String, String), String>,
    transcripts: HashMap<String, String>,
}

impl CannedAiService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_translation(
        mut self,
        text: impl Into<String>,
        target_lang: impl Into<String>,
        translation: impl Into<String>,
    ) -> Self {
        self.phrases
            .insert((text.into(), target_lang.into()), translation.into());
        self
    }

    pub fn with_transcript(mut self, audio_url: impl Into<String>, transcript: impl Into<String>) -> Self {
        self.transcripts.insert(audio_url.into(), transcript.into());
        self
    }
}

impl AiTextService for CannedAiService {
    async fn translate(&self, request: TranslationRequest) -> ServiceResult<Translation> {
        self.phrases
            .get(&(request.text.clone(), request.target_lang.clone()))
            .map(|translation| Translation {
                translation: translation.clone(),
            })
            .ok_or_else(|| {
                ServiceError::Ai(format!(
                    "no translation of '{}' into {}",
                    request.text, request.target_lang
                ))
            })
    }

    async fn transcribe(&self, request: TranscriptionRequest) -> ServiceResult<Transcript> {
        self.transcripts
            .get(&request.audio_url)
            .map(|transcript| Transcript {
                transcript: transcript.clone(),
            })
            .ok_or_else(|| ServiceError::Ai(format!("cannot transcribe {}", request.audio_url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translation_request(text: &str, target_lang: &str) -> TranslationRequest {
        TranslationRequest {
            text: text.into(),
            source_lang: "en".into(),
            target_lang: target_lang.into(),
            model: "test-model".into(),
            api_key: "key".into(),
        }
    }

    #[tokio::test]
    async fn test_canned_translation_lookup() {
        let ai = CannedAiService::new().with_translation("Hello", "es", "Hola");

        let hit = ai.translate(translation_request("Hello", "es")).await.unwrap();
        assert_eq!(hit.translation, "Hola");

        let miss = ai.translate(translation_request("Hello", "fr")).await;
        assert!(matches!(miss, Err(ServiceError::Ai(_))));
    }

    #[tokio::test]
    async fn test_canned_transcription_lookup() {
        let ai = CannedAiService::new().with_transcript("memory://a.webm", "a cat meows");
        let request = TranscriptionRequest {
            audio_url: "memory://a.webm".into(),
            model: "whisper".into(),
            api_key: "key".into(),
            language: "en".into(),
        };

        assert_eq!(ai.transcribe(request).await.unwrap().transcript, "a cat meows");
    }

    #[test]
    fn test_request_wire_names() {
        let json = serde_json::to_value(translation_request("Hi", "de")).unwrap();
        assert_eq!(json["sourceLang"], "en");
        assert_eq!(json["targetLang"], "de");
        assert_eq!(json["apiKey"], "key");
    }
}
