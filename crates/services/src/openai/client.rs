use async_trait::async_trait;
use base64::Engine;
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use ambience_config::OpenAiSettings;
use ambience_store::{Transcription, Word};

use super::{AiError, Summarizer, Transcriber};

const SUMMARY_SYSTEM_PROMPT: &str =
    "You are a part of a system that summarizes audio files into extremely short titles.";
const SUMMARY_USER_PROMPT: &str = "Summarize the following audio in no more than 10 words. \
     This should be a title-like summary, not a full sentence summary.";

/// OpenAI REST client covering both AI tasks: Whisper transcription with
/// word timestamps and an audio-modality chat completion for the title
/// summary.
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    transcribe_model: String,
    summary_model: String,
}

#[derive(Deserialize)]
struct VerboseTranscription {
    text: String,
    #[serde(default)]
    words: Vec<TranscribedWord>,
}

#[derive(Deserialize)]
struct TranscribedWord {
    word: String,
    start: f64,
    end: f64,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    modalities: Vec<String>,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: ChatContent,
}

#[derive(Serialize)]
#[serde(untagged)]
enum ChatContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "input_audio")]
    InputAudio { input_audio: InputAudio },
}

#[derive(Serialize)]
struct InputAudio {
    data: String,
    format: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(settings: &OpenAiSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.clone(),
            transcribe_model: settings.transcribe_model.clone(),
            summary_model: settings.summary_model.clone(),
        }
    }

    fn api_key(&self) -> Result<&str, AiError> {
        self.api_key.as_deref().ok_or(AiError::NoApiKey)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, AiError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AiError::Api { status, body })
    }
}

#[async_trait]
impl Transcriber for OpenAiClient {
    async fn transcribe(&self, audio: &[u8]) -> Result<Transcription, AiError> {
        let api_key = self.api_key()?;
        let url = format!("{}/audio/transcriptions", self.base_url);

        let part = multipart::Part::bytes(audio.to_vec())
            .file_name("audio.mp3")
            .mime_str("audio/mpeg")
            .map_err(AiError::Request)?;
        let form = multipart::Form::new()
            .text("model", self.transcribe_model.clone())
            .text("response_format", "verbose_json")
            .text("timestamp_granularities[]", "word")
            .part("file", part);

        debug!(model = %self.transcribe_model, bytes = audio.len(), "requesting transcription");
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await?;
        let body: VerboseTranscription = Self::check(response).await?.json().await?;

        info!(
            chars = body.text.len(),
            words = body.words.len(),
            "transcription received"
        );
        Ok(Transcription {
            text: body.text,
            words: body
                .words
                .into_iter()
                .map(|w| Word {
                    word: w.word,
                    start: w.start,
                    end: w.end,
                })
                .collect(),
        })
    }
}

#[async_trait]
impl Summarizer for OpenAiClient {
    async fn summarize(&self, audio: &[u8]) -> Result<String, AiError> {
        let api_key = self.api_key()?;
        let url = format!("{}/chat/completions", self.base_url);
        let b64 = base64::engine::general_purpose::STANDARD.encode(audio);

        let request = ChatRequest {
            model: self.summary_model.clone(),
            modalities: vec!["text".to_string()],
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: ChatContent::Text(SUMMARY_SYSTEM_PROMPT.to_string()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: ChatContent::Parts(vec![
                        ContentPart::Text {
                            text: SUMMARY_USER_PROMPT.to_string(),
                        },
                        ContentPart::InputAudio {
                            input_audio: InputAudio {
                                data: b64,
                                format: "mp3".to_string(),
                            },
                        },
                    ]),
                },
            ],
        };

        debug!(model = %self.summary_model, bytes = audio.len(), "requesting summary");
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;
        let body: ChatResponse = Self::check(response).await?.json().await?;

        let summary = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "No summary".to_string());
        info!(%summary, "summary received");
        Ok(summary)
    }
}
