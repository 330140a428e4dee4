//! The generation orchestrator.
//!
//! Validates the request, builds the prompt, calls the completion backend,
//! and reshapes the generated text into the response envelope. Generation
//! either fully succeeds or fully fails; no partial results.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use super::catalog::{
    is_valid_emotion, is_valid_genre, is_valid_language, options_list, VALID_EMOTIONS,
    VALID_GENRES, VALID_LANGUAGES,
};
use super::error::{GenerateError, ValidationError};
use super::models::{GenerationRequest, LyricsMetadata, LyricsResponse};
use super::parser::parse_lyrics;
use super::prompt::{build_prompt, system_prompt};
use super::words::count_words;
use crate::completion::ChatCompletion;

const MAX_KEYWORDS: usize = 10;
const MAX_VERSES: u32 = 4;
const DEFAULT_VERSES: u32 = 2;

/// Orchestrates lyrics generation against a completion backend.
pub struct LyricsService {
    completion: Arc<dyn ChatCompletion>,
}

impl LyricsService {
    pub fn new(completion: Arc<dyn ChatCompletion>) -> Self {
        Self { completion }
    }

    /// Model identifier of the underlying backend.
    pub fn model(&self) -> &str {
        self.completion.model()
    }

    /// Generates lyrics for a request.
    ///
    /// Validation failures carry the offending field's error code and the
    /// valid options; auth and upstream failures carry the underlying detail
    /// for the logs.
    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<LyricsResponse, GenerateError> {
        let request = validate(request)?;
        let prompt = build_prompt(&request);

        let text = self.completion.complete(system_prompt(), &prompt).await?;

        let lyrics = parse_lyrics(&text);
        let word_count = count_words(&text);

        let response = LyricsResponse {
            id: Uuid::new_v4().to_string(),
            lyrics,
            metadata: LyricsMetadata {
                genre: request.genre,
                emotion: request.emotion,
                language: request.language,
                keywords_used: request.keywords,
                created_at: Utc::now(),
                word_count,
            },
        };

        debug!(
            response_id = %response.id,
            word_count,
            title = %response.lyrics.title,
            "Generated lyrics"
        );

        Ok(response)
    }
}

/// Checks input constraints and applies structure defaults.
fn validate(mut request: GenerationRequest) -> Result<GenerationRequest, ValidationError> {
    if request.keywords.is_empty() || request.keywords.len() > MAX_KEYWORDS {
        return Err(ValidationError::new(
            "invalid_request",
            format!("Between 1 and {} keywords are required", MAX_KEYWORDS),
        ));
    }
    if request.keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(ValidationError::new(
            "invalid_request",
            "Keywords must not be empty",
        ));
    }

    if !is_valid_genre(&request.genre) {
        return Err(ValidationError::new(
            "invalid_genre",
            format!(
                "Unsupported genre. Supported genres: {}",
                options_list(&VALID_GENRES)
            ),
        ));
    }
    if !is_valid_emotion(&request.emotion) {
        return Err(ValidationError::new(
            "invalid_emotion",
            format!(
                "Unsupported emotion. Supported emotions: {}",
                options_list(&VALID_EMOTIONS)
            ),
        ));
    }
    if !is_valid_language(&request.language) {
        return Err(ValidationError::new(
            "invalid_language",
            format!(
                "Unsupported language. Supported languages: {}",
                options_list(&VALID_LANGUAGES)
            ),
        ));
    }

    if request.structure.verses > MAX_VERSES {
        return Err(ValidationError::new(
            "invalid_request",
            format!("Number of verses must be between 1 and {}", MAX_VERSES),
        ));
    }
    if request.structure.verses == 0 {
        request.structure.verses = DEFAULT_VERSES;
    }
    // A submitted false is indistinguishable from an omitted field, so the
    // chorus is always coerced on.
    if !request.structure.chorus {
        request.structure.chorus = true;
    }

    Ok(request)
}
