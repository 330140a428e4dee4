//! Lyrics generation domain: request validation, prompt construction,
//! response parsing, and the orchestrating service.

mod catalog;
mod error;
mod models;
mod parser;
mod prompt;
mod service;
mod words;

pub use catalog::{
    is_valid_emotion, is_valid_genre, is_valid_language, VALID_EMOTIONS, VALID_GENRES,
    VALID_LANGUAGES,
};
pub use error::{GenerateError, ValidationError};
pub use models::{
    GeneratedLyrics, GenerationRequest, LyricsMetadata, LyricsResponse, SectionMap, SongStructure,
};
pub use parser::parse_lyrics;
pub use prompt::{build_prompt, system_prompt};
pub use service::LyricsService;
pub use words::count_words;
