//! Fixed vocabularies a generation request is validated against.

/// Supported genres.
pub const VALID_GENRES: [&str; 12] = [
    "pop",
    "rock",
    "country",
    "hip-hop",
    "r&b",
    "jazz",
    "folk",
    "electronic",
    "classical",
    "reggae",
    "blues",
    "indie",
];

/// Supported emotions.
pub const VALID_EMOTIONS: [&str; 10] = [
    "happy",
    "sad",
    "romantic",
    "energetic",
    "melancholic",
    "hopeful",
    "nostalgic",
    "peaceful",
    "excited",
    "contemplative",
];

/// Supported languages.
pub const VALID_LANGUAGES: [&str; 8] = [
    "english",
    "spanish",
    "french",
    "german",
    "italian",
    "portuguese",
    "japanese",
    "korean",
];

fn contains_case_insensitive(options: &[&str], value: &str) -> bool {
    let lowered = value.to_lowercase();
    options.contains(&lowered.as_str())
}

pub fn is_valid_genre(value: &str) -> bool {
    contains_case_insensitive(&VALID_GENRES, value)
}

pub fn is_valid_emotion(value: &str) -> bool {
    contains_case_insensitive(&VALID_EMOTIONS, value)
}

pub fn is_valid_language(value: &str) -> bool {
    contains_case_insensitive(&VALID_LANGUAGES, value)
}

/// Comma-separated list for validation error messages.
pub fn options_list(options: &[&str]) -> String {
    options.join(", ")
}
