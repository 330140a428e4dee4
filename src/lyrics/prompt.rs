//! Prompt construction for the completion API.

use super::models::GenerationRequest;

/// The system prompt accompanying every generation request.
pub fn system_prompt() -> &'static str {
    "You are a professional songwriter who creates family-friendly, \
     appropriate lyrics for all ages. Always ensure content is positive and \
     suitable for children."
}

/// Builds the user prompt from a validated request.
///
/// Pure and deterministic: the same request always produces the same prompt.
pub fn build_prompt(request: &GenerationRequest) -> String {
    let keywords = request.keywords.join(", ");

    format!(
        "Write song lyrics in {} with the following specifications:

Genre: {}
Emotion/Mood: {}
Keywords to include: {}
Number of verses: {}
Include chorus: {}
Include bridge: {}

Requirements:
- Family-friendly content only (suitable for all ages)
- No explicit language, violence, or inappropriate themes
- Creative and engaging lyrics that flow well
- Natural incorporation of the provided keywords
- Clear structure with labeled sections

Please format the output with clear section labels like:
[Title: Song Title Here]
[Verse 1]
...
[Chorus]
...
[Verse 2]
...
[Bridge] (if requested)
...

Make sure the lyrics capture the {} emotion and fit the {} genre style.",
        request.language,
        request.genre,
        request.emotion,
        keywords,
        request.structure.verses,
        request.structure.chorus,
        request.structure.bridge,
        request.emotion,
        request.genre,
    )
}
