//! Parses generated free text into a titled, ordered section structure.

use super::models::{GeneratedLyrics, SectionMap};

const DEFAULT_TITLE: &str = "Untitled Song";

/// Section key used when no bracketed header ever commits content.
const FALLBACK_SECTION: &str = "verse1";

const TITLE_PREFIX: &str = "title:";

/// Case-insensitive `title:` prefix match returning the remainder.
fn strip_title_prefix(interior: &str) -> Option<&str> {
    interior
        .get(..TITLE_PREFIX.len())
        .filter(|prefix| prefix.eq_ignore_ascii_case(TITLE_PREFIX))
        .map(|_| &interior[TITLE_PREFIX.len()..])
}

/// Splits raw generated text into a title and named sections.
///
/// A single left-to-right pass over the lines. A trimmed line of the form
/// `[...]` is a header; everything else accumulates into the section opened
/// by the last header. A section only makes it into the result once it has
/// at least one content line, so back-to-back headers drop the first one.
/// Duplicate section names overwrite earlier content.
pub fn parse_lyrics(raw_text: &str) -> GeneratedLyrics {
    let mut sections = SectionMap::new();
    let mut title = DEFAULT_TITLE.to_string();

    let mut current_section: Option<String> = None;
    let mut current_content: Vec<&str> = Vec::new();

    for line in raw_text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            if let Some(name) = current_section.take() {
                if !current_content.is_empty() {
                    sections.insert(name, current_content.join("\n"));
                }
            }

            let interior = line.trim_matches(|c| c == '[' || c == ']').trim();

            if let Some(rest) = strip_title_prefix(interior) {
                // The title keeps its original casing.
                title = rest.trim().to_string();
                // Lines after a title header are dropped until the next
                // section header.
                current_section = None;
            } else if !interior.is_empty() {
                current_section = Some(interior.to_lowercase());
                current_content = Vec::new();
            }
        } else if current_section.is_some() {
            current_content.push(line);
        }
    }

    if let Some(name) = current_section {
        if !current_content.is_empty() {
            sections.insert(name, current_content.join("\n"));
        }
    }

    if sections.is_empty() {
        sections.insert(FALLBACK_SECTION, raw_text);
    }

    GeneratedLyrics {
        title,
        structure: sections,
    }
}
