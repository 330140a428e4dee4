//! Request and response models for lyrics generation.

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A validated request for generated lyrics.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationRequest {
    pub keywords: Vec<String>,
    pub genre: String,
    pub emotion: String,
    pub language: String,
    #[serde(default)]
    pub structure: SongStructure,
}

/// Song structure options.
///
/// Zero values mean "unset"; defaults are applied during validation. A
/// submitted `chorus: false` is indistinguishable from an omitted field and
/// is coerced to true.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SongStructure {
    pub verses: u32,
    pub chorus: bool,
    pub bridge: bool,
}

/// The response envelope returned for a successful generation.
#[derive(Debug, Clone, Serialize)]
pub struct LyricsResponse {
    pub id: String,
    pub lyrics: GeneratedLyrics,
    pub metadata: LyricsMetadata,
}

/// The actual song content extracted from the generated text.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GeneratedLyrics {
    pub title: String,
    pub structure: SectionMap,
}

/// Information about the generated lyrics.
#[derive(Debug, Clone, Serialize)]
pub struct LyricsMetadata {
    pub genre: String,
    pub emotion: String,
    pub language: String,
    pub keywords_used: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub word_count: usize,
}

/// Ordered mapping of section name to section text.
///
/// Sections keep the order of their first appearance in the source text;
/// inserting an existing name replaces its content in place. Serializes as a
/// JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMap {
    entries: Vec<(String, String)>,
}

impl SectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        let name = name.into();
        let content = content.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = content,
            None => self.entries.push((name, content)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, content)| content.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, content)| (name.as_str(), content.as_str()))
    }
}

impl Serialize for SectionMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, content) in &self.entries {
            map.serialize_entry(name, content)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_map_preserves_insertion_order() {
        let mut sections = SectionMap::new();
        sections.insert("verse 1", "a");
        sections.insert("chorus", "b");
        sections.insert("verse 2", "c");

        let names: Vec<&str> = sections.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["verse 1", "chorus", "verse 2"]);
    }

    #[test]
    fn section_map_overwrites_in_place() {
        let mut sections = SectionMap::new();
        sections.insert("verse 1", "old");
        sections.insert("chorus", "kept");
        sections.insert("verse 1", "new");

        assert_eq!(sections.len(), 2);
        assert_eq!(sections.get("verse 1"), Some("new"));

        let names: Vec<&str> = sections.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["verse 1", "chorus"]);
    }

    #[test]
    fn section_map_serializes_as_object() {
        let mut sections = SectionMap::new();
        sections.insert("verse 1", "line a\nline b");
        sections.insert("chorus", "line c");

        let json = serde_json::to_string(&sections).unwrap();
        assert_eq!(json, r#"{"verse 1":"line a\nline b","chorus":"line c"}"#);
    }

    #[test]
    fn structure_defaults_to_zero_values() {
        let request: GenerationRequest = serde_json::from_str(
            r#"{"keywords":["love"],"genre":"pop","emotion":"happy","language":"english"}"#,
        )
        .unwrap();

        assert_eq!(request.structure, SongStructure::default());
        assert_eq!(request.structure.verses, 0);
        assert!(!request.structure.chorus);
        assert!(!request.structure.bridge);
    }
}
