use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

const MAX_TITLE_LENGTH: usize = 150;

// Ordered source-field aliases per projected field; the first present
// non-empty string wins.
const ID_ALIASES: &[&str] = &["id"];
const URL_ALIASES: &[&str] = &["url", "uri", "link", "document_link"];
const FILEPATH_ALIASES: &[&str] = &["filepath", "filename", "source"];
const CONTENT_ALIASES: &[&str] = &["content", "page_content"];

lazy_static! {
    static ref TITLE_PATTERN: Regex = Regex::new(r"title: (.*)\n").unwrap();
}

/// A search document normalized into the fields downstream code relies
/// on, regardless of the index schema it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: Option<String>,
    pub url: Option<String>,
    pub filepath: Option<String>,
    pub content: Option<String>,
    pub title: Option<String>,
    pub chunk_id: Option<String>,
    pub search_score: Option<f64>,
}

impl SearchHit {
    /// Project a raw search document into the normalized shape.
    pub fn from_document(doc: &Value) -> Self {
        let id = first_string(doc, ID_ALIASES);
        let url = first_string(doc, URL_ALIASES);
        let filepath = first_string(doc, FILEPATH_ALIASES);
        let content = first_string(doc, CONTENT_ALIASES);
        let title = extract_title(doc, content.as_deref());
        let chunk_id = get_if_string(doc, "chunk_id");
        let search_score = doc.get("@search.score").and_then(Value::as_f64);

        Self {
            id,
            url,
            filepath,
            content,
            title,
            chunk_id,
            search_score,
        }
    }

    /// Stable identity for cross-query de-duplication: explicit id,
    /// else chunk id, else a digest over the projected text fields.
    pub fn identity(&self) -> String {
        if let Some(id) = &self.id {
            return format!("id:{}", id);
        }
        if let Some(chunk_id) = &self.chunk_id {
            return format!("chunk:{}", chunk_id);
        }

        let mut hasher = Sha256::new();
        for field in [&self.content, &self.url, &self.filepath, &self.title] {
            if let Some(value) = field {
                hasher.update(value.as_bytes());
            }
            hasher.update([0u8]);
        }
        format!("sha:{:x}", hasher.finalize())
    }
}

fn get_if_string(doc: &Value, field: &str) -> Option<String> {
    doc.get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn first_string(doc: &Value, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|field| get_if_string(doc, field))
}

/// Explicit title field, else a `title: <value>` line in the content.
fn extract_title(doc: &Value, content: Option<&str>) -> Option<String> {
    if let Some(title) = get_if_string(doc, "title") {
        return Some(truncate(&title));
    }
    let captures = TITLE_PATTERN.captures(content?)?;
    Some(truncate(captures.get(1)?.as_str()))
}

fn truncate(value: &str) -> String {
    value.chars().take(MAX_TITLE_LENGTH).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_projection_uses_first_alias() {
        let hit = SearchHit::from_document(&json!({
            "id": "doc-1",
            "uri": "https://example.com/a",
            "link": "https://example.com/b",
            "filename": "guide.md",
            "page_content": "body text",
            "chunk_id": "7",
            "@search.score": 2.5
        }));

        assert_eq!(hit.id.as_deref(), Some("doc-1"));
        assert_eq!(hit.url.as_deref(), Some("https://example.com/a"));
        assert_eq!(hit.filepath.as_deref(), Some("guide.md"));
        assert_eq!(hit.content.as_deref(), Some("body text"));
        assert_eq!(hit.chunk_id.as_deref(), Some("7"));
        assert_eq!(hit.search_score, Some(2.5));
    }

    #[test]
    fn test_empty_strings_are_skipped() {
        let hit = SearchHit::from_document(&json!({
            "url": "",
            "uri": "https://example.com/fallback"
        }));
        assert_eq!(hit.url.as_deref(), Some("https://example.com/fallback"));
    }

    #[test]
    fn test_title_extracted_from_content() {
        let hit = SearchHit::from_document(&json!({
            "page_content": "title: Foo\nBar"
        }));
        assert_eq!(hit.title.as_deref(), Some("Foo"));
    }

    #[test]
    fn test_explicit_title_wins_and_is_truncated() {
        let long_title = "t".repeat(200);
        let hit = SearchHit::from_document(&json!({
            "title": long_title,
            "content": "title: Other\n"
        }));
        assert_eq!(hit.title.as_deref().map(str::len), Some(150));
    }

    #[test]
    fn test_no_title_without_pattern() {
        let hit = SearchHit::from_document(&json!({
            "content": "no heading here"
        }));
        assert_eq!(hit.title, None);
    }

    #[test]
    fn test_identity_prefers_id_then_chunk() {
        let with_id = SearchHit::from_document(&json!({"id": "a", "chunk_id": "1"}));
        assert_eq!(with_id.identity(), "id:a");

        let with_chunk = SearchHit::from_document(&json!({"chunk_id": "1"}));
        assert_eq!(with_chunk.identity(), "chunk:1");
    }

    #[test]
    fn test_identity_digest_is_content_sensitive() {
        let first = SearchHit::from_document(&json!({"content": "alpha"}));
        let same = SearchHit::from_document(&json!({"content": "alpha"}));
        let other = SearchHit::from_document(&json!({"content": "beta"}));

        assert_eq!(first.identity(), same.identity());
        assert_ne!(first.identity(), other.identity());
    }
}
