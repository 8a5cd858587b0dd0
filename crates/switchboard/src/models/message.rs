use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    #[serde(other)]
    Other,
}

/// A message on a conversation thread, as listed by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadMessage {
    #[serde(default)]
    pub id: String,
    pub role: Role,
    #[serde(default)]
    pub content: Vec<ContentPart>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextValue {
    pub value: String,
}

/// Envelope returned by the list-messages operation.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageList {
    pub data: Vec<ThreadMessage>,
}

impl ThreadMessage {
    pub fn user<S: Into<String>>(text: S) -> Self {
        Self::with_text(Role::User, text)
    }

    pub fn assistant<S: Into<String>>(text: S) -> Self {
        Self::with_text(Role::Assistant, text)
    }

    fn with_text<S: Into<String>>(role: Role, text: S) -> Self {
        ThreadMessage {
            id: String::new(),
            role,
            content: vec![ContentPart {
                kind: "text".to_string(),
                text: Some(TextValue { value: text.into() }),
            }],
        }
    }

    /// The value of the first text content part, if any.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find_map(|part| part.text.as_ref().map(|text| text.value.as_str()))
    }
}
