use serde::Deserialize;

pub mod html_renderer;
pub mod plain_text;

pub use html_renderer::to_display_markup;
pub use plain_text::to_plain_text;

/// Structured body text, as stored by the content repository.
pub type RichText = Vec<RichTextBlock>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RichTextBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub spans: Vec<Span>,
    // Only present on image blocks
    pub url: Option<String>,
    pub alt: Option<String>,
}

/// Inline formatting over `[start, end)`, counted in characters of the block text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Option<SpanData>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpanData {
    pub url: Option<String>,
    pub label: Option<String>,
}

impl RichTextBlock {
    pub fn paragraph(text: &str) -> Self {
        RichTextBlock {
            kind: "paragraph".to_string(),
            text: text.to_string(),
            spans: vec![],
            url: None,
            alt: None,
        }
    }
}
