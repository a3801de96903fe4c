use thiserror::Error;

/// Failures of the content layer. Everything the gateway or the assemblers
/// can report falls in one of these three buckets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    /// The gateway answered, but the payload does not have the expected shape.
    #[error("malformed content response: {0}")]
    DataShape(String),

    /// The gateway could not be reached or answered with a server failure.
    #[error("content repository unavailable: {0}")]
    UpstreamUnavailable(String),

    /// No document exists for the slug in the requested revision.
    #[error("no content for {slug} (revision: {})", .revision.as_deref().unwrap_or("published"))]
    NotFound {
        slug: String,
        revision: Option<String>,
    },
}

impl ContentError {
    pub fn not_found(slug: &str, revision: Option<&str>) -> Self {
        ContentError::NotFound {
            slug: slug.to_string(),
            revision: revision.map(|r| r.to_string()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ContentError::NotFound { .. })
    }
}
