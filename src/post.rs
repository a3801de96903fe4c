use std::fmt;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};

use crate::content::RichText;

/// What the listing shows for each post.
#[derive(Debug, Clone, PartialEq)]
pub struct PostSummary {
    pub slug: String,
    pub published_at: Option<DateTime<Utc>>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
}

/// One page of the listing, in the order the repository returned it.
/// `next_cursor` is opaque; `None` means this was the last page.
#[derive(Debug, Clone, PartialEq)]
pub struct PostPage {
    pub items: Vec<PostSummary>,
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub heading: String,
    pub body: RichText,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostDetail {
    pub id: String,
    pub slug: String,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub banner_url: String,
    pub banner_alt: String,
    pub sections: Vec<Section>,
}

impl PostDetail {
    /// True when the post was edited after its first publication.
    pub fn was_edited(&self) -> bool {
        match (self.published_at, self.updated_at) {
            (Some(published), Some(updated)) => updated > published,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdjacentPosts {
    pub previous: Option<PostSummary>,
    pub next: Option<PostSummary>,
}

impl Display for PostSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "slug={}, title={}, author={}", self.slug, self.title, self.author)
    }
}

impl Display for PostDetail {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "id={}, slug={}, title={}, sections={}",
               self.id,
               self.slug,
               self.title,
               self.sections.len()
        )
    }
}
