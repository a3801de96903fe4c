use async_trait::async_trait;

use crate::error::ContentError;
use crate::post::{PostDetail, PostPage, PostSummary};

pub mod mapping;
pub mod prismic;

#[cfg(test)]
pub mod memory;

/// Publish-order direction, relative to a subject post.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    /// The nearest post published before the subject.
    Older,
    /// The nearest post published after the subject.
    Newer,
}

/// Read access to the content repository.
#[async_trait]
pub trait ContentGateway: Send + Sync {
    /// One page of summaries, newest first. `cursor` is `None` for the first page.
    async fn query_post_summaries(&self, page_size: u32, cursor: Option<&str>) -> Result<PostPage, ContentError>;

    /// The post for `slug`, in the published revision or in `revision_ref` when given.
    async fn get_post_by_slug(&self, slug: &str, revision_ref: Option<&str>) -> Result<PostDetail, ContentError>;

    /// The single nearest post in `direction`, never the subject itself.
    async fn query_adjacent(&self, subject_id: &str, direction: Direction) -> Result<Option<PostSummary>, ContentError>;

    /// Used when entering preview, where only the document id is known.
    async fn get_slug_by_id(&self, id: &str, revision_ref: Option<&str>) -> Result<Option<String>, ContentError>;
}
