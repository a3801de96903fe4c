use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::ContentError;
use crate::gateway::{ContentGateway, Direction};
use crate::post::{PostDetail, PostPage, PostSummary};

/// Gateway over a fixed set of posts, for tests.
#[derive(Default)]
pub struct MemoryGateway {
    // Newest first
    posts: Vec<PostDetail>,
    revisions: HashMap<(String, String), PostDetail>,
    pages: Vec<PostPage>,
    summary_calls: AtomicUsize,
    summaries_succeed: Option<usize>,
    offline: bool,
    adjacent_offline: bool,
    adjacent_is_subject: bool,
    same_neighbours: bool,
    yield_first: bool,
}

pub fn to_summary(post: &PostDetail) -> PostSummary {
    PostSummary {
        slug: post.slug.clone(),
        published_at: post.published_at,
        title: post.title.clone(),
        subtitle: post.subtitle.clone(),
        author: post.author.clone(),
    }
}

impl MemoryGateway {
    pub fn new(mut posts: Vec<PostDetail>) -> Self {
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        MemoryGateway {
            posts,
            ..Default::default()
        }
    }

    /// Serves these pages verbatim; cursors chain page `i` to page `i + 1`.
    pub fn with_pages(mut self, pages: Vec<PostPage>) -> Self {
        self.pages = pages;
        self
    }

    pub fn with_revision(mut self, revision_ref: &str, post: PostDetail) -> Self {
        self.revisions.insert((revision_ref.to_string(), post.slug.clone()), post);
        self
    }

    /// Every call fails as if the network were down.
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    pub fn adjacent_offline(mut self) -> Self {
        self.adjacent_offline = true;
        self
    }

    /// Listing calls after the first `count` fail.
    pub fn summaries_succeed(mut self, count: usize) -> Self {
        self.summaries_succeed = Some(count);
        self
    }

    /// Breaks the adjacency contract by answering with the same other post in
    /// both directions.
    pub fn same_neighbours(mut self) -> Self {
        self.same_neighbours = true;
        self
    }

    /// Breaks the adjacency contract by answering with the subject itself.
    pub fn adjacent_is_subject(mut self) -> Self {
        self.adjacent_is_subject = true;
        self
    }

    /// Listing calls suspend once before answering.
    pub fn yielding(mut self) -> Self {
        self.yield_first = true;
        self
    }

    pub fn summary_calls(&self) -> usize {
        self.summary_calls.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<(), ContentError> {
        if self.offline {
            return Err(ContentError::UpstreamUnavailable("connection refused".to_string()));
        }
        Ok(())
    }

    fn page_from_pages(&self, cursor: Option<&str>) -> Result<PostPage, ContentError> {
        let index = match cursor {
            None => 0,
            Some(cursor) => self.pages.iter()
                .position(|p| p.next_cursor.as_deref() == Some(cursor))
                .map(|i| i + 1)
                .ok_or_else(|| ContentError::DataShape(format!("unknown cursor {}", cursor)))?,
        };

        self.pages.get(index)
            .cloned()
            .ok_or_else(|| ContentError::DataShape(format!("no page {}", index)))
    }

    fn page_from_posts(&self, page_size: u32, cursor: Option<&str>) -> Result<PostPage, ContentError> {
        let offset: usize = match cursor {
            None => 0,
            Some(cursor) => cursor.parse()
                .map_err(|_| ContentError::DataShape(format!("invalid cursor {}", cursor)))?,
        };

        let end = (offset + page_size as usize).min(self.posts.len());
        let items = self.posts.get(offset..end).unwrap_or_default()
            .iter()
            .map(to_summary)
            .collect();
        let next_cursor = if end < self.posts.len() { Some(end.to_string()) } else { None };

        Ok(PostPage { items, next_cursor })
    }
}

#[async_trait]
impl ContentGateway for MemoryGateway {
    async fn query_post_summaries(&self, page_size: u32, cursor: Option<&str>) -> Result<PostPage, ContentError> {
        let call = self.summary_calls.fetch_add(1, Ordering::SeqCst);
        if self.yield_first {
            tokio::task::yield_now().await;
        }
        self.check_online()?;
        if let Some(count) = self.summaries_succeed {
            if call >= count {
                return Err(ContentError::UpstreamUnavailable("timed out".to_string()));
            }
        }

        if self.pages.is_empty() {
            self.page_from_posts(page_size, cursor)
        } else {
            self.page_from_pages(cursor)
        }
    }

    async fn get_post_by_slug(&self, slug: &str, revision_ref: Option<&str>) -> Result<PostDetail, ContentError> {
        self.check_online()?;
        let found = match revision_ref {
            None => self.posts.iter().find(|p| p.slug == slug).cloned(),
            Some(revision) => self.revisions.get(&(revision.to_string(), slug.to_string())).cloned(),
        };
        found.ok_or_else(|| ContentError::not_found(slug, revision_ref))
    }

    async fn query_adjacent(&self, subject_id: &str, direction: Direction) -> Result<Option<PostSummary>, ContentError> {
        self.check_online()?;
        if self.adjacent_offline {
            return Err(ContentError::UpstreamUnavailable("connection reset".to_string()));
        }

        let index = self.posts.iter()
            .position(|p| p.id == subject_id)
            .ok_or_else(|| ContentError::not_found(subject_id, None))?;

        if self.adjacent_is_subject {
            return Ok(Some(to_summary(&self.posts[index])));
        }
        if self.same_neighbours {
            return Ok(self.posts.iter().find(|p| p.id != subject_id).map(to_summary));
        }

        let adjacent = match direction {
            Direction::Older => self.posts.get(index + 1),
            Direction::Newer => index.checked_sub(1).and_then(|i| self.posts.get(i)),
        };
        Ok(adjacent.map(to_summary))
    }

    async fn get_slug_by_id(&self, id: &str, revision_ref: Option<&str>) -> Result<Option<String>, ContentError> {
        self.check_online()?;
        let in_revision = revision_ref.and_then(|revision| {
            self.revisions.iter()
                .find(|((r, _), post)| r == revision && post.id == id)
                .map(|(_, post)| post.slug.clone())
        });
        Ok(in_revision.or_else(|| self.posts.iter().find(|p| p.id == id).map(|p| p.slug.clone())))
    }
}
