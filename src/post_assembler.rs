use spdlog::{debug, info};

use crate::error::ContentError;
use crate::gateway::{ContentGateway, Direction};
use crate::post::{AdjacentPosts, PostDetail, PostSummary};
use crate::preview::PreviewContext;
use crate::reading_time::estimate_reading_minutes;

/// Everything the post page needs.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledPost {
    pub post: PostDetail,
    pub reading_minutes: u32,
    pub adjacent: AdjacentPosts,
    pub show_exit_preview: bool,
    /// Key the comment widget files discussions under
    pub comment_key: String,
}

/// Loads the revision of `slug` selected by `preview`.
pub async fn resolve_content<G>(slug: &str, preview: &PreviewContext, gateway: &G) -> Result<PostDetail, ContentError>
where
    G: ContentGateway + ?Sized,
{
    if !preview.is_preview {
        return gateway.get_post_by_slug(slug, None).await;
    }

    match preview.preview_ref.as_deref() {
        Some(revision) => {
            debug!("Resolving {} in preview revision {}", slug, revision);
            gateway.get_post_by_slug(slug, Some(revision)).await
        }
        // Preview without a ref selects no revision at all
        None => Err(ContentError::not_found(slug, None)),
    }
}

fn check_adjacent(subject: &PostDetail, adjacent: Option<PostSummary>) -> Result<Option<PostSummary>, ContentError> {
    match adjacent {
        Some(post) if post.slug == subject.slug => Err(ContentError::DataShape(
            format!("post {} returned as its own neighbour", subject.slug))),
        other => Ok(other),
    }
}

/// The posts published right before and right after `subject`.
/// A missing neighbour is `None`; a failing gateway is an error.
pub async fn resolve_adjacent<G>(subject: &PostDetail, gateway: &G) -> Result<AdjacentPosts, ContentError>
where
    G: ContentGateway + ?Sized,
{
    let (previous, next) = tokio::try_join!(
        gateway.query_adjacent(&subject.id, Direction::Older),
        gateway.query_adjacent(&subject.id, Direction::Newer),
    )?;

    let previous = check_adjacent(subject, previous)?;
    let next = check_adjacent(subject, next)?;

    if let (Some(p), Some(n)) = (&previous, &next) {
        if p.slug == n.slug {
            return Err(ContentError::DataShape(
                format!("post {} has {} as both neighbours", subject.slug, p.slug)));
        }
    }

    Ok(AdjacentPosts { previous, next })
}

pub async fn assemble_post<G>(slug: &str, preview: &PreviewContext, gateway: &G) -> Result<AssembledPost, ContentError>
where
    G: ContentGateway + ?Sized,
{
    let post = resolve_content(slug, preview, gateway).await?;
    let adjacent = resolve_adjacent(&post, gateway).await?;
    let reading_minutes = estimate_reading_minutes(&post.sections);
    info!("Assembled post {} ({} min read, preview={})", post.slug, reading_minutes, preview.is_preview);

    Ok(AssembledPost {
        comment_key: post.slug.clone(),
        post,
        reading_minutes,
        adjacent,
        show_exit_preview: preview.is_preview,
    })
}
