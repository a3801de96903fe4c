use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use spdlog::{debug, warn};
use thiserror::Error;

use crate::error::ContentError;
use crate::gateway::ContentGateway;
use crate::post::{PostPage, PostSummary};

/// Appends `page` after `current`. Nothing is re-sorted or dropped.
pub fn append_page(current: &[PostSummary], page: PostPage) -> (Vec<PostSummary>, Option<String>) {
    let mut merged = Vec::with_capacity(current.len() + page.items.len());
    merged.extend_from_slice(current);
    merged.extend(page.items);
    (merged, page.next_cursor)
}

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("no more posts to load")]
    Exhausted,
    #[error("a load is already in progress")]
    LoadInProgress,
    #[error(transparent)]
    Content(#[from] ContentError),
}

#[derive(Debug, Clone, PartialEq)]
enum Position {
    Start,
    At(String),
    Exhausted,
}

struct ListingState {
    items: Vec<PostSummary>,
    position: Position,
}

/// A growable list of posts, fetched page by page.
///
/// At most one load runs at a time per listing: a second `load_more` while
/// one is pending fails with [`ListingError::LoadInProgress`]. A failed load
/// leaves the already loaded items untouched, so it can be retried.
pub struct Listing {
    page_size: u32,
    state: Mutex<ListingState>,
    in_flight: AtomicBool,
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Listing {
    pub fn new(page_size: u32) -> Self {
        Listing {
            page_size,
            state: Mutex::new(ListingState {
                items: vec![],
                position: Position::Start,
            }),
            in_flight: AtomicBool::new(false),
        }
    }

    /// A listing that already holds its first page.
    #[cfg(test)]
    pub fn from_page(page_size: u32, page: PostPage) -> Self {
        let listing = Listing::new(page_size);
        listing.apply(page);
        listing
    }

    fn lock(&self) -> MutexGuard<'_, ListingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply(&self, page: PostPage) -> usize {
        let mut state = self.lock();
        let added = page.items.len();
        let (merged, next_cursor) = append_page(&state.items, page);
        state.items = merged;
        state.position = match next_cursor {
            Some(cursor) => Position::At(cursor),
            None => Position::Exhausted,
        };
        added
    }

    pub fn items(&self) -> Vec<PostSummary> {
        self.lock().items.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True until the repository reported the last page.
    pub fn has_more(&self) -> bool {
        self.lock().position != Position::Exhausted
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Fetches the next page and appends it. Returns how many posts were added.
    pub async fn load_more<G>(&self, gateway: &G) -> Result<usize, ListingError>
    where
        G: ContentGateway + ?Sized,
    {
        // The position is only read once the flag is held, so no other load
        // can move it between reading the cursor and appending its page
        if self.in_flight.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_err() {
            return Err(ListingError::LoadInProgress);
        }
        let _guard = InFlight(&self.in_flight);

        let cursor = match self.lock().position.clone() {
            Position::Exhausted => return Err(ListingError::Exhausted),
            Position::Start => None,
            Position::At(cursor) => Some(cursor),
        };

        debug!("Loading posts page after {:?}", cursor);
        match gateway.query_post_summaries(self.page_size, cursor.as_deref()).await {
            Ok(page) => Ok(self.apply(page)),
            Err(e) => {
                warn!("Could not load more posts, keeping {} loaded: {}", self.len(), e);
                Err(e.into())
            }
        }
    }
}
