//! Paged enumeration of list endpoints
//!
//! A [`PagedEnumerator`] requests pages of at most the endpoint's cap,
//! moving its anchor past each page, until the requested number of items has
//! been produced or the endpoint returns a short page. Nothing is fetched
//! until the stream is polled, and every call to [`PagedEnumerator::pages`]
//! starts over from the original anchor.

pub mod fetchers;

use std::fmt;

use async_trait::async_trait;
use cord_common::ClientResult;
use cord_core::{ArgumentError, Snowflake};
use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use tracing::debug;

pub use fetchers::{
    AuditLogPageFetcher, BanPageFetcher, GuildPageFetcher, MemberPageFetcher, MessagePageFetcher,
    ReactionPageFetcher,
};

/// Which side of the anchor to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetrievalDirection {
    /// Older items, newest first
    Before,
    /// Newer items
    After,
    /// Items surrounding the anchor; a single page
    Around,
}

impl RetrievalDirection {
    pub fn query_key(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
            Self::Around => "around",
        }
    }
}

impl fmt::Display for RetrievalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_key())
    }
}

/// Fetches one page of a list endpoint
#[async_trait]
pub trait PageFetcher: Send + Sync {
    type Item: Send + 'static;

    /// Largest page the endpoint serves
    fn page_cap(&self) -> usize;

    fn supports(&self, _direction: RetrievalDirection) -> bool {
        true
    }

    /// Snowflake used to anchor the next page
    fn item_id(item: &Self::Item) -> Snowflake;

    async fn fetch_page(
        &self,
        limit: usize,
        direction: RetrievalDirection,
        anchor: Option<Snowflake>,
    ) -> ClientResult<Vec<Self::Item>>;
}

#[derive(Debug, Clone, Copy)]
struct PageState {
    remaining: usize,
    anchor: Option<Snowflake>,
    done: bool,
}

/// Lazy enumerator over a paged endpoint
#[derive(Debug, Clone)]
pub struct PagedEnumerator<F> {
    fetcher: F,
    limit: usize,
    direction: RetrievalDirection,
    start_from: Option<Snowflake>,
}

impl<F: PageFetcher> PagedEnumerator<F> {
    /// Create an enumerator producing at most `limit` items
    ///
    /// `Around` serves a single page, so its `limit` may not exceed the page
    /// cap and it needs an anchor.
    pub fn new(
        fetcher: F,
        limit: usize,
        direction: RetrievalDirection,
        start_from: Option<Snowflake>,
    ) -> Result<Self, ArgumentError> {
        if !fetcher.supports(direction) {
            return Err(ArgumentError::Unsupported(format!(
                "this endpoint cannot be enumerated {direction} an anchor"
            )));
        }
        if direction == RetrievalDirection::Around {
            if start_from.is_none() {
                return Err(ArgumentError::Invalid {
                    name: "start_from",
                    message: "required when enumerating around an anchor".to_string(),
                });
            }
            let cap = fetcher.page_cap();
            if limit > cap {
                return Err(ArgumentError::OutOfRange {
                    name: "limit",
                    message: format!("must be at most {cap} when enumerating around an anchor"),
                });
            }
        }
        Ok(Self {
            fetcher,
            limit,
            direction,
            start_from,
        })
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn direction(&self) -> RetrievalDirection {
        self.direction
    }

    pub fn start_from(&self) -> Option<Snowflake> {
        self.start_from
    }

    /// Stream of pages; each call starts from the original anchor
    pub fn pages(&self) -> impl Stream<Item = ClientResult<Vec<F::Item>>> + Send + '_ {
        let initial = PageState {
            remaining: self.limit,
            anchor: self.start_from,
            done: false,
        };
        stream::try_unfold(initial, move |state| async move {
            if state.done || state.remaining == 0 {
                return Ok(None);
            }

            let size = state.remaining.min(self.fetcher.page_cap());
            let mut page = self
                .fetcher
                .fetch_page(size, self.direction, state.anchor)
                .await?;
            debug!(direction = %self.direction, requested = size, received = page.len(), "Fetched page");

            let short = page.len() < size;
            page.truncate(state.remaining);
            if page.is_empty() {
                return Ok(None);
            }

            let next = PageState {
                remaining: state.remaining - page.len(),
                anchor: self.next_anchor(&page).or(state.anchor),
                done: short || self.direction == RetrievalDirection::Around,
            };
            Ok(Some((page, next)))
        })
    }

    /// Stream of individual items
    pub fn items(&self) -> impl Stream<Item = ClientResult<F::Item>> + Send + '_ {
        self.pages()
            .map_ok(|page| stream::iter(page.into_iter().map(Ok)))
            .try_flatten()
    }

    /// Fetch every page and collect the items
    pub async fn collect(&self) -> ClientResult<Vec<F::Item>> {
        self.pages().try_concat().await
    }

    /// Fetch pages until `n` items have been produced
    pub async fn take(&self, n: usize) -> ClientResult<Vec<F::Item>> {
        self.items().take(n).try_collect().await
    }

    /// Count items without keeping them
    pub async fn count(&self) -> ClientResult<usize> {
        self.pages()
            .try_fold(0, |count, page| async move { Ok(count + page.len()) })
            .await
    }

    /// Number of pages that `collect` would request at most
    pub fn max_pages(&self) -> usize {
        if self.direction == RetrievalDirection::Around {
            return usize::from(self.limit > 0);
        }
        self.limit.div_ceil(self.fetcher.page_cap().max(1))
    }

    /// Past the oldest item going backwards, past the newest going forwards
    ///
    /// Endpoints disagree on page order, so the extreme id is used rather
    /// than the first or last position.
    fn next_anchor(&self, page: &[F::Item]) -> Option<Snowflake> {
        let ids = page.iter().map(F::item_id);
        match self.direction {
            RetrievalDirection::Before => ids.min(),
            RetrievalDirection::After => ids.max(),
            RetrievalDirection::Around => None,
        }
    }
}
