//! In-process data sources for the built-in content.
//!
//! The story catalog ships with the app and is paged through the pure
//! catalog filter; the finance articles are generated stub pages until the
//! articles API lands. Both sit behind [`DataSource`] so the feed
//! controller treats them like any remote feed.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::catalog;
use crate::error::FetchError;
use crate::models::{Article, Story};
use crate::traits::DataSource;

/// Searchable story catalog source.
///
/// The query lives on the source; after changing it the owning feed must be
/// refreshed so pages for the old query are invalidated by its generation
/// bump.
pub struct StubStorySource {
    corpus: Arc<Vec<Story>>,
    query: Mutex<String>,
    page_size: usize,
}

impl StubStorySource {
    pub fn new(corpus: Vec<Story>) -> Self {
        Self {
            corpus: Arc::new(corpus),
            query: Mutex::new(String::new()),
            page_size: catalog::PAGE_SIZE,
        }
    }

    /// Update the search query. Callers follow up with a feed refresh.
    pub fn set_query(&self, query: &str) {
        *self.query.lock().unwrap() = query.to_string();
    }

    pub fn query(&self) -> String {
        self.query.lock().unwrap().clone()
    }
}

#[async_trait]
impl DataSource for StubStorySource {
    type Item = Story;

    async fn fetch_page(&self, page: usize) -> Result<Vec<Story>, FetchError> {
        let query = self.query();
        Ok(catalog::page(&self.corpus, &query, page, self.page_size))
    }
}

/// Articles served per page by the stub feed.
pub const ARTICLES_PER_PAGE: usize = 5;

/// Generated finance-article source with optional artificial latency.
pub struct StubArticleSource {
    latency: Duration,
}

impl StubArticleSource {
    pub fn new() -> Self {
        Self {
            latency: Duration::ZERO,
        }
    }

    /// Simulate network latency per page, as the real feed will have.
    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for StubArticleSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataSource for StubArticleSource {
    type Item = Article;

    async fn fetch_page(&self, page: usize) -> Result<Vec<Article>, FetchError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok((0..ARTICLES_PER_PAGE)
            .map(|i| {
                let number = page * ARTICLES_PER_PAGE + i + 1;
                Article {
                    id: format!("article-{page}-{i}"),
                    title: format!("Finance Article {number}"),
                    body: "Lorem ipsum dolor sit amet, consectetur adipiscing elit.".to_string(),
                }
            })
            .collect())
    }
}
