//! External identifier lookup against the Open Library search API

use serde::Deserialize;
use std::{collections::HashMap, time::Duration};

use crate::{config::EnrichmentConfig, error::AppResult, repository::Repository};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    #[serde(default)]
    identifier: Option<HashMap<String, Vec<String>>>,
}

/// Counts reported after an enrichment run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct EnrichmentSummary {
    pub checked: usize,
    pub updated: usize,
    pub failed: usize,
}

#[derive(Clone)]
pub struct EnrichmentService {
    repository: Repository,
    client: reqwest::Client,
    base_url: String,
}

impl EnrichmentService {
    pub fn new(repository: Repository, config: EnrichmentConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            repository,
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Look up the Amazon identifier of a title
    pub async fn lookup(&self, title: &str, author: &str) -> AppResult<Option<String>> {
        let response = self
            .client
            .get(format!("{}/search.json", self.base_url))
            .query(&[("title", title), ("author", author)])
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), title, author, "Catalogue search failed");
            return Ok(None);
        }

        let body: SearchResponse = response.json().await?;
        Ok(first_amazon_id(body))
    }

    /// Fill in the external identifier of every book that lacks one.
    /// A failed lookup is logged and the run moves on.
    pub async fn enrich_books(&self) -> AppResult<EnrichmentSummary> {
        let mut summary = EnrichmentSummary::default();

        for book in self.repository.books.without_external_id().await? {
            summary.checked += 1;
            match self.lookup(&book.title, &book.authors).await {
                Ok(Some(asin)) => {
                    self.repository.books.set_external_id(book.id, &asin).await?;
                    tracing::info!(book_id = book.id, %asin, "Updated {} with Amazon id", book.title);
                    summary.updated += 1;
                }
                Ok(None) => tracing::debug!(book_id = book.id, "No Amazon id found for {}", book.title),
                Err(e) => {
                    tracing::warn!(book_id = book.id, "Lookup failed for {}: {}", book.title, e);
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }
}

/// First `amazon` (or failing that `asin`) identifier among the search results
fn first_amazon_id(response: SearchResponse) -> Option<String> {
    response.docs.into_iter().find_map(|doc| {
        let mut identifiers = doc.identifier?;
        ["amazon", "asin"].iter().find_map(|key| {
            identifiers
                .remove(*key)
                .and_then(|values| values.into_iter().next())
        })
    })
}
