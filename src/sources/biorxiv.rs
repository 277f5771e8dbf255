//! bioRxiv source implementation.
//!
//! The details endpoint takes a closed date interval and pages with a numeric
//! cursor. It has no server-side category or text search, so both filters run
//! on the client.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::models::{FetchRequest, Paper, PaperBuilder, SourceType};
use crate::sources::{candidate_budget, matches_keywords, Source, SourceError};
use crate::utils::HttpClient;

/// Landing page prefix for a DOI
const BIORXIV_CONTENT_URL: &str = "https://www.biorxiv.org/content";

/// Records the details endpoint returns per page
const PAGE_SIZE: usize = 100;

/// bioRxiv source
#[derive(Debug, Clone)]
pub struct BiorxivSource {
    client: Arc<HttpClient>,
    api_url: String,
}

impl BiorxivSource {
    /// Create with a shared HTTP client and API endpoint
    pub fn with_base_url(client: Arc<HttpClient>, api_url: &str) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn page_url(&self, start: NaiveDate, end: NaiveDate, cursor: usize) -> String {
        format!(
            "{}/details/biorxiv/{}/{}/{}/json",
            self.api_url,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
            cursor
        )
    }

    async fn fetch_page(&self, url: &str) -> Result<ApiResponse, SourceError> {
        debug!(url = %url, "Fetching bioRxiv page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to fetch from bioRxiv: {}", e)))?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "bioRxiv API returned status: {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to read response: {}", e)))?;

        Ok(serde_json::from_str(&body)?)
    }

    /// Convert an API record, returning `None` for incomplete records
    fn parse_article(article: Article) -> Option<Paper> {
        let doi = article.doi.filter(|d| !d.trim().is_empty())?;
        let date = NaiveDate::parse_from_str(article.date.as_deref()?.trim(), "%Y-%m-%d").ok()?;

        let mut builder = PaperBuilder::new(
            SourceType::BioRxiv,
            article.title.unwrap_or_default().trim(),
            format!("{}/{}", BIORXIV_CONTENT_URL, doi.trim()),
            date,
        )
        .authors(article.authors.unwrap_or_default().trim())
        .abstract_text(article.r#abstract.unwrap_or_default().trim());

        if let Some(category) = article.category.filter(|c| !c.trim().is_empty()) {
            builder = builder.category(category.trim());
        }

        builder.build()
    }
}

/// Category comparison key: case-insensitive, `_` treated as a space
fn category_key(category: &str) -> String {
    category.trim().to_lowercase().replace('_', " ")
}

fn matches_category(paper: &Paper, wanted: &[String]) -> bool {
    if wanted.is_empty() {
        return true;
    }
    let Some(category) = paper.category.as_deref() else {
        return false;
    };
    let key = category_key(category);
    wanted.iter().any(|w| category_key(w) == key)
}

#[async_trait]
impl Source for BiorxivSource {
    fn id(&self) -> &str {
        "biorxiv"
    }

    fn name(&self) -> &str {
        "bioRxiv"
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<Paper>, SourceError> {
        let start = request.window_start();
        let budget = candidate_budget(request.limit, request.has_keywords());

        tracing::info!(
            days = request.days_back,
            categories = ?request.categories,
            keywords = ?request.keywords,
            limit = request.limit,
            "Fetching recent bioRxiv preprints"
        );

        let mut papers = Vec::new();
        let mut cursor = 0;

        'pages: while cursor < budget && papers.len() < request.limit {
            let page = self
                .fetch_page(&self.page_url(start, request.today, cursor))
                .await?;
            let received = page.collection.len();
            if received == 0 {
                if let Some(status) = page.messages.first().and_then(|m| m.status.as_deref()) {
                    debug!(status, "bioRxiv returned no records");
                }
                break;
            }

            for article in page.collection {
                let Some(paper) = Self::parse_article(article) else {
                    debug!("Skipping incomplete bioRxiv record");
                    continue;
                };

                if !request.in_window(paper.date)
                    || !matches_category(&paper, &request.categories)
                    || !matches_keywords(&paper.searchable_text(), &request.keywords)
                {
                    continue;
                }

                papers.push(paper);
                if papers.len() >= request.limit {
                    break 'pages;
                }
            }

            if received < PAGE_SIZE {
                break;
            }
            cursor += received;
        }

        // The API lists oldest first
        papers.sort_by(|a, b| b.date.cmp(&a.date));

        debug!(count = papers.len(), "bioRxiv fetch complete");
        Ok(papers)
    }
}

/// API response structure for the details endpoint
#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    messages: Vec<Message>,
    #[serde(default)]
    collection: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Article {
    #[serde(default)]
    doi: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    authors: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default, rename = "abstract")]
    r#abstract: Option<String>,
}
