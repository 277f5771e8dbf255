//! arXiv source implementation.
//!
//! Categories are encoded into the upstream query; the date window and keyword
//! filter are applied client-side while paging through a submitted-date-sorted
//! Atom feed.

use async_trait::async_trait;
use feed_rs::parser;
use std::sync::Arc;
use tracing::debug;

use crate::models::{FetchRequest, Paper, PaperBuilder, SourceType};
use crate::sources::{candidate_budget, matches_keywords, Source, SourceError};
use crate::utils::HttpClient;

/// Query used when no category is supplied
const FALLBACK_QUERY: &str = "cat:cs.AI";

/// Entries requested per API call
const PAGE_SIZE: usize = 100;

/// Authors kept in the short author list
const MAX_AUTHORS: usize = 3;

/// arXiv source
#[derive(Debug, Clone)]
pub struct ArxivSource {
    client: Arc<HttpClient>,
    api_url: String,
}

impl ArxivSource {
    /// Create with a shared HTTP client and API endpoint
    pub fn with_base_url(client: Arc<HttpClient>, api_url: &str) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the `search_query` value: a disjunction of `cat:` terms
    fn build_search_query(categories: &[String]) -> String {
        let terms: Vec<String> = categories
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(|c| format!("cat:{}", c))
            .collect();

        if terms.is_empty() {
            FALLBACK_QUERY.to_string()
        } else {
            terms.join(" OR ")
        }
    }

    fn page_url(&self, search_query: &str, start: usize, max_results: usize) -> String {
        format!(
            "{}?search_query={}&start={}&max_results={}&sortBy=submittedDate&sortOrder=descending",
            self.api_url,
            urlencoding::encode(search_query),
            start,
            max_results
        )
    }

    async fn fetch_page(&self, url: &str) -> Result<feed_rs::model::Feed, SourceError> {
        debug!(url = %url, "Fetching arXiv page");

        let response = self
            .client
            .get(url)
            .header("Accept", "application/atom+xml")
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to fetch arXiv results: {}", e)))?;

        if !response.status().is_success() {
            return Err(SourceError::Api(format!(
                "arXiv API returned status: {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to read response: {}", e)))?;

        parser::parse(bytes.as_ref())
            .map_err(|e| SourceError::Parse(format!("Failed to parse Atom feed: {}", e)))
    }

    /// Parse an Atom entry, returning `None` for incomplete records
    fn parse_entry(entry: &feed_rs::model::Entry) -> Option<Paper> {
        let title = entry
            .title
            .as_ref()
            .map(|t| collapse_whitespace(&t.content))
            .unwrap_or_default();

        let abstract_text = entry
            .summary
            .as_ref()
            .map(|s| collapse_whitespace(&s.content))
            .unwrap_or_default();

        let date = entry.published.or(entry.updated)?.date_naive();

        let authors = entry
            .authors
            .iter()
            .take(MAX_AUTHORS)
            .map(|a| a.name.trim())
            .collect::<Vec<_>>()
            .join(", ");

        PaperBuilder::new(SourceType::Arxiv, title, entry.id.trim(), date)
            .authors(authors)
            .abstract_text(abstract_text)
            .build()
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[async_trait]
impl Source for ArxivSource {
    fn id(&self) -> &str {
        "arxiv"
    }

    fn name(&self) -> &str {
        "arXiv"
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<Paper>, SourceError> {
        let search_query = Self::build_search_query(&request.categories);
        let budget = candidate_budget(request.limit, request.has_keywords());

        tracing::info!(
            query = %search_query,
            keywords = ?request.keywords,
            limit = request.limit,
            "Searching arXiv"
        );

        let mut papers = Vec::new();
        let mut start = 0;

        'pages: while start < budget && papers.len() < request.limit {
            let page_size = (budget - start).min(PAGE_SIZE);
            let feed = self
                .fetch_page(&self.page_url(&search_query, start, page_size))
                .await?;
            let received = feed.entries.len();

            for entry in &feed.entries {
                let Some(paper) = Self::parse_entry(entry) else {
                    debug!(id = %entry.id, "Skipping incomplete arXiv entry");
                    continue;
                };

                // Feed is newest-first: everything after this is older still
                if paper.date < request.window_start() {
                    break 'pages;
                }
                if paper.date > request.today {
                    continue;
                }
                if !matches_keywords(&paper.searchable_text(), &request.keywords) {
                    continue;
                }

                papers.push(paper);
                if papers.len() >= request.limit {
                    break 'pages;
                }
            }

            if received < page_size {
                break;
            }
            start += received;
        }

        debug!(count = papers.len(), scanned_up_to = start, "arXiv fetch complete");
        Ok(papers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mockito::Matcher;

    fn entry(id: &str, title: &str, summary: &str, published: &str) -> String {
        format!(
            r#"<entry>
    <id>http://arxiv.org/abs/{id}v1</id>
    <title>{title}</title>
    <summary>{summary}</summary>
    <published>{published}T10:00:00Z</published>
    <updated>{published}T10:00:00Z</updated>
    <author><name>Ada Lovelace</name></author>
    <author><name>Alan Turing</name></author>
    <author><name>Grace Hopper</name></author>
    <author><name>Edsger Dijkstra</name></author>
  </entry>"#
        )
    }

    fn feed(entries: &[String]) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>arXiv Query Results</title>
  <id>http://arxiv.org/api/query</id>
  <updated>2024-03-10T00:00:00Z</updated>
  {}
</feed>"#,
            entries.join("\n  ")
        )
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn source_for(server: &mockito::Server) -> ArxivSource {
        ArxivSource::with_base_url(
            Arc::new(HttpClient::new().unwrap()),
            &format!("{}/api/query", server.url()),
        )
    }

    #[test]
    fn test_build_search_query() {
        let cats = vec!["cs.AI".to_string(), "cs.LG".to_string()];
        assert_eq!(ArxivSource::build_search_query(&cats), "cat:cs.AI OR cat:cs.LG");
        assert_eq!(ArxivSource::build_search_query(&[]), "cat:cs.AI");
    }

    #[test]
    fn test_parse_entry_normalizes_fields() {
        let xml = feed(&[entry(
            "2403.00001",
            "A   Multi-line\n    Title",
            "First line\nsecond line.",
            "2024-03-10",
        )]);
        let parsed = parser::parse(xml.as_bytes()).unwrap();
        let paper = ArxivSource::parse_entry(&parsed.entries[0]).unwrap();

        assert_eq!(paper.title, "A Multi-line Title");
        assert_eq!(paper.r#abstract, "First line second line.");
        assert_eq!(paper.url, "http://arxiv.org/abs/2403.00001v1");
        assert_eq!(paper.date, today());
        assert_eq!(paper.authors, "Ada Lovelace, Alan Turing, Grace Hopper");
        assert_eq!(paper.category, None);
        assert_eq!(paper.source, SourceType::Arxiv);
    }

    #[test]
    fn test_parse_entry_drops_empty_abstract() {
        let xml = feed(&[entry("2403.00002", "Title", "   ", "2024-03-10")]);
        let parsed = parser::parse(xml.as_bytes()).unwrap();
        assert!(ArxivSource::parse_entry(&parsed.entries[0]).is_none());
    }

    #[tokio::test]
    async fn test_fetch_applies_window_and_keywords() {
        let mut server = mockito::Server::new_async().await;
        let body = feed(&[
            entry("2403.00001", "Protein folding with diffusion", "We fold.", "2024-03-10"),
            entry("2403.00002", "Graph networks", "Nothing relevant.", "2024-03-10"),
            entry("2403.00003", "Another diffusion paper", "More.", "2024-03-09"),
            entry("2402.09999", "Old diffusion paper", "Too old.", "2024-03-01"),
        ]);
        let mock = server
            .mock("GET", "/api/query")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("search_query".into(), "cat:cs.LG".into()),
                Matcher::UrlEncoded("start".into(), "0".into()),
                Matcher::UrlEncoded("max_results".into(), "50".into()),
                Matcher::UrlEncoded("sortBy".into(), "submittedDate".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/atom+xml")
            .with_body(body)
            .expect(1)
            .create_async()
            .await;

        let request = FetchRequest::new(5)
            .categories(["cs.LG"])
            .keywords(["DIFFUSION"])
            .days_back(1)
            .today(today());
        let papers = source_for(&server).fetch(&request).await.unwrap();

        mock.assert_async().await;
        let titles: Vec<_> = papers.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Protein folding with diffusion", "Another diffusion paper"]
        );
        assert!(papers.iter().all(|p| request.in_window(p.date)));
    }

    #[tokio::test]
    async fn test_fetch_skips_future_dated_entries() {
        let mut server = mockito::Server::new_async().await;
        let body = feed(&[
            entry("2403.00009", "Clock skew", "From tomorrow.", "2024-03-11"),
            entry("2403.00001", "Today", "Fresh.", "2024-03-10"),
            entry("2403.00002", "Yesterday", "Still fresh.", "2024-03-09"),
        ]);
        server
            .mock("GET", "/api/query")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let request = FetchRequest::new(5).days_back(1).today(today());
        let papers = source_for(&server).fetch(&request).await.unwrap();

        let titles: Vec<_> = papers.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Today", "Yesterday"]);
        assert!(papers.iter().all(|p| request.in_window(p.date)));
    }

    #[tokio::test]
    async fn test_fetch_stops_at_limit() {
        let mut server = mockito::Server::new_async().await;
        let body = feed(&[
            entry("2403.00001", "One", "a", "2024-03-10"),
            entry("2403.00002", "Two", "b", "2024-03-10"),
            entry("2403.00003", "Three", "c", "2024-03-10"),
        ]);
        server
            .mock("GET", "/api/query")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let request = FetchRequest::new(2).today(today());
        let papers = source_for(&server).fetch(&request).await.unwrap();
        assert_eq!(papers.len(), 2);
        assert_eq!(papers[0].title, "One");
    }

    #[tokio::test]
    async fn test_fetch_reports_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/query")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let source = source_for(&server);
        let request = FetchRequest::new(2).today(today());
        assert!(matches!(source.fetch(&request).await, Err(SourceError::Api(_))));
        assert!(source.fetch_or_empty(&request).await.is_empty());
    }
}
