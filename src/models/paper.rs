//! Paper model representing a preprint from any supported source.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The preprint server the paper was fetched from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Arxiv,
    BioRxiv,
}

impl SourceType {
    /// Returns the display name of the source
    pub fn name(&self) -> &'static str {
        match self {
            SourceType::Arxiv => "arXiv",
            SourceType::BioRxiv => "bioRxiv",
        }
    }

    /// Returns the source identifier (used on the command line)
    pub fn id(&self) -> &'static str {
        match self {
            SourceType::Arxiv => "arxiv",
            SourceType::BioRxiv => "biorxiv",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A preprint normalized from a source-specific record.
///
/// Adapters only emit papers whose title and abstract are non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    /// Source where the paper was found
    pub source: SourceType,

    /// Paper title
    pub title: String,

    /// Abstract text
    pub r#abstract: String,

    /// Canonical link to the paper page
    pub url: String,

    /// Publication date as reported by the source
    pub date: NaiveDate,

    /// Short human-readable author list
    pub authors: String,

    /// Source-native category tag (bioRxiv only)
    pub category: Option<String>,
}

impl Paper {
    /// Title and abstract joined, the text keyword filters run against
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.r#abstract)
    }
}

/// Builder for constructing Paper objects
#[derive(Debug, Clone)]
pub struct PaperBuilder {
    paper: Paper,
}

impl PaperBuilder {
    /// Create a new builder with required fields
    pub fn new(
        source: SourceType,
        title: impl Into<String>,
        url: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            paper: Paper {
                source,
                title: title.into(),
                r#abstract: String::new(),
                url: url.into(),
                date,
                authors: String::new(),
                category: None,
            },
        }
    }

    /// Set authors
    pub fn authors(mut self, authors: impl Into<String>) -> Self {
        self.paper.authors = authors.into();
        self
    }

    /// Set abstract
    pub fn abstract_text(mut self, abstract_text: impl Into<String>) -> Self {
        self.paper.r#abstract = abstract_text.into();
        self
    }

    /// Set category
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.paper.category = Some(category.into());
        self
    }

    /// Build the Paper, or `None` when the title or abstract is blank
    pub fn build(self) -> Option<Paper> {
        if self.paper.title.trim().is_empty() || self.paper.r#abstract.trim().is_empty() {
            return None;
        }
        Some(self.paper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[test]
    fn test_paper_builder() {
        let paper = PaperBuilder::new(
            SourceType::BioRxiv,
            "Test Paper",
            "https://www.biorxiv.org/content/10.1101/2024.03.10.1",
            date(),
        )
        .authors("Doe, J.; Smith, A.")
        .abstract_text("This is a test abstract.")
        .category("genomics")
        .build()
        .unwrap();

        assert_eq!(paper.title, "Test Paper");
        assert_eq!(paper.authors, "Doe, J.; Smith, A.");
        assert_eq!(paper.category.as_deref(), Some("genomics"));
        assert_eq!(paper.date, date());
    }

    #[test]
    fn test_builder_rejects_blank_fields() {
        let no_abstract =
            PaperBuilder::new(SourceType::Arxiv, "Title", "http://arxiv.org/abs/1", date()).build();
        assert!(no_abstract.is_none());

        let blank_title = PaperBuilder::new(SourceType::Arxiv, "   ", "http://arxiv.org/abs/1", date())
            .abstract_text("Abstract")
            .build();
        assert!(blank_title.is_none());
    }

    #[test]
    fn test_source_type_names() {
        assert_eq!(SourceType::Arxiv.to_string(), "arXiv");
        assert_eq!(SourceType::BioRxiv.to_string(), "bioRxiv");
        assert_eq!(SourceType::BioRxiv.id(), "biorxiv");
    }
}
