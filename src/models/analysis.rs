//! Analysis results attached to fetched papers.

use serde::{Deserialize, Serialize};

use super::Paper;

/// Placeholder used for summary and reason when analysis is unavailable
pub const UNAVAILABLE: &str = "N/A";

/// Language of the prompt template and of the report labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Cn,
    En,
}

impl Language {
    /// Short code used in file names and on the command line
    pub fn code(&self) -> &'static str {
        match self {
            Language::Cn => "cn",
            Language::En => "en",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Structured assessment returned by the completion service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Domain tags, coarse to fine
    pub keywords: Vec<String>,

    /// 1-10, or 0 when analysis failed
    pub score: u32,

    /// One-sentence summary of the contribution
    pub summary: String,

    /// Short justification for the score
    pub reason: String,
}

impl AnalysisResult {
    /// Sentinel substituted when a paper could not be analyzed
    pub fn unavailable() -> Self {
        Self {
            keywords: Vec::new(),
            score: 0,
            summary: UNAVAILABLE.to_string(),
            reason: UNAVAILABLE.to_string(),
        }
    }

    /// Whether this is the sentinel rather than a real assessment
    pub fn is_unavailable(&self) -> bool {
        self.score == 0 && self.summary == UNAVAILABLE
    }

    /// Keywords joined for tabular output
    pub fn keywords_joined(&self) -> String {
        self.keywords.join(", ")
    }
}

/// A paper together with its analysis, flattened when serialized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedPaper {
    #[serde(flatten)]
    pub paper: Paper,

    #[serde(flatten)]
    pub analysis: AnalysisResult,
}

impl AnalyzedPaper {
    pub fn new(paper: Paper, analysis: AnalysisResult) -> Self {
        Self { paper, analysis }
    }

    /// Attach an analysis outcome, substituting the sentinel on failure
    pub fn from_outcome<E>(paper: Paper, outcome: Result<AnalysisResult, E>) -> Self {
        let analysis = outcome.unwrap_or_else(|_| AnalysisResult::unavailable());
        Self { paper, analysis }
    }

    pub fn score(&self) -> u32 {
        self.analysis.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PaperBuilder, SourceType};
    use chrono::NaiveDate;

    fn paper() -> Paper {
        PaperBuilder::new(
            SourceType::Arxiv,
            "Foo",
            "http://arxiv.org/abs/2403.00001v1",
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
        )
        .abstract_text("Bar baz")
        .build()
        .unwrap()
    }

    #[test]
    fn test_failed_outcome_uses_sentinel() {
        let analyzed = AnalyzedPaper::from_outcome(paper(), Err::<AnalysisResult, _>("boom"));

        assert_eq!(analyzed.score(), 0);
        assert_eq!(analyzed.analysis.summary, "N/A");
        assert_eq!(analyzed.analysis.reason, "N/A");
        assert_eq!(analyzed.analysis.keywords_joined(), "");
        assert!(analyzed.analysis.is_unavailable());
    }

    #[test]
    fn test_serializes_flattened() {
        let analyzed = AnalyzedPaper::new(
            paper(),
            AnalysisResult {
                keywords: vec!["NLP".to_string()],
                score: 7,
                summary: "s".to_string(),
                reason: "r".to_string(),
            },
        );

        let value = serde_json::to_value(&analyzed).unwrap();
        assert_eq!(value["title"], "Foo");
        assert_eq!(value["score"], 7);
        assert_eq!(value["source"], "arxiv");
        assert_eq!(value["date"], "2024-03-10");
    }
}
