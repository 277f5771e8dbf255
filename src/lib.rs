//! # Preprint Digest
//!
//! Fetches recent preprints from arXiv or bioRxiv, asks an LLM to tag, score
//! and summarize each one, and writes a ranked CSV plus a Markdown digest.
//!
//! ## Architecture
//!
//! - [`models`]: Core data structures (Paper, FetchRequest, AnalysisResult)
//! - [`sources`]: Preprint source adapters behind the [`Source`] trait
//! - [`analyzer`]: Prompt construction, completion client and response parsing
//! - [`report`]: Ranking plus CSV and Markdown rendering
//! - [`pipeline`]: Fetch, analyze and report orchestration
//! - [`config`]: Configuration management
//! - [`ui`]: Status lines and progress output
//! - [`utils`]: HTTP client

pub mod analyzer;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use analyzer::Analyzer;
pub use models::{AnalysisResult, AnalyzedPaper, Language, Paper};
pub use pipeline::{Pipeline, PipelineError, RunOptions, RunOutcome};
pub use sources::{Source, SourceKind};
