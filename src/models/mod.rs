//! Core data models for papers, fetch requests and analysis results.

mod analysis;
mod paper;
mod search;

pub use analysis::{AnalysisResult, AnalyzedPaper, Language, UNAVAILABLE};
pub use paper::{Paper, PaperBuilder, SourceType};
pub use search::FetchRequest;
