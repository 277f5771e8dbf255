//! Fetch, analyze and report: the daily run.
//!
//! A run validates its options, fetches from exactly one source, analyzes the
//! papers one at a time with a pacing delay between completion calls, and
//! writes the ranked artifacts. An empty fetch ends the run without output.

use chrono::{NaiveDate, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::analyzer::{AnalysisError, Analyzer};
use crate::config::Config;
use crate::models::{AnalyzedPaper, FetchRequest, Language, Paper};
use crate::report::{output_basename, ReportBuilder, ReportError, ReportPaths};
use crate::sources::{Source, SourceError, SourceKind};
use crate::ui::{truncate_with_ellipsis, AnalysisProgress};
use crate::utils::HttpClient;

/// Upper bound on papers per run
pub const HARD_LIMIT_MAX: usize = 100;

/// Papers per run when no limit is given
pub const DEFAULT_LIMIT: usize = 10;

/// Errors that end a run
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Invalid options or settings, detected before any network call
    #[error("Configuration error: {0}")]
    Config(String),

    /// Writing the artifacts failed
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Clamp a requested limit to [`HARD_LIMIT_MAX`]; zero is rejected
pub fn effective_limit(limit: usize) -> Result<usize, PipelineError> {
    if limit == 0 {
        return Err(PipelineError::Config("limit must be at least 1".to_string()));
    }
    if limit > HARD_LIMIT_MAX {
        warn!(
            "Limit {} exceeds hard limit. Set to {}.",
            limit, HARD_LIMIT_MAX
        );
        return Ok(HARD_LIMIT_MAX);
    }
    Ok(limit)
}

/// Parameters of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub source: SourceKind,
    pub limit: usize,
    pub days_back: u32,
    pub language: Language,
    pub categories: Vec<String>,
    pub keywords: Vec<String>,
    pub prefix: Option<String>,
    pub output_dir: PathBuf,
    pub today: NaiveDate,
}

impl RunOptions {
    /// Options with the command-line defaults for `source`
    pub fn new(source: SourceKind) -> Self {
        Self {
            source,
            limit: DEFAULT_LIMIT,
            days_back: 1,
            language: Language::default(),
            categories: Vec::new(),
            keywords: Vec::new(),
            prefix: None,
            output_dir: PathBuf::from("."),
            today: Utc::now().date_naive(),
        }
    }

    /// Check the options, returning the limit the run will use
    pub fn validate(&self) -> Result<usize, PipelineError> {
        effective_limit(self.limit)
    }

    /// Build the source request, filling in default arXiv categories
    pub fn fetch_request(&self, default_categories: &[String]) -> Result<FetchRequest, PipelineError> {
        let limit = self.validate()?;

        let categories = if self.categories.is_empty() && self.source == SourceKind::Arxiv {
            default_categories.to_vec()
        } else {
            self.categories.clone()
        };

        Ok(FetchRequest {
            categories,
            limit,
            days_back: self.days_back,
            keywords: self.keywords.clone(),
            today: self.today,
        })
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Nothing matched; no files were written
    NoPapers,

    /// Artifacts were written
    Written {
        paths: ReportPaths,
        papers: usize,
        failed: usize,
        elapsed: Duration,
    },
}

/// Drives one source and one analyzer through a run
#[derive(Debug, Clone)]
pub struct Pipeline {
    source: Arc<dyn Source>,
    analyzer: Analyzer,
    pacing: Duration,
    default_categories: Vec<String>,
    show_progress: bool,
}

impl Pipeline {
    /// Create a pipeline with a one-second pacing delay
    pub fn new(source: Arc<dyn Source>, analyzer: Analyzer) -> Self {
        let defaults = crate::config::SourcesConfig::default();
        Self {
            source,
            analyzer,
            pacing: Duration::from_secs(1),
            default_categories: defaults.default_arxiv_categories,
            show_progress: false,
        }
    }

    /// Build the source and analyzer the options and configuration call for
    pub fn from_config(options: &RunOptions, config: &Config) -> Result<Self, PipelineError> {
        let client = HttpClient::new()
            .map_err(|e| PipelineError::Config(format!("Failed to build HTTP client: {}", e)))?;
        let source = options
            .source
            .create(&config.sources, client)
            .map_err(|e: SourceError| PipelineError::Config(e.to_string()))?;
        let analyzer = Analyzer::from_config(&config.llm)
            .map_err(|e: AnalysisError| PipelineError::Config(e.to_string()))?;

        Ok(Self::new(source, analyzer)
            .with_pacing(config.pipeline.pacing())
            .with_default_categories(config.sources.default_arxiv_categories.clone()))
    }

    /// Delay between successive completion calls; zero disables it
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// arXiv categories used when a run names none
    pub fn with_default_categories(mut self, categories: Vec<String>) -> Self {
        self.default_categories = categories;
        self
    }

    /// Draw a progress bar during analysis
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Analyze papers strictly in order, substituting sentinels on failure
    pub async fn analyze_all(&self, papers: Vec<Paper>, language: Language) -> Vec<AnalyzedPaper> {
        let total = papers.len();
        let progress = AnalysisProgress::new(total, self.show_progress);
        let mut analyzed = Vec::with_capacity(total);

        for (index, paper) in papers.into_iter().enumerate() {
            if index > 0 && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }

            progress.start(&paper.title);
            debug!(
                "[{}/{}] Analyzing: {}",
                index + 1,
                total,
                truncate_with_ellipsis(&paper.title, 40)
            );

            let outcome = self.analyzer.analyze(&paper, language).await;
            if let Err(e) = &outcome {
                warn!(title = %truncate_with_ellipsis(&paper.title, 40), "Analysis failed: {}", e);
            }
            analyzed.push(AnalyzedPaper::from_outcome(paper, outcome));
            progress.inc();
        }

        progress.finish("Analysis complete");
        analyzed
    }

    /// Execute a full run
    pub async fn run(&self, options: &RunOptions) -> Result<RunOutcome, PipelineError> {
        let started = Instant::now();
        let request = options.fetch_request(&self.default_categories)?;

        let papers = self.source.fetch_or_empty(&request).await;
        if papers.is_empty() {
            info!("No papers found matching your criteria.");
            return Ok(RunOutcome::NoPapers);
        }

        info!(
            "Found {} matching papers. Starting analysis with {}...",
            papers.len(),
            self.analyzer.model()
        );

        let analyzed = self.analyze_all(papers, options.language).await;
        let count = analyzed.len();
        let failed = analyzed
            .iter()
            .filter(|p| p.analysis.is_unavailable())
            .count();

        let report = ReportBuilder::new(options.today, options.language).build(analyzed)?;
        let basename = output_basename(options.prefix.as_deref(), options.language, options.today);
        let paths = report.write(&options.output_dir, &basename)?;

        Ok(RunOutcome::Written {
            paths,
            papers: count,
            failed,
            elapsed: started.elapsed(),
        })
    }
}
