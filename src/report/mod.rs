//! Ranked report generation.
//!
//! A run produces two artifacts from the same score-sorted list: a CSV table
//! (UTF-8 with BOM so spreadsheet tools detect the encoding) and a Markdown
//! digest with the top picks followed by the full ranking.

use chrono::NaiveDate;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::models::{AnalyzedPaper, Language};

/// Byte order mark prepended to the CSV file
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Column order of the tabular artifact
pub const CSV_HEADERS: [&str; 9] = [
    "Date", "Source", "Score", "Title", "Summary", "Keywords", "Reason", "Link", "Abstract",
];

/// Papers featured in the top picks section
pub const TOP_PICKS: usize = 3;

/// Errors while rendering or writing reports
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Sort by score, highest first, keeping input order among equal scores
pub fn rank(mut records: Vec<AnalyzedPaper>) -> Vec<AnalyzedPaper> {
    records.sort_by(|a, b| b.score().cmp(&a.score()));
    records
}

/// `{prefix}_{today}` or `papers_{lang}_{today}`
pub fn output_basename(prefix: Option<&str>, language: Language, today: NaiveDate) -> String {
    let today = today.format("%Y-%m-%d");
    match prefix.map(str::trim).filter(|p| !p.is_empty()) {
        Some(prefix) => format!("{}_{}", prefix, today),
        None => format!("papers_{}_{}", language.code(), today),
    }
}

/// Localized labels for the Markdown digest
struct Labels {
    heading: &'static str,
    top_picks: &'static str,
    summary: &'static str,
    reason: &'static str,
    link: &'static str,
    read_paper: &'static str,
    all_papers: &'static str,
    score: &'static str,
    title: &'static str,
    keywords: &'static str,
}

impl Labels {
    fn for_language(language: Language) -> Self {
        match language {
            Language::En => Self {
                heading: "Daily Paper Summary",
                top_picks: "Top Picks",
                summary: "Summary",
                reason: "Reason",
                link: "Link",
                read_paper: "Read Paper",
                all_papers: "All Papers",
                score: "Score",
                title: "Title",
                keywords: "Keywords",
            },
            Language::Cn => Self {
                heading: "每日论文速递",
                top_picks: "精选推荐",
                summary: "总结",
                reason: "评分理由",
                link: "链接",
                read_paper: "阅读论文",
                all_papers: "全部论文",
                score: "评分",
                title: "标题",
                keywords: "关键词",
            },
        }
    }
}

/// Rendered artifacts, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub csv: Vec<u8>,
    pub markdown: String,
}

/// Paths of the written artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub csv: PathBuf,
    pub markdown: PathBuf,
}

impl Report {
    /// Write `{basename}.csv` and `{basename}.md` into `dir`
    pub fn write(&self, dir: &Path, basename: &str) -> Result<ReportPaths, ReportError> {
        std::fs::create_dir_all(dir)?;

        let paths = ReportPaths {
            csv: dir.join(format!("{}.csv", basename)),
            markdown: dir.join(format!("{}.md", basename)),
        };
        std::fs::write(&paths.csv, &self.csv)?;
        std::fs::write(&paths.markdown, &self.markdown)?;

        tracing::info!(
            csv = %paths.csv.display(),
            markdown = %paths.markdown.display(),
            "Report written"
        );
        Ok(paths)
    }
}

/// Renders the ranked CSV and Markdown artifacts
#[derive(Debug, Clone, Copy)]
pub struct ReportBuilder {
    today: NaiveDate,
    language: Language,
}

impl ReportBuilder {
    pub fn new(today: NaiveDate, language: Language) -> Self {
        Self { today, language }
    }

    /// Rank `records` and render both artifacts
    pub fn build(&self, records: Vec<AnalyzedPaper>) -> Result<Report, ReportError> {
        let ranked = rank(records);
        Ok(Report {
            csv: render_csv(&ranked)?,
            markdown: self.render_markdown(&ranked),
        })
    }

    /// Render the Markdown digest for already-ranked records
    pub fn render_markdown(&self, ranked: &[AnalyzedPaper]) -> String {
        let labels = Labels::for_language(self.language);
        let mut out = String::new();

        // Writing into a String cannot fail
        let _ = writeln!(out, "# {} ({})\n", labels.heading, self.today.format("%Y-%m-%d"));

        let _ = writeln!(out, "## {}", labels.top_picks);
        for record in ranked.iter().take(TOP_PICKS) {
            let _ = writeln!(
                out,
                "### [{}] {}",
                record.score(),
                single_line(&record.paper.title)
            );
            let _ = writeln!(
                out,
                "- **{}**: {}",
                labels.summary,
                single_line(&record.analysis.summary)
            );
            let _ = writeln!(
                out,
                "- **{}**: {}",
                labels.reason,
                single_line(&record.analysis.reason)
            );
            let _ = writeln!(
                out,
                "- **{}**: [{}]({})\n",
                labels.link, labels.read_paper, record.paper.url
            );
        }

        let _ = writeln!(out, "---\n## {}", labels.all_papers);
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} |",
            labels.score, labels.title, labels.keywords, labels.link
        );
        out.push_str("|---|---|---|---|\n");
        for record in ranked {
            let _ = writeln!(
                out,
                "| {} | {} | {} | [{}]({}) |",
                record.score(),
                table_cell(&record.paper.title),
                table_cell(&record.analysis.keywords_joined()),
                labels.link,
                record.paper.url
            );
        }

        out
    }
}

/// Render the CSV table (with BOM) for already-ranked records
pub fn render_csv(ranked: &[AnalyzedPaper]) -> Result<Vec<u8>, ReportError> {
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());
    writer.write_record(CSV_HEADERS)?;

    for record in ranked {
        let date = record.paper.date.format("%Y-%m-%d").to_string();
        let score = record.score().to_string();
        let keywords = record.analysis.keywords_joined();
        writer.write_record([
            date.as_str(),
            record.paper.source.name(),
            score.as_str(),
            record.paper.title.as_str(),
            record.analysis.summary.as_str(),
            keywords.as_str(),
            record.analysis.reason.as_str(),
            record.paper.url.as_str(),
            record.paper.r#abstract.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| ReportError::Io(e.into_error()))
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn table_cell(text: &str) -> String {
    single_line(text).replace('|', "\\|")
}
