use anyhow::Result;
use clap::{ArgGroup, Parser, ValueEnum};
use preprint_digest::config::{find_config_file, load_config, Config};
use preprint_digest::models::Language;
use preprint_digest::pipeline::{Pipeline, PipelineError, RunOptions, RunOutcome};
use preprint_digest::sources::SourceKind;
use preprint_digest::ui::{is_terminal, print_status, source_icon, Status};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Exit status for invalid options or configuration
const EXIT_CONFIG: i32 = 2;

/// Exit status for failures while writing the report
const EXIT_FAILURE: i32 = 1;

/// Preprint Digest - Daily LLM-ranked digests of new arXiv and bioRxiv papers
#[derive(Parser, Debug)]
#[command(name = "preprint-digest")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fetch recent preprints, score them with an LLM and write a ranked digest", long_about = None)]
#[command(group(ArgGroup::new("source").args(["arxiv", "biorxiv"]).multiple(false)))]
struct Cli {
    /// Fetch from arXiv
    #[arg(long)]
    arxiv: bool,

    /// Fetch from bioRxiv
    #[arg(long)]
    biorxiv: bool,

    /// Maximum number of papers to analyze (capped at 100)
    #[arg(long, short, default_value_t = 10)]
    limit: usize,

    /// How many days back to search
    #[arg(long, short, default_value_t = 1)]
    days: u32,

    /// Language of the summaries and report
    #[arg(long, value_enum, default_value_t = LangArg::Cn)]
    lang: LangArg,

    /// Categories to include (arXiv codes like cs.AI, or bioRxiv names like neuroscience)
    #[arg(long, num_args = 1.., value_delimiter = ',')]
    cats: Vec<String>,

    /// Keywords a paper's title or abstract must contain (any of them)
    #[arg(long, visible_alias = "kw", num_args = 1..)]
    keywords: Vec<String>,

    /// Custom prefix for the output file names
    #[arg(long)]
    prefix: Option<String>,

    /// Directory the CSV and Markdown files are written to
    #[arg(long, short)]
    output_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Delay between LLM calls in milliseconds
    #[arg(long)]
    pacing_ms: Option<u64>,

    /// Model identifier override
    #[arg(long)]
    model: Option<String>,

    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Show all environment variables
    #[arg(long)]
    env: bool,
}

/// Report language
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LangArg {
    /// Chinese
    Cn,
    /// English
    En,
}

impl From<LangArg> for Language {
    fn from(lang: LangArg) -> Self {
        match lang {
            LangArg::Cn => Language::Cn,
            LangArg::En => Language::En,
        }
    }
}

/// Print all available environment variables
fn print_env_vars() {
    println!("Preprint Digest - Environment Variables");
    println!();
    println!("API Keys:");
    println!("  PREPRINT_DIGEST_LLM__API_KEY   API key for the completion service");
    println!("  OPENAI_API_KEY                 Fallback API key");
    println!("  DASHSCOPE_API_KEY              Fallback API key");
    println!();
    println!("LLM Settings:");
    println!("  PREPRINT_DIGEST_LLM__BASE_URL      OpenAI-compatible base URL (default: DashScope compatible mode)");
    println!("  PREPRINT_DIGEST_LLM__MODEL         Model identifier (default: qwen3-max)");
    println!("  PREPRINT_DIGEST_LLM__TEMPERATURE   Sampling temperature (default: 0.2)");
    println!("  PREPRINT_DIGEST_LLM__TIMEOUT_SECS  Request timeout in seconds (default: 120)");
    println!();
    println!("Pipeline Settings:");
    println!("  PREPRINT_DIGEST_PIPELINE__PACING_MS   Delay between LLM calls in ms (default: 1000)");
    println!("  PREPRINT_DIGEST_PIPELINE__OUTPUT_DIR  Directory for generated files (default: .)");
    println!();
    println!("Source Settings:");
    println!("  PREPRINT_DIGEST_SOURCES__ARXIV_API_URL             arXiv query endpoint");
    println!("  PREPRINT_DIGEST_SOURCES__BIORXIV_API_URL           bioRxiv API base URL");
    println!("  PREPRINT_DIGEST_SOURCES__DEFAULT_ARXIV_CATEGORIES  Comma-separated default categories (default: cs.AI,cs.LG)");
    println!();
    println!("Other Settings:");
    println!("  RUST_LOG                    Rust logging level (e.g., debug, info, warn, error)");
    println!();
    println!("Example:");
    println!("  export DASHSCOPE_API_KEY=\"your-key-here\"");
    println!("  export PREPRINT_DIGEST_LLM__MODEL=\"qwen-plus\"");
}

fn config_failure(message: impl std::fmt::Display) -> ! {
    print_status(Status::Error, &format!("{}", message));
    std::process::exit(EXIT_CONFIG);
}

fn resolve_config(cli: &Cli) -> Result<Config, config::ConfigError> {
    let path = match &cli.config {
        Some(path) => Some(path.clone()),
        None => find_config_file(),
    };
    if let Some(path) = &path {
        tracing::info!("Using config file: {}", path.display());
    }

    let mut config = load_config(path.as_deref())?;
    if let Some(model) = &cli.model {
        config.llm.model = model.clone();
    }
    if let Some(pacing_ms) = cli.pacing_ms {
        config.pipeline.pacing_ms = pacing_ms;
    }
    if let Some(dir) = &cli.output_dir {
        config.pipeline.output_dir = dir.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.env {
        print_env_vars();
        return Ok(());
    }

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("preprint_digest={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let source = SourceKind::from_flags(cli.arxiv, cli.biorxiv).unwrap_or_else(|e| config_failure(e));
    let config = resolve_config(&cli).unwrap_or_else(|e| config_failure(e));

    let options = RunOptions {
        limit: cli.limit,
        days_back: cli.days,
        language: cli.lang.into(),
        categories: cli.cats.clone(),
        keywords: cli.keywords.clone(),
        prefix: cli.prefix.clone(),
        output_dir: config.pipeline.output_dir.clone(),
        ..RunOptions::new(source)
    };
    let pipeline = Pipeline::from_config(&options, &config)
        .unwrap_or_else(|e| config_failure(e))
        .with_progress(is_terminal() && !cli.quiet);

    if !cli.quiet {
        let name = source.source_type().name();
        print_status(
            Status::Search,
            &format!("{} Fetching papers from {}...", source_icon(name), name),
        );
    }

    match pipeline.run(&options).await {
        Ok(RunOutcome::NoPapers) => {
            if !cli.quiet {
                print_status(Status::Warning, "No papers found matching your criteria.");
            }
        }
        Ok(RunOutcome::Written {
            paths,
            papers,
            failed,
            elapsed,
        }) => {
            if !cli.quiet {
                print_status(
                    Status::Success,
                    &format!(
                        "Analyzed {} papers in {:.1}s ({} failed)",
                        papers,
                        elapsed.as_secs_f64(),
                        failed
                    ),
                );
                print_status(Status::Info, &format!("CSV: {}", paths.csv.display()));
                print_status(
                    Status::Info,
                    &format!("Markdown: {}", paths.markdown.display()),
                );
            }
        }
        Err(e @ PipelineError::Config(_)) => config_failure(e),
        Err(e) => {
            print_status(Status::Error, &format!("{}", e));
            std::process::exit(EXIT_FAILURE);
        }
    }

    Ok(())
}
