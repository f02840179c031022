//! CLI binary for pdf-descriptor.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `AnalysisConfig`, shows the token estimate, and writes the result
//! archive to disk.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use pdf_descriptor::{
    analyze, AnalysisConfig, AnalysisMode, ClaudeModel, Document, OutputLanguage, ProviderKind,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI definition ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProviderArg {
    /// Anthropic Messages API with native PDF support.
    Anthropic,
    /// OpenAI Chat Completions (text-only, uses extracted text).
    Openai,
}

impl From<ProviderArg> for ProviderKind {
    fn from(p: ProviderArg) -> Self {
        match p {
            ProviderArg::Anthropic => ProviderKind::Anthropic,
            ProviderArg::Openai => ProviderKind::OpenAi,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Page-by-page description.
    Standard,
    /// Narrated technical lesson.
    Discourse,
}

impl From<ModeArg> for AnalysisMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Standard => AnalysisMode::Standard,
            ModeArg::Discourse => AnalysisMode::Discourse,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LanguageArg {
    Italian,
    English,
}

impl From<LanguageArg> for OutputLanguage {
    fn from(l: LanguageArg) -> Self {
        match l {
            LanguageArg::Italian => OutputLanguage::Italian,
            LanguageArg::English => OutputLanguage::English,
        }
    }
}

/// Describe a PDF with an LLM and package the result for download.
#[derive(Parser, Debug)]
#[command(name = "pdfdesc", version, about)]
struct Cli {
    /// Path to the PDF file to analyse.
    input: PathBuf,

    /// Which provider to use.
    #[arg(long, value_enum, default_value = "anthropic")]
    provider: ProviderArg,

    /// Claude model tag for the anthropic provider
    /// (sonnet4, opus4, sonnet3.7, sonnet3.5, haiku3.5).
    #[arg(long, default_value = "sonnet4")]
    model: String,

    /// Output format.
    #[arg(long, value_enum, default_value = "standard")]
    mode: ModeArg,

    /// Language of the generated description.
    #[arg(long, value_enum, default_value = "italian")]
    language: LanguageArg,

    /// Extra context woven into the lesson (discourse mode only).
    #[arg(long)]
    context: Option<String>,

    /// Read the extra context from a file instead.
    #[arg(long, conflicts_with = "context")]
    context_file: Option<PathBuf>,

    /// API key; falls back to ANTHROPIC_API_KEY / OPENAI_API_KEY.
    #[arg(long, env = "PDFDESC_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Per-call API timeout in seconds.
    #[arg(long, default_value_t = 120)]
    timeout: u64,

    /// Where to write the result archive. Defaults to the deterministic
    /// archive name in the current directory.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the full description instead of the 2000-char preview.
    #[arg(long)]
    full: bool,

    /// Verbose logging (or set RUST_LOG).
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pdf_descriptor=debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // ── Load the document ────────────────────────────────────────────────
    let bytes = std::fs::read(&cli.input)
        .with_context(|| format!("failed to read '{}'", cli.input.display()))?;
    let name = cli
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".to_string());
    let document = Document::load(name, bytes);

    println!(
        "{} {} {}",
        bold(&document.name),
        dim(&format!("{:.1} MB", document.size_bytes() as f64 / 1_048_576.0)),
        dim(&match document.page_count {
            Some(p) => format!("{p} pages"),
            None => "page count unknown (no extractable text)".to_string(),
        }),
    );

    // ── Token estimate (native path only has image billing, but the
    //     figures are advisory either way) ──────────────────────────────
    if let Some(pages) = document.page_count {
        let est = pdf_descriptor::estimate(pages);
        println!(
            "{} input ~{} (text {} + image {}), output ~{}",
            dim("tokens:"),
            est.input_tokens,
            est.text_tokens,
            est.image_tokens,
            est.output_tokens
        );
    }

    // ── Build the config ─────────────────────────────────────────────────
    let model = ClaudeModel::from_tag(&cli.model).with_context(|| {
        format!(
            "unknown model '{}'; expected one of: {}",
            cli.model,
            ClaudeModel::ALL
                .iter()
                .map(|m| m.tag())
                .collect::<Vec<_>>()
                .join(", ")
        )
    })?;

    let context = match (&cli.context, &cli.context_file) {
        (Some(c), _) => Some(c.clone()),
        (None, Some(path)) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read '{}'", path.display()))?,
        ),
        (None, None) => None,
    };

    let mut builder = AnalysisConfig::builder()
        .provider_kind(cli.provider.into())
        .model(model)
        .mode(cli.mode.into())
        .language(cli.language.into())
        .api_timeout_secs(cli.timeout);
    if let Some(ctx) = context {
        builder = builder.user_context(ctx);
    }
    if let Some(key) = cli.api_key {
        builder = builder.api_key(key);
    }
    let config = builder.build()?;

    // ── Run the analysis ─────────────────────────────────────────────────
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Analysing with {}…", config.provider_kind));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let output = match analyze(&document, &config).await {
        Ok(o) => {
            spinner.finish_and_clear();
            o
        }
        Err(e) => {
            spinner.finish_and_clear();
            bail!("{e}");
        }
    };

    // ── Report ───────────────────────────────────────────────────────────
    println!("{}", green("✓ Analysis complete"));
    println!();
    if cli.full {
        println!("{}", output.result.description);
    } else {
        println!("{}", output.preview);
    }
    println!();

    let out_path = cli
        .output
        .unwrap_or_else(|| PathBuf::from(&output.archive.file_name));
    std::fs::write(&out_path, &output.archive.bytes)
        .with_context(|| format!("failed to write '{}'", out_path.display()))?;
    println!(
        "{} {} {}",
        green("✓"),
        out_path.display(),
        dim(&format!(
            "({} bytes, entries: {}, {})",
            output.archive.bytes.len(),
            output.archive.original_entry,
            output.archive.description_entry
        ))
    );

    Ok(())
}
