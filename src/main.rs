use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use depscan::core::{AnalysisEngine, CachePolicy, EngineConfig, FileScanner, Language};
use depscan::formatters::{JsonFormatter, MarkdownFormatter};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "depscan",
    version,
    about = "Cross-language dependency graph, complexity and dead-code analysis"
)]
struct Cli {
    /// Input directory to analyze
    #[arg(short, long, value_name = "PATH")]
    input: PathBuf,

    /// Output file path
    #[arg(short, long, value_name = "FILE", default_value = "depscan.json")]
    output: PathBuf,

    /// Comma-separated list of languages to analyze
    #[arg(
        short,
        long,
        value_name = "LANGS",
        value_delimiter = ',',
        default_value = "typescript,javascript,python,rust,java,csharp,go,cpp"
    )]
    languages: Vec<String>,

    /// Output format
    #[arg(short, long, value_name = "FORMAT", value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Worker threads for the extraction stage (default: rayon global pool)
    #[arg(short, long, value_name = "N")]
    jobs: Option<usize>,

    /// Directory for the on-disk extraction cache (default: memory only)
    #[arg(long, value_name = "DIR", conflicts_with = "no_cache")]
    cache_dir: Option<PathBuf>,

    /// Disable the extraction cache
    #[arg(long)]
    no_cache: bool,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
#[value(rename_all = "kebab-case")]
enum OutputFormat {
    Json,
    Markdown,
}

impl OutputFormat {
    fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "markdown",
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        input,
        output,
        languages,
        format,
        jobs,
        cache_dir,
        no_cache,
    } = cli;

    let languages = parse_languages(&languages)?;

    println!("depscan - codebase dependency analysis");
    println!("Input: {}", input.display());
    println!("Output: {}", output.display());
    println!("Format: {}", format.as_str());
    println!(
        "Languages: {:?}",
        languages.iter().map(|l| l.as_str()).collect::<Vec<_>>()
    );

    let scan_start = Instant::now();
    let files = FileScanner::new()
        .scan_directory(&input, &languages)
        .with_context(|| format!("scanning {}", input.display()))?;
    println!(
        "Discovered {} files in {:.2}s",
        files.len(),
        scan_start.elapsed().as_secs_f64()
    );

    let engine = AnalysisEngine::with_config(EngineConfig {
        concurrency: jobs,
        cache: if no_cache {
            CachePolicy::Disabled
        } else if cache_dir.is_some() {
            CachePolicy::Disk(cache_dir)
        } else {
            CachePolicy::Memory
        },
    });

    let analysis_start = Instant::now();
    let analysis = engine.analyze(files);
    println!(
        "Analysis completed in {:.2}s ({} files, {} edges, {} diagnostics)",
        analysis_start.elapsed().as_secs_f64(),
        analysis.files.len(),
        analysis.graph.edges.len(),
        analysis.diagnostics.len()
    );

    match format {
        OutputFormat::Json => JsonFormatter::new().format_to_file(&analysis, &output)?,
        OutputFormat::Markdown => MarkdownFormatter::new().format_to_file(&analysis, &output)?,
    }
    println!("Report written to {}", output.display());

    Ok(())
}

fn parse_languages(names: &[String]) -> Result<Vec<Language>> {
    let mut languages = Vec::new();
    for name in names {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        match Language::from_name(name) {
            Some(language) if !languages.contains(&language) => languages.push(language),
            Some(_) => {}
            None => bail!("unknown language '{name}'"),
        }
    }
    if languages.is_empty() {
        bail!("no languages selected");
    }
    Ok(languages)
}
