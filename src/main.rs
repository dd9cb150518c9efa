//! Typed-model generator CLI.
//!
//! Turns real court PDFs into anonymized model documents, with helper
//! subcommands to inspect extraction, redaction and layout.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};

use typed_model::redaction::batch_output_path;
use typed_model::{Config, ExtractorKind, ModelGenerator};

/// Typed-model generator
///
/// Produces anonymized typed-model PDFs from source court documents.
/// By default, generates one model. Use subcommands to inspect each step.
#[derive(Parser)]
#[command(name = "typed-model")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Source PDF file path
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output PDF file path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// TOML configuration (layout, extractor, rule tables)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Text extraction backend (overrides the configuration)
    #[arg(long, value_enum, global = true)]
    extractor: Option<ExtractorArg>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExtractorArg {
    PdfExtract,
    Pdftotext,
}

impl From<ExtractorArg> for ExtractorKind {
    fn from(arg: ExtractorArg) -> Self {
        match arg {
            ExtractorArg::PdfExtract => ExtractorKind::PdfExtract,
            ExtractorArg::Pdftotext => ExtractorKind::Pdftotext,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text from a PDF (for debugging and verification)
    Extract {
        /// Source PDF file path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Output text file (optional, defaults to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Sanitize extracted text line by line (reads stdin without --input)
    Sanitize {
        /// Text file with pages separated by form feeds
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Lay out a model without writing it and print page statistics
    Layout {
        /// Source PDF file path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
    },

    /// Generate one model per source PDF into a directory
    Batch {
        /// Directory receiving the models (same file names as the sources)
        #[arg(long, value_name = "DIR")]
        output_dir: PathBuf,

        /// Source PDF files
        #[arg(value_name = "FILE", required = true)]
        sources: Vec<PathBuf>,
    },
}

/// Command handler holding the configured generator.
struct GenerateHandler {
    generator: ModelGenerator,
    verbose: bool,
}

impl GenerateHandler {
    fn new(config: &Config, verbose: bool) -> Result<Self> {
        let generator =
            ModelGenerator::from_config(config).context("Invalid generator configuration")?;
        Ok(Self { generator, verbose })
    }

    /// Generates a single model.
    fn generate(&self, input: &Path, output: &Path) -> Result<()> {
        if !input.exists() {
            anyhow::bail!("Input file does not exist: {}", input.display());
        }

        if self.verbose {
            println!("Input:  {}", input.display());
            println!("Output: {}", output.display());
            println!("Rules:  {} rule(s)", self.generator.rules().len());
        }

        let report = self
            .generator
            .generate(input, output)
            .with_context(|| "Model generation failed")?;

        if self.verbose {
            println!("\nGeneration Summary:");
            println!("  Input pages:     {}", report.input_pages);
            println!("  Output pages:    {}", report.output_pages);
            println!("  Lines read:      {}", report.lines_read);
            println!("  Lines rewritten: {}", report.lines_rewritten);
            println!("  Lines dropped:   {}", report.lines_suppressed);
            println!("  Lines truncated: {}", report.lines_truncated);
        }

        println!("✓ Generated {}", output.display());
        Ok(())
    }

    /// Extracts text from a PDF.
    fn extract(&self, input: &Path, output: Option<&Path>) -> Result<()> {
        let text = self
            .generator
            .extract_text(input)
            .with_context(|| "Text extraction failed")?;

        if let Some(output_path) = output {
            std::fs::write(output_path, &text)
                .with_context(|| format!("Failed to write to {}", output_path.display()))?;
            println!(
                "✓ Extracted {} characters → {}",
                text.len(),
                output_path.display()
            );
        } else {
            println!("{}", text);
        }

        Ok(())
    }

    /// Sanitizes text from a file or stdin.
    fn sanitize(&self, input: Option<&Path>) -> Result<()> {
        let text = match input {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
            None => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read stdin")?;
                buf
            }
        };

        print!("{}", self.generator.sanitize_text(&text));
        Ok(())
    }

    /// Prints the layout a model would get.
    fn layout(&self, input: &Path) -> Result<()> {
        let (doc, stats) = self
            .generator
            .layout(input)
            .with_context(|| "Layout failed")?;

        for (page, produced) in doc.pages.iter().zip(&stats.pages_per_input) {
            println!(
                "page {:>3}: {:>3} visible line(s) → {} output page(s)",
                page.number,
                page.visible_lines().count(),
                produced
            );
        }
        println!(
            "total: {} input page(s) → {} output page(s), {} truncated line(s)",
            doc.pages.len(),
            stats.output_pages,
            stats.lines_truncated
        );
        Ok(())
    }

    /// Generates many models; every document reports on its own.
    fn batch(&self, sources: &[PathBuf], output_dir: &Path) -> Result<()> {
        let jobs: Vec<(PathBuf, PathBuf)> = sources
            .iter()
            .map(|source| (source.clone(), batch_output_path(source, output_dir)))
            .collect();

        let mut failures = 0;
        for outcome in self.generator.generate_batch(&jobs) {
            match outcome.result {
                Ok(report) => println!(
                    "✓ {} → {} ({} page(s))",
                    outcome.source.display(),
                    outcome.output.display(),
                    report.output_pages
                ),
                Err(e) => {
                    failures += 1;
                    eprintln!("✗ {}: {}", outcome.source.display(), e);
                }
            }
        }

        if failures > 0 {
            anyhow::bail!("{} of {} document(s) failed", failures, jobs.len());
        }
        Ok(())
    }
}

/// Loads the configuration file, if any, and applies CLI overrides.
fn load_config(path: Option<&Path>, extractor: Option<ExtractorArg>) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(extractor) = extractor {
        config.extractor = extractor.into();
    }
    Ok(config)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref(), cli.extractor)?;
    let handler = GenerateHandler::new(&config, cli.verbose)?;

    match &cli.command {
        Some(Commands::Extract { input, output }) => {
            handler.extract(input, output.as_deref())?;
        }
        Some(Commands::Sanitize { input }) => {
            handler.sanitize(input.as_deref())?;
        }
        Some(Commands::Layout { input }) => {
            handler.layout(input)?;
        }
        Some(Commands::Batch {
            output_dir,
            sources,
        }) => {
            handler.batch(sources, output_dir)?;
        }
        None => {
            let input = cli
                .input
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("--input is required"))?;
            let output = cli
                .output
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("--output is required"))?;

            handler.generate(input, output)?;
        }
    }

    Ok(())
}
