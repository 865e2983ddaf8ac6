//! quire CLI - document export tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use quire::citation::{format_bibliography_entry, format_in_text, parse_bibtex, sort_for_style};
use quire::detect::pdf_version;
use quire::render::docx::read_archive;
use quire::{
    export_batch, export_with_stats, save_export, suggested_filename, CitationStyle,
    DocumentSource, DocumentType, DownloadSink, ExportFormat, ExportJob, ExportOptions,
    ExportResult, Margins, PageSize, PickerSink,
};

type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "quire")]
#[command(version)]
#[command(about = "Export documents to PDF, DOCX, and LaTeX", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Flags that override individual fields of the options file.
#[derive(clap::Args, Clone, Default)]
struct OptionFlags {
    /// Options JSON file (missing fields take defaults)
    #[arg(long, value_name = "FILE")]
    options: Option<PathBuf>,

    /// Output format: pdf, docx, tex
    #[arg(short, long)]
    format: Option<String>,

    /// Page size: a4, letter
    #[arg(long)]
    page_size: Option<String>,

    /// Uniform margin in millimetres
    #[arg(long)]
    margin: Option<f32>,

    /// Line spacing factor (1, 1.5, 2)
    #[arg(long)]
    line_spacing: Option<f32>,

    /// Body font family
    #[arg(long)]
    font: Option<String>,

    /// Body font size in points
    #[arg(long)]
    font_size: Option<f32>,

    /// Header text
    #[arg(long)]
    header: Option<String>,

    /// Footer text
    #[arg(long)]
    footer: Option<String>,

    /// Omit the title
    #[arg(long)]
    no_title: bool,

    /// Omit page numbers
    #[arg(long)]
    no_page_numbers: bool,

    /// Omit the bibliography
    #[arg(long)]
    no_bibliography: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a document source (JSON) to PDF, DOCX, or LaTeX
    Export {
        /// Document source JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (named after the title if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Document type: draft, long-draft, academic
        #[arg(short = 't', long, default_value = "draft")]
        doc_type: String,

        #[command(flatten)]
        flags: OptionFlags,
    },

    /// Export several document sources in parallel
    Batch {
        /// Document source JSON files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,

        /// Document type: draft, long-draft, academic
        #[arg(short = 't', long, default_value = "draft")]
        doc_type: String,

        #[command(flatten)]
        flags: OptionFlags,
    },

    /// Format a BibTeX file in a citation style
    Cite {
        /// BibTeX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Citation style: apa7, mla9, chicago, harvard, ieee
        #[arg(short, long, default_value = "apa7")]
        style: String,

        /// Print in-text citations instead of the reference list
        #[arg(long)]
        in_text: bool,
    },

    /// Look up a DOI and print the entry as JSON
    Doi {
        /// DOI or resolver URL
        #[arg(value_name = "DOI")]
        doi: String,
    },

    /// Show information about an exported file
    Info {
        /// Exported file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Export {
            input,
            output,
            doc_type,
            flags,
        } => cmd_export(&input, output.as_deref(), &doc_type, &flags),
        Commands::Batch {
            inputs,
            output,
            doc_type,
            flags,
        } => cmd_batch(&inputs, &output, &doc_type, &flags),
        Commands::Cite {
            input,
            style,
            in_text,
        } => cmd_cite(&input, &style, in_text),
        Commands::Doi { doi } => cmd_doi(&doi),
        Commands::Info { input } => cmd_info(&input),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_options(flags: &OptionFlags) -> CliResult<ExportOptions> {
    let mut options = match &flags.options {
        Some(path) => ExportOptions::from_json(&fs::read_to_string(path)?)?,
        None => ExportOptions::default(),
    };

    if let Some(format) = &flags.format {
        options = options.with_format(format.parse::<ExportFormat>()?);
    }
    if let Some(size) = &flags.page_size {
        options = options.with_page_size(size.parse::<PageSize>()?);
    }
    if let Some(mm) = flags.margin {
        options = options.with_margins(Margins::uniform(mm));
    }
    if let Some(spacing) = flags.line_spacing {
        options = options.with_line_spacing(spacing);
    }
    if flags.font.is_some() || flags.font_size.is_some() {
        let family = flags.font.clone().unwrap_or_else(|| options.font_family.clone());
        let size = flags.font_size.unwrap_or(options.font_size);
        options = options.with_font(family, size);
    }
    if let Some(text) = &flags.header {
        options = options.with_header(text.as_str());
    }
    if let Some(text) = &flags.footer {
        options = options.with_footer(text.as_str());
    }
    if flags.no_title {
        options = options.with_title(false);
    }
    if flags.no_page_numbers {
        options = options.with_page_numbers(false);
    }
    if flags.no_bibliography {
        options = options.with_bibliography(false);
    }
    Ok(options)
}

fn load_source(path: &Path) -> CliResult<DocumentSource> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

fn print_stats(result: &ExportResult) {
    let stats = &result.stats;
    if stats.page_count > 0 {
        println!("  {}: {}", "Pages".bold(), stats.page_count);
    }
    println!("  {}: {}", "Blocks".bold(), stats.block_count);
    println!("  {}: {}", "Headings".bold(), stats.heading_count);
    println!("  {}: {}", "Words".bold(), stats.word_count);
    if stats.reference_count > 0 {
        println!("  {}: {}", "References".bold(), stats.reference_count);
    }
    println!("  {}: {} bytes", "Size".bold(), result.output.len());
}

fn cmd_export(input: &Path, output: Option<&Path>, doc_type: &str, flags: &OptionFlags) -> CliResult {
    let doc_type: DocumentType = doc_type.parse()?;
    let options = build_options(flags)?;
    let source = load_source(input)?;

    let result = export_with_stats(doc_type, &source, &options)?;
    let filename = suggested_filename(&source.title, result.format);

    let saved = match output {
        Some(path) => {
            let target = path.to_path_buf();
            let sink = PickerSink::new(move |_: &str| Some(target.clone()));
            save_export(&result.output, &filename, &sink)?
        }
        None => save_export(&result.output, &filename, &DownloadSink::new("."))?,
    };

    match saved {
        Some(location) => {
            println!("{} {}", "Saved to".green(), location);
            print_stats(&result);
        }
        None => println!("{}", "Cancelled".yellow()),
    }
    Ok(())
}

fn cmd_batch(inputs: &[PathBuf], output: &Path, doc_type: &str, flags: &OptionFlags) -> CliResult {
    let doc_type: DocumentType = doc_type.parse()?;
    let options = build_options(flags)?;

    let pb = ProgressBar::new(inputs.len() as u64 + 1);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Loading sources...");
    let mut jobs = Vec::with_capacity(inputs.len());
    for input in inputs {
        jobs.push(ExportJob::new(doc_type, load_source(input)?, options.clone()));
    }
    pb.inc(1);

    pb.set_message("Exporting...");
    let results = export_batch(&jobs);

    let sink = DownloadSink::new(output);
    let mut failures = 0;
    let mut saved = Vec::new();
    for ((input, job), result) in inputs.iter().zip(&jobs).zip(results) {
        match result {
            Ok(result) => {
                let filename = suggested_filename(&job.source.title, result.format);
                if let Some(name) = save_export(&result.output, &filename, &sink)? {
                    saved.push(name);
                }
            }
            Err(e) => {
                failures += 1;
                pb.println(format!("{} {}: {}", "Failed".red(), input.display(), e));
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    println!("\n{} {}", "Output files in".green().bold(), output.display());
    for (i, name) in saved.iter().enumerate() {
        let branch = if i + 1 == saved.len() { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), name);
    }

    if failures > 0 {
        return Err(format!("{} of {} exports failed", failures, inputs.len()).into());
    }
    Ok(())
}

fn cmd_cite(input: &Path, style: &str, in_text: bool) -> CliResult {
    let style: CitationStyle = style.parse()?;
    let entries = parse_bibtex(&fs::read_to_string(input)?)?;

    for (i, entry) in sort_for_style(&entries, style).into_iter().enumerate() {
        if in_text {
            println!("{}  {}", entry.id.dimmed(), format_in_text(entry, style, None));
        } else if style == CitationStyle::Ieee {
            println!("[{}] {}", i + 1, format_bibliography_entry(entry, style));
        } else {
            println!("{}", format_bibliography_entry(entry, style));
        }
    }
    Ok(())
}

fn cmd_doi(doi: &str) -> CliResult {
    let rt = tokio::runtime::Runtime::new()?;
    let entry = rt.block_on(quire::citation::fetch_doi(doi))?;
    println!("{}", serde_json::to_string_pretty(&entry)?);
    Ok(())
}

fn cmd_info(input: &Path) -> CliResult {
    let data = fs::read(input)?;

    println!("{}", "File Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {} bytes", "Size".bold(), data.len());

    match quire::detect_format(&data) {
        Some(ExportFormat::Pdf) => {
            let version = pdf_version(&data).unwrap_or_else(|| "unknown".to_string());
            println!("{}: PDF {}", "Format".bold(), version);
        }
        Some(ExportFormat::Docx) => {
            println!("{}: DOCX", "Format".bold());
            let parts = read_archive(&data)?;
            println!("{}: {}", "Parts".bold(), parts.len());
            for (name, bytes) in &parts {
                println!("  {} {} ({} bytes)", "─".dimmed(), name, bytes.len());
            }
        }
        Some(ExportFormat::Tex) => {
            let text = String::from_utf8_lossy(&data);
            println!("{}: LaTeX", "Format".bold());
            println!("{}: {}", "Lines".bold(), text.lines().count());
        }
        None => println!("{}: {}", "Format".bold(), "not a quire export".yellow()),
    }
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "quire".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document export tool (PDF, DOCX, LaTeX)");
    println!();
    println!(
        "Formats: {}",
        ExportFormat::ALL
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("License: MIT");
}
