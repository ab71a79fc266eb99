use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use tracing_subscriber::EnvFilter;

use pdfaudit::config::validate_config;
use pdfaudit::processor::{OcrProcessor, PdftoppmRenderer};
use pdfaudit::storage::status_directory;
use pdfaudit::{
    isolate_suspects, load_config, organize_by_status, Config, ConfigError, CorpusScanner,
    DirectoryScanner, DocumentAnalyzer, LogProgress, TextStatus,
};

/// Flags PDFs whose OCR text disagrees with their embedded text layer.
#[derive(Parser, Debug)]
#[command(name = "pdfaudit", version)]
struct Cli {
    /// Directory to scan recursively (prompted for when omitted)
    root: Option<PathBuf>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of documents analyzed in parallel
    #[arg(short, long)]
    workers: Option<usize>,

    /// Rasterization resolution for OCR
    #[arg(long)]
    dpi: Option<u32>,

    /// Tesseract language code; repeat for several
    #[arg(long = "lang")]
    languages: Vec<String>,

    /// Similarity below which a document is flagged
    #[arg(long)]
    threshold: Option<f64>,

    /// Report file (relative paths are under ROOT; default: pdf_anomalies_report.json)
    #[arg(long)]
    report: Option<PathBuf>,

    /// Folder suspicious copies go to (relative paths are under ROOT)
    #[arg(long)]
    suspect_dir: Option<PathBuf>,

    /// Do not copy suspicious documents
    #[arg(long)]
    no_copy: bool,

    /// Do not treat image-only documents as suspicious
    #[arg(long)]
    exclude_image_only: bool,

    /// Also copy every document into a folder named after its status
    #[arg(long)]
    organize: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn init_logging(json: bool) -> Result<()> {
    tracing_log::LogTracer::init().context("failed to bridge log records")?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    let installed = if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    installed.context("failed to install tracing subscriber")
}

fn prompt_for_root() -> Result<PathBuf> {
    print!("Enter the folder path to scan: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read folder path from stdin")?;

    Ok(PathBuf::from(line.trim().trim_matches('"')))
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(workers) = cli.workers {
        config.worker_count = workers;
    }
    if let Some(dpi) = cli.dpi {
        config.ocr.dpi = dpi;
    }
    if !cli.languages.is_empty() {
        config.ocr.languages = cli.languages.clone();
    }
    if let Some(threshold) = cli.threshold {
        config.classification.low_similarity_threshold = threshold;
    }
    if let Some(path) = &cli.report {
        config.report.filename = path.to_string_lossy().into_owned();
    }
    if let Some(dir) = &cli.suspect_dir {
        config.report.suspect_directory = dir.to_string_lossy().into_owned();
    }
    if cli.no_copy {
        config.report.copy_suspects = false;
    }
    if cli.exclude_image_only {
        config.report.include_image_only = false;
    }
    if cli.organize {
        config.report.organize_by_status = true;
    }
}

fn under_root(root: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

fn report_path(root: &Path, config: &Config) -> PathBuf {
    under_root(root, &config.report.filename)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs)?;

    info!("Starting pdfaudit v{}", env!("CARGO_PKG_VERSION"));

    let root = match &cli.root {
        Some(root) => root.clone(),
        None => prompt_for_root()?,
    };
    if !root.is_dir() {
        return Err(ConfigError::InvalidRoot(root).into());
    }

    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    apply_overrides(&mut config, &cli);
    validate_config(&config).context("invalid configuration")?;

    PdftoppmRenderer::check_available()?;
    OcrProcessor::new(&config.ocr.languages, config.ocr.dpi).check_available()?;

    let suspect_dir = under_root(&root, &config.report.suspect_directory);
    let report_path = report_path(&root, &config);

    let mut scanner = DirectoryScanner::new(&root).exclude(&suspect_dir);
    for status in TextStatus::ALL {
        scanner = scanner.exclude(status_directory(&root, status));
    }

    let corpus = CorpusScanner::new(DocumentAnalyzer::from_config(&config), config.worker_count);
    let shutdown = corpus.shutdown_handle();
    ctrlc::set_handler(move || {
        if !shutdown.swap(true, Ordering::Relaxed) {
            warn!("Interrupt received; finishing documents in progress");
        }
    })
    .context("failed to install Ctrl-C handler")?;

    let progress = LogProgress::new(config.report.include_image_only);
    let outcome = corpus.scan_directory(&scanner, &progress)?;

    outcome
        .report
        .write_json(&report_path)
        .with_context(|| format!("failed to write report to {}", report_path.display()))?;
    info!("Report saved to {}", report_path.display());

    if config.report.copy_suspects {
        isolate_suspects(
            &outcome.report,
            &root,
            &suspect_dir,
            config.report.include_image_only,
        )?;
    }

    if config.report.organize_by_status {
        organize_by_status(&outcome.report, &root)?;
    }

    if outcome.cancelled {
        warn!(
            "Scan cancelled: {} of {} documents were not analyzed",
            outcome.skipped(),
            outcome.total
        );
    }
    info!("Summary: {}", outcome.report.summary());

    Ok(())
}
