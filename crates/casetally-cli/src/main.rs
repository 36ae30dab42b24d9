use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use casetally_core::config_file::{self, ConfigFile};
use casetally_core::{
    DatedRecord, ParserConfigBuilder, RegionSet, ReportParser, ResolvedRecord, aggregate,
    report_date,
};
use casetally_fetch::{DEFAULT_CACHE_DIR, DEFAULT_INDEX_URL, DocumentCache};
use casetally_pdf_mupdf::MupdfBackend;
use casetally_reporting::ExportFormat;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod output;

use output::{ColorMode, RunStats};

const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Case report tally - Extract per-region daily case counts from report PDFs
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download every daily report, extract counts and export per-region series
    Run {
        /// Page listing the report PDFs
        #[arg(long)]
        index_url: Option<String>,

        /// Directory for downloaded reports
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Write the aggregated series to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export format (csv or json). Defaults to the output file extension.
        #[arg(long)]
        format: Option<ExportFormat>,

        /// Drop records whose region confidence is below this value
        #[arg(long)]
        min_confidence: Option<f64>,

        /// Extra place substrings to discard (comma-separated)
        #[arg(long, value_delimiter = ',')]
        noise: Vec<String>,

        /// Only read the first N pages of each report (0 reads all)
        #[arg(long, default_value_t = 0)]
        max_pages: usize,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Dry run: print every match found in local report PDFs
    Extract {
        /// Report PDFs to read
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Extra place substrings to discard (comma-separated)
        #[arg(long, value_delimiter = ',')]
        noise: Vec<String>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Resolve free text to a canonical region
    Resolve {
        /// Place text, e.g. "Cordoba capital"
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// List the canonical regions
    Regions,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let file_config = config_file::load_config();

    match cli.command {
        Command::Run {
            index_url,
            cache_dir,
            output,
            format,
            min_confidence,
            noise,
            max_pages,
            no_color,
        } => {
            run(
                file_config,
                RunOptions {
                    index_url,
                    cache_dir,
                    output,
                    format,
                    min_confidence,
                    noise,
                    max_pages,
                    color: ColorMode(!no_color),
                },
            )
            .await
        }
        Command::Extract {
            files,
            noise,
            no_color,
        } => extract(&file_config, files, noise, ColorMode(!no_color)),
        Command::Resolve { text } => {
            let text = text.join(" ");
            let resolution = casetally_core::resolve(&text);
            output::print_resolution(&mut std::io::stdout(), &text, &resolution)?;
            Ok(())
        }
        Command::Regions => {
            output::print_regions(&mut std::io::stdout(), RegionSet::argentina())?;
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

struct RunOptions {
    index_url: Option<String>,
    cache_dir: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Option<ExportFormat>,
    min_confidence: Option<f64>,
    noise: Vec<String>,
    max_pages: usize,
    color: ColorMode,
}

/// Build the report parser from config-file noise tokens plus `extra_noise`.
fn build_parser(file_config: &ConfigFile, extra_noise: Vec<String>) -> anyhow::Result<ReportParser> {
    let from_file = file_config
        .parsing
        .as_ref()
        .and_then(|p| p.extra_noise_tokens.clone())
        .unwrap_or_default();

    let mut builder = ParserConfigBuilder::new();
    for token in from_file.into_iter().chain(extra_noise) {
        builder = builder.add_noise_token(token);
    }
    Ok(ReportParser::with_config(builder.build()?))
}

async fn run(file_config: ConfigFile, opts: RunOptions) -> anyhow::Result<()> {
    // Resolve configuration: CLI flags > env vars > config file > defaults
    let source = file_config.source.clone().unwrap_or_default();
    let output_config = file_config.output.clone().unwrap_or_default();

    let index_url = opts
        .index_url
        .or_else(|| std::env::var("CASETALLY_INDEX_URL").ok())
        .or(source.index_url)
        .unwrap_or_else(|| DEFAULT_INDEX_URL.to_string());
    let cache_dir = opts
        .cache_dir
        .or_else(|| std::env::var("CASETALLY_CACHE_DIR").ok().map(PathBuf::from))
        .or(source.cache_dir.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR));
    let output_path = opts.output.or(output_config.path.map(PathBuf::from));
    let format = match (opts.format, output_config.format) {
        (Some(format), _) => format,
        (None, Some(name)) => name.parse::<ExportFormat>().map_err(anyhow::Error::msg)?,
        (None, None) => output_path
            .as_deref()
            .and_then(ExportFormat::from_path)
            .unwrap_or_default(),
    };
    let min_confidence = opts
        .min_confidence
        .or(file_config.parsing.as_ref().and_then(|p| p.min_confidence));
    if let Some(min) = min_confidence
        && !(0.0..=1.0).contains(&min)
    {
        anyhow::bail!("min_confidence must be between 0 and 1, got {}", min);
    }

    let parser = Arc::new(build_parser(&file_config, opts.noise)?);
    let backend = Arc::new(MupdfBackend::new().with_max_pages(opts.max_pages));
    let color = opts.color;
    let mut stdout = std::io::stdout();

    let client = casetally_fetch::build_client(
        source.user_agent.as_deref(),
        Duration::from_secs(REQUEST_TIMEOUT_SECS),
    )?;
    let links = casetally_fetch::fetch_report_links(&client, &index_url).await?;

    let mut stats = RunStats {
        links: links.len(),
        ..RunStats::default()
    };
    let mut dated_links = Vec::new();
    for link in links {
        match report_date(&link) {
            Some(date) => dated_links.push((date, link)),
            None => {
                tracing::warn!(link, "skipping link without a report date");
                stats.undated += 1;
            }
        }
    }

    output::print_run_header(&mut stdout, &index_url, &cache_dir, &stats, color)?;

    let cancelled = Arc::new(AtomicBool::new(false));
    {
        let cancelled = Arc::clone(&cancelled);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancelled.store(true, Ordering::SeqCst);
            }
        });
    }

    let bar = indicatif::ProgressBar::new(dated_links.len() as u64);
    bar.set_style(
        indicatif::ProgressStyle::with_template(
            "{spinner:.cyan} {msg} [{bar:40.cyan/dim}] {pos}/{len} (eta {eta})",
        )?
        .progress_chars("=> "),
    );
    bar.enable_steady_tick(Duration::from_millis(120));

    let cache = DocumentCache::new(&cache_dir);
    let mut dated_records: Vec<DatedRecord> = Vec::new();

    for (date, link) in dated_links {
        if cancelled.load(Ordering::SeqCst) {
            bar.println("Interrupted; exporting reports parsed so far");
            break;
        }
        bar.set_message(date.format("%Y-%m-%d").to_string());

        let path = match cache.fetch(&client, &link).await {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(link, error = %e, "skipping report that could not be downloaded");
                stats.failed += 1;
                bar.inc(1);
                continue;
            }
        };

        let parser = Arc::clone(&parser);
        let backend = Arc::clone(&backend);
        let extracted = tokio::task::spawn_blocking(move || {
            parser.extract_records_via_backend(&path, &*backend)
        })
        .await?;

        match extracted {
            Ok(records) => {
                let total = records.len();
                let kept = apply_confidence_gate(records, min_confidence);
                stats.parsed += 1;
                stats.records += total;
                stats.below_confidence += total - kept.len();
                dated_records.extend(kept.into_iter().map(|record| DatedRecord { date, record }));
            }
            Err(e) => {
                tracing::warn!(link, error = %e, "skipping unreadable report");
                stats.failed += 1;
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    let series = aggregate(dated_records);
    output::print_series_summary(&mut stdout, &series, color)?;
    output::print_run_stats(&mut stdout, &stats, color)?;

    if let Some(path) = output_path {
        casetally_reporting::export_series(&series, format, &path)?;
        writeln!(stdout, "Wrote {} series to {}", series.len(), path.display())?;
    }

    Ok(())
}

/// Keep records at or above `min_confidence`; everything passes when unset.
fn apply_confidence_gate(
    records: Vec<ResolvedRecord>,
    min_confidence: Option<f64>,
) -> Vec<ResolvedRecord> {
    match min_confidence {
        Some(min) => records
            .into_iter()
            .filter(|r| r.confidence >= min)
            .collect(),
        None => records,
    }
}

fn extract(
    file_config: &ConfigFile,
    files: Vec<PathBuf>,
    noise: Vec<String>,
    color: ColorMode,
) -> anyhow::Result<()> {
    let parser = build_parser(file_config, noise)?;
    let backend = MupdfBackend::new();
    let mut stdout = std::io::stdout();

    for file_path in &files {
        if !file_path.exists() {
            anyhow::bail!("File not found: {}", file_path.display());
        }
        let name = display_name(file_path);
        let records = parser.extract_records_via_backend(file_path, &backend)?;
        output::print_extraction(&mut stdout, &name, report_date(&name), &records, color)?;
    }

    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
