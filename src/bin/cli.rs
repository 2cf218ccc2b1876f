//! CLI binary for docmatch.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use docmatch::{
    DocumentExtractor, MatchConfig, MatchPipeline, ProgressCallback, ProgressEvent, report,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Rank candidate documents by how many requirement keywords they contain.
#[derive(Parser)]
#[command(name = "docmatch", version, about)]
struct Cli {
    /// Directory of documents (.txt, .pdf, .jpg, .jpeg, .png).
    #[arg(default_value = "resumes")]
    dir: PathBuf,

    /// Requirement keywords, comma- or space-separated.
    #[arg(short, long)]
    requirements: Option<String>,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum documents extracted at once.
    #[arg(long)]
    admission_limit: Option<usize>,

    /// Records per batch handed to the scoring workers.
    #[arg(long)]
    batch_size: Option<usize>,

    /// Batches buffered between extraction and scoring.
    #[arg(long)]
    queue_capacity: Option<usize>,

    /// Scoring workers (default: available parallelism).
    #[arg(long)]
    workers: Option<usize>,

    /// Path to the tesseract binary.
    #[arg(long)]
    tesseract: Option<PathBuf>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,

    /// Hide the progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Also write logs to a daily rolling file in this directory.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<MatchConfig> {
        let mut config = match &self.config {
            Some(path) => MatchConfig::from_file(path)?,
            None => {
                let default = MatchConfig::default_config_path();
                if default.is_file() {
                    MatchConfig::from_file(&default)?
                } else {
                    MatchConfig::default()
                }
            }
        };

        if let Some(requirements) = self.requirements {
            config.requirements = requirements;
        }
        if let Some(k) = self.admission_limit {
            config.pipeline.admission_limit = k;
        }
        if let Some(b) = self.batch_size {
            config.pipeline.batch_size = b;
        }
        if let Some(q) = self.queue_capacity {
            config.pipeline.queue_capacity = q;
        }
        if self.workers.is_some() {
            config.pipeline.workers = self.workers;
        }
        if self.tesseract.is_some() {
            config.extract.tesseract_path = self.tesseract;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.log_dir.as_deref());

    let dir = cli.dir.clone();
    let json = cli.json;
    let show_progress = !cli.no_progress && !json;
    let config = cli.into_config()?;
    config.validate()?;

    let extractor = DocumentExtractor::new(config.extract_config())?;
    let mut pipeline = MatchPipeline::new(config, extractor);

    let bar = show_progress.then(progress_bar);
    if let Some(bar) = &bar {
        pipeline = pipeline.with_progress(progress_callback(bar.clone()));
    }

    // Handle Ctrl+C
    let cancel = pipeline.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received Ctrl+C, shutting down...");
            cancel.cancel();
        }
    });

    let result = pipeline.run_directory(&dir).await;
    if let Some(bar) = &bar {
        bar.finish_and_clear();
    }
    let report = result?;

    if json {
        println!("{}", report::render_json(&report)?);
    } else {
        print!("{}", report::render_text(&report));
    }
    Ok(())
}

/// Install stderr logging plus an optional daily log file.
///
/// The returned guard flushes the file writer on drop.
fn init_tracing(log_dir: Option<&std::path::Path>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    // Users can override with RUST_LOG=debug to see everything.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("docmatch=info,docmatch_extract=info"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "docmatch.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();
    guard
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    if let Ok(style) =
        ProgressStyle::with_template("  {msg} [{bar:30}] {pos}/{len} documents ({elapsed})")
    {
        pb.set_style(style);
    }
    pb.set_message("extracting");
    pb
}

fn progress_callback(pb: ProgressBar) -> ProgressCallback {
    Arc::new(move |event| match event {
        ProgressEvent::Enumerated { total } => pb.set_length(total as u64),
        ProgressEvent::DocumentExtracted { id, failed } => {
            if failed {
                pb.println(format!("  warning: could not extract {id}; scoring it as 0"));
            }
            pb.inc(1);
        }
        ProgressEvent::BatchQueued { .. } => {}
        ProgressEvent::BatchScored { seq, .. } => {
            pb.set_message(format!("scored batch {seq}"));
        }
    })
}
