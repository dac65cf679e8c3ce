use anyhow::{bail, Context, Result};
use clap::Parser;
use reqwest::Client;
use sheetfeed::{
    config::Config,
    decode::WorkbookDecoder,
    fetch::{Source, SourceFetcher},
    process::{IngestOutcome, Pipeline},
    render,
};
use std::{num::NonZeroUsize, path::PathBuf, sync::Arc};
use tokio_stream::StreamExt;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Load a spreadsheet incrementally and print it as a paginated table.
#[derive(Debug, Parser)]
#[command(name = "sheetfeed", version)]
struct Args {
    /// URL or path of the spreadsheet (defaults to the configured source).
    source: Option<String>,

    /// YAML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Rows appended per increment.
    #[arg(long)]
    chunk_size: Option<NonZeroUsize>,

    #[arg(long)]
    rows_per_page: Option<usize>,

    /// Print every row on one page.
    #[arg(long)]
    no_pagination: bool,

    /// 1-based page to print once loading is done.
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Print the final table as JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) configuration ────────────────────────────────────────────
    let args = Args::parse();
    let mut cfg = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(source) = args.source {
        cfg.source = source;
    }
    if let Some(n) = args.chunk_size {
        cfg.ingest.chunk_size = n;
    }
    if let Some(n) = args.rows_per_page {
        cfg.display.rows_per_page = n;
    }
    if args.no_pagination {
        cfg.display.pagination = false;
    }
    let page = args.page.checked_sub(1).context("--page starts at 1")?;

    // ─── 3) start ingestion ──────────────────────────────────────────
    let source = Source::parse(&cfg.source);
    info!(source = %source, chunk_size = cfg.ingest.chunk_size.get(), "startup");
    let pipeline = Arc::new(Pipeline::new(
        Arc::new(SourceFetcher::new(Client::new())),
        Arc::new(WorkbookDecoder),
        cfg.ingest.clone(),
    ));
    let (handle, watcher) = pipeline.spawn(source);

    // ─── 4) follow the table as it grows ─────────────────────────────
    let mut updates = watcher.into_stream();
    let mut last = None;
    while let Some(snapshot) = updates.next().await {
        match render::render_progress(&snapshot, &cfg.display, page) {
            Some(view) if !args.json => eprint!("{view}"),
            _ => info!("{}", render::render_status(&snapshot)),
        }
        let done = !snapshot.is_processing();
        last = Some(snapshot);
        if done {
            break;
        }
    }

    let outcome = handle.await.context("ingestion task")?;
    let Some(snapshot) = last else {
        bail!("table was never published");
    };

    // ─── 5) print the result ─────────────────────────────────────────
    if args.json {
        let out = serde_json::json!({
            "columns": snapshot.columns(),
            "rows": snapshot.to_rows(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let pages = render::page_count(&snapshot, &cfg.display).max(1);
        if page >= pages {
            warn!(page = page + 1, pages, "page out of range; showing the last page");
        }
        print!("{}", render::render_page(&snapshot, &cfg.display, page));
    }

    match outcome {
        IngestOutcome::Completed(summary) => {
            info!(rows = summary.rows, chunks = summary.chunks, "all done");
            Ok(())
        }
        IngestOutcome::NoColumns => {
            info!("sheet has no header row");
            Ok(())
        }
        IngestOutcome::Failed(e) => {
            error!("ingestion failed");
            Err(e).context("loading spreadsheet")
        }
    }
}
