use anyhow::{Context, Result};
use axum::Router;
use clap::Parser;
use engine::{DocumentSource, Extraction, JsonLines, SearchEngine, TsvFile};
use server::{build_app, AppState};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Tab-separated source: url, crawled_at, html
    #[arg(long, default_value = "data/sample.tsv")]
    sample: PathBuf,
    /// JSON Lines source; takes precedence over --sample
    #[arg(long)]
    jsonl: Option<PathBuf>,
    /// Index surface forms without stemming
    #[arg(long)]
    no_stem: bool,
    /// Index all visible text instead of <span> contents only
    #[arg(long)]
    all_text: bool,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Write term frequencies after building the index
    #[arg(long)]
    export_zipf: bool,
    #[arg(long, default_value = "data/zipf.csv")]
    zipf_path: PathBuf,
    /// Maximum rows in the zipf export, 0 for all
    #[arg(long, default_value_t = 0)]
    zipf_max: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let source: Arc<dyn DocumentSource + Send + Sync> = match &args.jsonl {
        Some(path) => Arc::new(JsonLines::new(path)),
        None => Arc::new(TsvFile::new(&args.sample)),
    };

    let mut engine = SearchEngine::new();
    if args.all_text {
        engine.set_extraction(Extraction::AllText);
    }
    engine.load(source.as_ref()).context("loading documents")?;
    engine.build_index(!args.no_stem);

    if args.export_zipf {
        engine
            .export_zipf_csv(&args.zipf_path, args.zipf_max)
            .context("exporting zipf csv")?;
    }

    let app: Router = build_app(AppState::new(engine, source));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
