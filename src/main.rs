use std::path::PathBuf;

use bmap::app::App;
use bmap::config::Config;
use bmap::error::AppResult;
use bmap::view::{SummaryRenderer, connect_views};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Map viewer state core driven by line commands on stdin.
#[derive(Debug, Parser)]
#[command(name = "bmap", version, about)]
struct Cli {
    /// Config file; defaults to $BMAP_CONFIG_PATH or the platform config dir.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Start with an empty map instead of the OSM basemap and point layers.
    #[arg(long)]
    no_seed: bool,
    /// Log at debug level unless RUST_LOG is set.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match run(cli).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{err}");
            1
        }
    };
    // The stdin reader may still be parked in a blocking read.
    std::process::exit(code);
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    let mut app = App::new_with_config(config);
    let _views = connect_views(app.store(), SummaryRenderer::new(std::io::stdout()))?;

    if !cli.no_seed {
        app.seed();
    }

    let mut stdout = std::io::stdout();
    app.run(&mut stdout).await?;

    let state = app.teardown();
    tracing::info!(
        layers = state.map.layers().len(),
        features = state.map.features().total_len(),
        bookmark = state.bookmark.count(),
        "session ended"
    );
    Ok(())
}
