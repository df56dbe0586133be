use std::time::Duration;

use clap::{Parser, Subcommand};
use databrowse_core::client::paths;
use databrowse_core::config_file::{ConfigFile, load_config};
use databrowse_core::fragments::{parse_dataset_checkboxes, parse_options};
use databrowse_core::{
    Backend, HttpBackend, OptionEntry, Selection, SubmitOutcome, SubmitPipeline,
};
use tracing_subscriber::EnvFilter;

mod output;

use output::{ColorMode, TerminalView};

/// Browse categories, contexts and datasets on a databrowse server
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Server base URL
    #[arg(long, global = true, env = "DATABROWSE_URL")]
    url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "DATABROWSE_TIMEOUT")]
    timeout: Option<u64>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List categories
    Categories,

    /// List the contexts of a category
    Contexts {
        category: String,
    },

    /// List the datasets of a context
    Datasets {
        category: String,
        context: String,
    },

    /// Fetch values for the selected datasets and print them with citations
    Query {
        #[arg(long, default_value = "")]
        category: String,

        #[arg(long, default_value = "")]
        context: String,

        /// Dataset ID; repeat for several
        #[arg(long = "dataset")]
        datasets: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let color = ColorMode(!cli.no_color);

    // Resolve configuration: CLI flags > env vars > config file > defaults
    let config = load_config();
    let base_url = cli.url.unwrap_or_else(|| config.base_url());
    let timeout = resolve_timeout(cli.timeout, &config);
    let backend = HttpBackend::with_timeout(&base_url, timeout)?;

    match cli.command {
        Command::Categories => {
            let html = backend.fetch_fragment(paths::CATEGORIES).await?;
            print_choices(&parse_options(&html), color)
        }
        Command::Contexts { category } => {
            let html = backend.fetch_fragment(&paths::contexts(&category)).await?;
            print_choices(&parse_options(&html), color)
        }
        Command::Datasets { category, context } => {
            let html = backend
                .fetch_fragment(&paths::datasets(&category, &context))
                .await?;
            print_choices(&parse_dataset_checkboxes(&html), color)
        }
        Command::Query {
            category,
            context,
            datasets,
        } => query(backend, Selection::new(category, context, datasets), color).await,
    }
}

fn resolve_timeout(secs: Option<u64>, config: &ConfigFile) -> Duration {
    secs.map(Duration::from_secs)
        .unwrap_or_else(|| config.timeout())
}

fn print_choices(entries: &[OptionEntry], color: ColorMode) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    output::print_options(&mut out, entries, color)?;
    Ok(())
}

async fn query(backend: HttpBackend, selection: Selection, color: ColorMode) -> anyhow::Result<()> {
    // Column names come from the same fragment the page renders.
    let labels = if let Ok(valid) = selection.validate() {
        let path = paths::datasets(valid.category_id(), valid.context_id());
        match backend.fetch_fragment(&path).await {
            Ok(html) => parse_dataset_checkboxes(&html),
            Err(e) => {
                tracing::warn!(error = %e, "could not load dataset names");
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    let pipeline = SubmitPipeline::new(backend);
    let view = TerminalView::new(color);
    match pipeline.submit(&selection, &labels, &view).await {
        SubmitOutcome::Rendered { .. } => Ok(()),
        // The view already printed the alert.
        SubmitOutcome::Invalid(e) => Err(e.into()),
        SubmitOutcome::DataFetchFailed(e) => anyhow::bail!("Error fetching data: {}", e),
        SubmitOutcome::Superseded => Ok(()),
    }
}
