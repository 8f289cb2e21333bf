mod repl;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tripwise_checkpoint_sqlite::SqliteCheckpointer;
use tripwise_core::{RetryPolicy, SimilaritySearch};
use tripwise_embeddings::GoogleEmbedding;
use tripwise_graph::{FileCheckpointer, InMemoryCheckpointer};
use tripwise_llm::GoogleClient;
use tripwise_planner::{
    index_corpus, AviationStackFlightLookup, OpenWeatherLookup, PlannerConfig, PlannerContext,
    TripPlanner, TripState,
};

#[derive(Parser, Debug)]
#[command(name = "tripwise", version, about = "Plan trips from a travel brochure, one chat turn at a time")]
struct Cli {
    /// Google AI Studio API key used for chat and embeddings
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Travel brochure to index (PDF or plain text)
    #[arg(long, env = "TRIPWISE_CORPUS")]
    corpus: PathBuf,

    #[arg(long, env = "TRIPWISE_CHAT_MODEL", default_value = "gemini-2.5-flash")]
    chat_model: String,

    #[arg(long, env = "TRIPWISE_EMBEDDING_MODEL", default_value = "gemini-embedding-001")]
    embedding_model: String,

    #[arg(long, default_value_t = 768)]
    embedding_dimension: usize,

    /// Passages retrieved per destination lookup
    #[arg(long, default_value_t = 3)]
    top_k: usize,

    /// Per-attempt timeout for model and search calls
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    /// Enables airport lookups through AviationStack instead of the placeholder
    #[arg(long, env = "AVIATIONSTACK_API_KEY", hide_env_values = true)]
    aviationstack_key: Option<String>,

    /// Enables live weather through OpenWeatherMap instead of the placeholder
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    openweather_key: Option<String>,

    /// Keep paused budgets as JSON lines under this directory.
    /// Chat history is not stored and starts empty on every run.
    #[arg(long, env = "TRIPWISE_CHECKPOINT_DIR", conflicts_with = "database_url")]
    checkpoint_dir: Option<PathBuf>,

    /// Keep paused budgets in SQLite, e.g. sqlite://tripwise.db.
    /// Chat history is not stored and starts empty on every run.
    #[arg(long, env = "TRIPWISE_DATABASE_URL")]
    database_url: Option<String>,

    /// Conversation thread to use
    #[arg(long, default_value = "default")]
    thread: String,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Interactive chat (the default)
    Chat,
    /// Send a single message and print the reply.
    ///
    /// Each run starts with empty chat history. With a checkpoint store, a
    /// pending budget still carries over, so `ask proceed` can approve it.
    Ask { message: String },
}

fn setup_logging(verbose: bool) {
    let default = if verbose { "tripwise=debug" } else { "tripwise=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

impl Cli {
    fn planner_config(&self) -> PlannerConfig {
        PlannerConfig {
            retrieval_k: self.top_k,
            chat_model: self.chat_model.clone(),
            embedding_model: self.embedding_model.clone(),
            embedding_dimension: self.embedding_dimension,
            retry: RetryPolicy::new(2, Some(Duration::from_secs(self.timeout_secs))),
            ..PlannerConfig::default()
        }
    }
}

fn build_context<S>(cli: &Cli, config: PlannerConfig, search: S) -> Result<PlannerContext>
where
    S: SimilaritySearch + 'static,
{
    let llm = GoogleClient::new(cli.api_key.clone(), config.chat_model.clone())
        .context("failed to create Gemini client")?;
    let mut context = PlannerContext::new(llm, search, config);

    if let Some(key) = &cli.aviationstack_key {
        context = context.with_flight_lookup(
            AviationStackFlightLookup::new(key.clone()).context("failed to create flight lookup")?,
        );
    }
    if let Some(key) = &cli.openweather_key {
        context = context.with_weather_lookup(
            OpenWeatherLookup::new(key.clone()).context("failed to create weather lookup")?,
        );
    }
    Ok(context)
}

async fn build_planner(cli: &Cli, context: PlannerContext) -> Result<TripPlanner> {
    let planner = if let Some(url) = &cli.database_url {
        let checkpointer = SqliteCheckpointer::builder(url.clone())
            .build()
            .await
            .with_context(|| format!("failed to open checkpoint database {url}"))?;
        TripPlanner::with_checkpointer(context, checkpointer)?
    } else if let Some(dir) = &cli.checkpoint_dir {
        TripPlanner::with_checkpointer(context, FileCheckpointer::new(dir))?
    } else {
        TripPlanner::with_checkpointer(context, InMemoryCheckpointer::<TripState>::new())?
    };
    Ok(planner)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = cli.planner_config();
    let embedder = GoogleEmbedding::new(
        cli.api_key.clone(),
        config.embedding_model.clone(),
        config.embedding_dimension,
    );
    let retriever = index_corpus(&cli.corpus, embedder, &config)
        .await
        .with_context(|| format!("failed to index {}", cli.corpus.display()))?;

    let context = build_context(&cli, config, retriever)?;
    let planner = build_planner(&cli, context).await?;

    match &cli.command {
        Some(Command::Ask { message }) => repl::ask(&planner, &cli.thread, message).await,
        Some(Command::Chat) | None => repl::chat(&planner, &cli.thread).await,
    }
}
