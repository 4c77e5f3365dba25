use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ridemix_server::catalog::load_catalog;
use ridemix_server::config::{self, AppConfig, CliConfig};
use ridemix_server::generation::Generator;
use ridemix_server::llm::{CompletionOptions, LlmProvider, OpenAiProvider};
use ridemix_server::server::{run_server, ServerState};

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI
    /// arguments.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Path to the track catalog JSON file.
    #[clap(long)]
    pub catalog: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = config::DEFAULT_PORT)]
    pub port: u16,

    /// LLM model identifier for the external generation path.
    #[clap(long)]
    pub llm_model: Option<String>,

    /// Base URL of the OpenAI-compatible completion endpoint.
    #[clap(long)]
    pub llm_base_url: Option<String>,
}

impl From<&CliArgs> for CliConfig {
    fn from(args: &CliArgs) -> Self {
        CliConfig {
            catalog_path: args.catalog.clone(),
            port: args.port,
            llm_model: args.llm_model.clone(),
            llm_base_url: args.llm_base_url.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli_args = CliArgs::parse();
    let file_config = cli_args
        .config
        .as_deref()
        .map(config::load_file_config)
        .transpose()?;
    let app_config = AppConfig::resolve(&(&cli_args).into(), file_config)?;

    let catalog = Arc::new(load_catalog(&app_config.catalog_path)?);
    info!(
        tracks = catalog.len(),
        path = %app_config.catalog_path.display(),
        "Catalog loaded"
    );

    let mut options = CompletionOptions::default();
    let provider: Option<Arc<dyn LlmProvider>> = match &app_config.llm {
        Some(llm) => {
            options.temperature = llm.temperature;
            options.timeout = Duration::from_secs(llm.timeout_sec);
            info!(model = %llm.model, base_url = %llm.base_url, "LLM generation path enabled");
            Some(Arc::new(OpenAiProvider::new(
                llm.base_url.clone(),
                llm.api_key.clone(),
                llm.model.clone(),
            )))
        }
        None => {
            info!("No LLM api key configured, running heuristic-only");
            None
        }
    };

    let catalog_size = catalog.len();
    let generator = Arc::new(Generator::new(catalog, provider, options));
    let state = ServerState {
        start_time: Instant::now(),
        generator,
        catalog_size,
    };

    run_server(state, app_config.port).await
}
