use anyhow::Context;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use vendor_research::{
    ProviderCredentials, ResearchConfig, ResearchOrchestrator,
    cli::{
        Cli, Commands, OutputFormat,
        output::{Output, render_query_batch},
    },
    research::{generate, normalize_vendor_name},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    let config = ResearchConfig::load_requested(cli.config.as_deref())
        .context("Failed to load configuration")?;

    init_tracing(&config.research.log_level, cli.verbose, cli.log_json);

    match cli.command {
        Commands::Queries { vendor, services } => {
            let batch = generate(&vendor, services.as_deref());
            print!("{}", render_query_batch(&batch));
        }

        Commands::Assess {
            vendor,
            services,
            timeout_ms,
            format,
        } => {
            let credentials = match ProviderCredentials::from_config(&config) {
                Ok(credentials) => credentials,
                Err(e) => {
                    output.error(&e.to_string());
                    output.hint(
                        "Set the provider API keys in the environment or a .env file, \
                         or point api_key_env at another variable in the config file",
                    );
                    return Err(e.into());
                }
            };

            let timeout = timeout_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| config.timeout());
            let orchestrator = ResearchOrchestrator::from_credentials(&credentials)
                .context("Failed to construct research providers")?
                .with_timeout(timeout);

            let results = orchestrator
                .research_vendor(&vendor, services.as_deref())
                .await;

            output.summary(&normalize_vendor_name(&vendor), &results);

            match format {
                OutputFormat::Text => print!("{}", results.to_prompt()),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
            }
        }
    }

    Ok(())
}

fn init_tracing(log_level: &str, verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { log_level };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vendor_research={}", default_level)));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
