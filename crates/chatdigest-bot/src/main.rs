use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chatdigest_bot::{config::Config, polling::run_polling, state::AppState, telegram::TelegramClient};
use chatdigest_digest::{DigestRunner, DigestScheduler, Renderer, Summarizer};
use chatdigest_llm::{ChatGenerator, ChatOptions, ClientFactory};
use chatdigest_persist::PersistClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("Starting chatdigest bot");

    let provider = config.provider_config()?;
    tracing::info!(provider = ?provider.provider_type(), model = %config.digest.model, "Initializing LLM client");
    let chat_client = ClientFactory::create_chat_client(provider)?;
    let generator = Arc::new(
        ChatGenerator::new(chat_client, config.digest.model.as_str())
            .with_options(ChatOptions::new().max_tokens(config.digest.max_tokens)),
    );

    let persist = PersistClient::builder()
        .backend(config.storage_backend()?)
        .retention_days(config.digest.retention_days)
        .default_interval_minutes(config.digest.interval_minutes)
        .build()
        .await?;
    tracing::info!(backend = %config.storage.backend, "Message store ready");

    let telegram = Arc::new(TelegramClient::new(
        &config.telegram_token,
        &config.telegram.api_url,
        Duration::from_secs(config.telegram.request_timeout_secs),
    )?);

    let runner = Arc::new(DigestRunner::new(
        persist.clone(),
        Summarizer::new(generator),
        Renderer::new(config.digest.message_ceiling, config.digest.trailer.as_str()),
        telegram.clone(),
    ));

    let scheduler = DigestScheduler::new(runner.clone())
        .with_poll_interval(Duration::from_secs(config.digest.poll_interval_secs))
        .spawn();

    let state = Arc::new(AppState::new(config, persist, telegram, runner));
    let (stop_tx, stop_rx) = watch::channel(false);
    let poller = tokio::spawn(run_polling(state, stop_rx));

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    let _ = stop_tx.send(true);
    scheduler.shutdown().await;
    poller.await?;

    tracing::info!("Chatdigest bot stopped");
    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
