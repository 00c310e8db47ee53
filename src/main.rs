//! event-intake server binary.

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use event_intake::adapters::ai::OpenAiExtractor;
use event_intake::adapters::drafting::TemplateEmailDrafter;
use event_intake::adapters::http::{app_router, IntakeHandlers};
use event_intake::adapters::storage::{FileEventRepository, InMemoryEventRepository};
use event_intake::application::{
    GetEventHandler, GetEventHistoryHandler, ProcessInitialHandler, ProcessReplyHandler,
};
use event_intake::config::{AppConfig, ServerConfig, StorageBackend};
use event_intake::ports::{EmailDrafter, EventRepository, FieldExtractor};

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections...");
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if server.json_logs() {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    init_tracing(&config.server);
    config.validate().context("validating configuration")?;

    let extractor_config = config.ai.extractor_config()?;
    info!(
        provider = ?config.ai.provider,
        model = %extractor_config.model,
        storage = ?config.engine.storage,
        "Starting event intake"
    );

    let extractor: Arc<dyn FieldExtractor> =
        Arc::new(OpenAiExtractor::new(extractor_config).context("building extractor")?);
    let drafter: Arc<dyn EmailDrafter> =
        Arc::new(TemplateEmailDrafter::new(config.engine.email_signature.clone()));
    let repository: Arc<dyn EventRepository> = match config.engine.storage {
        StorageBackend::Memory => Arc::new(InMemoryEventRepository::new()),
        StorageBackend::File => {
            info!(path = %config.engine.storage_path.display(), "Using file storage");
            Arc::new(FileEventRepository::new(&config.engine.storage_path))
        }
    };

    let intake = config.engine.intake_config(&config.ai);
    let handlers = IntakeHandlers::new(
        Arc::new(ProcessInitialHandler::with_config(
            extractor.clone(),
            drafter.clone(),
            repository.clone(),
            intake.clone(),
        )),
        Arc::new(ProcessReplyHandler::with_config(
            extractor,
            drafter,
            repository.clone(),
            intake,
        )),
        Arc::new(GetEventHandler::new(repository.clone())),
        Arc::new(GetEventHistoryHandler::new(repository)),
    );

    let app = app_router(
        handlers,
        &config.server.cors_origins_list(),
        config.server.request_timeout(),
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}
