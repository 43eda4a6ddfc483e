use std::error::Error;
use std::sync::Arc;

use phonerelay::{
    AppState, CommunicationService, Config, LookupService, TwilioClient, logging, router,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = Config::from_env()?;
    logging::init(config.log_format);
    if let Some(path) = &config.dotenv_path {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    let mut builder = TwilioClient::builder(config.credentials.clone())
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
    if let Some(url) = &config.api_base_url {
        builder = builder.api_base_url(url.as_str());
    }
    if let Some(url) = &config.lookup_base_url {
        builder = builder.lookup_base_url(url.as_str());
    }
    if let Some(timeout) = config.http_timeout {
        builder = builder.timeout(timeout);
    }
    let client = Arc::new(builder.build()?);

    let state = AppState {
        lookup: LookupService::new(client.clone(), config.dispatcher),
        communication: CommunicationService::new(client, config.dispatcher, config.outbound.clone()),
    };

    let listener = TcpListener::bind(config.listen).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        account = config.credentials.account_sid().as_str(),
        concurrency = config.dispatcher.concurrency().get(),
        policy = config.dispatcher.policy().as_str(),
        template_mode = config.outbound.template_mode.as_str(),
        template_single = config.outbound.template_single,
        "listening"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("shutting down");
}
