mod api;
mod middleware;

use std::sync::Arc;

use lotscan_scraper::{PageHandle, Pipeline, StaticPage};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState, PageFactory};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = lotscan_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pipeline = Pipeline::from_config(&config)?;
    let user_agent = config.user_agent.clone();
    let page_factory: PageFactory = Arc::new(move || {
        let page: Box<dyn PageHandle> = Box::new(StaticPage::new(&user_agent)?);
        Ok(page)
    });
    let app = build_app(AppState::new(
        pipeline,
        page_factory,
        config.page_load_timeout_ms,
    ));

    tracing::info!(addr = %config.bind_addr, env = %config.env, "lotscan server listening");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
