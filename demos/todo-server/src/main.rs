//! Todo API built from a model viewset and a hand-written health viewset.
//!
//! ```text
//! TODO_HOST=127.0.0.1 TODO_PORT=3000 TODO_API_KEY=secret cargo run -p todo-server
//! ```

mod health;
mod todos;

use axum::routing::get;
use rest_utils::prelude::*;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,rest_utils=debug")),
        )
        .init();

    let config = ConfigService::from_env("TODO_");
    let host = config.get_or("HOST", "127.0.0.1");
    let port: u16 = config.parse("PORT")?.unwrap_or(3000);

    let store = Arc::new(MemoryStore::<todos::Todo>::new());
    let mut router = RestRouter::new();
    router.register_viewset::<health::HealthViewSet>("/health", Some(vec!["health".into()]), RouteOverrides::new())?;
    router.register_viewset::<ModelViewSet<todos::TodoView>>(
        "/todos",
        Some(vec!["todos".into()]),
        RouteOverrides::new()
            .dependency(todos::api_key(config.get("API_KEY")))
            .dependency(todos::session(store)),
    )?;

    for route in router.routes() {
        tracing::debug!("{:>6} {}", route.method.as_ref(), route.path);
    }

    let openapi = router.openapi("Todo API", env!("CARGO_PKG_VERSION"));
    let app: Router = router
        .into_router()
        .route("/openapi.json", get(move || async move { Json(openapi) }))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }
}
