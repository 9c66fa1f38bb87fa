use std::path::Path;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{Method, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use thiserror::Error;
use tower_http::services::ServeDir;

use crate::config::DashboardConfig;
use crate::dashboard::{Dashboard, DashboardError};

pub mod api;
pub mod routes;
pub mod session;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Dashboard(#[from] DashboardError),
    #[error("server I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Load the registry, then serve until the process is stopped.
pub fn run_server(config: &DashboardConfig) -> Result<(), ServerError> {
    let dashboard = Arc::new(Dashboard::load(config)?);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(
        dashboard,
        &config.bind_addr,
        config.assets_dir.as_deref(),
    ))?;
    Ok(())
}

async fn serve(
    dashboard: Arc<Dashboard>,
    bind_addr: &str,
    assets_dir: Option<&Path>,
) -> std::io::Result<()> {
    let app = router(dashboard, assets_dir);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("dispensary dashboard listening on http://{bind_addr}");
    axum::serve(listener, app).await
}

/// Every route except `/assets` goes through [`routes::route_request`].
pub fn router(dashboard: Arc<Dashboard>, assets_dir: Option<&Path>) -> Router {
    let mut app = Router::new();
    if let Some(dir) = assets_dir {
        app = app.nest_service("/assets", ServeDir::new(dir));
    }
    app.fallback(dispatch).with_state(dashboard)
}

async fn dispatch(
    State(dashboard): State<Arc<Dashboard>>,
    method: Method,
    uri: Uri,
    body: String,
) -> Response {
    let path = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), |pq| pq.as_str().to_string());
    let method_name = method.as_str().to_string();
    let handled = tokio::task::spawn_blocking(move || {
        routes::route_request(&dashboard, &method_name, &path, &body)
    })
    .await;

    match handled {
        Ok(response) => response.into_response(),
        Err(err) => {
            tracing::error!(%err, %method, %uri, "request handler panicked");
            axum::http::StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
