use std::net::SocketAddr;
use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use crate::customers;
use crate::state::AppState;

pub fn build_app(state: AppState) -> Router {
    let storage = &state.config.storage;
    let images_dir = storage.public_dir.join(&storage.images_prefix);
    let images_route = format!("/{}", storage.images_prefix);
    let max_upload_bytes = storage.max_upload_bytes;

    Router::new()
        .merge(customers::router(max_upload_bytes))
        .nest("/api/v1", Router::new().route("/health", get(|| async { "ok" })))
        .nest_service(&images_route, ServeDir::new(images_dir))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
