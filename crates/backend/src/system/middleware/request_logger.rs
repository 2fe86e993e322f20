use axum::body::Body;
use axum::http::{header, Request};
use axum::middleware::Next;
use axum::response::Response;

/// Middleware для логирования HTTP запросов
///
/// Пишет в tracing: метод, путь, статус, длительность (ms) и размер
/// ответа, если он известен из Content-Length.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    let status = response.status();
    let size = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| "-".to_string());
    let duration_ms = start.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(%method, %path, status = status.as_u16(), duration_ms, %size, "request failed");
    } else if status.is_client_error() {
        tracing::warn!(%method, %path, status = status.as_u16(), duration_ms, %size, "request rejected");
    } else {
        tracing::info!(%method, %path, status = status.as_u16(), duration_ms, %size, "request");
    }

    response
}
