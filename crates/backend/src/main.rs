pub mod api;
pub mod dashboards;
pub mod routes;
pub mod shared;
pub mod system;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::http::{header, Method};
    use axum::middleware;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::services::ServeDir;

    use crate::shared::market_data::HttpMarketData;
    use crate::system::refresh_worker::MarketRefreshWorker;

    system::tracing::initialize()?;

    let config = shared::config::load_config()?;
    shared::config::initialize(config.clone())?;

    let db_path = shared::config::get_database_path(&config)?;
    shared::data::db::initialize_database(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    // Первое обновление до старта сервера, чтобы страница сразу имела данные
    let source = Arc::new(HttpMarketData::from_config(&config)?);
    let worker = MarketRefreshWorker::new(
        source,
        config.market.collections.clone(),
        config.market.refresh_interval_minutes * 60,
    );
    worker.refresh_once().await;
    tokio::spawn(async move {
        worker.run_loop().await;
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = routes::configure_routes()
        .fallback_service(ServeDir::new("dist"))
        .layer(middleware::from_fn(system::middleware::request_logger))
        .layer(cors);

    let port = config.server.port;
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
