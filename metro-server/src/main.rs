use metro_server::config::ServerConfig;
use metro_server::loader::DataLoader;
use metro_server::service::{MetroService, ServiceConfig};
use metro_server::web::{AppState, create_router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("metro_server=info")),
        )
        .init();

    let config = ServerConfig::from_env().expect("Invalid server configuration");

    // Fail fast if the tables are unreadable
    let loader = DataLoader::new(&config.data_dir);
    let data = loader.load().expect("Failed to load network data");

    let (service, report) =
        MetroService::from_sources(&data.sources, &data.coordinates, ServiceConfig::default());
    info!(
        stations = report.stations,
        track_edges = report.track_edges,
        interchange_edges = report.interchange_edges,
        dropped_pairs = report.dropped_pairs,
        "Built network"
    );

    let state = AppState::new(service, loader);
    let service = state.service.clone();
    let app = create_router(state, &config.static_dir);

    let addr = config.bind_addr;
    info!("Metro planner listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .unwrap();

    let stopped = service.shutdown().await;
    info!(stopped, "Stopped running trains");
}
