use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use transit_planner::config::{ServerConfig, SourceConfig};
use transit_planner::graph::StationGraph;
use transit_planner::interchange::default_allow_list;
use transit_planner::planner::{JourneyCacheConfig, JourneyPlanner, PlannerConfig};
use transit_planner::transit_data::TransitDataConfig;
use transit_planner::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;

    match &config.source {
        SourceConfig::Http(http) => info!(base_url = %http.base_url, "using live stop API"),
        SourceConfig::Fixture(dir) => info!(dir = %dir.display(), "using fixture stop data"),
    }
    let source = config.source.build()?;

    let graph = StationGraph::default_network()?;
    info!(stations = graph.len(), "loaded rail topology");

    let planner = JourneyPlanner::new(
        Arc::new(source),
        Arc::new(graph),
        default_allow_list(),
        PlannerConfig::default(),
        &TransitDataConfig::default(),
        &JourneyCacheConfig::default(),
    );

    let app = create_router(AppState::new(planner)).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "transit planner listening");
    info!("  GET    /health        - Health check");
    info!("  POST   /journey/plan  - Plan a journey");
    info!("  DELETE /journey/cache - Clear cached journeys");

    axum::serve(listener, app).await?;
    Ok(())
}
