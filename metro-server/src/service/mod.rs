//! Core facade used by the request layer.
//!
//! Owns the current graph, the route cache and the train scheduler. All
//! operations take station identifiers; resolving names is a separate
//! step so "no such station" and "no route" stay distinct.

mod error;
mod types;

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, info};

use crate::broadcast::{Broadcaster, PublishReport, SubscriberId, TrainEvent};
use crate::cache::{RouteCache, RouteKey};
use crate::domain::{PathResult, SearchMode, Station, StationId};
use crate::network::{BuildReport, CoordinateRecord, GraphBuilder, NetworkSources, TransitGraph};
use crate::planner::{PathFinder, segment_minutes};
use crate::simulator::{SimulationPlan, TrainScheduler, check_speed, segment_seconds};

pub use error::ServiceError;
pub use types::{
    Neighbor, RouteSegments, SegmentTime, ServiceConfig, SimulationStarted, StartSimulation,
};

/// A graph together with the reload generation that produced it.
#[derive(Clone)]
struct Snapshot {
    generation: u64,
    graph: Arc<TransitGraph>,
}

/// The metro network and its live trains.
pub struct MetroService {
    network: RwLock<Snapshot>,
    config: ServiceConfig,
    cache: RouteCache,
    scheduler: TrainScheduler,
}

impl MetroService {
    pub fn new(graph: TransitGraph, config: ServiceConfig) -> Self {
        let broadcaster = Arc::new(Broadcaster::new(config.simulation.subscriber_buffer));
        Self {
            network: RwLock::new(Snapshot {
                generation: 0,
                graph: Arc::new(graph),
            }),
            cache: RouteCache::new(&config.cache),
            scheduler: TrainScheduler::new(broadcaster, config.simulation.clone()),
            config,
        }
    }

    /// Build the graph from sources and wrap it in a service.
    pub fn from_sources(
        sources: &NetworkSources,
        coordinates: &[CoordinateRecord],
        config: ServiceConfig,
    ) -> (Self, BuildReport) {
        let (graph, report) = build_graph(sources, coordinates, &config);
        (Self::new(graph, config), report)
    }

    /// Snapshot of the current graph.
    pub async fn graph(&self) -> Arc<TransitGraph> {
        self.snapshot().await.graph
    }

    async fn snapshot(&self) -> Snapshot {
        self.network.read().await.clone()
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub async fn list_stations(&self) -> Vec<Station> {
        self.graph().await.stations().to_vec()
    }

    pub async fn resolve_station(&self, name: &str) -> Result<StationId, ServiceError> {
        self.graph()
            .await
            .resolve(name)
            .ok_or_else(|| ServiceError::UnknownStation(name.trim().to_string()))
    }

    pub async fn search_stations(&self, query: &str, limit: usize) -> Vec<Station> {
        self.graph()
            .await
            .search(query, limit)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Shortest route between two stations, cached per graph.
    pub async fn shortest_path(
        &self,
        origin: StationId,
        destination: StationId,
        mode: SearchMode,
    ) -> Result<Arc<PathResult>, ServiceError> {
        let snapshot = self.snapshot().await;
        self.route_on(&snapshot, origin, destination, mode).await
    }

    async fn route_on(
        &self,
        snapshot: &Snapshot,
        origin: StationId,
        destination: StationId,
        mode: SearchMode,
    ) -> Result<Arc<PathResult>, ServiceError> {
        let graph = snapshot.graph.as_ref();
        known(graph, origin)?;
        known(graph, destination)?;

        let finder = PathFinder::new(graph, &self.config.planner);
        let key = RouteKey::new(snapshot.generation, origin, destination, mode);
        self.cache
            .get_or_search(key, || finder.shortest(origin, destination, mode))
            .await
            .ok_or_else(|| ServiceError::RouteNotFound {
                origin: display_name(graph, origin),
                destination: display_name(graph, destination),
            })
    }

    pub async fn fare_between(
        &self,
        origin: StationId,
        destination: StationId,
    ) -> Result<f64, ServiceError> {
        let graph = self.graph().await;
        known(&graph, origin)?;
        known(&graph, destination)?;
        graph
            .fare(origin, destination)
            .ok_or_else(|| ServiceError::FareNotFound {
                origin: display_name(&graph, origin),
                destination: display_name(&graph, destination),
            })
    }

    /// The route in `mode` with the travel time of each segment.
    pub async fn edge_times(
        &self,
        origin: StationId,
        destination: StationId,
        mode: SearchMode,
    ) -> Result<RouteSegments, ServiceError> {
        let snapshot = self.snapshot().await;
        let route = self.route_on(&snapshot, origin, destination, mode).await?;
        let minutes = segment_minutes(&snapshot.graph, &route.station_ids);

        let segments = route
            .station_names
            .windows(2)
            .zip(minutes)
            .map(|(pair, travel_time_min)| SegmentTime {
                from: pair[0].clone(),
                to: pair[1].clone(),
                travel_time_min,
            })
            .collect();

        Ok(RouteSegments {
            path: route.station_names.clone(),
            segments,
        })
    }

    /// Out-edges of a station, sorted by neighbour name.
    pub async fn neighbors(&self, station: StationId) -> Result<Vec<Neighbor>, ServiceError> {
        let graph = self.graph().await;
        known(&graph, station)?;

        let mut neighbors: Vec<Neighbor> = graph
            .neighbors(station)
            .iter()
            .map(|edge| Neighbor {
                station_id: edge.to,
                neighbor: display_name(&graph, edge.to),
                travel_time_min: edge.minutes,
                kind: edge.kind,
            })
            .collect();
        neighbors.sort_by(|a, b| a.neighbor.cmp(&b.neighbor));
        Ok(neighbors)
    }

    /// Find a route and start a train along it.
    ///
    /// Parameters are validated before anything is scheduled.
    pub async fn start_simulation(
        &self,
        request: StartSimulation,
    ) -> Result<SimulationStarted, ServiceError> {
        let simulation = &self.config.simulation;
        let snapshot = self.snapshot().await;
        check_speed(request.speed_factor)?;

        let route = self
            .route_on(&snapshot, request.origin, request.destination, request.mode)
            .await?;
        let minutes = segment_minutes(&snapshot.graph, &route.station_ids);
        let per_edge_seconds = segment_seconds(&minutes, request.speed_factor, simulation)?;

        let plan = SimulationPlan::new(
            route.station_names.clone(),
            per_edge_seconds.clone(),
            request.looping,
            request.tick_interval,
        )?;

        let train_id = request
            .train_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(default_train_id);
        let replaced = self.scheduler.start(train_id.clone(), plan).await;

        Ok(SimulationStarted {
            train_id,
            path: route.station_names.clone(),
            per_edge_seconds,
            replaced,
        })
    }

    pub async fn stop_simulation(&self, train_id: &str) -> bool {
        self.scheduler.stop(train_id).await
    }

    pub async fn list_simulations(&self) -> Vec<String> {
        self.scheduler.list().await
    }

    /// Stop every running train.
    pub async fn shutdown(&self) -> usize {
        self.scheduler.stop_all().await
    }

    pub fn broadcaster(&self) -> &Arc<Broadcaster> {
        self.scheduler.broadcaster()
    }

    pub async fn subscribe(&self) -> (SubscriberId, mpsc::Receiver<TrainEvent>) {
        self.broadcaster().subscribe_channel().await
    }

    /// Re-publish an event received from an external agent.
    pub async fn relay(&self, event: TrainEvent) -> PublishReport {
        self.broadcaster().publish(&event.sanitized()).await
    }

    /// Rebuild the graph and swap it in.
    ///
    /// Running trains keep the path they were started with.
    pub async fn reload(
        &self,
        sources: &NetworkSources,
        coordinates: &[CoordinateRecord],
    ) -> BuildReport {
        let (graph, report) = build_graph(sources, coordinates, &self.config);
        {
            let mut network = self.network.write().await;
            network.generation += 1;
            network.graph = Arc::new(graph);
        }
        self.cache.invalidate_all();
        info!(stations = report.stations, "Network reloaded");
        report
    }
}

fn build_graph(
    sources: &NetworkSources,
    coordinates: &[CoordinateRecord],
    config: &ServiceConfig,
) -> (TransitGraph, BuildReport) {
    let (mut graph, report) = GraphBuilder::new(config.build.clone()).build_with_report(sources);
    if !coordinates.is_empty() {
        let applied = graph.apply_coordinates(coordinates);
        debug!(
            updated = applied.updated,
            unmatched = applied.unmatched,
            "Applied station coordinates"
        );
    }
    (graph, report)
}

fn known(graph: &TransitGraph, id: StationId) -> Result<(), ServiceError> {
    if graph.contains(id) {
        Ok(())
    } else {
        Err(ServiceError::UnknownStation(id.to_string()))
    }
}

fn display_name(graph: &TransitGraph, id: StationId) -> String {
    graph
        .name(id)
        .map(String::from)
        .unwrap_or_else(|| id.to_string())
}

fn default_train_id() -> String {
    format!("Train-{}", Utc::now().timestamp_millis())
}
