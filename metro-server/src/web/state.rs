//! Application state for the web layer.

use std::sync::Arc;

use crate::loader::DataLoader;
use crate::service::MetroService;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Graph, route cache and live trains
    pub service: Arc<MetroService>,

    /// Source of the network tables, used on reload
    pub loader: Arc<DataLoader>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(service: MetroService, loader: DataLoader) -> Self {
        Self {
            service: Arc::new(service),
            loader: Arc::new(loader),
        }
    }
}
