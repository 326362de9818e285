use std::sync::Arc;

use fieldstock_events::InMemoryEventBus;
use fieldstock_infra::{
    catalog::{InMemoryCatalog, InMemoryDirectory},
    central_stock::InMemoryCentralStock,
    coordinator::MovementCoordinator,
    event_store::InMemoryEventStore,
    query::LedgerQueries,
};
use fieldstock_ledger::MovementEvent;

type Coordinator = MovementCoordinator<
    Arc<InMemoryEventStore>,
    Arc<InMemoryCentralStock>,
    Arc<InMemoryEventBus<MovementEvent>>,
>;
type Queries = LedgerQueries<Arc<InMemoryEventStore>, Arc<InMemoryCatalog>, Arc<InMemoryDirectory>>;

/// Service graph shared by all handlers.
///
/// One event store and one central stock counter back both the write path
/// (coordinator) and the read path (queries). The catalog and directory are
/// stand-ins for the external services that own products and vendors.
pub struct AppServices {
    coordinator: Coordinator,
    queries: Queries,
    stock: Arc<InMemoryCentralStock>,
    catalog: Arc<InMemoryCatalog>,
    directory: Arc<InMemoryDirectory>,
}

impl AppServices {
    /// Wire the in-memory implementations (dev/demo deployments).
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryEventStore::new());
        let stock = Arc::new(InMemoryCentralStock::new());
        let catalog = Arc::new(InMemoryCatalog::new());
        let directory = Arc::new(InMemoryDirectory::new());
        let bus: Arc<InMemoryEventBus<MovementEvent>> = Arc::new(InMemoryEventBus::new());

        Self {
            coordinator: MovementCoordinator::new(store.clone(), stock.clone(), bus),
            queries: LedgerQueries::new(store, catalog.clone(), directory.clone()),
            stock,
            catalog,
            directory,
        }
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    pub fn queries(&self) -> &Queries {
        &self.queries
    }

    pub fn stock(&self) -> &Arc<InMemoryCentralStock> {
        &self.stock
    }

    pub fn catalog(&self) -> &Arc<InMemoryCatalog> {
        &self.catalog
    }

    pub fn directory(&self) -> &Arc<InMemoryDirectory> {
        &self.directory
    }
}
