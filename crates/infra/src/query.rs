//! Read side: ledger output decorated with catalog/directory data.
//!
//! Every answer here is recomputed from the event log on request; read
//! models are disposable. Names and prices are resolved at query time
//! through the [`crate::catalog`] ports.

use chrono::{DateTime, Utc};

use fieldstock_core::{MovementId, OperationId, ProductId, VendorId};
use fieldstock_ledger::{MovementKind, fleet_summary, vendor_balances};

use crate::catalog::{Catalog, Directory};
use crate::event_store::{EventStore, EventStoreError};

const UNKNOWN_PRODUCT: &str = "unknown product";
const UNKNOWN_VENDOR: &str = "unknown vendor";

/// One line of a vendor's current holdings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorBalance {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i64,
    /// Valued at the current catalog price, in smallest currency units.
    pub value: u64,
}

/// One vendor's standing in the fleet summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorStanding {
    pub vendor_id: VendorId,
    pub vendor_name: String,
    pub quantity: i64,
    pub value: i64,
}

/// Fleet-wide overview for dashboard-style consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetOverview {
    pub total_quantity: i64,
    pub total_value: i64,
    /// Sorted by value descending.
    pub per_vendor: Vec<VendorStanding>,
}

/// A movement event decorated for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementRecord {
    pub id: MovementId,
    pub operation_id: OperationId,
    pub vendor_id: VendorId,
    pub vendor_name: String,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub kind: MovementKind,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Query facade over the event store and the reference-data ports.
#[derive(Debug)]
pub struct LedgerQueries<S, Cat, Dir> {
    store: S,
    catalog: Cat,
    directory: Dir,
}

impl<S, Cat, Dir> LedgerQueries<S, Cat, Dir>
where
    S: EventStore,
    Cat: Catalog,
    Dir: Directory,
{
    pub fn new(store: S, catalog: Cat, directory: Dir) -> Self {
        Self {
            store,
            catalog,
            directory,
        }
    }

    /// Current holdings of one vendor, one line per product held.
    pub fn vendor_balances(
        &self,
        vendor_id: VendorId,
    ) -> Result<Vec<VendorBalance>, EventStoreError> {
        let events = self.store.vendor_events(vendor_id)?;

        Ok(
            vendor_balances(vendor_id, &events, |p| self.catalog.unit_price(p))
                .into_values()
                .map(|balance| VendorBalance {
                    product_id: balance.product_id,
                    product_name: self
                        .catalog
                        .product_name(balance.product_id)
                        .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
                    quantity: balance.quantity,
                    value: balance.value,
                })
                .collect(),
        )
    }

    /// Fleet-wide totals, per-vendor standings sorted by value descending.
    pub fn fleet_summary(&self) -> Result<FleetOverview, EventStoreError> {
        let events = self.store.all_events()?;
        let summary = fleet_summary(&events, |p| self.catalog.unit_price(p));

        Ok(FleetOverview {
            total_quantity: summary.total_quantity,
            total_value: summary.total_value,
            per_vendor: summary
                .per_vendor
                .into_iter()
                .map(|totals| VendorStanding {
                    vendor_id: totals.vendor_id,
                    vendor_name: self
                        .directory
                        .vendor_name(totals.vendor_id)
                        .unwrap_or_else(|| UNKNOWN_VENDOR.to_string()),
                    quantity: totals.quantity,
                    value: totals.value,
                })
                .collect(),
        })
    }

    /// Every movement, newest first. `occurred_at` orders the display only;
    /// balances never depend on it.
    pub fn movement_log(&self) -> Result<Vec<MovementRecord>, EventStoreError> {
        let mut records: Vec<MovementRecord> = self
            .store
            .all_events()?
            .into_iter()
            .map(|event| MovementRecord {
                vendor_name: self
                    .directory
                    .vendor_name(event.vendor_id)
                    .unwrap_or_else(|| UNKNOWN_VENDOR.to_string()),
                product_name: self
                    .catalog
                    .product_name(event.product_id)
                    .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
                id: event.id,
                operation_id: event.operation_id,
                vendor_id: event.vendor_id,
                product_id: event.product_id,
                quantity: event.quantity,
                kind: event.kind,
                notes: event.notes,
                occurred_at: event.occurred_at,
            })
            .collect();

        records.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at).then_with(|| b.id.cmp(&a.id)));
        Ok(records)
    }
}
