use serde::Deserialize;
use serde_json::json;

use fieldstock_events::Event;
use fieldstock_infra::coordinator::Committed;
use fieldstock_infra::query::{FleetOverview, MovementRecord, VendorBalance};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct DistributeRequest {
    pub vendor_id: String,
    pub product_id: String,
    pub quantity: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReturnRequest {
    pub vendor_id: String,
    pub product_id: String,
    pub quantity: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub from_vendor_id: String,
    pub to_vendor_id: String,
    pub product_id: String,
    pub quantity: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetStockRequest {
    pub quantity: u64,
}

#[derive(Debug, Deserialize)]
pub struct ProductStubRequest {
    pub name: String,
    #[serde(default)]
    pub unit_price: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct VendorStubRequest {
    pub name: String,
}

// -------------------------
// Response mapping
// -------------------------

pub fn committed_to_json(committed: &Committed) -> serde_json::Value {
    json!({
        "operation_id": committed.operation_id.to_string(),
        "events": committed.events.iter().map(|e| json!({
            "id": e.id.to_string(),
            "event_type": e.event_type(),
            "vendor_id": e.vendor_id.to_string(),
            "product_id": e.product_id.to_string(),
            "quantity": e.quantity,
            "occurred_at": e.occurred_at,
        })).collect::<Vec<_>>(),
    })
}

pub fn balance_to_json(balance: &VendorBalance) -> serde_json::Value {
    json!({
        "product_id": balance.product_id.to_string(),
        "product_name": balance.product_name,
        "quantity": balance.quantity,
        "value": balance.value,
    })
}

pub fn fleet_overview_to_json(overview: &FleetOverview) -> serde_json::Value {
    json!({
        "total_quantity": overview.total_quantity,
        "total_value": overview.total_value,
        "per_vendor": overview.per_vendor.iter().map(|standing| json!({
            "vendor_id": standing.vendor_id.to_string(),
            "vendor_name": standing.vendor_name,
            "quantity": standing.quantity,
            "value": standing.value,
        })).collect::<Vec<_>>(),
    })
}

pub fn movement_to_json(record: &MovementRecord) -> serde_json::Value {
    json!({
        "id": record.id.to_string(),
        "operation_id": record.operation_id.to_string(),
        "vendor_id": record.vendor_id.to_string(),
        "vendor_name": record.vendor_name,
        "product_id": record.product_id.to_string(),
        "product_name": record.product_name,
        "quantity": record.quantity,
        "kind": record.kind,
        "notes": record.notes,
        "occurred_at": record.occurred_at,
    })
}
