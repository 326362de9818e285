use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fieldstock_core::{DomainError, DomainResult, MovementId, OperationId, ProductId, VendorId};
use fieldstock_events::Event;

/// Direction of a stock movement, relative to the vendor's possession.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Warehouse → vendor.
    Outbound,
    /// Vendor → warehouse.
    Return,
    /// Vendor → vendor, receiving side.
    TransferIn,
    /// Vendor → vendor, sending side.
    TransferOut,
}

impl MovementKind {
    /// Sign applied to an event's quantity when deriving possession.
    ///
    /// `Outbound` and `TransferIn` add to what the vendor holds; `Return`
    /// and `TransferOut` subtract. Direction lives here and only here.
    pub fn signed(self, quantity: u32) -> i64 {
        match self {
            MovementKind::Outbound | MovementKind::TransferIn => i64::from(quantity),
            MovementKind::Return | MovementKind::TransferOut => -i64::from(quantity),
        }
    }
}

/// A single stock movement: an immutable fact about one vendor and one product.
///
/// Events are created once by the movement coordinator and never mutated or
/// deleted; corrections are modeled as new compensating events. A transfer is
/// represented as two events (one per vendor) sharing an [`OperationId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementEvent {
    /// Unique event identifier, assigned at creation, never reused.
    pub id: MovementId,
    /// The logical operation that produced this event (audit correlation).
    pub operation_id: OperationId,
    pub vendor_id: VendorId,
    pub product_id: ProductId,
    /// Strictly positive; direction is encoded by `kind`, never by sign.
    pub quantity: u32,
    pub kind: MovementKind,
    /// Free text, no semantic effect.
    pub notes: Option<String>,
    /// Creation time. Used for display ordering only, never for balances.
    pub occurred_at: DateTime<Utc>,
}

impl MovementEvent {
    /// Create a movement fact. Rejects zero quantities.
    pub fn new(
        operation_id: OperationId,
        vendor_id: VendorId,
        product_id: ProductId,
        quantity: u32,
        kind: MovementKind,
        notes: Option<String>,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        Ok(Self {
            id: MovementId::new(),
            operation_id,
            vendor_id,
            product_id,
            quantity,
            kind,
            notes,
            occurred_at,
        })
    }

    /// Contribution of this event to its vendor's possession of the product.
    pub fn signed_quantity(&self) -> i64 {
        self.kind.signed(self.quantity)
    }
}

impl Event for MovementEvent {
    fn event_type(&self) -> &'static str {
        match self.kind {
            MovementKind::Outbound => "ledger.movement.outbound",
            MovementKind::Return => "ledger.movement.return",
            MovementKind::TransferIn => "ledger.movement.transfer_in",
            MovementKind::TransferOut => "ledger.movement.transfer_out",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}
