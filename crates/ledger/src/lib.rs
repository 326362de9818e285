//! `fieldstock-ledger` — movement events and the possession derivation engine.
//!
//! A vendor's on-hand stock is never stored; it is **derived** by replaying
//! that vendor's movement events. The derivation functions in [`balance`] are
//! pure: no IO, no hidden state, order-independent over the event set.

pub mod balance;
pub mod movement;

pub use balance::{
    FleetSummary, ProductBalance, VendorTotals, fleet_summary, vendor_balances, vendor_quantities,
};
pub use movement::{MovementEvent, MovementKind};
