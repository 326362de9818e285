//! Possession derivation: pure folds over movement events.
//!
//! Every call site that needs "what does this vendor currently hold" goes
//! through [`vendor_quantities`] / [`vendor_balances`]; the signed-sum rule
//! exists in exactly one place ([`crate::movement::MovementKind::signed`]).

use std::collections::BTreeMap;

use fieldstock_core::{ProductId, VendorId};

use crate::movement::MovementEvent;

/// Current possession of one product by one vendor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductBalance {
    pub product_id: ProductId,
    /// Derived on-hand quantity (strictly positive in reported balances).
    pub quantity: i64,
    /// `quantity × current unit price`, in smallest currency units.
    pub value: u64,
}

/// Per-vendor totals inside a fleet summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorTotals {
    pub vendor_id: VendorId,
    pub quantity: i64,
    pub value: i64,
}

/// Fleet-wide aggregate over every vendor's movement events.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FleetSummary {
    pub total_quantity: i64,
    /// Signed sum of `quantity × unit price` across all events, in smallest
    /// currency units.
    pub total_value: i64,
    /// Sorted by value descending; ties broken by vendor id.
    pub per_vendor: Vec<VendorTotals>,
}

/// Signed quantity sums per product for one vendor.
///
/// Events belonging to other vendors are ignored, so callers may pass an
/// unfiltered slice. Accumulators start at zero for unseen pairs; the result
/// is independent of event order.
pub fn vendor_quantities(
    vendor_id: VendorId,
    events: &[MovementEvent],
) -> BTreeMap<ProductId, i64> {
    let mut totals = BTreeMap::new();

    for event in events.iter().filter(|e| e.vendor_id == vendor_id) {
        *totals.entry(event.product_id).or_insert(0) += event.signed_quantity();
    }

    totals
}

/// Current holdings of one vendor, valued at aggregation-time prices.
///
/// Only strictly positive quantities are reported: zero or negative sums are
/// not holdings, and this filter also defines what is selectable as a return
/// or transfer source. `unit_price` is supplied by the caller because prices
/// are owned by the catalog; an unknown price values the holding at zero
/// without affecting its quantity.
pub fn vendor_balances(
    vendor_id: VendorId,
    events: &[MovementEvent],
    unit_price: impl Fn(ProductId) -> Option<u64>,
) -> BTreeMap<ProductId, ProductBalance> {
    vendor_quantities(vendor_id, events)
        .into_iter()
        .filter(|(_, quantity)| *quantity > 0)
        .map(|(product_id, quantity)| {
            let price = unit_price(product_id).unwrap_or(0);
            let value = (quantity as u64).saturating_mul(price);
            (
                product_id,
                ProductBalance {
                    product_id,
                    quantity,
                    value,
                },
            )
        })
        .collect()
}

/// Fleet-wide totals across all vendors' events, grouped per vendor.
///
/// Uses the same signed-sum rule as the per-vendor derivation. The per-vendor
/// list is ordered by value descending (vendor id breaks ties), ready for
/// leaderboard-style consumers.
pub fn fleet_summary(
    events: &[MovementEvent],
    unit_price: impl Fn(ProductId) -> Option<u64>,
) -> FleetSummary {
    let mut by_vendor: BTreeMap<VendorId, (i64, i64)> = BTreeMap::new();
    let mut total_quantity = 0i64;
    let mut total_value = 0i64;

    for event in events {
        let signed_quantity = event.signed_quantity();
        let price = unit_price(event.product_id).unwrap_or(0).min(i64::MAX as u64) as i64;
        let signed_value = signed_quantity.saturating_mul(price);

        total_quantity = total_quantity.saturating_add(signed_quantity);
        total_value = total_value.saturating_add(signed_value);

        let entry = by_vendor.entry(event.vendor_id).or_insert((0, 0));
        entry.0 = entry.0.saturating_add(signed_quantity);
        entry.1 = entry.1.saturating_add(signed_value);
    }

    let mut per_vendor: Vec<VendorTotals> = by_vendor
        .into_iter()
        .map(|(vendor_id, (quantity, value))| VendorTotals {
            vendor_id,
            quantity,
            value,
        })
        .collect();

    per_vendor.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.vendor_id.cmp(&b.vendor_id)));

    FleetSummary {
        total_quantity,
        total_value,
        per_vendor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::MovementKind;
    use chrono::Utc;
    use fieldstock_core::OperationId;

    fn event(
        vendor_id: VendorId,
        product_id: ProductId,
        quantity: u32,
        kind: MovementKind,
    ) -> MovementEvent {
        MovementEvent::new(
            OperationId::new(),
            vendor_id,
            product_id,
            quantity,
            kind,
            None,
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn quantities_accumulate_signed_sums_per_product() {
        let vendor = VendorId::new();
        let p1 = ProductId::new();
        let p2 = ProductId::new();

        let events = vec![
            event(vendor, p1, 10, MovementKind::Outbound),
            event(vendor, p1, 3, MovementKind::Return),
            event(vendor, p2, 5, MovementKind::TransferIn),
            event(vendor, p2, 5, MovementKind::TransferOut),
        ];

        let totals = vendor_quantities(vendor, &events);
        assert_eq!(totals.get(&p1), Some(&7));
        assert_eq!(totals.get(&p2), Some(&0));
    }

    #[test]
    fn other_vendors_events_are_ignored() {
        let vendor = VendorId::new();
        let other = VendorId::new();
        let product = ProductId::new();

        let events = vec![
            event(vendor, product, 4, MovementKind::Outbound),
            event(other, product, 9, MovementKind::Outbound),
        ];

        assert_eq!(vendor_quantities(vendor, &events).get(&product), Some(&4));
    }

    #[test]
    fn balances_drop_non_positive_quantities() {
        let vendor = VendorId::new();
        let held = ProductId::new();
        let drained = ProductId::new();

        let events = vec![
            event(vendor, held, 6, MovementKind::Outbound),
            event(vendor, drained, 2, MovementKind::Outbound),
            event(vendor, drained, 2, MovementKind::Return),
        ];

        let balances = vendor_balances(vendor, &events, |_| Some(100));
        assert_eq!(balances.len(), 1);
        assert_eq!(balances.get(&held).unwrap().quantity, 6);
        assert_eq!(balances.get(&held).unwrap().value, 600);
    }

    #[test]
    fn unknown_price_contributes_quantity_but_zero_value() {
        let vendor = VendorId::new();
        let product = ProductId::new();
        let events = vec![event(vendor, product, 3, MovementKind::Outbound)];

        let balances = vendor_balances(vendor, &events, |_| None);
        let balance = balances.get(&product).unwrap();
        assert_eq!(balance.quantity, 3);
        assert_eq!(balance.value, 0);
    }

    #[test]
    fn value_reflects_price_at_aggregation_time() {
        let vendor = VendorId::new();
        let product = ProductId::new();
        let events = vec![event(vendor, product, 2, MovementKind::Outbound)];

        let before = vendor_balances(vendor, &events, |_| Some(150));
        let after = vendor_balances(vendor, &events, |_| Some(250));

        assert_eq!(before.get(&product).unwrap().value, 300);
        assert_eq!(after.get(&product).unwrap().value, 500);
    }

    #[test]
    fn fleet_summary_sorts_vendors_by_value_descending() {
        let small = VendorId::new();
        let big = VendorId::new();
        let product = ProductId::new();

        let events = vec![
            event(small, product, 1, MovementKind::Outbound),
            event(big, product, 10, MovementKind::Outbound),
        ];

        let summary = fleet_summary(&events, |_| Some(100));
        assert_eq!(summary.total_quantity, 11);
        assert_eq!(summary.total_value, 1100);
        assert_eq!(summary.per_vendor[0].vendor_id, big);
        assert_eq!(summary.per_vendor[0].value, 1000);
        assert_eq!(summary.per_vendor[1].vendor_id, small);
    }

    #[test]
    fn transfer_keeps_fleet_quantity_unchanged() {
        let from = VendorId::new();
        let to = VendorId::new();
        let product = ProductId::new();
        let op = OperationId::new();

        let mut events = vec![event(from, product, 8, MovementKind::Outbound)];
        let before = fleet_summary(&events, |_| Some(50));

        events.push(
            MovementEvent::new(op, from, product, 3, MovementKind::TransferOut, None, Utc::now())
                .unwrap(),
        );
        events.push(
            MovementEvent::new(op, to, product, 3, MovementKind::TransferIn, None, Utc::now())
                .unwrap(),
        );
        let after = fleet_summary(&events, |_| Some(50));

        assert_eq!(before.total_quantity, after.total_quantity);
        assert_eq!(before.total_value, after.total_value);
        assert_eq!(vendor_quantities(from, &events).get(&product), Some(&5));
        assert_eq!(vendor_quantities(to, &events).get(&product), Some(&3));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        struct EventSpec {
            vendor: usize,
            product: usize,
            quantity: u32,
            kind: MovementKind,
        }

        fn spec_strategy() -> impl Strategy<Value = EventSpec> {
            (
                0..3usize,
                0..4usize,
                1..50u32,
                prop::sample::select(vec![
                    MovementKind::Outbound,
                    MovementKind::Return,
                    MovementKind::TransferIn,
                    MovementKind::TransferOut,
                ]),
            )
                .prop_map(|(vendor, product, quantity, kind)| EventSpec {
                    vendor,
                    product,
                    quantity,
                    kind,
                })
        }

        fn build(specs: &[EventSpec], vendors: &[VendorId], products: &[ProductId]) -> Vec<MovementEvent> {
            specs
                .iter()
                .map(|s| {
                    MovementEvent::new(
                        OperationId::new(),
                        vendors[s.vendor],
                        products[s.product],
                        s.quantity,
                        s.kind,
                        None,
                        Utc::now(),
                    )
                    .unwrap()
                })
                .collect()
        }

        fn specs_and_permutation() -> impl Strategy<Value = (Vec<EventSpec>, Vec<usize>)> {
            prop::collection::vec(spec_strategy(), 0..40).prop_flat_map(|specs| {
                let indices: Vec<usize> = (0..specs.len()).collect();
                (Just(specs), Just(indices).prop_shuffle())
            })
        }

        proptest! {
            /// Property: any permutation of the same event set yields the
            /// same balances.
            #[test]
            fn balances_are_order_independent((specs, order) in specs_and_permutation()) {
                let vendors: Vec<VendorId> = (0..3).map(|_| VendorId::new()).collect();
                let products: Vec<ProductId> = (0..4).map(|_| ProductId::new()).collect();

                // Same facts, different arrival order.
                let original = build(&specs, &vendors, &products);
                let permuted: Vec<MovementEvent> =
                    order.iter().map(|&i| original[i].clone()).collect();

                for vendor in &vendors {
                    prop_assert_eq!(
                        vendor_quantities(*vendor, &original),
                        vendor_quantities(*vendor, &permuted)
                    );
                    prop_assert_eq!(
                        vendor_balances(*vendor, &original, |_| Some(100)),
                        vendor_balances(*vendor, &permuted, |_| Some(100))
                    );
                }
                prop_assert_eq!(
                    fleet_summary(&original, |_| Some(100)),
                    fleet_summary(&permuted, |_| Some(100))
                );
            }

            /// Property: same input yields the same output.
            #[test]
            fn balances_are_deterministic(specs in prop::collection::vec(spec_strategy(), 0..40)) {
                let vendors: Vec<VendorId> = (0..3).map(|_| VendorId::new()).collect();
                let products: Vec<ProductId> = (0..4).map(|_| ProductId::new()).collect();
                let events = build(&specs, &vendors, &products);

                for vendor in &vendors {
                    prop_assert_eq!(
                        vendor_balances(*vendor, &events, |_| Some(7)),
                        vendor_balances(*vendor, &events, |_| Some(7))
                    );
                }
            }

            /// Property: reported balances are always strictly positive.
            #[test]
            fn reported_balances_are_strictly_positive(
                specs in prop::collection::vec(spec_strategy(), 0..40)
            ) {
                let vendors: Vec<VendorId> = (0..3).map(|_| VendorId::new()).collect();
                let products: Vec<ProductId> = (0..4).map(|_| ProductId::new()).collect();
                let events = build(&specs, &vendors, &products);

                for vendor in &vendors {
                    for balance in vendor_balances(*vendor, &events, |_| Some(1)).values() {
                        prop_assert!(balance.quantity > 0);
                    }
                }
            }
        }
    }
}
