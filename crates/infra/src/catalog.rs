//! Ports onto the product catalog and vendor directory.
//!
//! Products and vendors are reference entities owned by external
//! collaborators; the ledger only ever reads their identifiers, names, and
//! (for valuation) the current unit price at aggregation time.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use fieldstock_core::{ProductId, VendorId};

/// Read-only view of the product catalog.
pub trait Catalog: Send + Sync {
    /// Current unit price in smallest currency units. `None` when the
    /// catalog does not know the product; such holdings are valued at zero.
    fn unit_price(&self, product_id: ProductId) -> Option<u64>;

    fn product_name(&self, product_id: ProductId) -> Option<String>;
}

/// Read-only view of the vendor directory.
pub trait Directory: Send + Sync {
    fn vendor_name(&self, vendor_id: VendorId) -> Option<String>;
}

impl<C> Catalog for Arc<C>
where
    C: Catalog + ?Sized,
{
    fn unit_price(&self, product_id: ProductId) -> Option<u64> {
        (**self).unit_price(product_id)
    }

    fn product_name(&self, product_id: ProductId) -> Option<String> {
        (**self).product_name(product_id)
    }
}

impl<D> Directory for Arc<D>
where
    D: Directory + ?Sized,
{
    fn vendor_name(&self, vendor_id: VendorId) -> Option<String> {
        (**self).vendor_name(vendor_id)
    }
}

#[derive(Debug, Clone)]
struct CatalogEntry {
    name: String,
    unit_price: Option<u64>,
}

/// In-memory catalog for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<ProductId, CatalogEntry>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, product_id: ProductId, name: impl Into<String>, unit_price: Option<u64>) {
        if let Ok(mut products) = self.products.write() {
            products.insert(
                product_id,
                CatalogEntry {
                    name: name.into(),
                    unit_price,
                },
            );
        }
    }
}

impl Catalog for InMemoryCatalog {
    fn unit_price(&self, product_id: ProductId) -> Option<u64> {
        let products = self.products.read().ok()?;
        products.get(&product_id).and_then(|p| p.unit_price)
    }

    fn product_name(&self, product_id: ProductId) -> Option<String> {
        let products = self.products.read().ok()?;
        products.get(&product_id).map(|p| p.name.clone())
    }
}

/// In-memory vendor directory for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    vendors: RwLock<HashMap<VendorId, String>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, vendor_id: VendorId, name: impl Into<String>) {
        if let Ok(mut vendors) = self.vendors.write() {
            vendors.insert(vendor_id, name.into());
        }
    }
}

impl Directory for InMemoryDirectory {
    fn vendor_name(&self, vendor_id: VendorId) -> Option<String> {
        let vendors = self.vendors.read().ok()?;
        vendors.get(&vendor_id).cloned()
    }
}
