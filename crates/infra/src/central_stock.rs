//! Central stock counter: warehouse-held quantity per product.
//!
//! One mutable integer per product, owned exclusively by this component and
//! adjusted in lockstep with event appends by the coordinator: decremented
//! when an outbound event is issued, incremented when a return is received.
//! The quantity is never allowed to go negative.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use fieldstock_core::ProductId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CentralStockError {
    /// The reservation would drive warehouse stock negative. The counter is
    /// left untouched.
    #[error("insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u64,
    },

    /// The counter backend could not be reached.
    #[error("central stock unavailable: {0}")]
    Unavailable(String),
}

/// Warehouse stock counter port.
///
/// `reserve` is the atomic compare-and-decrement used by outbound
/// distribution: check and decrement happen in one critical section per
/// product, so two concurrent reservations can never both succeed on one
/// quantity's worth of stock. `release` only ever increases stock and
/// cannot fail for stock reasons.
pub trait CentralStockStore: Send + Sync {
    /// Current warehouse quantity (zero for unknown products).
    fn level(&self, product_id: ProductId) -> Result<u64, CentralStockError>;

    /// Overwrite the warehouse quantity (seeding, reconciliation).
    fn set_level(&self, product_id: ProductId, quantity: u64) -> Result<(), CentralStockError>;

    /// Atomically decrement if the post-decrement value stays >= 0; fails
    /// without side effects otherwise. Returns the new level.
    fn reserve(&self, product_id: ProductId, quantity: u32) -> Result<u64, CentralStockError>;

    /// Increment the warehouse quantity. Returns the new level.
    fn release(&self, product_id: ProductId, quantity: u32) -> Result<u64, CentralStockError>;
}

impl<C> CentralStockStore for Arc<C>
where
    C: CentralStockStore + ?Sized,
{
    fn level(&self, product_id: ProductId) -> Result<u64, CentralStockError> {
        (**self).level(product_id)
    }

    fn set_level(&self, product_id: ProductId, quantity: u64) -> Result<(), CentralStockError> {
        (**self).set_level(product_id, quantity)
    }

    fn reserve(&self, product_id: ProductId, quantity: u32) -> Result<u64, CentralStockError> {
        (**self).reserve(product_id, quantity)
    }

    fn release(&self, product_id: ProductId, quantity: u32) -> Result<u64, CentralStockError> {
        (**self).release(product_id, quantity)
    }
}

/// In-memory stock counter for tests/dev.
///
/// The write lock is held across check and decrement, which serializes
/// reservations per product (and, coarsely, across products).
#[derive(Debug, Default)]
pub struct InMemoryCentralStock {
    levels: RwLock<HashMap<ProductId, u64>>,
}

impl InMemoryCentralStock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CentralStockStore for InMemoryCentralStock {
    fn level(&self, product_id: ProductId) -> Result<u64, CentralStockError> {
        let levels = self
            .levels
            .read()
            .map_err(|_| CentralStockError::Unavailable("lock poisoned".to_string()))?;

        Ok(levels.get(&product_id).copied().unwrap_or(0))
    }

    fn set_level(&self, product_id: ProductId, quantity: u64) -> Result<(), CentralStockError> {
        let mut levels = self
            .levels
            .write()
            .map_err(|_| CentralStockError::Unavailable("lock poisoned".to_string()))?;

        levels.insert(product_id, quantity);
        Ok(())
    }

    fn reserve(&self, product_id: ProductId, quantity: u32) -> Result<u64, CentralStockError> {
        let mut levels = self
            .levels
            .write()
            .map_err(|_| CentralStockError::Unavailable("lock poisoned".to_string()))?;

        let available = levels.get(&product_id).copied().unwrap_or(0);
        let requested = u64::from(quantity);

        if requested > available {
            return Err(CentralStockError::InsufficientStock {
                product_id,
                requested: quantity,
                available,
            });
        }

        let remaining = available - requested;
        levels.insert(product_id, remaining);
        Ok(remaining)
    }

    fn release(&self, product_id: ProductId, quantity: u32) -> Result<u64, CentralStockError> {
        let mut levels = self
            .levels
            .write()
            .map_err(|_| CentralStockError::Unavailable("lock poisoned".to_string()))?;

        let level = levels.entry(product_id).or_insert(0);
        *level = level.saturating_add(u64::from(quantity));
        Ok(*level)
    }
}
