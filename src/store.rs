// Retrieval collaborator contract + in-memory implementation
//
// The analytics engine only ever asks for complete snapshots; filtering and
// aggregation happen in memory on the caller's side. Implementations must
// return records in a stable order across calls (the engine's tie-breaking
// leans on retrieval order).

use crate::entities::{Customer, Order, Product};
use crate::error::StorageUnavailable;
use crate::fixture;

/// Bulk retrieval contract. One method per entity type, whole collection,
/// no paging. Any failure is fatal to the query that asked.
pub trait EntityStore {
    fn get_all_customers(&self) -> Result<Vec<Customer>, StorageUnavailable>;
    fn get_all_orders(&self) -> Result<Vec<Order>, StorageUnavailable>;
    fn get_all_products(&self) -> Result<Vec<Product>, StorageUnavailable>;
}

/// In-memory store. Holds fully formed entities and hands out clones,
/// preserving insertion order.
pub struct MemoryStore {
    customers: Vec<Customer>,
    orders: Vec<Order>,
    products: Vec<Product>,
}

impl MemoryStore {
    pub fn new(customers: Vec<Customer>, orders: Vec<Order>, products: Vec<Product>) -> Self {
        MemoryStore {
            customers,
            orders,
            products,
        }
    }

    /// Store pre-loaded with the reference dataset.
    pub fn reference_fixture() -> Self {
        MemoryStore::new(
            fixture::reference_customers(),
            fixture::reference_orders(),
            fixture::reference_products(),
        )
    }
}

impl EntityStore for MemoryStore {
    fn get_all_customers(&self) -> Result<Vec<Customer>, StorageUnavailable> {
        Ok(self.customers.clone())
    }

    fn get_all_orders(&self) -> Result<Vec<Order>, StorageUnavailable> {
        Ok(self.orders.clone())
    }

    fn get_all_products(&self) -> Result<Vec<Product>, StorageUnavailable> {
        Ok(self.products.clone())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_fixture_counts() {
        let store = MemoryStore::reference_fixture();

        assert_eq!(store.get_all_customers().unwrap().len(), 10);
        assert_eq!(store.get_all_orders().unwrap().len(), 50);
        assert_eq!(store.get_all_products().unwrap().len(), 30);
    }

    #[test]
    fn test_snapshots_are_stable_across_calls() {
        let store = MemoryStore::reference_fixture();

        let first = store.get_all_orders().unwrap();
        let second = store.get_all_orders().unwrap();

        let first_ids: Vec<i64> = first.iter().map(|o| o.id).collect();
        let second_ids: Vec<i64> = second.iter().map(|o| o.id).collect();
        assert_eq!(first_ids, second_ids);
    }

    #[test]
    fn test_empty_store() {
        let store = MemoryStore::new(vec![], vec![], vec![]);

        assert!(store.get_all_customers().unwrap().is_empty());
        assert!(store.get_all_orders().unwrap().is_empty());
        assert!(store.get_all_products().unwrap().is_empty());
    }
}
