// Query/Aggregation Engine - fifteen read operations over one snapshot
//
// The engine materializes each collection exactly once and never writes
// back. Every operation is a pure read; the one sanctioned side effect is
// the observer callback on `products_ordered_on`, which sees each matching
// order before the pipeline flattens it away.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::entities::{Customer, Order, Product};
use crate::error::{DuplicateKeyError, StorageUnavailable};
use crate::store::EntityStore;

// ============================================================================
// PRICE STATISTICS
// ============================================================================

/// Count/min/max/sum/average bundle over a price projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceStatistics {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub average: f64,
}

impl PriceStatistics {
    /// All-zero bundle for an empty projection.
    pub fn empty() -> Self {
        PriceStatistics {
            count: 0,
            min: 0.0,
            max: 0.0,
            sum: 0.0,
            average: 0.0,
        }
    }

    pub fn from_prices<I>(prices: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for price in prices {
            count += 1;
            sum += price;
            if price < min {
                min = price;
            }
            if price > max {
                max = price;
            }
        }

        if count == 0 {
            return PriceStatistics::empty();
        }

        PriceStatistics {
            count,
            min,
            max,
            sum,
            average: sum / count as f64,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} products | min {:.2}, max {:.2}, sum {:.2}, avg {:.2}",
            self.count, self.min, self.max, self.sum, self.average
        )
    }
}

// ============================================================================
// ANALYTICS ENGINE
// ============================================================================

/// Holds one fully materialized snapshot of each collection and answers
/// the fifteen analytical questions against it.
pub struct AnalyticsEngine {
    customers: Vec<Customer>,
    orders: Vec<Order>,
    products: Vec<Product>,
}

impl AnalyticsEngine {
    pub fn new(customers: Vec<Customer>, orders: Vec<Order>, products: Vec<Product>) -> Self {
        AnalyticsEngine {
            customers,
            orders,
            products,
        }
    }

    /// Pull one snapshot of each collection from the store. A retrieval
    /// failure aborts construction; there is no partial engine.
    pub fn from_store(store: &dyn EntityStore) -> Result<Self, StorageUnavailable> {
        let customers = store.get_all_customers()?;
        let orders = store.get_all_orders()?;
        let products = store.get_all_products()?;

        debug!(
            customers = customers.len(),
            orders = orders.len(),
            products = products.len(),
            "materialized snapshots"
        );

        Ok(AnalyticsEngine::new(customers, orders, products))
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    // ========================================================================
    // FILTER / MAP OPERATIONS
    // ========================================================================

    /// 1. Products in a category (case-insensitive) priced strictly above
    /// the floor.
    pub fn products_in_category_over(&self, category: &str, floor: f64) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.matches_category(category) && p.price > floor)
            .cloned()
            .collect()
    }

    /// 2. Orders containing at least one product of the category
    /// (case-insensitive existential join).
    pub fn orders_containing_category(&self, category: &str) -> Vec<Order> {
        self.orders
            .iter()
            .filter(|o| o.contains_category(category))
            .cloned()
            .collect()
    }

    /// 3. Products of a category (exact-case), each copied with the
    /// discount applied. Originals in the snapshot stay untouched.
    pub fn discounted_products(&self, category: &str, discount: f64) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.category == category)
            .map(|p| p.with_price(p.price * (1.0 - discount)))
            .collect()
    }

    /// 4. Distinct products ordered by customers of the given tier within
    /// the inclusive date window. First occurrence order is kept.
    pub fn distinct_products_for_tier(
        &self,
        tier: i32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Vec<Product> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();

        for order in self
            .orders
            .iter()
            .filter(|o| o.customer.has_tier(tier) && o.placed_between(from, to))
        {
            for product in &order.products {
                if seen.insert(product.id) {
                    result.push(product.clone());
                }
            }
        }

        result
    }

    // ========================================================================
    // MIN / MAX / SORT OPERATIONS
    // ========================================================================

    /// 5. Cheapest product of a category (exact-case). Ties keep the first
    /// match in retrieval order; an empty filter yields the placeholder.
    pub fn cheapest_in_category(&self, category: &str) -> Product {
        self.products
            .iter()
            .filter(|p| p.category == category)
            .fold(None::<&Product>, |best, p| match best {
                Some(b) if b.price <= p.price => Some(b),
                _ => Some(p),
            })
            .cloned()
            .unwrap_or_else(Product::placeholder)
    }

    /// 6. The `n` most recent orders, date descending. The sort is stable:
    /// orders sharing a date stay in retrieval order.
    pub fn most_recent_orders(&self, n: usize) -> Vec<Order> {
        let mut sorted = self.orders.clone();
        sorted.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        sorted.truncate(n);
        sorted
    }

    // ========================================================================
    // DATE-PINNED PIPELINES
    // ========================================================================

    /// 7. Distinct products across orders placed on the exact date. Each
    /// matching order is handed to the observer before flattening.
    pub fn products_ordered_on<F>(&self, date: NaiveDate, mut observe: F) -> Vec<Product>
    where
        F: FnMut(&Order),
    {
        let mut seen = HashSet::new();
        let mut result = Vec::new();

        for order in self.orders.iter().filter(|o| o.placed_on(date)) {
            observe(order);
            for product in &order.products {
                if seen.insert(product.id) {
                    result.push(product.clone());
                }
            }
        }

        result
    }

    /// 8. Sum of product prices across orders placed on the exact date.
    /// No deduplication: a product bought in two matching orders counts
    /// once per order.
    pub fn total_spend_on(&self, date: NaiveDate) -> f64 {
        self.orders
            .iter()
            .filter(|o| o.placed_on(date))
            .flat_map(|o| o.products.iter())
            .map(|p| p.price)
            .sum()
    }

    /// 9. Arithmetic mean product price across orders placed on the exact
    /// date, 0.0 when nothing matched.
    pub fn average_product_price_on(&self, date: NaiveDate) -> f64 {
        let prices: Vec<f64> = self
            .orders
            .iter()
            .filter(|o| o.placed_on(date))
            .flat_map(|o| o.products.iter())
            .map(|p| p.price)
            .collect();

        if prices.is_empty() {
            return 0.0;
        }
        prices.iter().sum::<f64>() / prices.len() as f64
    }

    /// 10. Price statistics over a category (case-insensitive).
    pub fn category_price_stats(&self, category: &str) -> PriceStatistics {
        PriceStatistics::from_prices(
            self.products
                .iter()
                .filter(|p| p.matches_category(category))
                .map(|p| p.price),
        )
    }

    // ========================================================================
    // KEYED REPORTS
    // ========================================================================

    /// 11. Order id -> number of product lines. Fails fast on a duplicate
    /// order id in the snapshot.
    pub fn product_counts_by_order(&self) -> Result<HashMap<i64, usize>, DuplicateKeyError> {
        let mut counts = HashMap::with_capacity(self.orders.len());

        for order in &self.orders {
            if counts.insert(order.id, order.product_count()).is_some() {
                return Err(DuplicateKeyError::new(order.id));
            }
        }

        Ok(counts)
    }

    /// 12. Customer -> their orders. Customer keys hash by identity, so
    /// re-read snapshots of the same row land in the same bucket.
    pub fn orders_by_customer(&self) -> HashMap<Customer, Vec<Order>> {
        let mut grouped: HashMap<Customer, Vec<Order>> = HashMap::new();

        for order in &self.orders {
            grouped
                .entry(order.customer.clone())
                .or_default()
                .push(order.clone());
        }

        grouped
    }

    /// 13. Order -> total price of its lines. Same fail-fast collision
    /// policy as `product_counts_by_order`.
    pub fn order_totals(&self) -> Result<HashMap<Order, f64>, DuplicateKeyError> {
        let mut totals = HashMap::with_capacity(self.orders.len());

        for order in &self.orders {
            let id = order.id;
            if totals.insert(order.clone(), order.total_price()).is_some() {
                return Err(DuplicateKeyError::new(id));
            }
        }

        Ok(totals)
    }

    /// 14. Category (exact-case key) -> product names, retrieval order.
    pub fn product_names_by_category(&self) -> HashMap<String, Vec<String>> {
        let mut grouped: HashMap<String, Vec<String>> = HashMap::new();

        for product in &self.products {
            grouped
                .entry(product.category.clone())
                .or_default()
                .push(product.name.clone());
        }

        grouped
    }

    /// 15. Category -> its most expensive product. Ties keep the first in
    /// retrieval order; categories with no products are simply absent.
    pub fn priciest_by_category(&self) -> HashMap<String, Product> {
        let mut best: HashMap<String, Product> = HashMap::new();

        for product in &self.products {
            match best.get(&product.category) {
                Some(current) if current.price >= product.price => {}
                _ => {
                    best.insert(product.category.clone(), product.clone());
                }
            }
        }

        best
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reference_engine() -> AnalyticsEngine {
        AnalyticsEngine::from_store(&MemoryStore::reference_fixture()).unwrap()
    }

    #[test]
    fn test_books_over_price_floor() {
        let engine = reference_engine();

        let result = engine.products_in_category_over("Books", 100.0);

        let mut ids: Vec<i64> = result.iter().map(|p| p.id).collect();
        ids.sort();
        assert_eq!(ids, vec![7, 9, 16, 17, 24]);
        assert!(result.iter().all(|p| p.price > 100.0));

        // category match must not depend on case
        assert_eq!(engine.products_in_category_over("books", 100.0).len(), 5);
    }

    #[test]
    fn test_orders_containing_baby_products() {
        let engine = reference_engine();

        let result = engine.orders_containing_category("Baby");

        assert_eq!(result.len(), 26);
        assert!(result.iter().all(|o| o.contains_category("baby")));
    }

    #[test]
    fn test_toys_discount_is_non_destructive() {
        let engine = reference_engine();

        let discounted = engine.discounted_products("Toys", 0.10);

        assert_eq!(discounted.len(), 11);

        let catalog: HashMap<i64, f64> = engine
            .products()
            .iter()
            .map(|p| (p.id, p.price))
            .collect();
        for product in &discounted {
            let original = catalog[&product.id];
            assert!((product.price - original * 0.9).abs() < 1e-9);
        }

        // the snapshot itself is untouched
        let toys_after: Vec<&Product> = engine
            .products()
            .iter()
            .filter(|p| p.category == "Toys")
            .collect();
        assert_eq!(toys_after.len(), 11);
        assert!(toys_after
            .iter()
            .all(|p| (catalog[&p.id] - p.price).abs() < 1e-12));

        // exact-case filter: a lowercase query matches nothing
        assert!(engine.discounted_products("toys", 0.10).is_empty());
    }

    #[test]
    fn test_tier2_window_distinct_products() {
        let engine = reference_engine();

        let result =
            engine.distinct_products_for_tier(2, date(2021, 2, 1), date(2021, 4, 1));

        assert_eq!(result.len(), 19);

        let unique: HashSet<i64> = result.iter().map(|p| p.id).collect();
        assert_eq!(unique.len(), 19);
    }

    #[test]
    fn test_cheapest_book() {
        let engine = reference_engine();

        let cheapest = engine.cheapest_in_category("Books");

        assert_eq!(cheapest.id, 17);
        assert!((cheapest.price - 104.90).abs() < 1e-9);
    }

    #[test]
    fn test_cheapest_of_missing_category_is_placeholder() {
        let engine = reference_engine();

        let nothing = engine.cheapest_in_category("Electronics");

        assert!(nothing.is_placeholder());
        assert_eq!(nothing.price, 0.0);
    }

    #[test]
    fn test_three_most_recent_orders() {
        let engine = reference_engine();

        let result = engine.most_recent_orders(3);

        // orders 12 and 50 share 2021-12-28; the stable sort must keep
        // retrieval order between them
        let ids: Vec<i64> = result.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![44, 12, 50]);
        assert!(result[0].order_date >= result[1].order_date);
        assert!(result[1].order_date >= result[2].order_date);
    }

    #[test]
    fn test_products_ordered_on_date_with_observer() {
        let engine = reference_engine();

        let mut observed = Vec::new();
        let result = engine.products_ordered_on(date(2021, 3, 15), |order| {
            observed.push(order.id);
        });

        // every matching order is observed, in retrieval order, before
        // the flattened product list is deduplicated
        assert_eq!(observed, vec![15, 23, 31]);
        assert_eq!(result.len(), 7);

        let unique: HashSet<i64> = result.iter().map(|p| p.id).collect();
        assert_eq!(unique.len(), 7);
    }

    #[test]
    fn test_total_spend_on_date() {
        let engine = reference_engine();

        let total = engine.total_spend_on(date(2021, 3, 15));

        // non-deduplicated: repeated products count once per order
        assert!((total - 3528.90).abs() < 1e-6);

        // a date with no orders sums to zero
        assert_eq!(engine.total_spend_on(date(2022, 1, 1)), 0.0);
    }

    #[test]
    fn test_average_product_price_on_date() {
        let engine = reference_engine();

        let average = engine.average_product_price_on(date(2021, 3, 15));
        assert!((average - 352.89).abs() < 1e-6);

        // empty projection defaults to zero instead of dividing by zero
        assert_eq!(engine.average_product_price_on(date(2022, 1, 1)), 0.0);
    }

    #[test]
    fn test_books_price_statistics() {
        let engine = reference_engine();

        let stats = engine.category_price_stats("Books");

        assert_eq!(stats.count, 5);
        assert!((stats.min - 104.90).abs() < 1e-9);
        assert!((stats.max - 420.00).abs() < 1e-9);
        assert!((stats.sum - 1290.55).abs() < 1e-6);
        assert!((stats.average - 258.11).abs() < 1e-6);

        println!("Books: {}", stats.summary());
    }

    #[test]
    fn test_statistics_of_missing_category_are_zeroed() {
        let engine = reference_engine();

        let stats = engine.category_price_stats("Electronics");

        assert_eq!(stats.count, 0);
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 0.0);
        assert_eq!(stats.sum, 0.0);
        assert_eq!(stats.average, 0.0);
    }

    #[test]
    fn test_product_counts_per_order() {
        let engine = reference_engine();

        let counts = engine.product_counts_by_order().unwrap();

        assert_eq!(counts.len(), 50);
        for order in engine.orders() {
            assert_eq!(counts[&order.id], order.product_count());
        }
        assert_eq!(counts[&15], 3);
        assert_eq!(counts[&31], 4);
    }

    #[test]
    fn test_orders_grouped_by_customer() {
        let engine = reference_engine();

        let grouped = engine.orders_by_customer();

        assert_eq!(grouped.len(), 10);
        assert_eq!(grouped.values().map(|v| v.len()).sum::<usize>(), 50);

        // lookup goes through identity, value fields are irrelevant
        let key = Customer::new(5, "", 0);
        assert!(grouped[&key].iter().all(|o| o.customer.id == 5));
    }

    #[test]
    fn test_order_totals() {
        let engine = reference_engine();

        let totals = engine.order_totals().unwrap();

        assert_eq!(totals.len(), 50);
        for order in engine.orders() {
            assert!((totals[order] - order.total_price()).abs() < 1e-9);
        }

        let by_id = |id: i64| {
            engine
                .orders()
                .iter()
                .find(|o| o.id == id)
                .cloned()
                .unwrap()
        };
        assert!((totals[&by_id(1)] - 429.05).abs() < 1e-6);
        assert!((totals[&by_id(31)] - 1244.55).abs() < 1e-6);
        assert!((totals[&by_id(44)] - 1319.95).abs() < 1e-6);
    }

    #[test]
    fn test_product_names_by_category() {
        let engine = reference_engine();

        let grouped = engine.product_names_by_category();

        assert_eq!(grouped.len(), 5);
        assert_eq!(grouped["Books"].len(), 5);
        assert_eq!(grouped["Toys"].len(), 11);
        assert_eq!(grouped["Baby"].len(), 6);
        assert_eq!(grouped["Grocery"].len(), 4);
        assert_eq!(grouped["Games"].len(), 4);
        assert!(grouped["Books"].contains(&"Clean Code".to_string()));
    }

    #[test]
    fn test_priciest_by_category() {
        let engine = reference_engine();

        let best = engine.priciest_by_category();

        assert_eq!(best.len(), 5);
        assert_eq!(best["Toys"].id, 5);
        assert_eq!(best["Baby"].id, 10);
        assert_eq!(best["Grocery"].id, 8);
        assert_eq!(best["Books"].id, 24);
        assert_eq!(best["Games"].id, 12);

        for product in engine.products() {
            assert!(best[&product.category].price >= product.price);
        }
    }

    #[test]
    fn test_duplicate_order_id_fails_keyed_reports() {
        let customer = Customer::new(1, "Aldana Ruiz", 1);
        let product = Product::new(1, "Wooden Train Set", "Toys", 189.50);
        let orders = vec![
            Order::new(1, date(2021, 1, 4), customer.clone(), vec![product.clone()]),
            Order::new(1, date(2021, 1, 5), customer.clone(), vec![product.clone()]),
        ];
        let engine = AnalyticsEngine::new(vec![customer], orders, vec![product]);

        assert_eq!(
            engine.product_counts_by_order().unwrap_err(),
            DuplicateKeyError::new(1)
        );
        assert_eq!(engine.order_totals().unwrap_err(), DuplicateKeyError::new(1));
    }

    #[test]
    fn test_operations_are_idempotent() {
        let engine = reference_engine();

        assert_eq!(
            engine.products_in_category_over("Books", 100.0),
            engine.products_in_category_over("Books", 100.0)
        );
        assert_eq!(engine.most_recent_orders(3), engine.most_recent_orders(3));
        assert_eq!(
            engine.product_counts_by_order().unwrap(),
            engine.product_counts_by_order().unwrap()
        );
        assert_eq!(
            engine.total_spend_on(date(2021, 3, 15)),
            engine.total_spend_on(date(2021, 3, 15))
        );
    }

    #[test]
    fn test_empty_snapshot_defaults() {
        let engine = AnalyticsEngine::new(vec![], vec![], vec![]);

        assert!(engine.products_in_category_over("Books", 0.0).is_empty());
        assert!(engine.orders_containing_category("Baby").is_empty());
        assert!(engine.most_recent_orders(3).is_empty());
        assert!(engine.cheapest_in_category("Books").is_placeholder());
        assert_eq!(engine.average_product_price_on(date(2021, 3, 15)), 0.0);
        assert_eq!(engine.category_price_stats("Books").count, 0);
        assert!(engine.orders_by_customer().is_empty());
        assert!(engine.priciest_by_category().is_empty());
        assert!(engine.product_counts_by_order().unwrap().is_empty());
    }
}
