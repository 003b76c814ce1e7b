// Order Entity - one customer, many products, a calendar date
//
// Orders denormalize the customer and the full product list at load time,
// so every analytical question can be answered against the snapshot without
// going back to storage. Equality and hashing key on the order id only,
// which lets an Order act as a map key in the totals report.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use super::{Customer, Product};

/// Order entity.
///
/// Identity: numeric `id`
/// Values: `order_date` (calendar date, no time component), the owning
/// `customer`, and the ordered `products` in line position order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_date: NaiveDate,
    pub customer: Customer,
    pub products: Vec<Product>,
}

impl Order {
    pub fn new(id: i64, order_date: NaiveDate, customer: Customer, products: Vec<Product>) -> Self {
        Order {
            id,
            order_date,
            customer,
            products,
        }
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    /// Sum of line prices. Empty orders total 0.0.
    pub fn total_price(&self) -> f64 {
        self.products.iter().map(|p| p.price).sum()
    }

    /// Existential category check over the product lines, case-insensitive.
    pub fn contains_category(&self, category: &str) -> bool {
        self.products.iter().any(|p| p.matches_category(category))
    }

    pub fn placed_on(&self, date: NaiveDate) -> bool {
        self.order_date == date
    }

    /// Inclusive on both ends, calendar comparison only.
    pub fn placed_between(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.order_date >= from && self.order_date <= to
    }
}

impl PartialEq for Order {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Order {}

impl Hash for Order {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// ============================================================================
// TESTS
// ============================================================================
