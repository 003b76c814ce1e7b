// Product Entity - catalog item with category and price
//
// Products are read-only snapshots; price changes go through `with_price`,
// which builds a new value and leaves the original untouched.

use serde::{Deserialize, Serialize};

/// Product entity.
///
/// Identity: numeric `id` (1-based in storage; 0 is reserved for the
/// placeholder value returned when a lookup finds nothing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
}

impl Product {
    pub fn new(id: i64, name: impl Into<String>, category: impl Into<String>, price: f64) -> Self {
        Product {
            id,
            name: name.into(),
            category: category.into(),
            price,
        }
    }

    /// Empty sentinel standing in for "no product found".
    /// Real products are never id 0.
    pub fn placeholder() -> Self {
        Product {
            id: 0,
            name: String::new(),
            category: String::new(),
            price: 0.0,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id == 0
    }

    /// Case-insensitive category match (ASCII, category names are plain words).
    pub fn matches_category(&self, category: &str) -> bool {
        self.category.eq_ignore_ascii_case(category)
    }

    /// Non-destructive price update: returns a copy with the new price,
    /// all other fields unchanged.
    pub fn with_price(&self, price: f64) -> Product {
        Product {
            price,
            ..self.clone()
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
