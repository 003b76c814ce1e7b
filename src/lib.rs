// Storefront Analytics - Core Library
// Entity model, retrieval collaborators, and the query/aggregation engine

pub mod analytics;
pub mod db;
pub mod entities;
pub mod error;
pub mod fixture;
pub mod store;

// Re-export commonly used types
pub use analytics::{AnalyticsEngine, PriceStatistics};
pub use db::{
    get_all_customers, get_all_orders, get_all_products, insert_customers, insert_orders,
    insert_products, is_seeded, load_products_csv, seed_reference_data, setup_database,
    SqliteStore,
};
pub use entities::{Customer, Order, Product};
pub use error::{DuplicateKeyError, StorageUnavailable};
pub use store::{EntityStore, MemoryStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
