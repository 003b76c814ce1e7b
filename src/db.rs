use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::entities::{Customer, Order, Product};
use crate::error::StorageUnavailable;
use crate::fixture;
use crate::store::EntityStore;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS customers (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            tier INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            category TEXT NOT NULL,
            price REAL NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS orders (
            id INTEGER PRIMARY KEY,
            order_date TEXT NOT NULL,
            customer_id INTEGER NOT NULL REFERENCES customers(id)
        )",
        [],
    )?;

    // Join table; position preserves the line order inside each order
    conn.execute(
        "CREATE TABLE IF NOT EXISTS order_products (
            order_id INTEGER NOT NULL REFERENCES orders(id),
            product_id INTEGER NOT NULL REFERENCES products(id),
            position INTEGER NOT NULL,
            PRIMARY KEY (order_id, position)
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_orders_date ON orders(order_date)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_orders_customer ON orders(customer_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_products_category ON products(category)",
        [],
    )?;

    Ok(())
}

pub fn insert_customers(conn: &Connection, customers: &[Customer]) -> Result<usize> {
    let mut inserted = 0;

    for customer in customers {
        conn.execute(
            "INSERT INTO customers (id, name, tier) VALUES (?1, ?2, ?3)",
            params![customer.id, customer.name, customer.tier],
        )
        .with_context(|| format!("Failed to insert customer {}", customer.id))?;
        inserted += 1;
    }

    Ok(inserted)
}

pub fn insert_products(conn: &Connection, products: &[Product]) -> Result<usize> {
    let mut inserted = 0;

    for product in products {
        conn.execute(
            "INSERT INTO products (id, name, category, price) VALUES (?1, ?2, ?3, ?4)",
            params![product.id, product.name, product.category, product.price],
        )
        .with_context(|| format!("Failed to insert product {}", product.id))?;
        inserted += 1;
    }

    Ok(inserted)
}

/// Inserts orders plus their join rows. Customers and products referenced
/// by the orders must already be present.
pub fn insert_orders(conn: &Connection, orders: &[Order]) -> Result<usize> {
    let mut inserted = 0;

    for order in orders {
        conn.execute(
            "INSERT INTO orders (id, order_date, customer_id) VALUES (?1, ?2, ?3)",
            params![
                order.id,
                order.order_date.format(DATE_FORMAT).to_string(),
                order.customer.id,
            ],
        )
        .with_context(|| format!("Failed to insert order {}", order.id))?;

        for (position, product) in order.products.iter().enumerate() {
            conn.execute(
                "INSERT INTO order_products (order_id, product_id, position)
                 VALUES (?1, ?2, ?3)",
                params![order.id, product.id, position as i64],
            )
            .with_context(|| format!("Failed to insert line {} of order {}", position, order.id))?;
        }

        inserted += 1;
    }

    Ok(inserted)
}

pub fn get_all_customers(conn: &Connection) -> Result<Vec<Customer>, StorageUnavailable> {
    let mut stmt = conn.prepare("SELECT id, name, tier FROM customers ORDER BY id")?;

    let customers = stmt
        .query_map([], |row| {
            Ok(Customer {
                id: row.get(0)?,
                name: row.get(1)?,
                tier: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(customers)
}

pub fn get_all_products(conn: &Connection) -> Result<Vec<Product>, StorageUnavailable> {
    let mut stmt = conn.prepare("SELECT id, name, category, price FROM products ORDER BY id")?;

    let products = stmt
        .query_map([], |row| {
            Ok(Product {
                id: row.get(0)?,
                name: row.get(1)?,
                category: row.get(2)?,
                price: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(products)
}

/// Reads orders with customer and product lines denormalized in, the shape
/// the analytics engine consumes. `ORDER BY id` keeps retrieval order
/// stable across calls.
pub fn get_all_orders(conn: &Connection) -> Result<Vec<Order>, StorageUnavailable> {
    let customers: HashMap<i64, Customer> = get_all_customers(conn)?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    let products: HashMap<i64, Product> = get_all_products(conn)?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let mut stmt = conn.prepare("SELECT id, order_date, customer_id FROM orders ORDER BY id")?;
    let rows = stmt
        .query_map([], |row| {
            let date_str: String = row.get(1)?;
            let order_date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
                .map_err(|_| rusqlite::Error::InvalidQuery)?;
            Ok((row.get::<_, i64>(0)?, order_date, row.get::<_, i64>(2)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT order_id, product_id FROM order_products ORDER BY order_id, position",
    )?;
    let mut lines: HashMap<i64, Vec<i64>> = HashMap::new();
    let join_rows = stmt
        .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    for (order_id, product_id) in join_rows {
        lines.entry(order_id).or_default().push(product_id);
    }

    let mut orders = Vec::with_capacity(rows.len());
    for (id, order_date, customer_id) in rows {
        let customer = customers
            .get(&customer_id)
            .cloned()
            .ok_or_else(|| {
                StorageUnavailable::new(format!(
                    "order {} references missing customer {}",
                    id, customer_id
                ))
            })?;

        let mut order_lines = Vec::new();
        for product_id in lines.remove(&id).unwrap_or_default() {
            let product = products.get(&product_id).cloned().ok_or_else(|| {
                StorageUnavailable::new(format!(
                    "order {} references missing product {}",
                    id, product_id
                ))
            })?;
            order_lines.push(product);
        }

        orders.push(Order::new(id, order_date, customer, order_lines));
    }

    Ok(orders)
}

/// Loads a product catalog from CSV (columns: id, name, category, price).
pub fn load_products_csv(csv_path: &Path) -> Result<Vec<Product>> {
    let mut rdr = csv::Reader::from_path(csv_path).context("Failed to open CSV file")?;

    let mut products = Vec::new();
    for result in rdr.deserialize() {
        let product: Product = result.context("Failed to deserialize product")?;
        products.push(product);
    }

    Ok(products)
}

pub fn is_seeded(conn: &Connection) -> Result<bool> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM orders", [], |row| row.get(0))?;
    Ok(count > 0)
}

/// Seeds the reference dataset once. Safe to call on an already seeded
/// database.
pub fn seed_reference_data(conn: &Connection) -> Result<()> {
    if is_seeded(conn)? {
        info!("database already seeded, skipping");
        return Ok(());
    }

    let customers = insert_customers(conn, &fixture::reference_customers())?;
    let products = insert_products(conn, &fixture::reference_products())?;
    let orders = insert_orders(conn, &fixture::reference_orders())?;

    info!(customers, products, orders, "seeded reference dataset");

    Ok(())
}

// ============================================================================
// SQLITE STORE
// ============================================================================

/// rusqlite-backed retrieval collaborator.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        SqliteStore { conn }
    }

    pub fn open(path: &Path) -> Result<Self, StorageUnavailable> {
        let conn = Connection::open(path)?;
        Ok(SqliteStore::new(conn))
    }

    pub fn open_in_memory() -> Result<Self, StorageUnavailable> {
        let conn = Connection::open_in_memory()?;
        Ok(SqliteStore::new(conn))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    // Optional single-row lookups, alongside the bulk contract

    pub fn find_customer(&self, id: i64) -> Result<Option<Customer>, StorageUnavailable> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, tier FROM customers WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], |row| {
            Ok(Customer {
                id: row.get(0)?,
                name: row.get(1)?,
                tier: row.get(2)?,
            })
        })?;

        rows.next().transpose().map_err(StorageUnavailable::from)
    }

    pub fn find_product(&self, id: i64) -> Result<Option<Product>, StorageUnavailable> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, category, price FROM products WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], |row| {
            Ok(Product {
                id: row.get(0)?,
                name: row.get(1)?,
                category: row.get(2)?,
                price: row.get(3)?,
            })
        })?;

        rows.next().transpose().map_err(StorageUnavailable::from)
    }

    pub fn find_order(&self, id: i64) -> Result<Option<Order>, StorageUnavailable> {
        // Orders are cheap at this scale; reuse the hydrating bulk read
        Ok(get_all_orders(&self.conn)?.into_iter().find(|o| o.id == id))
    }
}

impl EntityStore for SqliteStore {
    fn get_all_customers(&self) -> Result<Vec<Customer>, StorageUnavailable> {
        get_all_customers(&self.conn)
    }

    fn get_all_orders(&self) -> Result<Vec<Order>, StorageUnavailable> {
        get_all_orders(&self.conn)
    }

    fn get_all_products(&self) -> Result<Vec<Product>, StorageUnavailable> {
        get_all_products(&self.conn)
    }
}

// ============================================================================
// TESTS
// ============================================================================
