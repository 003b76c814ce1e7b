// Reference dataset - 10 customers, 30 products in 5 categories, 50 orders
//
// Single source of truth for both the in-memory store and SQLite seeding.
// The numbers are load-bearing: the analytics tests pin exact counts and
// totals against this data, so rows are written out literally instead of
// being generated.

use chrono::NaiveDate;

use crate::entities::{Customer, Order, Product};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn reference_customers() -> Vec<Customer> {
    vec![
        Customer::new(1, "Aldana Ruiz", 1),
        Customer::new(2, "Marcos Aguilar", 2),
        Customer::new(3, "Valentina Rios", 3),
        Customer::new(4, "Julian Herrera", 1),
        Customer::new(5, "Camila Duarte", 2),
        Customer::new(6, "Bruno Acosta", 1),
        Customer::new(7, "Martina Vega", 3),
        Customer::new(8, "Tomas Ferreyra", 2),
        Customer::new(9, "Lucia Morales", 1),
        Customer::new(10, "Agustin Paredes", 3),
    ]
}

pub fn reference_products() -> Vec<Product> {
    vec![
        Product::new(1, "Wooden Train Set", "Toys", 189.50),
        Product::new(2, "Convertible Stroller", "Baby", 520.90),
        Product::new(3, "Marble Run Deluxe", "Toys", 249.99),
        Product::new(4, "Organic Yerba Mate 1kg", "Grocery", 64.30),
        Product::new(5, "Robot Building Kit", "Toys", 899.95),
        Product::new(6, "Baby Monitor Duo", "Baby", 310.45),
        Product::new(7, "The Pragmatic Programmer", "Books", 254.40),
        Product::new(8, "Cold Pressed Olive Oil", "Grocery", 112.80),
        Product::new(9, "Refactoring", "Books", 312.50),
        Product::new(10, "Infant Car Seat", "Baby", 785.20),
        Product::new(11, "Plush Capuchin Monkey", "Toys", 79.90),
        Product::new(12, "Catan Board Game", "Games", 364.75),
        Product::new(13, "Stacking Rings Tower", "Toys", 45.60),
        Product::new(14, "Bottle Sterilizer", "Baby", 199.99),
        Product::new(15, "Remote Control Buggy", "Toys", 430.25),
        Product::new(16, "Clean Code", "Books", 198.75),
        Product::new(17, "Domain-Driven Design", "Books", 104.90),
        Product::new(18, "Arabica Coffee Beans 500g", "Grocery", 88.45),
        Product::new(19, "Dollhouse Three Floors", "Toys", 640.00),
        Product::new(20, "Ticket to Ride", "Games", 289.60),
        Product::new(21, "Kite Twin Line", "Toys", 58.75),
        Product::new(22, "Diaper Backpack", "Baby", 156.30),
        Product::new(23, "Chess Tournament Set", "Games", 134.20),
        Product::new(24, "Designing Data-Intensive Applications", "Books", 420.00),
        Product::new(25, "Raw Honey Jar 750g", "Grocery", 96.15),
        Product::new(26, "Foam Dart Blaster", "Toys", 215.40),
        Product::new(27, "High Chair Adjustable", "Baby", 345.80),
        Product::new(28, "Puzzle 1000 Pieces Patagonia", "Toys", 92.35),
        Product::new(29, "Dominoes Double Twelve", "Games", 76.50),
        Product::new(30, "Spinning Top Metal", "Toys", 33.85),
    ]
}

/// Order rows: (id, date, customer id, product ids in line order).
/// Customer and product ids are 1-based positions into the vectors above.
const ORDER_ROWS: [(i64, (i32, u32, u32), i64, &[i64]); 50] = [
    (1, (2021, 1, 4), 1, &[12, 4]),
    (2, (2021, 1, 7), 3, &[11, 18]),
    (3, (2021, 1, 12), 6, &[19, 29, 30]),
    (4, (2021, 1, 19), 2, &[6, 23]),
    (5, (2021, 2, 1), 2, &[1, 2, 3, 4]),
    (6, (2021, 1, 25), 9, &[7, 25]),
    (7, (2021, 1, 30), 10, &[10, 11]),
    (8, (2021, 2, 3), 4, &[20, 21, 8]),
    (9, (2021, 2, 14), 5, &[5, 6, 7, 8]),
    (10, (2021, 2, 9), 7, &[27, 30]),
    (11, (2021, 2, 17), 1, &[13, 14]),
    (12, (2021, 12, 28), 6, &[24, 12]),
    (13, (2021, 2, 22), 9, &[2, 28]),
    (14, (2021, 3, 2), 8, &[9, 10, 11, 12]),
    (15, (2021, 3, 15), 4, &[16, 7, 24]),
    (16, (2021, 3, 8), 3, &[26, 22]),
    (17, (2021, 3, 11), 10, &[29, 18, 4]),
    (18, (2021, 3, 18), 1, &[6, 15]),
    (19, (2021, 3, 24), 7, &[17, 27]),
    (20, (2021, 3, 20), 2, &[13, 14, 15, 16]),
    (21, (2021, 3, 29), 9, &[23, 25]),
    (22, (2021, 4, 5), 6, &[10, 19]),
    (23, (2021, 3, 15), 7, &[9, 16, 5]),
    (24, (2021, 4, 10), 4, &[22, 30]),
    (25, (2021, 4, 16), 10, &[1, 20]),
    (26, (2021, 4, 21), 3, &[27, 28]),
    (27, (2021, 4, 1), 5, &[17, 18, 25, 1]),
    (28, (2021, 4, 27), 9, &[2, 12]),
    (29, (2021, 5, 3), 1, &[21, 26]),
    (30, (2021, 5, 10), 6, &[14, 19]),
    (31, (2021, 3, 15), 9, &[17, 24, 16, 2]),
    (32, (2021, 5, 17), 4, &[6, 29]),
    (33, (2021, 2, 25), 8, &[2, 5, 9, 13]),
    (34, (2021, 5, 24), 7, &[3, 23]),
    (35, (2021, 5, 30), 10, &[10, 30]),
    (36, (2021, 6, 8), 3, &[15, 4]),
    (37, (2021, 6, 15), 1, &[15, 20]),
    (38, (2021, 6, 22), 6, &[5, 25]),
    (39, (2021, 7, 1), 9, &[27, 12]),
    (40, (2021, 7, 12), 4, &[11, 18]),
    (41, (2021, 7, 26), 7, &[6, 28]),
    (42, (2021, 8, 9), 10, &[19, 8]),
    (43, (2021, 8, 23), 3, &[10, 21]),
    (44, (2021, 12, 30), 1, &[24, 5]),
    (45, (2021, 9, 6), 6, &[28, 23]),
    (46, (2021, 9, 20), 2, &[26, 29]),
    (47, (2021, 10, 4), 5, &[3, 30]),
    (48, (2021, 10, 18), 8, &[7, 20]),
    (49, (2021, 11, 8), 5, &[22, 26]),
    (50, (2021, 12, 28), 8, &[2, 19]),
];

pub fn reference_orders() -> Vec<Order> {
    let customers = reference_customers();
    let products = reference_products();

    ORDER_ROWS
        .iter()
        .map(|&(id, (y, m, d), customer_id, product_ids)| {
            let lines = product_ids
                .iter()
                .map(|&pid| products[(pid - 1) as usize].clone())
                .collect();
            Order::new(
                id,
                date(y, m, d),
                customers[(customer_id - 1) as usize].clone(),
                lines,
            )
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
