use anyhow::Result;
use chrono::NaiveDate;
use std::env;
use std::path::{Path, PathBuf};

use storefront_analytics::{
    seed_reference_data, setup_database, AnalyticsEngine, EntityStore, SqliteStore,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mode = args.get(1).map(String::as_str).unwrap_or("report");
    let db_path = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("storefront.db"));

    match mode {
        "seed" => run_seed(&db_path),
        "report" => run_report(&db_path),
        other => {
            eprintln!("Unknown mode: {}", other);
            eprintln!("Usage: storefront-analytics [seed|report] [db-path]");
            std::process::exit(1);
        }
    }
}

fn open_store(db_path: &Path) -> Result<SqliteStore> {
    let store = SqliteStore::open(db_path)?;
    setup_database(store.connection())?;
    seed_reference_data(store.connection())?;
    Ok(store)
}

fn run_seed(db_path: &Path) -> Result<()> {
    println!("Seeding reference dataset into {}", db_path.display());

    let store = open_store(db_path)?;

    let customers = store.get_all_customers()?.len();
    let orders = store.get_all_orders()?.len();
    let products = store.get_all_products()?.len();

    println!("✓ {} customers", customers);
    println!("✓ {} orders", orders);
    println!("✓ {} products", products);

    Ok(())
}

fn run_report(db_path: &Path) -> Result<()> {
    let store = open_store(db_path)?;
    let engine = AnalyticsEngine::from_store(&store)?;

    let march_15 = NaiveDate::from_ymd_opt(2021, 3, 15).expect("valid date");
    let window_start = NaiveDate::from_ymd_opt(2021, 2, 1).expect("valid date");
    let window_end = NaiveDate::from_ymd_opt(2021, 4, 1).expect("valid date");

    println!("Storefront report: {} customers, {} orders, {} products",
        engine.customers().len(),
        engine.orders().len(),
        engine.products().len(),
    );

    println!("\n== Books priced over 100 ==");
    for product in engine.products_in_category_over("Books", 100.0) {
        println!("  #{:<3} {:<40} {:>8.2}", product.id, product.name, product.price);
    }

    let baby_orders = engine.orders_containing_category("Baby");
    println!("\n== Orders containing Baby products: {} ==", baby_orders.len());

    println!("\n== Toys with a 10% discount ==");
    for product in engine.discounted_products("Toys", 0.10) {
        println!("  #{:<3} {:<40} {:>8.2}", product.id, product.name, product.price);
    }

    let tier2 = engine.distinct_products_for_tier(2, window_start, window_end);
    println!(
        "\n== Distinct products bought by tier-2 customers, {} to {}: {} ==",
        window_start, window_end, tier2.len()
    );

    let cheapest = engine.cheapest_in_category("Books");
    println!("\n== Cheapest book ==");
    println!("  #{:<3} {:<40} {:>8.2}", cheapest.id, cheapest.name, cheapest.price);

    println!("\n== Three most recent orders ==");
    for order in engine.most_recent_orders(3) {
        println!(
            "  order #{:<3} {}  {:<16} total {:>8.2}",
            order.id, order.order_date, order.customer.name, order.total_price()
        );
    }

    println!("\n== Orders placed on {} ==", march_15);
    let distinct = engine.products_ordered_on(march_15, |order| {
        println!(
            "  order #{:<3} {:<16} {} lines",
            order.id, order.customer.name, order.product_count()
        );
    });
    println!("  {} distinct products across those orders", distinct.len());
    println!("  total spend:   {:.2}", engine.total_spend_on(march_15));
    println!("  average price: {:.2}", engine.average_product_price_on(march_15));

    let stats = engine.category_price_stats("Books");
    println!("\n== Books price statistics ==");
    println!("  {}", stats.summary());
    println!("{}", serde_json::to_string_pretty(&stats)?);

    let counts = engine.product_counts_by_order()?;
    println!("\n== Product counts per order: {} orders mapped ==", counts.len());

    let by_customer = engine.orders_by_customer();
    println!("\n== Orders per customer ==");
    let mut customers: Vec<_> = by_customer.iter().collect();
    customers.sort_by_key(|(c, _)| c.id);
    for (customer, orders) in customers {
        println!("  {:<16} {} orders", customer.name, orders.len());
    }

    let totals = engine.order_totals()?;
    let grand_total: f64 = totals.values().sum();
    println!("\n== Order totals: {} orders, {:.2} overall ==", totals.len(), grand_total);

    println!("\n== Product names per category ==");
    let names = engine.product_names_by_category();
    let mut categories: Vec<_> = names.iter().collect();
    categories.sort_by_key(|(category, _)| category.as_str());
    for (category, names) in categories {
        println!("  {:<8} {}", category, names.join(", "));
    }

    println!("\n== Most expensive product per category ==");
    let mut priciest: Vec<_> = engine.priciest_by_category().into_iter().collect();
    priciest.sort_by(|(a, _), (b, _)| a.cmp(b));
    for (category, product) in priciest {
        println!("  {:<8} #{:<3} {:<40} {:>8.2}", category, product.id, product.name, product.price);
    }

    Ok(())
}
