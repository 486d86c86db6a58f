use tracing::debug;

use crate::{
    database::{DashboardConfig, Dataset, JoinStrategy, Row, Table},
    error::DashResult,
    executor::{join::join_with, transform::{normalize_purchase_date, rename_column, select_columns}},
};

/// Join the source tables into one denormalized record per surviving
/// (order, payment, item) combination:
///
/// orders ⋈ customers (customer_id) ⋈ payments (order_id) ⋈ order_items
/// (order_id) ⋈ products (product_id) [⋈ sellers (seller_id)]
///
/// `customer_city` is renamed to `geolocation_city` before joining.
pub fn denormalize(dataset: &Dataset, strategy: JoinStrategy) -> DashResult<Vec<Row>> {
    let mut keys: Vec<(&Table, &str)> = vec![
        (&dataset.orders, "customer_id"),
        (&dataset.orders, "order_id"),
        (&dataset.customers, "customer_id"),
        (&dataset.payments, "order_id"),
        (&dataset.order_items, "order_id"),
        (&dataset.order_items, "product_id"),
        (&dataset.products, "product_id"),
    ];
    if let Some(sellers) = &dataset.sellers {
        keys.push((&dataset.order_items, "seller_id"));
        keys.push((sellers, "seller_id"));
    }
    for (table, key) in keys {
        table.require_column(key)?;
    }

    let customers = rename_column(&dataset.customers.rows, "customer_city", "geolocation_city");

    let mut steps: Vec<(&str, &[Row], &str)> = vec![
        ("customers", customers.as_slice(), "customer_id"),
        ("payments", dataset.payments.rows.as_slice(), "order_id"),
        ("order_items", dataset.order_items.rows.as_slice(), "order_id"),
        ("products", dataset.products.rows.as_slice(), "product_id"),
    ];
    if let Some(sellers) = &dataset.sellers {
        steps.push(("sellers", sellers.rows.as_slice(), "seller_id"));
    }

    let mut rows = dataset.orders.rows.clone();
    debug!(rows = rows.len(), "orders");
    for (table, right, key) in steps {
        rows = join_with(strategy, &rows, right, key);
        debug!(table, key, rows = rows.len(), "joined");
    }

    Ok(rows)
}

/// Denormalize, normalize purchase dates to midnight and project onto the
/// configured columns. This is the record set every chart works from.
pub fn prepare(dataset: &Dataset, config: &DashboardConfig) -> DashResult<Vec<Row>> {
    let rows = denormalize(dataset, config.join_strategy)?;
    let rows = normalize_purchase_date(rows);
    Ok(select_columns(&rows, &config.columns))
}
