use tracing::info;

use crate::{
    database::{DashboardConfig, Table, loader::load_table},
    error::DashResult,
};

/// The raw source tables, as loaded.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub orders: Table,
    pub order_items: Table,
    pub products: Table,
    pub payments: Table,
    pub customers: Table,
    pub sellers: Option<Table>,
}

impl Dataset {
    /// Load every configured table concurrently. Nothing downstream runs
    /// until all loads have completed; the first failure aborts the load.
    pub async fn load(config: &DashboardConfig) -> DashResult<Self> {
        let files = &config.tables;

        let orders_path = config.table_path(&files.orders);
        let order_items_path = config.table_path(&files.order_items);
        let products_path = config.table_path(&files.products);
        let payments_path = config.table_path(&files.payments);
        let customers_path = config.table_path(&files.customers);
        let sellers_path = files.sellers.as_deref().map(|file| config.table_path(file));

        let sellers = async {
            match &sellers_path {
                Some(path) => load_table("sellers", path).await.map(Some),
                None => Ok(None),
            }
        };

        let (orders, order_items, products, payments, customers, sellers) = tokio::try_join!(
            load_table("orders", &orders_path),
            load_table("order_items", &order_items_path),
            load_table("products", &products_path),
            load_table("payments", &payments_path),
            load_table("customers", &customers_path),
            sellers,
        )?;

        let dataset = Self { orders, order_items, products, payments, customers, sellers };
        info!(tables = dataset.table_count(), data_dir = %config.data_dir.display(), "dataset loaded");
        Ok(dataset)
    }

    pub fn table_count(&self) -> usize {
        5 + usize::from(self.sellers.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashError;
    use crate::fixtures::write_dataset;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_reads_all_tables() {
        let dir = TempDir::new().unwrap();
        write_dataset(dir.path());

        let dataset = Dataset::load(&DashboardConfig::from_dir(dir.path())).await.unwrap();
        assert_eq!(dataset.table_count(), 5);
        assert_eq!(dataset.orders.len(), 4);
        assert_eq!(dataset.customers.len(), 3);
        assert!(dataset.sellers.is_none());
    }

    #[tokio::test]
    async fn load_includes_sellers_when_configured() {
        let dir = TempDir::new().unwrap();
        write_dataset(dir.path());

        let config = DashboardConfig::from_dir(dir.path()).with_sellers("olist_sellers_dataset.csv");
        let dataset = Dataset::load(&config).await.unwrap();
        assert_eq!(dataset.table_count(), 6);
        assert_eq!(dataset.sellers.map(|s| s.len()), Some(2));
    }

    #[tokio::test]
    async fn load_fails_when_one_table_is_missing() {
        let dir = TempDir::new().unwrap();
        write_dataset(dir.path());
        std::fs::remove_file(dir.path().join("olist_products_dataset.csv")).unwrap();

        let err = Dataset::load(&DashboardConfig::from_dir(dir.path())).await.unwrap_err();
        assert!(matches!(err, DashError::Io { .. }));
    }
}
