use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DashError, DashResult};

/// Remote Brazilian states GeoJSON; features are keyed by the state code in `id`.
pub const DEFAULT_GEOMETRY_URL: &str =
    "https://raw.githubusercontent.com/giuliano-macedo/geodata-br-states/master/geojson/br_states.json";

/// Columns kept on the denormalized records handed to the charts.
pub const DEFAULT_COLUMNS: &[&str] = &[
    "customer_id",
    "geolocation_city",
    "order_id",
    "product_category_name",
    "price",
    "product_id",
    "customer_state",
    "seller_state",
    "order_purchase_timestamp",
    "date",
    "payment_type",
    "payment_value",
];

/// How the joiner treats several right-side rows sharing one key.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinStrategy {
    /// Keep only the last right row seen per key (at most one output row per left row).
    #[default]
    LastMatch,
    /// Emit one output row per matching right row.
    FanOut,
}

/// File names of the source tables, relative to `DashboardConfig::data_dir`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TableFiles {
    pub orders: String,
    pub order_items: String,
    pub products: String,
    pub payments: String,
    pub customers: String,
    /// Optional; when set, `seller_state` is joined in through `seller_id`.
    pub sellers: Option<String>,
}

impl Default for TableFiles {
    fn default() -> Self {
        Self {
            orders: "olist_orders_dataset.csv".to_string(),
            order_items: "olist_order_items_dataset.csv".to_string(),
            products: "olist_products_dataset.csv".to_string(),
            payments: "olist_order_payments_dataset.csv".to_string(),
            customers: "olist_customers_dataset.csv".to_string(),
            sellers: None,
        }
    }
}

/// Dashboard configuration.
///
/// Every field has a default, so a config file only needs the keys it
/// overrides:
///
/// ```json
/// { "data_dir": "./data", "join_strategy": "fan_out", "top_cities": 15 }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    pub tables: TableFiles,
    pub join_strategy: JoinStrategy,
    pub top_cities: usize,
    pub geometry_url: Option<String>,
    pub columns: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            tables: TableFiles::default(),
            join_strategy: JoinStrategy::default(),
            top_cities: 10,
            geometry_url: Some(DEFAULT_GEOMETRY_URL.to_string()),
            columns: DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl DashboardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default configuration reading the tables from `data_dir`.
    pub fn from_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_sellers(mut self, file_name: &str) -> Self {
        self.tables.sellers = Some(file_name.to_string());
        self
    }

    pub fn table_path(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }

    pub fn load_from_file(path: &Path) -> DashResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| DashError::Io { path: path.to_path_buf(), source })?;

        let config = serde_json::from_str::<Self>(&content)
            .map_err(|e| DashError::Config(format!("{} is not a valid config file: {e}", path.display())))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DashResult<()> {
        if self.top_cities == 0 {
            return Err(DashError::Config("top_cities must be at least 1".to_string()));
        }
        if self.columns.is_empty() {
            return Err(DashError::Config("columns must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs::File, io::Write};
    use tempfile::TempDir;

    #[test]
    fn default_config_uses_olist_file_names() {
        let config = DashboardConfig::from_dir("/srv/olist");
        assert_eq!(config.table_path(&config.tables.orders), PathBuf::from("/srv/olist/olist_orders_dataset.csv"));
        assert_eq!(config.top_cities, 10);
        assert_eq!(config.join_strategy, JoinStrategy::LastMatch);
        assert!(config.tables.sellers.is_none());
    }

    #[test]
    fn load_from_file_fills_missing_keys_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dash.json");
        let mut file = File::create(&path).unwrap();
        file.write_all(br#"{ "join_strategy": "fan_out", "top_cities": 5, "tables": { "sellers": "sellers.csv" } }"#).unwrap();

        let config = DashboardConfig::load_from_file(&path).unwrap();
        assert_eq!(config.join_strategy, JoinStrategy::FanOut);
        assert_eq!(config.top_cities, 5);
        assert_eq!(config.tables.sellers.as_deref(), Some("sellers.csv"));
        assert_eq!(config.tables.customers, "olist_customers_dataset.csv");
    }

    #[test]
    fn load_from_file_rejects_zero_top_cities() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dash.json");
        std::fs::write(&path, r#"{ "top_cities": 0 }"#).unwrap();

        let err = DashboardConfig::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("top_cities"));
    }

    #[test]
    fn load_from_file_reports_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dash.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = DashboardConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, DashError::Config(_)));
    }
}
