use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::{database::{Row, Table}, error::{DashError, DashResult}};

/// Parse CSV bytes into a table. Every field is kept as a JSON string;
/// coercion happens where a consumer needs a number or a date.
///
/// Rows shorter than the header are padded with empty strings and extra
/// trailing fields are ignored, so every row carries the header's key set.
pub fn parse_table(name: &str, bytes: &[u8]) -> Result<Table, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(bytes);

    let columns = reader.headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect::<Vec<_>>();

    let mut table = Table::new(name, columns);
    for record in reader.records() {
        let record = record?;
        let mut row = Row::new();
        for (idx, column) in table.columns.iter().enumerate() {
            let cell = record.get(idx).unwrap_or_default();
            row.insert(column.clone(), Value::String(cell.to_string()));
        }
        table.rows.push(row);
    }

    Ok(table)
}

/// Read one CSV file from disk into a table named `name`.
pub async fn load_table(name: &str, path: &Path) -> DashResult<Table> {
    let bytes = tokio::fs::read(path).await
        .map_err(|source| DashError::Io { path: path.to_path_buf(), source })?;

    let table = parse_table(name, &bytes)
        .map_err(|source| DashError::Csv { path: path.to_path_buf(), source })?;

    info!(table = name, rows = table.len(), path = %path.display(), "loaded table");
    Ok(table)
}
