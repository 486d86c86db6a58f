use std::path::PathBuf;

use thiserror::Error;

use crate::dashboard::ChartId;

/// Errors raised while loading, joining or rendering the dashboard data.
#[derive(Debug, Error)]
pub enum DashError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid CSV: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("table `{table}` has no column `{column}`")]
    MissingColumn { table: String, column: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("chart {chart} could not be built: {reason}")]
    Chart { chart: ChartId, reason: String },
}

pub type DashResult<T> = Result<T, DashError>;
