pub mod error;
pub use error::{DashError, DashResult};

pub mod database;
pub use database::{DashboardConfig, Dataset, JoinStrategy, Row, Table};

pub mod executor;
pub use executor::FilterState;

pub mod dashboard;
pub use dashboard::{ChartId, ChartSpec, Dashboard, Interaction, Summary, Transition};

#[cfg(test)]
mod fixtures;
