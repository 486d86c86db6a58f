use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    dashboard::{Aggregation, ChartConfig, ChartData, ChartId, ChartSpec, Interaction, SpecContext, Transition, reduce},
    database::{DashboardConfig, Dataset, Row},
    error::{DashError, DashResult},
    executor::{
        ALL, CATEGORY_FIELD, CityCount, DayCount, FilterState, PaymentShare, StateCount, StatePairCount,
        customer_states, distinct_values, filter_rows, orders_by_city, orders_by_day, orders_by_state,
        orders_by_state_pair, payment_shares, payments_by_type, prepare,
    },
};

/// Every aggregate for one filter state, without chart layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub rows: usize,
    pub orders_by_day: Vec<DayCount>,
    pub orders_by_city: Vec<CityCount>,
    pub payments_by_type: Vec<PaymentShare>,
    pub orders_by_state: Vec<StateCount>,
    pub orders_by_state_pair: Vec<StatePairCount>,
}

/// The denormalized record set plus the chart configuration. Rendering is a
/// pure function of this value and a [`FilterState`].
#[derive(Debug, Clone)]
pub struct Dashboard {
    records: Vec<Row>,
    states: HashMap<String, String>,
    charts: Vec<ChartConfig>,
    top_cities: usize,
    context: SpecContext,
}

impl Dashboard {
    pub fn new(records: Vec<Row>, config: &DashboardConfig) -> Self {
        let states = customer_states(&records);
        Self {
            records,
            states,
            charts: ChartConfig::defaults(),
            top_cities: config.top_cities,
            context: SpecContext { geometry_url: config.geometry_url.clone() },
        }
    }

    /// Load every table, join once and build the dashboard.
    pub async fn load(config: &DashboardConfig) -> DashResult<Self> {
        config.validate()?;
        let dataset = Dataset::load(config).await?;
        Self::from_dataset(&dataset, config)
    }

    pub fn from_dataset(dataset: &Dataset, config: &DashboardConfig) -> DashResult<Self> {
        let records = prepare(dataset, config)?;
        debug!(records = records.len(), "denormalized");
        Ok(Self::new(records, config))
    }

    pub fn records(&self) -> &[Row] { &self.records }

    /// Category selector values: `"all"` first, then each category in
    /// encounter order.
    pub fn categories(&self) -> Vec<String> {
        std::iter::once(ALL.to_string())
            .chain(distinct_values(&self.records, CATEGORY_FIELD))
            .collect()
    }

    fn aggregate(&self, aggregation: Aggregation, rows: &[Row]) -> ChartData {
        match aggregation {
            Aggregation::OrdersByDay => ChartData::Days(orders_by_day(rows)),
            Aggregation::TopCities => ChartData::Cities(orders_by_city(rows, self.top_cities)),
            Aggregation::PaymentShares => ChartData::Payments(payment_shares(&payments_by_type(rows))),
            Aggregation::OrdersByState => ChartData::States(orders_by_state(rows, &self.states)),
            Aggregation::StatePairs => ChartData::StatePairs(orders_by_state_pair(rows)),
        }
    }

    pub fn summary(&self, state: &FilterState) -> Summary {
        let rows = filter_rows(state, &self.records);
        Summary {
            rows: rows.len(),
            orders_by_day: orders_by_day(&rows),
            orders_by_city: orders_by_city(&rows, self.top_cities),
            payments_by_type: payment_shares(&payments_by_type(&rows)),
            orders_by_state: orders_by_state(&rows, &self.states),
            orders_by_state_pair: orders_by_state_pair(&rows),
        }
    }

    /// Build one chart from already-filtered rows.
    pub fn render_chart(&self, chart: &ChartConfig, rows: &[Row]) -> DashResult<ChartSpec> {
        let data = self.aggregate(chart.aggregation, rows);
        let spec = chart.build(&data, &self.context)
            .map_err(|reason| DashError::Chart { chart: chart.id, reason })?;
        Ok(ChartSpec { id: chart.id, mount: format!("#{}", chart.id), spec })
    }

    /// Specs for every chart except `origin`. A chart that fails to build
    /// is logged and left out; the others still render.
    pub fn render(&self, state: &FilterState, origin: Option<ChartId>) -> Vec<ChartSpec> {
        let rows = filter_rows(state, &self.records);
        debug!(rows = rows.len(), origin = ?origin, "rendering");

        self.charts.iter()
            .filter(|chart| Some(chart.id) != origin)
            .filter_map(|chart| match self.render_chart(chart, &rows) {
                Ok(spec) => Some(spec),
                Err(err) => {
                    warn!(chart = %chart.id, error = %err, "chart skipped");
                    None
                }
            })
            .collect()
    }

    /// Apply an interaction and redraw the charts it affects.
    pub fn dispatch(&self, state: &FilterState, interaction: &Interaction) -> (Transition, Vec<ChartSpec>) {
        let transition = reduce(state, interaction);
        let specs = self.render(&transition.state, transition.origin);
        (transition, specs)
    }
}
