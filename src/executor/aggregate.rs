use std::collections::HashMap;

use serde::Serialize;

use crate::{
    database::Row,
    executor::{
        accumulators::{CountAcc, SumAcc, group_by},
        helpers::Helpers,
        transform::PURCHASE_TIMESTAMP,
    },
};

pub const DEFAULT_TOP_CITIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCount {
    pub date: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityCount {
    pub city: String,
    pub orders: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentTotal {
    pub payment_type: String,
    pub total_value: f64,
}

/// A payment total plus its share of the grand total, as the pie labels show it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentShare {
    pub payment_type: String,
    pub total_value: f64,
    pub percent: f64,
    pub percent_str: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateCount {
    #[serde(rename = "estado")]
    pub state: String,
    #[serde(rename = "pedidos")]
    pub orders: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatePairCount {
    pub seller_state: String,
    pub customer_state: String,
    pub orders: u64,
}

/// Orders per calendar day, ascending. Rows whose timestamp does not parse
/// are left out.
pub fn orders_by_day(rows: &[Row]) -> Vec<DayCount> {
    let groups = group_by(
        rows,
        |r| r.get_str(PURCHASE_TIMESTAMP).and_then(Helpers::parse_day),
        CountAcc::default,
    );

    let mut days: Vec<_> = groups.into_iter().collect();
    days.sort_by_key(|(day, _)| *day);
    days.into_iter()
        .map(|(day, count)| DayCount { date: day.format("%Y-%m-%d").to_string(), count })
        .collect()
}

/// Orders per customer city, descending by count, before any truncation.
/// Ties keep first-encounter order.
pub fn city_counts(rows: &[Row]) -> Vec<CityCount> {
    let groups = group_by(
        rows,
        |r| r.non_empty("geolocation_city").map(str::to_string),
        CountAcc::default,
    );

    let mut cities: Vec<_> = groups.into_iter()
        .map(|(city, orders)| CityCount { city, orders })
        .collect();
    cities.sort_by(|a, b| b.orders.cmp(&a.orders));
    cities
}

/// The `top` cities with the most orders.
pub fn orders_by_city(rows: &[Row], top: usize) -> Vec<CityCount> {
    let mut cities = city_counts(rows);
    cities.truncate(top);
    cities
}

/// Sum of `payment_value` per `payment_type`, in first-encounter order.
/// Rows with no payment type are skipped.
pub fn payments_by_type(rows: &[Row]) -> Vec<PaymentTotal> {
    group_by(
        rows,
        |r| r.non_empty("payment_type").map(str::to_string),
        || SumAcc::new("payment_value"),
    )
    .into_iter()
    .map(|(payment_type, total_value)| PaymentTotal { payment_type, total_value })
    .collect()
}

/// Attach each total's percentage of the grand total. A zero grand total
/// gives every entry 0%.
pub fn payment_shares(totals: &[PaymentTotal]) -> Vec<PaymentShare> {
    let grand_total: f64 = totals.iter().map(|t| t.total_value).sum();
    totals.iter()
        .map(|t| {
            let percent = if grand_total == 0.0 { 0.0 } else { t.total_value / grand_total * 100.0 };
            PaymentShare {
                payment_type: t.payment_type.clone(),
                total_value: t.total_value,
                percent,
                percent_str: format!("{percent:.1}%"),
            }
        })
        .collect()
}

/// customer id -> customer state, last row wins. Rows missing either field
/// are ignored.
pub fn customer_states(rows: &[Row]) -> HashMap<String, String> {
    rows.iter()
        .filter_map(|r| Some((r.non_empty("customer_id")?.to_string(), r.non_empty("customer_state")?.to_string())))
        .collect()
}

/// Orders per customer state, resolved through `states`, alphabetical.
/// Rows whose customer has no state are skipped.
pub fn orders_by_state(rows: &[Row], states: &HashMap<String, String>) -> Vec<StateCount> {
    let groups = group_by(
        rows,
        |r| r.get_str("customer_id").and_then(|id| states.get(id)).cloned(),
        CountAcc::default,
    );

    let mut out: Vec<_> = groups.into_iter()
        .map(|(state, orders)| StateCount { state, orders })
        .collect();
    out.sort_by(|a, b| a.state.cmp(&b.state));
    out
}

/// Orders per (seller state, customer state) pair, descending by count.
pub fn orders_by_state_pair(rows: &[Row]) -> Vec<StatePairCount> {
    let groups = group_by(
        rows,
        |r| Some((r.non_empty("seller_state")?.to_string(), r.non_empty("customer_state")?.to_string())),
        CountAcc::default,
    );

    let mut out: Vec<_> = groups.into_iter()
        .map(|((seller_state, customer_state), orders)| StatePairCount { seller_state, customer_state, orders })
        .collect();
    out.sort_by(|a, b| b.orders.cmp(&a.orders));
    out
}
