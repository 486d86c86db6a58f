use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::executor::{CityCount, DayCount, PaymentShare, StateCount, StatePairCount};

const BACKGROUND: &str = "#0b051d";
const FOREGROUND: &str = "#e0e1dd";
const GRID: &str = "#3a506b";
const PAYMENT_DOMAIN: [&str; 4] = ["credit_card", "boleto", "voucher", "debit_card"];
const PAYMENT_RANGE: [&str; 4] = ["#1bbfe9", "#7461a5", "#3b5dac", "#7bc895"];

/// One chart of the dashboard; the snake_case name is also its mount point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartId {
    PieChart,
    LineChart,
    BarChart,
    MapChart,
    HeatChart,
}

impl ChartId {
    pub const ALL: [ChartId; 5] = [
        ChartId::PieChart,
        ChartId::LineChart,
        ChartId::BarChart,
        ChartId::MapChart,
        ChartId::HeatChart,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartId::PieChart => "pie_chart",
            ChartId::LineChart => "line_chart",
            ChartId::BarChart => "bar_chart",
            ChartId::MapChart => "map_chart",
            ChartId::HeatChart => "heat_chart",
        }
    }

    /// Filter field a point selection on this chart writes. The line chart
    /// selects an interval instead and writes the date range.
    pub fn filter_field(&self) -> Option<&'static str> {
        match self {
            ChartId::PieChart => Some("payment_type"),
            ChartId::LineChart => None,
            ChartId::BarChart => Some("geolocation_city"),
            ChartId::MapChart => Some("customer_state"),
            ChartId::HeatChart => Some("seller_state"),
        }
    }
}

impl Display for ChartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartId::ALL.into_iter()
            .find(|id| id.as_str() == s || id.as_str().trim_end_matches("_chart") == s)
            .ok_or_else(|| format!("unknown chart `{s}`"))
    }
}

/// Which summary a chart is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    OrdersByDay,
    TopCities,
    PaymentShares,
    OrdersByState,
    StatePairs,
}

/// The summary collection handed to a chart template.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChartData {
    Days(Vec<DayCount>),
    Cities(Vec<CityCount>),
    Payments(Vec<PaymentShare>),
    States(Vec<StateCount>),
    StatePairs(Vec<StatePairCount>),
}

impl ChartData {
    fn values(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Array(Vec::new()))
    }
}

/// Inputs a template may need beyond the chart's own data.
#[derive(Debug, Clone, Default)]
pub struct SpecContext {
    pub geometry_url: Option<String>,
}

pub type SpecTemplate = fn(&ChartConfig, &ChartData, &SpecContext) -> Result<Value, String>;

/// Declarative description of one chart: what it aggregates, what its
/// selection filters and how its spec is laid out.
#[derive(Clone)]
pub struct ChartConfig {
    pub id: ChartId,
    pub title: String,
    pub aggregation: Aggregation,
    pub width: u32,
    pub height: u32,
    pub template: SpecTemplate,
}

impl std::fmt::Debug for ChartConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartConfig")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("aggregation", &self.aggregation)
            .finish_non_exhaustive()
    }
}

impl ChartConfig {
    pub fn new(id: ChartId, title: &str, aggregation: Aggregation, template: SpecTemplate) -> Self {
        Self { id, title: title.to_string(), aggregation, width: 400, height: 300, template }
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// The five charts of the orders dashboard.
    pub fn defaults() -> Vec<ChartConfig> {
        vec![
            ChartConfig::new(ChartId::PieChart, "Payment value by payment type", Aggregation::PaymentShares, pie_spec)
                .size(260, 260),
            ChartConfig::new(ChartId::LineChart, "Orders over time", Aggregation::OrdersByDay, line_spec)
                .size(750, 400),
            ChartConfig::new(ChartId::BarChart, "Cities with the most orders", Aggregation::TopCities, bar_spec)
                .size(340, 300),
            ChartConfig::new(ChartId::MapChart, "Orders by customer state", Aggregation::OrdersByState, map_spec)
                .size(600, 600),
            ChartConfig::new(ChartId::HeatChart, "Orders by seller and customer state", Aggregation::StatePairs, heat_spec)
                .size(600, 400),
        ]
    }

    pub fn build(&self, data: &ChartData, ctx: &SpecContext) -> Result<Value, String> {
        (self.template)(self, data, ctx)
    }

    fn frame(&self, data: &ChartData) -> Value {
        json!({
            "$schema": "https://vega.github.io/schema/vega-lite/v5.json",
            "title": { "text": self.title, "font": "sans-serif", "color": FOREGROUND },
            "width": self.width,
            "height": self.height,
            "data": { "values": data.values() },
            "config": {
                "background": BACKGROUND,
                "axis": { "labelColor": FOREGROUND, "titleColor": FOREGROUND, "gridColor": GRID }
            }
        })
    }
}

/// Rendered chart ready for the charting collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub id: ChartId,
    pub mount: String,
    pub spec: Value,
}

fn merge(mut base: Value, extra: Value) -> Value {
    if let (Value::Object(base_map), Value::Object(extra_map)) = (&mut base, extra) {
        for (k, v) in extra_map {
            base_map.insert(k, v);
        }
    }
    base
}

fn max_metric<T>(items: &[T], metric: impl Fn(&T) -> u64) -> Option<u64> {
    items.iter().map(metric).max()
}

fn pie_spec(chart: &ChartConfig, data: &ChartData, _ctx: &SpecContext) -> Result<Value, String> {
    let ChartData::Payments(_) = data else {
        return Err("pie chart expects payment totals".to_string());
    };
    let select = json!({ "name": "select", "select": { "type": "point", "fields": ["payment_type"], "on": "click", "clear": "dblclick" }, "bind": "legend" });

    Ok(merge(chart.frame(data), json!({
        "padding": 10,
        "layer": [
            {
                "params": [select],
                "mark": { "type": "arc", "outerRadius": 120, "innerRadius": 80 },
                "encoding": {
                    "theta": { "field": "total_value", "type": "quantitative" },
                    "color": {
                        "field": "payment_type", "type": "nominal",
                        "scale": { "domain": PAYMENT_DOMAIN, "range": PAYMENT_RANGE },
                        "legend": { "title": "Payment type", "labelColor": FOREGROUND, "titleColor": FOREGROUND, "offset": 0 }
                    },
                    "order": { "field": "total_value", "type": "quantitative", "sort": "descending" },
                    "opacity": { "condition": { "param": "select", "value": 1.0 }, "value": 0.3 },
                    "tooltip": [
                        { "field": "payment_type", "type": "nominal", "title": "Payment type" },
                        { "field": "total_value", "type": "quantitative", "title": "Total value", "format": ".2f" }
                    ]
                }
            },
            {
                "mark": { "type": "text", "align": "center", "fontSize": 24, "fontWeight": "bold", "fill": "#a6a6a6" },
                "transform": [{ "filter": { "param": "select", "empty": false } }],
                "encoding": {
                    "text": { "field": "percent_str", "type": "nominal" },
                    "theta": { "field": "total_value", "type": "quantitative" }
                }
            }
        ]
    })))
}

fn line_spec(chart: &ChartConfig, data: &ChartData, _ctx: &SpecContext) -> Result<Value, String> {
    let ChartData::Days(_) = data else {
        return Err("line chart expects daily counts".to_string());
    };
    let x = json!({ "field": "date", "type": "temporal", "title": "Date" });

    Ok(merge(chart.frame(data), json!({
        "padding": { "bottom": 60, "left": 40, "right": 40, "top": 40 },
        "layer": [
            {
                "params": [{ "name": "brush", "select": { "type": "interval", "encodings": ["x"] } }],
                "mark": { "type": "line", "interpolate": "linear", "stroke": "#1f77b4" },
                "encoding": {
                    "x": x,
                    "y": { "field": "count", "type": "quantitative", "title": "Orders", "axis": { "grid": true } },
                    "opacity": { "condition": { "param": "brush", "value": 1 }, "value": 0.8 }
                }
            },
            {
                "mark": { "type": "rule", "color": "#ffffff" },
                "transform": [{ "filter": { "param": "hover", "empty": false } }],
                "encoding": { "x": x }
            },
            {
                "params": [{ "name": "hover", "select": { "type": "point", "encodings": ["x"], "on": "mouseover", "toggle": false, "nearest": true } }],
                "mark": { "type": "circle", "tooltip": true },
                "encoding": {
                    "x": x,
                    "y": { "field": "count", "type": "quantitative" },
                    "opacity": { "condition": { "param": "hover", "empty": false, "value": 1 }, "value": 0 },
                    "size": { "condition": { "param": "hover", "empty": false, "value": 48 }, "value": 100 },
                    "tooltip": [
                        { "field": "date", "type": "temporal", "title": "Date" },
                        { "field": "count", "type": "quantitative", "title": "Orders" }
                    ]
                }
            }
        ]
    })))
}

fn bar_spec(chart: &ChartConfig, data: &ChartData, _ctx: &SpecContext) -> Result<Value, String> {
    let ChartData::Cities(cities) = data else {
        return Err("bar chart expects city counts".to_string());
    };
    let order: Vec<&str> = cities.iter().map(|c| c.city.as_str()).collect();
    let domain_max = max_metric(cities, |c| c.orders).unwrap_or(0) as f64 * 1.1;
    let y = json!({ "field": "city", "type": "nominal", "title": null, "sort": order });

    Ok(merge(chart.frame(data), json!({
        "padding": { "left": 15 },
        "layer": [
            {
                "params": [{ "name": "clickedBar", "select": { "type": "point", "fields": ["city"], "on": "click", "clear": "dblclick" } }],
                "mark": "bar",
                "encoding": {
                    "x": { "field": "orders", "type": "quantitative", "title": "Orders", "axis": { "grid": true }, "scale": { "domainMax": domain_max } },
                    "y": y,
                    "color": { "value": "#1bbfe9" },
                    "opacity": { "condition": { "param": "clickedBar", "value": 1.0 }, "value": 0.3 },
                    "strokeWidth": { "condition": { "param": "clickedBar", "value": 2 }, "value": 0 },
                    "tooltip": [
                        { "field": "city", "type": "nominal", "title": "City" },
                        { "field": "orders", "type": "quantitative", "title": "Orders", "format": ".0f" }
                    ]
                }
            },
            {
                "mark": { "type": "text", "dx": -16, "fontSize": 10, "fontWeight": "bold", "fill": "#10072c" },
                "transform": [{ "filter": { "param": "clickedBar", "empty": false } }],
                "encoding": {
                    "x": { "field": "orders", "type": "quantitative" },
                    "y": y,
                    "text": { "field": "orders", "type": "quantitative" }
                }
            }
        ]
    })))
}

fn map_spec(chart: &ChartConfig, data: &ChartData, ctx: &SpecContext) -> Result<Value, String> {
    let ChartData::States(states) = data else {
        return Err("map chart expects state counts".to_string());
    };
    let Some(url) = ctx.geometry_url.as_deref().filter(|u| !u.trim().is_empty()) else {
        return Err("no geometry source configured".to_string());
    };
    let max = max_metric(states, |s| s.orders).filter(|m| *m > 0).unwrap_or(10);

    Ok(merge(chart.frame(data), json!({
        "data": { "url": url, "format": { "type": "json", "property": "features" } },
        "projection": { "type": "mercator" },
        "params": [{ "name": "clickedState", "select": { "type": "point", "fields": ["estado"], "on": "click", "clear": "dblclick" } }],
        "transform": [
            {
                "lookup": "id",
                "from": { "data": { "values": data.values() }, "key": "estado", "fields": ["estado", "pedidos"] }
            },
            { "calculate": "datum.pedidos || 0", "as": "Pedidos" }
        ],
        "mark": { "type": "geoshape", "stroke": "#000000", "strokeWidth": 0.5 },
        "encoding": {
            "color": {
                "field": "Pedidos", "type": "quantitative",
                "scale": { "type": "log", "domain": [1, max], "scheme": "blues" },
                "legend": { "title": "Orders (log scale)", "titleColor": FOREGROUND, "labelColor": FOREGROUND }
            },
            "opacity": { "condition": { "param": "clickedState", "value": 1.0 }, "value": 0.3 },
            "tooltip": [
                { "field": "estado", "type": "nominal", "title": "State" },
                { "field": "Pedidos", "type": "quantitative", "title": "Orders" }
            ]
        }
    })))
}

fn heat_spec(chart: &ChartConfig, data: &ChartData, _ctx: &SpecContext) -> Result<Value, String> {
    let ChartData::StatePairs(pairs) = data else {
        return Err("heat chart expects state pair counts".to_string());
    };
    let max = max_metric(pairs, |p| p.orders).filter(|m| *m > 0).unwrap_or(10_000);
    let x = json!({ "field": "customer_state", "type": "ordinal", "title": "Customer state" });
    let y = json!({ "field": "seller_state", "type": "ordinal", "title": "Seller state" });

    Ok(merge(chart.frame(data), json!({
        "padding": { "bottom": 60, "left": 40, "right": 40, "top": 40 },
        "layer": [
            {
                "params": [{ "name": "clickedState", "select": { "type": "point", "fields": ["seller_state"], "on": "click", "clear": "dblclick" } }],
                "mark": { "type": "rect", "strokeWidth": 2 },
                "encoding": {
                    "x": x,
                    "y": y,
                    "fill": {
                        "field": "orders", "type": "quantitative",
                        "scale": { "type": "log", "domain": [1, max], "scheme": "blues" },
                        "legend": { "title": "Orders (log scale)", "titleColor": FOREGROUND, "labelColor": FOREGROUND }
                    },
                    "opacity": { "condition": { "param": "clickedState", "value": 1.0 }, "value": 0.4 },
                    "tooltip": [
                        { "field": "seller_state", "type": "nominal", "title": "Seller state" },
                        { "field": "customer_state", "type": "nominal", "title": "Customer state" },
                        { "field": "orders", "type": "quantitative", "title": "Orders", "format": ".0f" }
                    ]
                }
            },
            {
                "mark": { "type": "text", "fontSize": 7, "fontWeight": "bold", "fill": "#10072c" },
                "transform": [{ "filter": { "param": "clickedState", "empty": false } }],
                "encoding": { "x": x, "y": y, "text": { "field": "orders", "type": "quantitative" } }
            }
        ]
    })))
}
