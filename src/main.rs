use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use orderdash::{ChartId, ChartSpec, Dashboard, DashboardConfig, FilterState, Interaction, dashboard::reduce};

#[derive(Parser, Debug)]
#[command(name = "orderdash", about = "Cross-filtered order dashboard over the Olist e-commerce tables")]
struct Args {
    /// JSON configuration file; missing keys take their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the CSV tables. Overrides `data_dir` from the config.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every chart spec as a JSON array.
    Render {
        /// Field constraint, `field=value`. May be repeated.
        #[arg(long = "filter")]
        filters: Vec<String>,

        /// Point selection on a chart, `chart=value` (e.g. `pie=boleto`).
        #[arg(long)]
        select: Option<String>,

        /// Date interval on the line chart, `YYYY-MM-DD,YYYY-MM-DD`.
        #[arg(long)]
        brush: Option<String>,

        /// Product category, or `all`.
        #[arg(long)]
        category: Option<String>,

        /// Write the specs here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the aggregate results for a filter state.
    Summary {
        #[arg(long = "filter")]
        filters: Vec<String>,
    },
    /// Print the category selector values.
    Categories,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<DashboardConfig> {
    let mut config = match &args.config {
        Some(path) => DashboardConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DashboardConfig::new(),
    };
    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    Ok(config)
}

fn apply_filters(mut state: FilterState, filters: &[String]) -> FilterState {
    for raw in filters {
        match raw.split_once('=') {
            Some((field, value)) if !field.trim().is_empty() => {
                state = state.with(field.trim(), value.trim());
            }
            _ => warn!(filter = %raw, "expected field=value; ignoring"),
        }
    }
    state
}

fn interactions(select: Option<&str>, brush: Option<&str>, category: Option<&str>) -> Vec<Interaction> {
    let mut out = Vec::new();

    if let Some(raw) = category {
        out.push(Interaction::Category(raw.to_string()));
    }
    if let Some(raw) = brush {
        match raw.split_once(',') {
            Some((start, end)) => out.push(Interaction::Brush {
                start: start.trim().to_string(),
                end: end.trim().to_string(),
            }),
            None => warn!(brush = %raw, "expected start,end; ignoring"),
        }
    }
    if let Some(raw) = select {
        match raw.split_once('=').map(|(chart, value)| (chart.trim().parse::<ChartId>(), value)) {
            Some((Ok(chart), value)) => out.push(Interaction::Select { chart, value: value.trim().to_string() }),
            Some((Err(e), _)) => warn!(select = %raw, error = %e, "ignoring selection"),
            None => warn!(select = %raw, "expected chart=value; ignoring"),
        }
    }

    out
}

/// The filter state a one-shot `render` ends in: `--filter` constraints
/// first, then each interaction in turn. The transition origin is dropped,
/// since nothing is on screen to keep.
fn resolve_state(filters: &[String], interactions: &[Interaction]) -> FilterState {
    interactions.iter()
        .fold(apply_filters(FilterState::initial(), filters), |state, interaction| reduce(&state, interaction).state)
}

fn render_specs(dashboard: &Dashboard, filters: &[String], interactions: &[Interaction]) -> Vec<ChartSpec> {
    dashboard.render(&resolve_state(filters, interactions), None)
}

fn emit(value: &impl Serialize, out: Option<&PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing output")?;
    match out {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "specs written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = load_config(&args)?;
    let dashboard = Dashboard::load(&config)
        .await
        .with_context(|| format!("loading tables from {}", config.data_dir.display()))?;
    info!(records = dashboard.records().len(), "dashboard ready");

    match &args.command {
        Command::Render { filters, select, brush, category, out } => {
            let interactions = interactions(select.as_deref(), brush.as_deref(), category.as_deref());
            emit(&render_specs(&dashboard, filters, &interactions), out.as_ref())
        }
        Command::Summary { filters } => {
            let state = apply_filters(FilterState::initial(), filters);
            emit(&dashboard.summary(&state), None)
        }
        Command::Categories => emit(&dashboard.categories(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderdash::Row;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn dashboard() -> Dashboard {
        let row: Row = [
            ("order_id", "o1"),
            ("customer_id", "c1"),
            ("geolocation_city", "sao paulo"),
            ("customer_state", "SP"),
            ("seller_state", "SP"),
            ("product_category_name", "esporte_lazer"),
            ("payment_type", "boleto"),
            ("payment_value", "20.0"),
            ("order_purchase_timestamp", "2017-01-05 00:00:00"),
        ]
        .into_iter()
        .collect();
        Dashboard::new(vec![row], &DashboardConfig::new())
    }

    fn ids(specs: &[ChartSpec]) -> Vec<ChartId> {
        specs.iter().map(|s| s.id).collect()
    }

    #[test]
    fn apply_filters_skips_malformed_pairs() {
        let state = apply_filters(FilterState::initial(), &args(&["customer_state=SP", "nonsense", "=x", "payment_type = boleto"]));
        assert_eq!(state.get("customer_state"), Some("SP"));
        assert_eq!(state.get("payment_type"), Some("boleto"));
        assert_eq!(state.get(""), None);
    }

    #[test]
    fn interactions_parse_flags_in_category_brush_select_order() {
        let parsed = interactions(Some("pie=boleto"), Some("2017-01-01, 2017-01-31"), Some("esporte_lazer"));
        assert_eq!(parsed, vec![
            Interaction::Category("esporte_lazer".into()),
            Interaction::Brush { start: "2017-01-01".into(), end: "2017-01-31".into() },
            Interaction::Select { chart: ChartId::PieChart, value: "boleto".into() },
        ]);

        assert!(interactions(Some("radar=x"), Some("2017-01-01"), None).is_empty());
    }

    #[test]
    fn resolve_state_applies_filters_then_interactions() {
        let state = resolve_state(
            &args(&["customer_state=SP"]),
            &interactions(Some("bar=sao paulo"), Some("2017-01-01,2017-01-31"), None),
        );
        assert_eq!(state.get("customer_state"), Some("SP"));
        assert_eq!(state.get("geolocation_city"), Some("sao paulo"));
        assert_eq!(state.get("date_range_start"), Some("2017-01-01"));
    }

    #[test]
    fn render_keeps_the_chart_an_interaction_came_from() {
        let dash = dashboard();

        let selected = render_specs(&dash, &[], &interactions(Some("pie=boleto"), None, None));
        assert_eq!(ids(&selected), ChartId::ALL.to_vec());

        let brushed = render_specs(&dash, &[], &interactions(None, Some("2017-01-01,2017-01-31"), None));
        assert_eq!(ids(&brushed), ChartId::ALL.to_vec());
        let line = brushed.iter().find(|s| s.id == ChartId::LineChart).unwrap();
        assert_eq!(line.spec["data"]["values"][0]["count"], 1);
    }
}
