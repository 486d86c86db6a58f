use tracing::warn;

use crate::{
    dashboard::ChartId,
    executor::{CATEGORY_FIELD, DATE_RANGE_END, DATE_RANGE_START, FilterState, is_date_bound},
};

/// A user gesture on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// Click on a datum of `chart`: its filter field becomes `value`.
    /// An empty value behaves like a click on empty space.
    Select { chart: ChartId, value: String },
    /// Click on empty space or double-click: the chart's field is cleared.
    Deselect { chart: ChartId },
    /// Interval selected on the line chart, `YYYY-MM-DD` bounds.
    Brush { start: String, end: String },
    /// Interval removed from the line chart.
    ClearBrush,
    /// Category picked in the radio selector (`"all"` for every category).
    Category(String),
}

/// Result of applying an interaction: the next state, and the chart that
/// caused it (which keeps its own rendering and is not redrawn).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: FilterState,
    pub origin: Option<ChartId>,
}

impl Transition {
    fn redraw_all(state: FilterState) -> Self {
        Self { state, origin: None }
    }
}

/// Pure reducer over the filter state.
pub fn reduce(state: &FilterState, interaction: &Interaction) -> Transition {
    match interaction {
        Interaction::Select { chart, value } if value.is_empty() => {
            reduce(state, &Interaction::Deselect { chart: *chart })
        }
        Interaction::Select { chart, value } => match chart.filter_field() {
            Some(field) => Transition { state: state.with(field, value), origin: Some(*chart) },
            None => {
                warn!(%chart, "chart has no point selection; ignoring");
                Transition::redraw_all(state.clone())
            }
        },
        Interaction::Deselect { chart } => match chart.filter_field() {
            Some(field) => Transition::redraw_all(state.cleared(field)),
            None => Transition::redraw_all(state.with_date_range("", "")),
        },
        Interaction::Brush { start, end } => {
            if !is_date_bound(start) || !is_date_bound(end) {
                warn!(%start, %end, "brush bounds are not YYYY-MM-DD dates; ignoring");
                return Transition::redraw_all(state.clone());
            }
            Transition { state: state.with_date_range(start, end), origin: Some(ChartId::LineChart) }
        }
        Interaction::ClearBrush => Transition::redraw_all(
            state.cleared(DATE_RANGE_START).cleared(DATE_RANGE_END),
        ),
        Interaction::Category(value) if value.is_empty() => Transition::redraw_all(state.cleared(CATEGORY_FIELD)),
        Interaction::Category(value) => Transition::redraw_all(state.with(CATEGORY_FIELD, value)),
    }
}
