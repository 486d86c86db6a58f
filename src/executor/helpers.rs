use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

pub struct Helpers;

impl Helpers {
    /// Parse a purchase timestamp. Accepts `YYYY-MM-DD HH:MM:SS`, the `T`
    /// separated form, RFC 3339 (offset dropped) and a bare `YYYY-MM-DD`.
    pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").ok()
            .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").ok())
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))
            .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().and_then(|d| d.and_hms_opt(0, 0, 0)))
    }

    /// Calendar day of a timestamp, or `None` when it does not parse.
    pub fn parse_day(raw: &str) -> Option<NaiveDate> {
        Self::parse_timestamp(raw).map(|ts| ts.date())
    }

    /// `YYYY-MM-DD 00:00:00`, the normalized form used by the range filter.
    pub fn midnight_string(day: NaiveDate) -> String {
        format!("{} 00:00:00", day.format("%Y-%m-%d"))
    }

    /// Coerce a cell to `f64`; anything non-numeric counts as zero so sums
    /// never turn into NaN.
    pub fn coerce_f64(value: Option<&Value>) -> f64 {
        let parsed = match value {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => {
                let s = s.trim();
                if s.is_empty() { Some(0.0) } else { s.parse::<f64>().ok() }
            }
            Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        };
        parsed.filter(|f| f.is_finite()).unwrap_or(0.0)
    }
}
