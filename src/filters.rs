// Display filters: named value formatters the views apply when printing
// server payloads. Only `formatNumber` is installed at bootstrap.

use serde_json::Value;
use std::collections::HashMap;

pub type Filter = fn(&Value) -> String;

/// Name of the two-decimal number filter.
pub const FORMAT_NUMBER: &str = "formatNumber";

#[derive(Clone, Default)]
pub struct Filters {
    registry: HashMap<&'static str, Filter>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a filter, replacing any previous one with the same name.
    pub fn register(&mut self, name: &'static str, filter: Filter) {
        self.registry.insert(name, filter);
    }

    pub fn apply(&self, name: &str, value: &Value) -> Option<String> {
        self.registry.get(name).map(|filter| filter(value))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains_key(name)
    }
}

/// Render a number with exactly two decimals. Numeric strings are parsed,
/// with `,` thousands separators ignored; anything else renders as zero.
pub fn format_number(value: &Value) -> String {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    let n = if n.is_finite() { n } else { 0.0 };
    format!("{:.2}", round_half_up(n, 2))
}

// Shift through the decimal text so 1.005 rounds to 1.01 rather than
// following its binary approximation down to 1.00.
fn round_half_up(n: f64, places: i32) -> f64 {
    let shifted: f64 = format!("{n}e{places}").parse().unwrap_or(n * 10f64.powi(places));
    let rounded = (shifted + 0.5).floor() / 10f64.powi(places);
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn formats_two_decimals() {
        assert_eq!(format_number(&json!(1)), "1.00");
        assert_eq!(format_number(&json!(2.5)), "2.50");
        assert_eq!(format_number(&json!(1234.567)), "1234.57");
        assert_eq!(format_number(&json!(-3.14159)), "-3.14");
        assert_eq!(format_number(&json!(0.8765)), "0.88");
    }

    #[test]
    fn rounds_on_decimal_representation() {
        assert_eq!(format_number(&json!(1.005)), "1.01");
        assert_eq!(format_number(&json!(0.125)), "0.13");
    }

    #[test]
    fn parses_numeric_strings() {
        assert_eq!(format_number(&json!("42")), "42.00");
        assert_eq!(format_number(&json!(" 0.5 ")), "0.50");
        assert_eq!(format_number(&json!("1,234.5")), "1234.50");
        assert_eq!(format_number(&json!("-12,000")), "-12000.00");
    }

    #[test]
    fn non_numeric_is_zero() {
        assert_eq!(format_number(&Value::Null), "0.00");
        assert_eq!(format_number(&json!("abc")), "0.00");
        assert_eq!(format_number(&json!("inf")), "0.00");
        assert_eq!(format_number(&json!([1, 2])), "0.00");
        assert_eq!(format_number(&json!(-0.001)), "0.00");
    }

    #[test]
    fn registry_applies_by_name() {
        let mut filters = Filters::new();
        assert_eq!(filters.apply(FORMAT_NUMBER, &json!(3)), None);

        filters.register(FORMAT_NUMBER, format_number);
        assert!(filters.contains(FORMAT_NUMBER));
        assert_eq!(filters.apply(FORMAT_NUMBER, &json!(3)).as_deref(), Some("3.00"));
        assert_eq!(filters.apply("uppercase", &json!("x")), None);
    }
}
