use once_cell::sync::Lazy;
use regex::Regex;

/// Thousands separators, currency symbols and stray whitespace.
static NUMERIC_NOISE: Lazy<Regex> = Lazy::new(|| {
    // The pattern is a literal, it always compiles
    Regex::new(r"[,\s$€£¥]").unwrap()
});

/// Strict numeric parse: the whole (trimmed) text must be a finite number.
pub fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

/// Lenient numeric parse used by the coercion rule: `"$12,500"` → `12500.0`.
pub fn coerce_number(value: &str) -> Option<f64> {
    let stripped = NUMERIC_NOISE.replace_all(value, "");
    parse_number(&stripped)
}
