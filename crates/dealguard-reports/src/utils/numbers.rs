/// Compact count for console output: `4.5K`, `2.3M`.
pub fn format_numbers(n: usize) -> String {
    compact(n as f64).unwrap_or_else(|| n.to_string())
}

/// Compact currency-free amount: `175.9K`; small amounts keep two decimals.
pub fn format_amount(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    match compact(value.abs()) {
        Some(s) => format!("{}{}", sign, s),
        None => format!("{:.2}", value),
    }
}

fn compact(v: f64) -> Option<String> {
    match v {
        v if v > 1_000_000_000.0 => Some(format!("{:0.1}B", v / 1_000_000_000.0)),
        v if v > 1_000_000.0 => Some(format!("{:0.1}M", v / 1_000_000.0)),
        v if v > 1_000.0 => Some(format!("{:0.1}K", v / 1_000.0)),
        _ => None,
    }
}
