//! Number formatting for token amounts and percentages.

use govlens_types::TokenAmount;

const TIERS: [(f64, &str, &str); 4] = [
    (1e12, "T", " Trillion"),
    (1e9, "B", " Billion"),
    (1e6, "M", " Million"),
    (1e3, "K", " Thousand"),
];

/// Compact notation: `1.5K`, `2.35M`, `1.00B`. Thousands get one decimal,
/// larger tiers two. Values below 1000 are printed as-is.
pub fn format_compact(n: f64) -> String {
    if n.is_nan() {
        return "0".to_string();
    }
    for (threshold, suffix, _) in TIERS {
        if n >= threshold {
            let decimals = if threshold >= 1e6 { 2 } else { 1 };
            return format!("{:.*}{}", decimals, n / threshold, suffix);
        }
    }
    format!("{n}")
}

/// Long notation: `2.35 Million`, always two decimals above 1000.
pub fn format_large(n: f64) -> String {
    if n.is_nan() {
        return "0".to_string();
    }
    for (threshold, _, suffix) in TIERS {
        if n >= threshold {
            return format!("{:.2}{suffix}", n / threshold);
        }
    }
    format!("{n}")
}

/// Two decimals with thousands separators and a trailing `%`.
pub fn format_percentage(n: f64) -> String {
    if n.is_nan() {
        return "0.00%".to_string();
    }
    let fixed = format!("{:.2}", n.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if n < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{}.{frac}%", group_thousands(int_part))
}

/// Smallest denomination to display units.
pub fn micro_to_display(amount: &TokenAmount) -> f64 {
    amount.to_display_units()
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
