// Number formatting for evaluation results and variable display
// Currency output is US-style: "$" prefix, "," thousands separator, "." decimal point

/// Results at or above this are shown as currency.
pub const CURRENCY_THRESHOLD: f64 = 1000.0;

/// Format an evaluation result for display.
/// Large values get currency formatting, everything else plain decimal text.
pub fn format_result(n: f64) -> String {
    if n >= CURRENCY_THRESHOLD {
        format_currency(n)
    } else {
        format_plain(n)
    }
}

/// Shortest round-trip decimal text (`5`, `0.25`, `-3.5`)
pub fn format_plain(n: f64) -> String {
    if n == 0.0 {
        // Avoid "-0"
        return "0".to_string();
    }
    format!("{}", n)
}

/// `$183,750.00`, `-$1,200.50`
pub fn format_currency(n: f64) -> String {
    let fixed = format!("{:.2}", n.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if n < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, group_thousands(int_part), frac_part)
}

/// Compact currency for large magnitudes (`$50M`, `$1.25B`). Values below a
/// million fall back to [`format_currency`].
pub fn format_compact_currency(n: f64) -> String {
    const UNITS: [(f64, &str); 3] = [(1e12, "T"), (1e9, "B"), (1e6, "M")];

    let abs = n.abs();
    let Some((scale, suffix)) = UNITS.iter().find(|(scale, _)| abs >= *scale) else {
        return format_currency(n);
    };
    let scaled = trim_fraction(&format!("{:.2}", abs / scale));
    let sign = if n < 0.0 { "-" } else { "" };
    format!("{}${}{}", sign, scaled, suffix)
}

/// Percent of a fraction (`0.3` -> `30%`). Small values keep three decimals
/// so that e.g. an ownership stake of 0.005 reads `0.500%`.
pub fn format_percent(n: f64) -> String {
    let pct = n * 100.0;
    if n.abs() < 0.01 {
        format!("{:.3}%", pct)
    } else {
        format!("{}%", trim_fraction(&format!("{:.2}", pct)))
    }
}

/// Insert "," between each group of three integer digits
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Drop trailing zeros (and a dangling '.') from fixed-point text
fn trim_fraction(s: &str) -> String {
    if !s.contains('.') {
        return s.to_string();
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
