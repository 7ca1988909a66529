//! Number formatting shared by the dashboard and the CLI.

/// `₹1,234.56`; negative amounts as `-₹1,234.56`.
pub fn format_inr(amount: f64) -> String {
    if !amount.is_finite() {
        return "—".to_string();
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}₹{}.{}", sign, grouped, cents)
}

/// `12.3%`
pub fn format_pct(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Signed, for day-over-day moves: `+1.2%`, `-0.4%`.
pub fn format_change_pct(value: f64) -> String {
    format!("{:+.1}%", value)
}

pub fn format_volatility(value: f64) -> String {
    format!("{:.2}", value)
}

/// Cuts `text` to at most `max` characters, marking the cut with `…`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
