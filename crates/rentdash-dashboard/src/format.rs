//! Display formatting for amounts, dates and sizes.

use chrono::{DateTime, Utc};

/// Naira with thousands separators; kobo shown only when non-zero.
pub fn naira(amount: f64) -> String {
    if !amount.is_finite() {
        return "₦—".to_string();
    }
    let kobo = (amount.abs() * 100.0).round() as u64;
    let (whole, frac) = (kobo / 100, kobo % 100);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if amount < 0.0 && kobo > 0 { "-" } else { "" };
    if frac == 0 {
        format!("{sign}₦{grouped}")
    } else {
        format!("{sign}₦{grouped}.{frac:02}")
    }
}

pub fn percent(p: f64) -> String {
    if p.fract() == 0.0 {
        format!("{p:.0}%")
    } else {
        format!("{p:.1}%")
    }
}

pub fn short_date(at: Option<&DateTime<Utc>>) -> String {
    at.map(|t| t.format("%d %b %Y").to_string())
        .unwrap_or_else(|| "—".to_string())
}

pub fn file_size(b: usize) -> String {
    if b >= 1_048_576 {
        format!("{:.1} MB", b as f64 / 1_048_576.0)
    } else if b >= 1024 {
        format!("{:.0} KB", b as f64 / 1024.0)
    } else {
        format!("{b} B")
    }
}
