//! Amount scaling for human-readable output.
//!
//! Scaling is applied when a number is printed, never to computed values.

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DisplayUnit {
    Raw,
    Thousand,
    /// 1e5, Indian numbering.
    Lakh,
    /// 1e7, Indian numbering.
    Crore,
    Million,
    Billion,
}

impl DisplayUnit {
    pub const fn divisor(self) -> f64 {
        match self {
            Self::Raw => 1.0,
            Self::Thousand => 1e3,
            Self::Lakh => 1e5,
            Self::Crore => 1e7,
            Self::Million => 1e6,
            Self::Billion => 1e9,
        }
    }

    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Raw => "",
            Self::Thousand => " K",
            Self::Lakh => " L",
            Self::Crore => " Cr",
            Self::Million => " M",
            Self::Billion => " B",
        }
    }

    /// Formats an amount with a currency symbol, grouping and the unit suffix.
    pub fn format_amount(self, value: f64, currency: &str) -> String {
        let scaled = value / self.divisor();
        let sign = if scaled < 0.0 { "-" } else { "" };
        format!(
            "{sign}{}{}{}",
            currency_symbol(currency),
            group_thousands(scaled.abs()),
            self.suffix()
        )
    }
}

pub fn currency_symbol(currency: &str) -> String {
    match currency {
        "INR" => String::from("₹"),
        "USD" => String::from("$"),
        "EUR" => String::from("€"),
        "GBP" => String::from("£"),
        "JPY" => String::from("¥"),
        other => format!("{other} "),
    }
}

/// `1234567.891` becomes `1,234,567.89`.
fn group_thousands(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{grouped}.{fraction}")
}
