//! Locale-aware number and byte formatting.

use crate::config::ReportConfig;

/// Unit prefixes for byte scaling, powers of 1024.
const PREFIXES: [&str; 11] = ["", "K", "M", "G", "T", "P", "E", "Z", "Y", "R", "Q"];

/// Decimal point and thousands separator used for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    pub dec_point: String,
    pub thousands_sep: String,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            dec_point: ".".to_string(),
            thousands_sep: " ".to_string(),
        }
    }
}

impl NumberFormat {
    pub fn new(dec_point: &str, thousands_sep: &str) -> Self {
        Self {
            dec_point: dec_point.to_string(),
            thousands_sep: thousands_sep.to_string(),
        }
    }

    pub fn from_config(cfg: &ReportConfig) -> Self {
        Self::new(&cfg.dec_point, &cfg.thousands_sep)
    }

    /// Format with exactly `decimals` fraction digits and grouped thousands.
    pub fn num_format(&self, number: f64, decimals: usize) -> String {
        self.format(number, decimals, false)
    }

    /// Format a byte count scaled to the largest unit below 1024.
    ///
    /// Up to `decimals` fraction digits are kept, trailing zeros dropped.
    /// Unscaled values read `Bytes`, scaled ones `KB`, `MB`, ...
    pub fn byte_format(&self, bytes: u64, decimals: usize) -> String {
        if bytes == 0 {
            return "0 Bytes".to_string();
        }

        let mut value = bytes as f64;
        let mut i = 0;
        while value >= 1024.0 && i < PREFIXES.len() - 1 {
            value /= 1024.0;
            i += 1;
        }

        let unit = if i == 0 {
            "Bytes".to_string()
        } else {
            format!("{}B", PREFIXES[i])
        };
        format!("{} {}", self.format(value, decimals, true), unit)
    }

    fn format(&self, number: f64, decimals: usize, trim_zeros: bool) -> String {
        let fixed = format!("{:.*}", decimals, number.abs());
        let (int_part, frac_part) = match fixed.split_once('.') {
            Some((i, f)) => (i, f),
            None => (fixed.as_str(), ""),
        };
        let frac_part = if trim_zeros {
            frac_part.trim_end_matches('0')
        } else {
            frac_part
        };

        let mut out = String::with_capacity(fixed.len() + 8);
        if number < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
            out.push('-');
        }
        out.push_str(&group_thousands(int_part, &self.thousands_sep));
        if !frac_part.is_empty() {
            out.push_str(&self.dec_point);
            out.push_str(frac_part);
        }
        out
    }
}

/// Insert `sep` between groups of three digits.
fn group_thousands(digits: &str, sep: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * sep.len());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(sep);
        }
        out.push(c);
    }
    out
}
