//! Brazilian-real number formatting for the text that action templates and
//! findings embed ("R$ 10.000,50", "35,0%").

use rust_decimal::Decimal;

/// Format a monetary amount as `R$ 1.234,56`. Negative amounts get a leading
/// minus sign before the currency symbol.
pub fn brl(value: Decimal) -> String {
    format_grouped(value, 2, "R$ ")
}

/// Format a monetary amount without cents: `R$ 1.235`.
pub fn brl_whole(value: Decimal) -> String {
    format_grouped(value, 0, "R$ ")
}

/// Format a percentage with one decimal place: `35,0%`.
pub fn percent(value: Decimal) -> String {
    format!("{}%", format_grouped(value, 1, ""))
}

/// Format a day count rounded to whole days: `45 days`.
pub fn days(value: Decimal) -> String {
    format!("{} days", format_grouped(value, 0, ""))
}

/// Format a plain ratio with two decimals: `1,35`.
pub fn ratio(value: Decimal) -> String {
    format_grouped(value, 2, "")
}

fn format_grouped(value: Decimal, dp: u32, prefix: &str) -> String {
    let rounded = value.round_dp(dp);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.*}", dp as usize, rounded.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*c);
    }

    match frac_part {
        Some(frac) => format!("{sign}{prefix}{grouped},{frac}"),
        None => format!("{sign}{prefix}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_brl_thousands_and_cents() {
        assert_eq!(brl(dec!(10000.5)), "R$ 10.000,50");
        assert_eq!(brl(dec!(1234567.891)), "R$ 1.234.567,89");
        assert_eq!(brl(dec!(0)), "R$ 0,00");
        assert_eq!(brl(dec!(999)), "R$ 999,00");
    }

    #[test]
    fn test_brl_negative() {
        assert_eq!(brl(dec!(-2500)), "-R$ 2.500,00");
        assert_eq!(brl(dec!(-0.001)), "R$ 0,00");
    }

    #[test]
    fn test_brl_whole() {
        assert_eq!(brl_whole(dec!(71428.57)), "R$ 71.429");
    }

    #[test]
    fn test_percent_and_days() {
        assert_eq!(percent(dec!(35)), "35,0%");
        assert_eq!(percent(dec!(-4.25)), "-4,2%");
        assert_eq!(days(dec!(44.6)), "45 days");
        assert_eq!(ratio(dec!(1.5)), "1,50");
    }
}
