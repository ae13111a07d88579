//! Display formatting rules
//!
//! Money renders as the currency glyph followed by the value fixed to two
//! decimals, quantities as plain integers, dates as `DD/MM/YYYY`.

use chrono::NaiveDate;

/// Currency glyph prefixed to every monetary value.
pub const CURRENCY_SYMBOL: char = '₹';

/// Date pattern used on the invoice.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Format a monetary value, e.g. `212.4` → `₹212.40`.
pub fn format_money(value: f64) -> String {
    // Ties round away from zero; "-0.00" never appears.
    let rounded = (value * 100.0).round() / 100.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{}{:.2}", CURRENCY_SYMBOL, rounded)
}

pub fn format_quantity(quantity: u32) -> String {
    quantity.to_string()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(212.4), "₹212.40");
        assert_eq!(format_money(0.0), "₹0.00");
        assert_eq!(format_money(1234.5678), "₹1234.57");
    }

    #[test]
    fn test_format_money_rounds_half_away_from_zero() {
        assert_eq!(format_money(0.125), "₹0.13");
        assert_eq!(format_money(0.625), "₹0.63");
        assert_eq!(format_money(1.375), "₹1.38");
        assert_eq!(format_money(-0.125), "₹-0.13");
    }

    #[test]
    fn test_format_money_negative_zero() {
        assert_eq!(format_money(-0.0), "₹0.00");
        assert_eq!(format_money(-0.001), "₹0.00");
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(0), "0");
        assert_eq!(format_quantity(42), "42");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(format_date(date), "05/03/2024");
    }
}
