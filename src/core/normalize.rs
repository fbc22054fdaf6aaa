//! Turns raw catalog rows into typed [`Fund`] records.
//!
//! Every function here is total: malformed or missing input resolves to a
//! documented default instead of an error.

use super::fund::{Fund, RiskLevel};
use std::collections::HashMap;

/// One source row, keyed by header name.
pub type RawRow<'a> = HashMap<&'a str, &'a str>;

/// Source column names.
pub mod columns {
    pub const ISIN: &str = "ISIN";
    pub const NAME: &str = "Nombre";
    pub const CURRENCY: &str = "Divisa";
    pub const CATEGORY: &str = "Categoria Singular Bank";
    pub const SUBCATEGORY: &str = "Categoría Morningstar";
    pub const MANAGEMENT_FEE: &str = "Comisión Gestión";
    pub const SUCCESS_FEE: &str = "Comisión Exito";
    pub const MIN_INVESTMENT: &str = "Mínimo Inicial";
    pub const AUM: &str = "Patrimonio";
    pub const YTD_RETURN: &str = "Rent YTD";
    pub const ONE_YEAR_RETURN: &str = "Rent 12M";
    pub const THREE_YEAR_RETURN: &str = "Rent 36M";
    pub const FIVE_YEAR_RETURN: &str = "Rent 60M";
    pub const MANAGEMENT_COMPANY: &str = "Gestora / Emisor";
    pub const FACTSHEET_URL: &str = "URL Ficha Comercial";
    pub const KIID_URL: &str = "URL KID PRIIPS";
    pub const RISK_INDICATOR: &str = "REQ";
    pub const MORNINGSTAR_RATING: &str = "Morningstar Rating";
    pub const IMPLICIT_ADVISORY: &str = "Disponible para asesoramiento con cobro implícito";
}

/// Marker the source uses for advisory-eligible share classes.
pub const ADVISORY_MARKER: &str = "Y";

/// Parses a locale-formatted figure such as `"12,5 %"`.
///
/// The first comma becomes the decimal point, then everything except digits,
/// `.`, `-` and exponent markers is dropped and the longest valid float prefix
/// is parsed. Grouping periods are not recognised: `"1.234,56"` reads as
/// `1.234`. Downstream consumers depend on that exact output.
pub fn parse_numeric(value: Option<&str>) -> f64 {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return 0.0;
    };

    let cleaned: String = value
        .replacen(',', ".", 1)
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | 'e' | 'E'))
        .collect();

    match float_prefix(&cleaned).parse::<f64>() {
        // Normalises -0.0 as well
        Ok(v) if v.is_finite() && v != 0.0 => v,
        _ => 0.0,
    }
}

/// Longest prefix of `s` that is a decimal float literal.
fn float_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = if bytes.first() == Some(&b'-') { 1 } else { 0 };
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if frac_end > end + 1 {
            mantissa_digits += frac_end - (end + 1);
            end = frac_end;
        }
    }

    if mantissa_digits == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(bytes.get(end + 1) == Some(&b'-'));
        let exp_start = end + 1 + sign;
        let exp_end = digits_from(exp_start);
        if exp_end > exp_start {
            end = exp_end;
        }
    }

    &s[..end]
}

/// Integer parse that reads a leading run of digits and ignores the rest,
/// e.g. `"45abc"` is 45 and `"4.5"` is 4.
pub fn parse_integer(value: Option<&str>) -> Option<i64> {
    let s = value?.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let magnitude = rest[..digits].parse::<i64>().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Risk band of a raw indicator field. Unparsable input counts as 0.
pub fn risk_band(value: Option<&str>) -> RiskLevel {
    RiskLevel::from_indicator(parse_integer(value).unwrap_or(0))
}

pub fn parse_rating(value: Option<&str>) -> i64 {
    parse_integer(value).unwrap_or(0)
}

pub fn is_advisory_eligible(value: Option<&str>) -> bool {
    value == Some(ADVISORY_MARKER)
}

/// Builds a [`Fund`] from one raw row. Never fails.
pub fn normalize_row(row: &RawRow<'_>) -> Fund {
    let field = |column: &str| row.get(column).copied();
    let text = |column: &str| field(column).unwrap_or_default().to_string();

    Fund {
        isin: text(columns::ISIN),
        name: text(columns::NAME),
        currency: text(columns::CURRENCY),
        category: text(columns::CATEGORY),
        subcategory: text(columns::SUBCATEGORY),
        management_fee: parse_numeric(field(columns::MANAGEMENT_FEE)),
        success_fee: parse_numeric(field(columns::SUCCESS_FEE)),
        min_investment: parse_numeric(field(columns::MIN_INVESTMENT)),
        min_investment_currency: text(columns::CURRENCY),
        aum: text(columns::AUM),
        ytd_return: parse_numeric(field(columns::YTD_RETURN)),
        one_year_return: parse_numeric(field(columns::ONE_YEAR_RETURN)),
        three_year_return: parse_numeric(field(columns::THREE_YEAR_RETURN)),
        five_year_return: parse_numeric(field(columns::FIVE_YEAR_RETURN)),
        management_company: text(columns::MANAGEMENT_COMPANY),
        factsheet_url: text(columns::FACTSHEET_URL),
        kiid_url: text(columns::KIID_URL),
        risk_level: risk_band(field(columns::RISK_INDICATOR)),
        morningstar_rating: parse_rating(field(columns::MORNINGSTAR_RATING)),
        available_for_implicit_advisory: is_advisory_eligible(field(columns::IMPLICIT_ADVISORY)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric_defaults() {
        assert_eq!(parse_numeric(None), 0.0);
        assert_eq!(parse_numeric(Some("")), 0.0);
        assert_eq!(parse_numeric(Some("n/a")), 0.0);
        assert_eq!(parse_numeric(Some("-")), 0.0);
        assert_eq!(parse_numeric(Some("-0")), 0.0);
        assert!(parse_numeric(Some("-0")).is_sign_positive());
    }

    #[test]
    fn test_parse_numeric_decimal_comma() {
        assert_eq!(parse_numeric(Some("1,25")), 1.25);
        assert_eq!(parse_numeric(Some("12,5 %")), 12.5);
        assert_eq!(parse_numeric(Some("-3,75%")), -3.75);
        assert_eq!(parse_numeric(Some("1000 EUR")), 1000.0);
        assert_eq!(parse_numeric(Some("0.8")), 0.8);
    }

    #[test]
    fn test_parse_numeric_grouping_periods_truncate() {
        // Only the first comma is substituted and grouping dots are kept
        assert_eq!(parse_numeric(Some("1.234,56")), 1.234);
        assert_eq!(parse_numeric(Some("1,234,56")), 1.23456);
        assert_eq!(parse_numeric(Some("1-2")), 1.0);
    }

    #[test]
    fn test_parse_numeric_exponent() {
        assert_eq!(parse_numeric(Some("1,5e2")), 150.0);
        assert_eq!(parse_numeric(Some("2e")), 2.0);
        assert_eq!(parse_numeric(Some("1e999")), 0.0);
    }

    #[test]
    fn test_parse_numeric_is_finite_and_non_negative_without_minus() {
        let samples = [
            "", "abc", "1.2.3", "9,99", "€ 1.000", "e5", ".5", "5.", "1e308", "1e309", "..", "0,0",
            "12,34,56 %", "3 stars",
        ];
        for s in samples {
            let v = parse_numeric(Some(s));
            assert!(v.is_finite(), "{s} -> {v}");
            assert!(v >= 0.0, "{s} -> {v}");
        }
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer(Some("45")), Some(45));
        assert_eq!(parse_integer(Some("  45abc")), Some(45));
        assert_eq!(parse_integer(Some("4.5")), Some(4));
        assert_eq!(parse_integer(Some("-5")), Some(-5));
        assert_eq!(parse_integer(Some("+7")), Some(7));
        assert_eq!(parse_integer(Some("abc")), None);
        assert_eq!(parse_integer(Some("")), None);
        assert_eq!(parse_integer(None), None);
    }

    #[test]
    fn test_risk_band_from_text() {
        assert_eq!(risk_band(Some("0")), RiskLevel::Unrated);
        assert_eq!(risk_band(Some("20")), RiskLevel::Low);
        assert_eq!(risk_band(Some("21")), RiskLevel::Moderate);
        assert_eq!(risk_band(Some("60")), RiskLevel::MediumHigh);
        assert_eq!(risk_band(Some("61")), RiskLevel::High);
        assert_eq!(risk_band(Some("99")), RiskLevel::VeryHigh);
        assert_eq!(risk_band(Some("100")), RiskLevel::Unrated);
        assert_eq!(risk_band(Some("-5")), RiskLevel::Unrated);
        assert_eq!(risk_band(Some("n/a")), RiskLevel::Unrated);
        assert_eq!(risk_band(None), RiskLevel::Unrated);
    }

    #[test]
    fn test_rating_is_not_clamped() {
        assert_eq!(parse_rating(Some("4")), 4);
        assert_eq!(parse_rating(Some("")), 0);
        assert_eq!(parse_rating(Some("7")), 7);
    }

    #[test]
    fn test_eligibility_requires_exact_marker() {
        assert!(is_advisory_eligible(Some("Y")));
        assert!(!is_advisory_eligible(Some("y")));
        assert!(!is_advisory_eligible(Some("Yes")));
        assert!(!is_advisory_eligible(Some(" Y")));
        assert!(!is_advisory_eligible(Some("N")));
        assert!(!is_advisory_eligible(None));
    }

    #[test]
    fn test_normalize_row() {
        let row: RawRow = HashMap::from([
            (columns::ISIN, "LU1223083327"),
            (columns::NAME, "Global Equity A"),
            (columns::CURRENCY, "EUR"),
            (columns::CATEGORY, "RV Global"),
            (columns::MANAGEMENT_FEE, "1,50%"),
            (columns::YTD_RETURN, "-2,3"),
            (columns::AUM, "1.200 M"),
            (columns::RISK_INDICATOR, "45"),
            (columns::MORNINGSTAR_RATING, "4"),
            (columns::IMPLICIT_ADVISORY, "Y"),
        ]);

        let fund = normalize_row(&row);
        assert_eq!(fund.isin, "LU1223083327");
        assert_eq!(fund.name, "Global Equity A");
        assert_eq!(fund.currency, "EUR");
        assert_eq!(fund.min_investment_currency, "EUR");
        assert_eq!(fund.category, "RV Global");
        assert_eq!(fund.subcategory, "");
        assert_eq!(fund.management_fee, 1.5);
        assert_eq!(fund.success_fee, 0.0);
        assert_eq!(fund.ytd_return, -2.3);
        assert_eq!(fund.aum, "1.200 M");
        assert_eq!(fund.risk_level, RiskLevel::MediumHigh);
        assert_eq!(fund.morningstar_rating, 4);
        assert!(fund.available_for_implicit_advisory);
    }

    #[test]
    fn test_normalize_empty_row() {
        let fund = normalize_row(&RawRow::new());
        assert_eq!(fund.isin, "");
        assert_eq!(fund.five_year_return, 0.0);
        assert_eq!(fund.risk_level, RiskLevel::Unrated);
        assert_eq!(fund.morningstar_rating, 0);
        assert!(!fund.available_for_implicit_advisory);
    }
}
