//! Display formatters
//!
//! Pure functions from raw values to display strings, pt-BR conventions.
//! Nothing here fails: unusable input renders as [`PLACEHOLDER`].

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

/// Rendered for missing or unparseable values
pub const PLACEHOLDER: &str = "-";

/// Outcome of a formatter before it reaches the boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formatted {
    Value(String),
    Invalid,
}

impl Formatted {
    pub fn is_valid(&self) -> bool {
        matches!(self, Formatted::Value(_))
    }
}

impl fmt::Display for Formatted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formatted::Value(s) => f.write_str(s),
            Formatted::Invalid => f.write_str(PLACEHOLDER),
        }
    }
}

impl From<Option<String>> for Formatted {
    fn from(value: Option<String>) -> Self {
        value.map_or(Formatted::Invalid, Formatted::Value)
    }
}

/// Separators and currency symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberLocale {
    pub decimal_separator: char,
    pub group_separator: char,
    pub currency_symbol: String,
}

impl NumberLocale {
    pub fn pt_br() -> Self {
        Self {
            decimal_separator: ',',
            group_separator: '.',
            currency_symbol: "R$".to_string(),
        }
    }
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self::pt_br()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub locale: NumberLocale,
    pub show_symbol: bool,
    pub decimals: usize,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            locale: NumberLocale::default(),
            show_symbol: true,
            decimals: 2,
        }
    }
}

impl CurrencyFormat {
    pub fn without_symbol() -> Self {
        Self {
            show_symbol: false,
            ..Self::default()
        }
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

// ties round away from zero
fn round_half_away(magnitude: f64, decimals: usize) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    let rounded = (magnitude * scale).round() / scale;
    if rounded.is_finite() {
        rounded
    } else {
        magnitude
    }
}

/// Fixed-point with grouping; returns (is_negative, magnitude)
fn fixed(value: f64, decimals: usize, locale: &NumberLocale) -> Option<(bool, String)> {
    if !value.is_finite() {
        return None;
    }
    let text = format!("{:.*}", decimals, round_half_away(value.abs(), decimals));
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = group_digits(int_part, locale.group_separator);
    if let Some(frac) = frac_part {
        out.push(locale.decimal_separator);
        out.push_str(frac);
    }

    // no "-0,00"
    let negative = value < 0.0 && text.chars().any(|c| c.is_ascii_digit() && c != '0');
    Some((negative, out))
}

pub fn currency(value: f64, format: &CurrencyFormat) -> Formatted {
    fixed(value, format.decimals, &format.locale)
        .map(|(negative, amount)| {
            let sign = if negative { "-" } else { "" };
            if format.show_symbol {
                format!("{}{} {}", sign, format.locale.currency_symbol, amount)
            } else {
                format!("{}{}", sign, amount)
            }
        })
        .into()
}

/// `1234.5` → `"R$ 1.234,50"`
pub fn format_currency(value: f64) -> String {
    currency(value, &CurrencyFormat::default()).to_string()
}

pub fn format_currency_with(value: f64, format: &CurrencyFormat) -> String {
    currency(value, format).to_string()
}

pub fn format_currency_opt(value: Option<f64>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), format_currency)
}

/// Accepts `"1234.5"`, `"1.234,50"` and `"R$ 1.234,50"`
pub fn parse_amount(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn format_currency_str(text: &str) -> String {
    format_currency_opt(parse_amount(text))
}

/// Value already in percent units: `12.5` → `"12,50%"`
pub fn format_percent(value: f64, decimals: usize) -> String {
    let formatted: Formatted = fixed(value, decimals, &NumberLocale::default())
        .map(|(negative, amount)| format!("{}{}%", if negative { "-" } else { "" }, amount))
        .into();
    formatted.to_string()
}

/// Anything that can be shown as a calendar date
pub trait DateInput {
    fn to_datetime(&self) -> Option<NaiveDateTime>;
}

const DATETIME_PATTERNS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_PATTERNS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

impl DateInput for str {
    fn to_datetime(&self) -> Option<NaiveDateTime> {
        let text = self.trim();
        if text.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(dt.naive_local());
        }
        DATETIME_PATTERNS
            .iter()
            .find_map(|p| NaiveDateTime::parse_from_str(text, p).ok())
            .or_else(|| {
                // date-only strings are calendar dates, never shifted by a timezone
                DATE_PATTERNS
                    .iter()
                    .find_map(|p| NaiveDate::parse_from_str(text, p).ok())
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }
}

impl DateInput for String {
    fn to_datetime(&self) -> Option<NaiveDateTime> {
        self.as_str().to_datetime()
    }
}

impl DateInput for NaiveDate {
    fn to_datetime(&self) -> Option<NaiveDateTime> {
        self.and_hms_opt(0, 0, 0)
    }
}

impl DateInput for NaiveDateTime {
    fn to_datetime(&self) -> Option<NaiveDateTime> {
        Some(*self)
    }
}

impl<Tz: TimeZone> DateInput for DateTime<Tz> {
    fn to_datetime(&self) -> Option<NaiveDateTime> {
        Some(self.naive_local())
    }
}

impl<T: DateInput + ?Sized> DateInput for &T {
    fn to_datetime(&self) -> Option<NaiveDateTime> {
        (**self).to_datetime()
    }
}

impl<T: DateInput> DateInput for Option<T> {
    fn to_datetime(&self) -> Option<NaiveDateTime> {
        self.as_ref().and_then(|v| v.to_datetime())
    }
}

pub fn date<D: DateInput + ?Sized>(value: &D, with_time: bool) -> Formatted {
    let pattern = if with_time { "%d/%m/%Y %H:%M" } else { "%d/%m/%Y" };
    value
        .to_datetime()
        .map(|dt| dt.format(pattern).to_string())
        .into()
}

/// `"2024-03-05"` → `"05/03/2024"`; with time → `"05/03/2024 14:30"`
pub fn format_date<D: DateInput + ?Sized>(value: &D, with_time: bool) -> String {
    date(value, with_time).to_string()
}

/// CPF (11 digits) or CNPJ (14 digits); other lengths are returned unchanged
pub fn tax_id(value: &str) -> Formatted {
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    let formatted = match digits.len() {
        0 => return Formatted::Invalid,
        11 => format!(
            "{}.{}.{}-{}",
            &digits[0..3],
            &digits[3..6],
            &digits[6..9],
            &digits[9..11]
        ),
        14 => format!(
            "{}.{}.{}/{}-{}",
            &digits[0..2],
            &digits[2..5],
            &digits[5..8],
            &digits[8..12],
            &digits[12..14]
        ),
        _ => value.to_string(),
    };
    Formatted::Value(formatted)
}

pub fn format_tax_id(value: &str) -> String {
    tax_id(value).to_string()
}

pub fn format_tax_id_opt(value: Option<&str>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), format_tax_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_currency() {
        assert_eq!(format_currency(1234.5), "R$ 1.234,50");
        assert_eq!(format_currency(0.0), "R$ 0,00");
        assert_eq!(format_currency(1_234_567.891), "R$ 1.234.567,89");
        assert_eq!(format_currency(999.999), "R$ 1.000,00");
        assert_eq!(format_currency(-42.1), "-R$ 42,10");
        assert_eq!(format_currency(-0.001), "R$ 0,00");
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        assert_eq!(format_currency(0.125), "R$ 0,13");
        assert_eq!(format_currency(-0.125), "-R$ 0,13");
        assert_eq!(format_currency(2.5), "R$ 2,50");
        assert_eq!(format_percent(2.5, 0), "3%");
        assert_eq!(format_percent(0.5, 0), "1%");
        assert_eq!(format_percent(-2.5, 0), "-3%");
    }

    #[test]
    fn test_currency_invalid() {
        assert_eq!(format_currency(f64::NAN), "-");
        assert_eq!(format_currency(f64::INFINITY), "-");
        assert_eq!(format_currency_opt(None), "-");
        assert_eq!(currency(f64::NAN, &CurrencyFormat::default()), Formatted::Invalid);
    }

    #[test]
    fn test_currency_without_symbol() {
        let format = CurrencyFormat::without_symbol();
        assert_eq!(format_currency_with(1234.5, &format), "1.234,50");
        assert_eq!(format_currency_with(-5.0, &format), "-5,00");
    }

    #[test]
    fn test_currency_from_text() {
        assert_eq!(format_currency_str("1234.5"), "R$ 1.234,50");
        assert_eq!(format_currency_str("1.234,50"), "R$ 1.234,50");
        assert_eq!(format_currency_str("R$ 10,00"), "R$ 10,00");
        assert_eq!(format_currency_str("abc"), "-");
        assert_eq!(format_currency_str(""), "-");
    }

    #[test]
    fn test_percent() {
        assert_eq!(format_percent(12.5, 2), "12,50%");
        assert_eq!(format_percent(100.0, 0), "100%");
        assert_eq!(format_percent(-3.26, 1), "-3,3%");
        assert_eq!(format_percent(f64::NAN, 2), "-");
    }

    #[test]
    fn test_date_from_strings() {
        assert_eq!(format_date("2024-03-05", false), "05/03/2024");
        assert_eq!(format_date("2024-03-05", true), "05/03/2024 00:00");
        assert_eq!(format_date("2024-03-05T14:30:15", true), "05/03/2024 14:30");
        assert_eq!(format_date("2024-03-05T14:30", true), "05/03/2024 14:30");
        assert_eq!(format_date("2024-03-05T23:10:00-03:00", true), "05/03/2024 23:10");
        assert_eq!(format_date("05/03/2024", false), "05/03/2024");
    }

    #[test]
    fn test_date_invalid() {
        assert_eq!(format_date("", false), "-");
        assert_eq!(format_date("not a date", false), "-");
        assert_eq!(format_date("2024-02-30", false), "-");
        assert_eq!(format_date(&None::<NaiveDate>, false), "-");
    }

    #[test]
    fn test_date_from_chrono_types() {
        let day = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert_eq!(format_date(&day, false), "31/12/2023");
        assert_eq!(format_date(&Some(day), false), "31/12/2023");

        let moment = day.and_hms_opt(8, 5, 0).unwrap();
        assert_eq!(format_date(&moment, true), "31/12/2023 08:05");

        let utc = Utc.from_utc_datetime(&moment);
        assert_eq!(format_date(&utc, true), "31/12/2023 08:05");

        let brt = FixedOffset::west_opt(3 * 3600).unwrap();
        assert_eq!(format_date(&utc.with_timezone(&brt), true), "31/12/2023 05:05");
    }

    #[test]
    fn test_tax_id() {
        assert_eq!(format_tax_id("12345678901"), "123.456.789-01");
        assert_eq!(format_tax_id("123.456.789-01"), "123.456.789-01");
        assert_eq!(format_tax_id("12345678000195"), "12.345.678/0001-95");
        assert_eq!(format_tax_id("12345"), "12345");
        assert_eq!(format_tax_id(""), "-");
        assert_eq!(format_tax_id("abc"), "-");
        assert_eq!(format_tax_id_opt(None), "-");
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits("1", '.'), "1");
        assert_eq!(group_digits("123", '.'), "123");
        assert_eq!(group_digits("1234", '.'), "1.234");
        assert_eq!(group_digits("1234567", '.'), "1.234.567");
    }
}
