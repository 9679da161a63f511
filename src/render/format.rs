//! Locale-aware number, currency and date formatting.

use chrono::{DateTime, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use super::helpers::parse_number;

const NBSP: &str = "\u{a0}";

/// Maximum fractional digits of numbers and amounts.
pub const MAX_FRACTION_DIGITS: u32 = 4;

/// Where the currency symbol goes relative to the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPosition {
    Prefix,
    Suffix,
}

/// Date layout of a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// `2024. 06. 15.`
    YearMonthDayDotted,
    /// `6/15/2024`
    MonthDayYear,
    /// `15.6.2024`
    DayMonthYear,
    /// `2024/6/15`
    YearMonthDaySlashed,
}

/// Number and date conventions of a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleFormat {
    pub decimal_separator: char,
    pub group_separator: &'static str,
    pub symbol_position: SymbolPosition,
    pub date_style: DateStyle,
}

impl LocaleFormat {
    pub const HUNGARIAN: Self = Self {
        decimal_separator: ',',
        group_separator: NBSP,
        symbol_position: SymbolPosition::Suffix,
        date_style: DateStyle::YearMonthDayDotted,
    };

    pub const ENGLISH: Self = Self {
        decimal_separator: '.',
        group_separator: ",",
        symbol_position: SymbolPosition::Prefix,
        date_style: DateStyle::MonthDayYear,
    };

    pub const GERMAN: Self = Self {
        decimal_separator: ',',
        group_separator: ".",
        symbol_position: SymbolPosition::Suffix,
        date_style: DateStyle::DayMonthYear,
    };

    pub const CHINESE: Self = Self {
        decimal_separator: '.',
        group_separator: ",",
        symbol_position: SymbolPosition::Prefix,
        date_style: DateStyle::YearMonthDaySlashed,
    };

    /// Conventions for a locale code such as `hu`, `de-AT` or `zh_CN`.
    /// Unknown languages use English conventions.
    pub fn for_locale(locale: &str) -> Self {
        let language = locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "hu" => Self::HUNGARIAN,
            "de" => Self::GERMAN,
            "zh" | "cn" => Self::CHINESE,
            _ => Self::ENGLISH,
        }
    }

    /// Format `value` rounded half away from zero to at most `max_fraction`
    /// digits, with trailing zeros trimmed down to `min_fraction` digits.
    pub fn decimal(&self, value: Decimal, min_fraction: u32, max_fraction: u32) -> String {
        let rounded = value
            .round_dp_with_strategy(max_fraction, RoundingStrategy::MidpointAwayFromZero)
            .normalize();
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let digits = rounded.abs().to_string();
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((&digits, ""));

        let mut out = String::with_capacity(digits.len() + 8);
        if negative {
            out.push('-');
        }
        out.push_str(&group_digits(int_part, self.group_separator));

        let mut fraction = frac_part.to_string();
        while fraction.len() < min_fraction as usize {
            fraction.push('0');
        }
        if !fraction.is_empty() {
            out.push(self.decimal_separator);
            out.push_str(&fraction);
        }
        out
    }

    /// Plain number with 0–4 fractional digits.
    ///
    /// Absent input is empty; non-numeric input is returned unchanged.
    pub fn number(&self, value: Option<&str>) -> String {
        let Some(text) = value else {
            return String::new();
        };
        match parse_number(text) {
            Some(number) => self.decimal(number, 0, MAX_FRACTION_DIGITS),
            None => text.to_string(),
        }
    }

    /// Amount in `currency_code`.
    ///
    /// Forint amounts have no fractional digits; other currencies show up to
    /// four, trailing zeros trimmed.
    pub fn currency(&self, value: Option<&str>, currency_code: &str) -> String {
        let Some(text) = value else {
            return String::new();
        };
        let Some(number) = parse_number(text) else {
            return text.to_string();
        };
        let max_fraction = if currency_code == "HUF" {
            0
        } else {
            MAX_FRACTION_DIGITS
        };
        let amount = self.decimal(number.abs(), 0, max_fraction);
        let sign = if number.is_sign_negative() && amount.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
            "-"
        } else {
            ""
        };
        match (currency_symbol(currency_code), self.symbol_position) {
            (Some(symbol), SymbolPosition::Prefix) => format!("{sign}{symbol}{amount}"),
            (None, SymbolPosition::Prefix) => format!("{sign}{currency_code}{NBSP}{amount}"),
            (symbol, SymbolPosition::Suffix) => {
                format!("{sign}{amount}{NBSP}{}", symbol.unwrap_or(currency_code))
            }
        }
    }

    /// Date part of an ISO date or timestamp.
    ///
    /// Absent or blank input is empty; unparseable input is returned
    /// unchanged.
    pub fn date(&self, value: Option<&str>) -> String {
        let Some(text) = value.map(str::trim).filter(|s| !s.is_empty()) else {
            return String::new();
        };
        let Some(date) = parse_date(text) else {
            return text.to_string();
        };
        let pattern = match self.date_style {
            DateStyle::YearMonthDayDotted => "%Y. %m. %d.",
            DateStyle::MonthDayYear => "%-m/%-d/%Y",
            DateStyle::DayMonthYear => "%-d.%-m.%Y",
            DateStyle::YearMonthDaySlashed => "%Y/%-m/%-d",
        };
        date.format(pattern).to_string()
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.date_naive());
    }
    // Timestamps without offset, e.g. 2024-06-15T10:00:00.
    text.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "HUF" => Some("Ft"),
        "EUR" => Some("€"),
        "USD" => Some("$"),
        "GBP" => Some("£"),
        "CNY" => Some("¥"),
        _ => None,
    }
}

fn group_digits(int_part: &str, separator: &str) -> String {
    let len = int_part.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(digit);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn locale_lookup_uses_language() {
        assert_eq!(LocaleFormat::for_locale("hu"), LocaleFormat::HUNGARIAN);
        assert_eq!(LocaleFormat::for_locale("de-AT"), LocaleFormat::GERMAN);
        assert_eq!(LocaleFormat::for_locale("ZH_cn"), LocaleFormat::CHINESE);
        assert_eq!(LocaleFormat::for_locale("cn"), LocaleFormat::CHINESE);
        assert_eq!(LocaleFormat::for_locale("xx"), LocaleFormat::ENGLISH);
        assert_eq!(LocaleFormat::for_locale(""), LocaleFormat::ENGLISH);
    }

    #[test]
    fn decimal_rounding_and_trimming() {
        let en = LocaleFormat::ENGLISH;
        assert_eq!(en.decimal(dec!(1234567.891), 0, 4), "1,234,567.891");
        assert_eq!(en.decimal(dec!(1.23456), 0, 4), "1.2346");
        assert_eq!(en.decimal(dec!(2.50000), 0, 4), "2.5");
        assert_eq!(en.decimal(dec!(0.00004), 0, 4), "0");
        assert_eq!(en.decimal(dec!(-0.00004), 0, 4), "0");
        assert_eq!(en.decimal(dec!(-1000), 0, 4), "-1,000");
        assert_eq!(en.decimal(dec!(12.5), 2, 4), "12.50");
        assert_eq!(en.decimal(dec!(0.5), 0, 0), "1");
    }

    #[test]
    fn number_per_locale() {
        assert_eq!(LocaleFormat::HUNGARIAN.number(Some("1234.5")), "1\u{a0}234,5");
        assert_eq!(LocaleFormat::GERMAN.number(Some("1234.5")), "1.234,5");
        assert_eq!(LocaleFormat::ENGLISH.number(Some("27")), "27");
        assert_eq!(LocaleFormat::ENGLISH.number(Some("0.27000")), "0.27");
        assert_eq!(LocaleFormat::ENGLISH.number(None), "");
        assert_eq!(LocaleFormat::ENGLISH.number(Some("n/a")), "n/a");
    }

    #[test]
    fn currency_per_code() {
        let hu = LocaleFormat::HUNGARIAN;
        assert_eq!(hu.currency(Some("12500.6"), "HUF"), "12\u{a0}501\u{a0}Ft");
        assert_eq!(hu.currency(Some("99.5"), "EUR"), "99,5\u{a0}€");
        let en = LocaleFormat::ENGLISH;
        assert_eq!(en.currency(Some("1234.5678"), "EUR"), "€1,234.5678");
        assert_eq!(en.currency(Some("-20"), "USD"), "-$20");
        assert_eq!(en.currency(Some("10"), "CHF"), "CHF\u{a0}10");
        assert_eq!(en.currency(Some("-0.2"), "HUF"), "Ft0");
        assert_eq!(en.currency(None, "HUF"), "");
    }

    #[test]
    fn dates_per_locale() {
        let date = Some("2024-06-05");
        assert_eq!(LocaleFormat::HUNGARIAN.date(date), "2024. 06. 05.");
        assert_eq!(LocaleFormat::ENGLISH.date(date), "6/5/2024");
        assert_eq!(LocaleFormat::GERMAN.date(date), "5.6.2024");
        assert_eq!(LocaleFormat::CHINESE.date(date), "2024/6/5");
        assert_eq!(
            LocaleFormat::ENGLISH.date(Some("2024-06-05T23:30:00+02:00")),
            "6/5/2024"
        );
        assert_eq!(LocaleFormat::ENGLISH.date(Some("2024-06-05T10:00:00")), "6/5/2024");
        assert_eq!(LocaleFormat::ENGLISH.date(None), "");
        assert_eq!(LocaleFormat::ENGLISH.date(Some("  ")), "");
        assert_eq!(LocaleFormat::ENGLISH.date(Some("soon")), "soon");
    }
}
