use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::TrackerError;

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("INR")
    }
}

/// How integer digits are split into groups.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GroupingStyle {
    /// Groups of three: `1,234,567`.
    Western,
    /// Last three digits, then pairs: `12,34,567`.
    Indian,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SymbolPosition {
    Prefix,
    Suffix,
}

/// Locale-aware formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub grouping: GroupingStyle,
    pub symbol_position: SymbolPosition,
}

impl LocaleConfig {
    /// Looks up one of the bundled locale presets.
    pub fn for_tag(tag: &str) -> Option<LocaleConfig> {
        LOCALES.get(tag.trim()).cloned()
    }

    pub fn known_tags() -> Vec<&'static str> {
        let mut tags: Vec<_> = LOCALES.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    fn preset(
        tag: &str,
        decimal_separator: char,
        grouping_separator: char,
        grouping: GroupingStyle,
        symbol_position: SymbolPosition,
    ) -> Self {
        Self {
            language_tag: tag.into(),
            decimal_separator,
            grouping_separator,
            grouping,
            symbol_position,
        }
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self::preset("en-IN", '.', ',', GroupingStyle::Indian, SymbolPosition::Prefix)
    }
}

static LOCALES: Lazy<HashMap<&'static str, LocaleConfig>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert("en-IN", LocaleConfig::default());
    map.insert(
        "en-US",
        LocaleConfig::preset("en-US", '.', ',', GroupingStyle::Western, SymbolPosition::Prefix),
    );
    map.insert(
        "en-GB",
        LocaleConfig::preset("en-GB", '.', ',', GroupingStyle::Western, SymbolPosition::Prefix),
    );
    map.insert(
        "de-DE",
        LocaleConfig::preset("de-DE", ',', '.', GroupingStyle::Western, SymbolPosition::Suffix),
    );
    map
});

pub fn symbol_for(code: &str) -> String {
    match code {
        "INR" => "₹".into(),
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        _ => format!("{} ", code),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

pub fn format_number(locale: &LocaleConfig, value: f64, precision: u8) -> String {
    let body = format!(
        "{:.*}",
        precision as usize,
        round_half_away(value.abs(), precision)
    );
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (body.as_str(), None),
    };
    let mut out = group_digits(int_part, locale.grouping_separator, locale.grouping);
    if let Some(frac) = frac_part {
        out.push(locale.decimal_separator);
        out.push_str(frac);
    }
    if value < 0.0 {
        out.insert(0, '-');
    }
    out
}

/// Ties round away from zero; `{:.*}` alone would round them to even.
fn round_half_away(value: f64, precision: u8) -> f64 {
    let factor = 10f64.powi(i32::from(precision));
    let scaled = value * factor;
    if !scaled.is_finite() || scaled.fract() == 0.0 {
        return value;
    }
    scaled.round() / factor
}

fn group_digits(digits: &str, separator: char, style: GroupingStyle) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut groups: Vec<String> = Vec::new();
    let mut end = chars.len();
    let mut width = 3;
    while end > 0 {
        let start = end.saturating_sub(width);
        groups.push(chars[start..end].iter().collect());
        end = start;
        if style == GroupingStyle::Indian {
            width = 2;
        }
    }
    groups.reverse();
    groups.join(&separator.to_string())
}

/// Renders amounts for one fixed currency and locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormatter {
    code: CurrencyCode,
    locale: LocaleConfig,
}

impl CurrencyFormatter {
    pub fn new(code: CurrencyCode, locale: LocaleConfig) -> Self {
        Self { code, locale }
    }

    pub fn from_config(config: &Config) -> Result<Self, TrackerError> {
        let locale = LocaleConfig::for_tag(&config.locale).ok_or_else(|| {
            TrackerError::Config(format!(
                "unknown locale `{}` (known: {})",
                config.locale,
                LocaleConfig::known_tags().join(", ")
            ))
        })?;
        let code = CurrencyCode::new(config.currency.clone());
        if code.as_str().len() != 3 || !code.as_str().chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(TrackerError::Config(format!(
                "`{}` is not a three-letter currency code",
                config.currency
            )));
        }
        Ok(Self::new(code, locale))
    }

    pub fn code(&self) -> &CurrencyCode {
        &self.code
    }

    pub fn locale(&self) -> &LocaleConfig {
        &self.locale
    }

    pub fn format(&self, amount: f64) -> String {
        let symbol = symbol_for(self.code.as_str());
        let body = if amount.is_nan() {
            "NaN".to_string()
        } else if amount.is_infinite() {
            "∞".to_string()
        } else {
            format_number(&self.locale, amount.abs(), minor_units_for(self.code.as_str()))
        };
        let sign = if amount < 0.0 { "-" } else { "" };
        match self.locale.symbol_position {
            SymbolPosition::Prefix => format!("{}{}{}", sign, symbol, body),
            SymbolPosition::Suffix => format!("{}{} {}", sign, body, symbol.trim_end()),
        }
    }
}

impl Default for CurrencyFormatter {
    fn default() -> Self {
        Self::new(CurrencyCode::default(), LocaleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indian_grouping_pairs_above_thousands() {
        let formatter = CurrencyFormatter::default();
        assert_eq!(formatter.format(1000.0), "₹1,000.00");
        assert_eq!(formatter.format(1234567.0), "₹12,34,567.00");
        assert_eq!(formatter.format(100.0), "₹100.00");
        assert_eq!(formatter.format(0.0), "₹0.00");
    }

    #[test]
    fn negative_and_non_finite_values() {
        let formatter = CurrencyFormatter::default();
        assert_eq!(formatter.format(-700.0), "-₹700.00");
        assert_eq!(formatter.format(f64::NAN), "₹NaN");
        assert_eq!(formatter.format(f64::INFINITY), "₹∞");
        assert_eq!(formatter.format(f64::NEG_INFINITY), "-₹∞");
    }

    #[test]
    fn half_cents_round_away_from_zero() {
        let formatter = CurrencyFormatter::default();
        assert_eq!(formatter.format(0.125), "₹0.13");
        assert_eq!(formatter.format(0.625), "₹0.63");
        assert_eq!(formatter.format(-0.125), "-₹0.13");
        assert_eq!(formatter.format(1.005), "₹1.00");
        let locale = LocaleConfig::for_tag("en-US").expect("preset");
        assert_eq!(format_number(&locale, 2.5, 0), "3");
    }

    #[test]
    fn western_grouping_uses_threes() {
        let locale = LocaleConfig::for_tag("en-US").expect("preset");
        assert_eq!(format_number(&locale, 1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(&locale, -42.0, 0), "-42");
    }

    #[test]
    fn suffix_locales_place_symbol_last() {
        let locale = LocaleConfig::for_tag("de-DE").expect("preset");
        let formatter = CurrencyFormatter::new(CurrencyCode::new("eur"), locale);
        assert_eq!(formatter.format(1234.5), "1.234,50 €");
    }
}
