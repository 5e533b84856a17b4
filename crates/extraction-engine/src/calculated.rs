//! Fields derived from other submitted values

use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::values::{
    first_present, format_cents, is_blank, number_to_words, parse_amount, parse_date, parse_int,
    value_as_text,
};

pub const VALUE_KEYS: &[&str] = &["value", "valor", "amount", "valor_causa", "fine_value", "valor_multa"];
pub const LICENSE_POINTS_KEYS: &[&str] = &["license_points", "pontos_cnh", "pontos_habilitacao"];
pub const INFRACTION_POINTS_KEYS: &[&str] = &["infraction_points", "pontos_infracao"];
pub const NOTIFICATION_DATE_KEYS: &[&str] = &["notification_date", "data_notificacao"];
pub const INTEREST_RATE_KEYS: &[&str] = &["interest_rate", "taxa_juros"];
pub const MONTHS_KEYS: &[&str] = &["months", "meses"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationConfig {
    /// Days between notification and the defense deadline
    pub defense_deadline_days: i64,
    /// chrono format for generated dates
    pub date_format: String,
    pub currency_singular: String,
    pub currency_plural: String,
    pub cents_singular: String,
    pub cents_plural: String,
    /// Fixed "today", for reproducible output
    pub today: Option<NaiveDate>,
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self {
            defense_deadline_days: 30,
            date_format: "%d/%m/%Y".to_string(),
            currency_singular: "real".to_string(),
            currency_plural: "reais".to_string(),
            cents_singular: "centavo".to_string(),
            cents_plural: "centavos".to_string(),
            today: None,
        }
    }
}

impl CalculationConfig {
    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    fn format_date(&self, date: NaiveDate) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        if write!(out, "{}", date.format(&self.date_format)).is_err() {
            warn!(format = %self.date_format, "Invalid date format, using dd/mm/yyyy");
            return date.format("%d/%m/%Y").to_string();
        }
        out
    }
}

/// Money amount in English words, e.g. "one hundred reais and fifty centavos"
pub fn amount_in_words(cents: i64, config: &CalculationConfig) -> String {
    let abs = cents.unsigned_abs();
    let (whole, fraction) = (abs / 100, abs % 100);
    let unit = |n: u64, singular: &str, plural: &str| {
        format!("{} {}", number_to_words(n), if n == 1 { singular } else { plural })
    };

    let mut words = if whole == 0 && fraction > 0 {
        unit(fraction, &config.cents_singular, &config.cents_plural)
    } else {
        let mut w = unit(whole, &config.currency_singular, &config.currency_plural);
        if fraction > 0 {
            w.push_str(" and ");
            w.push_str(&unit(fraction, &config.cents_singular, &config.cents_plural));
        }
        w
    };
    if cents < 0 {
        words.insert_str(0, "minus ");
    }
    words
}

/// Fill in derived fields. Values already present in `data` are never overwritten.
pub fn compute_calculated_fields(data: &Map<String, Value>, config: &CalculationConfig) -> Map<String, Value> {
    let mut out = data.clone();

    if is_blank(&out, "value_in_words") {
        if let Some((key, raw)) = first_present(data, VALUE_KEYS) {
            let words = match parse_amount(raw) {
                Some(cents) => amount_in_words(cents, config),
                None => {
                    warn!(field = key, "Unparseable amount, value_in_words left empty");
                    String::new()
                }
            };
            out.insert("value_in_words".to_string(), Value::String(words));
        }
    }

    if is_blank(&out, "remaining_points") {
        let license = first_present(data, LICENSE_POINTS_KEYS);
        let infraction = first_present(data, INFRACTION_POINTS_KEYS);
        if license.is_some() || infraction.is_some() {
            let remaining = match (
                license.and_then(|(_, v)| parse_int(v)),
                infraction.and_then(|(_, v)| parse_int(v)),
            ) {
                (Some(l), Some(i)) => l - i,
                _ => {
                    warn!("Incomplete or invalid points, remaining_points set to 0");
                    0
                }
            };
            out.insert("remaining_points".to_string(), Value::from(remaining));
        }
    }

    if is_blank(&out, "current_date") {
        out.insert(
            "current_date".to_string(),
            Value::String(config.format_date(config.today())),
        );
    }

    if is_blank(&out, "defense_deadline") {
        if let Some((key, raw)) = first_present(data, NOTIFICATION_DATE_KEYS) {
            let deadline = value_as_text(raw)
                .as_deref()
                .and_then(parse_date)
                .and_then(|d| {
                    Duration::try_days(config.defense_deadline_days)
                        .and_then(|offset| d.checked_add_signed(offset))
                })
                .map(|d| config.format_date(d));
            if deadline.is_none() {
                warn!(field = key, "Unparseable or out-of-range notification date, defense_deadline left empty");
            }
            out.insert(
                "defense_deadline".to_string(),
                Value::String(deadline.unwrap_or_default()),
            );
        }
    }

    if is_blank(&out, "adjusted_value") {
        if let Some((_, rate_raw)) = first_present(data, INTEREST_RATE_KEYS) {
            out.insert("adjusted_value".to_string(), Value::String(adjusted_value(data, rate_raw)));
        }
    }

    out
}

/// Simple interest: value * (1 + rate/100 * months). Months default to 1.
fn adjusted_value(data: &Map<String, Value>, rate_raw: &Value) -> String {
    let base = first_present(data, VALUE_KEYS).and_then(|(_, v)| parse_amount(v));
    let rate = parse_amount(rate_raw).map(|c| c as f64 / 100.0);
    let months = first_present(data, MONTHS_KEYS)
        .map(|(_, v)| parse_int(v))
        .unwrap_or(Some(1));

    match (base, rate, months) {
        (Some(base), Some(rate), Some(months)) if months >= 0 => {
            let factor = 1.0 + rate / 100.0 * months as f64;
            format_cents((base as f64 * factor).round() as i64)
        }
        (base, _, _) => {
            warn!("Invalid interest inputs, adjusted_value falls back to the base value");
            format_cents(base.unwrap_or(0))
        }
    }
}
