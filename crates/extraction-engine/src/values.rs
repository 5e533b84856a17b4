//! Lookup and parsing helpers for submitted form values

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::entities::parse_numbered_name;

/// Accepted date layouts, Brazilian first
pub const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y", "%d.%m.%Y"];

/// String form of a scalar; empty strings count as absent
pub fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// First key (of several aliases) holding a non-empty value
pub fn first_present<'a>(data: &'a Map<String, Value>, keys: &[&str]) -> Option<(&'a str, &'a Value)> {
    keys.iter().find_map(|key| {
        let (k, v) = data.get_key_value(*key)?;
        value_as_text(v).map(|_| (k.as_str(), v))
    })
}

pub fn text_of(data: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    first_present(data, keys).and_then(|(_, v)| value_as_text(v))
}

pub fn is_blank(data: &Map<String, Value>, key: &str) -> bool {
    data.get(key).and_then(value_as_text).is_none()
}

pub fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse a money amount into cents.
///
/// Accepts `1.234,56` and `1,234.56`. The last separator is decimal when one or two
/// digits follow it; otherwise every separator is a thousands separator.
pub fn parse_amount(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_f64().map(|f| (f * 100.0).round() as i64),
        Value::String(s) => parse_amount_str(s),
        _ => None,
    }
}

pub fn parse_amount_str(raw: &str) -> Option<i64> {
    let negative = raw.trim_start().starts_with('-');
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let (integer, fraction) = match cleaned.rfind([',', '.']) {
        Some(pos) if (1..=2).contains(&(cleaned.len() - pos - 1)) => {
            (&cleaned[..pos], &cleaned[pos + 1..])
        }
        _ => (cleaned.as_str(), ""),
    };

    let digits: String = integer.chars().filter(char::is_ascii_digit).collect();
    let whole: i64 = if digits.is_empty() { 0 } else { digits.parse().ok()? };
    let cents: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().ok()? * 10,
        _ => fraction.parse().ok()?,
    };

    let total = whole.checked_mul(100)?.checked_add(cents)?;
    Some(if negative { -total } else { total })
}

pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Field values of every numbered entity of the given type aliases, by index
pub fn numbered_entities(
    data: &Map<String, Value>,
    type_aliases: &[&str],
) -> std::collections::BTreeMap<usize, Map<String, Value>> {
    let mut entities: std::collections::BTreeMap<usize, Map<String, Value>> = Default::default();
    for (key, value) in data {
        let Some(parsed) = parse_numbered_name(key) else {
            continue;
        };
        if type_aliases.contains(&parsed.entity_type.as_str()) {
            entities
                .entry(parsed.index)
                .or_default()
                .insert(parsed.field, value.clone());
        }
    }
    entities
}

const ONES: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];
const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];
const SCALES: [(u64, &str); 4] = [
    (1_000_000_000_000, "trillion"),
    (1_000_000_000, "billion"),
    (1_000_000, "million"),
    (1_000, "thousand"),
];

fn below_thousand(n: u64) -> String {
    let mut parts = Vec::new();
    let hundreds = n / 100;
    let rest = n % 100;
    if hundreds > 0 {
        parts.push(format!("{} hundred", ONES[hundreds as usize]));
    }
    if rest > 0 {
        if rest < 20 {
            parts.push(ONES[rest as usize].to_string());
        } else if rest % 10 == 0 {
            parts.push(TENS[(rest / 10) as usize].to_string());
        } else {
            parts.push(format!("{}-{}", TENS[(rest / 10) as usize], ONES[(rest % 10) as usize]));
        }
    }
    parts.join(" ")
}

/// English words for a whole number
pub fn number_to_words(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }
    let mut parts = Vec::new();
    let mut rest = n;
    for (scale, word) in SCALES {
        if rest >= scale {
            parts.push(format!("{} {}", number_to_words(rest / scale), word));
            rest %= scale;
        }
    }
    if rest > 0 {
        parts.push(below_thousand(rest));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_amount_formats() {
        assert_eq!(parse_amount_str("R$ 1.234,56"), Some(123_456));
        assert_eq!(parse_amount_str("$1,234.56"), Some(123_456));
        assert_eq!(parse_amount_str("1.234"), Some(123_400));
        assert_eq!(parse_amount_str("12,5"), Some(1_250));
        assert_eq!(parse_amount_str("-30"), Some(-3_000));
        assert_eq!(parse_amount_str("abc"), None);
        assert_eq!(parse_amount(&json!(88.38)), Some(8_838));
    }

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(123_456), "1234.56");
        assert_eq!(format_cents(-5), "-0.05");
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15);
        assert_eq!(parse_date("15/03/2024"), expected);
        assert_eq!(parse_date("2024-03-15"), expected);
        assert_eq!(parse_date("31/02/2024"), None);
    }

    #[test]
    fn test_number_to_words() {
        assert_eq!(number_to_words(0), "zero");
        assert_eq!(number_to_words(21), "twenty-one");
        assert_eq!(number_to_words(1_234), "one thousand two hundred thirty-four");
        assert_eq!(number_to_words(2_000_005), "two million five");
    }

    #[test]
    fn test_first_present_skips_blank_aliases() {
        let data = json!({"valor": "", "value": "10"});
        let data = data.as_object().unwrap();
        assert_eq!(text_of(data, &["valor", "value"]), Some("10".to_string()));
    }

    #[test]
    fn test_numbered_entities_by_alias() {
        let data = json!({"autor_1_nome": "Ana", "author_2_name": "Bia", "vehicle_1_plate": "X"});
        let entities = numbered_entities(data.as_object().unwrap(), &["author", "autor"]);
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[&1]["nome"], json!("Ana"));
    }
}
