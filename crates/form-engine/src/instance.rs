//! Validation of submitted form data against a template

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Number, Value};
use tracing::warn;

use extraction_engine::values::{parse_amount, parse_date, value_as_text};
use shared_types::{ConvertedTemplate, FieldError, FieldType, InstanceData, TemplateField, ValidationRules};

use crate::schema::EMAIL_PATTERN;

lazy_static! {
    static ref EMAIL: Regex = Regex::new(EMAIL_PATTERN).unwrap();
}

const TRUE_WORDS: &[&str] = &["true", "on", "yes", "sim", "1", "x"];
const FALSE_WORDS: &[&str] = &["false", "off", "no", "nao", "não", "0"];

/// Check `form_data` against the template and return trimmed, typed values.
///
/// Keys that are not template fields pass through trimmed; calculated fields read
/// them later.
pub fn validate_instance(
    template: &ConvertedTemplate,
    form_data: &Map<String, Value>,
) -> Result<InstanceData, Vec<FieldError>> {
    let mut errors = Vec::new();
    let mut processed = Map::new();
    let mut field_count = 0;

    for field in &template.fields {
        let raw = form_data.get(&field.name);
        let present = match (field.field_type, raw) {
            (FieldType::Checkbox, Some(Value::Bool(_))) => true,
            (_, Some(value)) => value_as_text(value).is_some(),
            (_, None) => false,
        };

        if !present {
            if field.required {
                errors.push(FieldError::new(&field.name, format!("{} is required", field.label)));
            }
            continue;
        }

        let Some(raw) = raw else { continue };
        match check_field(field, raw) {
            Ok(value) => {
                processed.insert(field.name.clone(), value);
                field_count += 1;
            }
            Err(message) => errors.push(FieldError::new(&field.name, message)),
        }
    }

    for (key, value) in form_data {
        if template.field(key).is_none() {
            let cleaned = match value {
                Value::String(s) => Value::String(s.trim().to_string()),
                other => other.clone(),
            };
            processed.insert(key.clone(), cleaned);
        }
    }

    if errors.is_empty() {
        Ok(InstanceData {
            processed_data: processed,
            field_count,
        })
    } else {
        Err(errors)
    }
}

fn check_field(field: &TemplateField, raw: &Value) -> Result<Value, String> {
    let rules = field.validation_rules.clone().unwrap_or_default();
    let text = value_as_text(raw).unwrap_or_default();
    let invalid = |what: &str| rules.message.clone().unwrap_or_else(|| format!("{} {}", field.label, what));

    match field.field_type {
        FieldType::Checkbox => match raw {
            Value::Bool(b) => Ok(Value::Bool(*b)),
            _ => {
                let lower = text.to_lowercase();
                if TRUE_WORDS.contains(&lower.as_str()) {
                    Ok(Value::Bool(true))
                } else if FALSE_WORDS.contains(&lower.as_str()) {
                    Ok(Value::Bool(false))
                } else {
                    Err(invalid("must be yes or no"))
                }
            }
        },
        FieldType::Email => {
            if EMAIL.is_match(&text) {
                Ok(Value::String(text.to_lowercase()))
            } else {
                Err(invalid("must be a valid email address"))
            }
        }
        FieldType::Select => {
            let options = field.options.as_deref().unwrap_or_default();
            options
                .iter()
                .find(|o| o.eq_ignore_ascii_case(&text) || **o == text)
                .map(|o| Value::String(o.clone()))
                .ok_or_else(|| format!("{} must be one of: {}", field.label, options.join(", ")))
        }
        FieldType::Date => parse_date(&text)
            .map(|d: NaiveDate| Value::String(d.format("%d/%m/%Y").to_string()))
            .ok_or_else(|| invalid("must be a date (dd/mm/yyyy)")),
        FieldType::Currency => {
            let cents = parse_amount(raw).ok_or_else(|| invalid("must be an amount"))?;
            let amount = cents as f64 / 100.0;
            check_range(field, &rules, amount)?;
            Number::from_f64(amount)
                .map(Value::Number)
                .ok_or_else(|| invalid("must be an amount"))
        }
        FieldType::Number if rules.pattern.is_none() => {
            let number: f64 = text
                .replace(',', ".")
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| invalid("must be a number"))?;
            check_range(field, &rules, number)?;
            if number.fract() == 0.0 && number.abs() < i64::MAX as f64 {
                Ok(Value::from(number as i64))
            } else {
                Number::from_f64(number)
                    .map(Value::Number)
                    .ok_or_else(|| invalid("must be a number"))
            }
        }
        _ => {
            check_length(field, &rules, &text)?;
            check_pattern(&rules, &text).map_err(|_| invalid("has an invalid format"))?;
            Ok(Value::String(text))
        }
    }
}

fn check_range(field: &TemplateField, rules: &ValidationRules, value: f64) -> Result<(), String> {
    if let Some(min) = rules.min {
        if value < min {
            return Err(format!("{} must be at least {}", field.label, min));
        }
    }
    if let Some(max) = rules.max {
        if value > max {
            return Err(format!("{} must be at most {}", field.label, max));
        }
    }
    Ok(())
}

fn check_length(field: &TemplateField, rules: &ValidationRules, text: &str) -> Result<(), String> {
    let len = text.chars().count();
    if let Some(min) = rules.min_length {
        if len < min {
            return Err(format!("{} must have at least {} characters", field.label, min));
        }
    }
    if let Some(max) = rules.max_length {
        if len > max {
            return Err(format!("{} must have at most {} characters", field.label, max));
        }
    }
    Ok(())
}

/// Invalid patterns are skipped, not enforced
fn check_pattern(rules: &ValidationRules, text: &str) -> Result<(), ()> {
    let Some(pattern) = &rules.pattern else {
        return Ok(());
    };
    match Regex::new(pattern) {
        Ok(re) if re.is_match(text) => Ok(()),
        Ok(_) => Err(()),
        Err(e) => {
            warn!(pattern = %pattern, error = %e, "Skipping invalid validation pattern");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::{ConversionOptions, TemplateConverter};
    use extraction_engine::PlaceholderExtractor;
    use serde_json::json;
    use shared_types::RawDocument;

    fn template() -> ConvertedTemplate {
        let text = format!(
            "{} {{{{cliente_nome}}}} {{{{cliente_email}}}} {{{{cliente_cpf}}}} {{{{valor_multa}}}} \
             {{{{data_notificacao}}}} {{{{estado_civil}}}} {{{{pontos_infracao}}}} {{{{has_advogado}}}}",
            vec!["texto"; 150].join(" ")
        );
        let analysis = PlaceholderExtractor::new().analyze(&RawDocument::from_text("d", "Defesa.docx", text));
        TemplateConverter::new()
            .convert(&analysis, &ConversionOptions::default())
            .unwrap()
    }

    fn data(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_valid_submission_is_typed_and_trimmed() {
        let instance = validate_instance(
            &template(),
            &data(json!({
                "cliente_nome": "  Ana Souza ",
                "cliente_email": "Ana@Example.com",
                "cliente_cpf": "123.456.789-09",
                "valor_multa": "R$ 293,47",
                "data_notificacao": "2024-03-01",
                "estado_civil": "casado(a)",
                "pontos_infracao": "7",
                "has_advogado": "sim",
                "taxa_juros": " 1 ",
            })),
        )
        .unwrap();

        let out = &instance.processed_data;
        assert_eq!(out["cliente_nome"], json!("Ana Souza"));
        assert_eq!(out["cliente_email"], json!("ana@example.com"));
        assert_eq!(out["valor_multa"], json!(293.47));
        assert_eq!(out["data_notificacao"], json!("01/03/2024"));
        assert_eq!(out["estado_civil"], json!("Casado(a)"));
        assert_eq!(out["pontos_infracao"], json!(7));
        assert_eq!(out["has_advogado"], json!(true));
        assert_eq!(out["taxa_juros"], json!("1"));
        assert_eq!(instance.field_count, 8);
    }

    #[test]
    fn test_errors_are_collected_per_field() {
        let errors = validate_instance(
            &template(),
            &data(json!({
                "cliente_email": "not-an-email",
                "cliente_cpf": "12345",
                "estado_civil": "Complicado",
                "data_notificacao": "ontem",
                "pontos_infracao": "NaN",
            })),
        )
        .unwrap_err();

        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"pontos_infracao"));
        assert!(fields.contains(&"cliente_nome"));
        assert!(fields.contains(&"cliente_email"));
        assert!(fields.contains(&"cliente_cpf"));
        assert!(fields.contains(&"estado_civil"));
        assert!(fields.contains(&"data_notificacao"));
    }

    #[test]
    fn test_non_finite_numbers_rejected() {
        for raw in ["NaN", "inf", "-infinity", "1e400"] {
            let errors = validate_instance(
                &template(),
                &data(json!({
                    "cliente_nome": "Ana",
                    "cliente_email": "ana@example.com",
                    "cliente_cpf": "123.456.789-09",
                    "pontos_infracao": raw,
                })),
            )
            .unwrap_err();
            assert_eq!(errors.len(), 1, "{raw}");
            assert_eq!(errors[0].field, "pontos_infracao");
            assert!(errors[0].message.contains("must be a number"), "{raw}");
        }
    }

    #[test]
    fn test_negative_currency_rejected() {
        let errors = validate_instance(
            &template(),
            &data(json!({
                "cliente_nome": "Ana",
                "cliente_email": "ana@example.com",
                "cliente_cpf": "123.456.789-09",
                "valor_multa": "-10",
            })),
        )
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "valor_multa");
    }
}
