//! Form schema and validation defaults

use shared_types::{FieldType, FormSchema, PlaceholderCategory, SchemaProperty, TemplateField, ValidationRules};

pub const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
pub const PHONE_PATTERN: &str = r"^\(?\d{2}\)?\s?\d{4,5}-?\d{4}$";

/// Baseline rules for a field type; explicit rules are layered on top
pub fn default_validation(field_type: FieldType) -> ValidationRules {
    match field_type {
        FieldType::Email => ValidationRules {
            pattern: Some(EMAIL_PATTERN.to_string()),
            message: Some("Enter a valid email address".to_string()),
            ..Default::default()
        },
        FieldType::Phone => ValidationRules {
            pattern: Some(PHONE_PATTERN.to_string()),
            mask: Some("(99) 99999-9999".to_string()),
            message: Some("Enter a valid phone number".to_string()),
            ..Default::default()
        },
        FieldType::Date => ValidationRules {
            mask: Some("99/99/9999".to_string()),
            ..Default::default()
        },
        FieldType::Currency => ValidationRules {
            min: Some(0.0),
            step: Some(0.01),
            ..Default::default()
        },
        FieldType::Text => ValidationRules {
            max_length: Some(255),
            ..Default::default()
        },
        FieldType::Textarea => ValidationRules {
            max_length: Some(5000),
            ..Default::default()
        },
        FieldType::Number | FieldType::Select | FieldType::Checkbox => ValidationRules::default(),
    }
}

/// Defaults merged with explicit rules; `None` when nothing applies
pub fn merged_validation(field_type: FieldType, explicit: Option<&ValidationRules>) -> Option<ValidationRules> {
    let defaults = default_validation(field_type);
    let merged = match explicit {
        Some(explicit) => defaults.merged_with(explicit),
        None => defaults,
    };
    (!merged.is_empty()).then_some(merged)
}

pub fn property_for(field: &TemplateField) -> SchemaProperty {
    let rules = field.validation_rules.as_ref();
    // Patterned numbers (CPF, CEP) carry punctuation
    let schema_type = match (field.field_type, rules.and_then(|r| r.pattern.as_ref())) {
        (FieldType::Number, Some(_)) => "string",
        (ty, _) => ty.schema_type(),
    };

    SchemaProperty {
        schema_type: schema_type.to_string(),
        title: field.label.clone(),
        format: field.field_type.schema_format().map(str::to_string),
        enum_values: field.options.clone(),
        pattern: rules.and_then(|r| r.pattern.clone()),
        minimum: rules.and_then(|r| r.min),
        maximum: rules.and_then(|r| r.max),
        multiple_of: rules.and_then(|r| r.step),
        default: field.default_value.clone(),
        placeholder: field.placeholder_text.clone(),
    }
}

pub fn build_schema(fields: &[TemplateField]) -> FormSchema {
    let mut schema = FormSchema::default();
    for field in fields {
        schema.properties.insert(field.name.clone(), property_for(field));
        if field.required {
            schema.required.push(field.name.clone());
        }
    }
    for category in PlaceholderCategory::ALL {
        let names: Vec<String> = fields
            .iter()
            .filter(|f| f.category == category)
            .map(|f| f.name.clone())
            .collect();
        if !names.is_empty() {
            schema.field_groups.insert(category.as_str().to_string(), names);
        }
    }
    schema
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, field_type: FieldType, required: bool, rules: Option<ValidationRules>) -> TemplateField {
        TemplateField {
            name: name.to_string(),
            label: name.to_string(),
            field_type,
            category: PlaceholderCategory::Client,
            required,
            description: String::new(),
            options: None,
            placeholder_text: None,
            validation_rules: rules,
            default_value: None,
        }
    }

    #[test]
    fn test_explicit_rules_win() {
        let explicit = ValidationRules {
            max_length: Some(80),
            ..Default::default()
        };
        let merged = merged_validation(FieldType::Text, Some(&explicit)).unwrap();
        assert_eq!(merged.max_length, Some(80));
    }

    #[test]
    fn test_no_rules_for_plain_select() {
        assert_eq!(merged_validation(FieldType::Select, None), None);
    }

    #[test]
    fn test_schema_required_and_groups() {
        let cpf_rules = ValidationRules {
            pattern: Some(r"^\d{11}$".to_string()),
            ..Default::default()
        };
        let fields = vec![
            field("cliente_nome", FieldType::Text, true, None),
            field("cliente_cpf", FieldType::Number, true, Some(cpf_rules)),
            field("observacoes", FieldType::Textarea, false, None),
        ];
        let schema = build_schema(&fields);
        assert_eq!(schema.required, vec!["cliente_nome", "cliente_cpf"]);
        assert_eq!(schema.properties["cliente_cpf"].schema_type, "string");
        assert_eq!(schema.field_groups["client"].len(), 3);
    }
}
