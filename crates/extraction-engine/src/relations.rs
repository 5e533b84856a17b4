//! Cross-field consistency checks on submitted data
//!
//! Returns human-readable warnings; nothing here rejects an instance.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::calculated::{INFRACTION_POINTS_KEYS, LICENSE_POINTS_KEYS, NOTIFICATION_DATE_KEYS};
use crate::values::{first_present, numbered_entities, parse_date, parse_int, text_of, value_as_text};

const AUTHOR_TYPES: &[&str] = &["author", "autor"];
const AUTHORITY_TYPES: &[&str] = &["authority", "autoridade"];
const DEFENSE_DATE_KEYS: &[&str] = &["defense_date", "data_defesa"];

/// Minimum number of a numbered entity a document needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRequirement {
    pub label: String,
    pub entity_types: Vec<String>,
    pub min: usize,
}

impl EntityRequirement {
    pub fn new(label: &str, entity_types: &[&str], min: usize) -> Self {
        Self {
            label: label.to_string(),
            entity_types: entity_types.iter().map(|s| s.to_string()).collect(),
            min,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateContext {
    pub document_type: Option<String>,
    #[serde(default)]
    pub required_entities: Vec<EntityRequirement>,
}

impl TemplateContext {
    pub fn for_document_type(document_type: &str) -> Self {
        Self {
            document_type: Some(document_type.to_string()),
            required_entities: Vec::new(),
        }
    }

    /// Whether the document type carries built-in entity requirements
    pub fn is_known_document_type(document_type: &str) -> bool {
        !builtin_requirements(document_type).is_empty()
    }

    /// Explicit requirements plus the built-in ones for the document type
    pub fn requirements(&self) -> Vec<EntityRequirement> {
        let mut requirements = self.required_entities.clone();
        if let Some(document_type) = &self.document_type {
            requirements.extend(builtin_requirements(document_type));
        }
        requirements
    }
}

fn builtin_requirements(document_type: &str) -> Vec<EntityRequirement> {
    match document_type {
        "traffic_fine_defense" | "defesa_autuacao" | "defesa_previa" => vec![
            EntityRequirement::new("author", AUTHOR_TYPES, 1),
            EntityRequirement::new("authority", AUTHORITY_TYPES, 1),
        ],
        _ => Vec::new(),
    }
}

pub fn validate_related_fields(data: &Map<String, Value>, context: Option<&TemplateContext>) -> Vec<String> {
    let mut warnings = Vec::new();
    check_author_entries(data, &mut warnings);
    check_defense_date(data, &mut warnings);
    check_points(data, &mut warnings);

    if let Some(context) = context {
        for requirement in context.requirements() {
            let types: Vec<&str> = requirement.entity_types.iter().map(String::as_str).collect();
            let present = numbered_entities(data, &types)
                .values()
                .filter(|fields| fields.values().any(|v| value_as_text(v).is_some()))
                .count();
            if present < requirement.min {
                warnings.push(format!(
                    "Document type '{}' requires at least {} {} (found {})",
                    context.document_type.as_deref().unwrap_or("custom"),
                    requirement.min,
                    requirement.label,
                    present
                ));
            }
        }
    }

    warnings
}

/// A started author entry needs a name and an identity document
fn check_author_entries(data: &Map<String, Value>, warnings: &mut Vec<String>) {
    for (index, fields) in numbered_entities(data, AUTHOR_TYPES) {
        if !fields.values().any(|v| value_as_text(v).is_some()) {
            continue;
        }
        let mut missing = Vec::new();
        if text_of(&fields, &["name", "nome"]).is_none() {
            missing.push("name");
        }
        if text_of(&fields, &["cpf", "cnpj", "rg", "document", "documento"]).is_none() {
            missing.push("document number");
        }
        if !missing.is_empty() {
            warnings.push(format!("Author {} is incomplete: missing {}", index, missing.join(" and ")));
        }
    }
}

fn check_defense_date(data: &Map<String, Value>, warnings: &mut Vec<String>) {
    let (Some(defense), Some(notification)) = (
        text_of(data, DEFENSE_DATE_KEYS),
        text_of(data, NOTIFICATION_DATE_KEYS),
    ) else {
        return;
    };

    match (parse_date(&defense), parse_date(&notification)) {
        (Some(d), Some(n)) if d <= n => warnings.push(format!(
            "Defense date ({}) must be after the notification date ({})",
            defense, notification
        )),
        (None, _) => warnings.push(format!("Defense date '{}' is not a valid date", defense)),
        (_, None) => warnings.push(format!("Notification date '{}' is not a valid date", notification)),
        _ => {}
    }
}

fn check_points(data: &Map<String, Value>, warnings: &mut Vec<String>) {
    let license = first_present(data, LICENSE_POINTS_KEYS).and_then(|(_, v)| parse_int(v));
    let infraction = first_present(data, INFRACTION_POINTS_KEYS).and_then(|(_, v)| parse_int(v));

    if license.is_some_and(|l| l < 0) {
        warnings.push("License points cannot be negative".to_string());
    }
    if infraction.is_some_and(|i| i < 0) {
        warnings.push("Infraction points cannot be negative".to_string());
    }
    if let (Some(l), Some(i)) = (license, infraction) {
        if i > l {
            warnings.push(format!("Infraction points ({}) exceed license points ({})", i, l));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn check(value: Value, context: Option<&TemplateContext>) -> Vec<String> {
        validate_related_fields(value.as_object().unwrap(), context)
    }

    #[test]
    fn test_consistent_data_has_no_warnings() {
        let warnings = check(
            json!({
                "author_1_name": "Ana",
                "author_1_cpf": "111.222.333-44",
                "notification_date": "01/03/2024",
                "defense_date": "20/03/2024",
                "license_points": 20,
                "infraction_points": 7,
            }),
            None,
        );
        assert!(warnings.is_empty(), "{:?}", warnings);
    }

    #[test]
    fn test_incomplete_author() {
        let warnings = check(json!({"author_2_name": "Bruno", "author_3_cpf": ""}), None);
        assert_eq!(warnings, vec!["Author 2 is incomplete: missing document number"]);
    }

    #[test]
    fn test_defense_before_notification() {
        let warnings = check(json!({"data_defesa": "01/02/2024", "data_notificacao": "01/03/2024"}), None);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Defense date"));
    }

    #[test]
    fn test_points_rules() {
        let warnings = check(json!({"pontos_cnh": 5, "pontos_infracao": 7}), None);
        assert_eq!(warnings, vec!["Infraction points (7) exceed license points (5)"]);

        let warnings = check(json!({"license_points": -1}), None);
        assert_eq!(warnings, vec!["License points cannot be negative"]);
    }

    #[test]
    fn test_traffic_fine_defense_needs_authority() {
        let context = TemplateContext::for_document_type("traffic_fine_defense");
        let warnings = check(json!({"author_1_name": "Ana", "author_1_cpf": "1"}), Some(&context));
        assert_eq!(
            warnings,
            vec!["Document type 'traffic_fine_defense' requires at least 1 authority (found 0)"]
        );
    }

    #[test]
    fn test_explicit_requirements() {
        let context = TemplateContext {
            document_type: None,
            required_entities: vec![EntityRequirement::new("witness", &["witness"], 2)],
        };
        let warnings = check(json!({"witness_1_name": "Caio"}), Some(&context));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("at least 2 witness"));
    }
}
