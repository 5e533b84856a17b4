//! Conditional visibility rules derived from field names

use std::collections::BTreeMap;

use extraction_engine::parse_numbered_name;
use extraction_engine::patterns::NameTokens;
use serde_json::Value;
use shared_types::{Condition, ConditionOperator, ConditionalRule, FieldType, RuleAction, TemplateField};

use crate::options::MARRIED;

const MARITAL_KEYWORDS: &[&str] = &["estado_civil", "marital"];
const SPOUSE_KEYWORDS: &[&str] = &["conjuge", "cônjuge", "spouse", "esposa", "marido"];
const FLAG_PREFIXES: &[&str] = &["has_", "possui_", "tem_"];

pub fn conditional_rules(fields: &[TemplateField]) -> Vec<ConditionalRule> {
    let mut rules = Vec::new();
    spouse_rules(fields, &mut rules);
    flag_rules(fields, &mut rules);
    entity_chain_rules(fields, &mut rules);
    rules
}

/// Marital status "married" reveals spouse fields
fn spouse_rules(fields: &[TemplateField], rules: &mut Vec<ConditionalRule>) {
    let spouse_fields: Vec<String> = fields
        .iter()
        .filter(|f| NameTokens::new(&f.name).matches_any(SPOUSE_KEYWORDS))
        .map(|f| f.name.clone())
        .collect();
    if spouse_fields.is_empty() {
        return;
    }

    for trigger in fields
        .iter()
        .filter(|f| NameTokens::new(&f.name).matches_any(MARITAL_KEYWORDS))
    {
        rules.push(ConditionalRule {
            trigger: trigger.name.clone(),
            condition: Condition {
                operator: ConditionOperator::Equals,
                value: Some(Value::String(MARRIED.to_string())),
            },
            action: RuleAction::Show,
            target_fields: spouse_fields.clone(),
        });
    }
}

/// `has_hoa` reveals `hoa_*` fields
fn flag_rules(fields: &[TemplateField], rules: &mut Vec<ConditionalRule>) {
    for flag in fields.iter().filter(|f| f.field_type == FieldType::Checkbox) {
        let Some(subject) = FLAG_PREFIXES.iter().find_map(|p| flag.name.strip_prefix(p)) else {
            continue;
        };
        let targets: Vec<String> = fields
            .iter()
            .filter(|f| f.name != flag.name && f.name.contains(subject))
            .map(|f| f.name.clone())
            .collect();
        if targets.is_empty() {
            continue;
        }
        rules.push(ConditionalRule {
            trigger: flag.name.clone(),
            condition: Condition {
                operator: ConditionOperator::Checked,
                value: None,
            },
            action: RuleAction::Show,
            target_fields: targets,
        });
    }
}

/// Filling entity N reveals entity N+1
fn entity_chain_rules(fields: &[TemplateField], rules: &mut Vec<ConditionalRule>) {
    let mut entities: BTreeMap<(String, usize), Vec<(String, String)>> = BTreeMap::new();
    for field in fields {
        if let Some(parsed) = parse_numbered_name(&field.name) {
            entities
                .entry((parsed.entity_type, parsed.index))
                .or_default()
                .push((parsed.field, field.name.clone()));
        }
    }

    for ((entity_type, index), members) in &entities {
        let Some(next) = entities.get(&(entity_type.clone(), index + 1)) else {
            continue;
        };
        let trigger = members
            .iter()
            .find(|(field, _)| field == "name" || field == "nome")
            .or_else(|| members.first())
            .map(|(_, name)| name.clone());
        let Some(trigger) = trigger else { continue };

        rules.push(ConditionalRule {
            trigger,
            condition: Condition {
                operator: ConditionOperator::NotEmpty,
                value: None,
            },
            action: RuleAction::Show,
            target_fields: next.iter().map(|(_, name)| name.clone()).collect(),
        });
    }
}
