//! Numbered entity grouping (`author_1_name`, `author_2_name`, ...)

use std::collections::{BTreeMap, BTreeSet};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use shared_types::{EntityAnalysis, EntityGroup, PlaceholderMatch};

lazy_static! {
    static ref NUMBERED_NAME: Regex = Regex::new(r"(?i)^([a-z]+)_(\d+)_(.+)$").unwrap();
}

/// A name split into entity type, index and field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedName {
    pub entity_type: String,
    pub index: usize,
    pub field: String,
}

/// Parse `type_N_field`. Indices start at 1; `author_0_name` is not an entity.
pub fn parse_numbered_name(name: &str) -> Option<NumberedName> {
    let canonical: String = name
        .trim()
        .chars()
        .map(|c| if c == '-' || c.is_whitespace() { '_' } else { c })
        .collect();
    let caps = NUMBERED_NAME.captures(&canonical)?;
    let index: usize = caps.get(2)?.as_str().parse().ok()?;
    if index == 0 {
        return None;
    }
    Some(NumberedName {
        entity_type: caps.get(1)?.as_str().to_lowercase(),
        index,
        field: caps.get(3)?.as_str().to_lowercase(),
    })
}

pub fn group_numbered_placeholders(placeholders: &[PlaceholderMatch]) -> EntityAnalysis {
    let mut analysis = EntityAnalysis::default();
    let mut field_indices: BTreeMap<String, BTreeMap<String, BTreeSet<usize>>> = BTreeMap::new();

    for placeholder in placeholders {
        let Some(parsed) = parse_numbered_name(&placeholder.name) else {
            continue;
        };

        let group = analysis
            .groups
            .entry(format!("{}_{}", parsed.entity_type, parsed.index))
            .or_insert_with(|| EntityGroup {
                entity_type: parsed.entity_type.clone(),
                index: parsed.index,
                fields: Vec::new(),
            });
        group.fields.push(placeholder.clone());

        let max = analysis.max_index.entry(parsed.entity_type.clone()).or_insert(0);
        *max = (*max).max(parsed.index);

        field_indices
            .entry(parsed.entity_type)
            .or_default()
            .entry(parsed.field)
            .or_default()
            .insert(parsed.index);
    }

    for (entity_type, fields) in field_indices {
        let common: Vec<String> = fields
            .into_iter()
            .filter(|(_, indices)| indices.len() >= 2)
            .map(|(field, _)| field)
            .collect();
        if !common.is_empty() {
            analysis.common_fields.insert(entity_type, common);
        }
    }

    for (entity_type, max) in &analysis.max_index {
        let gaps: Vec<usize> = (1..*max)
            .filter(|i| !analysis.groups.contains_key(&format!("{}_{}", entity_type, i)))
            .collect();
        if !gaps.is_empty() {
            debug!(entity_type = %entity_type, ?gaps, "Numbered entities have gaps");
            analysis.gaps.insert(entity_type.clone(), gaps);
        }
    }

    analysis
}
