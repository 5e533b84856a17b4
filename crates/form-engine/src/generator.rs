//! Form generation from converted templates

use serde::{Deserialize, Serialize};
use tracing::debug;

use extraction_engine::calculated::{INFRACTION_POINTS_KEYS, LICENSE_POINTS_KEYS, NOTIFICATION_DATE_KEYS};
use extraction_engine::parse_numbered_name;
use shared_types::{
    Complexity, ConvertedTemplate, FormLayout, FormMetadata, FormStructure, FormValidationRules,
};

use crate::layout::{build_sections, AUTHOR_TYPES};
use crate::logic::conditional_rules;
use crate::sample::sample_value;
use crate::theme::visual_config;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub wizard_page_size: usize,
    pub max_authors: usize,
    pub max_authorities: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            wizard_page_size: 4,
            max_authors: 5,
            max_authorities: 3,
        }
    }
}

pub struct FormGenerator {
    config: GeneratorConfig,
}

impl FormGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Build a form; the template itself is never modified
    pub fn generate(
        &self,
        template: &ConvertedTemplate,
        layout: FormLayout,
        theme: &str,
        include_sample_data: bool,
    ) -> FormStructure {
        let mut sections = build_sections(template, layout, &self.config);
        if include_sample_data {
            for component in sections.iter_mut().flat_map(|s| s.fields.iter_mut()) {
                if let Some(field) = template.field(&component.name) {
                    component.sample_value = Some(sample_value(field));
                }
            }
        }

        let field_count = template.fields.len();
        let entity_count: usize = template.metadata.entities.values().sum();

        let metadata = FormMetadata {
            template_id: template.template_id.clone(),
            template_name: template.name.clone(),
            field_count,
            required_count: template.required_fields().count(),
            section_count: sections.len(),
            entity_count,
            complexity: complexity(field_count, entity_count),
            estimated_minutes: estimated_minutes(field_count, entity_count),
            includes_sample_data: include_sample_data,
        };

        debug!(
            template_id = %template.template_id,
            layout = %layout,
            sections = sections.len(),
            "Generated form"
        );

        FormStructure {
            layout,
            sections,
            visual_config: visual_config(theme),
            validation_rules: validation_rules(template),
            conditional_logic: conditional_rules(&template.fields),
            metadata,
        }
    }
}

impl Default for FormGenerator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

pub fn complexity(fields: usize, entities: usize) -> Complexity {
    if fields <= 10 && entities <= 1 {
        Complexity::Simple
    } else if fields <= 25 && entities <= 3 {
        Complexity::Medium
    } else {
        Complexity::Complex
    }
}

/// Half a minute per field plus two per entity, at least one
pub fn estimated_minutes(fields: usize, entities: usize) -> u32 {
    let minutes = (fields as f64 * 0.5 + entities as f64 * 2.0).ceil() as u32;
    minutes.max(1)
}

fn validation_rules(template: &ConvertedTemplate) -> FormValidationRules {
    let has = |keys: &[&str]| keys.iter().any(|k| template.field(k).is_some());
    let mut cross_field = Vec::new();

    let has_authors = template.fields.iter().any(|f| {
        parse_numbered_name(&f.name).is_some_and(|p| AUTHOR_TYPES.contains(&p.entity_type.as_str()))
    });
    if has_authors {
        cross_field.push("Every author needs a name and a document number".to_string());
    }
    if has(NOTIFICATION_DATE_KEYS) && has(&["defense_date", "data_defesa"]) {
        cross_field.push("Defense date must be after the notification date".to_string());
    }
    if has(LICENSE_POINTS_KEYS) && has(INFRACTION_POINTS_KEYS) {
        cross_field.push("Infraction points cannot exceed license points".to_string());
    }

    FormValidationRules {
        required_fields: template.required_fields().map(|f| f.name.clone()).collect(),
        field_rules: template
            .fields
            .iter()
            .filter_map(|f| f.validation_rules.clone().map(|r| (f.name.clone(), r)))
            .collect(),
        cross_field,
    }
}
