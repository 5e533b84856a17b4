//! Document analysis to template conversion

use std::collections::{BTreeMap, HashSet};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use shared_types::{
    Classification, ConvertedTemplate, DocumentAnalysis, FieldType, PlaceholderCategory,
    PlaceholderMatch, TemplateField, TemplateMetadata,
};

use crate::normalize::{generate_label, normalize_name};
use crate::options::options_for;
use crate::schema::{build_schema, merged_validation};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Document is not suitable for conversion (score {score}, {classification})")]
    Unsuitable { score: u8, classification: Classification },

    #[error("Document has no placeholders to convert")]
    NoFields,
}

/// Caller overrides for a conversion
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversionOptions {
    pub name: Option<String>,
    pub category: Option<String>,
    /// Convert even when the document scored as unsuitable
    #[serde(default)]
    pub force: bool,
}

pub struct TemplateConverter;

impl TemplateConverter {
    pub fn new() -> Self {
        Self
    }

    pub fn convert(
        &self,
        analysis: &DocumentAnalysis,
        options: &ConversionOptions,
    ) -> Result<ConvertedTemplate, ConversionError> {
        let suitability = &analysis.suitability;
        if !suitability.suitable && !options.force {
            return Err(ConversionError::Unsuitable {
                score: suitability.score,
                classification: suitability.classification,
            });
        }
        if analysis.placeholders.is_empty() {
            return Err(ConversionError::NoFields);
        }

        let fields = build_fields(&analysis.placeholders);
        let form_schema = build_schema(&fields);
        let required_count = fields.iter().filter(|f| f.required).count();

        let name = options
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| template_name(&analysis.title));
        let category = options
            .category
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| dominant_category(&fields).label().to_string());

        let mut categories = BTreeMap::new();
        for field in &fields {
            *categories.entry(field.category).or_insert(0) += 1;
        }
        let entities = analysis
            .entities
            .entity_types()
            .into_iter()
            .map(|ty| {
                let count = analysis.entities.entity_count(&ty);
                (ty, count)
            })
            .collect();

        let template = ConvertedTemplate {
            template_id: uuid::Uuid::new_v4().to_string(),
            description: format!(
                "Template generated from '{}' with {} fields ({} required)",
                analysis.title,
                fields.len(),
                required_count
            ),
            name,
            category,
            metadata: TemplateMetadata {
                source_document_id: analysis.document_id.clone(),
                source_title: analysis.title.clone(),
                word_count: analysis.statistics.word_count,
                field_count: fields.len(),
                required_count,
                categories,
                patterns_used: analysis.patterns_used.clone(),
                entities,
                classification: suitability.classification,
            },
            fields,
            form_schema,
            suitability_score: suitability.score,
            created_at: Utc::now(),
        };

        info!(
            template_id = %template.template_id,
            document_id = %analysis.document_id,
            fields = template.fields.len(),
            forced = options.force && !suitability.suitable,
            "Converted document to template"
        );
        Ok(template)
    }
}

impl Default for TemplateConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// Fields in (category, required-first, name) order; first spelling wins on collisions
pub fn build_fields(placeholders: &[PlaceholderMatch]) -> Vec<TemplateField> {
    let mut seen = HashSet::new();
    let mut fields: Vec<TemplateField> = Vec::with_capacity(placeholders.len());

    for placeholder in placeholders {
        let name = normalize_name(&placeholder.name);
        if !seen.insert(name.clone()) {
            debug!(name = %placeholder.name, normalized = %name, "Dropping duplicate field");
            continue;
        }
        fields.push(to_field(name, placeholder));
    }

    fields.sort_by(|a, b| {
        a.category
            .cmp(&b.category)
            .then(b.required.cmp(&a.required))
            .then_with(|| a.name.cmp(&b.name))
    });
    fields
}

fn to_field(name: String, placeholder: &PlaceholderMatch) -> TemplateField {
    let field_type = FieldType::from(placeholder.inferred_type);
    let label = generate_label(&name);
    let options = (field_type == FieldType::Select).then(|| options_for(&name));
    let placeholder_text = match field_type {
        FieldType::Select | FieldType::Checkbox => None,
        FieldType::Date => Some("dd/mm/aaaa".to_string()),
        _ => Some(format!("Enter {}", label.to_lowercase())),
    };

    TemplateField {
        validation_rules: merged_validation(field_type, placeholder.validation.as_ref()),
        label,
        field_type,
        category: placeholder.category,
        required: placeholder.required,
        description: placeholder.description.clone(),
        options,
        placeholder_text,
        default_value: None,
        name,
    }
}

/// Most frequent category; ties go to the earlier category
pub fn dominant_category(fields: &[TemplateField]) -> PlaceholderCategory {
    PlaceholderCategory::ALL
        .into_iter()
        .map(|c| (c, fields.iter().filter(|f| f.category == c).count()))
        .fold((PlaceholderCategory::General, 0), |best, (c, n)| if n > best.1 { (c, n) } else { best })
        .0
}

/// `"Petição Inicial.docx"` -> `"Petição Inicial Template"`
pub fn template_name(title: &str) -> String {
    let stem = match title.rsplit_once('.') {
        Some((stem, ext)) if !stem.trim().is_empty() && !ext.is_empty() && ext.len() <= 5 && !ext.contains(' ') => stem,
        _ => title,
    };
    let cleaned = stem.replace(['_', '-'], " ");
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        "Untitled Template".to_string()
    } else {
        format!("{} Template", cleaned)
    }
}
