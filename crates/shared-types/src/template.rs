//! Converted template value objects

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Classification, InferredType, PlaceholderCategory, ValidationRules};

/// Closed set of form field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Email,
    Phone,
    Date,
    Number,
    Currency,
    Select,
    Textarea,
    Checkbox,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Date => "date",
            FieldType::Number => "number",
            FieldType::Currency => "currency",
            FieldType::Select => "select",
            FieldType::Textarea => "textarea",
            FieldType::Checkbox => "checkbox",
        }
    }

    /// JSON-schema primitive type
    pub fn schema_type(&self) -> &'static str {
        match self {
            FieldType::Number | FieldType::Currency => "number",
            FieldType::Checkbox => "boolean",
            _ => "string",
        }
    }

    /// JSON-schema `format`, when one applies
    pub fn schema_format(&self) -> Option<&'static str> {
        match self {
            FieldType::Email => Some("email"),
            FieldType::Date => Some("date"),
            FieldType::Phone => Some("tel"),
            FieldType::Currency => Some("currency"),
            FieldType::Textarea => Some("textarea"),
            _ => None,
        }
    }
}

impl From<InferredType> for FieldType {
    fn from(inferred: InferredType) -> Self {
        match inferred {
            InferredType::Text => FieldType::Text,
            InferredType::Email => FieldType::Email,
            InferredType::Phone => FieldType::Phone,
            InferredType::Date => FieldType::Date,
            InferredType::Number => FieldType::Number,
            InferredType::Address | InferredType::Textarea => FieldType::Textarea,
            InferredType::Currency => FieldType::Currency,
            InferredType::Select => FieldType::Select,
            InferredType::Boolean => FieldType::Checkbox,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One typed input of a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateField {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub category: PlaceholderCategory,
    pub required: bool,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_rules: Option<ValidationRules>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
}

/// Schema fragment for a single field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaProperty {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

/// JSON-Schema-like description of a template's inputs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    pub properties: BTreeMap<String, SchemaProperty>,
    pub required: Vec<String>,
    /// Category name to field names, in field order
    pub field_groups: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateMetadata {
    pub source_document_id: String,
    pub source_title: String,
    pub word_count: usize,
    pub field_count: usize,
    pub required_count: usize,
    pub categories: BTreeMap<PlaceholderCategory, usize>,
    pub patterns_used: Vec<String>,
    /// Entity type to number of instances (`author` → 2)
    pub entities: BTreeMap<String, usize>,
    pub classification: Classification,
}

/// Template compiled from a document analysis
///
/// Never mutated after construction; [`ConvertedTemplate::with_fields`] builds a new
/// instance instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertedTemplate {
    pub template_id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub fields: Vec<TemplateField>,
    pub metadata: TemplateMetadata,
    pub form_schema: FormSchema,
    pub suitability_score: u8,
    pub created_at: DateTime<Utc>,
}

impl ConvertedTemplate {
    pub fn field(&self, name: &str) -> Option<&TemplateField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &TemplateField> {
        self.fields.iter().filter(|f| f.required)
    }

    /// Copy of this template with a replaced field list and a fresh id
    pub fn with_fields(&self, fields: Vec<TemplateField>, form_schema: FormSchema) -> Self {
        let mut metadata = self.metadata.clone();
        metadata.field_count = fields.len();
        metadata.required_count = fields.iter().filter(|f| f.required).count();
        Self {
            template_id: uuid::Uuid::new_v4().to_string(),
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            fields,
            metadata,
            form_schema,
            suitability_score: self.suitability_score,
            created_at: Utc::now(),
        }
    }
}

/// Validation problem for a single submitted field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Submitted form data after validation and normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceData {
    pub processed_data: serde_json::Map<String, serde_json::Value>,
    pub field_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inferred_types_collapse_into_closed_field_set() {
        assert_eq!(FieldType::from(InferredType::Address), FieldType::Textarea);
        assert_eq!(FieldType::from(InferredType::Boolean), FieldType::Checkbox);
        assert_eq!(FieldType::from(InferredType::Currency), FieldType::Currency);
    }

    #[test]
    fn test_field_type_serializes_under_type_key() {
        let field = TemplateField {
            name: "client_email".into(),
            label: "Client Email".into(),
            field_type: FieldType::Email,
            category: PlaceholderCategory::Client,
            required: true,
            description: String::new(),
            options: None,
            placeholder_text: None,
            validation_rules: None,
            default_value: None,
        };
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "email");
        assert!(json.get("options").is_none());
    }
}
