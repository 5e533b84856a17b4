//! Rendered form structures

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::template::FieldType;
use crate::types::ValidationRules;

/// Layout variant requested for a form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormLayout {
    #[default]
    SingleColumn,
    TwoColumn,
    Grouped,
    Wizard,
    MultiAuthor,
    AuthoritySelection,
}

impl FormLayout {
    pub const ALL: [FormLayout; 6] = [
        FormLayout::SingleColumn,
        FormLayout::TwoColumn,
        FormLayout::Grouped,
        FormLayout::Wizard,
        FormLayout::MultiAuthor,
        FormLayout::AuthoritySelection,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormLayout::SingleColumn => "single_column",
            FormLayout::TwoColumn => "two_column",
            FormLayout::Grouped => "grouped",
            FormLayout::Wizard => "wizard",
            FormLayout::MultiAuthor => "multi_author",
            FormLayout::AuthoritySelection => "authority_selection",
        }
    }
}

impl fmt::Display for FormLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown form layout '{0}'")]
pub struct UnknownLayout(pub String);

impl FromStr for FormLayout {
    type Err = UnknownLayout;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|layout| layout.as_str() == wanted)
            .ok_or_else(|| UnknownLayout(s.to_string()))
    }
}

/// A single input widget inside a section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormComponent {
    pub name: String,
    pub label: String,
    /// Widget kind: `input`, `textarea`, `select`, `checkbox`, `date`
    pub component: String,
    pub field_type: FieldType,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRules>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_value: Option<serde_json::Value>,
    /// Grid width out of 12 columns
    pub width: u8,
}

/// Wizard page navigation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    pub step: usize,
    pub total_steps: usize,
    pub previous: bool,
    pub next: bool,
}

/// Search metadata for authority lookups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutocompleteConfig {
    pub source: String,
    pub min_chars: usize,
    pub search_fields: Vec<String>,
}

/// Binds a section to one numbered entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityBinding {
    pub entity_type: String,
    pub index: usize,
    pub max_count: usize,
    pub repeatable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autocomplete: Option<AutocompleteConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<FormComponent>,
    pub collapsible: bool,
    pub collapsed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation: Option<Navigation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<EntityBinding>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorTokens {
    pub primary: String,
    pub secondary: String,
    pub background: String,
    pub surface: String,
    pub text: String,
    pub error: String,
    pub border: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypographyTokens {
    pub font_family: String,
    pub font_size: String,
    pub heading_size: String,
    pub line_height: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpacingTokens {
    pub section_gap: String,
    pub field_gap: String,
    pub padding: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderTokens {
    pub radius: String,
    pub width: String,
    pub style: String,
}

/// Theme tokens for the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualConfig {
    pub theme: String,
    pub colors: ColorTokens,
    pub typography: TypographyTokens,
    pub spacing: SpacingTokens,
    pub borders: BorderTokens,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    NotEmpty,
    Checked,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub operator: ConditionOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleAction {
    Show,
    Hide,
}

/// Declarative visibility rule, evaluated by the form renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalRule {
    pub trigger: String,
    pub condition: Condition,
    pub action: RuleAction,
    pub target_fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormValidationRules {
    pub required_fields: Vec<String>,
    pub field_rules: BTreeMap<String, ValidationRules>,
    /// Human-readable descriptions of cross-field checks run on submission
    pub cross_field: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormMetadata {
    pub template_id: String,
    pub template_name: String,
    pub field_count: usize,
    pub required_count: usize,
    pub section_count: usize,
    pub entity_count: usize,
    pub complexity: Complexity,
    pub estimated_minutes: u32,
    pub includes_sample_data: bool,
}

/// Concrete form generated for one (template, layout, theme) request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormStructure {
    #[serde(rename = "type")]
    pub layout: FormLayout,
    pub sections: Vec<Section>,
    pub visual_config: VisualConfig,
    pub validation_rules: FormValidationRules,
    pub conditional_logic: Vec<ConditionalRule>,
    pub metadata: FormMetadata,
}

impl FormStructure {
    pub fn field_names(&self) -> Vec<&str> {
        self.sections
            .iter()
            .flat_map(|s| s.fields.iter().map(|f| f.name.as_str()))
            .collect()
    }
}
