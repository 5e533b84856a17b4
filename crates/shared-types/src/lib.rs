//! Value objects shared by every stage of the template pipeline
//!
//! Documents flow through the crates in this order:
//! - `RawDocument` (from the document source)
//! - `DocumentAnalysis` (extraction-engine)
//! - `ConvertedTemplate` (form-engine converter)
//! - `FormStructure` / `InstanceData` (form-engine generator and validator)

pub mod form;
pub mod template;
pub mod types;

pub use form::{
    AutocompleteConfig, BorderTokens, ColorTokens, Complexity, Condition, ConditionOperator,
    ConditionalRule, EntityBinding, FormComponent, FormLayout, FormMetadata, FormStructure,
    FormValidationRules, Navigation, RuleAction, Section, SpacingTokens, TypographyTokens,
    UnknownLayout, VisualConfig,
};
pub use template::{
    ConvertedTemplate, FieldError, FieldType, FormSchema, InstanceData, SchemaProperty,
    TemplateField, TemplateMetadata,
};
pub use types::{
    Classification, DocumentAnalysis, DocumentMetadata, DocumentStatistics, EntityAnalysis,
    EntityGroup, InferredType, PlaceholderCategory, PlaceholderMatch, RawDocument,
    ScoreBreakdown, SuitabilityAssessment, ValidationRules,
};
