use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Document text and metadata as delivered by the document source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDocument {
    pub id: String,
    pub title: String,
    pub full_text: String,
    pub word_count: usize,
    pub paragraph_count: usize,
    pub modified_at: DateTime<Utc>,
}

impl RawDocument {
    /// Build a document from plain text, deriving word and paragraph counts
    pub fn from_text(id: impl Into<String>, title: impl Into<String>, text: impl Into<String>) -> Self {
        let full_text = text.into();
        Self {
            id: id.into(),
            title: title.into(),
            word_count: count_words(&full_text),
            paragraph_count: count_paragraphs(&full_text),
            full_text,
            modified_at: Utc::now(),
        }
    }

    pub fn metadata(&self) -> DocumentMetadata {
        DocumentMetadata {
            id: self.id.clone(),
            title: self.title.clone(),
            word_count: self.word_count,
            modified_at: self.modified_at,
        }
    }
}

/// Cheap descriptor of a document, without its text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub id: String,
    pub title: String,
    pub word_count: usize,
    pub modified_at: DateTime<Utc>,
}

pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Counts blocks of non-blank lines separated by at least one blank line
pub fn count_paragraphs(text: &str) -> usize {
    let mut count = 0;
    let mut in_paragraph = false;
    for line in text.lines() {
        if line.trim().is_empty() {
            in_paragraph = false;
        } else if !in_paragraph {
            in_paragraph = true;
            count += 1;
        }
    }
    count
}

/// Semantic group of a placeholder, in sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderCategory {
    Client,
    Legal,
    Document,
    Financial,
    Temporal,
    General,
}

impl PlaceholderCategory {
    pub const ALL: [PlaceholderCategory; 6] = [
        PlaceholderCategory::Client,
        PlaceholderCategory::Legal,
        PlaceholderCategory::Document,
        PlaceholderCategory::Financial,
        PlaceholderCategory::Temporal,
        PlaceholderCategory::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceholderCategory::Client => "client",
            PlaceholderCategory::Legal => "legal",
            PlaceholderCategory::Document => "document",
            PlaceholderCategory::Financial => "financial",
            PlaceholderCategory::Temporal => "temporal",
            PlaceholderCategory::General => "general",
        }
    }

    /// Human-readable label used for template categories and section titles
    pub fn label(&self) -> &'static str {
        match self {
            PlaceholderCategory::Client => "Client Information",
            PlaceholderCategory::Legal => "Legal Proceedings",
            PlaceholderCategory::Document => "Contracts & Documents",
            PlaceholderCategory::Financial => "Financial",
            PlaceholderCategory::Temporal => "Dates & Deadlines",
            PlaceholderCategory::General => "General",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for PlaceholderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value type guessed from a placeholder name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferredType {
    Text,
    Email,
    Phone,
    Date,
    Number,
    Address,
    Currency,
    Textarea,
    Select,
    Boolean,
}

impl InferredType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InferredType::Text => "text",
            InferredType::Email => "email",
            InferredType::Phone => "phone",
            InferredType::Date => "date",
            InferredType::Number => "number",
            InferredType::Address => "address",
            InferredType::Currency => "currency",
            InferredType::Textarea => "textarea",
            InferredType::Select => "select",
            InferredType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for InferredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constraints attached to a placeholder or field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationRules {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Input mask, `9` = digit (e.g. `(99) 99999-9999`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Message shown when the pattern does not match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationRules {
    /// Overlay `explicit` on top of `self`; explicit values win key by key
    pub fn merged_with(&self, explicit: &ValidationRules) -> ValidationRules {
        ValidationRules {
            pattern: explicit.pattern.clone().or_else(|| self.pattern.clone()),
            mask: explicit.mask.clone().or_else(|| self.mask.clone()),
            min: explicit.min.or(self.min),
            max: explicit.max.or(self.max),
            step: explicit.step.or(self.step),
            min_length: explicit.min_length.or(self.min_length),
            max_length: explicit.max_length.or(self.max_length),
            message: explicit.message.clone().or_else(|| self.message.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &ValidationRules::default()
    }
}

/// One unique placeholder found in a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderMatch {
    /// Name as written inside the token delimiters
    pub name: String,
    /// Full token text including delimiters, e.g. `{{client_name}}`
    pub original_token: String,
    pub pattern_id: String,
    /// Byte offset of the first occurrence
    pub position: usize,
    pub category: PlaceholderCategory,
    pub inferred_type: InferredType,
    pub required: bool,
    pub description: String,
    pub occurrences: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRules>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Classification {
    Unsuitable,
    Low,
    Regular,
    Good,
    Excellent,
}

impl Classification {
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => Classification::Excellent,
            60..=79 => Classification::Good,
            40..=59 => Classification::Regular,
            20..=39 => Classification::Low,
            _ => Classification::Unsuitable,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Classification::Excellent => "Excellent",
            Classification::Good => "Good",
            Classification::Regular => "Regular",
            Classification::Low => "Low",
            Classification::Unsuitable => "Unsuitable",
        };
        f.write_str(label)
    }
}

/// Points earned per scoring criterion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub placeholder_count: u8,
    pub category_diversity: u8,
    pub density: u8,
    pub structure: u8,
    pub length: u8,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u8 {
        self.placeholder_count + self.category_diversity + self.density + self.structure + self.length
    }
}

/// How good a document is as template material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuitabilityAssessment {
    pub score: u8,
    pub percentage: f64,
    pub classification: Classification,
    pub suitable: bool,
    pub reasons: Vec<String>,
    pub recommendations: Vec<String>,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStatistics {
    pub word_count: usize,
    pub paragraph_count: usize,
    /// Token occurrences including repeats
    pub total_count: usize,
    pub unique_count: usize,
    pub density_per_100_words: f64,
    pub categories: BTreeMap<PlaceholderCategory, usize>,
    pub types: BTreeMap<InferredType, usize>,
}

/// One instance of a repeating numbered entity (`author_2_*`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityGroup {
    pub entity_type: String,
    pub index: usize,
    pub fields: Vec<PlaceholderMatch>,
}

impl EntityGroup {
    pub fn key(&self) -> String {
        format!("{}_{}", self.entity_type, self.index)
    }
}

/// Numbered entities found in a placeholder set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityAnalysis {
    /// Keyed by `type_index`
    pub groups: BTreeMap<String, EntityGroup>,
    pub max_index: BTreeMap<String, usize>,
    /// Field suffixes that recur across at least two indices of a type
    pub common_fields: BTreeMap<String, Vec<String>>,
    /// Indices missing below the maximum, per type
    pub gaps: BTreeMap<String, Vec<usize>>,
}

impl EntityAnalysis {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn entity_count(&self, entity_type: &str) -> usize {
        self.groups
            .values()
            .filter(|g| g.entity_type == entity_type)
            .count()
    }

    pub fn entity_types(&self) -> Vec<String> {
        self.max_index.keys().cloned().collect()
    }
}

/// Full analysis of one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    pub document_id: String,
    pub title: String,
    pub placeholders: Vec<PlaceholderMatch>,
    pub suitability: SuitabilityAssessment,
    pub statistics: DocumentStatistics,
    pub entities: EntityAnalysis,
    /// Token syntaxes seen in the document
    pub patterns_used: Vec<String>,
    pub analyzed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_counts_words_and_paragraphs() {
        let doc = RawDocument::from_text("d1", "Lease", "First para here.\n\nSecond one\nstill second.\n\n\nThird.");
        assert_eq!(doc.word_count, 8);
        assert_eq!(doc.paragraph_count, 3);
    }

    #[test]
    fn test_classification_thresholds() {
        assert_eq!(Classification::from_score(100), Classification::Excellent);
        assert_eq!(Classification::from_score(80), Classification::Excellent);
        assert_eq!(Classification::from_score(79), Classification::Good);
        assert_eq!(Classification::from_score(60), Classification::Good);
        assert_eq!(Classification::from_score(40), Classification::Regular);
        assert_eq!(Classification::from_score(20), Classification::Low);
        assert_eq!(Classification::from_score(19), Classification::Unsuitable);
    }

    #[test]
    fn test_explicit_rules_win_when_merging() {
        let defaults = ValidationRules {
            pattern: Some("default".into()),
            min: Some(0.0),
            ..Default::default()
        };
        let explicit = ValidationRules {
            pattern: Some("explicit".into()),
            ..Default::default()
        };
        let merged = defaults.merged_with(&explicit);
        assert_eq!(merged.pattern.as_deref(), Some("explicit"));
        assert_eq!(merged.min, Some(0.0));
    }

    #[test]
    fn test_category_map_serializes_with_string_keys() {
        let mut stats = DocumentStatistics::default();
        stats.categories.insert(PlaceholderCategory::Client, 2);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["categories"]["client"], 2);
    }
}
