//! Placeholder extraction and document analysis
//!
//! `PlaceholderExtractor` finds placeholder tokens in document text, classifies them
//! and scores how well the document works as a template. `EntityProcessor` handles
//! the instance-time side: numbered entities, conditional blocks, calculated fields
//! and cross-field checks.

pub mod blocks;
pub mod calculated;
pub mod entities;
pub mod extractor;
pub mod patterns;
pub mod processor;
pub mod relations;
pub mod scan;
pub mod suitability;
pub mod values;

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::debug;

use shared_types::types::{count_paragraphs, count_words};
use shared_types::{DocumentAnalysis, DocumentStatistics, RawDocument};

pub use blocks::{BlockHandler, BlockRegistry, BlockResolution};
pub use calculated::CalculationConfig;
pub use entities::{group_numbered_placeholders, parse_numbered_name, NumberedName};
pub use extractor::{extract_placeholders, ExtractionResult};
pub use processor::EntityProcessor;
pub use relations::{EntityRequirement, TemplateContext};
pub use scan::{quick_scan, quick_scan_document, QuickScanResult};
pub use suitability::{assess_suitability, SuitabilityInputs};

/// Extraction entry point
pub struct PlaceholderExtractor;

impl PlaceholderExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, text: &str) -> ExtractionResult {
        extract_placeholders(text)
    }

    /// Full analysis: placeholders, suitability, statistics and entities
    pub fn analyze(&self, document: &RawDocument) -> DocumentAnalysis {
        let extraction = extract_placeholders(&document.full_text);

        let word_count = match document.word_count {
            0 => count_words(&document.full_text),
            n => n,
        };
        let paragraph_count = match document.paragraph_count {
            0 => count_paragraphs(&document.full_text),
            n => n,
        };
        let density = suitability::density_per_100_words(extraction.total_count, word_count);

        let suitability = assess_suitability(&SuitabilityInputs {
            unique_count: extraction.unique_count,
            category_count: extraction.distinct_categories(),
            density_per_100_words: density,
            word_count,
        });
        let entities = group_numbered_placeholders(&extraction.placeholders);

        debug!(
            document_id = %document.id,
            placeholders = extraction.unique_count,
            score = suitability.score,
            "Analyzed document"
        );

        DocumentAnalysis {
            document_id: document.id.clone(),
            title: document.title.clone(),
            statistics: DocumentStatistics {
                word_count,
                paragraph_count,
                total_count: extraction.total_count,
                unique_count: extraction.unique_count,
                density_per_100_words: (density * 100.0).round() / 100.0,
                categories: extraction.categories.clone(),
                types: extraction.types.clone(),
            },
            placeholders: extraction.placeholders,
            suitability,
            entities,
            patterns_used: extraction.patterns_used,
            analyzed_at: Utc::now(),
        }
    }
}

impl Default for PlaceholderExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Placeholder counts per category label, for display
pub fn category_summary(analysis: &DocumentAnalysis) -> BTreeMap<String, usize> {
    analysis
        .statistics
        .categories
        .iter()
        .map(|(category, count)| (category.label().to_string(), *count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::Classification;

    fn filler(words: usize) -> String {
        vec!["lorem"; words].join(" ")
    }

    #[test]
    fn test_analyze_well_formed_petition() {
        let text = format!(
            "{} {{{{cliente_nome}}}} {{{{cliente_email}}}} {{{{numero_processo}}}} {{{{valor_causa}}}} \
             {{{{data_audiencia}}}} {{{{comarca}}}}",
            filler(194)
        );
        let doc = RawDocument::from_text("doc-1", "Petition.docx", text);
        let analysis = PlaceholderExtractor::new().analyze(&doc);

        assert_eq!(analysis.statistics.unique_count, 6);
        assert_eq!(analysis.statistics.word_count, 200);
        // 20 + 25 + 20 + 15 + 10
        assert_eq!(analysis.suitability.score, 90);
        assert_eq!(analysis.suitability.classification, Classification::Excellent);
    }

    #[test]
    fn test_analyze_plain_text() {
        let doc = RawDocument::from_text("doc-2", "Letter", filler(300));
        let analysis = PlaceholderExtractor::new().analyze(&doc);
        assert!(!analysis.suitability.suitable);
        assert!(analysis.entities.is_empty());
        assert!(analysis.patterns_used.is_empty());
    }

    #[test]
    fn test_category_summary_uses_labels() {
        let doc = RawDocument::from_text("doc-3", "x", "{{cliente_nome}} {{valor}}");
        let analysis = PlaceholderExtractor::new().analyze(&doc);
        let summary = category_summary(&analysis);
        assert_eq!(summary.get("Client Information"), Some(&1));
        assert_eq!(summary.get("Financial"), Some(&1));
    }
}
