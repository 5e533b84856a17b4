//! Cheap pre-check run before a full analysis

use serde::{Deserialize, Serialize};

use shared_types::{DocumentMetadata, RawDocument};

use crate::patterns::ANY_TOKEN;

/// File extensions whose text the document source can deliver
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "txt", "md", "doc", "docx", "odt", "rtf", "pdf", "html", "htm",
];

/// Larger documents are not worth a full extraction pass
pub const MAX_SCANNABLE_WORDS: usize = 200_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickScanResult {
    pub name: String,
    pub is_supported_format: bool,
    pub scannable: bool,
    /// `None` when the text was not inspected
    pub has_placeholders: Option<bool>,
    pub word_count: usize,
}

/// Titles without an extension are treated as plain text
pub fn is_supported_format(title: &str) -> bool {
    match title.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.contains(' ') => {
            let ext = ext.to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        }
        _ => true,
    }
}

/// Scan from metadata, optionally probing the text with a single regex
pub fn quick_scan(metadata: &DocumentMetadata, text: Option<&str>) -> QuickScanResult {
    let is_supported_format = is_supported_format(&metadata.title);
    let scannable = is_supported_format
        && metadata.word_count > 0
        && metadata.word_count <= MAX_SCANNABLE_WORDS;

    QuickScanResult {
        name: metadata.title.clone(),
        is_supported_format,
        scannable,
        has_placeholders: text.map(|t| ANY_TOKEN.is_match(t)),
        word_count: metadata.word_count,
    }
}

pub fn quick_scan_document(document: &RawDocument) -> QuickScanResult {
    quick_scan(&document.metadata(), Some(&document.full_text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_formats() {
        assert!(is_supported_format("peticao.docx"));
        assert!(is_supported_format("Contract.PDF"));
        assert!(is_supported_format("Untitled petition"));
        assert!(is_supported_format("Defesa prévia v2. final"));
        assert!(!is_supported_format("photo.png"));
    }

    #[test]
    fn test_scan_checks_text() {
        let doc = RawDocument::from_text("1", "defesa.docx", "Eu, {{autor_nome}}, venho");
        let result = quick_scan_document(&doc);
        assert!(result.scannable);
        assert_eq!(result.has_placeholders, Some(true));
    }

    #[test]
    fn test_empty_document_is_not_scannable() {
        let doc = RawDocument::from_text("1", "blank.txt", "");
        let result = quick_scan(&doc.metadata(), None);
        assert!(result.is_supported_format);
        assert!(!result.scannable);
        assert_eq!(result.has_placeholders, None);
    }
}
