use thiserror::Error;

use form_engine::ConversionError;
use shared_types::{Classification, FieldError};

use crate::source::SourceError;

/// Errors surfaced by the pipeline facade
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Access denied to document: {0}")]
    AccessDenied(String),

    #[error("Document cannot be read as text: {0}")]
    UnreadableDocument(String),

    #[error("Document source unavailable: {0}")]
    TransientSource(String),

    #[error("Document is not suitable for a template (score {score}, {classification})")]
    UnsuitableDocument { score: u8, classification: Classification },

    #[error("Form data failed validation ({} errors)", .0.len())]
    ValidationFailed(Vec<FieldError>),

    #[error("{stage} timed out after {timeout_ms}ms")]
    Timeout { stage: &'static str, timeout_ms: u64 },

    #[error("{stage} failed: {message}")]
    Stage { stage: &'static str, message: String },
}

impl PipelineError {
    pub fn stage(stage: &'static str, message: impl Into<String>) -> Self {
        PipelineError::Stage {
            stage,
            message: message.into(),
        }
    }

    /// Worth retrying later (the pipeline itself never retries)
    pub fn is_transient(&self) -> bool {
        matches!(self, PipelineError::TransientSource(_) | PipelineError::Timeout { .. })
    }
}

impl From<SourceError> for PipelineError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::NotFound(id) => PipelineError::DocumentNotFound(id),
            SourceError::AccessDenied(id) => PipelineError::AccessDenied(id),
            SourceError::Unreadable(message) => PipelineError::UnreadableDocument(message),
            SourceError::Transient(message) => PipelineError::TransientSource(message),
        }
    }
}

impl From<ConversionError> for PipelineError {
    fn from(err: ConversionError) -> Self {
        match err {
            ConversionError::Unsuitable { score, classification } => {
                PipelineError::UnsuitableDocument { score, classification }
            }
            other => PipelineError::stage("conversion", other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_errors_map_one_to_one() {
        assert!(matches!(
            PipelineError::from(SourceError::NotFound("a".into())),
            PipelineError::DocumentNotFound(id) if id == "a"
        ));
        assert!(matches!(
            PipelineError::from(SourceError::AccessDenied("b".into())),
            PipelineError::AccessDenied(_)
        ));
        assert!(PipelineError::from(SourceError::Transient("down".into())).is_transient());

        let unreadable = PipelineError::from(SourceError::Unreadable("c: binary".into()));
        assert!(matches!(unreadable, PipelineError::UnreadableDocument(_)));
        assert!(!unreadable.is_transient());
    }

    #[test]
    fn test_conversion_errors() {
        let err = PipelineError::from(ConversionError::Unsuitable {
            score: 30,
            classification: Classification::Low,
        });
        assert_eq!(err.to_string(), "Document is not suitable for a template (score 30, Low)");

        let err = PipelineError::from(ConversionError::NoFields);
        assert!(matches!(err, PipelineError::Stage { stage: "conversion", .. }));
    }
}
