//! Document-to-template pipeline
//!
//! `TemplatePipeline` ties a `DocumentSource` to the extraction and form engines,
//! caching analyses, quick scans and converted templates in a `ResultCache`.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use template_pipeline::*;
//! # async fn run() -> Result<(), PipelineError> {
//! let source = Arc::new(InMemoryDocumentSource::new());
//! let cache = Arc::new(ResultCache::in_memory());
//! let pipeline = TemplatePipeline::new(source, cache, PipelineConfig::default());
//!
//! let template = pipeline
//!     .convert_to_template("doc-1", &ConversionRequest::default())
//!     .await?;
//! let form = pipeline.generate_form(&template, None, None, true)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod source;

pub use config::{CacheSettings, FormSettings, PipelineConfig, SourceSettings};
pub use error::PipelineError;
pub use pipeline::{
    document_type_for, AnalysisResult, ConversionRequest, InstanceResult, TemplatePipeline,
};
pub use source::{DocumentSource, InMemoryDocumentSource, SourceError};

pub use extraction_engine::{BlockResolution, QuickScanResult, TemplateContext};
pub use result_cache::{CacheConfig, CacheStats, ResultCache};
pub use shared_types::{ConvertedTemplate, DocumentAnalysis, FormLayout, FormStructure, RawDocument};
