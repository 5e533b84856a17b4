//! Orchestration facade: document source, extraction, conversion, forms and instances

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use uuid::Uuid;

use extraction_engine::scan::{is_supported_format, MAX_SCANNABLE_WORDS};
use extraction_engine::{
    quick_scan, BlockResolution, EntityProcessor, PlaceholderExtractor, QuickScanResult,
    TemplateContext,
};
use form_engine::{normalize_name, validate_instance, FormGenerator, TemplateConverter};
use result_cache::{CacheStats, ResultCache, PREFIX_ANALYSIS, PREFIX_QUICK_SCAN, PREFIX_TEMPLATE};
use shared_types::{ConvertedTemplate, DocumentAnalysis, FormLayout, FormStructure, RawDocument};

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::source::{DocumentSource, SourceError};

pub use form_engine::ConversionOptions as ConversionRequest;

/// Document type a template's entity requirements are looked up under.
///
/// The normalized category wins when it names a known document type, then the
/// normalized template name without its `Template` suffix. Otherwise the
/// normalized category, which carries no built-in requirements.
pub fn document_type_for(template: &ConvertedTemplate) -> String {
    let category = normalize_name(&template.category);
    if TemplateContext::is_known_document_type(&category) {
        return category;
    }
    let name = normalize_name(&template.name);
    let name = name.strip_suffix("_template").unwrap_or(&name);
    if TemplateContext::is_known_document_type(name) {
        return name.to_string();
    }
    category
}

/// Analysis plus whether it came from the cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub analysis: DocumentAnalysis,
    pub cached: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceResult {
    pub instance_id: String,
    pub template_id: String,
    /// Validated values plus calculated fields
    pub data: Map<String, Value>,
    pub field_count: usize,
    /// Cross-field problems that do not block the instance
    pub warnings: Vec<String>,
    pub created_at: DateTime<Utc>,
}

pub struct TemplatePipeline {
    source: Arc<dyn DocumentSource>,
    cache: Arc<ResultCache>,
    config: PipelineConfig,
    converter: TemplateConverter,
    generator: FormGenerator,
    processor: EntityProcessor,
}

impl TemplatePipeline {
    pub fn new(source: Arc<dyn DocumentSource>, cache: Arc<ResultCache>, config: PipelineConfig) -> Self {
        let generator = FormGenerator::new(config.forms.generator.clone());
        let processor = EntityProcessor::new(config.calculations.clone());
        Self {
            source,
            cache,
            config,
            converter: TemplateConverter::new(),
            generator,
            processor,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Block handlers can be registered here before the pipeline is shared
    pub fn processor_mut(&mut self) -> &mut EntityProcessor {
        &mut self.processor
    }

    /// Analyze a document, serving from the cache when possible
    pub async fn analyze_document(&self, source_id: &str) -> Result<AnalysisResult, PipelineError> {
        if let Some(analysis) = self.cache.get::<DocumentAnalysis>(PREFIX_ANALYSIS, source_id).await {
            debug!(source_id, "Analysis served from cache");
            return Ok(AnalysisResult { analysis, cached: true });
        }

        let document = self.fetch(self.source.fetch_document_text(source_id)).await?;
        let analysis = self.run_analysis(document).await?;

        info!(
            source_id,
            placeholders = analysis.statistics.unique_count,
            score = analysis.suitability.score,
            suitable = analysis.suitability.suitable,
            "Document analyzed"
        );

        self.cache
            .set(PREFIX_ANALYSIS, source_id, &analysis, self.config.cache.analysis_ttl_minutes)
            .await;
        Ok(AnalysisResult { analysis, cached: false })
    }

    /// Cheap pre-check; the text is only fetched for documents worth probing
    pub async fn quick_scan(&self, source_id: &str) -> Result<QuickScanResult, PipelineError> {
        if let Some(result) = self.cache.get::<QuickScanResult>(PREFIX_QUICK_SCAN, source_id).await {
            return Ok(result);
        }

        let metadata = self.fetch(self.source.fetch_metadata(source_id)).await?;
        let worth_probing = is_supported_format(&metadata.title)
            && metadata.word_count > 0
            && metadata.word_count <= MAX_SCANNABLE_WORDS;

        let result = if worth_probing {
            let document = self.fetch(self.source.fetch_document_text(source_id)).await?;
            quick_scan(&metadata, Some(&document.full_text))
        } else {
            quick_scan(&metadata, None)
        };

        self.cache
            .set(PREFIX_QUICK_SCAN, source_id, &result, self.config.cache.quick_scan_ttl_minutes)
            .await;
        Ok(result)
    }

    /// Analyze (cached) and convert into a template
    pub async fn convert_to_template(
        &self,
        source_id: &str,
        request: &ConversionRequest,
    ) -> Result<ConvertedTemplate, PipelineError> {
        let AnalysisResult { analysis, .. } = self.analyze_document(source_id).await?;

        let identifier = template_identifier(source_id, &analysis, request);
        if let Some(template) = self.cache.get::<ConvertedTemplate>(PREFIX_TEMPLATE, &identifier).await {
            debug!(source_id, "Template served from cache");
            return Ok(template);
        }

        let template = self.converter.convert(&analysis, request)?;

        self.cache
            .set(PREFIX_TEMPLATE, &identifier, &template, self.config.cache.template_ttl_minutes)
            .await;
        Ok(template)
    }

    /// Build a form; layout and theme fall back to the configured defaults
    pub fn generate_form(
        &self,
        template: &ConvertedTemplate,
        layout: Option<FormLayout>,
        theme: Option<&str>,
        include_sample_data: bool,
    ) -> Result<FormStructure, PipelineError> {
        if template.fields.is_empty() {
            return Err(PipelineError::stage("form_generation", "Template has no fields"));
        }
        let layout = layout.unwrap_or(self.config.forms.default_layout);
        let theme = theme.unwrap_or(&self.config.forms.default_theme);
        Ok(self.generator.generate(template, layout, theme, include_sample_data))
    }

    /// Validate submitted data, add calculated fields and collect cross-field warnings.
    ///
    /// Entity requirements follow [`document_type_for`]: the normalized category
    /// (`"Defesa Previa"` -> `defesa_previa`) or, failing that, the template name.
    pub fn create_instance(
        &self,
        template: &ConvertedTemplate,
        form_data: &Map<String, Value>,
    ) -> Result<InstanceResult, PipelineError> {
        let context = TemplateContext::for_document_type(&document_type_for(template));
        self.create_instance_with_context(template, form_data, Some(&context))
    }

    pub fn create_instance_with_context(
        &self,
        template: &ConvertedTemplate,
        form_data: &Map<String, Value>,
        context: Option<&TemplateContext>,
    ) -> Result<InstanceResult, PipelineError> {
        let instance = validate_instance(template, form_data).map_err(|errors| {
            debug!(template_id = %template.template_id, errors = errors.len(), "Instance rejected");
            PipelineError::ValidationFailed(errors)
        })?;

        let data = self.processor.compute_calculated_fields(&instance.processed_data);
        let warnings = self.processor.validate_related_fields(&data, context);
        for warning in &warnings {
            warn!(template_id = %template.template_id, "{}", warning);
        }

        Ok(InstanceResult {
            instance_id: Uuid::new_v4().to_string(),
            template_id: template.template_id.clone(),
            data,
            field_count: instance.field_count,
            warnings,
            created_at: Utc::now(),
        })
    }

    /// Expand conditional block markers in document text
    pub fn resolve_blocks(&self, text: &str, data: &Map<String, Value>) -> BlockResolution {
        self.processor.resolve_conditional_blocks(text, data)
    }

    /// Drop cached payloads for a document.
    ///
    /// Templates are keyed by the analysis timestamp, so they become unreachable
    /// once the analysis is gone and expire on their own.
    pub async fn invalidate_document(&self, source_id: &str) -> usize {
        let mut removed = 0;
        for prefix in [PREFIX_ANALYSIS, PREFIX_QUICK_SCAN] {
            if self.cache.delete(prefix, source_id).await {
                removed += 1;
            }
        }
        info!(source_id, removed, "Invalidated cached document");
        removed
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    async fn fetch<T>(&self, request: impl Future<Output = Result<T, SourceError>>) -> Result<T, PipelineError> {
        let limit = Duration::from_secs(self.config.source.timeout_secs);
        match tokio::time::timeout(limit, request).await {
            Ok(result) => result.map_err(|err| {
                warn!("Document source error: {}", err);
                PipelineError::from(err)
            }),
            Err(_timeout) => Err(PipelineError::Timeout {
                stage: "fetch",
                timeout_ms: limit.as_millis() as u64,
            }),
        }
    }

    async fn run_analysis(&self, document: RawDocument) -> Result<DocumentAnalysis, PipelineError> {
        let timeout_ms = self.config.source.analysis_timeout_ms;
        let result = tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            tokio::task::spawn_blocking(move || PlaceholderExtractor::new().analyze(&document)),
        )
        .await;

        match result {
            Ok(Ok(analysis)) => Ok(analysis),
            Ok(Err(join_error)) => Err(PipelineError::stage(
                "extraction",
                format!("Analysis task panicked: {}", join_error),
            )),
            Err(_timeout) => Err(PipelineError::Timeout {
                stage: "extraction",
                timeout_ms,
            }),
        }
    }
}

/// Cache identifier for a conversion: the analysis it came from plus the overrides
fn template_identifier(source_id: &str, analysis: &DocumentAnalysis, request: &ConversionRequest) -> String {
    let mut hasher = Sha256::new();
    hasher.update(analysis.analyzed_at.to_rfc3339().as_bytes());
    hasher.update([0]);
    hasher.update(request.name.as_deref().unwrap_or_default().as_bytes());
    hasher.update([0]);
    hasher.update(request.category.as_deref().unwrap_or_default().as_bytes());
    hasher.update([request.force as u8]);
    let digest = hex::encode(hasher.finalize());
    format!("{}:{}", source_id, &digest[..16])
}
