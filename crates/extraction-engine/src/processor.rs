use serde_json::{Map, Value};

use shared_types::{EntityAnalysis, PlaceholderMatch};

use crate::blocks::{resolve_conditional_blocks, BlockRegistry, BlockResolution};
use crate::calculated::{compute_calculated_fields, CalculationConfig};
use crate::entities::group_numbered_placeholders;
use crate::relations::{validate_related_fields, TemplateContext};

/// Entity grouping, conditional blocks, derived fields and cross-field checks
#[derive(Debug, Clone)]
pub struct EntityProcessor {
    registry: BlockRegistry,
    config: CalculationConfig,
}

impl EntityProcessor {
    pub fn new(config: CalculationConfig) -> Self {
        Self::with_registry(BlockRegistry::with_defaults(), config)
    }

    pub fn with_registry(registry: BlockRegistry, config: CalculationConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut BlockRegistry {
        &mut self.registry
    }

    pub fn group_numbered_placeholders(&self, placeholders: &[PlaceholderMatch]) -> EntityAnalysis {
        group_numbered_placeholders(placeholders)
    }

    pub fn resolve_conditional_blocks(&self, text: &str, data: &Map<String, Value>) -> BlockResolution {
        resolve_conditional_blocks(text, data, &self.registry)
    }

    pub fn compute_calculated_fields(&self, data: &Map<String, Value>) -> Map<String, Value> {
        compute_calculated_fields(data, &self.config)
    }

    pub fn validate_related_fields(&self, data: &Map<String, Value>, context: Option<&TemplateContext>) -> Vec<String> {
        validate_related_fields(data, context)
    }
}

impl Default for EntityProcessor {
    fn default() -> Self {
        Self::new(CalculationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_processor_uses_its_config() {
        let processor = EntityProcessor::new(CalculationConfig {
            defense_deadline_days: 10,
            ..Default::default()
        });
        let data = json!({"notification_date": "01/03/2024"});
        let out = processor.compute_calculated_fields(data.as_object().unwrap());
        assert_eq!(out["defense_deadline"], json!("11/03/2024"));
    }

    #[test]
    fn test_processor_resolves_with_default_blocks() {
        let processor = EntityProcessor::default();
        let data = json!({"autoridade_1_nome": "DETRAN-SP", "autoridade_1_codigo": "123"});
        let resolution = processor.resolve_conditional_blocks("to [AUTORIDADES]", data.as_object().unwrap());
        assert_eq!(resolution.text, "to DETRAN-SP (code 123)");
    }
}
