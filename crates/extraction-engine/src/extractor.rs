//! Placeholder extraction and classification

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Range;

use shared_types::{InferredType, PlaceholderCategory, PlaceholderMatch, ValidationRules};

use crate::patterns::{NameTokens, BLOCK_MARKER, CATEGORY_GROUPS, REQUIRED_KEYWORDS, TOKEN_PATTERNS, TYPE_GROUPS};

/// Everything found in one pass over a text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionResult {
    /// Unique placeholders ordered by first position
    pub placeholders: Vec<PlaceholderMatch>,
    pub total_count: usize,
    pub unique_count: usize,
    pub categories: BTreeMap<PlaceholderCategory, usize>,
    pub types: BTreeMap<InferredType, usize>,
    pub patterns_used: Vec<String>,
}

impl ExtractionResult {
    pub fn distinct_categories(&self) -> usize {
        self.categories.len()
    }
}

struct Found {
    name: String,
    token: String,
    pattern_id: &'static str,
    position: usize,
    occurrences: usize,
}

/// Find every placeholder token in `text`.
///
/// Syntaxes are tried in priority order. A span already claimed by an earlier
/// syntax is never re-read by a later one, so `{{x}}` does not also yield `{x}`.
/// Names are deduplicated case-insensitively; the first spelling wins.
pub fn extract_placeholders(text: &str) -> ExtractionResult {
    let mut claimed: Vec<Range<usize>> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut found: Vec<Found> = Vec::new();
    let mut patterns_used = BTreeSet::new();
    let mut total_count = 0;

    for (pattern_id, re) in TOKEN_PATTERNS.iter() {
        for caps in re.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            let span = whole.range();
            if claimed.iter().any(|c| c.start < span.end && span.start < c.end) {
                continue;
            }

            let name = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
            if name.is_empty() {
                continue;
            }
            if *pattern_id == "single_bracket" && BLOCK_MARKER.is_match(name) {
                continue;
            }

            claimed.push(span.clone());
            total_count += 1;
            patterns_used.insert(*pattern_id);

            let key = name.to_lowercase();
            match seen.get(&key) {
                Some(&idx) => {
                    let entry = &mut found[idx];
                    entry.occurrences += 1;
                    entry.position = entry.position.min(span.start);
                }
                None => {
                    seen.insert(key, found.len());
                    found.push(Found {
                        name: name.to_string(),
                        token: whole.as_str().to_string(),
                        pattern_id,
                        position: span.start,
                        occurrences: 1,
                    });
                }
            }
        }
    }

    found.sort_by_key(|f| f.position);

    let mut categories = BTreeMap::new();
    let mut types = BTreeMap::new();
    let placeholders: Vec<PlaceholderMatch> = found
        .into_iter()
        .map(|f| {
            let placeholder = classify(f);
            *categories.entry(placeholder.category).or_insert(0) += 1;
            *types.entry(placeholder.inferred_type).or_insert(0) += 1;
            placeholder
        })
        .collect();

    ExtractionResult {
        unique_count: placeholders.len(),
        placeholders,
        total_count,
        categories,
        types,
        patterns_used: patterns_used.into_iter().map(str::to_string).collect(),
    }
}

fn classify(found: Found) -> PlaceholderMatch {
    let tokens = NameTokens::new(&found.name);
    let category = categorize(&tokens);
    let inferred_type = infer_type(&tokens);

    PlaceholderMatch {
        description: describe(&found.name, category, inferred_type),
        required: is_required(&tokens),
        validation: known_validation(&tokens),
        name: found.name,
        original_token: found.token,
        pattern_id: found.pattern_id.to_string(),
        position: found.position,
        category,
        inferred_type,
        occurrences: found.occurrences,
    }
}

pub fn categorize(tokens: &NameTokens) -> PlaceholderCategory {
    CATEGORY_GROUPS
        .iter()
        .find(|(_, keywords)| tokens.matches_any(keywords))
        .map(|(category, _)| *category)
        .unwrap_or(PlaceholderCategory::General)
}

pub fn infer_type(tokens: &NameTokens) -> InferredType {
    TYPE_GROUPS
        .iter()
        .find(|(_, keywords)| tokens.matches_any(keywords))
        .map(|(ty, _)| *ty)
        .unwrap_or(InferredType::Text)
}

pub fn is_required(tokens: &NameTokens) -> bool {
    tokens.matches_any(REQUIRED_KEYWORDS)
}

/// Masks and patterns for Brazilian identifiers
fn known_validation(tokens: &NameTokens) -> Option<ValidationRules> {
    let (pattern, mask, message) = if tokens.matches("cnpj") {
        (
            r"^\d{2}\.?\d{3}\.?\d{3}/?\d{4}-?\d{2}$",
            "99.999.999/9999-99",
            "Invalid CNPJ",
        )
    } else if tokens.matches("cpf") {
        (r"^\d{3}\.?\d{3}\.?\d{3}-?\d{2}$", "999.999.999-99", "Invalid CPF")
    } else if tokens.matches("cep") {
        (r"^\d{5}-?\d{3}$", "99999-999", "Invalid CEP")
    } else {
        return None;
    };

    Some(ValidationRules {
        pattern: Some(pattern.to_string()),
        mask: Some(mask.to_string()),
        message: Some(message.to_string()),
        ..Default::default()
    })
}

fn describe(name: &str, category: PlaceholderCategory, inferred_type: InferredType) -> String {
    let readable: String = name
        .chars()
        .map(|c| if c == '_' || c == '-' || c == '.' { ' ' } else { c })
        .collect();
    format!(
        "{} ({}, {})",
        readable.split_whitespace().collect::<Vec<_>>().join(" "),
        category.label(),
        inferred_type
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extracts_double_brace_names() {
        let result = extract_placeholders("Dear {{cliente_nome}}, reach us at {{cliente_email}}.");
        let names: Vec<_> = result.placeholders.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["cliente_nome", "cliente_email"]);

        let nome = &result.placeholders[0];
        assert_eq!(nome.category, PlaceholderCategory::Client);
        assert_eq!(nome.inferred_type, InferredType::Text);
        assert!(nome.required);

        let email = &result.placeholders[1];
        assert_eq!(email.inferred_type, InferredType::Email);
        assert!(email.required);
        assert_eq!(result.categories.get(&PlaceholderCategory::Client), Some(&2));
    }

    #[test]
    fn test_repeats_increase_occurrences_only() {
        let result = extract_placeholders("{{valor}} then {{VALOR}} and {{ valor }}");
        assert_eq!(result.unique_count, 1);
        assert_eq!(result.total_count, 3);
        assert_eq!(result.placeholders[0].occurrences, 3);
        assert_eq!(result.placeholders[0].position, 0);
    }

    #[test]
    fn test_claimed_spans_are_not_reparsed() {
        let result = extract_placeholders("{{nome}} ${data} [[prazo]]");
        assert_eq!(result.total_count, 3);
        let ids: Vec<_> = result.placeholders.iter().map(|p| p.pattern_id.as_str()).collect();
        assert_eq!(ids, vec!["double_brace", "dollar_brace", "double_bracket"]);
    }

    #[test]
    fn test_all_syntaxes_recognized() {
        let text = "{{a_one}} ${b_two} [[c_three]] <<d_four>> {e_five} [f_six] %g_seven% #H_EIGHT#";
        let result = extract_placeholders(text);
        assert_eq!(result.unique_count, 8);
        assert_eq!(result.patterns_used.len(), 8);
    }

    #[test]
    fn test_block_markers_are_not_placeholders() {
        let result = extract_placeholders("[AUTHORS] filed against [autoridade_nome]");
        assert_eq!(result.unique_count, 1);
        assert_eq!(result.placeholders[0].name, "autoridade_nome");
    }

    #[test]
    fn test_names_cannot_start_with_digits() {
        let result = extract_placeholders("Paid {1} of {2} installments and 50% to 30% off");
        assert_eq!(result.unique_count, 0);
    }

    #[test]
    fn test_type_priority() {
        let t = |n: &str| infer_type(&NameTokens::new(n));
        assert_eq!(t("contact_email"), InferredType::Email);
        assert_eq!(t("telefone_celular"), InferredType::Phone);
        assert_eq!(t("data_nascimento"), InferredType::Date);
        assert_eq!(t("cliente_cpf"), InferredType::Number);
        assert_eq!(t("endereco_completo"), InferredType::Address);
        assert_eq!(t("valor_causa"), InferredType::Currency);
        assert_eq!(t("observacoes"), InferredType::Textarea);
        assert_eq!(t("estado_civil"), InferredType::Select);
        assert_eq!(t("has_dependents"), InferredType::Boolean);
        assert_eq!(t("favorite_color"), InferredType::Text);
    }

    #[test]
    fn test_category_priority() {
        let c = |n: &str| categorize(&NameTokens::new(n));
        assert_eq!(c("requerente"), PlaceholderCategory::Client);
        assert_eq!(c("numero_processo"), PlaceholderCategory::Legal);
        assert_eq!(c("clausula_terceira"), PlaceholderCategory::Document);
        assert_eq!(c("valor_multa"), PlaceholderCategory::Financial);
        assert_eq!(c("prazo_recurso"), PlaceholderCategory::Temporal);
        assert_eq!(c("observacoes"), PlaceholderCategory::General);
    }

    #[test]
    fn test_cpf_gets_mask() {
        let result = extract_placeholders("{{cliente_cpf}}");
        let rules = result.placeholders[0].validation.clone().unwrap();
        assert_eq!(rules.mask.as_deref(), Some("999.999.999-99"));
    }

    #[test]
    fn test_empty_text() {
        let result = extract_placeholders("");
        assert_eq!(result, ExtractionResult::default());
    }
}
