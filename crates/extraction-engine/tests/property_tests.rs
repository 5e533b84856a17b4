//! Property-based tests for extraction-engine

use std::collections::BTreeSet;

use extraction_engine::values::parse_amount_str;
use extraction_engine::{
    assess_suitability, extract_placeholders, group_numbered_placeholders, PlaceholderExtractor,
    SuitabilityInputs,
};
use proptest::prelude::*;
use shared_types::{Classification, InferredType, PlaceholderCategory, RawDocument};

/// Prose without any placeholder syntax characters
fn plain_prose() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-zA-Z]{1,12}[,.]?", 0..600).prop_map(|words| words.join(" "))
}

fn filler(words: usize) -> String {
    vec!["texto"; words].join(" ")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ============================================================
    // Suitability
    // ============================================================

    #[test]
    fn documents_without_tokens_are_unsuitable(text in plain_prose()) {
        let doc = RawDocument::from_text("p", "plain.txt", text);
        let analysis = PlaceholderExtractor::new().analyze(&doc);
        prop_assert_eq!(analysis.statistics.unique_count, 0);
        prop_assert!(analysis.suitability.score <= 10);
        prop_assert_eq!(analysis.suitability.classification, Classification::Unsuitable);
        prop_assert!(!analysis.suitability.suitable);
    }

    #[test]
    fn score_is_monotone_in_placeholder_count(
        a in 0usize..40,
        b in 0usize..40,
        categories in 0usize..6,
        density in 0.0f64..20.0,
        words in 0usize..6000,
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let score = |unique| assess_suitability(&SuitabilityInputs {
            unique_count: unique,
            category_count: categories,
            density_per_100_words: density,
            word_count: words,
        }).score;
        prop_assert!(score(low) <= score(high));
    }

    #[test]
    fn score_never_exceeds_maximum(
        unique in 0usize..100,
        categories in 0usize..6,
        density in 0.0f64..100.0,
        words in 0usize..10_000,
    ) {
        let assessment = assess_suitability(&SuitabilityInputs {
            unique_count: unique,
            category_count: categories,
            density_per_100_words: density,
            word_count: words,
        });
        prop_assert!(assessment.score <= 100);
        prop_assert_eq!(assessment.score, assessment.breakdown.total());
        prop_assert_eq!(assessment.suitable, assessment.score >= 40);
    }

    // ============================================================
    // Extraction
    // ============================================================

    #[test]
    fn placeholders_are_ordered_and_counted(
        names in prop::collection::vec("[a-z]{2,8}_[a-z]{2,8}", 1..15),
        gap in 1usize..5,
    ) {
        let sep = filler(gap);
        let text = names
            .iter()
            .map(|n| format!("{{{{{}}}}}", n))
            .collect::<Vec<_>>()
            .join(&format!(" {} ", sep));
        let result = extract_placeholders(&text);

        let distinct: BTreeSet<String> = names.iter().map(|n| n.to_lowercase()).collect();
        prop_assert_eq!(result.unique_count, distinct.len());
        prop_assert_eq!(result.total_count, names.len());
        prop_assert!(result.placeholders.windows(2).all(|w| w[0].position < w[1].position));
        let occurrences: usize = result.placeholders.iter().map(|p| p.occurrences).sum();
        prop_assert_eq!(occurrences, result.total_count);
    }

    #[test]
    fn numbered_grouping_reports_max_and_gaps(
        indices in prop::collection::btree_set(1usize..12, 1..8),
    ) {
        let text = indices
            .iter()
            .map(|i| format!("{{{{author_{}_name}}}} {{{{author_{}_cpf}}}}", i, i))
            .collect::<Vec<_>>()
            .join(" ");
        let result = extract_placeholders(&text);
        let analysis = group_numbered_placeholders(&result.placeholders);

        let max = *indices.iter().max().unwrap();
        prop_assert_eq!(analysis.max_index.get("author"), Some(&max));
        prop_assert_eq!(analysis.entity_count("author"), indices.len());

        let expected_gaps: Vec<usize> = (1..max).filter(|i| !indices.contains(i)).collect();
        prop_assert_eq!(analysis.gaps.get("author").cloned().unwrap_or_default(), expected_gaps);
        if indices.len() >= 2 {
            prop_assert_eq!(
                analysis.common_fields.get("author"),
                Some(&vec!["cpf".to_string(), "name".to_string()])
            );
        }
    }

    #[test]
    fn brazilian_amounts_parse_to_cents(reais in 0u64..10_000_000, cents in 0u64..100) {
        let mut grouped = String::new();
        let digits = reais.to_string();
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }
        let text = format!("R$ {},{:02}", grouped, cents);
        prop_assert_eq!(parse_amount_str(&text), Some((reais * 100 + cents) as i64));
    }
}

// ============================================================
// Scenarios
// ============================================================

#[test]
fn client_name_and_email_scenario() {
    let doc = RawDocument::from_text(
        "scenario-1",
        "Procuração.docx",
        "Eu, {{cliente_nome}}, e-mail {{cliente_email}}, nomeio meu advogado.",
    );
    let analysis = PlaceholderExtractor::new().analyze(&doc);

    assert_eq!(analysis.placeholders.len(), 2);
    assert_eq!(analysis.statistics.categories.get(&PlaceholderCategory::Client), Some(&2));
    assert_eq!(analysis.placeholders[0].inferred_type, InferredType::Text);
    assert_eq!(analysis.placeholders[1].inferred_type, InferredType::Email);
    assert!(analysis.placeholders.iter().all(|p| p.required));
}

#[test]
fn twelve_placeholders_over_three_categories_score_high() {
    let tokens = [
        "cliente_nome",
        "cliente_cpf",
        "cliente_email",
        "cliente_telefone",
        "cliente_endereco",
        "cliente_profissao",
        "numero_processo",
        "vara",
        "comarca",
        "tribunal",
        "valor_causa",
        "valor_honorarios",
    ];
    let body: Vec<String> = tokens.iter().map(|t| format!("{{{{{}}}}}", t)).collect();
    let text = format!("{} {}", filler(500 - tokens.len()), body.join(" "));
    let doc = RawDocument::from_text("scenario-2", "Petição Inicial.docx", text);
    let analysis = PlaceholderExtractor::new().analyze(&doc);

    assert_eq!(analysis.statistics.unique_count, 12);
    assert_eq!(analysis.statistics.categories.len(), 3);
    assert!(analysis.suitability.score >= 75, "score {}", analysis.suitability.score);
    assert_eq!(analysis.suitability.classification, Classification::Excellent);
}
