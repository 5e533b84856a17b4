//! Template suitability scoring
//!
//! | criterion          | points | rule                                   |
//! |--------------------|--------|----------------------------------------|
//! | placeholder count  | 30     | >=10 -> 30, 5-9 -> 20, 1-4 -> 10       |
//! | category diversity | 25     | >=3 -> 25, 2 -> 15, 1 -> 5             |
//! | density per 100 w. | 20     | [2,10] -> 20, [1,2) or (10,15] -> 10   |
//! | structure          | 15     | any placeholder present                |
//! | length             | 10     | [100,2000] -> 10, [50,100) or (2000,5000] -> 5 |

use shared_types::{Classification, ScoreBreakdown, SuitabilityAssessment};

pub const MAX_SCORE: u8 = 100;
pub const SUITABLE_THRESHOLD: u8 = 40;

/// Measurements the score is computed from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuitabilityInputs {
    pub unique_count: usize,
    pub category_count: usize,
    pub density_per_100_words: f64,
    pub word_count: usize,
}

/// Occurrences per hundred words; zero for an empty document
pub fn density_per_100_words(total_count: usize, word_count: usize) -> f64 {
    if word_count == 0 {
        return 0.0;
    }
    total_count as f64 / word_count as f64 * 100.0
}

fn count_points(unique: usize) -> u8 {
    match unique {
        0 => 0,
        1..=4 => 10,
        5..=9 => 20,
        _ => 30,
    }
}

fn diversity_points(categories: usize) -> u8 {
    match categories {
        0 => 0,
        1 => 5,
        2 => 15,
        _ => 25,
    }
}

fn density_points(density: f64) -> u8 {
    if (2.0..=10.0).contains(&density) {
        20
    } else if (1.0..2.0).contains(&density) || (density > 10.0 && density <= 15.0) {
        10
    } else {
        0
    }
}

fn length_points(words: usize) -> u8 {
    match words {
        100..=2000 => 10,
        50..=99 | 2001..=5000 => 5,
        _ => 0,
    }
}

pub fn assess_suitability(inputs: &SuitabilityInputs) -> SuitabilityAssessment {
    let breakdown = ScoreBreakdown {
        placeholder_count: count_points(inputs.unique_count),
        category_diversity: diversity_points(inputs.category_count),
        density: density_points(inputs.density_per_100_words),
        structure: if inputs.unique_count > 0 { 15 } else { 0 },
        length: length_points(inputs.word_count),
    };
    let score = breakdown.total().min(MAX_SCORE);

    let (reasons, recommendations) = explain(inputs, &breakdown);

    SuitabilityAssessment {
        score,
        percentage: (score as f64 / MAX_SCORE as f64 * 1000.0).round() / 10.0,
        classification: Classification::from_score(score),
        suitable: score >= SUITABLE_THRESHOLD,
        reasons,
        recommendations,
        breakdown,
    }
}

fn explain(inputs: &SuitabilityInputs, breakdown: &ScoreBreakdown) -> (Vec<String>, Vec<String>) {
    let mut reasons = Vec::new();
    let mut recommendations = Vec::new();

    if inputs.unique_count == 0 {
        reasons.push("No placeholders found".to_string());
        recommendations.push(
            "Mark the variable parts of the text with a placeholder syntax such as {{client_name}}"
                .to_string(),
        );
    } else {
        reasons.push(format!("Found {} unique placeholders", inputs.unique_count));
        if breakdown.placeholder_count < 30 {
            recommendations.push("Add placeholders until at least 10 distinct fields are covered".to_string());
        }
    }

    if inputs.category_count > 0 {
        reasons.push(format!("Placeholders span {} categories", inputs.category_count));
    }
    if inputs.category_count > 0 && breakdown.category_diversity < 25 {
        recommendations.push(
            "Cover more field categories (client, legal, financial, dates)".to_string(),
        );
    }

    let density = inputs.density_per_100_words;
    match breakdown.density {
        20 => reasons.push(format!("Placeholder density of {:.1} per 100 words is ideal", density)),
        _ if inputs.unique_count == 0 => {}
        _ if density < 2.0 => recommendations.push(format!(
            "Placeholder density is low ({:.1} per 100 words); parametrize more of the text",
            density
        )),
        _ => recommendations.push(format!(
            "Placeholder density is high ({:.1} per 100 words); the document may be mostly blanks",
            density
        )),
    }

    match breakdown.length {
        10 => reasons.push(format!("Document length of {} words suits a template", inputs.word_count)),
        _ if inputs.word_count < 100 => {
            recommendations.push(format!("Document is short ({} words)", inputs.word_count))
        }
        _ => recommendations.push(format!(
            "Document is long ({} words); consider splitting it",
            inputs.word_count
        )),
    }

    (reasons, recommendations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(unique: usize, categories: usize, density: f64, words: usize) -> SuitabilityInputs {
        SuitabilityInputs {
            unique_count: unique,
            category_count: categories,
            density_per_100_words: density,
            word_count: words,
        }
    }

    #[test]
    fn test_perfect_score() {
        let assessment = assess_suitability(&inputs(12, 3, density_per_100_words(20, 500), 500));
        assert_eq!(assessment.score, 100);
        assert_eq!(assessment.classification, Classification::Excellent);
        assert!(assessment.suitable);
        assert!(assessment.recommendations.is_empty());
    }

    #[test]
    fn test_no_placeholders_is_unsuitable() {
        let assessment = assess_suitability(&inputs(0, 0, 0.0, 500));
        assert_eq!(assessment.score, 10);
        assert_eq!(assessment.classification, Classification::Unsuitable);
        assert!(!assessment.suitable);
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(density_points(2.0), 20);
        assert_eq!(density_points(10.0), 20);
        assert_eq!(density_points(1.0), 10);
        assert_eq!(density_points(15.0), 10);
        assert_eq!(density_points(15.1), 0);
        assert_eq!(length_points(50), 5);
        assert_eq!(length_points(2001), 5);
        assert_eq!(length_points(5001), 0);
        assert_eq!(count_points(4), 10);
        assert_eq!(count_points(5), 20);
    }

    #[test]
    fn test_density_of_empty_document() {
        assert_eq!(density_per_100_words(3, 0), 0.0);
    }
}
