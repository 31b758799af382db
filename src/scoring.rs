//! Fixed weight tables and the arithmetic that turns checks into scores.

use crate::models::{CategoryResult, CheckResult};

/// Per-check weights, keyed by check id.
pub type WeightTable = &'static [(&'static str, u32)];

pub const CONTENT_WEIGHTS: WeightTable = &[
    ("title-length", 5),
    ("description-length", 5),
    ("has-tldr", 3),
    ("word-count", 3),
    ("heading-hierarchy", 5),
    ("duplicate-headings", 2),
    ("image-alt", 4),
    ("has-code", 3),
    ("readability", 3),
];

pub const URL_WEIGHTS: WeightTable = &[
    ("uses-https", 3),
    ("external-noopener", 2),
    ("internal-links", 3),
    ("approved-defang-urls", 5),
];

pub const TECHNICAL_WEIGHTS: WeightTable = &[
    ("schema-blogposting", 4),
    ("og-title", 3),
    ("og-description", 3),
    ("semantic-html", 3),
    ("no-disallowed-tags", 5),
];

pub const BRAND_WEIGHTS: WeightTable = &[
    ("only-aws-gcp", 5),
    ("no-dashes", 3),
    ("has-cta", 3),
    ("valid-cli", 4),
];

/// Share of the overall score contributed by each category. Sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryWeights {
    pub urls: f64,
    pub content: f64,
    pub technical: f64,
    pub defang: f64,
}

pub const CATEGORY_WEIGHTS: CategoryWeights = CategoryWeights {
    urls: 0.25,
    content: 0.35,
    technical: 0.20,
    defang: 0.20,
};

/// Weight of a check, or 0 for an id the table does not know.
pub fn weight_of(table: WeightTable, id: &str) -> u32 {
    table
        .iter()
        .find(|(check_id, _)| *check_id == id)
        .map(|(_, weight)| *weight)
        .unwrap_or(0)
}

pub fn max_score(table: WeightTable) -> u32 {
    table.iter().map(|(_, weight)| weight).sum()
}

/// Folds a list of checks into a category result using the given weights.
pub fn score_category(name: &str, table: WeightTable, checks: Vec<CheckResult>) -> CategoryResult {
    let score = checks
        .iter()
        .filter(|check| check.passed)
        .map(|check| weight_of(table, &check.id))
        .sum();

    CategoryResult {
        name: name.to_string(),
        score,
        max_score: max_score(table),
        passed: checks.iter().filter(|check| check.passed).count(),
        total: checks.len(),
        checks,
    }
}

/// Percentage of the category's maximum, in `0.0..=100.0`.
pub fn percentage(category: &CategoryResult) -> f64 {
    if category.max_score == 0 {
        return 0.0;
    }
    category.score as f64 / category.max_score as f64 * 100.0
}

pub fn overall_score(
    urls: &CategoryResult,
    content: &CategoryResult,
    technical: &CategoryResult,
    defang: &CategoryResult,
) -> u32 {
    let weighted = percentage(urls) * CATEGORY_WEIGHTS.urls
        + percentage(content) * CATEGORY_WEIGHTS.content
        + percentage(technical) * CATEGORY_WEIGHTS.technical
        + percentage(defang) * CATEGORY_WEIGHTS.defang;

    weighted.round().clamp(0.0, 100.0) as u32
}

pub fn score_label(score: u32) -> &'static str {
    match score {
        90.. => "Excellent",
        80..=89 => "Good",
        70..=79 => "Fair",
        60..=69 => "Needs Work",
        _ => "Poor",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IssueSeverity;

    #[test]
    fn test_max_scores_are_fixed() {
        assert_eq!(max_score(CONTENT_WEIGHTS), 33);
        assert_eq!(max_score(URL_WEIGHTS), 13);
        assert_eq!(max_score(TECHNICAL_WEIGHTS), 18);
        assert_eq!(max_score(BRAND_WEIGHTS), 15);
    }

    #[test]
    fn test_category_weights_sum_to_one() {
        let sum = CATEGORY_WEIGHTS.urls
            + CATEGORY_WEIGHTS.content
            + CATEGORY_WEIGHTS.technical
            + CATEGORY_WEIGHTS.defang;
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_category_sums_passed_weights() {
        let checks = vec![
            CheckResult::new("uses-https", "Uses HTTPS", true, IssueSeverity::Error, "ok"),
            CheckResult::new("external-noopener", "Noopener", false, IssueSeverity::Warning, "no"),
            CheckResult::new("internal-links", "Internal", true, IssueSeverity::Info, "ok"),
            CheckResult::new("approved-defang-urls", "Approved", false, IssueSeverity::Error, "no"),
        ];

        let category = score_category("URL Validation", URL_WEIGHTS, checks);
        assert_eq!(category.score, 6);
        assert_eq!(category.max_score, 13);
        assert_eq!(category.passed, 2);
        assert_eq!(category.total, 4);
    }

    #[test]
    fn test_unknown_check_id_has_no_weight() {
        assert_eq!(weight_of(URL_WEIGHTS, "not-a-check"), 0);
    }

    #[test]
    fn test_score_labels() {
        assert_eq!(score_label(100), "Excellent");
        assert_eq!(score_label(90), "Excellent");
        assert_eq!(score_label(89), "Good");
        assert_eq!(score_label(80), "Good");
        assert_eq!(score_label(75), "Fair");
        assert_eq!(score_label(60), "Needs Work");
        assert_eq!(score_label(59), "Poor");
        assert_eq!(score_label(0), "Poor");
    }
}
