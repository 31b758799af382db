use crate::extractor::AnalyzerContext;
use crate::models::{KeywordAnalysis, KeywordResult, KeywordStatus};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

pub const PRIMARY_KEYWORDS: &[&str] = &["defang", "deploy", "aws", "gcp", "docker", "compose"];

/// Primary keywords shown even when they never occur.
const ALWAYS_SHOWN: usize = 3;
const HIGH_COUNT: usize = 10;
const MIN_SECONDARY_COUNT: usize = 3;
const MAX_SECONDARY: usize = 5;

static PRIMARY_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    PRIMARY_KEYWORDS
        .iter()
        .map(|keyword| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(keyword));
            (
                *keyword,
                Regex::new(&pattern).expect("keyword regex should be valid"),
            )
        })
        .collect()
});

pub struct KeywordAnalyzer;

impl KeywordAnalyzer {
    pub fn analyze(ctx: &AnalyzerContext) -> KeywordAnalysis {
        let text = ctx.text_content.to_lowercase();
        let words: Vec<&str> = text
            .split_whitespace()
            .filter(|word| word.chars().count() > 3)
            .collect();
        let total_words = words.len();

        let primary: Vec<KeywordResult> = PRIMARY_PATTERNS
            .iter()
            .enumerate()
            .filter_map(|(idx, (keyword, pattern))| {
                let count = pattern.find_iter(&ctx.text_content).count();
                (count > 0 || idx < ALWAYS_SHOWN).then(|| KeywordResult {
                    keyword: keyword.to_string(),
                    count,
                    density: density(count, total_words),
                    status: status_for(count),
                })
            })
            .collect();

        let secondary = secondary_keywords(&words, total_words);

        let mut suggestions = Vec::new();
        if !primary
            .iter()
            .any(|result| result.keyword == "deploy" && result.count > 0)
        {
            suggestions.push("deployment".to_string());
        }
        for term in ["cloud", "container"] {
            if !text.contains(term) {
                suggestions.push(term.to_string());
            }
        }

        let overall_density: f64 = primary.iter().map(|result| result.density).sum();

        KeywordAnalysis {
            primary,
            secondary,
            suggestions,
            overall_density,
        }
    }
}

/// Occurrences as a percentage of qualifying tokens.
pub fn density(count: usize, total_words: usize) -> f64 {
    if total_words == 0 {
        return 0.0;
    }
    count as f64 * 100.0 / total_words as f64
}

fn status_for(count: usize) -> KeywordStatus {
    match count {
        0 => KeywordStatus::Low,
        c if c > HIGH_COUNT => KeywordStatus::High,
        _ => KeywordStatus::Good,
    }
}

/// Most frequent non-primary words, ties broken by first appearance.
fn secondary_keywords(words: &[&str], total_words: usize) -> Vec<KeywordResult> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();

    for word in words {
        let clean: String = word.chars().filter(|c| c.is_ascii_lowercase()).collect();
        if clean.len() <= 4 || PRIMARY_KEYWORDS.contains(&clean.as_str()) {
            continue;
        }

        let count = counts.entry(clean.clone()).or_insert(0);
        if *count == 0 {
            first_seen.push(clean);
        }
        *count += 1;
    }

    let mut frequent: Vec<(String, usize)> = first_seen
        .into_iter()
        .filter_map(|word| {
            let count = counts.get(&word).copied().unwrap_or(0);
            (count >= MIN_SECONDARY_COUNT).then_some((word, count))
        })
        .collect();
    // Stable sort keeps first-seen order among equal counts
    frequent.sort_by(|a, b| b.1.cmp(&a.1));

    frequent
        .into_iter()
        .take(MAX_SECONDARY)
        .map(|(keyword, count)| KeywordResult {
            keyword,
            count,
            density: density(count, total_words),
            status: KeywordStatus::Good,
        })
        .collect()
}
