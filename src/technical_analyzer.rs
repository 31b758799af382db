use crate::extractor::AnalyzerContext;
use crate::models::{CategoryAnalysis, CheckResult, ContentType, IssueCategory, IssueSeverity, SeoIssue};
use crate::scoring::{TECHNICAL_WEIGHTS, score_category};
use once_cell::sync::Lazy;
use regex::Regex;

static SCHEMA_MICRODATA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"itemtype=["'][^"']*BlogPosting"#).expect("microdata regex should be valid")
});
static SCHEMA_JSON_LD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""@type"\s*:\s*"BlogPosting""#).expect("json-ld regex should be valid")
});
static SEMANTIC_HTML: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<(article|section|header|nav|aside)\b").expect("semantic regex should be valid")
});

/// Tags that must never appear in published blog content.
pub const DISALLOWED_TAGS: &[&str] = &["script", "iframe", "object", "embed"];

static DISALLOWED_TAG_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    DISALLOWED_TAGS
        .iter()
        .map(|tag| {
            let pattern = format!(r"(?i)<{}[\s>]", tag);
            (
                *tag,
                Regex::new(&pattern).expect("disallowed tag regex should be valid"),
            )
        })
        .collect()
});

pub struct TechnicalAnalyzer;

impl TechnicalAnalyzer {
    pub fn analyze(ctx: &AnalyzerContext) -> CategoryAnalysis {
        let mut checks = Vec::new();
        let mut issues = Vec::new();
        let is_markdown = ctx.content_type == ContentType::Markdown;

        // Structured data is added later, when Markdown is converted to HTML
        let has_schema = !is_markdown
            && (SCHEMA_MICRODATA.is_match(&ctx.content) || SCHEMA_JSON_LD.is_match(&ctx.content));
        checks.push(CheckResult::new(
            "schema-blogposting",
            "Schema.org Markup",
            has_schema || is_markdown,
            IssueSeverity::Warning,
            if is_markdown {
                "Schema.org markup will be added when converting to HTML"
            } else if has_schema {
                "Has Schema.org BlogPosting markup"
            } else {
                "Missing Schema.org BlogPosting markup"
            },
        ));

        let has_og_title = ctx
            .metadata()
            .and_then(|meta| meta.og_title.as_deref())
            .is_some_and(|title| !title.is_empty());
        checks.push(CheckResult::new(
            "og-title",
            "Open Graph Title",
            has_og_title,
            IssueSeverity::Warning,
            if has_og_title {
                "Has Open Graph title"
            } else {
                "Missing Open Graph title"
            },
        ));
        if !has_og_title {
            issues.push(SeoIssue::new(
                "og-title",
                IssueSeverity::Warning,
                IssueCategory::Technical,
                "Missing Open Graph Title",
                "Add an ogTitle for better social sharing",
            ));
        }

        // Informational only: no issue even when missing
        let has_og_description = ctx
            .metadata()
            .and_then(|meta| meta.og_description.as_deref())
            .is_some_and(|description| !description.is_empty());
        checks.push(CheckResult::new(
            "og-description",
            "Open Graph Description",
            has_og_description,
            IssueSeverity::Warning,
            if has_og_description {
                "Has Open Graph description"
            } else {
                "Missing Open Graph description"
            },
        ));

        let uses_semantic_html = is_markdown || SEMANTIC_HTML.is_match(&ctx.content);
        checks.push(CheckResult::new(
            "semantic-html",
            "Semantic HTML",
            uses_semantic_html,
            IssueSeverity::Info,
            if is_markdown {
                "Semantic HTML will be added when converting to HTML"
            } else if uses_semantic_html {
                "Uses semantic HTML elements"
            } else {
                "Consider using semantic HTML (article, section, etc.)"
            },
        ));

        let found: Vec<&str> = DISALLOWED_TAG_PATTERNS
            .iter()
            .filter(|(_, pattern)| pattern.is_match(&ctx.content))
            .map(|(tag, _)| *tag)
            .collect();
        checks.push(CheckResult::new(
            "no-disallowed-tags",
            "No Disallowed Tags",
            found.is_empty(),
            IssueSeverity::Error,
            if found.is_empty() {
                "No disallowed tags found".to_string()
            } else {
                format!("Found disallowed tags: {}", found.join(", "))
            },
        ));
        if !found.is_empty() {
            issues.push(SeoIssue::new(
                "disallowed-tags",
                IssueSeverity::Error,
                IssueCategory::Technical,
                "Disallowed Tags Found",
                format!("Remove these tags: {}", found.join(", ")),
            ));
        }

        CategoryAnalysis {
            category: score_category("Technical SEO", TECHNICAL_WEIGHTS, checks),
            issues,
        }
    }
}
