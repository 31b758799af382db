use crate::extractor::AnalyzerContext;
use crate::models::{
    CategoryAnalysis, CheckResult, IssueCategory, IssueSeverity, Location, SeoIssue,
};
use crate::scoring::{CONTENT_WEIGHTS, score_category};
use once_cell::sync::Lazy;
use regex::Regex;

static TLDR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)tl;?dr|summary|key takeaway").expect("tl;dr regex should be valid")
});
static CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<pre|<code|```").expect("code regex should be valid"));
static SENTENCE_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("sentence regex should be valid"));

const TITLE_RANGE: (usize, usize) = (50, 60);
const DESCRIPTION_RANGE: (usize, usize) = (150, 160);
const MIN_WORDS: usize = 500;
const THIN_WORDS: usize = 300;
const MAX_AVG_SENTENCE_WORDS: f64 = 20.0;

pub struct ContentAnalyzer;

impl ContentAnalyzer {
    pub fn analyze(ctx: &AnalyzerContext) -> CategoryAnalysis {
        let mut checks = Vec::new();
        let mut issues = Vec::new();

        let title = ctx
            .metadata()
            .and_then(|meta| meta.title.clone())
            .unwrap_or_default();
        Self::check_length(
            &mut checks,
            &mut issues,
            LengthRule {
                id: "title-length",
                name: "Title Length",
                issue_title: "Title Length Issue",
                label: "Title",
                missing: "Missing meta title",
                range: TITLE_RANGE,
            },
            &title,
        );

        let description = ctx
            .metadata()
            .and_then(|meta| meta.description.clone())
            .unwrap_or_default();
        Self::check_length(
            &mut checks,
            &mut issues,
            LengthRule {
                id: "description-length",
                name: "Meta Description Length",
                issue_title: "Meta Description Issue",
                label: "Description",
                missing: "Missing meta description",
                range: DESCRIPTION_RANGE,
            },
            &description,
        );

        // TL;DR / summary
        let has_tldr = TLDR_REGEX.is_match(&ctx.content);
        checks.push(CheckResult::new(
            "has-tldr",
            "Has TL;DR/Summary",
            has_tldr,
            IssueSeverity::Info,
            if has_tldr {
                "Content includes a TL;DR or summary section"
            } else {
                "Consider adding a TL;DR for quick scanning"
            },
        ));
        if !has_tldr {
            issues.push(SeoIssue::new(
                "has-tldr",
                IssueSeverity::Info,
                IssueCategory::Content,
                "Missing TL;DR",
                "Adding a TL;DR helps readers quickly understand the main points",
            ));
        }

        // Word count
        let word_count = ctx.word_count;
        let word_severity = if word_count < THIN_WORDS {
            IssueSeverity::Error
        } else {
            IssueSeverity::Warning
        };
        let enough_words = word_count >= MIN_WORDS;
        checks.push(CheckResult::new(
            "word-count",
            "Word Count",
            enough_words,
            word_severity,
            if enough_words {
                format!("Good content length ({} words)", word_count)
            } else {
                format!(
                    "Content is thin ({} words, recommended: {}+)",
                    word_count, MIN_WORDS
                )
            },
        ));
        if !enough_words {
            issues.push(SeoIssue::new(
                "word-count",
                word_severity,
                IssueCategory::Content,
                "Content Too Short",
                format!(
                    "Only {} words. Consider adding more detail for better SEO.",
                    word_count
                ),
            ));
        }

        Self::check_heading_hierarchy(ctx, &mut checks, &mut issues);
        Self::check_duplicate_headings(ctx, &mut checks, &mut issues);
        Self::check_image_alt(ctx, &mut checks, &mut issues);

        // Code examples never produce an issue
        let has_code = CODE_REGEX.is_match(&ctx.content);
        checks.push(CheckResult::new(
            "has-code",
            "Code Examples",
            has_code,
            IssueSeverity::Info,
            if has_code {
                "Content includes code examples"
            } else {
                "Consider adding code examples for technical topics"
            },
        ));

        Self::check_readability(ctx, &mut checks, &mut issues);

        CategoryAnalysis {
            category: score_category("Content Quality", CONTENT_WEIGHTS, checks),
            issues,
        }
    }

    fn check_length(
        checks: &mut Vec<CheckResult>,
        issues: &mut Vec<SeoIssue>,
        rule: LengthRule,
        value: &str,
    ) {
        let (min, max) = rule.range;
        let length = value.chars().count();
        let severity = if length == 0 {
            IssueSeverity::Error
        } else {
            IssueSeverity::Warning
        };

        let message = if length == 0 {
            rule.missing.to_string()
        } else if length < min {
            format!(
                "{} too short ({} chars, recommended: {}-{})",
                rule.label, length, min, max
            )
        } else if length > max {
            format!(
                "{} too long ({} chars, recommended: {}-{})",
                rule.label, length, min, max
            )
        } else {
            format!("{} length is optimal ({} chars)", rule.label, length)
        };

        let passed = (min..=max).contains(&length);
        checks.push(
            CheckResult::new(rule.id, rule.name, passed, severity, message.clone())
                .with_details((!value.is_empty()).then(|| value.to_string())),
        );

        if !passed {
            let too_long = length > max;
            let mut issue = SeoIssue::new(
                rule.id,
                severity,
                IssueCategory::Content,
                rule.issue_title,
                message,
            );
            issue.current_value = Some(value.to_string());
            issue.suggested_value = too_long.then(|| truncate_with_ellipsis(value, max - 3));
            issue.auto_fixable = too_long;
            issue.fix_action = Some("truncate".to_string());
            issues.push(issue);
        }
    }

    fn check_heading_hierarchy(
        ctx: &AnalyzerContext,
        checks: &mut Vec<CheckResult>,
        issues: &mut Vec<SeoIssue>,
    ) {
        let levels: Vec<u8> = ctx.headings.iter().map(|heading| heading.level).collect();
        let mut message = "Heading hierarchy is valid".to_string();
        let mut valid = true;

        if let Some(pair) = levels.windows(2).find(|pair| pair[1] > pair[0] + 1) {
            valid = false;
            message = format!("Heading level skipped: H{} to H{}", pair[0], pair[1]);
        }

        let h1_count = levels.iter().filter(|level| **level == 1).count();
        if h1_count > 1 {
            valid = false;
            message = format!(
                "Multiple H1 tags found ({}). Use only one H1 per page.",
                h1_count
            );
        }

        checks.push(CheckResult::new(
            "heading-hierarchy",
            "Heading Hierarchy",
            valid,
            IssueSeverity::Error,
            message.clone(),
        ));
        if !valid {
            issues.push(SeoIssue::new(
                "heading-hierarchy",
                IssueSeverity::Error,
                IssueCategory::Content,
                "Invalid Heading Hierarchy",
                message,
            ));
        }
    }

    fn check_duplicate_headings(
        ctx: &AnalyzerContext,
        checks: &mut Vec<CheckResult>,
        issues: &mut Vec<SeoIssue>,
    ) {
        let texts: Vec<String> = ctx
            .headings
            .iter()
            .map(|heading| heading.text.trim().to_lowercase())
            .collect();
        let first_duplicate = texts
            .iter()
            .enumerate()
            .find(|(idx, text)| texts[..*idx].contains(text))
            .map(|(_, text)| text.clone());

        match first_duplicate {
            None => checks.push(CheckResult::new(
                "duplicate-headings",
                "Unique Headings",
                true,
                IssueSeverity::Warning,
                "All headings are unique",
            )),
            Some(duplicate) => {
                checks.push(CheckResult::new(
                    "duplicate-headings",
                    "Unique Headings",
                    false,
                    IssueSeverity::Warning,
                    format!("Duplicate headings found: \"{}\"", duplicate),
                ));
                issues.push(SeoIssue::new(
                    "duplicate-headings",
                    IssueSeverity::Warning,
                    IssueCategory::Content,
                    "Duplicate Headings",
                    format!("Found duplicate heading: \"{}\"", duplicate),
                ));
            }
        }
    }

    fn check_image_alt(
        ctx: &AnalyzerContext,
        checks: &mut Vec<CheckResult>,
        issues: &mut Vec<SeoIssue>,
    ) {
        let missing_alt: Vec<_> = ctx
            .images
            .iter()
            .filter(|image| image.alt.as_deref().is_none_or(|alt| alt.trim().is_empty()))
            .collect();
        let passed = missing_alt.is_empty();

        let message = if ctx.images.is_empty() {
            "No images found (consider adding visuals)".to_string()
        } else if passed {
            format!("All {} images have alt text", ctx.images.len())
        } else {
            format!("{} image(s) missing alt text", missing_alt.len())
        };

        checks.push(CheckResult::new(
            "image-alt",
            "Image Alt Text",
            passed,
            IssueSeverity::Warning,
            message,
        ));

        for (idx, image) in missing_alt.iter().enumerate() {
            let mut issue = SeoIssue::new(
                format!("image-alt-{}", idx),
                IssueSeverity::Warning,
                IssueCategory::Content,
                "Missing Image Alt Text",
                format!("Image missing alt text: {}", image.src),
            );
            issue.current_value = Some(format!("<img src=\"{}\" />", image.src));
            issue.suggested_value = Some(format!(
                "<img src=\"{}\" alt=\"Image description\" />",
                image.src
            ));
            issue.auto_fixable = true;
            issue.fix_action = Some("add-alt".to_string());
            issue.location = image.line.map(|line| Location { line, column: 0 });
            issues.push(issue);
        }
    }

    fn check_readability(
        ctx: &AnalyzerContext,
        checks: &mut Vec<CheckResult>,
        issues: &mut Vec<SeoIssue>,
    ) {
        let average = average_sentence_length(&ctx.text_content);
        let rounded = average.round() as usize;
        let readable = average <= MAX_AVG_SENTENCE_WORDS;

        checks.push(CheckResult::new(
            "readability",
            "Readability",
            readable,
            IssueSeverity::Warning,
            if readable {
                format!("Good readability (avg {} words/sentence)", rounded)
            } else {
                format!(
                    "Sentences may be too long (avg {} words, aim for <20)",
                    rounded
                )
            },
        ));
        if !readable {
            issues.push(SeoIssue::new(
                "readability",
                IssueSeverity::Warning,
                IssueCategory::Content,
                "Readability Could Be Improved",
                format!(
                    "Average sentence length is {} words. Consider breaking up long sentences.",
                    rounded
                ),
            ));
        }
    }
}

struct LengthRule {
    id: &'static str,
    name: &'static str,
    issue_title: &'static str,
    label: &'static str,
    missing: &'static str,
    range: (usize, usize),
}

/// First `keep` characters followed by `...`.
pub fn truncate_with_ellipsis(value: &str, keep: usize) -> String {
    let mut truncated: String = value.chars().take(keep).collect();
    truncated.push_str("...");
    truncated
}

/// Mean number of words per sentence, 0 when the text has no sentences.
pub fn average_sentence_length(text: &str) -> f64 {
    let sentences: Vec<&str> = SENTENCE_SPLIT
        .split(text)
        .filter(|sentence| !sentence.trim().is_empty())
        .collect();

    if sentences.is_empty() {
        return 0.0;
    }

    let words: usize = sentences
        .iter()
        .map(|sentence| sentence.split_whitespace().count())
        .sum();
    words as f64 / sentences.len() as f64
}
