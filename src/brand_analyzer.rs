//! Defang brand guidelines: which providers may be mentioned, punctuation style,
//! calls to action, and CLI usage.

use crate::extractor::AnalyzerContext;
use crate::models::{CategoryAnalysis, CheckResult, IssueCategory, IssueSeverity, SeoIssue};
use crate::scoring::{BRAND_WEIGHTS, score_category};
use once_cell::sync::Lazy;
use regex::Regex;

/// Providers and platforms blog content must not mention.
pub const FORBIDDEN_PROVIDERS: &[&str] = &["DigitalOcean", "Azure", "Playground", "Heroku"];

/// Subcommands a `defang <subcommand>` token may use.
pub const VALID_CLI_COMMANDS: &[&str] = &[
    "compose", "config", "generate", "login", "logout", "logs", "debug", "whoami", "upgrade",
];

static FORBIDDEN_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    FORBIDDEN_PROVIDERS
        .iter()
        .map(|name| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(name));
            (
                *name,
                Regex::new(&pattern).expect("provider regex should be valid"),
            )
        })
        .collect()
});
static DASH_IN_PROSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)\s[-\x{2013}\x{2014}]\s|^[-\x{2013}\x{2014}]\s|\s[-\x{2013}\x{2014}]$")
        .expect("dash regex should be valid")
});
static DEFANG_MENTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)defang\.io|portal\.defang|docs\.defang").expect("domain regex should be valid")
});
static CTA_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)get started|try|deploy|sign up|learn more").expect("cta regex should be valid")
});
static CLI_COMMAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"defang\s+([A-Za-z0-9_]+)").expect("cli regex should be valid")
});

pub struct BrandAnalyzer;

impl BrandAnalyzer {
    pub fn analyze(ctx: &AnalyzerContext) -> CategoryAnalysis {
        let mut checks = Vec::new();
        let mut issues = Vec::new();

        // Only AWS and GCP
        let forbidden: Vec<&str> = FORBIDDEN_PATTERNS
            .iter()
            .filter(|(_, pattern)| pattern.is_match(&ctx.text_content))
            .map(|(name, _)| *name)
            .collect();
        checks.push(CheckResult::new(
            "only-aws-gcp",
            "Only AWS/GCP Providers",
            forbidden.is_empty(),
            IssueSeverity::Error,
            if forbidden.is_empty() {
                "Only mentions AWS and GCP".to_string()
            } else {
                format!("Found forbidden providers: {}", forbidden.join(", "))
            },
        ));
        for name in &forbidden {
            issues.push(SeoIssue::new(
                format!("forbidden-provider-{}", name),
                IssueSeverity::Error,
                IssueCategory::Defang,
                format!("Forbidden Provider: {}", name),
                format!(
                    "Remove mentions of {}. Only AWS and GCP should be mentioned.",
                    name
                ),
            ));
        }

        // Dashes used as punctuation
        let has_dashes = DASH_IN_PROSE.is_match(&ctx.text_content);
        checks.push(CheckResult::new(
            "no-dashes",
            "No Dashes in Prose",
            !has_dashes,
            IssueSeverity::Warning,
            if has_dashes {
                "Found dashes used as punctuation. Use colons, commas, or periods instead."
            } else {
                "No dashes used as punctuation"
            },
        ));
        if has_dashes {
            issues.push(SeoIssue::new(
                "dashes-in-prose",
                IssueSeverity::Warning,
                IssueCategory::Defang,
                "Dashes in Prose",
                "Replace em-dashes and en-dashes with colons, commas, or separate sentences",
            ));
        }

        // Call to action
        let has_cta =
            DEFANG_MENTION.is_match(&ctx.content) && CTA_PHRASE.is_match(&ctx.text_content);
        checks.push(CheckResult::new(
            "has-cta",
            "Has Defang CTA",
            has_cta,
            IssueSeverity::Info,
            if has_cta {
                "Content includes a call-to-action"
            } else {
                "Consider adding a call-to-action to Defang"
            },
        ));
        if !has_cta {
            issues.push(SeoIssue::new(
                "missing-cta",
                IssueSeverity::Info,
                IssueCategory::Defang,
                "Missing Call-to-Action",
                "Add a CTA linking to Defang portal, docs, or Discord",
            ));
        }

        let invalid = invalid_cli_commands(&ctx.content);
        checks.push(CheckResult::new(
            "valid-cli",
            "Valid CLI Commands",
            invalid.is_empty(),
            IssueSeverity::Error,
            if invalid.is_empty() {
                "All CLI commands appear valid".to_string()
            } else {
                format!("Potentially invalid CLI commands: {}", invalid.join(", "))
            },
        ));
        if !invalid.is_empty() {
            issues.push(SeoIssue::new(
                "invalid-cli",
                IssueSeverity::Error,
                IssueCategory::Defang,
                "Invalid CLI Commands",
                format!("Check these commands: {}", invalid.join(", ")),
            ));
        }

        CategoryAnalysis {
            category: score_category("Defang Guidelines", BRAND_WEIGHTS, checks),
            issues,
        }
    }
}

/// Every `defang <word>` token whose subcommand is not whitelisted, in document order.
pub fn invalid_cli_commands(content: &str) -> Vec<String> {
    CLI_COMMAND
        .captures_iter(content)
        .filter(|caps| !VALID_CLI_COMMANDS.contains(&&caps[1]))
        .map(|caps| caps[0].to_string())
        .collect()
}
