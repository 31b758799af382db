use crate::approved_urls::{is_approved_url, is_brand_domain, suggest_replacement};
use crate::extractor::AnalyzerContext;
use crate::models::{
    CategoryResult, CheckResult, IssueCategory, IssueSeverity, Location, SeoIssue, UrlStatus,
    UrlValidationResult,
};
use crate::scoring::{URL_WEIGHTS, score_category};

const MIN_INTERNAL_LINKS: usize = 3;

#[derive(Debug, Clone)]
pub struct UrlAnalysis {
    pub category: CategoryResult,
    pub issues: Vec<SeoIssue>,
    pub url_results: Vec<UrlValidationResult>,
}

pub struct UrlAnalyzer;

impl UrlAnalyzer {
    pub fn analyze(ctx: &AnalyzerContext) -> UrlAnalysis {
        let mut checks = Vec::new();
        let mut issues = Vec::new();
        let mut url_results = Vec::with_capacity(ctx.links.len());

        // Every link gets a placeholder result; network validation happens separately
        for link in &ctx.links {
            let approved = is_approved_url(&link.url);
            url_results.push(UrlValidationResult {
                url: link.url.clone(),
                status: UrlStatus::Skipped,
                status_code: None,
                redirect_to: None,
                response_time: None,
                error: None,
                is_approved_defang_url: approved,
                is_external: link.is_external,
            });

            if is_brand_domain(&link.url) && !approved {
                let mut issue = SeoIssue::new(
                    format!("unapproved-url-{}", url_results.len()),
                    IssueSeverity::Error,
                    IssueCategory::Urls,
                    "Unapproved Defang URL",
                    format!("URL \"{}\" is not in the approved list", link.url),
                );
                issue.current_value = Some(link.url.clone());
                issue.suggested_value = suggest_replacement(&link.url);
                issues.push(issue);
            }
        }

        // HTTPS
        let http_links: Vec<_> = ctx
            .links
            .iter()
            .filter(|link| link.url.starts_with("http://"))
            .collect();
        checks.push(CheckResult::new(
            "uses-https",
            "Uses HTTPS",
            http_links.is_empty(),
            IssueSeverity::Error,
            if http_links.is_empty() {
                "All URLs use HTTPS".to_string()
            } else {
                format!("{} URL(s) use insecure HTTP", http_links.len())
            },
        ));
        for (idx, link) in http_links.iter().enumerate() {
            let mut issue = SeoIssue::new(
                format!("http-url-{}", idx),
                IssueSeverity::Error,
                IssueCategory::Urls,
                "Insecure HTTP URL",
                format!("URL uses HTTP instead of HTTPS: {}", link.url),
            );
            issue.current_value = Some(link.url.clone());
            issue.suggested_value = Some(link.url.replacen("http://", "https://", 1));
            issue.auto_fixable = true;
            issue.fix_action = Some("replace".to_string());
            issue.location = link.line.map(|line| Location { line, column: 0 });
            issues.push(issue);
        }

        // rel="noopener" on external links
        let missing_noopener = ctx
            .links
            .iter()
            .filter(|link| link.is_external && !link.has_noopener)
            .count();
        checks.push(CheckResult::new(
            "external-noopener",
            "External Links Security",
            missing_noopener == 0,
            IssueSeverity::Warning,
            if missing_noopener == 0 {
                "All external links have rel='noopener'".to_string()
            } else {
                format!(
                    "{} external link(s) missing rel='noopener'",
                    missing_noopener
                )
            },
        ));

        // Internal linking
        let internal = ctx.links.iter().filter(|link| !link.is_external).count();
        let enough_internal = internal >= MIN_INTERNAL_LINKS;
        checks.push(CheckResult::new(
            "internal-links",
            "Internal Links",
            enough_internal,
            IssueSeverity::Info,
            if enough_internal {
                format!("Good internal linking ({} links)", internal)
            } else {
                format!(
                    "Consider adding more internal links (currently: {})",
                    internal
                )
            },
        ));
        if !enough_internal {
            issues.push(SeoIssue::new(
                "low-internal-links",
                IssueSeverity::Info,
                IssueCategory::Urls,
                "Low Internal Links",
                "Consider adding more links to other Defang documentation pages",
            ));
        }

        // Approved Defang URLs only
        let unapproved = ctx
            .links
            .iter()
            .filter(|link| is_brand_domain(&link.url) && !is_approved_url(&link.url))
            .count();
        checks.push(CheckResult::new(
            "approved-defang-urls",
            "Approved Defang URLs",
            unapproved == 0,
            IssueSeverity::Error,
            if unapproved == 0 {
                "All Defang URLs are from the approved list".to_string()
            } else {
                format!("{} unapproved Defang URL(s) found", unapproved)
            },
        ));

        UrlAnalysis {
            category: score_category("URL Validation", URL_WEIGHTS, checks),
            issues,
            url_results,
        }
    }
}
