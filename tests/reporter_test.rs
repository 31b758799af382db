use defang_seo::models::{
    AnalyzeRequest, IssueCategory, IssueSeverity, SeoAnalysisResult, SeoIssue, SeoReport,
    UrlStatus, UrlValidationResult,
};
use defang_seo::reporter::Reporter;
use defang_seo::seo_analyzer::SeoAnalyzer;
use std::fs;
use tempfile::tempdir;

fn analyze(content: &str, content_type: &str) -> SeoAnalysisResult {
    let request = AnalyzeRequest::new(content, content_type, None).expect("valid request");
    SeoAnalyzer::analyze(&request).expect("analysis should succeed")
}

fn create_test_issue(severity: IssueSeverity, title: &str) -> SeoIssue {
    SeoIssue::new(
        title.to_lowercase().replace(' ', "-"),
        severity,
        IssueCategory::Content,
        title,
        format!("{} description", title),
    )
}

fn create_url_result(url: &str, status: UrlStatus, status_code: Option<u16>) -> UrlValidationResult {
    UrlValidationResult {
        url: url.to_string(),
        status,
        status_code,
        redirect_to: (status == UrlStatus::Redirect).then(|| "https://example.com/new".to_string()),
        response_time: status_code.map(|_| 12),
        error: (status == UrlStatus::Invalid).then(|| "HTTP 404".to_string()),
        is_approved_defang_url: false,
        is_external: true,
    }
}

#[test]
fn test_generate_report_counts_severities() {
    let mut result = analyze("x", "markdown");
    result.issues = vec![
        create_test_issue(IssueSeverity::Error, "Error issue"),
        create_test_issue(IssueSeverity::Warning, "Warning issue"),
        create_test_issue(IssueSeverity::Warning, "Another warning"),
        create_test_issue(IssueSeverity::Info, "Info issue"),
    ];

    let report = Reporter::generate_report("post.md", result);

    assert_eq!(report.source, "post.md");
    assert_eq!(report.summary.errors, 1);
    assert_eq!(report.summary.warnings, 2);
    assert_eq!(report.summary.infos, 1);
}

#[test]
fn test_generate_report_counts_checks() {
    let result = analyze("# Title\n#### Subheading", "markdown");
    let categories = [
        &result.categories.urls,
        &result.categories.content,
        &result.categories.technical,
        &result.categories.defang,
    ];
    let total: usize = categories.iter().map(|c| c.checks.len()).sum();
    let failed: usize = categories
        .iter()
        .map(|c| c.checks.iter().filter(|check| !check.passed).count())
        .sum();

    let report = Reporter::generate_report("post.md", result);

    assert_eq!(report.summary.total_checks, total);
    assert_eq!(report.summary.total_checks, 22);
    assert_eq!(report.summary.failed_checks, failed);
    assert!(report.summary.failed_checks > 0);
}

#[test]
fn test_generate_report_counts_links() {
    let mut result = analyze("x", "markdown");
    result.url_validation = vec![
        create_url_result("https://example.com/a", UrlStatus::Valid, Some(200)),
        create_url_result("https://example.com/b", UrlStatus::Invalid, Some(404)),
        create_url_result("https://example.com/c", UrlStatus::Invalid, None),
        create_url_result("https://example.com/d", UrlStatus::Redirect, Some(301)),
        create_url_result("https://example.com/e", UrlStatus::Skipped, None),
    ];

    let report = Reporter::generate_report("post.md", result);

    assert_eq!(report.summary.total_links, 5);
    assert_eq!(report.summary.invalid_links, 2);
    assert_eq!(report.summary.redirected_links, 1);
}

#[test]
fn test_generate_report_keeps_result() {
    let result = analyze("[docs](https://docs.defang.io)", "markdown");
    let expected = result.clone();

    let report = Reporter::generate_report("post.md", result);

    assert_eq!(report.result, expected);
    assert_eq!(report.summary.total_links, 1);
    assert_eq!(report.summary.invalid_links, 0);
}

#[test]
fn test_print_text_report_with_issues() {
    let mut result = analyze(
        "<h1>A</h1><h1>B</h1><p>Deploy to DigitalOcean - now.</p><a href=\"http://example.com\">x</a>",
        "html",
    );
    result.url_validation.push(create_url_result(
        "https://example.com/moved",
        UrlStatus::Redirect,
        Some(302),
    ));
    result.url_validation.push(create_url_result(
        "https://example.com/gone",
        UrlStatus::Invalid,
        Some(404),
    ));

    let report = Reporter::generate_report("post.html", result);

    // Exercises every status and severity branch
    Reporter::print_text_report(&report);
}

#[test]
fn test_print_text_report_without_issues_or_links() {
    let mut result = analyze("x", "markdown");
    result.issues.clear();
    result.url_validation.clear();
    result.keywords.suggestions.clear();

    let report = Reporter::generate_report("post.md", result);
    Reporter::print_text_report(&report);
}

#[test]
fn test_save_json_report() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("report.json");
    let filename = path.to_str().expect("temp path should be UTF-8");

    let result = analyze("# Title\n\nSome words.", "markdown");
    let report = Reporter::generate_report("post.md", result);

    let saved = Reporter::save_json_report(&report, filename);
    assert!(saved.is_ok());

    let json_content = fs::read_to_string(&path).expect("Failed to read file");
    assert!(json_content.contains("\"overallScore\""));

    let deserialized: SeoReport =
        serde_json::from_str(&json_content).expect("Failed to deserialize");
    assert_eq!(deserialized.source, "post.md");
    assert_eq!(deserialized.result, report.result);
    assert_eq!(deserialized.summary.total_checks, 22);
}

#[test]
fn test_save_json_report_to_missing_directory_fails() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("missing").join("report.json");

    let result = analyze("x", "markdown");
    let report = Reporter::generate_report("post.md", result);

    let err = Reporter::save_json_report(&report, path.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("Failed to create report file"));
}
