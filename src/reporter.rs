use crate::models::{
    CategoryResult, IssueSeverity, ReportSummary, SeoAnalysisResult, SeoReport, UrlStatus,
};
use anyhow::{Context, Result};
use colored::*;
use std::fs::File;
use std::io::Write;

pub struct Reporter;

impl Reporter {
    pub fn generate_report(source: &str, result: SeoAnalysisResult) -> SeoReport {
        let summary = Self::calculate_summary(&result);

        SeoReport {
            source: source.to_string(),
            result,
            summary,
        }
    }

    fn calculate_summary(result: &SeoAnalysisResult) -> ReportSummary {
        let mut errors = 0;
        let mut warnings = 0;
        let mut infos = 0;

        for issue in &result.issues {
            match issue.severity {
                IssueSeverity::Error => errors += 1,
                IssueSeverity::Warning => warnings += 1,
                IssueSeverity::Info => infos += 1,
            }
        }

        let categories = Self::categories(result);
        let total_checks: usize = categories.iter().map(|c| c.total).sum();
        let failed_checks: usize = categories.iter().map(|c| c.total - c.passed).sum();

        let count_status = |status: UrlStatus| {
            result
                .url_validation
                .iter()
                .filter(|url| url.status == status)
                .count()
        };

        ReportSummary {
            total_checks,
            failed_checks,
            total_links: result.url_validation.len(),
            invalid_links: count_status(UrlStatus::Invalid),
            redirected_links: count_status(UrlStatus::Redirect),
            errors,
            warnings,
            infos,
        }
    }

    fn categories(result: &SeoAnalysisResult) -> [&CategoryResult; 4] {
        [
            &result.categories.urls,
            &result.categories.content,
            &result.categories.technical,
            &result.categories.defang,
        ]
    }

    fn colored_score(score: u32) -> ColoredString {
        let text = score.to_string();
        match score {
            80.. => text.bright_green(),
            60..=79 => text.yellow(),
            _ => text.bright_red(),
        }
    }

    pub fn print_text_report(report: &SeoReport) {
        let result = &report.result;

        println!("\n{}", "=".repeat(80).bright_blue());
        println!("{}", "Defang SEO - Analysis Report".bright_cyan().bold());
        println!("{}", "=".repeat(80).bright_blue());
        println!();

        println!("{}: {}", "Source".bright_white().bold(), report.source);
        println!("{}: {}", "Timestamp".bright_white().bold(), result.timestamp);
        println!(
            "{}: {}/100 ({})",
            "Overall Score".bright_white().bold(),
            Self::colored_score(result.overall_score),
            result.score_label.bold()
        );
        println!();

        // Categories
        println!("{}", "Categories".bright_yellow().bold().underline());
        for category in Self::categories(result) {
            println!();
            println!(
                "  {} {}/{} ({}/{} checks passed)",
                format!("{}:", category.name).bright_white().bold(),
                category.score,
                category.max_score,
                category.passed,
                category.total
            );
            for check in &category.checks {
                let marker = if check.passed {
                    "PASS".bright_green()
                } else {
                    match check.severity {
                        IssueSeverity::Error => "FAIL".bright_red(),
                        IssueSeverity::Warning => "WARN".yellow(),
                        IssueSeverity::Info => "INFO".bright_cyan(),
                    }
                };
                println!("    [{}] {}: {}", marker, check.name, check.message);
            }
        }
        println!();

        // Summary
        println!("{}", "Summary".bright_yellow().bold().underline());
        println!(
            "  Checks Failed:   {}/{}",
            if report.summary.failed_checks > 0 {
                report.summary.failed_checks.to_string().yellow()
            } else {
                report.summary.failed_checks.to_string().bright_green()
            },
            report.summary.total_checks
        );
        println!(
            "  Links Found:     {}",
            report.summary.total_links.to_string().bright_green()
        );
        println!(
            "  Invalid Links:   {}",
            if report.summary.invalid_links > 0 {
                report.summary.invalid_links.to_string().bright_red()
            } else {
                report.summary.invalid_links.to_string().bright_green()
            }
        );
        println!(
            "  Errors:          {}",
            if report.summary.errors > 0 {
                report.summary.errors.to_string().bright_red()
            } else {
                report.summary.errors.to_string().bright_green()
            }
        );
        println!(
            "  Warnings:        {}",
            if report.summary.warnings > 0 {
                report.summary.warnings.to_string().yellow()
            } else {
                report.summary.warnings.to_string().bright_green()
            }
        );
        println!(
            "  Info:            {}",
            report.summary.infos.to_string().bright_cyan()
        );
        println!();

        // Issues
        if !result.issues.is_empty() {
            println!("{}", "Issues".bright_yellow().bold().underline());
            for issue in &result.issues {
                let severity_str = match issue.severity {
                    IssueSeverity::Error => "ERROR".bright_red(),
                    IssueSeverity::Warning => "WARN ".yellow(),
                    IssueSeverity::Info => "INFO ".bright_cyan(),
                };
                println!(
                    "  [{}] {}: {}",
                    severity_str,
                    issue.title.bright_white(),
                    issue.description
                );
                if let Some(location) = &issue.location {
                    println!("          at line {}", location.line);
                }
                if let Some(suggested) = &issue.suggested_value {
                    println!("          suggested: {}", suggested.bright_green());
                }
            }
            println!();
        }

        // Keywords
        println!("{}", "Keywords".bright_yellow().bold().underline());
        for keyword in result
            .keywords
            .primary
            .iter()
            .chain(result.keywords.secondary.iter())
        {
            println!(
                "  {:<16} {:>4}  {:>5.2}%  {:?}",
                keyword.keyword, keyword.count, keyword.density, keyword.status
            );
        }
        if !result.keywords.suggestions.is_empty() {
            println!(
                "  Suggested: {}",
                result.keywords.suggestions.join(", ").bright_cyan()
            );
        }
        println!();

        // Links
        if !result.url_validation.is_empty() {
            println!("{}", "Links".bright_yellow().bold().underline());
            for url in &result.url_validation {
                let status = match url.status {
                    UrlStatus::Valid => "VALID   ".bright_green(),
                    UrlStatus::Redirect => "REDIRECT".yellow(),
                    UrlStatus::Invalid => "INVALID ".bright_red(),
                    UrlStatus::Checking => "CHECKING".dimmed(),
                    UrlStatus::Skipped => "SKIPPED ".dimmed(),
                };
                let code = url
                    .status_code
                    .map(|code| code.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("  [{}] {:>3} {}", status, code, url.url);
                if let Some(redirect) = &url.redirect_to {
                    println!("             -> {}", redirect);
                }
                if let Some(error) = &url.error {
                    println!("             {}", error.bright_red());
                }
            }
            println!();
        }

        println!("{}", "=".repeat(80).bright_blue());
    }

    pub fn save_json_report(report: &SeoReport, filename: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        let mut file = File::create(filename)
            .with_context(|| format!("Failed to create report file: {}", filename))?;
        file.write_all(json.as_bytes())?;
        println!("Report saved to: {}", filename.bright_green());
        Ok(())
    }
}
