pub mod approved_urls;
pub mod brand_analyzer;
pub mod cli;
pub mod config;
pub mod content_analyzer;
pub mod error;
pub mod extractor;
pub mod http_client;
pub mod keyword_analyzer;
pub mod models;
pub mod reporter;
pub mod scoring;
pub mod seo_analyzer;
pub mod technical_analyzer;
pub mod url_analyzer;
pub mod url_validator;

use anyhow::{Context, Result};
use cli::Cli;
use colored::*;
use config::load_structured;
use models::{AnalyzeRequest, ContentType, SeoMetadata};
use reporter::Reporter;
use seo_analyzer::SeoAnalyzer;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url_validator::{UrlValidator, ValidatorConfig};

/// Infers the content type from a file extension.
pub fn detect_content_type(path: &Path) -> Option<ContentType> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "md" | "markdown" | "mdx" => Some(ContentType::Markdown),
        "html" | "htm" => Some(ContentType::Html),
        _ => None,
    }
}

pub async fn run(args: Cli) -> Result<()> {
    let text_output = args.output != "json";

    if text_output {
        println!("{}", "Defang SEO - Blog Draft Analyzer".bright_cyan().bold());
        println!("{}", "=".repeat(50).bright_blue());
        println!();
    }

    let input = Path::new(&args.input);
    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", args.input))?;

    let content_type = match &args.content_type {
        Some(explicit) => explicit.clone(),
        None => detect_content_type(input)
            .map(|ct| ct.as_str().to_string())
            .with_context(|| {
                format!(
                    "Cannot detect content type of {}; pass --content-type html|markdown",
                    args.input
                )
            })?,
    };

    let metadata: Option<SeoMetadata> = match &args.metadata {
        Some(path) => Some(
            load_structured(Path::new(path))
                .with_context(|| format!("Failed to load SEO metadata: {}", path))?,
        ),
        None => None,
    };

    if args.verbose && text_output {
        println!("{} {}", "Analyzing:".bright_white().bold(), args.input);
        println!("{} {}", "Content type:".bright_white().bold(), content_type);
        println!();
    }

    let request = AnalyzeRequest::new(content, &content_type, metadata)?;
    let mut result = SeoAnalyzer::analyze(&request)?;

    if args.validate_urls && !result.url_validation.is_empty() {
        if args.verbose && text_output {
            println!(
                "{} {} links",
                "Validating".bright_yellow(),
                result.url_validation.len()
            );
        }

        let validator = UrlValidator::with_config(ValidatorConfig {
            timeout: Duration::from_secs(args.timeout),
            concurrent_requests: args.concurrency,
            requests_per_second: args.rate_limit,
            show_progress: text_output,
        })?;

        let urls: Vec<String> = result
            .url_validation
            .iter()
            .map(|entry| entry.url.clone())
            .collect();
        result.url_validation = validator.validate_all(&urls).await;
    }

    let report = Reporter::generate_report(&args.input, result);

    match args.output.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&report)?;
            println!("{}", json);
        }
        _ => {
            Reporter::print_text_report(&report);
        }
    }

    if let Some(filename) = args.save {
        Reporter::save_json_report(&report, &filename)?;
    }

    Ok(())
}
