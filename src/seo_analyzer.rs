use crate::brand_analyzer::BrandAnalyzer;
use crate::content_analyzer::ContentAnalyzer;
use crate::error::AnalyzeError;
use crate::extractor::AnalyzerContext;
use crate::keyword_analyzer::KeywordAnalyzer;
use crate::models::{AnalyzeRequest, Categories, SeoAnalysisResult};
use crate::scoring::{overall_score, score_label};
use crate::technical_analyzer::TechnicalAnalyzer;
use crate::url_analyzer::UrlAnalyzer;
use chrono::{SecondsFormat, Utc};
use std::panic::{self, AssertUnwindSafe};

pub struct SeoAnalyzer;

impl SeoAnalyzer {
    /// Runs every analyzer over the request and assembles the scored result.
    ///
    /// Input problems come back as input errors. A fault inside an analyzer is
    /// reported as [`AnalyzeError::Internal`] and no partial result is returned.
    pub fn analyze(request: &AnalyzeRequest) -> Result<SeoAnalysisResult, AnalyzeError> {
        if request.content.is_empty() {
            return Err(AnalyzeError::MissingContent);
        }

        panic::catch_unwind(AssertUnwindSafe(|| Self::run_pipeline(request))).map_err(|payload| {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::error!(reason = %reason, "SEO analysis aborted");
            AnalyzeError::Internal(reason)
        })
    }

    fn run_pipeline(request: &AnalyzeRequest) -> SeoAnalysisResult {
        let ctx = AnalyzerContext::from_request(request);
        tracing::debug!(
            content_type = %ctx.content_type,
            words = ctx.word_count,
            links = ctx.links.len(),
            headings = ctx.headings.len(),
            images = ctx.images.len(),
            "Built analyzer context"
        );

        let urls = UrlAnalyzer::analyze(&ctx);
        let content = ContentAnalyzer::analyze(&ctx);
        let technical = TechnicalAnalyzer::analyze(&ctx);
        let defang = BrandAnalyzer::analyze(&ctx);
        let keywords = KeywordAnalyzer::analyze(&ctx);

        let mut issues = urls.issues;
        issues.extend(content.issues);
        issues.extend(technical.issues);
        issues.extend(defang.issues);

        let score = overall_score(
            &urls.category,
            &content.category,
            &technical.category,
            &defang.category,
        );

        tracing::info!(
            score,
            urls = urls.category.score,
            content = content.category.score,
            technical = technical.category.score,
            defang = defang.category.score,
            issues = issues.len(),
            "SEO analysis complete"
        );

        SeoAnalysisResult {
            overall_score: score,
            score_label: score_label(score).to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            categories: Categories {
                urls: urls.category,
                content: content.category,
                technical: technical.category,
                defang: defang.category,
            },
            issues,
            url_validation: urls.url_results,
            keywords,
        }
    }
}
