pub mod aismell;
pub mod catalog;
pub mod fixer;
pub mod html;
pub mod report;
pub mod scanner;
pub mod seo;
pub mod textutil;

pub use catalog::{PatternCatalog, SourcePolicy};
pub use report::AggregationMode;

use shared_types::{
    AiSmellReport, FixResult, QualityReport, ReviewError, ScoreComponent, Violation,
};

/// ReviewEngine entry point. Owns a compiled rule catalog; all checks are
/// pure functions of their text inputs once the catalog is built.
pub struct ReviewEngine {
    catalog: PatternCatalog,
}

impl ReviewEngine {
    /// Engine over the built-in rule catalog.
    pub fn new() -> Result<Self, ReviewError> {
        Ok(Self {
            catalog: PatternCatalog::builtin()?,
        })
    }

    /// Engine over the built-in catalog with an explicit trusted-source
    /// policy.
    pub fn with_policy(policy: SourcePolicy) -> Result<Self, ReviewError> {
        Ok(Self {
            catalog: PatternCatalog::builtin_with_policy(policy)?,
        })
    }

    /// Engine over a caller-supplied catalog.
    pub fn with_catalog(catalog: PatternCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    /// Run the legal rule catalog over plain text.
    pub fn scan_violations(&self, text: &str) -> Result<Vec<Violation>, ReviewError> {
        tracing::debug!(chars = text.chars().count(), "scanning for violations");
        scanner::scan(text, self.catalog.rules())
    }

    /// Score naturalness of (possibly generated) copy.
    pub fn detect_ai_smell(&self, text: &str) -> Result<AiSmellReport, ReviewError> {
        tracing::debug!(chars = text.chars().count(), "detecting ai smell");
        aismell::detect(text)
    }

    /// Score on-page SEO for a title/body/keyword triple. The body may be
    /// HTML.
    pub fn score_seo(
        &self,
        title: &str,
        body_html: &str,
        keyword: &str,
    ) -> Result<ScoreComponent, ReviewError> {
        tracing::debug!(keyword, "scoring seo");
        seo::score(title, body_html, keyword)
    }

    /// Apply the automatic rewrite passes to plain text.
    pub fn auto_fix(&self, text: &str) -> Result<FixResult, ReviewError> {
        tracing::debug!(chars = text.chars().count(), "auto-fixing");
        fixer::fix(text)
    }

    /// Full quality report with no fact-check input.
    pub fn build_report(
        &self,
        body_html: &str,
        title: &str,
        keyword: &str,
    ) -> Result<QualityReport, ReviewError> {
        self.build_report_with_fact_check(body_html, title, keyword, None)
    }

    /// Full quality report. The body is stripped of HTML before the text
    /// scanners run; an absent fact-check score counts as fully passing.
    pub fn build_report_with_fact_check(
        &self,
        body_html: &str,
        title: &str,
        keyword: &str,
        fact_check_score: Option<u8>,
    ) -> Result<QualityReport, ReviewError> {
        tracing::debug!(keyword, fact_check = ?fact_check_score, "building report");
        let text = html::html_to_text(body_html);
        let violations = scanner::scan(&text, self.catalog.rules())?;
        let ai_smell = aismell::detect(&text)?;
        let seo = seo::score(title, body_html, keyword)?;
        Ok(report::aggregate(
            &violations,
            &ai_smell,
            &seo,
            fact_check_score,
            AggregationMode::FullReport,
        ))
    }

    /// Lightweight score for a live editing panel: mean of AI smell and
    /// SEO, no legal component.
    pub fn preview_score(
        &self,
        body_html: &str,
        title: &str,
        keyword: &str,
    ) -> Result<QualityReport, ReviewError> {
        tracing::debug!(keyword, "building preview score");
        let text = html::html_to_text(body_html);
        let violations = scanner::scan(&text, self.catalog.rules())?;
        let ai_smell = aismell::detect(&text)?;
        let seo = seo::score(title, body_html, keyword)?;
        Ok(report::aggregate(
            &violations,
            &ai_smell,
            &seo,
            None,
            AggregationMode::LivePreview,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::Severity;

    #[test]
    fn test_engine_builds_with_builtin_catalog() {
        let engine = ReviewEngine::new().unwrap();
        assert!(!engine.catalog().is_empty());
    }

    #[test]
    fn test_build_report_strips_html_before_scanning() {
        let engine = ReviewEngine::new().unwrap();
        let body = "<p>본원은 100% 완치를 약속합니다.</p>";
        let report = engine
            .build_report(body, "치료 안내", "치료")
            .unwrap();
        assert!(report
            .components
            .medical_law
            .issues
            .iter()
            .any(|i| i.contains("완치")));
        assert!(report.overall_score < 100);
    }

    #[test]
    fn test_preview_score_is_mean_of_ai_and_seo() {
        let engine = ReviewEngine::new().unwrap();
        let body = "<p>완치를 보장합니다. 임플란트 상담 안내.</p>";
        let preview = engine.preview_score(body, "임플란트 안내", "임플란트").unwrap();
        let expected = (f64::from(preview.components.ai_smell.value) / 2.0
            + f64::from(preview.components.seo.value) / 2.0)
            .round() as u8;
        assert_eq!(preview.overall_score, expected);
        // The critical violation is still reported, just not weighted in.
        assert!(preview.components.medical_law.value < 100);
    }

    #[test]
    fn test_scan_violations_orders_by_severity() {
        let engine = ReviewEngine::new().unwrap();
        let violations = engine
            .scan_violations("완치 보장, 선착순 할인 이벤트!")
            .unwrap();
        assert_eq!(violations[0].severity, Severity::Critical);
    }

    #[test]
    fn test_with_policy_forbidden_mention_changes_results() {
        let engine = ReviewEngine::with_policy(SourcePolicy::ForbiddenMention).unwrap();
        let violations = engine
            .scan_violations("보건복지부가 인증한 병원입니다")
            .unwrap();
        assert!(violations
            .iter()
            .any(|v| v.rule_id == "source-institution-mention"));
    }
}
