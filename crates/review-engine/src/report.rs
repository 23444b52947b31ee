//! Report aggregation: one weighted score and grade from the component
//! results.
//!
//! Two modes exist and are named, not merged. `FullReport` is the
//! canonical weighting (medical law 40%, AI smell 30%, fact check 20%,
//! SEO 10%); `LivePreview` is the lightweight panel score (mean of AI
//! smell and SEO, no legal component). A missing fact-check input counts
//! as fully passing, never as zero.

use shared_types::{
    AiSmellDetails, AiSmellReport, ComponentDetails, FactCheckDetails, Grade, MedicalLawDetails,
    QualityReport, ReportComponents, ScoreComponent, Severity, Violation,
};

/// Which weighting scheme to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggregationMode {
    /// medical law 40%, AI smell 30%, fact check 20% (100 when absent),
    /// SEO 10%.
    #[default]
    FullReport,
    /// Mean of AI smell and SEO only, for the live analysis panel.
    LivePreview,
}

/// Per-severity deductions for the medical-law component value.
const CRITICAL_DEDUCTION: u32 = 30;
const HIGH_DEDUCTION: u32 = 15;
const MEDIUM_DEDUCTION: u32 = 5;

const MAX_TOP_ISSUES: usize = 5;

/// Combine component results into one quality report.
///
/// A fact-check score above 100 is clamped to 100 before weighting, so
/// the overall score and the reported component value always agree and
/// the 0..=100 bound holds for any caller input.
pub fn aggregate(
    violations: &[Violation],
    ai_smell: &AiSmellReport,
    seo: &ScoreComponent,
    fact_check_score: Option<u8>,
    mode: AggregationMode,
) -> QualityReport {
    let medical_law = medical_law_component(violations);
    let ai_component = ai_smell_component(ai_smell);
    let fact_check = fact_check_score.map(fact_check_component);

    let overall_score = match mode {
        AggregationMode::FullReport => {
            let fact_value = fact_check_score.unwrap_or(100).min(100);
            (f64::from(medical_law.value) * 0.4
                + f64::from(ai_component.value) * 0.3
                + f64::from(fact_value) * 0.2
                + f64::from(seo.value) * 0.1)
                .round() as u8
        }
        AggregationMode::LivePreview => {
            (f64::from(ai_component.value) / 2.0 + f64::from(seo.value) / 2.0).round() as u8
        }
    };

    let components = ReportComponents {
        medical_law,
        ai_smell: ai_component,
        seo: seo.clone(),
        fact_check,
    };

    let top_issues = top_issues(&components);
    let suggestions = suggestions(violations, &components);

    QualityReport {
        overall_score,
        overall_grade: Grade::from_score(overall_score),
        components,
        top_issues,
        suggestions,
    }
}

/// 100 - (critical*30 + high*15 + medium*5), floored at 0. Low-severity
/// findings are reported but do not deduct.
fn medical_law_component(violations: &[Violation]) -> ScoreComponent {
    let details = MedicalLawDetails {
        critical_count: count_severity(violations, Severity::Critical),
        high_count: count_severity(violations, Severity::High),
        medium_count: count_severity(violations, Severity::Medium),
        low_count: count_severity(violations, Severity::Low),
    };

    let deduction = details.critical_count as u32 * CRITICAL_DEDUCTION
        + details.high_count as u32 * HIGH_DEDUCTION
        + details.medium_count as u32 * MEDIUM_DEDUCTION;
    let value = 100u32.saturating_sub(deduction) as u8;

    // Violations arrive already sorted most severe first.
    let issues = violations.iter().map(describe_violation).collect();

    ScoreComponent {
        name: "medicalLaw".to_string(),
        value,
        details: ComponentDetails::MedicalLaw(details),
        issues,
    }
}

fn count_severity(violations: &[Violation], severity: Severity) -> usize {
    violations.iter().filter(|v| v.severity == severity).count()
}

fn describe_violation(v: &Violation) -> String {
    match &v.legal_basis {
        Some(basis) => format!("'{}' {}회 사용 ({basis})", v.matched_text, v.count),
        None => format!("'{}' {}회 사용", v.matched_text, v.count),
    }
}

fn ai_smell_component(report: &AiSmellReport) -> ScoreComponent {
    let details = AiSmellDetails {
        finding_count: report.findings.len(),
        total_deduction: report.findings.iter().map(|f| f.deduction).sum(),
    };
    let issues = report
        .findings
        .iter()
        .map(|f| {
            format!(
                "'{}' {}회 반복 (허용 {}회)",
                f.phrase, f.occurrences, f.max_allowed
            )
        })
        .collect();

    ScoreComponent {
        name: "aiSmell".to_string(),
        value: report.score,
        details: ComponentDetails::AiSmell(details),
        issues,
    }
}

fn fact_check_component(score: u8) -> ScoreComponent {
    let issues = if score < 70 {
        vec!["사실 확인이 필요한 주장이 있습니다".to_string()]
    } else {
        vec![]
    };
    ScoreComponent {
        name: "factCheck".to_string(),
        value: score.min(100),
        details: ComponentDetails::FactCheck(FactCheckDetails { provided: true }),
        issues,
    }
}

/// Worst finding from each component, worst component first, capped at 5.
fn top_issues(components: &ReportComponents) -> Vec<String> {
    let mut candidates: Vec<(&ScoreComponent, &String)> = Vec::new();
    for component in [
        &components.medical_law,
        &components.ai_smell,
        &components.seo,
    ] {
        if let Some(issue) = component.issues.first() {
            candidates.push((component, issue));
        }
    }
    if let Some(fc) = &components.fact_check {
        if let Some(issue) = fc.issues.first() {
            candidates.push((fc, issue));
        }
    }

    candidates.sort_by_key(|(component, _)| component.value);
    candidates
        .into_iter()
        .take(MAX_TOP_ISSUES)
        .map(|(component, issue)| format!("[{}] {issue}", component.name))
        .collect()
}

/// Replacement-oriented suggestions across components, deduplicated while
/// preserving order.
fn suggestions(violations: &[Violation], components: &ReportComponents) -> Vec<String> {
    let mut out = Vec::new();

    for v in violations {
        if let Some(replacement) = v.suggested_replacements.first() {
            out.push(format!("'{}' 대신 '{replacement}' 사용", v.matched_text));
        } else {
            out.push(format!("'{}' 표현 삭제 검토", v.matched_text));
        }
    }
    // SEO issues are already phrased as actionable suggestions.
    out.extend(components.seo.issues.iter().cloned());

    dedup_preserving_order(out)
}

fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items.into_iter().filter(|s| seen.insert(s.clone())).collect()
}
