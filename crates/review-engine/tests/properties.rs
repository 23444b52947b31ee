//! Property tests over the review pipeline: determinism, score bounds,
//! ordering invariants, and fixer idempotence on arbitrary input.

use proptest::prelude::*;
use review_engine::report::AggregationMode;
use review_engine::{aismell, fixer, report, seo, ReviewEngine};
use shared_types::{AiSmellReport, ComponentDetails, Grade, ScoreComponent, SeoDetails};

fn engine() -> ReviewEngine {
    ReviewEngine::new().expect("builtin catalog must build")
}

/// Short mixed Korean/ASCII text, with rule phrases salted in so the
/// generators actually exercise the matchers.
fn review_text() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        "[가-힣 ]{0,40}",
        "[a-zA-Z0-9 .,!?%]{0,40}",
        Just("완치를 보장합니다. ".to_string()),
        Just("부작용이 전혀 없습니다. ".to_string()),
        Just("만족도 98%를 기록했습니다. ".to_string()),
        Just("타 병원보다 낫습니다. ".to_string()),
        Just("에 대해 알아보겠습니다. ".to_string()),
        Just("치료 후기를 확인하세요. ".to_string()),
    ];
    prop::collection::vec(fragment, 0..8).prop_map(|parts| parts.concat())
}

proptest! {
    /// Scanning never panics and never errors on input under the size cap.
    #[test]
    fn scan_accepts_arbitrary_text(text in "\\PC{0,500}") {
        let engine = engine();
        prop_assert!(engine.scan_violations(&text).is_ok());
    }

    /// Identical input always yields identical violations.
    #[test]
    fn scan_is_deterministic(text in review_text()) {
        let engine = engine();
        let a = engine.scan_violations(&text).unwrap();
        let b = engine.scan_violations(&text).unwrap();
        prop_assert_eq!(a, b);
    }

    /// Violations come out most severe first.
    #[test]
    fn scan_orders_by_severity(text in review_text()) {
        let engine = engine();
        let violations = engine.scan_violations(&text).unwrap();
        for pair in violations.windows(2) {
            prop_assert!(pair[0].severity.rank() <= pair[1].severity.rank());
        }
    }

    /// Every violation's position is a valid char offset into the text.
    #[test]
    fn scan_positions_are_in_bounds(text in review_text()) {
        let engine = engine();
        let chars = text.chars().count();
        for v in engine.scan_violations(&text).unwrap() {
            prop_assert!(v.position < chars.max(1));
            prop_assert!(v.count >= 1);
        }
    }

    /// The naturalness score stays in 0..=100 and never panics.
    #[test]
    fn ai_smell_score_is_bounded(text in "\\PC{0,500}") {
        let report = aismell::detect(&text).unwrap();
        prop_assert!(report.score <= 100);
        for f in &report.findings {
            prop_assert!(f.occurrences > f.max_allowed);
        }
    }

    /// SEO scoring stays in bounds for any non-empty keyword.
    #[test]
    fn seo_score_is_bounded(
        title in "[가-힣a-zA-Z0-9 ]{0,80}",
        body in review_text(),
        keyword in "[가-힣]{1,8}",
    ) {
        let component = seo::score(&title, &body, &keyword).unwrap();
        prop_assert!(component.value <= 100);
    }

    /// A second fixer run over fixed text changes nothing.
    #[test]
    fn fixer_is_idempotent(text in review_text()) {
        let once = fixer::fix(&text).unwrap();
        let twice = fixer::fix(&once.fixed_text).unwrap();
        prop_assert_eq!(&once.fixed_text, &twice.fixed_text);
        prop_assert!(twice.changes.is_empty());
    }

    /// The fixer never panics on arbitrary input and reports a bounded
    /// success rate.
    #[test]
    fn fixer_accepts_arbitrary_text(text in "\\PC{0,500}") {
        let result = fixer::fix(&text).unwrap();
        prop_assert!(result.success_rate <= 100);
        prop_assert_eq!(result.original_text, text);
    }

    /// Overall scores and grades stay consistent for any component mix,
    /// with or without a fact-check input. The fact-check range covers the
    /// whole of u8: out-of-range caller input is clamped, never weighted
    /// in raw.
    #[test]
    fn aggregate_is_bounded_and_graded(
        ai in 0u8..=100,
        seo_value in 0u8..=100,
        fact in proptest::option::of(0u8..=u8::MAX),
    ) {
        let ai_report = AiSmellReport { score: ai, findings: vec![] };
        let seo_component = ScoreComponent {
            name: "seo".to_string(),
            value: seo_value,
            details: ComponentDetails::Seo(SeoDetails::default()),
            issues: vec![],
        };
        for mode in [AggregationMode::FullReport, AggregationMode::LivePreview] {
            let report = report::aggregate(&[], &ai_report, &seo_component, fact, mode);
            prop_assert!(report.overall_score <= 100);
            prop_assert_eq!(report.overall_grade, Grade::from_score(report.overall_score));
        }
    }

    /// Grade boundaries are the fixed step function.
    #[test]
    fn grade_steps_match_thresholds(score in 0u8..=100) {
        let grade = Grade::from_score(score);
        let expected = match score {
            90..=100 => Grade::A,
            75..=89 => Grade::B,
            60..=74 => Grade::C,
            40..=59 => Grade::D,
            _ => Grade::F,
        };
        prop_assert_eq!(grade, expected);
    }

    /// Full reports never panic on generated text and carry bounded
    /// component values.
    #[test]
    fn build_report_is_total(body in review_text(), fact in proptest::option::of(0u8..=u8::MAX)) {
        let engine = engine();
        let report = engine
            .build_report_with_fact_check(&body, "임플란트 치료 안내", "임플란트", fact)
            .unwrap();
        prop_assert!(report.overall_score <= 100);
        prop_assert!(report.components.medical_law.value <= 100);
        prop_assert!(report.top_issues.len() <= 5);
        prop_assert_eq!(report.components.fact_check.is_some(), fact.is_some());
    }
}

proptest! {
    /// Missing fact-check always scores like a perfect one.
    #[test]
    fn absent_fact_check_equals_perfect(ai in 0u8..=100, seo_value in 0u8..=100) {
        let ai_report = AiSmellReport { score: ai, findings: vec![] };
        let seo_component = ScoreComponent {
            name: "seo".to_string(),
            value: seo_value,
            details: ComponentDetails::Seo(SeoDetails::default()),
            issues: vec![],
        };
        let absent = report::aggregate(&[], &ai_report, &seo_component, None, AggregationMode::FullReport);
        let perfect = report::aggregate(&[], &ai_report, &seo_component, Some(100), AggregationMode::FullReport);
        prop_assert_eq!(absent.overall_score, perfect.overall_score);
    }
}
