//! Violation scanner: runs the catalog rules over plain text.
//!
//! Pure function of (text, rules). One violation is recorded per rule with
//! an aggregate occurrence count; matching is case-sensitive (Korean text
//! needs no folding, and regex rules carry inline `(?i)` when they want
//! it).

use shared_types::{ReviewError, Violation};

use crate::catalog::{CompiledMatcher, CompiledRule};
use crate::textutil::{char_offset, validate_input};

/// Scan text against a rule set, returning violations ordered by severity
/// (critical first), stable by rule declaration order within the same
/// severity.
pub fn scan(text: &str, rules: &[CompiledRule]) -> Result<Vec<Violation>, ReviewError> {
    validate_input(text)?;

    let mut violations = Vec::new();
    for compiled in rules {
        if let Some(found) = scan_rule(text, compiled) {
            violations.push(found);
        }
    }

    // Stable sort keeps declaration order within equal severity.
    violations.sort_by_key(|v| v.severity.rank());
    Ok(violations)
}

/// Match one rule; `None` when occurrences stay within the rule's
/// tolerated count (0 for legal rules, so any match fires).
fn scan_rule(text: &str, compiled: &CompiledRule) -> Option<Violation> {
    let (count, first_byte, matched_text) = match &compiled.matcher {
        CompiledMatcher::Phrases(phrases) => {
            let mut count = 0usize;
            let mut first: Option<(usize, &str)> = None;
            for phrase in phrases {
                for (pos, _) in text.match_indices(phrase.as_str()) {
                    count += 1;
                    if first.map_or(true, |(p, _)| pos < p) {
                        first = Some((pos, phrase.as_str()));
                    }
                }
            }
            let (pos, phrase) = first?;
            (count, pos, phrase.to_string())
        }
        CompiledMatcher::Regex(re) => {
            let mut count = 0usize;
            let mut first: Option<(usize, &str)> = None;
            for m in re.find_iter(text) {
                count += 1;
                if first.is_none() {
                    first = Some((m.start(), m.as_str()));
                }
            }
            let (pos, fragment) = first?;
            (count, pos, fragment.to_string())
        }
    };

    if count as u32 <= compiled.rule.max_allowed {
        return None;
    }

    Some(Violation {
        rule_id: compiled.rule.id.clone(),
        matched_text,
        position: char_offset(text, first_byte),
        count,
        severity: compiled.rule.severity,
        category: compiled.rule.category,
        suggested_replacements: compiled.rule.replacements.clone(),
        legal_basis: compiled.rule.legal_basis.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PatternCatalog;
    use shared_types::{RuleCategory, Severity};

    fn catalog() -> PatternCatalog {
        PatternCatalog::builtin().unwrap()
    }

    #[test]
    fn test_detects_cure_claim_as_critical() {
        let violations = scan("100% 완치 가능합니다", catalog().rules()).unwrap();
        assert!(!violations.is_empty());
        assert!(violations
            .iter()
            .any(|v| v.severity == Severity::Critical && v.rule_id == "guarantee-cure"));
    }

    #[test]
    fn test_clean_text_has_no_violations() {
        let violations = scan("환자분들의 건강을 최우선으로 생각합니다", catalog().rules()).unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn test_aggregates_count_per_rule() {
        let text = "완치를 약속합니다. 모두 완치됩니다. 완쾌를 바랍니다.";
        let violations = scan(text, catalog().rules()).unwrap();
        let cure: Vec<_> = violations
            .iter()
            .filter(|v| v.rule_id == "guarantee-cure")
            .collect();
        assert_eq!(cure.len(), 1, "one violation per rule, not per occurrence");
        assert_eq!(cure[0].count, 3);
    }

    #[test]
    fn test_position_is_char_offset() {
        let text = "본원에서는 완치를 말하지 않습니다";
        let violations = scan(text, catalog().rules()).unwrap();
        let v = violations.iter().find(|v| v.rule_id == "guarantee-cure").unwrap();
        // "본원에서는 " is 6 characters
        assert_eq!(v.position, 6);
        assert_eq!(v.matched_text, "완치");
    }

    #[test]
    fn test_severity_ordering_is_descending() {
        let text = "완치 보장! 타 병원보다 낫고, 선착순 이벤트 중입니다.";
        let violations = scan(text, catalog().rules()).unwrap();
        let ranks: Vec<u8> = violations.iter().map(|v| v.severity.rank()).collect();
        let mut sorted = ranks.clone();
        sorted.sort();
        assert_eq!(ranks, sorted);
        assert_eq!(violations[0].severity, Severity::Critical);
    }

    #[test]
    fn test_scan_is_deterministic() {
        let text = "무통 수술, 부작용 없는 최첨단 치료를 선착순으로!";
        let a = scan(text, catalog().rules()).unwrap();
        let b = scan(text, catalog().rules()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_regex_rule_fires_on_rate_claim() {
        let violations = scan("성공률 98%를 자랑합니다", catalog().rules()).unwrap();
        assert!(violations
            .iter()
            .any(|v| v.rule_id == "false-perfect-rate" && v.category == RuleCategory::FalseInfo));
    }

    #[test]
    fn test_violation_carries_replacements_and_basis() {
        let violations = scan("완치", catalog().rules()).unwrap();
        let v = &violations[0];
        assert_eq!(v.suggested_replacements[0], "증상 개선");
        assert_eq!(v.legal_basis.as_deref(), Some("의료법 제56조제2항제3호"));
    }

    #[test]
    fn test_over_long_input_is_rejected() {
        let text = "가".repeat(crate::textutil::MAX_INPUT_CHARS + 1);
        assert!(matches!(
            scan(&text, catalog().rules()),
            Err(ReviewError::InvalidInput { .. })
        ));
    }
}
