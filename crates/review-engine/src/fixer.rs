//! Auto-fixer: deterministic rewrite passes that bring generated copy
//! closer to 의료법 compliance.
//!
//! Passes run in a fixed order:
//! 1. exaggeration-phrase replacement (longest match first),
//! 2. unsourced-statistic annotation (appends a marker, never invents a
//!    source),
//! 3. comparison-sentence removal (whole sentences, not just the marker),
//! 4. testimonial-phrase flagging (bracketed warning, kept visible for
//!    reviewers),
//! 5. AI-style phrase normalization.
//!
//! Passes 1 and 5 are idempotent: no replacement string contains (or can
//! recombine into) a lookup key, so re-running the fixer on fixed output
//! yields no further replace changes from those passes.

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{FixChange, FixChangeKind, FixResult, ReviewError};

use crate::catalog::TRUSTED_SOURCES;
use crate::textutil::{snap_to_char_boundary, split_sentences, validate_input};

/// (phrase, replacement, reason). Keys are matched longest-first.
const EXAGGERATION_FIXES: &[(&str, &str, &str)] = &[
    ("100% 완치", "증상 개선", "완치 보장 표현 금지 (의료법 제56조제2항제3호)"),
    ("완치", "증상 개선", "완치 보장 표현 금지 (의료법 제56조제2항제3호)"),
    ("완쾌", "호전", "완치 보장 표현 금지 (의료법 제56조제2항제3호)"),
    ("부작용이 전혀 없", "부작용이 적", "부작용 부인 표현 금지 (의료법 제56조제2항제7호)"),
    ("부작용이 없", "부작용이 적", "부작용 부인 표현 금지 (의료법 제56조제2항제7호)"),
    ("부작용 없", "부작용 적", "부작용 부인 표현 금지 (의료법 제56조제2항제7호)"),
    ("최고의", "우수한", "최상급 표현 완화 (의료법 제56조제2항제9호)"),
    ("최상의", "우수한", "최상급 표현 완화 (의료법 제56조제2항제9호)"),
    ("국내 최초", "앞서 도입한", "최초 표현 완화 (의료법 제56조제2항제9호)"),
    ("세계 최초", "앞서 도입한", "최초 표현 완화 (의료법 제56조제2항제9호)"),
    ("최첨단", "정밀", "과장 표현 완화 (의료법 제56조제2항제9호)"),
    ("혁신적인", "새로운", "과장 표현 완화 (의료법 제56조제2항제9호)"),
    ("획기적인", "새로운", "과장 표현 완화 (의료법 제56조제2항제9호)"),
    ("확실한 효과", "기대할 수 있는 효과", "효과 단정 표현 완화 (의료법 제56조제2항제3호)"),
    ("효과 보장", "효과 기대", "효과 단정 표현 완화 (의료법 제56조제2항제3호)"),
    ("환불 보장", "환불 안내", "보장 표현 완화 (의료법 제56조제2항제3호)"),
    ("무통 수술", "통증을 줄인 수술", "무통 단정 표현 완화 (의료법 제56조제2항제9호)"),
];

/// Sentences containing any of these markers are removed whole.
const COMPARISON_MARKERS: &[&str] = &[
    "다른 병원보다",
    "타 병원보다",
    "타원보다",
    "어떤 병원보다",
    "타 병원과 비교",
    "업계 최저가",
    "최저가 보장",
];

/// Testimonial phrases get a visible reviewer warning, not silent removal.
const TESTIMONIAL_PHRASES: &[&str] = &["치료 후기", "환자 후기", "시술 후기", "치료 사례", "체험담"];

const TESTIMONIAL_WARNING_PREFIX: &str = "[치료경험담 표현 삭제 필요: ";

/// (phrase, replacement, reason) for AI-style normalization.
const AI_STYLE_FIXES: &[(&str, &str, &str)] = &[
    ("에 대해 알아보도록 하겠습니다", "을 살펴봅니다", "기계적 도입부 정리"),
    ("에 대해 알아보겠습니다", "을 살펴봅니다", "기계적 도입부 정리"),
    ("도움이 되었기를 바랍니다", "참고하시기 바랍니다", "기계적 맺음말 정리"),
    ("도움이 되셨기를 바랍니다", "참고하시기 바랍니다", "기계적 맺음말 정리"),
    ("하는 것이 중요합니다", "해야 합니다", "번역투 정리"),
    ("것으로 알려져 있습니다", "것으로 보고됩니다", "번역투 정리"),
    ("오늘 포스팅에서는", "이번 글에서는", "기계적 도입부 정리"),
    ("이번 포스팅에서는", "이번 글에서는", "기계적 도입부 정리"),
    ("결론적으로", "정리하면", "기계적 맺음말 정리"),
    ("요약하자면", "정리하면", "기계적 맺음말 정리"),
];

lazy_static! {
    /// Numeric claims that need a source: number + unit (%/퍼센트/명/건/배).
    static ref STATISTIC_RE: Regex =
        Regex::new(r"\d+(?:\.\d+)?\s*(?:%|퍼센트|명|건|배)").unwrap();

    /// Pass-1 table ordered longest key first so overlapping keys cannot
    /// partially rewrite each other.
    static ref EXAGGERATION_ORDERED: Vec<(&'static str, &'static str, &'static str)> =
        longest_first(EXAGGERATION_FIXES);
    static ref AI_STYLE_ORDERED: Vec<(&'static str, &'static str, &'static str)> =
        longest_first(AI_STYLE_FIXES);
}

const SOURCE_MARKER: &str = " (출처 확인 필요)";

/// Citation context that satisfies the statistic check.
const CITATION_MARKERS: &[&str] = &["출처", "자료:", "논문", "연구", "통계청"];

fn longest_first(
    table: &[(&'static str, &'static str, &'static str)],
) -> Vec<(&'static str, &'static str, &'static str)> {
    let mut sorted = table.to_vec();
    sorted.sort_by_key(|(key, _, _)| std::cmp::Reverse(key.chars().count()));
    sorted
}

/// Run all five fix passes over the text.
pub fn fix(text: &str) -> Result<FixResult, ReviewError> {
    validate_input(text)?;

    let mut changes = Vec::new();
    let mut current = text.to_string();

    current = apply_replacement_table(&current, &EXAGGERATION_ORDERED, &mut changes);
    current = annotate_statistics(&current, &mut changes);
    current = remove_comparison_sentences(&current, &mut changes);
    current = flag_testimonials(&current, &mut changes);
    current = apply_replacement_table(&current, &AI_STYLE_ORDERED, &mut changes);

    let success_rate = success_rate(&changes);

    Ok(FixResult {
        original_text: text.to_string(),
        fixed_text: current,
        changes,
        success_rate,
    })
}

/// Percentage of changes that are not removals; 100 when nothing changed.
fn success_rate(changes: &[FixChange]) -> u8 {
    if changes.is_empty() {
        return 100;
    }
    let kept = changes
        .iter()
        .filter(|c| c.kind != FixChangeKind::Remove)
        .count();
    ((kept as f64 / changes.len() as f64) * 100.0).round() as u8
}

/// Passes 1 and 5: replace every table-key occurrence, one change per
/// occurrence, keys processed longest-first.
fn apply_replacement_table(
    text: &str,
    table: &[(&str, &str, &str)],
    changes: &mut Vec<FixChange>,
) -> String {
    let mut out = text.to_string();
    for (key, replacement, reason) in table {
        let mut search_from = 0;
        while let Some(rel) = out[search_from..].find(key) {
            let at = search_from + rel;
            out.replace_range(at..at + key.len(), replacement);
            changes.push(FixChange {
                kind: FixChangeKind::Replace,
                original: (*key).to_string(),
                fixed: (*replacement).to_string(),
                reason: (*reason).to_string(),
            });
            search_from = at + replacement.len();
        }
    }
    out
}

/// Pass 2: append a source marker to numeric claims with no recognized
/// citation nearby. The marker itself counts as citation context, so the
/// pass is a no-op on already-annotated text.
fn annotate_statistics(text: &str, changes: &mut Vec<FixChange>) -> String {
    let matches: Vec<(usize, usize, String)> = STATISTIC_RE
        .find_iter(text)
        .map(|m| (m.start(), m.end(), m.as_str().to_string()))
        .collect();

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for (start, end, fragment) in matches {
        out.push_str(&text[cursor..end]);
        cursor = end;
        if has_citation_context(text, start, end) {
            continue;
        }
        out.push_str(SOURCE_MARKER);
        changes.push(FixChange {
            kind: FixChangeKind::AddSourceMarker,
            original: fragment.clone(),
            fixed: format!("{fragment}{SOURCE_MARKER}"),
            reason: "출처 없는 통계 수치".to_string(),
        });
    }
    out.push_str(&text[cursor..]);
    out
}

/// A statistic is considered sourced when a citation marker or a trusted
/// institution appears within the surrounding window.
fn has_citation_context(text: &str, start: usize, end: usize) -> bool {
    let win_start = snap_to_char_boundary(text, start.saturating_sub(60), false);
    let win_end = snap_to_char_boundary(text, (end + 60).min(text.len()), true);
    let window = &text[win_start..win_end];
    CITATION_MARKERS.iter().any(|m| window.contains(m))
        || TRUSTED_SOURCES.iter().any(|s| window.contains(s))
}

/// Pass 3: delete whole sentences containing a comparison marker.
fn remove_comparison_sentences(text: &str, changes: &mut Vec<FixChange>) -> String {
    let mut out = String::with_capacity(text.len());
    for sentence in split_sentences(text) {
        if COMPARISON_MARKERS.iter().any(|m| sentence.contains(m)) {
            changes.push(FixChange {
                kind: FixChangeKind::Remove,
                original: sentence.trim().to_string(),
                fixed: String::new(),
                reason: "비교 광고 문장 삭제 (의료법 제56조제2항제4호)".to_string(),
            });
        } else {
            out.push_str(sentence);
        }
    }
    out
}

/// Pass 4: wrap testimonial phrases in a bracketed reviewer warning.
/// Occurrences already inside a warning are left alone.
fn flag_testimonials(text: &str, changes: &mut Vec<FixChange>) -> String {
    let mut out = text.to_string();
    for phrase in TESTIMONIAL_PHRASES {
        let mut search_from = 0;
        while let Some(rel) = out[search_from..].find(phrase) {
            let at = search_from + rel;
            if inside_warning(&out, at) {
                search_from = at + phrase.len();
                continue;
            }
            let warning = format!("{TESTIMONIAL_WARNING_PREFIX}{phrase}]");
            out.replace_range(at..at + phrase.len(), &warning);
            changes.push(FixChange {
                kind: FixChangeKind::Replace,
                original: (*phrase).to_string(),
                fixed: warning.clone(),
                reason: "치료경험담 표현 (의료법 제56조제2항제2호)".to_string(),
            });
            search_from = at + warning.len();
        }
    }
    out
}

/// True when the byte position sits just after a warning prefix.
fn inside_warning(text: &str, at: usize) -> bool {
    let lookback = snap_to_char_boundary(text, at.saturating_sub(TESTIMONIAL_WARNING_PREFIX.len()), false);
    text[lookback..at].contains(TESTIMONIAL_WARNING_PREFIX.trim_end())
        || text[lookback..at].ends_with("삭제 필요: ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_replaces_cure_claim() {
        let result = fix("완치").unwrap();
        assert_eq!(result.fixed_text, "증상 개선");
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].kind, FixChangeKind::Replace);
        assert_eq!(result.success_rate, 100);
    }

    #[test]
    fn test_longest_key_wins() {
        let result = fix("100% 완치 가능합니다").unwrap();
        assert_eq!(result.fixed_text, "증상 개선 가능합니다");
        // One replacement for the whole "100% 완치", not a partial rewrite
        // of the inner "완치".
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].original, "100% 완치");
    }

    #[test]
    fn test_exaggeration_pass_is_idempotent() {
        let first = fix("최고의 의료진이 최첨단 장비로 혁신적인 치료를 제공, 완치를 약속합니다").unwrap();
        let second = fix(&first.fixed_text).unwrap();
        let replays: Vec<_> = second
            .changes
            .iter()
            .filter(|c| c.kind == FixChangeKind::Replace)
            .collect();
        assert!(replays.is_empty(), "re-run produced {replays:?}");
    }

    #[test]
    fn test_annotates_unsourced_statistic() {
        let result = fix("수술 건수 1200건을 기록했습니다").unwrap();
        assert!(result.fixed_text.contains("1200건 (출처 확인 필요)"));
        assert_eq!(result.changes[0].kind, FixChangeKind::AddSourceMarker);
    }

    #[test]
    fn test_sourced_statistic_is_left_alone() {
        let result = fix("보건복지부 자료에 따르면 성인의 30명 중 1명이 해당됩니다").unwrap();
        assert!(result
            .changes
            .iter()
            .all(|c| c.kind != FixChangeKind::AddSourceMarker));
    }

    #[test]
    fn test_statistic_annotation_is_idempotent() {
        let first = fix("수술 건수 1200건 달성").unwrap();
        let second = fix(&first.fixed_text).unwrap();
        assert!(second
            .changes
            .iter()
            .all(|c| c.kind != FixChangeKind::AddSourceMarker));
    }

    #[test]
    fn test_removes_whole_comparison_sentence() {
        let text = "본원은 정확한 진단을 제공합니다. 다른 병원보다 빠른 회복을 약속합니다. 예약은 전화로 받습니다.";
        let result = fix(text).unwrap();
        assert!(!result.fixed_text.contains("다른 병원보다"));
        assert!(!result.fixed_text.contains("빠른 회복"));
        assert!(result.fixed_text.contains("정확한 진단"));
        assert!(result.fixed_text.contains("예약은 전화로"));
        let removal = result
            .changes
            .iter()
            .find(|c| c.kind == FixChangeKind::Remove)
            .unwrap();
        assert!(removal.original.contains("다른 병원보다"));
    }

    #[test]
    fn test_flags_testimonial_without_deleting() {
        let result = fix("환자 후기를 소개합니다").unwrap();
        assert!(result
            .fixed_text
            .contains("[치료경험담 표현 삭제 필요: 환자 후기]"));
        // The phrase stays visible inside the warning.
        assert!(result.fixed_text.contains("환자 후기"));
    }

    #[test]
    fn test_testimonial_flagging_does_not_reflag() {
        let first = fix("치료 후기 모음").unwrap();
        let second = fix(&first.fixed_text).unwrap();
        assert_eq!(second.fixed_text, first.fixed_text);
        assert!(second.changes.is_empty());
    }

    #[test]
    fn test_ai_style_pass_is_idempotent() {
        let first = fix("당뇨병에 대해 알아보겠습니다. 결론적으로 관리가 답입니다. 도움이 되었기를 바랍니다.").unwrap();
        assert!(first.fixed_text.contains("을 살펴봅니다"));
        assert!(first.fixed_text.contains("정리하면"));
        let second = fix(&first.fixed_text).unwrap();
        assert!(second
            .changes
            .iter()
            .filter(|c| c.kind == FixChangeKind::Replace)
            .count()
            == 0);
    }

    #[test]
    fn test_success_rate_counts_non_removals() {
        // One replace + one removal = 50%
        let text = "완치됩니다. 타 병원보다 좋습니다.";
        let result = fix(text).unwrap();
        let removes = result
            .changes
            .iter()
            .filter(|c| c.kind == FixChangeKind::Remove)
            .count();
        assert_eq!(removes, 1);
        assert_eq!(result.changes.len(), 2);
        assert_eq!(result.success_rate, 50);
    }

    #[test]
    fn test_clean_text_is_untouched() {
        let text = "환자분들의 건강을 최우선으로 생각합니다.";
        let result = fix(text).unwrap();
        assert_eq!(result.fixed_text, text);
        assert!(result.is_unchanged());
        assert_eq!(result.success_rate, 100);
    }

    #[test]
    fn test_changes_keep_pass_order() {
        let text = "완치 가능! 만족도 90%를 기록. 타 병원보다 낫습니다. 치료 후기 확인. 결론적으로 좋습니다.";
        let result = fix(text).unwrap();
        let kinds: Vec<FixChangeKind> = result.changes.iter().map(|c| c.kind).collect();
        let first_marker = kinds
            .iter()
            .position(|k| *k == FixChangeKind::AddSourceMarker)
            .unwrap();
        let first_remove = kinds.iter().position(|k| *k == FixChangeKind::Remove).unwrap();
        assert!(first_marker > 0, "replace pass runs before annotation");
        assert!(first_remove > first_marker);
    }
}
