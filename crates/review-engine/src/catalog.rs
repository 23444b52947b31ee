//! Pattern catalog: the versioned rule tables for Korean medical
//! advertising review (의료법 제56조).
//!
//! The catalog is built once, validated in full, and never mutated. A
//! single invalid rule fails the whole build; the engine must not start
//! with a partially valid rule set.

use std::collections::HashMap;

use regex::Regex;
use shared_types::{PatternRule, ReviewError, RuleCategory, RuleMatcher, Severity};

/// Institutions recognised as authoritative citation sources.
///
/// Interpretation is controlled by [`SourcePolicy`]: either these names are
/// an allowlist for the statistic-citation check, or they are themselves
/// forbidden in-body mentions (인증·보증·추천 광고 금지).
pub const TRUSTED_SOURCES: &[&str] = &[
    "보건복지부",
    "질병관리청",
    "식품의약품안전처",
    "국민건강보험공단",
    "건강보험심사평가원",
    "대한의사협회",
    "대한치과의사협회",
    "대한한의사협회",
    "세계보건기구",
    "WHO",
];

/// How the trusted-source list is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourcePolicy {
    /// Sources are recognised citations: the statistic-annotation pass
    /// accepts a nearby trusted-source mention as a citation.
    #[default]
    CitationAllowlist,
    /// Sources are forbidden in-body mentions: the scanner emits a
    /// high-severity violation for each institution name found
    /// (의료법 제56조제2항제14호).
    ForbiddenMention,
}

/// A catalog rule with its matcher compiled and ready to run.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub rule: PatternRule,
    pub matcher: CompiledMatcher,
}

#[derive(Debug, Clone)]
pub enum CompiledMatcher {
    Phrases(Vec<String>),
    Regex(Regex),
}

/// Immutable, validated rule tables with O(1) category lookup.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    rules: Vec<CompiledRule>,
    by_category: HashMap<RuleCategory, Vec<usize>>,
    policy: SourcePolicy,
}

impl PatternCatalog {
    /// Build the built-in catalog under the default
    /// [`SourcePolicy::CitationAllowlist`].
    pub fn builtin() -> Result<Self, ReviewError> {
        Self::from_rules(builtin_rules(), SourcePolicy::default())
    }

    /// Build the built-in catalog under an explicit source policy.
    pub fn builtin_with_policy(policy: SourcePolicy) -> Result<Self, ReviewError> {
        Self::from_rules(builtin_rules(), policy)
    }

    /// Validate and compile an arbitrary rule set. Fails fast on the first
    /// invalid rule.
    pub fn from_rules(mut rules: Vec<PatternRule>, policy: SourcePolicy) -> Result<Self, ReviewError> {
        if policy == SourcePolicy::ForbiddenMention {
            rules.push(forbidden_mention_rule());
        }

        let mut compiled = Vec::with_capacity(rules.len());
        let mut by_category: HashMap<RuleCategory, Vec<usize>> = HashMap::new();

        for (idx, rule) in rules.into_iter().enumerate() {
            let matcher = compile_matcher(&rule)?;
            by_category.entry(rule.category).or_default().push(idx);
            compiled.push(CompiledRule { rule, matcher });
        }

        Ok(Self {
            rules: compiled,
            by_category,
            policy,
        })
    }

    /// All rules, in declaration order.
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// Rules of one category, in declaration order.
    pub fn rules_in(&self, category: RuleCategory) -> Vec<&CompiledRule> {
        self.by_category
            .get(&category)
            .map(|indices| indices.iter().map(|&i| &self.rules[i]).collect())
            .unwrap_or_default()
    }

    pub fn trusted_sources(&self) -> &'static [&'static str] {
        TRUSTED_SOURCES
    }

    pub fn policy(&self) -> SourcePolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Validate one rule and compile its matcher.
fn compile_matcher(rule: &PatternRule) -> Result<CompiledMatcher, ReviewError> {
    if rule.id.is_empty() {
        return Err(ReviewError::invalid_rule("<unnamed>", "rule id is empty"));
    }

    match &rule.matcher {
        RuleMatcher::Phrases { phrases } => {
            if phrases.is_empty() {
                return Err(ReviewError::invalid_rule(&rule.id, "phrase set is empty"));
            }
            if phrases.iter().any(|p| p.trim().is_empty()) {
                return Err(ReviewError::invalid_rule(
                    &rule.id,
                    "phrase set contains an empty phrase",
                ));
            }
            Ok(CompiledMatcher::Phrases(phrases.clone()))
        }
        RuleMatcher::Regex { pattern } => {
            if pattern.trim().is_empty() {
                return Err(ReviewError::invalid_rule(&rule.id, "regex pattern is empty"));
            }
            // An empty alternation branch would match everywhere; reject it
            // at load rather than letting it silently match everything.
            if has_empty_alternation(pattern) {
                return Err(ReviewError::invalid_rule(
                    &rule.id,
                    "regex pattern contains an empty alternation branch",
                ));
            }
            let re = Regex::new(pattern).map_err(|e| ReviewError::RegexCompilation {
                rule_id: rule.id.clone(),
                reason: e.to_string(),
            })?;
            Ok(CompiledMatcher::Regex(re))
        }
    }
}

/// Detect `|` with an empty branch outside an escape, e.g. `a||b`, `|a`,
/// `a|` or `(|a)`.
fn has_empty_alternation(pattern: &str) -> bool {
    let chars: Vec<char> = pattern.chars().collect();
    let mut prev_escaped = false;
    for (i, &c) in chars.iter().enumerate() {
        if prev_escaped {
            prev_escaped = false;
            continue;
        }
        if c == '\\' {
            prev_escaped = true;
            continue;
        }
        if c == '|' {
            let before = if i == 0 { None } else { Some(chars[i - 1]) };
            let after = chars.get(i + 1).copied();
            let empty_left = matches!(before, None | Some('|') | Some('('));
            let empty_right = matches!(after, None | Some('|') | Some(')'));
            if empty_left || empty_right {
                return true;
            }
        }
    }
    false
}

fn phrase_rule(
    id: &str,
    category: RuleCategory,
    severity: Severity,
    phrases: &[&str],
    replacements: &[&str],
    legal_basis: Option<&str>,
) -> PatternRule {
    PatternRule {
        id: id.to_string(),
        category,
        severity,
        matcher: RuleMatcher::Phrases {
            phrases: phrases.iter().map(|s| s.to_string()).collect(),
        },
        replacements: replacements.iter().map(|s| s.to_string()).collect(),
        legal_basis: legal_basis.map(|s| s.to_string()),
        max_allowed: 0,
    }
}

fn regex_rule(
    id: &str,
    category: RuleCategory,
    severity: Severity,
    pattern: &str,
    replacements: &[&str],
    legal_basis: Option<&str>,
) -> PatternRule {
    PatternRule {
        id: id.to_string(),
        category,
        severity,
        matcher: RuleMatcher::Regex {
            pattern: pattern.to_string(),
        },
        replacements: replacements.iter().map(|s| s.to_string()).collect(),
        legal_basis: legal_basis.map(|s| s.to_string()),
        max_allowed: 0,
    }
}

/// Synthetic rule injected under [`SourcePolicy::ForbiddenMention`].
fn forbidden_mention_rule() -> PatternRule {
    phrase_rule(
        "source-institution-mention",
        RuleCategory::Other,
        Severity::High,
        TRUSTED_SOURCES,
        &[],
        Some("의료법 제56조제2항제14호"),
    )
}

/// The built-in medical-advertising rule tables.
///
/// Severity and legal basis are fixed at build time; declaration order is
/// the tie-break order for equally severe violations.
fn builtin_rules() -> Vec<PatternRule> {
    vec![
        // 치료효과 보장 (grouped with 거짓·과장광고, § 56(2)3)
        phrase_rule(
            "guarantee-cure",
            RuleCategory::Guarantee,
            Severity::Critical,
            &["완치", "완쾌"],
            &["증상 개선", "호전"],
            Some("의료법 제56조제2항제3호"),
        ),
        phrase_rule(
            "guarantee-effect",
            RuleCategory::Guarantee,
            Severity::Critical,
            &["효과 보장", "결과 보장", "확실한 효과", "100% 만족"],
            &["효과를 기대할 수 있습니다"],
            Some("의료법 제56조제2항제3호"),
        ),
        phrase_rule(
            "guarantee-refund",
            RuleCategory::Guarantee,
            Severity::High,
            &["환불 보장", "책임 보장", "평생 보장"],
            &[],
            Some("의료법 제56조제2항제3호"),
        ),
        regex_rule(
            "false-perfect-rate",
            RuleCategory::FalseInfo,
            Severity::Critical,
            r"(?:100|9[5-9])\s*(?:%|퍼센트)",
            &[],
            Some("의료법 제56조제2항제3호"),
        ),
        phrase_rule(
            "false-no-side-effects",
            RuleCategory::FalseInfo,
            Severity::Critical,
            &["부작용이 전혀 없", "부작용이 없", "부작용 없"],
            &["부작용이 적"],
            Some("의료법 제56조제2항제7호"),
        ),
        phrase_rule(
            "false-instant-effect",
            RuleCategory::FalseInfo,
            Severity::High,
            &["즉시 효과", "단 한 번에", "하루 만에"],
            &[],
            Some("의료법 제56조제2항제3호"),
        ),
        // 치료경험담 (§ 56(2)2)
        phrase_rule(
            "testimonial-review",
            RuleCategory::TreatmentExperience,
            Severity::Critical,
            &["치료 후기", "환자 후기", "시술 후기", "치료 사례", "체험담"],
            &[],
            Some("의료법 제56조제2항제2호"),
        ),
        phrase_rule(
            "testimonial-before-after",
            RuleCategory::TreatmentExperience,
            Severity::High,
            &["전후 사진", "전후사진", "비포 애프터", "비포애프터"],
            &[],
            Some("의료법 제56조제2항제2호"),
        ),
        // 비교광고 (§ 56(2)4)
        phrase_rule(
            "comparison-other-clinic",
            RuleCategory::Comparison,
            Severity::High,
            &[
                "다른 병원보다",
                "타 병원보다",
                "타원보다",
                "어떤 병원보다",
                "타 병원과 비교",
            ],
            &[],
            Some("의료법 제56조제2항제4호"),
        ),
        phrase_rule(
            "comparison-lowest-price",
            RuleCategory::Comparison,
            Severity::Medium,
            &["업계 최저가", "최저 비용", "최저가 보장"],
            &[],
            Some("의료법 제56조제2항제4호"),
        ),
        // 과장광고 (§ 56(2)9)
        phrase_rule(
            "exagg-superlative",
            RuleCategory::Exaggeration,
            Severity::High,
            &["국내 유일", "국내 최고", "세계 최고", "최고의 의료진", "최상의 결과"],
            &["숙련된 의료진"],
            Some("의료법 제56조제2항제9호"),
        ),
        phrase_rule(
            "exagg-first",
            RuleCategory::Exaggeration,
            Severity::High,
            &["국내 최초", "세계 최초", "업계 최초"],
            &[],
            Some("의료법 제56조제2항제9호"),
        ),
        phrase_rule(
            "exagg-pain-free",
            RuleCategory::Exaggeration,
            Severity::High,
            &["무통 수술", "전혀 아프지 않"],
            &["통증을 줄인 수술"],
            Some("의료법 제56조제2항제9호"),
        ),
        phrase_rule(
            "exagg-cutting-edge",
            RuleCategory::Exaggeration,
            Severity::Medium,
            &["최첨단", "혁신적인 치료", "획기적인"],
            &["첨단", "새로운"],
            Some("의료법 제56조제2항제9호"),
        ),
        // 소비자 유인 (의료법 제27조제3항)
        phrase_rule(
            "urgency-limited",
            RuleCategory::Urgency,
            Severity::Medium,
            &["선착순", "오늘만", "마감 임박", "지금 바로 예약", "한정 이벤트"],
            &[],
            Some("의료법 제27조제3항"),
        ),
        phrase_rule(
            "urgency-discount",
            RuleCategory::Urgency,
            Severity::Medium,
            &["파격 할인", "특가 이벤트", "반값 할인"],
            &[],
            Some("의료법 제27조제3항"),
        ),
        regex_rule(
            "urgency-event-price",
            RuleCategory::Urgency,
            Severity::Low,
            r"이벤트\s*가(?:격)?\s*\d",
            &[],
            Some("의료법 제27조제3항"),
        ),
    ]
}
