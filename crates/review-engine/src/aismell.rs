//! AI-smell detector: flags machine-flavored phrasing in generated Korean
//! copy.
//!
//! This is a second, self-contained pattern set, separate from the legal
//! catalog. Each rule tolerates `max_allowed` occurrences and fires only
//! above that; the naturalness score starts at 100 and loses
//! `min(50, weight * excess)` per fired rule, floored at 0. No hidden
//! counters, no locale-dependent matching: identical text always yields
//! the identical score.

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::{AiSmellFinding, AiSmellReport, ReviewError};

use crate::textutil::validate_input;

/// Weight group for a rule. Translationese weighs more than repetition
/// because it reads more foreign; structural tics weigh the most.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AiRuleGroup {
    Repetition,
    Template,
    Translationese,
    Structural,
}

impl AiRuleGroup {
    fn weight(self) -> u32 {
        match self {
            AiRuleGroup::Repetition => 5,
            AiRuleGroup::Template => 7,
            AiRuleGroup::Translationese => 8,
            AiRuleGroup::Structural => 10,
        }
    }
}

/// Cap on the deduction a single rule can contribute.
const MAX_DEDUCTION_PER_RULE: u32 = 50;

enum AiMatcher {
    Phrases(&'static [&'static str]),
    Regex(Regex),
}

struct AiRule {
    id: &'static str,
    group: AiRuleGroup,
    matcher: AiMatcher,
    max_allowed: u32,
}

lazy_static! {
    static ref AI_RULES: Vec<AiRule> = vec![
        AiRule {
            id: "ai-template-opening",
            group: AiRuleGroup::Template,
            matcher: AiMatcher::Phrases(&[
                "에 대해 알아보겠습니다",
                "에 대해 알아보도록 하겠습니다",
            ]),
            // A single templated opening is tolerated; blogs open this way.
            max_allowed: 1,
        },
        AiRule {
            id: "ai-template-closing",
            group: AiRuleGroup::Template,
            matcher: AiMatcher::Phrases(&[
                "도움이 되었기를 바랍니다",
                "도움이 되셨기를 바랍니다",
                "지금까지 알아보았습니다",
            ]),
            max_allowed: 0,
        },
        AiRule {
            id: "ai-template-post-intro",
            group: AiRuleGroup::Template,
            matcher: AiMatcher::Phrases(&["오늘 포스팅에서는", "이번 포스팅에서는"]),
            max_allowed: 1,
        },
        AiRule {
            id: "ai-repeat-important",
            group: AiRuleGroup::Repetition,
            matcher: AiMatcher::Phrases(&["하는 것이 중요합니다"]),
            max_allowed: 2,
        },
        AiRule {
            id: "ai-repeat-can-do",
            group: AiRuleGroup::Repetition,
            matcher: AiMatcher::Phrases(&["할 수 있습니다"]),
            max_allowed: 3,
        },
        AiRule {
            id: "ai-translationese-reported",
            group: AiRuleGroup::Translationese,
            matcher: AiMatcher::Phrases(&["것으로 알려져 있습니다", "라고 할 수 있습니다"]),
            max_allowed: 1,
        },
        AiRule {
            id: "ai-translationese-pronoun",
            group: AiRuleGroup::Translationese,
            matcher: AiMatcher::Phrases(&["당신의", "그것은"]),
            max_allowed: 1,
        },
        AiRule {
            id: "ai-translationese-passive",
            group: AiRuleGroup::Translationese,
            matcher: AiMatcher::Phrases(&["되어지", "에 의해서"]),
            max_allowed: 1,
        },
        AiRule {
            id: "ai-structural-ordinal",
            group: AiRuleGroup::Structural,
            matcher: AiMatcher::Regex(Regex::new("(첫째|둘째|셋째|넷째)[,.]").unwrap()),
            max_allowed: 2,
        },
        AiRule {
            id: "ai-structural-conclusion",
            group: AiRuleGroup::Structural,
            matcher: AiMatcher::Phrases(&["결론적으로", "요약하자면"]),
            max_allowed: 1,
        },
    ];
}

/// Detect AI-flavored phrasing and score naturalness 0..=100.
pub fn detect(text: &str) -> Result<AiSmellReport, ReviewError> {
    validate_input(text)?;

    let mut findings = Vec::new();
    let mut total_deduction: u32 = 0;

    for rule in AI_RULES.iter() {
        let (occurrences, representative) = count_rule(text, rule);
        if occurrences <= rule.max_allowed {
            continue;
        }
        let excess = occurrences - rule.max_allowed;
        let deduction = (rule.group.weight() * excess).min(MAX_DEDUCTION_PER_RULE);
        total_deduction += deduction;
        findings.push(AiSmellFinding {
            rule_id: rule.id.to_string(),
            phrase: representative,
            occurrences,
            max_allowed: rule.max_allowed,
            deduction,
        });
    }

    // Largest deduction first; stable sort keeps rule order for ties.
    findings.sort_by_key(|f| std::cmp::Reverse(f.deduction));

    let score = 100u32.saturating_sub(total_deduction) as u8;
    Ok(AiSmellReport { score, findings })
}

/// Total occurrences for one rule, plus a representative matched fragment.
fn count_rule(text: &str, rule: &AiRule) -> (u32, String) {
    match &rule.matcher {
        AiMatcher::Phrases(phrases) => {
            let mut count = 0u32;
            let mut representative = "";
            for phrase in *phrases {
                let n = text.match_indices(phrase).count() as u32;
                if n > 0 && representative.is_empty() {
                    representative = phrase;
                }
                count += n;
            }
            (count, representative.to_string())
        }
        AiMatcher::Regex(re) => {
            let mut count = 0u32;
            let mut representative = String::new();
            for m in re.find_iter(text) {
                if count == 0 {
                    representative = m.as_str().to_string();
                }
                count += 1;
            }
            (count, representative)
        }
    }
}
