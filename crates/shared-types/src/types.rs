//! Value types shared between the review engine and its front-ends.
//!
//! Everything here is a plain serde-serializable value object. Nothing is
//! mutated after construction; results live only for the call that
//! produced them.

/// How serious a matched rule is under 의료법 제56조 (medical advertising law).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Rank for ordering: 0 is most severe. Declaration order and rank agree,
    /// so a stable sort by rank puts critical findings first.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
        }
    }
}

/// Closed set of rule categories. Free-string categories are rejected at
/// catalog build, not at match time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// 치료경험담 — patient testimonials (의료법 제56조제2항제2호)
    TreatmentExperience,
    /// 거짓 광고 — factually false claims
    FalseInfo,
    /// 비교 광고 — comparison with other clinics/practitioners
    Comparison,
    /// 과장 광고 — exaggeration
    Exaggeration,
    /// 치료효과 보장
    Guarantee,
    /// 소비자 유인 — urgency / discount bait
    Urgency,
    /// Machine-flavored phrasing (not a legal category)
    AiStyle,
    Other,
}

/// What a rule matches on: a set of literal phrases or a single regex.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleMatcher {
    Phrases { phrases: Vec<String> },
    Regex { pattern: String },
}

/// One entry of the pattern catalog. Read-only data once the catalog is
/// built; severity and matcher are fixed at build time.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PatternRule {
    pub id: String,
    pub category: RuleCategory,
    pub severity: Severity,
    pub matcher: RuleMatcher,
    /// Ordered suggested alternatives; may be empty.
    pub replacements: Vec<String>,
    /// Statute citation, e.g. "의료법 제56조제2항제2호".
    pub legal_basis: Option<String>,
    /// Occurrences tolerated before the rule fires. Only meaningful for
    /// AI-style rules; legal rules keep the default of 0.
    pub max_allowed: u32,
}

/// A single rule match found during scanning.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Violation {
    pub rule_id: String,
    /// First matched fragment.
    pub matched_text: String,
    /// Character offset of the first occurrence in the scanned text.
    pub position: usize,
    /// Total occurrences across the text.
    pub count: usize,
    pub severity: Severity,
    pub category: RuleCategory,
    pub suggested_replacements: Vec<String>,
    pub legal_basis: Option<String>,
}

/// Letter grade derived from an overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Pure step function: A >= 90, B >= 75, C >= 60, D >= 40, else F.
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => Grade::A,
            75..=89 => Grade::B,
            60..=74 => Grade::C,
            40..=59 => Grade::D,
            _ => Grade::F,
        }
    }
}

/// Raw counts behind the medical-law component score.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MedicalLawDetails {
    pub critical_count: usize,
    pub high_count: usize,
    pub medium_count: usize,
    pub low_count: usize,
}

/// Raw measurements behind the AI-smell component score.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AiSmellDetails {
    pub finding_count: usize,
    pub total_deduction: u32,
}

/// Raw measurements behind the SEO component score, exposed so callers can
/// assert on the measured values rather than only the derived score.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SeoDetails {
    pub title_length: usize,
    pub keyword_count: usize,
    pub density_pct: f64,
    pub subheading_count: usize,
    pub avg_sentence_length: f64,
    pub title_score: u8,
    pub keyword_density_score: u8,
    pub first_paragraph_score: u8,
    pub subheading_score: u8,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FactCheckDetails {
    /// False when the caller supplied no fact-check result; the component is
    /// then treated as fully passing, not as failing.
    pub provided: bool,
}

/// Component-specific sub-scores and counts.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComponentDetails {
    MedicalLaw(MedicalLawDetails),
    AiSmell(AiSmellDetails),
    Seo(SeoDetails),
    FactCheck(FactCheckDetails),
}

/// One scored dimension of a quality report.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScoreComponent {
    pub name: String,
    /// 0..=100
    pub value: u8,
    pub details: ComponentDetails,
    /// Human-readable findings, most severe first.
    pub issues: Vec<String>,
}

/// Fixed component set of a report. A missing fact-check is `None`, never a
/// zero score.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReportComponents {
    pub medical_law: ScoreComponent,
    pub ai_smell: ScoreComponent,
    pub seo: ScoreComponent,
    pub fact_check: Option<ScoreComponent>,
}

/// The single quality report consumed by the UI layer.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QualityReport {
    pub overall_score: u8,
    pub overall_grade: Grade,
    pub components: ReportComponents,
    /// Most actionable problems across all components, capped at 5.
    pub top_issues: Vec<String>,
    /// Deduplicated improvement suggestions.
    pub suggestions: Vec<String>,
}

/// One AI-style pattern that fired.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AiSmellFinding {
    pub rule_id: String,
    pub phrase: String,
    pub occurrences: u32,
    pub max_allowed: u32,
    /// Points deducted from the naturalness score for this finding.
    pub deduction: u32,
}

/// Naturalness score plus the patterns that lowered it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AiSmellReport {
    /// 0..=100, 100 is fully natural.
    pub score: u8,
    /// Sorted by deduction, largest first.
    pub findings: Vec<AiSmellFinding>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixChangeKind {
    Replace,
    Remove,
    AddSourceMarker,
}

/// One edit produced by an auto-fix pass.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FixChange {
    pub kind: FixChangeKind,
    pub original: String,
    pub fixed: String,
    pub reason: String,
}

/// Output of a full auto-fix run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FixResult {
    pub original_text: String,
    pub fixed_text: String,
    /// Changes from all passes, in the order the passes were applied.
    pub changes: Vec<FixChange>,
    /// Percentage of changes that were not sentence removals; 100 when no
    /// change was needed.
    pub success_rate: u8,
}

impl FixResult {
    pub fn is_unchanged(&self) -> bool {
        self.changes.is_empty()
    }
}
