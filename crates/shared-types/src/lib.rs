pub mod error;
pub mod types;

pub use error::ReviewError;
pub use types::{
    AiSmellDetails, AiSmellFinding, AiSmellReport, ComponentDetails, FactCheckDetails, FixChange,
    FixChangeKind, FixResult, Grade, MedicalLawDetails, PatternRule, QualityReport,
    ReportComponents, RuleCategory, RuleMatcher, ScoreComponent, SeoDetails, Severity, Violation,
};
