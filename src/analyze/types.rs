//! Core types for guideline violations.

use serde::{Deserialize, Serialize};

/// Guideline rules the engines can flag.
///
/// Rule numbers follow the team's Java style guide. G3/G4/G10 are covered
/// by the static detectors; G2/G9 only surface through the semantic engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RuleId {
    #[serde(rename = "G2")]
    PreferStreams,
    #[serde(rename = "G3")]
    NullReturn,
    #[serde(rename = "G4")]
    UnprotectedMutableField,
    #[serde(rename = "G9")]
    UnnecessaryInterface,
    #[serde(rename = "G10")]
    EqualsWithoutHashCode,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::PreferStreams => "G2",
            RuleId::NullReturn => "G3",
            RuleId::UnprotectedMutableField => "G4",
            RuleId::UnnecessaryInterface => "G9",
            RuleId::EqualsWithoutHashCode => "G10",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "G2" => Some(RuleId::PreferStreams),
            "G3" => Some(RuleId::NullReturn),
            "G4" => Some(RuleId::UnprotectedMutableField),
            "G9" => Some(RuleId::UnnecessaryInterface),
            "G10" => Some(RuleId::EqualsWithoutHashCode),
            _ => None,
        }
    }

    /// Short human-readable statement of the guideline.
    pub fn description(&self) -> &'static str {
        match self {
            RuleId::PreferStreams => "Replace imperative loops with streams",
            RuleId::NullReturn => "Avoid returning null - use Optional",
            RuleId::UnprotectedMutableField => "Protect mutable fields from external modification",
            RuleId::UnnecessaryInterface => "Remove interfaces with a single trivial implementation",
            RuleId::EqualsWithoutHashCode => "Override hashCode when overriding equals",
        }
    }

    /// Canonical fix snippet shown in review comments.
    pub fn suggestion(&self) -> &'static str {
        match self {
            RuleId::PreferStreams => "items.stream().map(...).collect(Collectors.toList());",
            RuleId::NullReturn => "return Optional.empty();",
            RuleId::UnprotectedMutableField => "this.field = new ArrayList<>(input);",
            RuleId::UnnecessaryInterface => "Collapse the interface into its only implementation",
            RuleId::EqualsWithoutHashCode => {
                "@Override\npublic int hashCode() {\n    return Objects.hash(field1, field2);\n}"
            }
        }
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single flagged guideline breach.
///
/// Immutable once created. `description` and `suggestion` come from the
/// rule's defaults for static findings and from the model's reply for
/// semantic findings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub rule: RuleId,
    pub file: String,
    /// 1-based line number in the analyzed file.
    pub line: u32,
    pub description: String,
    pub suggestion: String,
}

impl Violation {
    /// Create a violation carrying the rule's default description and fix.
    pub fn new(rule: RuleId, file: impl Into<String>, line: u32) -> Self {
        Self {
            rule,
            file: file.into(),
            line,
            description: rule.description().to_string(),
            suggestion: rule.suggestion().to_string(),
        }
    }

    /// Stable identity used by downstream feedback to reference this
    /// finding across runs.
    pub fn key(&self) -> String {
        format!("{}:{}:{}", self.rule, self.file, self.line)
    }
}
