//! Inputs and outputs of a scoring or goal-planning run.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::keys::SubtestKey;
use crate::domain::provenance::ValueWithProvenance;
use crate::domain::value::{ParsedAgeMonths, ParsedPercentile, ParsedScore};

/// One child's scoring request.
///
/// Subtests absent from `raw_scores` are treated the same as `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreInput {
    pub age_months: i32,
    pub raw_scores: BTreeMap<SubtestKey, Option<u32>>,
}

impl ScoreInput {
    pub fn new(age_months: i32) -> Self {
        Self {
            age_months,
            raw_scores: BTreeMap::new(),
        }
    }

    pub fn with_raw(mut self, subtest: SubtestKey, raw: u32) -> Self {
        self.raw_scores.insert(subtest, Some(raw));
        self
    }

    pub fn raw(&self, subtest: SubtestKey) -> Option<u32> {
        self.raw_scores.get(&subtest).copied().flatten()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SumKind {
    Exact,
    Lt,
    Gt,
}

/// Bound-aware sum of two standard scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SumValue {
    #[serde(rename = "type")]
    pub kind: SumKind,
    pub value: f64,
}

impl SumValue {
    pub fn exact(value: f64) -> Self {
        Self {
            kind: SumKind::Exact,
            value,
        }
    }

    pub fn lt(value: f64) -> Self {
        Self {
            kind: SumKind::Lt,
            value,
        }
    }

    pub fn gt(value: f64) -> Self {
        Self {
            kind: SumKind::Gt,
            value,
        }
    }
}

impl fmt::Display for SumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SumKind::Exact => write!(f, "{}", self.value),
            SumKind::Lt => write!(f, "<{}", self.value),
            SumKind::Gt => write!(f, ">{}", self.value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtestResult {
    pub raw_score: Option<u32>,
    pub standard_score: ValueWithProvenance<ParsedScore>,
    pub percentile: ValueWithProvenance<ParsedPercentile>,
    pub age_equivalent: ValueWithProvenance<ParsedAgeMonths>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainResult {
    pub sum: Option<SumValue>,
    pub standard_score: ValueWithProvenance<ParsedScore>,
    pub percentile: ValueWithProvenance<ParsedPercentile>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainResults {
    pub communication: DomainResult,
    pub physical: DomainResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub age_months: i32,
    pub subtests: BTreeMap<SubtestKey, SubtestResult>,
    pub domains: DomainResults,
}

impl CalculationResult {
    pub fn subtest(&self, key: SubtestKey) -> Option<&SubtestResult> {
        self.subtests.get(&key)
    }
}

/// Minimum raw scores needed to reach a target percentile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPlan {
    pub age_months: i32,
    pub target_percentile: f64,
    /// Standard score corresponding to the target percentile.
    pub standard_score: ValueWithProvenance<ParsedScore>,
    pub raw_scores: BTreeMap<SubtestKey, ValueWithProvenance<u32>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_value_serializes_with_type_tag() {
        let json = serde_json::to_string(&SumValue::gt(245.0)).unwrap();
        assert_eq!(json, r#"{"type":"gt","value":245.0}"#);
        assert_eq!(SumValue::lt(100.0).to_string(), "<100");
    }

    #[test]
    fn missing_raw_is_none() {
        let input = ScoreInput::new(12).with_raw(SubtestKey::Cognitive, 10);
        assert_eq!(input.raw(SubtestKey::Cognitive), Some(10));
        assert_eq!(input.raw(SubtestKey::FineMotor), None);
    }
}
