//! Reference table shapes.
//!
//! These mirror the JSON emitted by the table generator (camelCase keys).
//! Tables are loaded once and never mutated; lookups only borrow them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::keys::{AgeEquivalentColumn, SubtestKey};
use crate::domain::value::{ParsedAgeMonths, ParsedNumeric, ParsedPercentile, ParsedScore};

/// 1-based line of a data row in the originating CSV (header is line 1).
pub fn csv_row(index: usize) -> usize {
    index + 2
}

/// Contiguous age range (inclusive, months) sharing one raw→standard table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeBand {
    pub min_months: i32,
    pub max_months: i32,
    pub label: String,
}

impl AgeBand {
    pub fn contains(&self, age_months: i32) -> bool {
        self.min_months <= age_months && age_months <= self.max_months
    }
}

/// Where a table came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMeta {
    pub table_id: String,
    pub title: String,
    /// Page in the printed manual.
    pub page: Option<u32>,
    pub source_file: String,
    pub checksum: String,
    pub generated_at: DateTime<Utc>,
    pub generator_version: String,
    /// Only present on B-series tables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_band: Option<AgeBand>,
}

/// A1: raw score → age equivalent, one column per domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeEquivalentsTable {
    pub table_id: String,
    pub source: SourceMeta,
    pub rows: Vec<AgeEquivalentRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeEquivalentRow {
    pub age_months: ParsedAgeMonths,
    #[serde(default)]
    pub cognitive: Option<ParsedNumeric>,
    #[serde(default)]
    pub communication: Option<ParsedNumeric>,
    #[serde(default)]
    pub receptive_language: Option<ParsedNumeric>,
    #[serde(default)]
    pub expressive_language: Option<ParsedNumeric>,
    #[serde(default)]
    pub social_emotional: Option<ParsedNumeric>,
    #[serde(default)]
    pub physical_development: Option<ParsedNumeric>,
    #[serde(default)]
    pub gross_motor: Option<ParsedNumeric>,
    #[serde(default)]
    pub fine_motor: Option<ParsedNumeric>,
    #[serde(default)]
    pub adaptive_behavior: Option<ParsedNumeric>,
}

impl AgeEquivalentRow {
    pub fn cell(&self, column: AgeEquivalentColumn) -> Option<&ParsedNumeric> {
        match column {
            AgeEquivalentColumn::Cognitive => self.cognitive.as_ref(),
            AgeEquivalentColumn::Communication => self.communication.as_ref(),
            AgeEquivalentColumn::ReceptiveLanguage => self.receptive_language.as_ref(),
            AgeEquivalentColumn::ExpressiveLanguage => self.expressive_language.as_ref(),
            AgeEquivalentColumn::SocialEmotional => self.social_emotional.as_ref(),
            AgeEquivalentColumn::PhysicalDevelopment => self.physical_development.as_ref(),
            AgeEquivalentColumn::GrossMotor => self.gross_motor.as_ref(),
            AgeEquivalentColumn::FineMotor => self.fine_motor.as_ref(),
            AgeEquivalentColumn::AdaptiveBehavior => self.adaptive_behavior.as_ref(),
        }
    }
}

/// B-series: raw score → standard score for one age band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawToStandardTable {
    pub table_id: String,
    pub source: SourceMeta,
    pub rows: Vec<RawToStandardRow>,
}

impl RawToStandardTable {
    pub fn age_band(&self) -> Option<&AgeBand> {
        self.source.age_band.as_ref()
    }

    /// Row with exactly this raw score, with its index.
    pub fn row(&self, raw_score: u32) -> Option<(usize, &RawToStandardRow)> {
        self.rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.raw_score == raw_score)
    }

    /// Row with the highest raw score, with its index.
    pub fn max_row(&self) -> Option<(usize, &RawToStandardRow)> {
        self.rows.iter().enumerate().max_by_key(|(_, row)| row.raw_score)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawToStandardRow {
    pub raw_score: u32,
    #[serde(default)]
    pub cognitive: Option<ParsedScore>,
    #[serde(default)]
    pub receptive_language: Option<ParsedScore>,
    #[serde(default)]
    pub expressive_language: Option<ParsedScore>,
    #[serde(default)]
    pub social_emotional: Option<ParsedScore>,
    #[serde(default)]
    pub gross_motor: Option<ParsedScore>,
    #[serde(default)]
    pub fine_motor: Option<ParsedScore>,
    #[serde(default)]
    pub adaptive_behavior: Option<ParsedScore>,
}

impl RawToStandardRow {
    pub fn score(&self, subtest: SubtestKey) -> Option<&ParsedScore> {
        match subtest {
            SubtestKey::Cognitive => self.cognitive.as_ref(),
            SubtestKey::ReceptiveLanguage => self.receptive_language.as_ref(),
            SubtestKey::ExpressiveLanguage => self.expressive_language.as_ref(),
            SubtestKey::SocialEmotional => self.social_emotional.as_ref(),
            SubtestKey::GrossMotor => self.gross_motor.as_ref(),
            SubtestKey::FineMotor => self.fine_motor.as_ref(),
            SubtestKey::AdaptiveBehavior => self.adaptive_behavior.as_ref(),
        }
    }
}

/// C1: standard score → percentile rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardToPercentileTable {
    pub table_id: String,
    pub source: SourceMeta,
    pub rows: Vec<PercentileRow>,
}

/// One printed line of C1: three independent score/percentile pairs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentileRow {
    #[serde(default)]
    pub standard_score1: Option<ParsedScore>,
    #[serde(default)]
    pub percentile_rank1: Option<ParsedPercentile>,
    #[serde(default)]
    pub standard_score2: Option<ParsedScore>,
    #[serde(default)]
    pub percentile_rank2: Option<ParsedPercentile>,
    #[serde(default)]
    pub standard_score3: Option<ParsedScore>,
    #[serde(default)]
    pub percentile_rank3: Option<ParsedPercentile>,
}

impl PercentileRow {
    /// `(standard score, percentile)` pairs in column order 1, 2, 3.
    pub fn pairs(&self) -> [(Option<&ParsedScore>, Option<&ParsedPercentile>); 3] {
        [
            (self.standard_score1.as_ref(), self.percentile_rank1.as_ref()),
            (self.standard_score2.as_ref(), self.percentile_rank2.as_ref()),
            (self.standard_score3.as_ref(), self.percentile_rank3.as_ref()),
        ]
    }
}

/// D1: sum of two subtest standard scores → domain composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SumToDomainTable {
    pub table_id: String,
    pub source: SourceMeta,
    pub rows: Vec<DomainRow>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainRow {
    #[serde(default)]
    pub sum_range1: Option<ParsedNumeric>,
    #[serde(default)]
    pub standard_score1: Option<ParsedScore>,
    #[serde(default)]
    pub sum_range2: Option<ParsedNumeric>,
    #[serde(default)]
    pub standard_score2: Option<ParsedScore>,
    #[serde(default)]
    pub sum_range3: Option<ParsedNumeric>,
    #[serde(default)]
    pub standard_score3: Option<ParsedScore>,
}

impl DomainRow {
    /// `(sum range, composite standard score)` pairs in column order 1, 2, 3.
    pub fn pairs(&self) -> [(Option<&ParsedNumeric>, Option<&ParsedScore>); 3] {
        [
            (self.sum_range1.as_ref(), self.standard_score1.as_ref()),
            (self.sum_range2.as_ref(), self.standard_score2.as_ref()),
            (self.sum_range3.as_ref(), self.standard_score3.as_ref()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_row_counts_header() {
        assert_eq!(csv_row(0), 2);
        assert_eq!(csv_row(9), 11);
    }

    #[test]
    fn band_contains_is_inclusive() {
        let band = AgeBand {
            min_months: 12,
            max_months: 14,
            label: "12-14 months".to_string(),
        };
        assert!(band.contains(12));
        assert!(band.contains(14));
        assert!(!band.contains(11));
        assert!(!band.contains(15));
    }

    #[test]
    fn raw_row_missing_columns_default_to_empty() {
        let row: RawToStandardRow =
            serde_json::from_str(r#"{"rawScore":3,"cognitive":{"value":70}}"#).unwrap();
        assert_eq!(row.raw_score, 3);
        assert_eq!(row.score(SubtestKey::Cognitive), Some(&ParsedNumeric::exact(70.0)));
        assert_eq!(row.score(SubtestKey::FineMotor), None);
    }
}
