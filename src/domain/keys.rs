//! Subtest and domain identifiers.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The seven individually scored subtests (B-series columns).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "camelCase")]
#[value(rename_all = "camelCase")]
pub enum SubtestKey {
    Cognitive,
    ReceptiveLanguage,
    ExpressiveLanguage,
    SocialEmotional,
    GrossMotor,
    FineMotor,
    AdaptiveBehavior,
}

impl SubtestKey {
    pub const ALL: [SubtestKey; 7] = [
        SubtestKey::Cognitive,
        SubtestKey::ReceptiveLanguage,
        SubtestKey::ExpressiveLanguage,
        SubtestKey::SocialEmotional,
        SubtestKey::GrossMotor,
        SubtestKey::FineMotor,
        SubtestKey::AdaptiveBehavior,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SubtestKey::Cognitive => "Cognitive",
            SubtestKey::ReceptiveLanguage => "Receptive Language",
            SubtestKey::ExpressiveLanguage => "Expressive Language",
            SubtestKey::SocialEmotional => "Social-Emotional",
            SubtestKey::GrossMotor => "Gross Motor",
            SubtestKey::FineMotor => "Fine Motor",
            SubtestKey::AdaptiveBehavior => "Adaptive Behavior",
        }
    }

    /// camelCase key as used in the table JSON and on the command line.
    pub fn key(self) -> &'static str {
        match self {
            SubtestKey::Cognitive => "cognitive",
            SubtestKey::ReceptiveLanguage => "receptiveLanguage",
            SubtestKey::ExpressiveLanguage => "expressiveLanguage",
            SubtestKey::SocialEmotional => "socialEmotional",
            SubtestKey::GrossMotor => "grossMotor",
            SubtestKey::FineMotor => "fineMotor",
            SubtestKey::AdaptiveBehavior => "adaptiveBehavior",
        }
    }

    /// The A1 column holding this subtest's age equivalents.
    pub fn age_equivalent_column(self) -> AgeEquivalentColumn {
        match self {
            SubtestKey::Cognitive => AgeEquivalentColumn::Cognitive,
            SubtestKey::ReceptiveLanguage => AgeEquivalentColumn::ReceptiveLanguage,
            SubtestKey::ExpressiveLanguage => AgeEquivalentColumn::ExpressiveLanguage,
            SubtestKey::SocialEmotional => AgeEquivalentColumn::SocialEmotional,
            SubtestKey::GrossMotor => AgeEquivalentColumn::GrossMotor,
            SubtestKey::FineMotor => AgeEquivalentColumn::FineMotor,
            SubtestKey::AdaptiveBehavior => AgeEquivalentColumn::AdaptiveBehavior,
        }
    }
}

/// All nine A1 columns: the seven subtests plus the two domain totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AgeEquivalentColumn {
    Cognitive,
    Communication,
    ReceptiveLanguage,
    ExpressiveLanguage,
    SocialEmotional,
    PhysicalDevelopment,
    GrossMotor,
    FineMotor,
    AdaptiveBehavior,
}

impl AgeEquivalentColumn {
    pub fn label(self) -> &'static str {
        match self {
            AgeEquivalentColumn::Communication => "Communication",
            AgeEquivalentColumn::PhysicalDevelopment => "Physical Development",
            AgeEquivalentColumn::Cognitive => SubtestKey::Cognitive.label(),
            AgeEquivalentColumn::ReceptiveLanguage => SubtestKey::ReceptiveLanguage.label(),
            AgeEquivalentColumn::ExpressiveLanguage => SubtestKey::ExpressiveLanguage.label(),
            AgeEquivalentColumn::SocialEmotional => SubtestKey::SocialEmotional.label(),
            AgeEquivalentColumn::GrossMotor => SubtestKey::GrossMotor.label(),
            AgeEquivalentColumn::FineMotor => SubtestKey::FineMotor.label(),
            AgeEquivalentColumn::AdaptiveBehavior => SubtestKey::AdaptiveBehavior.label(),
        }
    }
}

/// Composite domains built from two subtests each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DomainKey {
    /// Receptive + Expressive Language.
    Communication,
    /// Gross + Fine Motor.
    Physical,
}

impl DomainKey {
    pub const ALL: [DomainKey; 2] = [DomainKey::Communication, DomainKey::Physical];

    pub fn label(self) -> &'static str {
        match self {
            DomainKey::Communication => "Communication",
            DomainKey::Physical => "Physical Development",
        }
    }

    pub fn components(self) -> (SubtestKey, SubtestKey) {
        match self {
            DomainKey::Communication => (SubtestKey::ReceptiveLanguage, SubtestKey::ExpressiveLanguage),
            DomainKey::Physical => (SubtestKey::GrossMotor, SubtestKey::FineMotor),
        }
    }
}
